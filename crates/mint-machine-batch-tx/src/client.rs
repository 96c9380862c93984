use crate::{BundleSubmitter, TxBatchConfig, TxBatchError};
use async_trait::async_trait;
use backoff::future::retry;
use solana_client::{nonblocking::rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Submission client: signs, sends and confirms one bundle at a time
pub struct BatchTxClient {
    rpc_client: Arc<RpcClient>,
    payer: Keypair,
    config: TxBatchConfig,
}

impl BatchTxClient {
    /// Create a new client with default configuration
    pub fn new(rpc_client: Arc<RpcClient>, payer: Keypair) -> Self {
        Self {
            rpc_client,
            payer,
            config: TxBatchConfig::default(),
        }
    }

    /// Create a new client with custom configuration
    pub fn with_config(rpc_client: Arc<RpcClient>, payer: Keypair, config: TxBatchConfig) -> Self {
        Self {
            rpc_client,
            payer,
            config,
        }
    }

    /// Get the payer's public key
    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn config(&self) -> &TxBatchConfig {
        &self.config
    }

    /// Sign, send and confirm a single bundle.
    ///
    /// The send itself is never repeated: a bundle whose confirmation times out
    /// may still land, and resending it could double-apply mints and transfers.
    pub async fn send_bundle(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        if instructions.is_empty() {
            return Err(TxBatchError::NoInstructions);
        }

        // 1. Compile against a fresh blockhash
        let recent_blockhash = self.latest_blockhash().await?;
        let message =
            Message::new_with_blockhash(&instructions, Some(&self.payer.pubkey()), &recent_blockhash);
        let mut transaction = Transaction::new_unsigned(message);

        // 2. Refuse bundles the network would reject for size
        let size = serialized_size(&transaction);
        if size > self.config.max_transaction_size_bytes {
            return Err(TxBatchError::TransactionTooLarge {
                size,
                max: self.config.max_transaction_size_bytes,
            });
        }

        // 3. Verify balance if configured
        if self.config.verify_balance_before_send {
            self.verify_payer_balance(&transaction.message).await?;
        }

        // 4. Sign with the payer plus any co-signers. `dyn Signer` is not Sync,
        //    so the signer list must not live across an await.
        {
            let mut signers: Vec<&dyn Signer> = vec![&self.payer];
            signers.extend(extra_signers.iter().map(|k| *k as &dyn Signer));
            transaction
                .try_sign(&signers, recent_blockhash)
                .map_err(|e| TxBatchError::Signing(e.to_string()))?;
        }

        // 5. Send and wait for confirmation
        let signature = self
            .rpc_client
            .send_and_confirm_transaction_with_spinner_and_config(
                &transaction,
                self.config.confirmation_commitment,
                RpcSendTransactionConfig {
                    skip_preflight: self.config.skip_preflight,
                    preflight_commitment: Some(self.config.confirmation_commitment.commitment),
                    ..RpcSendTransactionConfig::default()
                },
            )
            .await
            .map_err(|e| {
                warn!("Bundle of {} instructions failed: {}", instructions.len(), e);
                TxBatchError::RpcClient(e)
            })?;

        info!(
            "Bundle of {} instructions confirmed: {}",
            instructions.len(),
            signature
        );
        Ok(signature)
    }

    /// Fetch a recent blockhash, retrying transient RPC failures with backoff
    async fn latest_blockhash(&self) -> Result<Hash, TxBatchError> {
        let rpc_client = self.rpc_client.clone();
        let max_retries = self.config.max_retries;
        let mut attempt = 0usize;

        retry(self.config.retry_backoff.clone(), || {
            attempt += 1;
            let attempt = attempt;
            let rpc_client = rpc_client.clone();

            async move {
                rpc_client.get_latest_blockhash().await.map_err(|e| {
                    warn!("Blockhash fetch attempt {} failed: {}", attempt, e);
                    let err = TxBatchError::RetriesExhausted {
                        retries: attempt - 1,
                        last_error: e.to_string(),
                    };
                    if attempt > max_retries {
                        backoff::Error::Permanent(err)
                    } else {
                        backoff::Error::Transient {
                            err,
                            retry_after: None,
                        }
                    }
                })
            }
        })
        .await
    }

    /// Verify payer has sufficient balance for the bundle's network fee
    async fn verify_payer_balance(&self, message: &Message) -> Result<(), TxBatchError> {
        let fee = self.rpc_client.get_fee_for_message(message).await?;
        let balance = self.rpc_client.get_balance(&self.payer.pubkey()).await?;

        if balance < fee {
            return Err(TxBatchError::InsufficientBalance {
                required: fee,
                available: balance,
            });
        }

        debug!(
            "Balance check passed: {} lamports available, {} required",
            balance, fee
        );
        Ok(())
    }
}

#[async_trait]
impl BundleSubmitter for BatchTxClient {
    fn payer(&self) -> Pubkey {
        self.payer_pubkey()
    }

    async fn submit(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError> {
        self.send_bundle(instructions, extra_signers).await
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64, TxBatchError> {
        Ok(self.rpc_client.get_balance(address).await?)
    }

    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, TxBatchError> {
        Ok(self
            .rpc_client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }
}

/// Wire size of a transaction: compact signature count, signatures, message
pub fn serialized_size(transaction: &Transaction) -> usize {
    let signature_count = transaction.signatures.len();
    short_vec_len(signature_count) + signature_count * 64 + transaction.message.serialize().len()
}

fn short_vec_len(len: usize) -> usize {
    match len {
        0..=0x7f => 1,
        0x80..=0x3fff => 2,
        _ => 3,
    }
}
