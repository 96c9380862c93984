/*!
# Mint Machine

The operator-facing workflows: create a token, mint to the authority, provision
consumable wallets in batches and send tokens. `MintMachine` owns every
collaborator it talks to; nothing is looked up globally.
*/

use crate::{
    errors::{ClientError, ClientResult, ValidationError},
    metadata::{MetadataUploader, TokenMetadata},
    notifications::{
        Notification, Notifier, METADATA_UPLOADED, TOKEN_CREATED, TOKEN_MINTED, TOKEN_SENT,
    },
    provisioner::WalletProvisioner,
    types::{CreatedToken, MachineSettings, ProvisionReport, ProvisionRequest},
};
use mint_machine_batch_tx::{BundleSubmitter, TxBatchError};
use mint_machine_sdk::{
    build_create_token_bundle, build_mint_tokens_bundle, build_token_transfer_bundle,
    to_base_units, InstructionBundle, MINT_ACCOUNT_LEN,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::{str::FromStr, sync::Arc};
use tracing::info;

pub struct MintMachine {
    wallet: Option<Arc<dyn BundleSubmitter>>,
    uploader: Arc<dyn MetadataUploader>,
    notifier: Arc<dyn Notifier>,
    settings: MachineSettings,
    mint: Option<Pubkey>,
}

impl MintMachine {
    /// A machine with no wallet connected and no token yet
    pub fn new(
        uploader: Arc<dyn MetadataUploader>,
        notifier: Arc<dyn Notifier>,
        settings: MachineSettings,
    ) -> Self {
        Self {
            wallet: None,
            uploader,
            notifier,
            settings,
            mint: None,
        }
    }

    pub fn with_wallet(mut self, wallet: Arc<dyn BundleSubmitter>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    /// Operate on an existing mint whose authority is the connected wallet
    pub fn with_mint(mut self, mint: Pubkey) -> Self {
        self.mint = Some(mint);
        self
    }

    pub fn mint(&self) -> Option<Pubkey> {
        self.mint
    }

    pub fn settings(&self) -> &MachineSettings {
        &self.settings
    }

    // ================================================================================================
    // Token Lifecycle
    // ================================================================================================

    /// Upload metadata, create a new mint and the authority's token account
    pub async fn create_token(
        &mut self,
        name: &str,
        symbol: &str,
        description: &str,
    ) -> ClientResult<CreatedToken> {
        let name = name.trim();
        let symbol = symbol.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingTokenField("name").into());
        }
        if symbol.is_empty() {
            return Err(ValidationError::MissingTokenField("symbol").into());
        }
        let wallet = Arc::clone(self.connected_wallet()?);

        let metadata = TokenMetadata {
            token_name: name.to_string(),
            token_symbol: symbol.to_string(),
            token_description: description.trim().to_string(),
        };
        let metadata_uri = match self.uploader.upload_json(&metadata).await {
            Ok(uri) => uri,
            Err(e) => {
                let err = ClientError::from(e);
                self.notifier.notify(Notification::error(err.to_string()));
                return Err(err);
            }
        };
        info!("Token metadata uploaded to {}", metadata_uri);
        self.notifier.notify(Notification::success(METADATA_UPLOADED));

        let rent_exempt_lamports = wallet
            .minimum_balance_for_rent_exemption(MINT_ACCOUNT_LEN)
            .await
            .map_err(|e| self.network_failure(e))?;

        let mint_keypair = Keypair::new();
        let payer = wallet.payer();
        let bundle = build_create_token_bundle(
            &self.settings.address_finder,
            &payer,
            &mint_keypair.pubkey(),
            &payer,
            self.settings.decimals,
            rent_exempt_lamports,
        )?;

        let signature = self.submit(&wallet, bundle, &[&mint_keypair]).await?;
        info!("Created mint {} ({})", mint_keypair.pubkey(), signature);
        self.notifier.notify(Notification::success(TOKEN_CREATED));

        self.mint = Some(mint_keypair.pubkey());

        Ok(CreatedToken {
            mint: mint_keypair.pubkey(),
            metadata_uri,
            signature,
        })
    }

    /// Mint whole `amount` tokens into the authority's own token account
    pub async fn mint_tokens(&self, amount: u64) -> ClientResult<Signature> {
        let wallet = self.connected_wallet()?;
        if amount == 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }
        let mint = self.current_mint()?;

        let payer = wallet.payer();
        let bundle = build_mint_tokens_bundle(
            &self.settings.address_finder,
            &payer,
            &mint,
            &payer,
            amount,
            self.settings.decimals,
        )?;

        let signature = self.submit(wallet, bundle, &[]).await?;
        info!("Minted {} tokens of {} ({})", amount, mint, signature);
        self.notifier.notify(Notification::success(TOKEN_MINTED));

        Ok(signature)
    }

    /// Forget the current mint so a new token can be created
    pub fn reset_token(&mut self) {
        if let Some(mint) = self.mint.take() {
            info!("Forgetting mint {}", mint);
        }
    }

    pub async fn wallet_balance(&self) -> ClientResult<u64> {
        let wallet = self.connected_wallet()?;
        let payer = wallet.payer();
        Ok(wallet.balance(&payer).await?)
    }

    // ================================================================================================
    // Wallet Provisioning
    // ================================================================================================

    /// A provisioner for `total_wallets` wallets, for callers that drive batches themselves
    pub fn provisioner(
        &self,
        total_wallets: u64,
        tokens_per_wallet: u64,
    ) -> ClientResult<WalletProvisioner> {
        let wallet = self.connected_wallet()?;
        let mint = self.current_mint()?;

        let request = ProvisionRequest {
            total_wallets,
            tokens_per_wallet,
            fee_recipient: self.settings.fee_recipient,
        };

        WalletProvisioner::new(
            Arc::clone(wallet),
            Arc::clone(&self.notifier),
            &self.settings,
            mint,
            request,
        )
    }

    /// Provision `count` wallets, each credited `tokens_per_wallet` tokens and
    /// 0.001 SOL. Batch failures are reported in the returned report.
    pub async fn provision_wallets(
        &self,
        count: u64,
        tokens_per_wallet: u64,
    ) -> ClientResult<ProvisionReport> {
        let mut provisioner = self.provisioner(count, tokens_per_wallet)?;
        info!(
            "Provisioning {} wallets in {} batches",
            count,
            provisioner.schedule().len()
        );

        provisioner.run_to_completion().await;
        let report = provisioner.into_report();

        info!(
            "Provisioned {} wallets ({} of {} batches submitted)",
            report.wallets.len(),
            report.submitted_batches(),
            report.outcomes.len()
        );

        Ok(report)
    }

    // ================================================================================================
    // Transfers
    // ================================================================================================

    /// Send whole `amount` tokens from the connected wallet to `destination`
    pub async fn send_tokens(&self, destination: &str, amount: u64) -> ClientResult<Signature> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(ValidationError::MissingDestination.into());
        }
        let wallet = self.connected_wallet()?;
        if amount == 0 {
            return Err(ValidationError::NonPositiveAmount.into());
        }

        let recipient = Pubkey::from_str(destination)
            .map_err(|_| ValidationError::InvalidAddress(destination.to_string()))?;
        let mint = self.current_mint()?;

        let base_units = to_base_units(amount, self.settings.decimals)?;
        let payer = wallet.payer();
        let bundle = build_token_transfer_bundle(
            &self.settings.address_finder,
            &payer,
            &mint,
            &payer,
            &recipient,
            base_units,
            self.settings.decimals,
        )?;

        let signature = self.submit(wallet, bundle, &[]).await?;
        info!("Sent {} tokens to {} ({})", amount, recipient, signature);
        self.notifier.notify(Notification::success(TOKEN_SENT));

        Ok(signature)
    }

    // ================================================================================================
    // Helpers
    // ================================================================================================

    fn connected_wallet(&self) -> Result<&Arc<dyn BundleSubmitter>, ValidationError> {
        self.wallet.as_ref().ok_or(ValidationError::WalletNotLoaded)
    }

    fn current_mint(&self) -> Result<Pubkey, ValidationError> {
        self.mint.ok_or(ValidationError::NoMint)
    }

    async fn submit(
        &self,
        wallet: &Arc<dyn BundleSubmitter>,
        bundle: InstructionBundle,
        extra_signers: &[&Keypair],
    ) -> ClientResult<Signature> {
        wallet
            .submit(bundle.into_instructions(), extra_signers)
            .await
            .map_err(|e| self.network_failure(e))
    }

    fn network_failure(&self, error: TxBatchError) -> ClientError {
        self.notifier
            .notify(Notification::transaction_failed(&error));
        ClientError::Network(error)
    }
}
