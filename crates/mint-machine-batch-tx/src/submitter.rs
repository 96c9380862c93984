use crate::TxBatchError;
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
};

/// Signs, sends and confirms instruction bundles for one payer.
///
/// Implementations must confirm (or fail) a bundle before returning so that
/// callers can sequence bundles that share the payer account.
#[async_trait]
pub trait BundleSubmitter: Send + Sync {
    /// Fee payer and default signer of every bundle
    fn payer(&self) -> Pubkey;

    /// Submit one bundle; `extra_signers` co-sign alongside the payer
    async fn submit(
        &self,
        instructions: Vec<Instruction>,
        extra_signers: &[&Keypair],
    ) -> Result<Signature, TxBatchError>;

    /// Lamport balance of `address`
    async fn balance(&self, address: &Pubkey) -> Result<u64, TxBatchError>;

    /// Lamports needed to keep an account of `data_len` bytes rent exempt
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, TxBatchError>;
}
