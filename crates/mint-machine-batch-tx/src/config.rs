use crate::TxBatchError;
use backoff::ExponentialBackoff;
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

/// Solana's hard limit on a serialized transaction
pub const PACKET_DATA_SIZE: usize = 1232;

/// Configuration for bundle submission
#[derive(Debug, Clone)]
pub struct TxBatchConfig {
    /// Maximum number of retry attempts when fetching a recent blockhash
    pub max_retries: usize,

    /// Backoff strategy for blockhash retry delays
    pub retry_backoff: ExponentialBackoff,

    /// Commitment level for transaction confirmation
    pub confirmation_commitment: CommitmentConfig,

    /// Whether to skip preflight checks (simulation before sending)
    pub skip_preflight: bool,

    /// Whether to verify payer balance covers the network fee before sending
    pub verify_balance_before_send: bool,

    /// Maximum transaction size in bytes (conservative default)
    pub max_transaction_size_bytes: usize,
}

impl Default for TxBatchConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_backoff: ExponentialBackoff {
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(10),
                max_elapsed_time: Some(Duration::from_secs(60)),
                multiplier: 2.0,
                ..Default::default()
            },
            confirmation_commitment: CommitmentConfig::confirmed(),
            skip_preflight: false,
            verify_balance_before_send: true,
            max_transaction_size_bytes: 1200, // Conservative, well under 1232 limit
        }
    }
}

impl TxBatchConfig {
    pub fn validate(&self) -> Result<(), TxBatchError> {
        if self.max_transaction_size_bytes == 0 || self.max_transaction_size_bytes > PACKET_DATA_SIZE {
            return Err(TxBatchError::Config(format!(
                "max_transaction_size_bytes must be between 1 and {}, got {}",
                PACKET_DATA_SIZE, self.max_transaction_size_bytes
            )));
        }
        Ok(())
    }
}
