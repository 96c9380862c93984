use thiserror::Error;

/// Errors that can occur while signing, sending and confirming a bundle
#[derive(Error, Debug)]
pub enum TxBatchError {
    #[error("RPC client error: {0}")]
    RpcClient(#[from] solana_client::client_error::ClientError),

    #[error("Blockhash fetch failed after {retries} retries: {last_error}")]
    RetriesExhausted { retries: usize, last_error: String },

    #[error("Insufficient balance: need {required} lamports, have {available}")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Transaction too large: {size} bytes (max: {max})")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("No instructions provided")]
    NoInstructions,

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("Transaction failed: {0}")]
    SendFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
