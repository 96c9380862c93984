use crate::metadata::UploadError;
use mint_machine_batch_tx::TxBatchError;
use mint_machine_sdk::{BundleError, GenerationError, PlanError, PricingError};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Bad operator input, always raised before anything touches the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing destination")]
    MissingDestination,

    #[error("wallet not loaded")]
    WalletNotLoaded,

    #[error("non-positive amount")]
    NonPositiveAmount,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("missing token {0}")]
    MissingTokenField(&'static str),

    #[error("no token created")]
    NoMint,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wallet generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Bundle over capacity: {attempted} instructions (max {max})")]
    OverCapacity { attempted: usize, max: usize },

    #[error("Network error: {0}")]
    Network(#[from] TxBatchError),

    #[error("Bundle error: {0}")]
    Bundle(BundleError),

    #[error("Batch planning error: {0}")]
    Plan(#[from] PlanError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("Metadata upload failed: {0}")]
    Metadata(#[from] UploadError),

    #[error("Batch {0} cannot be retried: {1}")]
    NotRetryable(usize, String),
}

impl From<BundleError> for ClientError {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::OverCapacity { attempted, max } => {
                ClientError::OverCapacity { attempted, max }
            }
            other => ClientError::Bundle(other),
        }
    }
}
