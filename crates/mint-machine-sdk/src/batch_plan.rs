use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("Batch size must be greater than zero")]
    ZeroBatchSize,

    #[error("Wallet count {0} does not fit in memory on this platform")]
    TooManyWallets(u64),
}

pub type PlanResult<T> = Result<T, PlanError>;

/// A contiguous range of wallet indices provisioned by one bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub batch_index: usize,
    /// First wallet index (inclusive)
    pub start: usize,
    /// Last wallet index (exclusive)
    pub end: usize,
}

impl BatchPlan {
    pub fn wallet_count(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The partition of `[0, total_wallets)` into consecutive batches of at most
/// `batch_size`. Plans are computed from their index, so the schedule itself
/// is constant-size whatever the wallet count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSchedule {
    total_wallets: usize,
    batch_size: usize,
    batch_count: usize,
}

impl BatchSchedule {
    pub fn new(total_wallets: u64, batch_size: usize) -> PlanResult<Self> {
        let total_wallets = usize::try_from(total_wallets)
            .map_err(|_| PlanError::TooManyWallets(total_wallets))?;

        Ok(Self {
            total_wallets,
            batch_size,
            batch_count: batch_count(total_wallets, batch_size)?,
        })
    }

    pub fn total_wallets(&self) -> usize {
        self.total_wallets
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches: ceil(total / batch_size)
    pub fn len(&self) -> usize {
        self.batch_count
    }

    pub fn is_empty(&self) -> bool {
        self.batch_count == 0
    }

    pub fn plan(&self, batch_index: usize) -> Option<BatchPlan> {
        if batch_index >= self.batch_count {
            return None;
        }

        // batch_index < batch_count, so start < total_wallets
        let start = batch_index * self.batch_size;
        Some(BatchPlan {
            batch_index,
            start,
            end: start.saturating_add(self.batch_size).min(self.total_wallets),
        })
    }

    /// The final batch, the only one that may be short
    pub fn last(&self) -> Option<BatchPlan> {
        self.batch_count.checked_sub(1).and_then(|index| self.plan(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = BatchPlan> + '_ {
        (0..self.batch_count).filter_map(move |index| self.plan(index))
    }
}

/// Number of batches needed for `total_wallets`: ceil(total / batch_size)
pub fn batch_count(total_wallets: usize, batch_size: usize) -> PlanResult<usize> {
    if batch_size == 0 {
        return Err(PlanError::ZeroBatchSize);
    }
    Ok(total_wallets.div_ceil(batch_size))
}

/// Partition `[0, total_wallets)` into consecutive batches of at most `batch_size`
pub fn plan_batches(total_wallets: u64, batch_size: usize) -> PlanResult<BatchSchedule> {
    BatchSchedule::new(total_wallets, batch_size)
}
