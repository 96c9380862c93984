/*!
# Client Data Types

Requests, per-batch outcomes and settings shared by the provisioning workflows.
*/

use mint_machine_sdk::{
    AddressFinder, BatchPlan, WalletRecord, BATCH_SIZE, DEFAULT_FEE_RECIPIENT,
    MAX_BUNDLE_INSTRUCTIONS, TOKEN_DECIMALS, WALLET_FUNDING_LAMPORTS,
};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey::Pubkey, signature::Signature};

/// What the operator asked for. Owned by the provisioner for its whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionRequest {
    pub total_wallets: u64,
    /// Whole tokens credited to every wallet
    pub tokens_per_wallet: u64,
    pub fee_recipient: Pubkey,
}

/// What happens to the remaining batches once one fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Later batches wait until the failed one is retried
    #[default]
    Stop,
    /// Keep going and report every failed batch at the end
    Continue,
}

/// Lifecycle of a single batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Building,
    Submitted { signature: Signature },
    Failed { reason: String },
}

impl BatchState {
    pub fn is_submitted(&self) -> bool {
        matches!(self, BatchState::Submitted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchState::Failed { .. })
    }
}

/// Result of sending one bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    pub succeeded: bool,
    pub signature: Option<Signature>,
}

/// What one call to `next_batch` or `retry_batch` produced
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub plan: BatchPlan,
    pub state: BatchState,
    /// Wallets funded by this batch; empty unless the batch was submitted
    pub wallets: Vec<WalletRecord>,
    /// Wallets of a bundle handed to the submitter that did not confirm. The
    /// bundle may still land, so these can hold tokens and lamports.
    pub unconfirmed_wallets: Vec<WalletRecord>,
}

impl BatchOutcome {
    pub fn submission_result(&self) -> SubmissionResult {
        match &self.state {
            BatchState::Submitted { signature } => SubmissionResult {
                succeeded: true,
                signature: Some(*signature),
            },
            _ => SubmissionResult {
                succeeded: false,
                signature: None,
            },
        }
    }
}

/// Everything a provisioning run produced
#[derive(Debug, Clone, Default)]
pub struct ProvisionReport {
    pub outcomes: Vec<BatchOutcome>,
    /// Wallets of every submitted batch, in batch order
    pub wallets: Vec<WalletRecord>,
    /// Wallets of every failed submission, including ones later retried
    pub unconfirmed_wallets: Vec<WalletRecord>,
}

impl ProvisionReport {
    pub fn submitted_batches(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state.is_submitted())
            .count()
    }

    pub fn failed_batches(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state.is_failed())
            .map(|outcome| outcome.plan.batch_index)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.outcomes.is_empty() && self.failed_batches().is_empty()
    }
}

/// A freshly created token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedToken {
    pub mint: Pubkey,
    pub metadata_uri: String,
    pub signature: Signature,
}

/// Knobs for `MintMachine`. Defaults reproduce the standard deployment.
#[derive(Debug, Clone)]
pub struct MachineSettings {
    pub address_finder: AddressFinder,
    pub batch_size: usize,
    pub max_bundle_instructions: usize,
    pub fee_recipient: Pubkey,
    pub decimals: u8,
    pub wallet_funding_lamports: u64,
    pub failure_policy: FailurePolicy,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            address_finder: AddressFinder::default(),
            batch_size: BATCH_SIZE,
            max_bundle_instructions: MAX_BUNDLE_INSTRUCTIONS,
            fee_recipient: DEFAULT_FEE_RECIPIENT,
            decimals: TOKEN_DECIMALS,
            wallet_funding_lamports: WALLET_FUNDING_LAMPORTS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(batch_index: usize, state: BatchState) -> BatchOutcome {
        BatchOutcome {
            plan: BatchPlan {
                batch_index,
                start: batch_index * 7,
                end: batch_index * 7 + 7,
            },
            state,
            wallets: Vec::new(),
            unconfirmed_wallets: Vec::new(),
        }
    }

    #[test]
    fn test_submission_result_mirrors_state() {
        let signature = Signature::new_unique();
        let ok = outcome(0, BatchState::Submitted { signature });
        let failed = outcome(
            1,
            BatchState::Failed {
                reason: "boom".to_string(),
            },
        );

        assert_eq!(
            ok.submission_result(),
            SubmissionResult {
                succeeded: true,
                signature: Some(signature)
            }
        );
        assert!(!failed.submission_result().succeeded);
        assert!(failed.submission_result().signature.is_none());
    }

    #[test]
    fn test_report_counts() {
        let report = ProvisionReport {
            outcomes: vec![
                outcome(
                    0,
                    BatchState::Submitted {
                        signature: Signature::new_unique(),
                    },
                ),
                outcome(
                    1,
                    BatchState::Failed {
                        reason: "rpc down".to_string(),
                    },
                ),
            ],
            wallets: Vec::new(),
            unconfirmed_wallets: Vec::new(),
        };

        assert_eq!(report.submitted_batches(), 1);
        assert_eq!(report.failed_batches(), vec![1]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_failure_policy_defaults_to_stop() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Stop);
        assert_eq!(MachineSettings::default().failure_policy, FailurePolicy::Stop);
        assert_eq!(MachineSettings::default().batch_size, 7);
    }
}
