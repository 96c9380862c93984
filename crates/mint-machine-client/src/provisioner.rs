/*!
# Wallet Provisioner

Runs a provisioning request one batch at a time. Each batch generates fresh
wallets, builds a single bundle (fee transfer, then a mint and a funding
transfer per wallet) and waits for it to confirm before the next batch starts.

A batch moves `Pending → Building → Submitted | Failed`. Only submitted batches
add wallets to the accumulated list. Failed batches are never retried
automatically; call [`WalletProvisioner::retry_batch`] to rerun one with new
wallets.

When a bundle reaches the submitter but does not confirm, its wallets are kept
as unconfirmed: the bundle may land late, and their recovery phrases are the
only way to reach whatever it funded.

Plans are computed from the batch index and only touched batches carry state,
so a run costs memory in proportion to the batches attempted, not requested.
*/

use crate::{
    errors::{ClientError, ClientResult},
    notifications::{Notification, Notifier, WALLETS_CREATED},
    types::{BatchOutcome, BatchState, FailurePolicy, MachineSettings, ProvisionReport, ProvisionRequest},
};
use mint_machine_batch_tx::BundleSubmitter;
use mint_machine_sdk::{
    build_provisioning_bundle, generate_wallets, plan_batches, BatchPlan, BatchSchedule,
    GeneratedWallet, InstructionBundle, ProvisioningBundleParams, WalletRecord,
};
use solana_sdk::pubkey::Pubkey;
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info, warn};

pub struct WalletProvisioner {
    submitter: Arc<dyn BundleSubmitter>,
    notifier: Arc<dyn Notifier>,
    params: ProvisioningBundleParams,
    failure_policy: FailurePolicy,
    schedule: BatchSchedule,
    // Batches absent from the map are still pending
    states: BTreeMap<usize, BatchState>,
    // Latest outcome per attempted batch
    outcomes: BTreeMap<usize, BatchOutcome>,
    next_index: usize,
    halted: bool,
    wallets: Vec<WalletRecord>,
    unconfirmed_wallets: Vec<WalletRecord>,
}

impl WalletProvisioner {
    pub fn new(
        submitter: Arc<dyn BundleSubmitter>,
        notifier: Arc<dyn Notifier>,
        settings: &MachineSettings,
        mint: Pubkey,
        request: ProvisionRequest,
    ) -> ClientResult<Self> {
        let schedule = plan_batches(request.total_wallets, settings.batch_size)?;
        let payer = submitter.payer();

        let params = ProvisioningBundleParams {
            address_finder: settings.address_finder,
            payer,
            mint,
            mint_authority: payer,
            fee_recipient: request.fee_recipient,
            tokens_per_wallet: request.tokens_per_wallet,
            decimals: settings.decimals,
            wallet_funding_lamports: settings.wallet_funding_lamports,
            max_instructions: settings.max_bundle_instructions,
        };

        Ok(Self {
            submitter,
            notifier,
            params,
            failure_policy: settings.failure_policy,
            schedule,
            states: BTreeMap::new(),
            outcomes: BTreeMap::new(),
            next_index: 0,
            halted: false,
            wallets: Vec::new(),
            unconfirmed_wallets: Vec::new(),
        })
    }

    pub fn schedule(&self) -> &BatchSchedule {
        &self.schedule
    }

    /// State of one batch, or `None` past the end of the schedule
    pub fn state(&self, batch_index: usize) -> Option<BatchState> {
        if batch_index >= self.schedule.len() {
            return None;
        }
        Some(
            self.states
                .get(&batch_index)
                .cloned()
                .unwrap_or(BatchState::Pending),
        )
    }

    /// Wallets of every submitted batch so far, in confirmation order
    pub fn wallets(&self) -> &[WalletRecord] {
        &self.wallets
    }

    /// Wallets whose bundle was sent but never confirmed
    pub fn unconfirmed_wallets(&self) -> &[WalletRecord] {
        &self.unconfirmed_wallets
    }

    /// True once a failure stopped the run under [`FailurePolicy::Stop`]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn is_finished(&self) -> bool {
        self.halted || self.next_index >= self.schedule.len()
    }

    /// Process the next pending batch. Returns `None` when every batch has been
    /// attempted or the run is halted.
    pub async fn next_batch(&mut self) -> Option<BatchOutcome> {
        if self.halted {
            return None;
        }

        let plan = self.schedule.plan(self.next_index)?;
        self.next_index += 1;

        Some(self.run_batch(plan).await)
    }

    /// Rerun a failed batch with freshly generated wallets
    pub async fn retry_batch(&mut self, batch_index: usize) -> ClientResult<BatchOutcome> {
        let plan = self.schedule.plan(batch_index).ok_or_else(|| {
            ClientError::NotRetryable(batch_index, "no such batch".to_string())
        })?;

        if !self.states.get(&batch_index).is_some_and(BatchState::is_failed) {
            return Err(ClientError::NotRetryable(
                batch_index,
                "batch has not failed".to_string(),
            ));
        }

        info!("Retrying batch {}/{}", batch_index + 1, self.schedule.len());
        let outcome = self.run_batch(plan).await;

        if !self.states.values().any(BatchState::is_failed) {
            self.halted = false;
        }

        Ok(outcome)
    }

    /// Attempt batches until none are left or the run halts
    pub async fn run_to_completion(&mut self) {
        while self.next_batch().await.is_some() {}
    }

    /// Outcomes and wallets ordered by batch index, whatever order batches
    /// were retried in
    pub fn into_report(self) -> ProvisionReport {
        let outcomes: Vec<BatchOutcome> = self.outcomes.into_values().collect();
        let wallets = outcomes
            .iter()
            .filter(|outcome| outcome.state.is_submitted())
            .flat_map(|outcome| outcome.wallets.iter().cloned())
            .collect();

        ProvisionReport {
            outcomes,
            wallets,
            unconfirmed_wallets: self.unconfirmed_wallets,
        }
    }

    async fn run_batch(&mut self, plan: BatchPlan) -> BatchOutcome {
        let index = plan.batch_index;
        self.states.insert(index, BatchState::Building);
        debug!(
            "Building batch {}/{} (wallets {}..{})",
            index + 1,
            self.schedule.len(),
            plan.start,
            plan.end
        );

        let (state, wallets, unconfirmed_wallets) = match self.build_batch(&plan) {
            Ok((records, bundle)) => {
                match self
                    .submitter
                    .submit(bundle.into_instructions(), &[])
                    .await
                {
                    Ok(signature) => {
                        info!(
                            "Batch {}/{} confirmed: {} ({} wallets)",
                            index + 1,
                            self.schedule.len(),
                            signature,
                            records.len()
                        );
                        self.wallets.extend(records.iter().cloned());
                        self.notifier.notify(Notification::success(WALLETS_CREATED));
                        (BatchState::Submitted { signature }, records, Vec::new())
                    }
                    Err(e) => {
                        warn!(
                            "Batch {}/{} was not confirmed; keeping {} unconfirmed wallets",
                            index + 1,
                            self.schedule.len(),
                            records.len()
                        );
                        self.unconfirmed_wallets.extend(records.iter().cloned());
                        (self.fail(index, ClientError::Network(e)), Vec::new(), records)
                    }
                }
            }
            Err(e) => (self.fail(index, e), Vec::new(), Vec::new()),
        };

        self.states.insert(index, state.clone());
        let outcome = BatchOutcome {
            plan,
            state,
            wallets,
            unconfirmed_wallets,
        };
        self.outcomes.insert(index, outcome.clone());
        outcome
    }

    fn build_batch(&self, plan: &BatchPlan) -> ClientResult<(Vec<WalletRecord>, InstructionBundle)> {
        let generated = generate_wallets(plan.wallet_count())?;
        let addresses: Vec<Pubkey> = generated.iter().map(GeneratedWallet::pubkey).collect();
        let bundle = build_provisioning_bundle(&self.params, &addresses)?;

        Ok((generated.iter().map(GeneratedWallet::record).collect(), bundle))
    }

    fn fail(&mut self, index: usize, error: ClientError) -> BatchState {
        warn!("Batch {}/{} failed: {}", index + 1, self.schedule.len(), error);
        self.notifier
            .notify(Notification::transaction_failed(&error));

        if self.failure_policy == FailurePolicy::Stop {
            self.halted = true;
        }

        BatchState::Failed {
            reason: error.to_string(),
        }
    }
}
