use super::{estimate_fee::print_fee_breakdown, Context};
use crate::error::{CliError, CliResult};
use mint_machine_client::{BatchState, FailurePolicy, WalletRecord};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

pub async fn execute(
    context: &Context,
    mint: Pubkey,
    count: u64,
    tokens_per_wallet: u64,
    continue_on_failure: bool,
) -> CliResult<()> {
    println!(
        "👛 Provisioning {} wallets with {} tokens each...",
        count, tokens_per_wallet
    );

    let mut settings = context.config.machine_settings()?;
    if continue_on_failure {
        settings.failure_policy = FailurePolicy::Continue;
    }
    debug!("Provisioning settings: {:?}", settings);

    print_fee_breakdown(&settings, count, tokens_per_wallet)?;

    let machine = context.machine(settings, Some(mint))?;
    let mut provisioner = machine.provisioner(count, tokens_per_wallet)?;
    let total_batches = provisioner.schedule().len();

    // Recovery phrases go to stdout as each batch settles; never to disk
    println!("\n🏗️  Submitting {} batches...", total_batches);
    while let Some(outcome) = provisioner.next_batch().await {
        let batch_number = outcome.plan.batch_index + 1;
        match &outcome.state {
            BatchState::Submitted { signature } => {
                println!(
                    "📊 Batch {}/{}: {} wallets funded ({})",
                    batch_number,
                    total_batches,
                    outcome.wallets.len(),
                    signature
                );
                print_wallets(&outcome.wallets);
            }
            BatchState::Failed { reason } => {
                println!("⚠️  Batch {}/{} failed: {}", batch_number, total_batches, reason);
                if !outcome.unconfirmed_wallets.is_empty() {
                    println!("   Bundle was sent but not confirmed; these wallets may be funded:");
                    print_wallets(&outcome.unconfirmed_wallets);
                }
            }
            BatchState::Pending | BatchState::Building => {}
        }
    }

    let halted = provisioner.is_halted();
    let report = provisioner.into_report();

    println!("\n📊 Summary:");
    println!("  - {} wallets provisioned", report.wallets.len());
    if !report.unconfirmed_wallets.is_empty() {
        println!(
            "  - {} wallets unconfirmed (may be funded, keep their phrases)",
            report.unconfirmed_wallets.len()
        );
    }
    println!(
        "  - {}/{} batches submitted",
        report.submitted_batches(),
        total_batches
    );

    let failed = report.failed_batches();
    if failed.is_empty() {
        println!("\n🎉 Wallet provisioning completed successfully!");
        return Ok(());
    }

    let remaining = count.saturating_sub(report.wallets.len() as u64);
    if halted {
        println!("  - Stopped after a failed batch; later batches were not attempted");
    }
    println!(
        "  - Re-run with --count {} to provision the remaining wallets",
        remaining
    );

    Err(CliError::CommandExecution(format!(
        "{} of {} batches failed",
        failed.len(),
        total_batches
    )))
}

fn print_wallets(wallets: &[WalletRecord]) {
    for wallet in wallets {
        println!("{}  {}", wallet.public_address, wallet.recovery_phrase);
    }
}
