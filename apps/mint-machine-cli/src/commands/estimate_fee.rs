use super::Context;
use crate::error::{CliError, CliResult};
use mint_machine_client::MachineSettings;
use mint_machine_sdk::{plan_batches, provisioning_fee_lamports};
use solana_sdk::native_token::LAMPORTS_PER_SOL;

pub fn execute(context: &Context, count: u64, tokens_per_wallet: u64) -> CliResult<()> {
    println!(
        "🧮 Estimating cost of {} wallets with {} tokens each...",
        count, tokens_per_wallet
    );

    let settings = context.config.machine_settings()?;
    print_fee_breakdown(&settings, count, tokens_per_wallet)?;

    Ok(())
}

/// Per-batch service fee plus wallet funding, computed offline. Every batch but
/// the last is full, so the breakdown has at most two lines.
pub fn print_fee_breakdown(
    settings: &MachineSettings,
    count: u64,
    tokens_per_wallet: u64,
) -> CliResult<()> {
    let schedule = plan_batches(count, settings.batch_size)
        .map_err(|e| CliError::InvalidConfig(e.to_string()))?;
    let batch_fee = |wallets: usize| {
        provisioning_fee_lamports(wallets, tokens_per_wallet)
            .map_err(|e| CliError::CommandExecution(e.to_string()))
    };

    let mut total_fee = 0u64;
    println!("\n💰 Service fee per batch:");
    if let Some(last) = schedule.last() {
        let full_batches = schedule.len() - 1;
        if full_batches > 0 {
            let fee = batch_fee(settings.batch_size)?;
            total_fee = fee.saturating_mul(full_batches as u64);
            println!(
                "  - {} batches of {} wallets: {} lamports each",
                full_batches,
                settings.batch_size,
                fee
            );
        }

        let fee = batch_fee(last.wallet_count())?;
        total_fee = total_fee.saturating_add(fee);
        println!(
            "  - Batch {}/{}: {} wallets, {} lamports",
            last.batch_index + 1,
            schedule.len(),
            last.wallet_count(),
            fee
        );
    }

    let funding = count.saturating_mul(settings.wallet_funding_lamports);
    let total = total_fee.saturating_add(funding);

    println!("📊 Totals:");
    println!("  - Service fee: {} lamports", total_fee);
    println!("  - Wallet funding: {} lamports", funding);
    println!(
        "  - Total (before network fees): {} SOL",
        total as f64 / LAMPORTS_PER_SOL as f64
    );

    Ok(())
}
