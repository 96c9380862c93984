use super::Context;
use crate::error::CliResult;
use solana_sdk::native_token::LAMPORTS_PER_SOL;

pub async fn execute(context: &Context) -> CliResult<()> {
    let machine = context.machine(context.config.machine_settings()?, None)?;
    let lamports = machine.wallet_balance().await?;

    println!(
        "💰 Balance: {} SOL ({} lamports)",
        lamports as f64 / LAMPORTS_PER_SOL as f64,
        lamports
    );

    Ok(())
}
