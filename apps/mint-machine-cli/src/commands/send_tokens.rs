use super::Context;
use crate::error::CliResult;
use solana_sdk::pubkey::Pubkey;

pub async fn execute(
    context: &Context,
    mint: Pubkey,
    destination: String,
    amount: u64,
) -> CliResult<()> {
    println!("📤 Sending {} tokens of {} to {}...", amount, mint, destination);

    let machine = context.machine(context.config.machine_settings()?, Some(mint))?;
    let signature = machine.send_tokens(&destination, amount).await?;

    println!("  - Signature: {}", signature);

    Ok(())
}
