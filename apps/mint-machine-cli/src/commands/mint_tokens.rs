use super::Context;
use crate::error::CliResult;
use solana_sdk::pubkey::Pubkey;

pub async fn execute(context: &Context, mint: Pubkey, amount: u64) -> CliResult<()> {
    println!("🏭 Minting {} tokens of {}...", amount, mint);

    let machine = context.machine(context.config.machine_settings()?, Some(mint))?;
    let signature = machine.mint_tokens(amount).await?;

    println!("  - Signature: {}", signature);

    Ok(())
}
