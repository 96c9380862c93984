use super::Context;
use crate::error::CliResult;

pub async fn execute(
    context: &Context,
    name: String,
    symbol: String,
    description: String,
    initial_supply: Option<u64>,
) -> CliResult<()> {
    println!("🪙 Creating token {} ({})...", name, symbol);

    let mut machine = context.machine(context.config.machine_settings()?, None)?;

    let created = machine.create_token(&name, &symbol, &description).await?;
    println!("\n📋 Token details:");
    println!("  - Mint: {}", created.mint);
    println!("  - Metadata: {}", created.metadata_uri);
    println!("  - Signature: {}", created.signature);

    if let Some(amount) = initial_supply.filter(|amount| *amount > 0) {
        println!("\n🏭 Minting {} tokens to the authority...", amount);
        let signature = machine.mint_tokens(amount).await?;
        println!("  - Signature: {}", signature);
    }

    println!("\n🎉 Token ready. Pass --mint {} to the other commands.", created.mint);

    Ok(())
}
