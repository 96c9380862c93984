use clap::{Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod console;
mod error;

use commands::Context;
use config::MachineConfig;
use error::CliResult;

#[derive(Parser)]
#[command(name = "mint-machine")]
#[command(about = "Mint Machine CLI - Create a token and provision consumable wallets on Solana")]
#[command(version)]
struct Cli {
    /// Machine configuration file (YAML)
    #[arg(long, global = true, env = "MINT_MACHINE_CONFIG")]
    config: Option<PathBuf>,

    /// Payer and mint authority keypair file
    #[arg(short, long, global = true, env = "MINT_MACHINE_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Solana RPC URL
    #[arg(short, long, global = true, env = "MINT_MACHINE_RPC_URL")]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload metadata and create a new token
    CreateToken {
        /// Token name
        #[arg(short, long)]
        name: String,

        /// Token symbol
        #[arg(short, long)]
        symbol: String,

        /// Token description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Whole tokens to mint to the authority right after creation
        #[arg(long)]
        initial_supply: Option<u64>,
    },

    /// Mint tokens to the authority's own token account
    Mint {
        /// Token mint address
        #[arg(short, long, env = "MINT_MACHINE_MINT")]
        mint: Pubkey,

        /// Whole tokens to mint
        amount: u64,
    },

    /// Generate, credit and fund consumable wallets in batches
    ProvisionWallets {
        /// Token mint address
        #[arg(short, long, env = "MINT_MACHINE_MINT")]
        mint: Pubkey,

        /// Number of wallets to create
        #[arg(short, long)]
        count: u64,

        /// Whole tokens credited to every wallet
        #[arg(short, long)]
        tokens_per_wallet: u64,

        /// Keep going after a failed batch instead of stopping
        #[arg(long)]
        continue_on_failure: bool,
    },

    /// Send tokens from the authority to an address
    SendTokens {
        /// Token mint address
        #[arg(short, long, env = "MINT_MACHINE_MINT")]
        mint: Pubkey,

        /// Recipient wallet address
        destination: String,

        /// Whole tokens to send
        amount: u64,
    },

    /// Show the SOL balance of the configured wallet
    Balance,

    /// Preview the provisioning fee per batch without touching the network
    EstimateFee {
        /// Number of wallets to create
        #[arg(short, long)]
        count: u64,

        /// Whole tokens credited to every wallet
        #[arg(short, long)]
        tokens_per_wallet: u64,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = MachineConfig::load(cli.config.as_deref())?;
    let context = Context::new(config, cli.keypair, cli.rpc_url);

    match cli.command {
        Commands::CreateToken {
            name,
            symbol,
            description,
            initial_supply,
        } => {
            commands::create_token::execute(&context, name, symbol, description, initial_supply)
                .await
        }

        Commands::Mint { mint, amount } => {
            commands::mint_tokens::execute(&context, mint, amount).await
        }

        Commands::ProvisionWallets {
            mint,
            count,
            tokens_per_wallet,
            continue_on_failure,
        } => {
            commands::provision_wallets::execute(
                &context,
                mint,
                count,
                tokens_per_wallet,
                continue_on_failure,
            )
            .await
        }

        Commands::SendTokens {
            mint,
            destination,
            amount,
        } => commands::send_tokens::execute(&context, mint, destination, amount).await,

        Commands::Balance => commands::balance::execute(&context).await,

        Commands::EstimateFee {
            count,
            tokens_per_wallet,
        } => commands::estimate_fee::execute(&context, count, tokens_per_wallet),
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
