pub mod balance;
pub mod create_token;
pub mod estimate_fee;
pub mod mint_tokens;
pub mod provision_wallets;
pub mod send_tokens;

use crate::{
    config::MachineConfig,
    console::ConsoleNotifier,
    error::{CliError, CliResult},
};
use mint_machine_batch_tx::{BatchTxClient, RpcClient};
use mint_machine_client::{LocalMetadataStore, MachineSettings, MintMachine};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Signer},
};
use std::{path::PathBuf, sync::Arc};

/// Configuration file merged with command line overrides
pub struct Context {
    pub config: MachineConfig,
    pub keypair_path: PathBuf,
    pub rpc_url: String,
}

impl Context {
    pub fn new(config: MachineConfig, keypair: Option<PathBuf>, rpc_url: Option<String>) -> Self {
        Self {
            keypair_path: keypair.unwrap_or_else(|| config.keypair_path.clone()),
            rpc_url: rpc_url.unwrap_or_else(|| config.rpc_url.clone()),
            config,
        }
    }

    /// A machine with the configured wallet connected
    pub fn machine(&self, settings: MachineSettings, mint: Option<Pubkey>) -> CliResult<MintMachine> {
        println!("🔑 Reading keypair {}...", self.keypair_path.display());
        let keypair = read_keypair_file(&self.keypair_path).map_err(|e| {
            CliError::Keypair(format!("{}: {}", self.keypair_path.display(), e))
        })?;
        println!("✅ Wallet: {}", keypair.pubkey());

        let tx_config = self.config.tx_batch_config()?;
        let rpc_client = Arc::new(RpcClient::new_with_commitment(
            self.rpc_url.clone(),
            tx_config.confirmation_commitment,
        ));
        println!("🌐 RPC: {}", self.rpc_url);

        let wallet = BatchTxClient::with_config(rpc_client, keypair, tx_config);
        let machine = MintMachine::new(
            Arc::new(LocalMetadataStore::new(&self.config.metadata_dir)),
            Arc::new(ConsoleNotifier),
            settings,
        )
        .with_wallet(Arc::new(wallet));

        Ok(match mint {
            Some(mint) => machine.with_mint(mint),
            None => machine,
        })
    }
}
