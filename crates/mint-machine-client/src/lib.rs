/*!
# Mint Machine Client

Workflows for running a token drop on Solana: create an SPL token, mint to the
authority, provision batches of consumable wallets (each one credited with
tokens and a little SOL for fees) and send tokens to an address.

## Architecture

`MintMachine` owns its collaborators explicitly:

- a connected wallet, any [`BundleSubmitter`](mint_machine_batch_tx::BundleSubmitter)
  (the RPC-backed `BatchTxClient` in production, a mock in tests)
- a [`MetadataUploader`] for token metadata JSON
- a [`Notifier`] that receives user-facing status messages

Provisioning is driven by [`WalletProvisioner`], which submits exactly one
bundle at a time and records a [`BatchOutcome`] per batch.

## Usage

```rust,no_run
use mint_machine_batch_tx::{BatchTxClient, RpcClient};
use mint_machine_client::{
    ClientResult, LocalMetadataStore, MachineSettings, MintMachine, TracingNotifier,
};
use solana_sdk::signature::Keypair;
use std::sync::Arc;

async fn example() -> ClientResult<()> {
    let rpc_client = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
    let wallet = BatchTxClient::new(rpc_client, Keypair::new());

    let mut machine = MintMachine::new(
        Arc::new(LocalMetadataStore::new("./metadata")),
        Arc::new(TracingNotifier),
        MachineSettings::default(),
    )
    .with_wallet(Arc::new(wallet));

    machine.create_token("Gold", "GLD", "A shiny token").await?;
    let report = machine.provision_wallets(10, 5).await?;

    for wallet in &report.wallets {
        println!("{} {}", wallet.public_address, wallet.recovery_phrase);
    }

    Ok(())
}
```
*/

pub mod errors;
pub mod machine;
pub mod metadata;
pub mod notifications;
pub mod provisioner;
pub mod types;

pub use errors::{ClientError, ClientResult, ValidationError};
pub use machine::MintMachine;
pub use metadata::{
    LocalMetadataStore, MemoryMetadataStore, MetadataUploader, TokenMetadata, UploadError,
};
pub use notifications::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use provisioner::WalletProvisioner;
pub use types::{
    BatchOutcome, BatchState, CreatedToken, FailurePolicy, MachineSettings, ProvisionReport,
    ProvisionRequest, SubmissionResult,
};

// Re-export the record type callers receive
pub use mint_machine_sdk::WalletRecord;
