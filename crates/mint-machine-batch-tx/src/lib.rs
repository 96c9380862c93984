/*!
# Mint Machine Submission Client

Signs, sends and confirms instruction bundles against a Solana cluster, one
bundle at a time. Fetching the recent blockhash is retried with exponential
backoff; the send itself is not, so a bundle is never applied twice.

## Quick Start

```rust,no_run
use mint_machine_batch_tx::{BatchTxClient, BundleSubmitter};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{instruction::Instruction, signature::Keypair};
use std::sync::Arc;

# async fn example() -> Result<(), Box<dyn std::error::Error>> {
let rpc_client = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let payer = Keypair::new();
let client = BatchTxClient::new(rpc_client, payer);

let instructions: Vec<Instruction> = vec![/* your instructions */];
let signature = client.submit(instructions, &[]).await?;
println!("Bundle confirmed: {}", signature);
# Ok(())
# }
```

## Custom Configuration

```rust
# use mint_machine_batch_tx::{BatchTxClient, TxBatchConfig};
# use solana_client::nonblocking::rpc_client::RpcClient;
# use solana_sdk::signature::Keypair;
# use std::sync::Arc;
let rpc_client = Arc::new(RpcClient::new("https://api.devnet.solana.com".to_string()));
let config = TxBatchConfig {
    skip_preflight: true,
    max_retries: 3,
    ..Default::default()
};

let client = BatchTxClient::with_config(rpc_client, Keypair::new(), config);
```
*/

mod client;
mod config;
mod error;
mod submitter;

pub use client::{serialized_size, BatchTxClient};
pub use config::{TxBatchConfig, PACKET_DATA_SIZE};
pub use error::TxBatchError;
pub use submitter::BundleSubmitter;

// Re-export key Solana types for convenience
pub use solana_client::nonblocking::rpc_client::RpcClient;
pub use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
