use solana_sdk::{pubkey, pubkey::Pubkey};

/// Number of consumable wallets provisioned per transaction bundle
pub const BATCH_SIZE: usize = 7;

/// Maximum logical instructions per bundle (1 fee + 7 × (mint, fund) = 15 fits)
pub const MAX_BUNDLE_INSTRUCTIONS: usize = 16;

/// Decimals of the fungible token created by the machine
pub const TOKEN_DECIMALS: u8 = 3;

/// Lamports sent to every provisioned wallet so it can pay its own fees (0.001 SOL)
pub const WALLET_FUNDING_LAMPORTS: u64 = 1_000_000;

/// Default recipient of the provisioning service fee
pub const DEFAULT_FEE_RECIPIENT: Pubkey = pubkey!("3moPQrUksj91Pu1LWCAWH8FzQEEQocwBbMCmC1Rc1EaM");
