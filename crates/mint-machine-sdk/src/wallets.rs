/*!
# Consumable Wallet Derivation

Every provisioned wallet starts life as 128 bits of OS entropy, encoded as a
12-word BIP-39 recovery phrase. The phrase is stretched into the standard
64-byte BIP-39 seed (empty passphrase) and the first 32 bytes of that seed are
used as the ed25519 secret key. Re-deriving from the phrase therefore always
yields the same address, which is what lets an operator hand the phrase to
whoever ends up holding the wallet.
*/

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{keypair_from_seed, Keypair},
    signer::Signer,
};
use std::fmt;
use thiserror::Error;

/// Entropy for a 12-word phrase
const ENTROPY_BYTES: usize = 16;

/// ed25519 only accepts a 32-byte seed
const KEYPAIR_SEED_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Invalid recovery phrase: {0}")]
    InvalidMnemonic(String),

    #[error("Keypair derivation failed: {0}")]
    KeyDerivation(String),
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// A freshly generated wallet: the phrase plus the keypair it derives to
pub struct GeneratedWallet {
    pub recovery_phrase: String,
    pub keypair: Keypair,
}

impl GeneratedWallet {
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Drop the secret key, keeping only what the operator needs to see
    pub fn record(&self) -> WalletRecord {
        WalletRecord {
            recovery_phrase: self.recovery_phrase.clone(),
            public_address: self.keypair.pubkey(),
        }
    }
}

/// What the operator is shown for a provisioned wallet. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletRecord {
    pub recovery_phrase: String,
    pub public_address: Pubkey,
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("recovery_phrase", &"<redacted>")
            .field("public_address", &self.public_address)
            .finish()
    }
}

/// Generate a new recovery phrase from OS entropy and derive its keypair
pub fn generate_wallet() -> GenerationResult<GeneratedWallet> {
    let mut entropy = [0u8; ENTROPY_BYTES];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| GenerationError::EntropyUnavailable(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy(&entropy)
        .map_err(|e| GenerationError::InvalidMnemonic(e.to_string()))?;
    let keypair = keypair_from_mnemonic(&mnemonic)?;

    Ok(GeneratedWallet {
        recovery_phrase: mnemonic.to_string(),
        keypair,
    })
}

/// Generate `count` independent wallets
pub fn generate_wallets(count: usize) -> GenerationResult<Vec<GeneratedWallet>> {
    (0..count).map(|_| generate_wallet()).collect()
}

/// Re-derive the keypair behind an existing recovery phrase
pub fn derive_keypair(recovery_phrase: &str) -> GenerationResult<Keypair> {
    let mnemonic = Mnemonic::parse(recovery_phrase)
        .map_err(|e| GenerationError::InvalidMnemonic(e.to_string()))?;
    keypair_from_mnemonic(&mnemonic)
}

fn keypair_from_mnemonic(mnemonic: &Mnemonic) -> GenerationResult<Keypair> {
    let seed = mnemonic.to_seed("");
    keypair_from_seed(&seed[..KEYPAIR_SEED_BYTES])
        .map_err(|e| GenerationError::KeyDerivation(e.to_string()))
}
