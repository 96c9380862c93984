use crate::error::{CliError, CliResult};
use mint_machine_batch_tx::TxBatchConfig;
use mint_machine_client::{FailurePolicy, MachineSettings};
use mint_machine_sdk::{
    AddressFinder, BATCH_SIZE, DEFAULT_FEE_RECIPIENT, MAX_BUNDLE_INSTRUCTIONS, TOKEN_DECIMALS,
    WALLET_FUNDING_LAMPORTS,
};
use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Machine configuration file structure. Every field has a default, so an
/// empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Solana RPC URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Path to the payer / mint authority keypair file
    #[serde(default = "default_keypair_path")]
    pub keypair_path: PathBuf,

    /// Directory token metadata JSON is written to
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,

    #[serde(default)]
    pub provisioning: ProvisioningConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningConfig {
    /// Wallets per bundle
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_max_bundle_instructions")]
    pub max_bundle_instructions: usize,

    /// Base58 address that receives the provisioning fee
    #[serde(default = "default_fee_recipient")]
    pub fee_recipient: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Lamports sent to every provisioned wallet
    #[serde(default = "default_wallet_funding_lamports")]
    pub wallet_funding_lamports: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Blockhash fetch attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default)]
    pub skip_preflight: bool,

    #[serde(default = "default_true")]
    pub verify_balance_before_send: bool,

    #[serde(default = "default_max_transaction_size_bytes")]
    pub max_transaction_size_bytes: usize,

    /// processed, confirmed or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            keypair_path: default_keypair_path(),
            metadata_dir: default_metadata_dir(),
            provisioning: ProvisioningConfig::default(),
            submission: SubmissionConfig::default(),
        }
    }
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_bundle_instructions: default_max_bundle_instructions(),
            fee_recipient: default_fee_recipient(),
            decimals: default_decimals(),
            wallet_funding_lamports: default_wallet_funding_lamports(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            skip_preflight: false,
            verify_balance_before_send: default_true(),
            max_transaction_size_bytes: default_max_transaction_size_bytes(),
            commitment: default_commitment(),
        }
    }
}

impl MachineConfig {
    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)?;
                Self::from_yaml(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(contents: &str) -> CliResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn machine_settings(&self) -> CliResult<MachineSettings> {
        let provisioning = &self.provisioning;
        if provisioning.batch_size == 0 {
            return Err(CliError::InvalidConfig(
                "provisioning.batch_size must be greater than zero".to_string(),
            ));
        }

        let fee_recipient = Pubkey::from_str(&provisioning.fee_recipient).map_err(|e| {
            CliError::InvalidConfig(format!(
                "Invalid fee recipient {}: {}",
                provisioning.fee_recipient, e
            ))
        })?;

        Ok(MachineSettings {
            address_finder: AddressFinder::default(),
            batch_size: provisioning.batch_size,
            max_bundle_instructions: provisioning.max_bundle_instructions,
            fee_recipient,
            decimals: provisioning.decimals,
            wallet_funding_lamports: provisioning.wallet_funding_lamports,
            failure_policy: provisioning.failure_policy,
        })
    }

    pub fn tx_batch_config(&self) -> CliResult<TxBatchConfig> {
        let submission = &self.submission;
        let confirmation_commitment = CommitmentConfig::from_str(&submission.commitment)
            .map_err(|_| {
                CliError::InvalidConfig(format!(
                    "Unknown commitment level: {}",
                    submission.commitment
                ))
            })?;

        let config = TxBatchConfig {
            max_retries: submission.max_retries,
            confirmation_commitment,
            skip_preflight: submission.skip_preflight,
            verify_balance_before_send: submission.verify_balance_before_send,
            max_transaction_size_bytes: submission.max_transaction_size_bytes,
            ..TxBatchConfig::default()
        };
        config
            .validate()
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

        Ok(config)
    }
}

fn default_rpc_url() -> String {
    "https://api.devnet.solana.com".to_string()
}

fn default_keypair_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".config/solana/id.json")
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from("metadata")
}

fn default_batch_size() -> usize {
    BATCH_SIZE
}

fn default_max_bundle_instructions() -> usize {
    MAX_BUNDLE_INSTRUCTIONS
}

fn default_fee_recipient() -> String {
    DEFAULT_FEE_RECIPIENT.to_string()
}

fn default_decimals() -> u8 {
    TOKEN_DECIMALS
}

fn default_wallet_funding_lamports() -> u64 {
    WALLET_FUNDING_LAMPORTS
}

fn default_max_retries() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_transaction_size_bytes() -> usize {
    1200
}

fn default_commitment() -> String {
    "confirmed".to_string()
}
