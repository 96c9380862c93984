/*!
# Transaction Builders

This module assembles the instruction bundles submitted by the Mint Machine.
A bundle is an ordered, append-only list of logical instructions
([`BundleInstruction`]); each logical instruction expands to one or more
Solana instructions when the bundle is compiled into a transaction.

## Design Philosophy

- **Unsigned Output**: Builders return bundles or unsigned transactions; the
  submission client signs and sends them
- **Deterministic Order**: Provisioning bundles always start with the fee
  transfer, followed by one (mint, fund) pair per wallet in wallet order
- **Capacity Checked**: Appending past the bundle limit fails instead of
  producing a transaction the network would reject
- **RPC Independence**: No RPC calls here; the caller supplies rent and payer data

## Usage

```rust
use mint_machine_sdk::{build_provisioning_bundle, InstructionKind, ProvisioningBundleParams};
use solana_sdk::pubkey::Pubkey;

let payer = Pubkey::new_unique();
let params = ProvisioningBundleParams::new(payer, Pubkey::new_unique(), 5);
let wallets = vec![Pubkey::new_unique(), Pubkey::new_unique()];

let bundle = build_provisioning_bundle(&params, &wallets).expect("Failed to build bundle");
assert_eq!(
    bundle.kinds(),
    vec![
        InstructionKind::FeeTransfer,
        InstructionKind::Mint,
        InstructionKind::Fund,
        InstructionKind::Mint,
        InstructionKind::Fund,
    ]
);
```
*/

use crate::{
    batch_token_units, build_create_mint_ixs, build_create_token_account_if_missing_ix,
    build_fee_transfer_ix, build_fund_wallet_ix, build_mint_to_owner_ix,
    build_transfer_tokens_ix, price_in_lamports, to_base_units, AddressFinder,
    DEFAULT_FEE_RECIPIENT, MAX_BUNDLE_INSTRUCTIONS, TOKEN_DECIMALS, WALLET_FUNDING_LAMPORTS,
};
use solana_sdk::{
    hash::Hash, instruction::Instruction, message::Message, pubkey::Pubkey,
    transaction::Transaction,
};

/// Errors that can occur during bundle building
#[derive(Debug, PartialEq)]
pub enum BundleError {
    InvalidInput(String),
    OverCapacity { attempted: usize, max: usize },
    InstructionBuilder(String),
    Pricing(String),
}

impl std::fmt::Display for BundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BundleError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            BundleError::OverCapacity { attempted, max } => write!(
                f,
                "Bundle over capacity: {} instructions (max {})",
                attempted, max
            ),
            BundleError::InstructionBuilder(msg) => {
                write!(f, "Instruction building failed: {}", msg)
            }
            BundleError::Pricing(msg) => write!(f, "Fee pricing failed: {}", msg),
        }
    }
}

impl std::error::Error for BundleError {}

pub type BundleResult<T> = Result<T, BundleError>;

/// What a logical bundle instruction does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    CreateMint,
    FeeTransfer,
    Mint,
    Fund,
    CreateTokenIfMissing,
    TransferTokens,
}

/// One logical instruction and the Solana instructions that realise it
#[derive(Debug, Clone, PartialEq)]
pub struct BundleInstruction {
    pub kind: InstructionKind,
    pub instructions: Vec<Instruction>,
}

impl BundleInstruction {
    pub fn new(kind: InstructionKind, instructions: Vec<Instruction>) -> Self {
        Self { kind, instructions }
    }

    pub fn single(kind: InstructionKind, instruction: Instruction) -> Self {
        Self::new(kind, vec![instruction])
    }
}

/// Ordered, append-only list of logical instructions submitted as one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionBundle {
    entries: Vec<BundleInstruction>,
    max_instructions: usize,
}

impl Default for InstructionBundle {
    fn default() -> Self {
        Self::with_capacity_limit(MAX_BUNDLE_INSTRUCTIONS)
    }
}

impl InstructionBundle {
    pub fn with_capacity_limit(max_instructions: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_instructions,
        }
    }

    /// Append a logical instruction, failing if the bundle is already full
    pub fn push(&mut self, entry: BundleInstruction) -> BundleResult<()> {
        self.ensure_room_for(1)?;
        self.entries.push(entry);
        Ok(())
    }

    /// Fail early if `additional` more entries would not fit
    pub fn ensure_room_for(&self, additional: usize) -> BundleResult<()> {
        let attempted = self.entries.len() + additional;
        if attempted > self.max_instructions {
            return Err(BundleError::OverCapacity {
                attempted,
                max: self.max_instructions,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BundleInstruction] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<InstructionKind> {
        self.entries.iter().map(|entry| entry.kind).collect()
    }

    /// Number of Solana instructions the bundle compiles to
    pub fn compiled_instruction_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.instructions.len()).sum()
    }

    /// Flatten into Solana instructions, preserving order
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.entries
            .into_iter()
            .flat_map(|entry| entry.instructions)
            .collect()
    }

    /// Compile into an unsigned transaction
    pub fn into_transaction(
        self,
        payer: &Pubkey,
        recent_blockhash: Hash,
    ) -> BundleResult<Transaction> {
        if self.is_empty() {
            return Err(BundleError::InvalidInput(
                "Cannot create transaction with no instructions".to_string(),
            ));
        }

        let message = Message::new(&self.into_instructions(), Some(payer));
        let mut transaction = Transaction::new_unsigned(message);
        transaction.message.recent_blockhash = recent_blockhash;

        Ok(transaction)
    }
}

/// Everything needed to build a provisioning bundle besides the wallets themselves
#[derive(Debug, Clone)]
pub struct ProvisioningBundleParams {
    pub address_finder: AddressFinder,
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub mint_authority: Pubkey,
    pub fee_recipient: Pubkey,
    /// Whole tokens credited to every wallet
    pub tokens_per_wallet: u64,
    pub decimals: u8,
    pub wallet_funding_lamports: u64,
    pub max_instructions: usize,
}

impl ProvisioningBundleParams {
    /// Defaults: payer is the mint authority, standard fee recipient, decimals and funding
    pub fn new(payer: Pubkey, mint: Pubkey, tokens_per_wallet: u64) -> Self {
        Self {
            address_finder: AddressFinder::default(),
            payer,
            mint,
            mint_authority: payer,
            fee_recipient: DEFAULT_FEE_RECIPIENT,
            tokens_per_wallet,
            decimals: TOKEN_DECIMALS,
            wallet_funding_lamports: WALLET_FUNDING_LAMPORTS,
            max_instructions: MAX_BUNDLE_INSTRUCTIONS,
        }
    }
}

/// Service fee in lamports for a batch of `wallet_count` wallets
pub fn provisioning_fee_lamports(wallet_count: usize, tokens_per_wallet: u64) -> BundleResult<u64> {
    let units = batch_token_units(wallet_count, tokens_per_wallet)
        .map_err(|e| BundleError::Pricing(e.to_string()))?;
    price_in_lamports(units).map_err(|e| BundleError::Pricing(e.to_string()))
}

/// Build the bundle that provisions `wallets`: fee transfer first, then (mint, fund) per wallet
pub fn build_provisioning_bundle(
    params: &ProvisioningBundleParams,
    wallets: &[Pubkey],
) -> BundleResult<InstructionBundle> {
    if wallets.is_empty() {
        return Err(BundleError::InvalidInput(
            "Cannot provision an empty batch of wallets".to_string(),
        ));
    }

    let mut bundle = InstructionBundle::with_capacity_limit(params.max_instructions);
    bundle.ensure_room_for(1 + 2 * wallets.len())?;

    let fee_lamports = provisioning_fee_lamports(wallets.len(), params.tokens_per_wallet)?;
    bundle.push(BundleInstruction::single(
        InstructionKind::FeeTransfer,
        build_fee_transfer_ix(&params.payer, &params.fee_recipient, fee_lamports),
    ))?;

    let amount = to_base_units(params.tokens_per_wallet, params.decimals)
        .map_err(|e| BundleError::Pricing(e.to_string()))?;

    for wallet in wallets {
        bundle.push(build_mint_entry(
            &params.address_finder,
            &params.payer,
            &params.mint,
            &params.mint_authority,
            wallet,
            amount,
            params.decimals,
        )?)?;

        bundle.push(BundleInstruction::single(
            InstructionKind::Fund,
            build_fund_wallet_ix(&params.payer, wallet, params.wallet_funding_lamports),
        ))?;
    }

    Ok(bundle)
}

/// Mint whole `tokens` into the mint authority's own token account
pub fn build_mint_tokens_bundle(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    tokens: u64,
    decimals: u8,
) -> BundleResult<InstructionBundle> {
    let amount =
        to_base_units(tokens, decimals).map_err(|e| BundleError::Pricing(e.to_string()))?;

    let mut bundle = InstructionBundle::default();
    bundle.push(build_mint_entry(
        address_finder,
        payer,
        mint,
        mint_authority,
        mint_authority,
        amount,
        decimals,
    )?)?;

    Ok(bundle)
}

/// Create a new mint plus the authority's token account. The mint keypair must co-sign.
pub fn build_create_token_bundle(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    decimals: u8,
    rent_exempt_lamports: u64,
) -> BundleResult<InstructionBundle> {
    let create_mint_ixs = build_create_mint_ixs(
        address_finder,
        payer,
        mint,
        mint_authority,
        decimals,
        rent_exempt_lamports,
    )
    .map_err(|e| BundleError::InstructionBuilder(e.to_string()))?;

    let mut bundle = InstructionBundle::default();
    bundle.push(BundleInstruction::new(
        InstructionKind::CreateMint,
        create_mint_ixs,
    ))?;
    bundle.push(BundleInstruction::single(
        InstructionKind::CreateTokenIfMissing,
        build_create_token_account_if_missing_ix(address_finder, payer, mint, mint_authority),
    ))?;

    Ok(bundle)
}

/// Create the recipient's token account if missing, then transfer `amount` base units
pub fn build_token_transfer_bundle(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    sender: &Pubkey,
    recipient: &Pubkey,
    amount: u64,
    decimals: u8,
) -> BundleResult<InstructionBundle> {
    let transfer_ix =
        build_transfer_tokens_ix(address_finder, mint, sender, recipient, amount, decimals)
            .map_err(|e| BundleError::InstructionBuilder(e.to_string()))?;

    let mut bundle = InstructionBundle::default();
    bundle.push(BundleInstruction::single(
        InstructionKind::CreateTokenIfMissing,
        build_create_token_account_if_missing_ix(address_finder, payer, mint, recipient),
    ))?;
    bundle.push(BundleInstruction::single(
        InstructionKind::TransferTokens,
        transfer_ix,
    ))?;

    Ok(bundle)
}

// A mint credits an associated token account, which has to exist first.
fn build_mint_entry(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> BundleResult<BundleInstruction> {
    let mint_to_ix =
        build_mint_to_owner_ix(address_finder, mint, mint_authority, owner, amount, decimals)
            .map_err(|e| BundleError::InstructionBuilder(e.to_string()))?;

    Ok(BundleInstruction::new(
        InstructionKind::Mint,
        vec![
            build_create_token_account_if_missing_ix(address_finder, payer, mint, owner),
            mint_to_ix,
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BATCH_SIZE;
    use solana_sdk::{signature::Keypair, signer::Signer, system_instruction};

    fn unique_wallets(count: usize) -> Vec<Pubkey> {
        (0..count).map(|_| Pubkey::new_unique()).collect()
    }

    #[test]
    fn test_full_batch_ordering() {
        let payer = Keypair::new().pubkey();
        let params = ProvisioningBundleParams::new(payer, Pubkey::new_unique(), 5);
        let wallets = unique_wallets(BATCH_SIZE);

        let bundle = build_provisioning_bundle(&params, &wallets).unwrap();

        assert_eq!(bundle.len(), 1 + 2 * BATCH_SIZE);
        assert_eq!(bundle.entries()[0].kind, InstructionKind::FeeTransfer);
        for (i, wallet) in wallets.iter().enumerate() {
            let mint_entry = &bundle.entries()[1 + 2 * i];
            let fund_entry = &bundle.entries()[2 + 2 * i];

            assert_eq!(mint_entry.kind, InstructionKind::Mint);
            assert_eq!(
                mint_entry.instructions[1].accounts[1].pubkey,
                params
                    .address_finder
                    .find_associated_token_address(&params.mint, wallet)
            );

            assert_eq!(fund_entry.kind, InstructionKind::Fund);
            assert_eq!(
                fund_entry.instructions,
                vec![system_instruction::transfer(&payer, wallet, WALLET_FUNDING_LAMPORTS)]
            );
        }
    }

    #[test]
    fn test_fee_is_priced_on_batch_output() {
        let payer = Pubkey::new_unique();
        let params = ProvisioningBundleParams::new(payer, Pubkey::new_unique(), 5);

        let bundle = build_provisioning_bundle(&params, &unique_wallets(3)).unwrap();
        let fee_ix = &bundle.entries()[0].instructions[0];

        // 3 wallets * 5 tokens = 15 tokens -> 1500 lamports
        assert_eq!(
            *fee_ix,
            system_instruction::transfer(&payer, &DEFAULT_FEE_RECIPIENT, 1_500)
        );
    }

    #[test]
    fn test_mint_amount_is_scaled_by_decimals() {
        let params = ProvisioningBundleParams::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);
        let bundle = build_provisioning_bundle(&params, &unique_wallets(1)).unwrap();

        let mint_to_ix = &bundle.entries()[1].instructions[1];
        assert_eq!(
            spl_token::instruction::TokenInstruction::unpack(&mint_to_ix.data).unwrap(),
            spl_token::instruction::TokenInstruction::MintToChecked {
                amount: 5_000,
                decimals: TOKEN_DECIMALS
            }
        );
    }

    #[test]
    fn test_over_capacity_batch_rejected() {
        let params = ProvisioningBundleParams::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);

        let result = build_provisioning_bundle(&params, &unique_wallets(BATCH_SIZE + 1));

        assert_eq!(
            result.unwrap_err(),
            BundleError::OverCapacity {
                attempted: 1 + 2 * (BATCH_SIZE + 1),
                max: MAX_BUNDLE_INSTRUCTIONS
            }
        );
    }

    #[test]
    fn test_push_past_limit_fails() {
        let mut bundle = InstructionBundle::with_capacity_limit(1);
        let ix = build_fund_wallet_ix(&Pubkey::new_unique(), &Pubkey::new_unique(), 1);

        bundle
            .push(BundleInstruction::single(InstructionKind::Fund, ix.clone()))
            .unwrap();
        let result = bundle.push(BundleInstruction::single(InstructionKind::Fund, ix));

        assert!(result.unwrap_err().to_string().contains("over capacity"));
        assert_eq!(bundle.len(), 1);
    }

    #[test]
    fn test_empty_wallet_batch_rejected() {
        let params = ProvisioningBundleParams::new(Pubkey::new_unique(), Pubkey::new_unique(), 5);
        assert!(matches!(
            build_provisioning_bundle(&params, &[]),
            Err(BundleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_transfer_bundle_has_two_entries_in_order() {
        let finder = AddressFinder::default();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let bundle =
            build_token_transfer_bundle(&finder, &payer, &mint, &payer, &recipient, 5_000, 3)
                .unwrap();

        assert_eq!(
            bundle.kinds(),
            vec![
                InstructionKind::CreateTokenIfMissing,
                InstructionKind::TransferTokens
            ]
        );
        assert_eq!(bundle.compiled_instruction_count(), 2);
    }

    #[test]
    fn test_into_transaction_compiles_all_instructions() {
        let payer = Keypair::new();
        let params = ProvisioningBundleParams::new(payer.pubkey(), Pubkey::new_unique(), 5);
        let bundle = build_provisioning_bundle(&params, &unique_wallets(2)).unwrap();
        let compiled = bundle.compiled_instruction_count();
        let recent_blockhash = Hash::new_unique();

        let tx = bundle.into_transaction(&payer.pubkey(), recent_blockhash).unwrap();

        // fee + 2 * (create ata + mint_to) + 2 * fund
        assert_eq!(compiled, 7);
        assert_eq!(tx.message.instructions.len(), compiled);
        assert_eq!(tx.message.recent_blockhash, recent_blockhash);
        assert_eq!(tx.message.header.num_required_signatures, 1);
    }

    #[test]
    fn test_empty_bundle_cannot_become_transaction() {
        let result = InstructionBundle::default().into_transaction(&Pubkey::new_unique(), Hash::default());
        assert!(result.unwrap_err().to_string().contains("no instructions"));
    }

    #[test]
    fn test_create_token_bundle_requires_mint_signature() {
        let finder = AddressFinder::default();
        let payer = Keypair::new();
        let mint = Keypair::new();

        let bundle = build_create_token_bundle(
            &finder,
            &payer.pubkey(),
            &mint.pubkey(),
            &payer.pubkey(),
            TOKEN_DECIMALS,
            1_461_600,
        )
        .unwrap();
        assert_eq!(
            bundle.kinds(),
            vec![InstructionKind::CreateMint, InstructionKind::CreateTokenIfMissing]
        );

        let tx = bundle.into_transaction(&payer.pubkey(), Hash::default()).unwrap();
        assert_eq!(tx.message.header.num_required_signatures, 2);
    }

    #[test]
    fn test_mint_tokens_bundle_targets_authority() {
        let finder = AddressFinder::default();
        let authority = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let bundle =
            build_mint_tokens_bundle(&finder, &authority, &mint, &authority, 10, 3).unwrap();

        assert_eq!(bundle.kinds(), vec![InstructionKind::Mint]);
        assert_eq!(
            bundle.entries()[0].instructions[1].accounts[1].pubkey,
            finder.find_associated_token_address(&mint, &authority)
        );
    }
}
