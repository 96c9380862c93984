use crate::AddressFinder;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::{
    solana_program::{program_error::ProgramError, program_pack::Pack},
    state::Mint,
};

pub type InstructionResult<T> = Result<T, ProgramError>;

/// Size of an SPL mint account
pub const MINT_ACCOUNT_LEN: usize = Mint::LEN;

pub fn build_fee_transfer_ix(payer: &Pubkey, fee_recipient: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(payer, fee_recipient, lamports)
}

pub fn build_fund_wallet_ix(payer: &Pubkey, wallet: &Pubkey, lamports: u64) -> Instruction {
    system_instruction::transfer(payer, wallet, lamports)
}

/// Create `owner`'s associated token account for `mint`; a no-op on chain if it already exists
pub fn build_create_token_account_if_missing_ix(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Instruction {
    create_associated_token_account_idempotent(
        payer,
        owner,
        mint,
        &address_finder.token_program_id,
    )
}

/// Mint `amount` base units into `owner`'s associated token account
pub fn build_mint_to_owner_ix(
    address_finder: &AddressFinder,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> InstructionResult<Instruction> {
    let destination = address_finder.find_associated_token_address(mint, owner);

    spl_token::instruction::mint_to_checked(
        &address_finder.token_program_id,
        mint,
        &destination,
        mint_authority,
        &[],
        amount,
        decimals,
    )
}

/// Move `amount` base units between the associated token accounts of two owners
pub fn build_transfer_tokens_ix(
    address_finder: &AddressFinder,
    mint: &Pubkey,
    source_owner: &Pubkey,
    destination_owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> InstructionResult<Instruction> {
    let source = address_finder.find_associated_token_address(mint, source_owner);
    let destination = address_finder.find_associated_token_address(mint, destination_owner);

    spl_token::instruction::transfer_checked(
        &address_finder.token_program_id,
        &source,
        mint,
        &destination,
        source_owner,
        &[],
        amount,
        decimals,
    )
}

/// Allocate and initialize a new mint account. `mint` must sign the transaction.
pub fn build_create_mint_ixs(
    address_finder: &AddressFinder,
    payer: &Pubkey,
    mint: &Pubkey,
    mint_authority: &Pubkey,
    decimals: u8,
    rent_exempt_lamports: u64,
) -> InstructionResult<Vec<Instruction>> {
    let create_account_ix = system_instruction::create_account(
        payer,
        mint,
        rent_exempt_lamports,
        MINT_ACCOUNT_LEN as u64,
        &address_finder.token_program_id,
    );

    let initialize_mint_ix = spl_token::instruction::initialize_mint2(
        &address_finder.token_program_id,
        mint,
        mint_authority,
        None,
        decimals,
    )?;

    Ok(vec![create_account_ix, initialize_mint_ix])
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::instruction::TokenInstruction;

    #[test]
    fn test_mint_to_targets_owner_token_account() {
        let finder = AddressFinder::default();
        let mint = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ix = build_mint_to_owner_ix(&finder, &mint, &authority, &owner, 5_000, 3).unwrap();

        assert_eq!(ix.program_id, spl_token::ID);
        assert_eq!(ix.accounts[0].pubkey, mint);
        assert_eq!(
            ix.accounts[1].pubkey,
            finder.find_associated_token_address(&mint, &owner)
        );
        assert_eq!(ix.accounts[2].pubkey, authority);
        assert!(ix.accounts[2].is_signer);
        assert_eq!(
            TokenInstruction::unpack(&ix.data).unwrap(),
            TokenInstruction::MintToChecked {
                amount: 5_000,
                decimals: 3
            }
        );
    }

    #[test]
    fn test_transfer_uses_both_token_accounts() {
        let finder = AddressFinder::default();
        let mint = Pubkey::new_unique();
        let sender = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();

        let ix = build_transfer_tokens_ix(&finder, &mint, &sender, &recipient, 42, 3).unwrap();

        assert_eq!(
            ix.accounts[0].pubkey,
            finder.find_associated_token_address(&mint, &sender)
        );
        assert_eq!(ix.accounts[1].pubkey, mint);
        assert_eq!(
            ix.accounts[2].pubkey,
            finder.find_associated_token_address(&mint, &recipient)
        );
        assert_eq!(ix.accounts[3].pubkey, sender);
    }

    #[test]
    fn test_create_token_account_if_missing_is_idempotent_variant() {
        let finder = AddressFinder::default();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ix = build_create_token_account_if_missing_ix(&finder, &payer, &mint, &owner);

        assert_eq!(ix.program_id, finder.associated_token_program_id);
        // AssociatedTokenAccountInstruction::CreateIdempotent
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts[0].pubkey, payer);
        assert_eq!(
            ix.accounts[1].pubkey,
            finder.find_associated_token_address(&mint, &owner)
        );
    }

    #[test]
    fn test_create_mint_allocates_mint_sized_account() {
        let finder = AddressFinder::default();
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let ixs = build_create_mint_ixs(&finder, &payer, &mint, &payer, 3, 1_461_600).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, finder.system_program_id);
        assert_eq!(ixs[1].program_id, finder.token_program_id);
        assert_eq!(ixs[1].accounts[0].pubkey, mint);
    }
}
