mod mock_submitter;
mod recording_notifier;
mod test_fixture;

pub use mock_submitter::{MockSubmitter, Submission, MOCK_RENT_EXEMPT_LAMPORTS};
pub use recording_notifier::RecordingNotifier;
pub use test_fixture::TestFixture;

use {
    solana_sdk::{instruction::Instruction, pubkey::Pubkey},
    spl_token::instruction::TokenInstruction,
};

/// Decoded `mint_to_checked` / `transfer_checked` amount and decimals, if `ix` is one
pub fn checked_token_amount(ix: &Instruction) -> Option<(u64, u8)> {
    if ix.program_id != spl_token::ID {
        return None;
    }

    match TokenInstruction::unpack(&ix.data).ok()? {
        TokenInstruction::MintToChecked { amount, decimals }
        | TokenInstruction::TransferChecked { amount, decimals } => Some((amount, decimals)),
        _ => None,
    }
}

/// Whether `ix` creates `owner`'s associated token account for `mint` (idempotent form)
pub fn is_create_token_account_ix(ix: &Instruction, mint: &Pubkey, owner: &Pubkey) -> bool {
    let expected_address =
        spl_associated_token_account::get_associated_token_address(owner, mint);

    ix.program_id == spl_associated_token_account::ID
        && ix.data == [1]
        && ix.accounts.get(1).map(|meta| meta.pubkey) == Some(expected_address)
        && ix.accounts.get(2).map(|meta| meta.pubkey) == Some(*owner)
        && ix.accounts.get(3).map(|meta| meta.pubkey) == Some(*mint)
}
