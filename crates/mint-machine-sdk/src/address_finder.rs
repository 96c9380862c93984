use solana_sdk::{pubkey::Pubkey, system_program::ID as SYSTEM_PROGRAM_ID};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, ID as ASSOCIATED_TOKEN_PROGRAM_ID,
};
use spl_token::ID as TOKEN_PROGRAM_ID;

/// Program ids the machine builds instructions against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFinder {
    pub associated_token_program_id: Pubkey,
    pub system_program_id: Pubkey,
    pub token_program_id: Pubkey,
}

impl Default for AddressFinder {
    fn default() -> Self {
        Self {
            associated_token_program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
            system_program_id: SYSTEM_PROGRAM_ID,
            token_program_id: TOKEN_PROGRAM_ID,
        }
    }
}

impl AddressFinder {
    pub fn new(
        associated_token_program_id: Pubkey,
        system_program_id: Pubkey,
        token_program_id: Pubkey,
    ) -> Self {
        Self {
            associated_token_program_id,
            system_program_id,
            token_program_id,
        }
    }

    /// Associated token account holding `owner`'s balance of `mint`.
    /// The account may not exist yet; the address is predicted either way.
    pub fn find_associated_token_address(&self, mint: &Pubkey, owner: &Pubkey) -> Pubkey {
        get_associated_token_address_with_program_id(owner, mint, &self.token_program_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associated_token_address_is_deterministic() {
        let finder = AddressFinder::default();
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let first = finder.find_associated_token_address(&mint, &owner);
        let second = finder.find_associated_token_address(&mint, &owner);

        assert_eq!(first, second);
        assert_eq!(
            first,
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
    }

    #[test]
    fn test_associated_token_address_depends_on_owner() {
        let finder = AddressFinder::default();
        let mint = Pubkey::new_unique();

        assert_ne!(
            finder.find_associated_token_address(&mint, &Pubkey::new_unique()),
            finder.find_associated_token_address(&mint, &Pubkey::new_unique())
        );
    }
}
