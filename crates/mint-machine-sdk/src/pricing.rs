/*!
# Provisioning Fee Pricing

The machine charges a small SOL fee for every token it mints into a
provisioned wallet. Pricing is done in `rust_decimal` so that the conversion
from SOL to lamports is exact, and the result is always rounded up: the fee
can overcharge by less than one lamport but never undercharge.

```rust
use mint_machine_sdk::price_in_lamports;

// 0.0000001 SOL per token, 1e9 lamports per SOL
assert_eq!(price_in_lamports(1).unwrap(), 100);
assert_eq!(price_in_lamports(35).unwrap(), 3_500);
```
*/

use rust_decimal::prelude::*;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use thiserror::Error;

/// Price of one token unit in SOL (0.0000001 SOL)
pub const PRICE_PER_TOKEN_SOL: Decimal = Decimal::from_parts(1, 0, 0, false, 7);

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("Calculation overflow: {0}")]
    Overflow(String),
}

pub type PricingResult<T> = Result<T, PricingError>;

/// Fee in lamports for minting `units` tokens: `ceil(units * PRICE_PER_TOKEN_SOL * LAMPORTS_PER_SOL)`
pub fn price_in_lamports(units: u64) -> PricingResult<u64> {
    price_in_lamports_with_rate(units, PRICE_PER_TOKEN_SOL)
}

/// Same as [`price_in_lamports`] with a caller-supplied SOL price per token
pub fn price_in_lamports_with_rate(units: u64, price_per_token_sol: Decimal) -> PricingResult<u64> {
    let lamports = Decimal::from(units)
        .checked_mul(price_per_token_sol)
        .and_then(|sol| sol.checked_mul(Decimal::from(LAMPORTS_PER_SOL)))
        .ok_or_else(|| {
            PricingError::Overflow(format!(
                "{} tokens at {} SOL each does not fit in a Decimal",
                units, price_per_token_sol
            ))
        })?;

    lamports.ceil().to_u64().ok_or_else(|| {
        PricingError::Overflow(format!("Fee of {} lamports does not fit in u64", lamports))
    })
}

/// Token units produced by one batch: wallets in the batch × tokens per wallet
pub fn batch_token_units(wallet_count: usize, tokens_per_wallet: u64) -> PricingResult<u64> {
    (wallet_count as u64)
        .checked_mul(tokens_per_wallet)
        .ok_or_else(|| {
            PricingError::Overflow(format!(
                "{} wallets × {} tokens overflows u64",
                wallet_count, tokens_per_wallet
            ))
        })
}

/// Convert whole tokens to base units for a mint with `decimals` decimals
pub fn to_base_units(tokens: u64, decimals: u8) -> PricingResult<u64> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|scale| tokens.checked_mul(scale))
        .ok_or_else(|| {
            PricingError::Overflow(format!(
                "{} tokens at {} decimals overflows u64",
                tokens, decimals
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_price_of_one_token() {
        // ceil(1 * 1e-7 * 1e9) = ceil(100) = 100
        assert_eq!(price_in_lamports(1).unwrap(), 100);
    }

    #[test]
    fn test_price_of_zero_tokens() {
        assert_eq!(price_in_lamports(0).unwrap(), 0);
    }

    #[test]
    fn test_price_rounds_up_fractional_lamports() {
        // 0.0000000015 SOL per token -> 1.5 lamports per token
        let rate = dec!(0.0000000015);
        assert_eq!(price_in_lamports_with_rate(1, rate).unwrap(), 2);
        assert_eq!(price_in_lamports_with_rate(2, rate).unwrap(), 3);
        assert_eq!(price_in_lamports_with_rate(3, rate).unwrap(), 5);
    }

    #[test]
    fn test_price_never_below_exact_fee() {
        let rate = dec!(0.0000000003);
        for units in 0..500u64 {
            let exact = Decimal::from(units) * rate * Decimal::from(LAMPORTS_PER_SOL);
            let charged = price_in_lamports_with_rate(units, rate).unwrap();
            assert!(Decimal::from(charged) >= exact, "undercharged {} units", units);
            assert!(Decimal::from(charged) - exact < Decimal::ONE);
        }
    }

    #[test]
    fn test_price_is_monotonic() {
        let mut previous = 0;
        for units in 0..1_000u64 {
            let price = price_in_lamports(units).unwrap();
            assert!(price >= previous);
            previous = price;
        }
    }

    #[test]
    fn test_price_overflow_is_reported() {
        let result = price_in_lamports_with_rate(u64::MAX, dec!(1000));
        assert!(matches!(result, Err(PricingError::Overflow(_))));
    }

    #[test]
    fn test_batch_token_units() {
        assert_eq!(batch_token_units(7, 5).unwrap(), 35);
        assert_eq!(batch_token_units(0, 5).unwrap(), 0);
        assert!(batch_token_units(2, u64::MAX).is_err());
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units(5, 3).unwrap(), 5_000);
        assert_eq!(to_base_units(5, 0).unwrap(), 5);
        assert!(to_base_units(u64::MAX, 3).is_err());
    }
}
