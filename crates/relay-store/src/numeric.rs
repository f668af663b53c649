use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::StoreError;

/// `U256` values (gas prices, block numbers) are stored as `NUMERIC` so
/// arbitrarily large wei amounts round-trip exactly; `rust_decimal`'s
/// 96-bit mantissa comfortably covers any gas price or block number this
/// service will ever see, though not the full `U256` range.
pub fn u256_to_decimal(value: U256) -> Result<Decimal, StoreError> {
    Decimal::from_str(&value.to_string())
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

pub fn decimal_to_u256(value: Decimal) -> Result<U256, StoreError> {
    U256::from_str(&value.trunc().to_string())
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

pub fn u64_to_decimal(value: u64) -> Decimal {
    Decimal::from(value)
}

pub fn decimal_to_u64(value: Decimal) -> Result<u64, StoreError> {
    value.trunc().to_string().parse().map_err(|e: std::num::ParseIntError| {
        StoreError::Database(sqlx::Error::Decode(Box::new(e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_round_trips_through_decimal() {
        let value = U256::from(123_456_789_012_345u64);
        let decimal = u256_to_decimal(value).unwrap();
        assert_eq!(decimal_to_u256(decimal).unwrap(), value);
    }

    #[test]
    fn u64_round_trips_through_decimal() {
        let value = 42u64;
        assert_eq!(decimal_to_u64(u64_to_decimal(value)).unwrap(), value);
    }
}
