// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use primitive_types::H160;
pub use primitive_types::U256;
use thiserror::Error;

use super::{
    client::ClientError,
    comptroller::ComptrollerErrorCode,
};

/// 20-byte EVM account or contract address
pub type Address = H160;

/// Unsigned fixed-point value with 1e18 as one.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mantissa(U256);

impl Mantissa {
    pub fn zero() -> Self {
        Mantissa(U256::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Mantissa> for U256 {
    fn from(value: Mantissa) -> Self {
        value.0
    }
}

impl From<U256> for Mantissa {
    fn from(value: U256) -> Self {
        Mantissa(value)
    }
}

macro_rules! construct_from {
    ( $( $type:ident ),* ) => {
        $(
            impl TryFrom<Mantissa> for $type {
                type Error = &'static str;
                #[inline]
                fn try_from(value: Mantissa) -> core::result::Result<Self, Self::Error> {
                    Self::try_from(value.0)
                }
            }

            impl From<$type> for Mantissa {
                fn from(value: $type) -> Mantissa {
                    Mantissa(U256::from(value))
                }
            }
        )*
    };
}

construct_from!(u8, u16, u32, u64, u128, usize);

/// Parses a textual address, with or without the `0x` prefix.
///
/// Mixed-case input is accepted without verifying an EIP-55 checksum.
pub fn parse_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 40 {
        return Err(Error::InvalidAddress(input.to_string()))
    }
    let bytes = hex::decode(digits).map_err(|_| Error::InvalidAddress(input.to_string()))?;
    Ok(Address::from_slice(&bytes))
}

/// Full lowercase `0x`-prefixed form of an address
pub fn format_address(address: &Address) -> String {
    format!("{:#x}", address)
}

/// An asset listed in a pool, priced in USD
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsdPricedFuseAsset {
    pub ctoken: Address,
    pub underlying_token: Address,
    pub underlying_symbol: String,
    pub underlying_name: String,
    pub underlying_decimals: u8,
    pub supply_balance_usd: f64,
    pub borrow_balance_usd: f64,
    pub total_supply_usd: f64,
    pub total_borrow_usd: f64,
    pub liquidity_usd: f64,
    pub collateral_factor: Mantissa,
}

/// A Fuse pool as listed by the directory
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pool {
    pub pool_id: u64,
    pub name: String,
    pub comptroller: Address,
    pub oracle: Address,
    pub oracle_model: Option<String>,
    pub assets: Vec<UsdPricedFuseAsset>,
}

/// Comptroller state shown on the pool configuration screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PoolConfig {
    pub admin: Address,
    pub pending_admin: Address,
    /// Whether the admin may still upgrade and reconfigure the pool
    pub admin_has_rights: bool,
    pub enforce_whitelist: bool,
    pub whitelist: Vec<Address>,
    pub close_factor: Mantissa,
    /// Stored as `1 + incentive`
    pub liquidation_incentive: Mantissa,
    pub default_oracle: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsDistributor {
    pub address: Address,
    pub admin: Address,
    pub reward_token: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenData {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub logo_url: Option<String>,
}

/// Custom error definitions for pool administration
#[derive(Debug, Error)]
pub enum Error {
    #[error("This is not a valid address.")]
    InvalidAddress(String),
    #[error("{message} Code: {code}")]
    Comptroller {
        message: String,
        code: ComptrollerErrorCode,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("pool data has not been fetched yet")]
    PoolDataUnavailable,
    #[error("unexpected return value from {method}")]
    UnexpectedReturn { method: &'static str },
    #[error("cannot represent {value} as a fixed-point mantissa")]
    Conversion { value: String },
}

impl Error {
    /// The translated comptroller code, when the simulated call rejected the action.
    pub fn comptroller_code(&self) -> Option<&ComptrollerErrorCode> {
        match self {
            Error::Comptroller { code, .. } => Some(code),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn address(last: u8) -> Address {
        let mut bytes = [0_u8; 20];
        bytes[19] = last;
        Address::from(bytes)
    }

    #[test]
    fn parse_address_works() {
        struct Case<'a> {
            input: &'a str,
            expected: Option<Address>,
        }
        let cases = vec![
            Case {
                input: "0x0000000000000000000000000000000000000001",
                expected: Some(address(1)),
            },
            Case {
                input: "00000000000000000000000000000000000000ff",
                expected: Some(address(0xff)),
            },
            Case {
                input: "0xAbCdEf0000000000000000000000000000000000",
                expected: Some(Address::from_slice(&[
                    0xab, 0xcd, 0xef, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                ])),
            },
            Case {
                input: "0x123",
                expected: None,
            },
            Case {
                input: "0xzz00000000000000000000000000000000000000",
                expected: None,
            },
            Case {
                input: "",
                expected: None,
            },
        ];
        for case in cases {
            let result = parse_address(case.input);
            match case.expected {
                Some(expected) => assert_eq!(result.unwrap(), expected),
                None => assert!(matches!(result, Err(Error::InvalidAddress(_)))),
            }
        }
    }

    #[test]
    fn format_address_is_full_lowercase() {
        let address = parse_address("0xABCDEF0000000000000000000000000000000001").unwrap();
        assert_eq!(
            format_address(&address),
            "0xabcdef0000000000000000000000000000000001"
        );
    }

    #[test]
    fn mantissa_conversions() {
        let mantissa = Mantissa::from(5_u64);
        assert_eq!(U256::from(mantissa), U256::from(5));
        assert_eq!(u64::try_from(mantissa).unwrap(), 5);
        assert!(Mantissa::zero().is_zero());
        assert!(u8::try_from(Mantissa::from(U256::from(256))).is_err());
    }
}
