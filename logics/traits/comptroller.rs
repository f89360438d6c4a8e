// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use core::fmt;

use super::types::{
    Address,
    Mantissa,
    U256,
};

/// Methods of the comptroller, unitroller and master price oracle consumed by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    // comptroller views
    AdminHasRights,
    Admin,
    PendingAdmin,
    EnforceWhitelist,
    GetWhitelist,
    CloseFactorMantissa,
    LiquidationIncentiveMantissa,
    Oracle,

    // comptroller admin functions
    SetWhitelistEnforcement(bool),
    SetWhitelistStatuses {
        suppliers: Vec<Address>,
        statuses: Vec<bool>,
    },
    SetCloseFactor(Mantissa),
    SetLiquidationIncentive(Mantissa),

    // unitroller admin functions
    RenounceAdminRights,
    AcceptAdmin,
    SetPendingAdmin(Address),

    // master price oracle views
    DefaultOracle,
    Oracles(Address),
}

impl Method {
    /// Solidity name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Method::AdminHasRights => "adminHasRights",
            Method::Admin => "admin",
            Method::PendingAdmin => "pendingAdmin",
            Method::EnforceWhitelist => "enforceWhitelist",
            Method::GetWhitelist => "getWhitelist",
            Method::CloseFactorMantissa => "closeFactorMantissa",
            Method::LiquidationIncentiveMantissa => "liquidationIncentiveMantissa",
            Method::Oracle => "oracle",
            Method::SetWhitelistEnforcement(_) => "_setWhitelistEnforcement",
            Method::SetWhitelistStatuses { .. } => "_setWhitelistStatuses",
            Method::SetCloseFactor(_) => "_setCloseFactor",
            Method::SetLiquidationIncentive(_) => "_setLiquidationIncentive",
            Method::RenounceAdminRights => "_renounceAdminRights",
            Method::AcceptAdmin => "_acceptAdmin",
            Method::SetPendingAdmin(_) => "_setPendingAdmin",
            Method::DefaultOracle => "defaultOracle",
            Method::Oracles(_) => "oracles",
        }
    }

    /// Whether the method changes contract state and follows the error code convention
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Method::SetWhitelistEnforcement(_)
                | Method::SetWhitelistStatuses { .. }
                | Method::SetCloseFactor(_)
                | Method::SetLiquidationIncentive(_)
                | Method::RenounceAdminRights
                | Method::AcceptAdmin
                | Method::SetPendingAdmin(_)
        )
    }
}

/// An unsent method invocation against a deployed contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub to: Address,
    pub method: Method,
}

impl MethodCall {
    pub fn new(to: Address, method: Method) -> Self {
        Self { to, method }
    }
}

/// A decoded return element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uint(U256),
    Bool(bool),
    Address(Address),
    Addresses(Vec<Address>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(value) => write!(f, "{}", value),
            Value::Bool(value) => write!(f, "{}", value),
            Value::Address(value) => write!(f, "{:#x}", value),
            Value::Addresses(values) => {
                let joined = values
                    .iter()
                    .map(|value| format!("{:#x}", value))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "[{}]", joined)
            }
        }
    }
}

/// Error codes returned by comptroller admin functions, in contract order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComptrollerErrorCode {
    NoError,
    Unauthorized,
    ComptrollerMismatch,
    InsufficientShortfall,
    InsufficientLiquidity,
    InvalidCloseFactor,
    InvalidCollateralFactor,
    InvalidLiquidationIncentive,
    /// no longer possible
    MarketNotEntered,
    MarketNotListed,
    MarketAlreadyListed,
    MathError,
    NonzeroBorrowBalance,
    PriceError,
    Rejection,
    SnapshotError,
    TooManyAssets,
    TooMuchRepay,
    SupplierNotWhitelisted,
    BorrowBelowMin,
    SupplyAboveMax,
    NonzeroTotalSupply,
    /// Raw value of a code outside the table
    Unknown(String),
}

const CODES: [ComptrollerErrorCode; 22] = [
    ComptrollerErrorCode::NoError,
    ComptrollerErrorCode::Unauthorized,
    ComptrollerErrorCode::ComptrollerMismatch,
    ComptrollerErrorCode::InsufficientShortfall,
    ComptrollerErrorCode::InsufficientLiquidity,
    ComptrollerErrorCode::InvalidCloseFactor,
    ComptrollerErrorCode::InvalidCollateralFactor,
    ComptrollerErrorCode::InvalidLiquidationIncentive,
    ComptrollerErrorCode::MarketNotEntered,
    ComptrollerErrorCode::MarketNotListed,
    ComptrollerErrorCode::MarketAlreadyListed,
    ComptrollerErrorCode::MathError,
    ComptrollerErrorCode::NonzeroBorrowBalance,
    ComptrollerErrorCode::PriceError,
    ComptrollerErrorCode::Rejection,
    ComptrollerErrorCode::SnapshotError,
    ComptrollerErrorCode::TooManyAssets,
    ComptrollerErrorCode::TooMuchRepay,
    ComptrollerErrorCode::SupplierNotWhitelisted,
    ComptrollerErrorCode::BorrowBelowMin,
    ComptrollerErrorCode::SupplyAboveMax,
    ComptrollerErrorCode::NonzeroTotalSupply,
];

impl ComptrollerErrorCode {
    /// Translates a numeric code. Codes outside the table keep their raw value.
    pub fn from_code(code: U256) -> Self {
        if code < U256::from(CODES.len()) {
            return CODES[code.as_usize()].clone()
        }
        ComptrollerErrorCode::Unknown(code.to_string())
    }

    /// Translates the status element of a simulated call.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Uint(code)) => Self::from_code(*code),
            Some(other) => ComptrollerErrorCode::Unknown(other.to_string()),
            None => ComptrollerErrorCode::Unknown(String::new()),
        }
    }

    /// Numeric code, `None` for unknown codes
    pub fn code(&self) -> Option<usize> {
        CODES.iter().position(|known| known == self)
    }

    pub fn is_success(&self) -> bool {
        *self == ComptrollerErrorCode::NoError
    }

    pub fn name(&self) -> &str {
        match self {
            ComptrollerErrorCode::NoError => "NO_ERROR",
            ComptrollerErrorCode::Unauthorized => "UNAUTHORIZED",
            ComptrollerErrorCode::ComptrollerMismatch => "COMPTROLLER_MISMATCH",
            ComptrollerErrorCode::InsufficientShortfall => "INSUFFICIENT_SHORTFALL",
            ComptrollerErrorCode::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
            ComptrollerErrorCode::InvalidCloseFactor => "INVALID_CLOSE_FACTOR",
            ComptrollerErrorCode::InvalidCollateralFactor => "INVALID_COLLATERAL_FACTOR",
            ComptrollerErrorCode::InvalidLiquidationIncentive => "INVALID_LIQUIDATION_INCENTIVE",
            ComptrollerErrorCode::MarketNotEntered => "MARKET_NOT_ENTERED",
            ComptrollerErrorCode::MarketNotListed => "MARKET_NOT_LISTED",
            ComptrollerErrorCode::MarketAlreadyListed => "MARKET_ALREADY_LISTED",
            ComptrollerErrorCode::MathError => "MATH_ERROR",
            ComptrollerErrorCode::NonzeroBorrowBalance => "NONZERO_BORROW_BALANCE",
            ComptrollerErrorCode::PriceError => "PRICE_ERROR",
            ComptrollerErrorCode::Rejection => "REJECTION",
            ComptrollerErrorCode::SnapshotError => "SNAPSHOT_ERROR",
            ComptrollerErrorCode::TooManyAssets => "TOO_MANY_ASSETS",
            ComptrollerErrorCode::TooMuchRepay => "TOO_MUCH_REPAY",
            ComptrollerErrorCode::SupplierNotWhitelisted => "SUPPLIER_NOT_WHITELISTED",
            ComptrollerErrorCode::BorrowBelowMin => "BORROW_BELOW_MIN",
            ComptrollerErrorCode::SupplyAboveMax => "SUPPLY_ABOVE_MAX",
            ComptrollerErrorCode::NonzeroTotalSupply => "NONZERO_TOTAL_SUPPLY",
            ComptrollerErrorCode::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ComptrollerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_code_works() {
        struct Case {
            input: u64,
            expected: ComptrollerErrorCode,
        }
        let cases = vec![
            Case {
                input: 0,
                expected: ComptrollerErrorCode::NoError,
            },
            Case {
                input: 1,
                expected: ComptrollerErrorCode::Unauthorized,
            },
            Case {
                input: 5,
                expected: ComptrollerErrorCode::InvalidCloseFactor,
            },
            Case {
                input: 7,
                expected: ComptrollerErrorCode::InvalidLiquidationIncentive,
            },
            Case {
                input: 18,
                expected: ComptrollerErrorCode::SupplierNotWhitelisted,
            },
            Case {
                input: 21,
                expected: ComptrollerErrorCode::NonzeroTotalSupply,
            },
            Case {
                input: 22,
                expected: ComptrollerErrorCode::Unknown("22".to_string()),
            },
            Case {
                input: 1000,
                expected: ComptrollerErrorCode::Unknown("1000".to_string()),
            },
        ];
        for case in cases {
            assert_eq!(
                ComptrollerErrorCode::from_code(U256::from(case.input)),
                case.expected
            );
        }
    }

    #[test]
    fn codes_keep_contract_order() {
        for (index, code) in CODES.iter().enumerate() {
            assert_eq!(code.code(), Some(index));
        }
        assert_eq!(ComptrollerErrorCode::Unknown("99".to_string()).code(), None);
    }

    #[test]
    fn display_uses_symbolic_name_or_raw_value() {
        assert_eq!(
            ComptrollerErrorCode::MarketNotListed.to_string(),
            "MARKET_NOT_LISTED"
        );
        assert_eq!(
            ComptrollerErrorCode::from_code(U256::from(40)).to_string(),
            "40"
        );
    }

    #[test]
    fn from_value_handles_non_numeric_status() {
        assert_eq!(
            ComptrollerErrorCode::from_value(Some(&Value::Uint(U256::zero()))),
            ComptrollerErrorCode::NoError
        );
        assert_eq!(
            ComptrollerErrorCode::from_value(Some(&Value::Bool(true))),
            ComptrollerErrorCode::Unknown("true".to_string())
        );
        assert_eq!(
            ComptrollerErrorCode::from_value(None),
            ComptrollerErrorCode::Unknown(String::new())
        );
    }

    #[test]
    fn only_admin_functions_are_mutations() {
        assert!(Method::SetCloseFactor(Mantissa::zero()).is_mutation());
        assert!(Method::AcceptAdmin.is_mutation());
        assert!(!Method::GetWhitelist.is_mutation());
        assert!(!Method::Oracles(Address::zero()).is_mutation());
        assert_eq!(Method::RenounceAdminRights.name(), "_renounceAdminRights");
    }
}
