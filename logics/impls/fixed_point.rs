// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub use crate::traits::math::*;
use crate::traits::types::{
    Error,
    Mantissa,
    Result,
    U256,
};
use rust_decimal::{
    prelude::ToPrimitive,
    Decimal,
    RoundingStrategy,
};

/// Decimal places between a mantissa and a percentage (1e18 / 100)
const PERCENT_SCALE: u32 = 16;

pub fn exp_scale() -> Decimal {
    Decimal::from(10_u64.pow(18))
}

fn with_scale(raw: U256, scale: u32) -> Result<Decimal> {
    let overflow = || {
        Error::Conversion {
            value: raw.to_string(),
        }
    };
    let integer = i128::try_from(u128::try_from(raw).map_err(|_| overflow())?)
        .map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(integer, scale).map_err(|_| overflow())
}

fn to_decimal(value: Mantissa) -> Result<Decimal> {
    with_scale(U256::from(value), PERCENT_SCALE)
}

fn to_mantissa(value: Decimal) -> Result<Mantissa> {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let integer = rounded.to_u128().ok_or_else(|| {
        Error::Conversion {
            value: value.to_string(),
        }
    })?;
    Ok(Mantissa::from(integer))
}

/// 0.5e18 -> 50
pub fn scale_close_factor(close_factor: Mantissa) -> Result<Decimal> {
    Ok(to_decimal(close_factor)?.normalize())
}

/// 1.08e18 -> 8
pub fn scale_liquidation_incentive(liquidation_incentive: Mantissa) -> Result<Decimal> {
    Ok((to_decimal(liquidation_incentive)? - Decimal::ONE_HUNDRED).normalize())
}

/// 50 -> 0.5e18
pub fn percent_to_close_factor(percent: Decimal) -> Result<Mantissa> {
    let fraction = percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| fraction.checked_mul(exp_scale()))
        .ok_or_else(|| {
            Error::Conversion {
                value: percent.to_string(),
            }
        })?;
    to_mantissa(fraction)
}

/// 8 -> 1.08e18
pub fn percent_to_liquidation_incentive(percent: Decimal) -> Result<Mantissa> {
    let multiplier = percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| fraction.checked_add(Decimal::ONE))
        .and_then(|multiplier| multiplier.checked_mul(exp_scale()))
        .ok_or_else(|| {
            Error::Conversion {
                value: percent.to_string(),
            }
        })?;
    to_mantissa(multiplier)
}

/// Raw token amount in whole tokens, rounded to `dp` places.
///
/// 1_234_567_800_000_000_000 with 18 decimals and 3 places -> 1.235
pub fn scale_token_amount(amount: U256, decimals: u32, dp: u32) -> Result<Decimal> {
    let amount = with_scale(amount, decimals)?;
    Ok(amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

impl PercentScale for Mantissa {
    fn close_factor_percent(&self) -> Result<Decimal> {
        scale_close_factor(*self)
    }
    fn liquidation_incentive_percent(&self) -> Result<Decimal> {
        scale_liquidation_incentive(*self)
    }
    fn from_close_factor_percent(percent: Decimal) -> Result<Self> {
        percent_to_close_factor(percent)
    }
    fn from_liquidation_incentive_percent(percent: Decimal) -> Result<Self> {
        percent_to_liquidation_incentive(percent)
    }
}
