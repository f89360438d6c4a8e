// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rust_decimal::Decimal;

use super::types::Result;

/// Conversions between 1e18 mantissas and slider percentages
pub trait PercentScale: Sized {
    fn close_factor_percent(&self) -> Result<Decimal>;
    fn liquidation_incentive_percent(&self) -> Result<Decimal>;
    fn from_close_factor_percent(percent: Decimal) -> Result<Self>;
    fn from_liquidation_incentive_percent(percent: Decimal) -> Result<Self>;
}
