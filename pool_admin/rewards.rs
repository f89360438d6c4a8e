// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use logics::{
    impls::fixed_point::scale_token_amount,
    traits::{
        data_source::RewardsSource,
        types::{
            Address,
            Result,
            RewardsDistributor,
            TokenData,
            U256,
        },
    },
};
use rust_decimal::Decimal;

/// Reward token balances are shown with 18 decimals regardless of the token
const BALANCE_DECIMALS: u32 = 18;
const BALANCE_DISPLAY_PLACES: u32 = 3;

/// A row of the rewards distributors table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsDistributorRow {
    pub distributor: RewardsDistributor,
    pub reward_token: Option<TokenData>,
    /// Reward tokens held by the distributor
    pub balance: U256,
    pub active_ctokens: Vec<Address>,
    pub underlyings: Vec<Address>,
    pub is_admin: bool,
}

impl RewardsDistributorRow {
    /// `balance / 1e18` with three decimals
    pub fn display_balance(&self) -> Result<Decimal> {
        scale_token_amount(self.balance, BALANCE_DECIMALS, BALANCE_DISPLAY_PLACES)
    }

    /// A distributor with no rewarded market is shown as inactive
    pub fn is_active(&self) -> bool {
        !self.underlyings.is_empty()
    }
}

pub async fn rewards_distributor_rows<R: RewardsSource + ?Sized>(
    source: &R,
    comptroller: Address,
    caller: Address,
) -> Result<Vec<RewardsDistributorRow>> {
    let distributors = source.rewards_distributors(comptroller).await?;
    let incentives = source.pool_incentives(comptroller).await?;

    let mut rows = Vec::with_capacity(distributors.len());
    for distributor in distributors {
        let active_ctokens = incentives
            .get(&distributor.address)
            .cloned()
            .unwrap_or_default();
        let underlyings = source
            .ctokens_underlying(&active_ctokens)
            .await?
            .into_iter()
            .map(|(_, underlying)| underlying)
            .collect();
        rows.push(RewardsDistributorRow {
            reward_token: source.token_data(distributor.reward_token).await?,
            balance: source
                .token_balance(distributor.reward_token, distributor.address)
                .await?,
            is_admin: distributor.admin == caller,
            active_ctokens,
            underlyings,
            distributor,
        });
    }
    Ok(rows)
}
