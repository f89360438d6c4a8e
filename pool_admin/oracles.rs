// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use logics::{
    impls::config::AdminConfig,
    traits::{
        data_source::{
            OracleDirectory,
            OracleIdentifier,
        },
        types::{
            format_address,
            Address,
            Result,
            UsdPricedFuseAsset,
        },
    },
};

/// A row of the oracles table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleRow {
    pub oracle: Address,
    pub display_name: String,
    pub underlyings: Vec<Address>,
    pub is_default: bool,
    pub explorer_url: String,
}

/// `0x1234...abcd`
pub fn short_address(address: &Address, config: &AdminConfig) -> String {
    let full = format_address(address);
    let prefix = config.short_address_prefix.min(full.len());
    let suffix = config.short_address_suffix.min(full.len() - prefix);
    format!("{}...{}", &full[..prefix], &full[full.len() - suffix..])
}

/// Groups `(underlying, oracle)` pairs by oracle, keeping first-appearance order.
pub fn group_oracles(pairs: &[(Address, Address)]) -> Vec<(Address, Vec<Address>)> {
    let mut grouped: Vec<(Address, Vec<Address>)> = Vec::new();
    for (underlying, oracle) in pairs {
        match grouped.iter_mut().find(|(known, _)| known == oracle) {
            Some((_, underlyings)) => underlyings.push(*underlying),
            None => grouped.push((*oracle, vec![*underlying])),
        }
    }
    grouped
}

async fn row<I: OracleIdentifier + ?Sized>(
    oracle: Address,
    underlyings: Vec<Address>,
    is_default: bool,
    identifier: &I,
    config: &AdminConfig,
) -> Result<OracleRow> {
    let display_name = identifier
        .identify_oracle(oracle)
        .await?
        .unwrap_or_else(|| short_address(&oracle, config));
    Ok(OracleRow {
        oracle,
        display_name,
        underlyings,
        is_default,
        explorer_url: config.explorer_url(&format_address(&oracle)),
    })
}

/// Joins grouped oracles with their display names; the default oracle comes first.
pub async fn oracle_rows<I: OracleIdentifier + ?Sized>(
    default_oracle: Option<Address>,
    oracles: Vec<(Address, Vec<Address>)>,
    identifier: &I,
    config: &AdminConfig,
) -> Result<Vec<OracleRow>> {
    let mut rows = Vec::with_capacity(oracles.len() + 1);
    if let Some(default_oracle) = default_oracle {
        rows.push(row(default_oracle, Vec::new(), true, identifier, config).await?);
    }
    for (oracle, underlyings) in oracles {
        rows.push(row(oracle, underlyings, false, identifier, config).await?);
    }
    Ok(rows)
}

/// Resolves the oracle of every asset in the pool and builds the oracles table.
pub async fn load_oracle_table<D, I>(
    directory: &D,
    identifier: &I,
    config: &AdminConfig,
    master_oracle: Address,
    default_oracle: Option<Address>,
    assets: &[UsdPricedFuseAsset],
) -> Result<Vec<OracleRow>>
where
    D: OracleDirectory + ?Sized,
    I: OracleIdentifier + ?Sized,
{
    let underlyings = assets
        .iter()
        .map(|asset| asset.underlying_token)
        .collect::<Vec<_>>();
    let pairs = directory.oracles_for_pool(master_oracle, &underlyings).await?;
    oracle_rows(default_oracle, group_oracles(&pairs), identifier, config).await
}
