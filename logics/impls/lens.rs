// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{
    impls::comptroller::{
        Comptroller,
        MasterPriceOracle,
    },
    traits::{
        client::ContractClient,
        data_source::{
            OracleDirectory,
            PoolConfigSource,
        },
        types::{
            Address,
            PoolConfig,
            Result,
        },
    },
};
use async_trait::async_trait;
use tracing::debug;

/// Reads pool configuration straight from the comptroller and master price oracle views
pub struct Lens<C> {
    client: C,
}

impl<C: ContractClient> Lens<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: ContractClient> PoolConfigSource for Lens<C> {
    async fn pool_config(&self, comptroller: Address, oracle: Address) -> Result<PoolConfig> {
        let contract = Comptroller::new(&self.client, comptroller);
        let config = PoolConfig {
            admin: contract.admin().await?,
            pending_admin: contract.pending_admin().await?,
            admin_has_rights: contract.admin_has_rights().await?,
            enforce_whitelist: contract.enforce_whitelist().await?,
            whitelist: contract.whitelist().await?,
            close_factor: contract.close_factor_mantissa().await?,
            liquidation_incentive: contract.liquidation_incentive_mantissa().await?,
            default_oracle: MasterPriceOracle::new(&self.client, oracle)
                .default_oracle()
                .await?,
        };
        debug!(comptroller = ?comptroller, "pool configuration fetched");
        Ok(config)
    }
}

#[async_trait]
impl<C: ContractClient> OracleDirectory for Lens<C> {
    async fn oracles_for_pool(
        &self,
        master_oracle: Address,
        underlyings: &[Address],
    ) -> Result<Vec<(Address, Address)>> {
        let oracle = MasterPriceOracle::new(&self.client, master_oracle);
        let mut pairs = Vec::with_capacity(underlyings.len());
        for underlying in underlyings {
            pairs.push((*underlying, oracle.oracle_of(*underlying).await?));
        }
        Ok(pairs)
    }
}
