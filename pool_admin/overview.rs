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
            PoolConfigSource,
            PoolDirectory,
            RewardsSource,
        },
        types::{
            Address,
            Pool,
            PoolConfig,
            Result,
        },
    },
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    assets::AssetConfiguration,
    oracles::{
        load_oracle_table,
        OracleRow,
    },
    rewards::{
        rewards_distributor_rows,
        RewardsDistributorRow,
    },
};

/// Collaborators the edit page reads from
#[derive(Clone)]
pub struct Sources {
    pub pools: Arc<dyn PoolDirectory>,
    pub configs: Arc<dyn PoolConfigSource>,
    pub oracles: Arc<dyn OracleDirectory>,
    pub identifier: Arc<dyn OracleIdentifier>,
    pub rewards: Arc<dyn RewardsSource>,
}

/// Everything the pool edit page displays besides the configuration form
#[derive(Debug, Clone)]
pub struct PoolOverview {
    pub pool: Pool,
    pub config: PoolConfig,
    pub assets: AssetConfiguration,
    pub oracles: Vec<OracleRow>,
    pub rewards_distributors: Vec<RewardsDistributorRow>,
    pub is_admin: bool,
}

impl PoolOverview {
    pub async fn load(
        sources: &Sources,
        config: &AdminConfig,
        pool_id: u64,
        caller: Address,
    ) -> Result<Self> {
        let pool = sources.pools.pool(pool_id).await?;
        let pool_config = sources.configs.pool_config(pool.comptroller, pool.oracle).await?;
        let oracles = load_oracle_table(
            sources.oracles.as_ref(),
            sources.identifier.as_ref(),
            config,
            pool.oracle,
            pool_config.default_oracle,
            &pool.assets,
        )
        .await?;
        let rewards_distributors =
            rewards_distributor_rows(sources.rewards.as_ref(), pool.comptroller, caller).await?;
        debug!(pool_id, assets = pool.assets.len(), "pool overview loaded");

        Ok(Self {
            assets: AssetConfiguration::new(pool.assets.clone()),
            is_admin: pool_config.admin == caller,
            config: pool_config,
            pool,
            oracles,
            rewards_distributors,
        })
    }

    pub fn can_add_asset(&self) -> bool {
        self.assets.can_add_asset(self.config.admin_has_rights)
    }

    pub fn can_add_rewards_distributor(&self) -> bool {
        self.config.admin_has_rights
    }
}
