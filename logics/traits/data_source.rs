// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{
    collections::BTreeMap,
    sync::Arc,
};

use async_trait::async_trait;

use super::types::{
    Address,
    Pool,
    PoolConfig,
    Result,
    RewardsDistributor,
    TokenData,
    U256,
};

/// Distributor address to the cTokens it currently rewards
pub type PoolIncentives = BTreeMap<Address, Vec<Address>>;

/// Source of the comptroller state behind the configuration screen
#[async_trait]
pub trait PoolConfigSource: Send + Sync {
    async fn pool_config(&self, comptroller: Address, oracle: Address) -> Result<PoolConfig>;
}

/// Directory of deployed pools
#[async_trait]
pub trait PoolDirectory: Send + Sync {
    async fn pool(&self, pool_id: u64) -> Result<Pool>;
}

/// Resolves which oracle prices each underlying token
#[async_trait]
pub trait OracleDirectory: Send + Sync {
    /// Returns `(underlying, oracle)` pairs in the order of `underlyings`
    async fn oracles_for_pool(
        &self,
        master_oracle: Address,
        underlyings: &[Address],
    ) -> Result<Vec<(Address, Address)>>;
}

/// Maps an oracle contract to a human readable model name
#[async_trait]
pub trait OracleIdentifier: Send + Sync {
    async fn identify_oracle(&self, oracle: Address) -> Result<Option<String>>;
}

#[async_trait]
pub trait RewardsSource: Send + Sync {
    async fn rewards_distributors(&self, comptroller: Address)
        -> Result<Vec<RewardsDistributor>>;
    async fn pool_incentives(&self, comptroller: Address) -> Result<PoolIncentives>;
    async fn token_data(&self, token: Address) -> Result<Option<TokenData>>;
    async fn token_balance(&self, token: Address, holder: Address) -> Result<U256>;
    /// Returns `(ctoken, underlying)` pairs
    async fn ctokens_underlying(&self, ctokens: &[Address]) -> Result<Vec<(Address, Address)>>;
}

#[async_trait]
impl<S: PoolConfigSource + ?Sized> PoolConfigSource for Arc<S> {
    async fn pool_config(&self, comptroller: Address, oracle: Address) -> Result<PoolConfig> {
        (**self).pool_config(comptroller, oracle).await
    }
}

#[async_trait]
impl<D: PoolDirectory + ?Sized> PoolDirectory for Arc<D> {
    async fn pool(&self, pool_id: u64) -> Result<Pool> {
        (**self).pool(pool_id).await
    }
}

#[async_trait]
impl<D: OracleDirectory + ?Sized> OracleDirectory for Arc<D> {
    async fn oracles_for_pool(
        &self,
        master_oracle: Address,
        underlyings: &[Address],
    ) -> Result<Vec<(Address, Address)>> {
        (**self).oracles_for_pool(master_oracle, underlyings).await
    }
}

#[async_trait]
impl<I: OracleIdentifier + ?Sized> OracleIdentifier for Arc<I> {
    async fn identify_oracle(&self, oracle: Address) -> Result<Option<String>> {
        (**self).identify_oracle(oracle).await
    }
}

#[async_trait]
impl<R: RewardsSource + ?Sized> RewardsSource for Arc<R> {
    async fn rewards_distributors(
        &self,
        comptroller: Address,
    ) -> Result<Vec<RewardsDistributor>> {
        (**self).rewards_distributors(comptroller).await
    }

    async fn pool_incentives(&self, comptroller: Address) -> Result<PoolIncentives> {
        (**self).pool_incentives(comptroller).await
    }

    async fn token_data(&self, token: Address) -> Result<Option<TokenData>> {
        (**self).token_data(token).await
    }

    async fn token_balance(&self, token: Address, holder: Address) -> Result<U256> {
        (**self).token_balance(token, holder).await
    }

    async fn ctokens_underlying(&self, ctokens: &[Address]) -> Result<Vec<(Address, Address)>> {
        (**self).ctokens_underlying(ctokens).await
    }
}
