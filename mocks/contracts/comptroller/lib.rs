// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory Fuse comptroller, unitroller and master price oracle.
//!
//! Admin functions follow the comptroller conventions: a rejected action
//! returns a non-zero error code instead of reverting, and only a `send`
//! changes state.

use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        MutexGuard,
        PoisonError,
    },
};

use async_trait::async_trait;
use logics::traits::{
    client::{
        ClientError,
        ContractClient,
        TransactionReceipt,
    },
    comptroller::{
        ComptrollerErrorCode,
        Method,
        MethodCall,
        Value,
    },
    data_source::{
        OracleIdentifier,
        PoolDirectory,
        PoolIncentives,
        RewardsSource,
    },
    types::{
        Address,
        Error,
        Mantissa,
        Pool,
        Result,
        RewardsDistributor,
        TokenData,
        U256,
    },
};
use primitive_types::H256;

pub const CLOSE_FACTOR_MIN_MANTISSA: u128 = 50_000_000_000_000_000;
pub const CLOSE_FACTOR_MAX_MANTISSA: u128 = 900_000_000_000_000_000;
pub const LIQUIDATION_INCENTIVE_MIN_MANTISSA: u128 = 1_000_000_000_000_000_000;
pub const LIQUIDATION_INCENTIVE_MAX_MANTISSA: u128 = 1_500_000_000_000_000_000;

/// Contract storage of the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub admin: Address,
    pub pending_admin: Address,
    pub admin_has_rights: bool,
    pub enforce_whitelist: bool,
    pub whitelist: Vec<Address>,
    pub close_factor: Mantissa,
    pub liquidation_incentive: Mantissa,
    pub default_oracle: Address,
    /// underlying -> oracle
    pub oracles: BTreeMap<Address, Address>,
}

impl State {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            pending_admin: Address::zero(),
            admin_has_rights: true,
            enforce_whitelist: false,
            whitelist: Vec::new(),
            close_factor: Mantissa::from(500_000_000_000_000_000_u128),
            liquidation_incentive: Mantissa::from(1_080_000_000_000_000_000_u128),
            default_oracle: Address::zero(),
            oracles: BTreeMap::new(),
        }
    }

    fn has_admin_rights(&self, caller: Address) -> bool {
        self.admin_has_rights && caller == self.admin
    }

    /// Applies an admin function and returns its error code
    fn execute(
        &mut self,
        method: &Method,
        caller: Address,
    ) -> core::result::Result<ComptrollerErrorCode, ClientError> {
        let code = match method {
            Method::SetWhitelistEnforcement(enforce) => {
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                self.enforce_whitelist = *enforce;
                ComptrollerErrorCode::NoError
            }
            Method::SetWhitelistStatuses {
                suppliers,
                statuses,
            } => {
                if suppliers.len() != statuses.len() {
                    return Err(ClientError::Reverted(
                        "Number of suppliers must match number of statuses.".to_string(),
                    ))
                }
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                for (supplier, status) in suppliers.iter().zip(statuses) {
                    let listed = self.whitelist.contains(supplier);
                    if *status && !listed {
                        self.whitelist.push(*supplier);
                    }
                    if !*status && listed {
                        self.whitelist.retain(|entry| entry != supplier);
                    }
                }
                ComptrollerErrorCode::NoError
            }
            Method::SetCloseFactor(new_close_factor) => {
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                let value = U256::from(*new_close_factor);
                if value < U256::from(CLOSE_FACTOR_MIN_MANTISSA)
                    || value > U256::from(CLOSE_FACTOR_MAX_MANTISSA)
                {
                    return Ok(ComptrollerErrorCode::InvalidCloseFactor)
                }
                self.close_factor = *new_close_factor;
                ComptrollerErrorCode::NoError
            }
            Method::SetLiquidationIncentive(new_incentive) => {
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                let value = U256::from(*new_incentive);
                if value < U256::from(LIQUIDATION_INCENTIVE_MIN_MANTISSA)
                    || value > U256::from(LIQUIDATION_INCENTIVE_MAX_MANTISSA)
                {
                    return Ok(ComptrollerErrorCode::InvalidLiquidationIncentive)
                }
                self.liquidation_incentive = *new_incentive;
                ComptrollerErrorCode::NoError
            }
            Method::RenounceAdminRights => {
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                self.admin_has_rights = false;
                ComptrollerErrorCode::NoError
            }
            Method::AcceptAdmin => {
                if self.pending_admin.is_zero() || caller != self.pending_admin {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                self.admin = self.pending_admin;
                self.pending_admin = Address::zero();
                ComptrollerErrorCode::NoError
            }
            Method::SetPendingAdmin(new_pending_admin) => {
                if !self.has_admin_rights(caller) {
                    return Ok(ComptrollerErrorCode::Unauthorized)
                }
                self.pending_admin = *new_pending_admin;
                ComptrollerErrorCode::NoError
            }
            _ => {
                return Err(ClientError::Rpc(format!(
                    "{} is not a state-changing method",
                    method.name()
                )))
            }
        };
        Ok(code)
    }

    fn read(&self, method: &Method) -> core::result::Result<Value, ClientError> {
        let value = match method {
            Method::AdminHasRights => Value::Bool(self.admin_has_rights),
            Method::Admin => Value::Address(self.admin),
            Method::PendingAdmin => Value::Address(self.pending_admin),
            Method::EnforceWhitelist => Value::Bool(self.enforce_whitelist),
            Method::GetWhitelist => Value::Addresses(self.whitelist.clone()),
            Method::CloseFactorMantissa => Value::Uint(self.close_factor.into()),
            Method::LiquidationIncentiveMantissa => {
                Value::Uint(self.liquidation_incentive.into())
            }
            Method::DefaultOracle => Value::Address(self.default_oracle),
            Method::Oracles(underlying) => {
                Value::Address(self.oracles.get(underlying).copied().unwrap_or_default())
            }
            _ => {
                return Err(ClientError::Rpc(format!(
                    "{} is not a view method",
                    method.name()
                )))
            }
        };
        Ok(value)
    }
}

#[derive(Debug, Default)]
struct Rewards {
    distributors: Vec<RewardsDistributor>,
    incentives: PoolIncentives,
    tokens: BTreeMap<Address, TokenData>,
    balances: BTreeMap<(Address, Address), U256>,
    underlyings: BTreeMap<Address, Address>,
}

#[derive(Debug, Default)]
struct Faults {
    forced_code: Option<u64>,
    send_failure: Option<ClientError>,
}

/// A comptroller at `comptroller` and its master price oracle at `oracle`
pub struct MockComptroller {
    comptroller: Address,
    oracle: Address,
    state: Mutex<State>,
    calls: Mutex<Vec<(MethodCall, Address)>>,
    sends: Mutex<Vec<(MethodCall, Address)>>,
    faults: Mutex<Faults>,
    pools: Mutex<BTreeMap<u64, Pool>>,
    oracle_names: Mutex<BTreeMap<Address, String>>,
    rewards: Mutex<Rewards>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockComptroller {
    pub fn new(comptroller: Address, oracle: Address, admin: Address) -> Self {
        Self {
            comptroller,
            oracle,
            state: Mutex::new(State::new(admin)),
            calls: Mutex::new(Vec::new()),
            sends: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            pools: Mutex::new(BTreeMap::new()),
            oracle_names: Mutex::new(BTreeMap::new()),
            rewards: Mutex::new(Rewards::default()),
        }
    }

    pub fn comptroller(&self) -> Address {
        self.comptroller
    }

    pub fn oracle(&self) -> Address {
        self.oracle
    }

    pub fn state(&self) -> State {
        lock(&self.state).clone()
    }

    /// Changes storage directly, as another account's transaction would
    pub fn update_state(&self, update: impl FnOnce(&mut State)) {
        update(&mut lock(&self.state));
    }

    /// Simulated calls, views included
    pub fn calls(&self) -> Vec<(MethodCall, Address)> {
        lock(&self.calls).clone()
    }

    /// Broadcast transactions
    pub fn sends(&self) -> Vec<(MethodCall, Address)> {
        lock(&self.sends).clone()
    }

    /// Number of times the full pool configuration has been read
    pub fn config_reads(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|(call, _)| call.method == Method::Admin)
            .count()
    }

    /// Makes every simulated admin call return `code`
    pub fn force_error_code(&self, code: Option<u64>) {
        lock(&self.faults).forced_code = code;
    }

    /// Makes every broadcast fail with `error`
    pub fn fail_sends_with(&self, error: Option<ClientError>) {
        lock(&self.faults).send_failure = error;
    }

    pub fn add_pool(&self, pool: Pool) {
        lock(&self.pools).insert(pool.pool_id, pool);
    }

    pub fn name_oracle(&self, oracle: Address, name: &str) {
        lock(&self.oracle_names).insert(oracle, name.to_string());
    }

    pub fn add_rewards_distributor(
        &self,
        distributor: RewardsDistributor,
        active_ctokens: Vec<Address>,
    ) {
        let mut rewards = lock(&self.rewards);
        rewards
            .incentives
            .insert(distributor.address, active_ctokens);
        rewards.distributors.push(distributor);
    }

    pub fn add_token(&self, token: Address, data: TokenData) {
        lock(&self.rewards).tokens.insert(token, data);
    }

    pub fn set_token_balance(&self, token: Address, holder: Address, balance: U256) {
        lock(&self.rewards).balances.insert((token, holder), balance);
    }

    pub fn set_ctoken_underlying(&self, ctoken: Address, underlying: Address) {
        lock(&self.rewards).underlyings.insert(ctoken, underlying);
    }

    fn check_target(&self, call: &MethodCall) -> core::result::Result<(), ClientError> {
        let expected = match call.method {
            Method::DefaultOracle | Method::Oracles(_) => self.oracle,
            _ => self.comptroller,
        };
        if call.to != expected {
            return Err(ClientError::Rpc(format!(
                "no {} at {:#x}",
                call.method.name(),
                call.to
            )))
        }
        Ok(())
    }

    fn status(&self, code: ComptrollerErrorCode) -> Vec<Value> {
        let forced = lock(&self.faults).forced_code;
        let numeric = forced.unwrap_or_else(|| code.code().unwrap_or_default() as u64);
        vec![Value::Uint(U256::from(numeric))]
    }
}

fn transaction_hash(nonce: usize) -> H256 {
    let mut bytes = [0_u8; 32];
    bytes[24..].copy_from_slice(&(nonce as u64).to_be_bytes());
    H256::from(bytes)
}

#[async_trait]
impl ContractClient for MockComptroller {
    async fn call(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<Vec<Value>, ClientError> {
        lock(&self.calls).push((call.clone(), from));
        self.check_target(call)?;
        if call.method.is_mutation() {
            let mut scratch = self.state();
            let code = scratch.execute(&call.method, from)?;
            return Ok(self.status(code))
        }
        Ok(vec![lock(&self.state).read(&call.method)?])
    }

    async fn send(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<TransactionReceipt, ClientError> {
        if let Some(error) = lock(&self.faults).send_failure.clone() {
            return Err(error)
        }
        self.check_target(call)?;
        lock(&self.state).execute(&call.method, from)?;
        let mut sends = lock(&self.sends);
        sends.push((call.clone(), from));
        Ok(TransactionReceipt {
            transaction_hash: transaction_hash(sends.len()),
            block_number: Some(sends.len() as u64),
            status: true,
        })
    }
}

#[async_trait]
impl PoolDirectory for MockComptroller {
    async fn pool(&self, pool_id: u64) -> Result<Pool> {
        lock(&self.pools)
            .get(&pool_id)
            .cloned()
            .ok_or_else(|| Error::Client(ClientError::Rpc(format!("pool {} not found", pool_id))))
    }
}

#[async_trait]
impl OracleIdentifier for MockComptroller {
    async fn identify_oracle(&self, oracle: Address) -> Result<Option<String>> {
        Ok(lock(&self.oracle_names).get(&oracle).cloned())
    }
}

#[async_trait]
impl RewardsSource for MockComptroller {
    async fn rewards_distributors(
        &self,
        comptroller: Address,
    ) -> Result<Vec<RewardsDistributor>> {
        if comptroller != self.comptroller {
            return Ok(Vec::new())
        }
        Ok(lock(&self.rewards).distributors.clone())
    }

    async fn pool_incentives(&self, comptroller: Address) -> Result<PoolIncentives> {
        if comptroller != self.comptroller {
            return Ok(PoolIncentives::new())
        }
        Ok(lock(&self.rewards).incentives.clone())
    }

    async fn token_data(&self, token: Address) -> Result<Option<TokenData>> {
        Ok(lock(&self.rewards).tokens.get(&token).cloned())
    }

    async fn token_balance(&self, token: Address, holder: Address) -> Result<U256> {
        Ok(lock(&self.rewards)
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default())
    }

    async fn ctokens_underlying(&self, ctokens: &[Address]) -> Result<Vec<(Address, Address)>> {
        let rewards = lock(&self.rewards);
        Ok(ctokens
            .iter()
            .filter_map(|ctoken| {
                rewards
                    .underlyings
                    .get(ctoken)
                    .map(|underlying| (*ctoken, *underlying))
            })
            .collect())
    }
}
