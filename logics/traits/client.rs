// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use async_trait::async_trait;
use primitive_types::H256;
use thiserror::Error;

use super::{
    comptroller::{
        MethodCall,
        Value,
    },
    types::Address,
};

/// Failures raised by the network or the wallet, passed through untranslated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transaction rejected by the wallet: {0}")]
    Rejected(String),
    #[error("rpc request failed: {0}")]
    Rpc(String),
    #[error("contract reverted: {0}")]
    Reverted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: H256,
    pub block_number: Option<u64>,
    pub status: bool,
}

/// Access to deployed contracts through a connected wallet
#[async_trait]
pub trait ContractClient: Send + Sync {
    /// Executes the call without broadcasting it and returns the decoded result
    async fn call(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<Vec<Value>, ClientError>;

    /// Signs and broadcasts the call as a transaction
    async fn send(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<TransactionReceipt, ClientError>;
}

#[async_trait]
impl<C: ContractClient + ?Sized> ContractClient for Arc<C> {
    async fn call(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<Vec<Value>, ClientError> {
        (**self).call(call, from).await
    }

    async fn send(
        &self,
        call: &MethodCall,
        from: Address,
    ) -> core::result::Result<TransactionReceipt, ClientError> {
        (**self).send(call, from).await
    }
}

/// A connected wallet: the client plus the address it acts as
#[derive(Debug, Clone)]
pub struct Session<C> {
    pub client: C,
    pub address: Address,
}

impl<C: ContractClient> Session<C> {
    pub fn new(client: C, address: Address) -> Self {
        Self { client, address }
    }
}
