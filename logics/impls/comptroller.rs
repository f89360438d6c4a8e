// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub use crate::traits::comptroller::*;
use crate::traits::{
    client::{
        ContractClient,
        TransactionReceipt,
    },
    telemetry::Telemetry,
    types::{
        format_address,
        Address,
        Error,
        Mantissa,
        Result,
        U256,
    },
};
use tracing::{
    debug,
    info,
};

/// Simulates `call` from `caller` and only broadcasts it when the comptroller
/// reports `NO_ERROR`.
///
/// A rejected simulation is reported to telemetry and returned as
/// [`Error::Comptroller`] without submitting anything.
pub async fn call_then_send<C, T>(
    client: &C,
    telemetry: &T,
    call: MethodCall,
    caller: Address,
    fail_message: &str,
) -> Result<TransactionReceipt>
where
    C: ContractClient + ?Sized,
    T: Telemetry + ?Sized,
{
    let response = client.call(&call, caller).await?;
    debug!(
        method = call.method.name(),
        to = %format_address(&call.to),
        response = ?response,
        "simulated call"
    );

    let code = ComptrollerErrorCode::from_value(response.first());
    if !code.is_success() {
        let error = Error::Comptroller {
            message: fail_message.to_string(),
            code,
        };
        telemetry.capture_exception(&error);
        return Err(error)
    }

    let receipt = client.send(&call, caller).await?;
    info!(
        method = call.method.name(),
        transaction_hash = ?receipt.transaction_hash,
        "transaction submitted"
    );
    Ok(receipt)
}

async fn view<C: ContractClient + ?Sized>(
    client: &C,
    to: Address,
    method: Method,
) -> Result<Value> {
    let name = method.name();
    let call = MethodCall::new(to, method);
    let mut response = client.call(&call, Address::zero()).await?;
    if response.is_empty() {
        return Err(Error::UnexpectedReturn { method: name })
    }
    Ok(response.swap_remove(0))
}

fn expect_bool(value: Value, method: &'static str) -> Result<bool> {
    match value {
        Value::Bool(flag) => Ok(flag),
        _ => Err(Error::UnexpectedReturn { method }),
    }
}

fn expect_address(value: Value, method: &'static str) -> Result<Address> {
    match value {
        Value::Address(address) => Ok(address),
        _ => Err(Error::UnexpectedReturn { method }),
    }
}

fn expect_addresses(value: Value, method: &'static str) -> Result<Vec<Address>> {
    match value {
        Value::Addresses(addresses) => Ok(addresses),
        _ => Err(Error::UnexpectedReturn { method }),
    }
}

fn expect_uint(value: Value, method: &'static str) -> Result<U256> {
    match value {
        Value::Uint(number) => Ok(number),
        _ => Err(Error::UnexpectedReturn { method }),
    }
}

/// Typed access to a pool comptroller
pub struct Comptroller<'a, C: ?Sized> {
    client: &'a C,
    address: Address,
}

impl<'a, C: ContractClient + ?Sized> Comptroller<'a, C> {
    pub fn new(client: &'a C, address: Address) -> Self {
        Self { client, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    // view functions
    pub async fn admin_has_rights(&self) -> Result<bool> {
        let value = view(self.client, self.address, Method::AdminHasRights).await?;
        expect_bool(value, "adminHasRights")
    }

    pub async fn admin(&self) -> Result<Address> {
        let value = view(self.client, self.address, Method::Admin).await?;
        expect_address(value, "admin")
    }

    pub async fn pending_admin(&self) -> Result<Address> {
        let value = view(self.client, self.address, Method::PendingAdmin).await?;
        expect_address(value, "pendingAdmin")
    }

    pub async fn enforce_whitelist(&self) -> Result<bool> {
        let value = view(self.client, self.address, Method::EnforceWhitelist).await?;
        expect_bool(value, "enforceWhitelist")
    }

    pub async fn whitelist(&self) -> Result<Vec<Address>> {
        let value = view(self.client, self.address, Method::GetWhitelist).await?;
        expect_addresses(value, "getWhitelist")
    }

    pub async fn close_factor_mantissa(&self) -> Result<Mantissa> {
        let value = view(self.client, self.address, Method::CloseFactorMantissa).await?;
        expect_uint(value, "closeFactorMantissa").map(Mantissa::from)
    }

    pub async fn liquidation_incentive_mantissa(&self) -> Result<Mantissa> {
        let value = view(
            self.client,
            self.address,
            Method::LiquidationIncentiveMantissa,
        )
        .await?;
        expect_uint(value, "liquidationIncentiveMantissa").map(Mantissa::from)
    }

    pub async fn oracle(&self) -> Result<Address> {
        let value = view(self.client, self.address, Method::Oracle).await?;
        expect_address(value, "oracle")
    }

    // admin functions
    pub fn set_whitelist_enforcement(&self, enforce: bool) -> MethodCall {
        MethodCall::new(self.address, Method::SetWhitelistEnforcement(enforce))
    }

    pub fn set_whitelist_statuses(&self, suppliers: Vec<Address>, statuses: Vec<bool>) -> MethodCall {
        MethodCall::new(
            self.address,
            Method::SetWhitelistStatuses {
                suppliers,
                statuses,
            },
        )
    }

    pub fn set_close_factor(&self, new_close_factor_mantissa: Mantissa) -> MethodCall {
        MethodCall::new(self.address, Method::SetCloseFactor(new_close_factor_mantissa))
    }

    pub fn set_liquidation_incentive(
        &self,
        new_liquidation_incentive_mantissa: Mantissa,
    ) -> MethodCall {
        MethodCall::new(
            self.address,
            Method::SetLiquidationIncentive(new_liquidation_incentive_mantissa),
        )
    }
}

/// Admin-rights functions of the unitroller proxy sitting at the comptroller address
pub struct Unitroller {
    address: Address,
}

impl Unitroller {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn renounce_admin_rights(&self) -> MethodCall {
        MethodCall::new(self.address, Method::RenounceAdminRights)
    }

    pub fn accept_admin(&self) -> MethodCall {
        MethodCall::new(self.address, Method::AcceptAdmin)
    }

    pub fn set_pending_admin(&self, new_pending_admin: Address) -> MethodCall {
        MethodCall::new(self.address, Method::SetPendingAdmin(new_pending_admin))
    }
}

pub struct MasterPriceOracle<'a, C: ?Sized> {
    client: &'a C,
    address: Address,
}

impl<'a, C: ContractClient + ?Sized> MasterPriceOracle<'a, C> {
    pub fn new(client: &'a C, address: Address) -> Self {
        Self { client, address }
    }

    /// Fallback oracle, `None` when unset
    pub async fn default_oracle(&self) -> Result<Option<Address>> {
        let value = view(self.client, self.address, Method::DefaultOracle).await?;
        let oracle = expect_address(value, "defaultOracle")?;
        Ok(if oracle.is_zero() { None } else { Some(oracle) })
    }

    pub async fn oracle_of(&self, underlying: Address) -> Result<Address> {
        let value = view(self.client, self.address, Method::Oracles(underlying)).await?;
        expect_address(value, "oracles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{
        client::ClientError,
        telemetry::TrackedEvent,
    };
    use async_trait::async_trait;
    use primitive_types::H256;
    use std::sync::Mutex;

    struct ScriptedClient {
        response: Vec<Value>,
        sent: Mutex<Vec<MethodCall>>,
        reject_send: bool,
    }

    impl ScriptedClient {
        fn returning(response: Vec<Value>) -> Self {
            Self {
                response,
                sent: Mutex::new(Vec::new()),
                reject_send: false,
            }
        }
        fn sent(&self) -> Vec<MethodCall> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContractClient for ScriptedClient {
        async fn call(
            &self,
            _call: &MethodCall,
            _from: Address,
        ) -> core::result::Result<Vec<Value>, ClientError> {
            Ok(self.response.clone())
        }

        async fn send(
            &self,
            call: &MethodCall,
            _from: Address,
        ) -> core::result::Result<TransactionReceipt, ClientError> {
            if self.reject_send {
                return Err(ClientError::Rejected("user denied signature".into()))
            }
            self.sent.lock().unwrap().push(call.clone());
            Ok(TransactionReceipt {
                transaction_hash: H256::repeat_byte(0x11),
                block_number: Some(1),
                status: true,
            })
        }
    }

    #[derive(Default)]
    struct RecordingTelemetry {
        exceptions: Mutex<Vec<String>>,
    }

    impl Telemetry for RecordingTelemetry {
        fn capture_exception(&self, error: &Error) {
            self.exceptions.lock().unwrap().push(error.to_string());
        }
        fn track(&self, _event: TrackedEvent) {}
    }

    fn comptroller_address() -> Address {
        Address::repeat_byte(0xcc)
    }

    #[tokio::test]
    async fn success_code_sends_once() {
        let client = ScriptedClient::returning(vec![Value::Uint(U256::zero())]);
        let telemetry = RecordingTelemetry::default();
        let call = Unitroller::new(comptroller_address()).accept_admin();

        let receipt = call_then_send(&client, &telemetry, call.clone(), Address::zero(), "")
            .await
            .unwrap();

        assert!(receipt.status);
        assert_eq!(client.sent(), vec![call]);
        assert!(telemetry.exceptions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_code_sends_nothing() {
        let client = ScriptedClient::returning(vec![Value::Uint(U256::from(1))]);
        let telemetry = RecordingTelemetry::default();
        let call = Unitroller::new(comptroller_address()).renounce_admin_rights();

        let error = call_then_send(
            &client,
            &telemetry,
            call,
            Address::zero(),
            "Failed to renounce admin rights.",
        )
        .await
        .unwrap_err();

        assert!(client.sent().is_empty());
        assert_eq!(
            error.comptroller_code(),
            Some(&ComptrollerErrorCode::Unauthorized)
        );
        assert_eq!(
            error.to_string(),
            "Failed to renounce admin rights. Code: UNAUTHORIZED"
        );
        assert_eq!(
            *telemetry.exceptions.lock().unwrap(),
            vec!["Failed to renounce admin rights. Code: UNAUTHORIZED".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_code_keeps_raw_value() {
        let client = ScriptedClient::returning(vec![Value::Uint(U256::from(77))]);
        let telemetry = RecordingTelemetry::default();
        let call = Unitroller::new(comptroller_address()).accept_admin();

        let error = call_then_send(&client, &telemetry, call, Address::zero(), "Failed.")
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "Failed. Code: 77");
        assert!(client.sent().is_empty());
    }

    #[tokio::test]
    async fn empty_response_is_not_success() {
        let client = ScriptedClient::returning(vec![]);
        let telemetry = RecordingTelemetry::default();
        let call = Unitroller::new(comptroller_address()).accept_admin();

        let result = call_then_send(&client, &telemetry, call, Address::zero(), "Failed.").await;

        assert!(matches!(result, Err(Error::Comptroller { .. })));
        assert!(client.sent().is_empty());
    }

    #[tokio::test]
    async fn wallet_rejection_passes_through() {
        let mut client = ScriptedClient::returning(vec![Value::Uint(U256::zero())]);
        client.reject_send = true;
        let telemetry = RecordingTelemetry::default();
        let call = Unitroller::new(comptroller_address()).accept_admin();

        let error = call_then_send(&client, &telemetry, call, Address::zero(), "Failed.")
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Client(ClientError::Rejected(_))));
        assert!(telemetry.exceptions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn views_reject_mismatched_values() {
        let client = ScriptedClient::returning(vec![Value::Uint(U256::one())]);
        let comptroller = Comptroller::new(&client, comptroller_address());

        assert!(matches!(
            comptroller.admin().await,
            Err(Error::UnexpectedReturn { method: "admin" })
        ));
        assert_eq!(
            comptroller.close_factor_mantissa().await.unwrap(),
            Mantissa::from(1_u64)
        );
    }

    #[tokio::test]
    async fn zero_default_oracle_reads_as_none() {
        let client = ScriptedClient::returning(vec![Value::Address(Address::zero())]);
        let oracle = MasterPriceOracle::new(&client, Address::repeat_byte(0x0a));

        assert_eq!(oracle.default_oracle().await.unwrap(), None);
    }
}
