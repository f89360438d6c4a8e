// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use logics::{
    impls::{
        comptroller::{
            call_then_send,
            Comptroller,
            MethodCall,
            Unitroller,
        },
        config::AdminConfig,
        fixed_point::{
            percent_to_close_factor,
            percent_to_liquidation_incentive,
            scale_close_factor,
            scale_liquidation_incentive,
        },
        telemetry::{
            Telemetry,
            TrackedEvent,
        },
    },
    traits::{
        client::{
            ContractClient,
            Session,
            TransactionReceipt,
        },
        data_source::PoolConfigSource,
        types::{
            format_address,
            parse_address,
            Address,
            Error,
            PoolConfig,
            Result,
        },
    },
};
use rust_decimal::Decimal;
use tracing::{
    info,
    warn,
};

use crate::overview::{
    PoolOverview,
    Sources,
};

/// Unsaved edits on the configuration screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigForm {
    pub admin: String,
    /// Percent
    pub close_factor: Decimal,
    /// Percent on top of the seized collateral
    pub liquidation_incentive: Decimal,
}

/// Button shown next to the admin field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    SaveAdmin,
    AcceptAdmin,
    RevokeRights,
    None,
}

/// Pool page the controller keeps in step with its own state
struct TrackedPage {
    sources: Sources,
    pool_id: u64,
}

/// Pool configuration controller.
///
/// Every admin action is simulated first and only broadcast when the
/// comptroller accepts it. A successful action is followed by one full
/// refetch which overwrites any unsaved edit in the form and, when a page
/// is attached, reloads its overview too. A failed refetch after a
/// broadcast is reported but never turns the action into an error.
pub struct PoolConfiguration<C, S, T> {
    session: Session<C>,
    source: S,
    telemetry: T,
    config: AdminConfig,
    comptroller: Address,
    oracle: Address,
    data: Option<PoolConfig>,
    form: ConfigForm,
    page: Option<TrackedPage>,
    overview: Option<PoolOverview>,
}

impl<C, S, T> PoolConfiguration<C, S, T>
where
    C: ContractClient,
    S: PoolConfigSource,
    T: Telemetry,
{
    pub fn new(
        session: Session<C>,
        source: S,
        telemetry: T,
        config: AdminConfig,
        comptroller: Address,
        oracle: Address,
    ) -> Self {
        let form = ConfigForm {
            admin: format_address(&session.address),
            close_factor: config.close_factor.default_value(),
            liquidation_incentive: config.liquidation_incentive.default_value(),
        };
        Self {
            session,
            source,
            telemetry,
            config,
            comptroller,
            oracle,
            data: None,
            form,
            page: None,
            overview: None,
        }
    }

    /// Reloads the overview of `pool_id` on every refetch.
    pub fn with_overview(mut self, sources: Sources, pool_id: u64) -> Self {
        self.page = Some(TrackedPage { sources, pool_id });
        self
    }

    /// Last loaded page overview, `None` before the first refetch
    pub fn overview(&self) -> Option<&PoolOverview> {
        self.overview.as_ref()
    }

    /// Last fetched contract state, `None` before the first refetch
    pub fn data(&self) -> Option<&PoolConfig> {
        self.data.as_ref()
    }

    pub fn form(&self) -> &ConfigForm {
        &self.form
    }

    pub fn caller(&self) -> Address {
        self.session.address
    }

    pub fn set_admin_input(&mut self, admin: impl Into<String>) {
        self.form.admin = admin.into();
    }

    pub fn set_close_factor(&mut self, percent: Decimal) {
        self.form.close_factor = self.config.close_factor.clamp(percent);
    }

    pub fn set_liquidation_incentive(&mut self, percent: Decimal) {
        self.form.liquidation_incentive = self.config.liquidation_incentive.clamp(percent);
    }

    /// Reloads the contract state and resets the form from it.
    pub async fn refetch(&mut self) -> Result<()> {
        let data = match self.source.pool_config(self.comptroller, self.oracle).await {
            Ok(data) => data,
            Err(error) => return Err(self.report_error(error)),
        };
        let close_factor = scale_close_factor(data.close_factor);
        let liquidation_incentive = scale_liquidation_incentive(data.liquidation_incentive);
        let (close_factor, liquidation_incentive) = match (close_factor, liquidation_incentive) {
            (Ok(close_factor), Ok(liquidation_incentive)) => (close_factor, liquidation_incentive),
            (Err(error), _) | (_, Err(error)) => return Err(self.report_error(error)),
        };
        self.form = ConfigForm {
            admin: format_address(&data.admin),
            close_factor,
            liquidation_incentive,
        };
        info!(comptroller = ?self.comptroller, "pool configuration refetched");
        self.data = Some(data);

        if let Some(page) = self.page.as_ref() {
            let loaded =
                PoolOverview::load(&page.sources, &self.config, page.pool_id, self.session.address)
                    .await;
            match loaded {
                Ok(overview) => self.overview = Some(overview),
                Err(error) => return Err(self.report_error(error)),
            }
        }
        Ok(())
    }

    pub async fn set_whitelist_enforcement(&mut self, enforce: bool) -> Result<TransactionReceipt> {
        let call = self.comptroller_contract().set_whitelist_enforcement(enforce);
        self.execute(
            call,
            "Failed to change whitelist enforcement.",
            TrackedEvent::ChangeWhitelistStatus,
        )
        .await
    }

    /// Rewrites the whole whitelist with `user` appended, every entry enabled.
    pub async fn add_to_whitelist(&mut self, user: Address) -> Result<TransactionReceipt> {
        let mut suppliers = match self.data.as_ref() {
            Some(data) => data.whitelist.clone(),
            None => return Err(self.report_error(Error::PoolDataUnavailable)),
        };
        suppliers.push(user);
        let statuses = vec![true; suppliers.len()];
        let call = self.comptroller_contract().set_whitelist_statuses(suppliers, statuses);
        self.execute(
            call,
            "Failed to add the address to the whitelist.",
            TrackedEvent::AddToWhitelist,
        )
        .await
    }

    /// Rewrites the whole whitelist with only `user` disabled.
    pub async fn remove_from_whitelist(&mut self, user: Address) -> Result<TransactionReceipt> {
        let suppliers = match self.data.as_ref() {
            Some(data) => data.whitelist.clone(),
            None => return Err(self.report_error(Error::PoolDataUnavailable)),
        };
        let statuses = suppliers.iter().map(|supplier| *supplier != user).collect();
        let call = self.comptroller_contract().set_whitelist_statuses(suppliers, statuses);
        self.execute(
            call,
            "Failed to remove the address from the whitelist.",
            TrackedEvent::RemoveFromWhitelist,
        )
        .await
    }

    pub async fn renounce_admin_rights(&mut self) -> Result<TransactionReceipt> {
        let call = Unitroller::new(self.comptroller).renounce_admin_rights();
        self.execute(
            call,
            "Failed to renounce admin rights.",
            TrackedEvent::RevokeRights,
        )
        .await
    }

    pub async fn accept_admin(&mut self) -> Result<TransactionReceipt> {
        let call = Unitroller::new(self.comptroller).accept_admin();
        self.execute(call, "Failed to accept the admin role.", TrackedEvent::AcceptAdmin)
            .await
    }

    /// Proposes the admin typed in the form as pending admin.
    pub async fn update_admin(&mut self) -> Result<TransactionReceipt> {
        let new_admin = match parse_address(&self.form.admin) {
            Ok(address) => address,
            Err(error) => return Err(self.report_error(error)),
        };
        let call = Unitroller::new(self.comptroller).set_pending_admin(new_admin);
        self.execute(call, "Failed to set the pending admin.", TrackedEvent::UpdateAdmin)
            .await
    }

    /// 50% -> 0.5e18
    pub async fn update_close_factor(&mut self) -> Result<TransactionReceipt> {
        let close_factor = match percent_to_close_factor(self.form.close_factor) {
            Ok(mantissa) => mantissa,
            Err(error) => return Err(self.report_error(error)),
        };
        let call = self.comptroller_contract().set_close_factor(close_factor);
        self.execute(
            call,
            "Failed to update the close factor.",
            TrackedEvent::UpdateCloseFactor,
        )
        .await
    }

    /// 8% -> 1.08e18
    pub async fn update_liquidation_incentive(&mut self) -> Result<TransactionReceipt> {
        let incentive = match percent_to_liquidation_incentive(self.form.liquidation_incentive) {
            Ok(mantissa) => mantissa,
            Err(error) => return Err(self.report_error(error)),
        };
        let call = self.comptroller_contract().set_liquidation_incentive(incentive);
        self.execute(
            call,
            "Failed to update the liquidation incentive.",
            TrackedEvent::UpdateLiquidationIncentive,
        )
        .await
    }

    pub fn is_admin(&self) -> bool {
        self.data
            .as_ref()
            .map(|data| data.admin == self.session.address)
            .unwrap_or(false)
    }

    /// Whether the admin can still reconfigure the pool
    pub fn is_upgradeable(&self) -> bool {
        self.data
            .as_ref()
            .map(|data| data.admin_has_rights)
            .unwrap_or(false)
    }

    pub fn whitelist_visible(&self) -> bool {
        self.data
            .as_ref()
            .map(|data| data.enforce_whitelist)
            .unwrap_or(false)
    }

    pub fn whitelist_toggle_enabled(&self) -> bool {
        self.is_upgradeable()
    }

    pub fn admin_input_enabled(&self) -> bool {
        self.is_upgradeable() && self.is_admin()
    }

    pub fn admin_action(&self) -> AdminAction {
        let data = match self.data.as_ref() {
            Some(data) => data,
            None => return AdminAction::None,
        };
        if self.form.admin.to_lowercase() != format_address(&data.admin) {
            AdminAction::SaveAdmin
        } else if self.session.address == data.pending_admin {
            AdminAction::AcceptAdmin
        } else if data.admin_has_rights && self.session.address == data.admin {
            AdminAction::RevokeRights
        } else {
            AdminAction::None
        }
    }

    pub fn close_factor_dirty(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| scale_close_factor(data.close_factor).ok())
            .map(|fetched| fetched != self.form.close_factor)
            .unwrap_or(false)
    }

    pub fn liquidation_incentive_dirty(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|data| scale_liquidation_incentive(data.liquidation_incentive).ok())
            .map(|fetched| fetched != self.form.liquidation_incentive)
            .unwrap_or(false)
    }

    fn comptroller_contract(&self) -> Comptroller<'_, C> {
        Comptroller::new(&self.session.client, self.comptroller)
    }

    async fn execute(
        &mut self,
        call: MethodCall,
        fail_message: &str,
        event: TrackedEvent,
    ) -> Result<TransactionReceipt> {
        let result = call_then_send(
            &self.session.client,
            &self.telemetry,
            call,
            self.session.address,
            fail_message,
        )
        .await;
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(error) => return Err(self.report_error(error)),
        };
        self.telemetry.track(event);
        // The transaction is out; a failed reload is only reported and the
        // last fetched state stays in place.
        let _ = self.refetch().await;
        Ok(receipt)
    }

    /// Single path for every surfaced failure; the action can be retried by hand.
    fn report_error(&self, error: Error) -> Error {
        warn!(error = %error, comptroller = ?self.comptroller, "pool configuration action failed");
        error
    }
}
