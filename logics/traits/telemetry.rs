// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::sync::Arc;

use super::types::Error;

/// Named user actions reported after a successful transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedEvent {
    ChangeWhitelistStatus,
    AddToWhitelist,
    RemoveFromWhitelist,
    RevokeRights,
    AcceptAdmin,
    UpdateAdmin,
    UpdateCloseFactor,
    UpdateLiquidationIncentive,
}

impl TrackedEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedEvent::ChangeWhitelistStatus => "Fuse-ChangeWhitelistStatus",
            TrackedEvent::AddToWhitelist => "Fuse-AddToWhitelist",
            TrackedEvent::RemoveFromWhitelist => "Fuse-RemoveFromWhitelist",
            TrackedEvent::RevokeRights => "Fuse-RevokeRights",
            TrackedEvent::AcceptAdmin => "Fuse-AcceptAdmin",
            TrackedEvent::UpdateAdmin => "Fuse-UpdateAdmin",
            TrackedEvent::UpdateCloseFactor => "Fuse-UpdateCloseFactor",
            TrackedEvent::UpdateLiquidationIncentive => "Fuse-UpdateLiquidationIncentive",
        }
    }
}

/// External event-tracking side channel
pub trait Telemetry: Send + Sync {
    fn capture_exception(&self, error: &Error);
    fn track(&self, event: TrackedEvent);
}

impl<T: Telemetry + ?Sized> Telemetry for Arc<T> {
    fn capture_exception(&self, error: &Error) {
        (**self).capture_exception(error)
    }
    fn track(&self, event: TrackedEvent) {
        (**self).track(event)
    }
}
