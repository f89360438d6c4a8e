// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

pub use crate::traits::telemetry::*;
use crate::traits::types::Error;
use tracing::{
    error,
    info,
};

/// Telemetry that forwards exceptions and tracked actions to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn capture_exception(&self, exception: &Error) {
        error!(error = %exception, "captured exception");
    }

    fn track(&self, event: TrackedEvent) {
        info!(event = event.as_str(), "tracked action");
    }
}
