// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("{name} slider bounds are inconsistent (min {min}, default {default}, max {max})")]
    InvalidBounds {
        name: &'static str,
        min: u32,
        default: u32,
        max: u32,
    },
}

/// Range and initial position of a percentage slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderBounds {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl SliderBounds {
    pub fn clamp(&self, value: Decimal) -> Decimal {
        value.clamp(Decimal::from(self.min), Decimal::from(self.max))
    }

    pub fn default_value(&self) -> Decimal {
        Decimal::from(self.default)
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min <= self.default && self.default <= self.max {
            return Ok(())
        }
        Err(ConfigError::InvalidBounds {
            name,
            min: self.min,
            default: self.default,
            max: self.max,
        })
    }
}

/// Settings of the pool administration screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Prefix that an address is appended to for block explorer links
    pub explorer_address_url: String,
    pub close_factor: SliderBounds,
    pub liquidation_incentive: SliderBounds,
    /// Characters kept at the front of a shortened address, `0x` included
    pub short_address_prefix: usize,
    pub short_address_suffix: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            explorer_address_url: "https://etherscan.io/address/".to_string(),
            close_factor: SliderBounds {
                min: 5,
                max: 90,
                default: 50,
            },
            liquidation_incentive: SliderBounds {
                min: 0,
                max: 50,
                default: 8,
            },
            short_address_prefix: 6,
            short_address_suffix: 4,
        }
    }
}

impl AdminConfig {
    /// Parses a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AdminConfig = serde_json::from_str(json)?;
        config.close_factor.validate("close factor")?;
        config.liquidation_incentive.validate("liquidation incentive")?;
        Ok(config)
    }

    pub fn explorer_url(&self, address: &str) -> String {
        format!("{}{}", self.explorer_address_url, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(AdminConfig::from_json("{}").unwrap(), AdminConfig::default());
    }

    #[test]
    fn partial_document_overrides_given_keys() {
        let config = AdminConfig::from_json(
            r#"{
                "explorer_address_url": "https://arbiscan.io/address/",
                "liquidation_incentive": { "min": 0, "max": 30, "default": 10 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.explorer_address_url, "https://arbiscan.io/address/");
        assert_eq!(config.liquidation_incentive.max, 30);
        assert_eq!(config.close_factor, AdminConfig::default().close_factor);
    }

    #[test]
    fn inconsistent_bounds_are_rejected() {
        let result = AdminConfig::from_json(
            r#"{ "close_factor": { "min": 50, "max": 10, "default": 20 } }"#,
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidBounds {
                name: "close factor",
                ..
            })
        ));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            AdminConfig::from_json("{ not json"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn clamp_keeps_slider_range() {
        let bounds = AdminConfig::default().close_factor;
        assert_eq!(bounds.clamp(Decimal::from(95)), Decimal::from(90));
        assert_eq!(bounds.clamp(Decimal::from(1)), Decimal::from(5));
        assert_eq!(bounds.clamp(Decimal::from(42)), Decimal::from(42));
    }
}
