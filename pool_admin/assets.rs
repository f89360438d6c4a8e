// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use logics::traits::types::{
    Address,
    UsdPricedFuseAsset,
};

/// `"DAI / USDC / WETH"`, or `"None"` for an empty pool
pub fn assets_summary(assets: &[UsdPricedFuseAsset]) -> String {
    if assets.is_empty() {
        return "None".to_string()
    }
    assets
        .iter()
        .map(|asset| asset.underlying_symbol.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Asset tabs of the configuration screen
#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfiguration {
    assets: Vec<UsdPricedFuseAsset>,
    selected: usize,
}

impl AssetConfiguration {
    pub fn new(assets: Vec<UsdPricedFuseAsset>) -> Self {
        Self {
            assets,
            selected: 0,
        }
    }

    pub fn assets(&self) -> &[UsdPricedFuseAsset] {
        &self.assets
    }

    pub fn selected(&self) -> Option<&UsdPricedFuseAsset> {
        self.assets.get(self.selected)
    }

    /// Selects the asset with `ctoken`; unknown cTokens keep the selection.
    pub fn select(&mut self, ctoken: Address) -> bool {
        match self.assets.iter().position(|asset| asset.ctoken == ctoken) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> String {
        assets_summary(&self.assets)
    }

    /// Assets can only be added while the admin keeps upgrade rights
    pub fn can_add_asset(&self, upgradeable: bool) -> bool {
        upgradeable
    }
}
