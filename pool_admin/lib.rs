// Copyright 2023 Asynmatrix Pte. Ltd.
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pool administration screens of a Fuse pool: the configuration
//! controller and the read-only oracle, asset and rewards views.

pub mod assets;
pub mod configuration;
pub mod oracles;
pub mod overview;
pub mod rewards;
