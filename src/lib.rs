// Licensed under the Apache-2.0 license

// Keep panic-prone patterns out of production code; tests may unwrap
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]
pub mod command_table;
pub mod common;
pub mod i2c;
pub mod tests;
