// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for BGP VPN integration tests.
//!
//! # Components
//!
//! - [`MockDriver`] - Driver that records every call and fails on demand
//! - [`MemoryStore`] - In-memory connection store with injectable failures
//! - [`TestHarness`] - A wired [`bgpvpn_service::BgpvpnPlugin`] over the mocks

pub mod harness;
pub mod memory_store;
pub mod mock_driver;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::MemoryStore;
pub use mock_driver::{DriverCall, MockDriver};
