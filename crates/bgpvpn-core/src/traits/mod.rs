// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the pluggable backends of the service.
//!
//! Every backend extends the [`ServiceAdapter`] base trait and uses
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod driver;
pub mod store;

pub use adapter::ServiceAdapter;
pub use driver::BgpvpnDriver;
pub use store::ConnectionStore;
