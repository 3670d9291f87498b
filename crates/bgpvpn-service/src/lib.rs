// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle orchestration.
//!
//! [`BgpvpnPlugin`] validates requests against the connection schema,
//! commits them to the store, and then notifies the active driver.

pub mod plugin;

pub use plugin::{
    BgpvpnPlugin, PLUGIN_DESCRIPTION, PLUGIN_NAME, PLUGIN_TYPE, SUPPORTED_EXTENSION_ALIASES,
};
