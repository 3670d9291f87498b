// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by drivers and stores.

use async_trait::async_trait;

use crate::error::BgpvpnError;
use crate::types::{AdapterType, HealthStatus};

/// Identity and health reporting common to every pluggable backend.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the registry name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the role this adapter plays (driver or storage).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, BgpvpnError>;
}
