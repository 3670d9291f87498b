// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./bgpvpn.toml` > `~/.config/bgpvpn/bgpvpn.toml` >
//! `/etc/bgpvpn/bgpvpn.toml`, with `BGPVPN_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BgpvpnConfig;

pub const SYSTEM_CONFIG_PATH: &str = "/etc/bgpvpn/bgpvpn.toml";
pub const LOCAL_CONFIG_PATH: &str = "bgpvpn.toml";

/// `~/.config/bgpvpn/bgpvpn.toml`, when a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bgpvpn/bgpvpn.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bgpvpn/bgpvpn.toml`
/// 3. `~/.config/bgpvpn/bgpvpn.toml`
/// 4. `./bgpvpn.toml`
/// 5. `BGPVPN_*` environment variables
pub fn load_config() -> Result<BgpvpnConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string on top of the defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<BgpvpnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BgpvpnConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BgpvpnConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BgpvpnConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BgpvpnConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Map `BGPVPN_<SECTION>_<KEY>` onto `section.key`.
///
/// Only the first underscore after a known section is turned into a dot, so
/// `BGPVPN_STORAGE_DATABASE_PATH` becomes `storage.database_path`.
fn env_provider() -> Env {
    Env::prefixed("BGPVPN_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in ["service", "storage", "logging", "drivers"] {
        if let Some(rest) = key.strip_prefix(section)
            && let Some(rest) = rest.strip_prefix('_')
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
