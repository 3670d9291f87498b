// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver registry, manifests, and the built-in driver catalog.
//!
//! Drivers are compiled in and registered by name. Configuration picks
//! exactly one of them at startup through [`DriverRegistry::load`].

pub mod catalog;
pub mod drivers;
pub mod manifest;
pub mod registry;

pub use catalog::{builtin_catalog, builtin_registry};
pub use drivers::dummy::{DummyDriver, DummyDriverFactory, DUMMY_DRIVER};
pub use manifest::DriverManifest;
pub use registry::{DriverEntry, DriverFactory, DriverRegistry};
