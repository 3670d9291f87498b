// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the BGP VPN service extension.
//!
//! This crate provides the domain types, the error taxonomy, and the
//! trait definitions for the two pluggable collaborators of the service:
//! the driver that talks to the BGP control plane and the store that owns
//! durable connection records.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BgpvpnError, DriverOperation, ErrorKind, FieldError};
pub use types::{
    AdapterType, Connection, ConnectionFilter, ConnectionPatch, ConnectionType, HealthStatus,
    LifecycleState, NewConnection, Port, RequestContext, RouteTarget,
};

pub use traits::{BgpvpnDriver, ConnectionStore, ServiceAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Driver, AdapterType::Storage] {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn lifecycle_states_render_kebab_case() {
        assert_eq!(LifecycleState::DriverAcknowledged.to_string(), "driver-acknowledged");
        assert_eq!(LifecycleState::Absent.to_string(), "absent");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_driver<T: BgpvpnDriver>() {}
        fn _assert_store<T: ConnectionStore>() {}
        fn _assert_adapter<T: ServiceAdapter>() {}
    }

    proptest! {
        #[test]
        fn every_in_range_route_target_parses(asn in 0u32..=65535, nn in 0u32..=65535) {
            let text = format!("{asn}:{nn}");
            let rt: RouteTarget = text.parse().unwrap();
            prop_assert_eq!(u32::from(rt.asn), asn);
            prop_assert_eq!(u32::from(rt.nn), nn);
            prop_assert_eq!(rt.to_string(), text);
        }

        #[test]
        fn out_of_range_route_targets_are_rejected(
            asn in 65536u32..10_000_000,
            nn in 0u32..=65535,
        ) {
            let forward = format!("{asn}:{nn}");
            let reversed = format!("{nn}:{asn}");
            prop_assert!(forward.parse::<RouteTarget>().is_err());
            prop_assert!(reversed.parse::<RouteTarget>().is_err());
        }
    }
}
