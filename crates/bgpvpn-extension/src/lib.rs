// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! API extension layer for BGP VPN connections.
//!
//! Holds the named validation rules, the declarative attribute schema of the
//! connection resource, and the registry the boundary layer uses to build
//! routes and look up schemas.

pub mod attribute;
pub mod descriptor;
pub mod resource;
pub mod validators;

pub use attribute::{
    AttributeDescriptor, AttributeSchema, AttributeSchemaBuilder, Converter, ValidatorRef,
    TENANT_ID,
};
pub use descriptor::{
    connection_schema, AttributeInfo, BgpvpnExtension, ExtensionDescriptor, ResourceInfo, ALIAS,
    CONNECTION, CONNECTIONS, PATH_PREFIX, SERVICE_TYPE,
};
pub use resource::{pluralize, Resource, ResourceRegistry};
pub use validators::{ValidatorFn, ValidatorRegistry};
