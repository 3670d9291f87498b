// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BGP VPN service extension.

use std::fmt;

use strum::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// A single rejected attribute in a request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Attribute name as it appears in the payload.
    pub field: String,
    /// Human-readable reason the value was rejected.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input for {}: {}", self.field, self.message)
    }
}

/// Driver calls made by the orchestrator, used to label driver failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum DriverOperation {
    CreateConnection,
    UpdateConnection,
    DeleteConnection,
    NotifyPortUpdated,
    RemovePortFromBgpvpnAgent,
}

/// Machine-checkable classification of a [`BgpvpnError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    ImmutableField,
    NotFound,
    DuplicateValidator,
    ResourceConflict,
    Schema,
    ReferencedResource,
    Persistence,
    Driver,
    DriverNotFound,
    Config,
    Internal,
}

/// The error type shared by every crate in the workspace.
#[derive(Debug, Error)]
pub enum BgpvpnError {
    /// One or more payload attributes failed conversion or validation.
    #[error("{}", format_validation(.errors))]
    Validation { errors: Vec<FieldError> },

    /// An update payload touched an attribute that cannot change after creation.
    #[error("cannot update read-only attribute {field}")]
    ImmutableField { field: String },

    /// No record exists for the given identifier.
    #[error("{resource} {id} could not be found")]
    NotFound { resource: String, id: String },

    /// A validator rule name was registered twice.
    #[error("validator `{name}` is already registered")]
    DuplicateValidator { name: String },

    /// A resource member or collection name was registered twice.
    #[error("resource `{name}` is already registered")]
    ResourceConflict { name: String },

    /// A resource attribute schema declaration is inconsistent.
    #[error("invalid schema for resource `{resource}`: {message}")]
    Schema { resource: String, message: String },

    /// A network cannot be removed while connections still reference it.
    #[error(
        "network {network_id} is still in use by BGP VPN connection(s) {}",
        format_ids(.connections)
    )]
    ReferencedResource {
        network_id: Uuid,
        connections: Vec<Uuid>,
    },

    /// The persistence backend failed; no driver call was made.
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The driver failed after the store had already committed.
    #[error("driver call {operation} failed{}: {source}", format_connection(.connection_id))]
    Driver {
        operation: DriverOperation,
        connection_id: Option<Uuid>,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configured driver name is not in the driver registry.
    #[error("unknown BGP VPN driver `{name}` (available: {})", .available.join(", "))]
    DriverNotFound {
        name: String,
        available: Vec<String>,
    },

    /// Configuration errors discovered while wiring the service.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BgpvpnError {
    /// Shorthand for a single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        BgpvpnError::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Returns the machine-checkable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BgpvpnError::Validation { .. } => ErrorKind::Validation,
            BgpvpnError::ImmutableField { .. } => ErrorKind::ImmutableField,
            BgpvpnError::NotFound { .. } => ErrorKind::NotFound,
            BgpvpnError::DuplicateValidator { .. } => ErrorKind::DuplicateValidator,
            BgpvpnError::ResourceConflict { .. } => ErrorKind::ResourceConflict,
            BgpvpnError::Schema { .. } => ErrorKind::Schema,
            BgpvpnError::ReferencedResource { .. } => ErrorKind::ReferencedResource,
            BgpvpnError::Persistence { .. } => ErrorKind::Persistence,
            BgpvpnError::Driver { .. } => ErrorKind::Driver,
            BgpvpnError::DriverNotFound { .. } => ErrorKind::DriverNotFound,
            BgpvpnError::Config(_) => ErrorKind::Config,
            BgpvpnError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// HTTP-equivalent status for the boundary layer.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::ImmutableField => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::ReferencedResource => 409,
            _ => 500,
        }
    }

    /// True for errors that indicate a programming or deployment mistake
    /// and must abort initialization.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::DuplicateValidator
                | ErrorKind::ResourceConflict
                | ErrorKind::Schema
                | ErrorKind::DriverNotFound
                | ErrorKind::Config
        )
    }

    /// Field errors carried by a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            BgpvpnError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

fn format_validation(errors: &[FieldError]) -> String {
    match errors {
        [] => "invalid request".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more)", rest.len()),
    }
}

fn format_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_connection(id: &Option<Uuid>) -> String {
    match id {
        Some(id) => format!(" for connection {id}"),
        None => String::new(),
    }
}
