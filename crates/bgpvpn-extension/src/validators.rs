// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named attribute validation rules.
//!
//! A [`ValidatorRegistry`] maps rule names to pure check functions. It is
//! built once during startup (usually via [`ValidatorRegistry::with_builtins`])
//! and then shared read-only with every schema and the orchestrator.

use std::collections::{HashMap, HashSet};

use bgpvpn_core::types::is_route_target;
use bgpvpn_core::BgpvpnError;
use serde_json::Value;
use uuid::Uuid;

/// A validation rule: returns `None` when `value` is acceptable, or a
/// human-readable message describing the problem. `args` carries the
/// rule parameters declared next to the attribute (e.g. allowed values).
pub type ValidatorFn = fn(value: &Value, args: Option<&Value>) -> Option<String>;

pub const UUID: &str = "uuid";
pub const UUID_OR_NONE: &str = "uuid_or_none";
pub const STRING: &str = "string";
pub const VALUES: &str = "values";
pub const BOOLEAN: &str = "boolean";
pub const ROUTE_TARGET_LIST: &str = "route_target_list";
pub const ROUTE_TARGET_LIST_OR_NONE: &str = "route_target_list_or_none";

/// Registry of validation rules keyed by unique name.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    rules: HashMap<String, ValidatorFn>,
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

impl ValidatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in rule.
    pub fn with_builtins() -> Result<Self, BgpvpnError> {
        let mut registry = Self::new();
        registry.register_builtins()?;
        Ok(registry)
    }

    /// Register the built-in rules used by the connection attribute map.
    pub fn register_builtins(&mut self) -> Result<(), BgpvpnError> {
        self.register(UUID, validate_uuid)?;
        self.register(UUID_OR_NONE, validate_uuid_or_none)?;
        self.register(STRING, validate_string)?;
        self.register(VALUES, validate_values)?;
        self.register(BOOLEAN, validate_boolean)?;
        self.register(ROUTE_TARGET_LIST, validate_route_target_list)?;
        self.register(ROUTE_TARGET_LIST_OR_NONE, validate_route_target_list_or_none)?;
        Ok(())
    }

    /// Register a rule. Names are unique; registering one twice is an error.
    pub fn register(&mut self, name: &str, rule: ValidatorFn) -> Result<(), BgpvpnError> {
        if self.rules.contains_key(name) {
            return Err(BgpvpnError::DuplicateValidator {
                name: name.to_string(),
            });
        }
        self.rules.insert(name.to_string(), rule);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Check `value` against the rule called `rule`.
    pub fn validate(&self, value: &Value, rule: &str, args: Option<&Value>) -> Option<String> {
        match self.rules.get(rule) {
            Some(check) => check(value, args),
            None => Some(format!("no validator registered for rule '{rule}'")),
        }
    }
}

/// Render a JSON value the way it is quoted in validation messages.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn validate_uuid(value: &Value, _args: Option<&Value>) -> Option<String> {
    match value.as_str().map(Uuid::parse_str) {
        Some(Ok(_)) => None,
        _ => Some(format!("'{}' is not a valid UUID", display_value(value))),
    }
}

fn validate_uuid_or_none(value: &Value, args: Option<&Value>) -> Option<String> {
    if value.is_null() {
        return None;
    }
    validate_uuid(value, args)
}

fn validate_string(value: &Value, args: Option<&Value>) -> Option<String> {
    let Some(s) = value.as_str() else {
        return Some(format!("'{}' is not a valid string", display_value(value)));
    };
    if let Some(max_len) = args.and_then(Value::as_u64) {
        let len = s.chars().count() as u64;
        if len > max_len {
            return Some(format!("'{s}' exceeds maximum length of {max_len}"));
        }
    }
    None
}

fn validate_values(value: &Value, args: Option<&Value>) -> Option<String> {
    let allowed = args.and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();
    if allowed.contains(value) {
        return None;
    }
    let listed = allowed
        .iter()
        .map(display_value)
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("'{}' is not in [{listed}]", display_value(value)))
}

fn validate_boolean(value: &Value, _args: Option<&Value>) -> Option<String> {
    if value.is_boolean() {
        None
    } else {
        Some(format!("'{}' is not a valid boolean value", display_value(value)))
    }
}

fn validate_route_target_list(value: &Value, _args: Option<&Value>) -> Option<String> {
    let Some(items) = value.as_array() else {
        return Some(format!("'{}' is not a list", display_value(value)));
    };

    for item in items {
        match item.as_str() {
            Some(rt) if is_route_target(rt) => {}
            _ => {
                return Some(format!(
                    "'{}' is not a valid route target (expected ASN:NN with ASN and NN in 0-65535)",
                    display_value(item)
                ));
            }
        }
    }

    // Elements are all strings here; duplicates use exact string equality.
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for rt in items.iter().filter_map(Value::as_str) {
        if !seen.insert(rt) && !duplicates.contains(&rt) {
            duplicates.push(rt);
        }
    }
    if duplicates.is_empty() {
        None
    } else {
        Some(format!(
            "Duplicate items in the list: '{}'",
            duplicates.join(", ")
        ))
    }
}

fn validate_route_target_list_or_none(value: &Value, args: Option<&Value>) -> Option<String> {
    let empty = match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return None;
    }
    validate_route_target_list(value, args)
}
