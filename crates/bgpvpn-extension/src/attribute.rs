// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative attribute schemas.
//!
//! An [`AttributeSchema`] describes every field of a resource: whether it may
//! appear in create and update bodies, its default, its converter, the
//! validation rules it must pass, and whether it is rendered back to callers.
//! Schemas are built once at startup and then only read.

use std::collections::HashSet;

use bgpvpn_core::{BgpvpnError, FieldError, RequestContext};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::validators::{display_value, ValidatorRegistry};

/// Attribute holding the owning tenant, filled from the request context
/// when a create body omits it.
pub const TENANT_ID: &str = "tenant_id";

/// Normalization applied to a supplied value before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Converter {
    /// Wrap a scalar into a one-element list; lists and null pass through.
    List,
    /// Accept booleans, 0/1, and "true"/"false"/"0"/"1" strings.
    Boolean,
}

impl Converter {
    pub fn apply(self, value: Value) -> Result<Value, String> {
        match self {
            Converter::List => Ok(match value {
                Value::Array(_) | Value::Null => value,
                scalar => Value::Array(vec![scalar]),
            }),
            Converter::Boolean => match &value {
                Value::Bool(_) => Ok(value),
                Value::Number(n) if n.as_u64() == Some(0) => Ok(Value::Bool(false)),
                Value::Number(n) if n.as_u64() == Some(1) => Ok(Value::Bool(true)),
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "true" | "1" => Ok(Value::Bool(true)),
                    "false" | "0" => Ok(Value::Bool(false)),
                    _ => Err(format!("'{s}' cannot be converted to boolean")),
                },
                other => Err(format!(
                    "'{}' cannot be converted to boolean",
                    display_value(other)
                )),
            },
        }
    }
}

/// A validation rule reference with its optional arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorRef {
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Description of a single resource attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub allow_post: bool,
    pub allow_put: bool,
    /// `None` makes the attribute required on create.
    pub default: Option<Value>,
    pub validators: Vec<ValidatorRef>,
    pub convert_to: Option<Converter>,
    pub is_visible: bool,
    pub primary_key: bool,
    pub required_by_policy: bool,
}

impl AttributeDescriptor {
    /// A visible, create-only, required attribute without rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow_post: true,
            allow_put: false,
            default: None,
            validators: Vec::new(),
            convert_to: None,
            is_visible: true,
            primary_key: false,
            required_by_policy: false,
        }
    }

    /// Allow the attribute in update bodies.
    pub fn mutable(mut self) -> Self {
        self.allow_put = true;
        self
    }

    /// Forbid the attribute in both create and update bodies.
    pub fn read_only(mut self) -> Self {
        self.allow_post = false;
        self.allow_put = false;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn validate(mut self, rule: &str, args: Option<Value>) -> Self {
        self.validators.push(ValidatorRef {
            rule: rule.to_string(),
            args,
        });
        self
    }

    pub fn convert(mut self, converter: Converter) -> Self {
        self.convert_to = Some(converter);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn required_by_policy(mut self) -> Self {
        self.required_by_policy = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_visible = false;
        self
    }

    pub fn is_required(&self) -> bool {
        self.allow_post && self.default.is_none()
    }
}

/// Collects attribute descriptors before the consistency checks of [`build`].
///
/// [`build`]: AttributeSchemaBuilder::build
#[derive(Debug)]
pub struct AttributeSchemaBuilder {
    resource: String,
    fields: Vec<AttributeDescriptor>,
}

impl AttributeSchemaBuilder {
    pub fn field(mut self, descriptor: AttributeDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Check the declarations and freeze them into a schema.
    ///
    /// Fails when a field name repeats, when there is not exactly one
    /// primary key, when the primary key is writable, or when a field
    /// references a rule missing from `validators`.
    pub fn build(self, validators: &ValidatorRegistry) -> Result<AttributeSchema, BgpvpnError> {
        let schema_error = |message: String| BgpvpnError::Schema {
            resource: self.resource.clone(),
            message,
        };

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(schema_error(format!("duplicate field `{}`", field.name)));
            }
            for rule in &field.validators {
                if !validators.contains(&rule.rule) {
                    return Err(schema_error(format!(
                        "field `{}` references unknown validator `{}`",
                        field.name, rule.rule
                    )));
                }
            }
        }

        let keys: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(i, _)| i)
            .collect();
        let primary_key = match keys.as_slice() {
            [only] => *only,
            [] => return Err(schema_error("no primary key field".to_string())),
            _ => return Err(schema_error("more than one primary key field".to_string())),
        };
        let key = &self.fields[primary_key];
        if key.allow_post || key.allow_put {
            return Err(schema_error(format!(
                "primary key `{}` must not be writable",
                key.name
            )));
        }

        Ok(AttributeSchema {
            resource: self.resource,
            fields: self.fields,
            primary_key,
        })
    }
}

/// The validated, immutable attribute map of one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    resource: String,
    fields: Vec<AttributeDescriptor>,
    #[serde(skip)]
    primary_key: usize,
}

impl AttributeSchema {
    pub fn builder(resource: impl Into<String>) -> AttributeSchemaBuilder {
        AttributeSchemaBuilder {
            resource: resource.into(),
            fields: Vec::new(),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[AttributeDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key(&self) -> &AttributeDescriptor {
        &self.fields[self.primary_key]
    }

    /// Names accepted in create bodies.
    pub fn post_allowed(&self) -> Vec<&str> {
        self.names_where(|f| f.allow_post)
    }

    /// Names accepted in update bodies.
    pub fn put_allowed(&self) -> Vec<&str> {
        self.names_where(|f| f.allow_put)
    }

    /// Names rendered back to callers.
    pub fn visible(&self) -> Vec<&str> {
        self.names_where(|f| f.is_visible)
    }

    fn names_where(&self, pred: impl Fn(&AttributeDescriptor) -> bool) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| pred(f))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Turn a create payload into a complete, normalized body.
    ///
    /// Defaults fill omitted attributes; converters and rules run only on
    /// supplied values. Every problem is collected before failing.
    pub fn prepare_create(
        &self,
        validators: &ValidatorRegistry,
        ctx: &RequestContext,
        payload: &Map<String, Value>,
    ) -> Result<Map<String, Value>, BgpvpnError> {
        let mut errors = self.unrecognized(payload);
        let mut body = Map::new();

        for attr in &self.fields {
            match payload.get(&attr.name) {
                Some(_) if !attr.allow_post => errors.push(FieldError::new(
                    &attr.name,
                    format!("attribute '{}' not allowed in POST", attr.name),
                )),
                Some(value) => match self.check(validators, attr, value.clone()) {
                    Ok(value) => {
                        body.insert(attr.name.clone(), value);
                    }
                    Err(message) => errors.push(FieldError::new(&attr.name, message)),
                },
                None if !attr.allow_post => {}
                None if attr.name == TENANT_ID => {
                    body.insert(attr.name.clone(), Value::String(ctx.tenant_id.clone()));
                }
                None => match &attr.default {
                    Some(default) => {
                        body.insert(attr.name.clone(), default.clone());
                    }
                    None => errors.push(FieldError::new(
                        &attr.name,
                        format!("required attribute '{}' not specified", attr.name),
                    )),
                },
            }
        }

        self.finish(errors, body)
    }

    /// Turn an update payload into a normalized partial body.
    ///
    /// Touching an attribute that is not update-allowed fails with
    /// [`BgpvpnError::ImmutableField`] before any value is inspected.
    pub fn prepare_update(
        &self,
        validators: &ValidatorRegistry,
        payload: &Map<String, Value>,
    ) -> Result<Map<String, Value>, BgpvpnError> {
        if let Some(attr) = self
            .fields
            .iter()
            .find(|f| !f.allow_put && payload.contains_key(&f.name))
        {
            debug!(
                resource = %self.resource,
                field = %attr.name,
                "rejected update of read-only attribute"
            );
            return Err(BgpvpnError::ImmutableField {
                field: attr.name.clone(),
            });
        }

        let mut errors = self.unrecognized(payload);
        let mut body = Map::new();
        for attr in &self.fields {
            if let Some(value) = payload.get(&attr.name) {
                match self.check(validators, attr, value.clone()) {
                    Ok(value) => {
                        body.insert(attr.name.clone(), value);
                    }
                    Err(message) => errors.push(FieldError::new(&attr.name, message)),
                }
            }
        }

        self.finish(errors, body)
    }

    /// Restrict a rendered record to visible attributes, and to `fields`
    /// when the caller asked for a subset.
    pub fn project(
        &self,
        record: &Map<String, Value>,
        fields: Option<&[String]>,
    ) -> Map<String, Value> {
        self.fields
            .iter()
            .filter(|f| f.is_visible)
            .filter(|f| fields.is_none_or(|wanted| wanted.iter().any(|w| w == &f.name)))
            .filter_map(|f| record.get(&f.name).map(|v| (f.name.clone(), v.clone())))
            .collect()
    }

    fn unrecognized(&self, payload: &Map<String, Value>) -> Vec<FieldError> {
        payload
            .keys()
            .filter(|key| self.field(key).is_none())
            .map(|key| FieldError::new(key, format!("unrecognized attribute '{key}'")))
            .collect()
    }

    fn check(
        &self,
        validators: &ValidatorRegistry,
        attr: &AttributeDescriptor,
        value: Value,
    ) -> Result<Value, String> {
        let value = match attr.convert_to {
            Some(converter) => converter.apply(value)?,
            None => value,
        };
        for rule in &attr.validators {
            if let Some(message) = validators.validate(&value, &rule.rule, rule.args.as_ref()) {
                return Err(message);
            }
        }
        Ok(value)
    }

    fn finish(
        &self,
        errors: Vec<FieldError>,
        body: Map<String, Value>,
    ) -> Result<Map<String, Value>, BgpvpnError> {
        if errors.is_empty() {
            return Ok(body);
        }
        for error in &errors {
            debug!(
                resource = %self.resource,
                field = %error.field,
                reason = %error.message,
                "rejected attribute"
            );
        }
        Err(BgpvpnError::Validation { errors })
    }
}
