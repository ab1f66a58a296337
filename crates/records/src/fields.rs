//! Field declarations for entity payloads
//!
//! A `FieldSpec` list drives three things: the JSON schema handed to the
//! model, the `input_fields` report in tool envelopes, and validation of
//! tool arguments before anything is sent to the remote service.

use crate::record::Record;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    String,
    Email,
    Integer,
    Number,
    Boolean,
    Object(&'static [FieldSpec]),
}

impl FieldKind {
    fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String | FieldKind::Email => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Object(_) => "object",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String | FieldKind::Email => value.is_string(),
            // models occasionally send 5.0 for an integer id
            FieldKind::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object(_) => value.is_object(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Explicit `null` is accepted and forwarded
    pub nullable: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            nullable: false,
            description,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            nullable: false,
            description,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Whether `value` counts as supplied for this field
    pub fn is_provided(&self, value: Option<&Value>) -> bool {
        match value {
            None => false,
            Some(Value::Null) => self.nullable,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }
}

/// One row of the `input_fields` report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    pub name: String,
    pub required: bool,
    pub description: String,
    pub provided: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Field '{field}' must be {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("Field '{0}' must be a valid email address")]
    InvalidEmail(String),
}

pub fn is_valid_email(candidate: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
        .is_match(candidate)
}

pub fn input_fields(specs: &[FieldSpec], args: &Map<String, Value>) -> Vec<InputField> {
    specs
        .iter()
        .map(|spec| InputField {
            name: spec.name.to_string(),
            required: spec.required,
            description: spec.description.to_string(),
            provided: spec.is_provided(args.get(spec.name)),
        })
        .collect()
}

/// Required fields that are absent, null or empty, as dotted paths
pub fn missing_required(specs: &[FieldSpec], args: &Map<String, Value>) -> Vec<String> {
    let mut missing = Vec::new();
    collect_missing(specs, args, "", &mut missing);
    missing
}

fn collect_missing(
    specs: &[FieldSpec],
    args: &Map<String, Value>,
    prefix: &str,
    missing: &mut Vec<String>,
) {
    for spec in specs {
        let value = args.get(spec.name);
        if spec.required && !spec.is_provided(value) {
            missing.push(format!("{prefix}{}", spec.name));
            continue;
        }
        if let (FieldKind::Object(children), Some(Value::Object(inner))) = (spec.kind, value) {
            collect_missing(children, inner, &format!("{prefix}{}.", spec.name), missing);
        }
    }
}

/// Check types and formats of every supplied field
pub fn validate(specs: &[FieldSpec], args: &Map<String, Value>) -> Result<(), ValidationError> {
    let missing = missing_required(specs, args);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    check_types(specs, args, "")
}

fn check_types(
    specs: &[FieldSpec],
    args: &Map<String, Value>,
    prefix: &str,
) -> Result<(), ValidationError> {
    for spec in specs {
        let Some(value) = args.get(spec.name) else {
            continue;
        };
        let path = format!("{prefix}{}", spec.name);

        if value.is_null() {
            if spec.nullable {
                continue;
            }
            return Err(ValidationError::WrongType {
                field: path,
                expected: spec.kind.json_type(),
            });
        }

        if !spec.kind.accepts(value) {
            return Err(ValidationError::WrongType {
                field: path,
                expected: spec.kind.json_type(),
            });
        }

        match (spec.kind, value) {
            (FieldKind::Email, Value::String(s)) if !is_valid_email(s) => {
                return Err(ValidationError::InvalidEmail(path));
            }
            (FieldKind::Object(children), Value::Object(inner)) => {
                check_types(children, inner, &format!("{path}."))?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Keep only declared fields, in argument order. Nested objects are
/// filtered against their own declarations.
pub fn select_known(specs: &[FieldSpec], args: &Map<String, Value>) -> Record {
    let mut record = Record::new();
    for (key, value) in args {
        let Some(spec) = specs.iter().find(|s| s.name == key) else {
            debug!("dropping undeclared field '{}'", key);
            continue;
        };
        let value = match (spec.kind, value) {
            (FieldKind::Object(children), Value::Object(inner)) => {
                select_known(children, inner).into_value()
            }
            _ => value.clone(),
        };
        record.insert(key.clone(), value);
    }
    record
}

/// JSON schema for a tool's `parameters`
pub fn json_schema(specs: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for spec in specs {
        let mut property = match spec.kind {
            FieldKind::Object(children) => json_schema(children),
            kind if spec.nullable => json!({ "type": [kind.json_type(), "null"] }),
            kind => json!({ "type": kind.json_type() }),
        };
        if spec.kind == FieldKind::Email {
            property["format"] = json!("email");
        }
        property["description"] = json!(spec.description);
        properties.insert(spec.name.to_string(), property);

        if spec.required {
            required.push(spec.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}
