//! Declarative request-body validation.
//!
//! A rule set is a slice of [`ValidationField`]s evaluated in order against a JSON
//! object. Evaluation is pure: [`validate_record`] never touches its input and returns
//! a new record in which masked fields carry their transformed value. Evaluation stops
//! at the first invalid field, whose message is the one reported to the client.
//!
//! Handlers normally never call this module directly; they take a
//! [`ValidatedJson`] extractor whose target type names its rule set.

pub mod extractor;
pub mod formats;
pub mod masks;
pub mod rules;

use serde_json::{Map, Value};
use std::fmt;

use crate::error::AppError;

pub use extractor::{BodyRules, ValidatedJson};
pub use formats::Format;
pub use masks::Mask;

/// Expected JSON type of a field, mirroring `typeof` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// JSON objects and arrays.
    Object,
}

impl FieldType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object() || value.is_array(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
        };
        f.write_str(name)
    }
}

/// The contract of one field in a request body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationField {
    /// Key of the field in the JSON body; also used in error messages.
    pub name: &'static str,
    /// Expected JSON type; unchecked when `None`.
    pub field_type: Option<FieldType>,
    /// Absent and `null` values are rejected when set.
    pub required: bool,
    /// Lower bound: numeric for numbers, length for strings and arrays.
    pub min: Option<f64>,
    /// Upper bound: numeric for numbers, length for strings and arrays.
    pub max: Option<f64>,
    /// Named predicate the string value must satisfy.
    pub format: Option<Format>,
    /// Transform applied to the value once every check passed.
    pub mask: Option<Mask>,
}

impl ValidationField {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            field_type: None,
            required: false,
            min: None,
            max: None,
            format: None,
            mask: None,
        }
    }

    pub const fn of_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub const fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// Outcome of checking a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The field passed; carries the masked replacement value when a mask applied.
    Valid(Option<Value>),
    /// The field failed with a client-facing message.
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(details) => Some(details),
        }
    }
}

/// Checks one field value against its contract.
///
/// `value` is `None` when the key is absent from the record; JSON `null` counts as absent.
pub fn validate_field(field: &ValidationField, value: Option<&Value>) -> ValidationResult {
    let name = field.name;
    let value = match value {
        Some(value) if !value.is_null() => value,
        _ if field.required => {
            return ValidationResult::Invalid(format!("The field {} is required.", name))
        }
        _ => return ValidationResult::Valid(None),
    };

    if let Some(field_type) = field.field_type {
        if !field_type.matches(value) {
            return ValidationResult::Invalid(format!(
                "The field {} must be of type {}.",
                name, field_type
            ));
        }
    }

    if let Some(format) = field.format {
        if !format.check(value) {
            return ValidationResult::Invalid(format!("The field {} must be a valid format.", name));
        }
    }

    if let Some(min) = field.min {
        match measure(value) {
            Some(Measure::Number(number)) if number < min => {
                return ValidationResult::Invalid(format!(
                    "The field {} must be at least {}.",
                    name, min
                ))
            }
            Some(Measure::Length(length)) if (length as f64) < min => {
                return ValidationResult::Invalid(format!(
                    "The field size of {} must be at least {}.",
                    name, min
                ))
            }
            _ => {}
        }
    }

    if let Some(max) = field.max {
        match measure(value) {
            Some(Measure::Number(number)) if number > max => {
                return ValidationResult::Invalid(format!(
                    "The field {} must not exceed {}.",
                    name, max
                ))
            }
            Some(Measure::Length(length)) if (length as f64) > max => {
                return ValidationResult::Invalid(format!(
                    "The field size of {} must not exceed {}.",
                    name, max
                ))
            }
            _ => {}
        }
    }

    let masked = field
        .mask
        .and_then(|mask| value.as_str().map(|text| Value::String(mask.apply(text))));
    ValidationResult::Valid(masked)
}

enum Measure {
    Number(f64),
    Length(usize),
}

fn measure(value: &Value) -> Option<Measure> {
    match value {
        Value::Number(number) => number.as_f64().map(Measure::Number),
        Value::String(text) => Some(Measure::Length(text.chars().count())),
        Value::Array(items) => Some(Measure::Length(items.len())),
        _ => None,
    }
}

/// The masked record together with the per-field results that produced it.
#[derive(Debug, Clone)]
pub struct Validation {
    pub record: Map<String, Value>,
    /// One entry per evaluated field, in rule order. Ends at the first invalid field.
    pub results: Vec<(&'static str, ValidationResult)>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_valid())
    }

    pub fn first_error(&self) -> Option<&str> {
        self.results.iter().find_map(|(_, result)| result.details())
    }

    /// Hands back the masked record, or the first failure as a `BadRequest`.
    pub fn into_record(self) -> Result<Map<String, Value>, AppError> {
        match self.first_error() {
            Some(details) => Err(AppError::BadRequest(details.to_string())),
            None => Ok(self.record),
        }
    }
}

/// Evaluates `fields` against `record` and returns a new, masked record.
///
/// The input record is never modified, so a rejected record carries no partial masking.
/// Keys not named by any rule pass through unchanged.
pub fn validate_record(fields: &[ValidationField], record: &Map<String, Value>) -> Validation {
    let mut masked = record.clone();
    let mut results = Vec::with_capacity(fields.len());

    for field in fields {
        let result = validate_field(field, record.get(field.name));
        if let ValidationResult::Valid(Some(value)) = &result {
            masked.insert(field.name.to_string(), value.clone());
        }
        let failed = !result.is_valid();
        results.push((field.name, result));
        if failed {
            break;
        }
    }

    Validation {
        record: masked,
        results,
    }
}
