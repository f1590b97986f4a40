//! Declarative record shapes and the one validator that checks them.

use crate::error::Error;
use crate::Result;
use serde_json::{Map, Value};

/// What a field's value must look like.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    /// A string with at least one non-whitespace character.
    NonEmptyString,
    /// Any JSON number, optionally bounded (inclusive).
    Number { min: Option<f64>, max: Option<f64> },
    Boolean,
    /// An array with elements of any kind.
    Array,
    /// An array whose elements are objects of the given shape.
    ArrayOf(Shape),
    Object(Shape),
    Any,
}

impl FieldKind {
    pub fn number() -> Self {
        FieldKind::Number {
            min: None,
            max: None,
        }
    }

    pub fn number_in(min: f64, max: f64) -> Self {
        FieldKind::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn non_negative() -> Self {
        FieldKind::Number {
            min: Some(0.0),
            max: None,
        }
    }

    /// A confidence score in `[0, 1]`.
    pub fn confidence() -> Self {
        Self::number_in(0.0, 1.0)
    }

    fn describe(&self) -> String {
        match self {
            FieldKind::String => "string".into(),
            FieldKind::NonEmptyString => "non-empty string".into(),
            FieldKind::Number {
                min: Some(lo),
                max: Some(hi),
            } => format!("number in [{}, {}]", lo, hi),
            FieldKind::Number { min: Some(lo), .. } => format!("number >= {}", lo),
            FieldKind::Number { max: Some(hi), .. } => format!("number <= {}", hi),
            FieldKind::Number { .. } => "number".into(),
            FieldKind::Boolean => "boolean".into(),
            FieldKind::Array => "array".into(),
            FieldKind::ArrayOf(_) => "array of objects".into(),
            FieldKind::Object(_) => "object".into(),
            FieldKind::Any => "any value".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    /// Insert `[]` when the field is absent.
    pub default_empty_array: bool,
}

/// An ordered set of field specs for one JSON object.
///
/// Keys not declared in the shape are allowed and passed through untouched.
///
/// ```
/// use clinic_genai::structured::{FieldKind, Shape};
///
/// let code = Shape::new()
///     .required("code", FieldKind::NonEmptyString)
///     .required("confidenceScore", FieldKind::confidence());
/// let shape = Shape::new()
///     .required("suggestedCodes", FieldKind::ArrayOf(code))
///     .optional("changeHistory", FieldKind::String);
/// assert_eq!(shape.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    fields: Vec<FieldSpec>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, true, false)
    }

    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, false, false)
    }

    /// Optional array field that reads as `[]` when the model leaves it out.
    pub fn optional_or_empty(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, false, true)
    }

    fn push(mut self, name: String, kind: FieldKind, required: bool, default_empty_array: bool) -> Self {
        self.fields.retain(|f| f.name != name);
        self.fields.push(FieldSpec {
            name,
            kind,
            required,
            default_empty_array,
        });
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// Check `object` against this shape, filling array defaults in place.
    ///
    /// `path` is the location of `object` itself; empty for the root.
    pub fn validate(&self, object: &mut Map<String, Value>, path: &str) -> Result<()> {
        for spec in &self.fields {
            let field_path = join(path, &spec.name);
            let present = object.get(&spec.name).map_or(false, |v| !v.is_null());

            if !present {
                if spec.required {
                    return Err(Error::malformed_field(field_path, "missing required field"));
                }
                if spec.default_empty_array {
                    object.insert(spec.name.clone(), Value::Array(Vec::new()));
                }
                continue;
            }

            if let Some(value) = object.get_mut(&spec.name) {
                check_value(&spec.kind, value, &field_path)?;
            }
        }
        Ok(())
    }
}

fn check_value(kind: &FieldKind, value: &mut Value, path: &str) -> Result<()> {
    let mismatch = || {
        Error::malformed_field(
            path,
            format!("expected {}, found {}", kind.describe(), type_name(value)),
        )
    };

    match kind {
        FieldKind::Any => Ok(()),
        FieldKind::String => value.is_string().then_some(()).ok_or_else(mismatch),
        FieldKind::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => Ok(()),
            Some(_) => Err(Error::malformed_field(path, "must not be empty")),
            None => Err(mismatch()),
        },
        FieldKind::Boolean => value.is_boolean().then_some(()).ok_or_else(mismatch),
        FieldKind::Number { min, max } => {
            let n = value.as_f64().ok_or_else(mismatch)?;
            if min.map_or(false, |lo| n < lo) || max.map_or(false, |hi| n > hi) {
                return Err(Error::malformed_field(
                    path,
                    format!("{} is outside {}", n, kind.describe()),
                ));
            }
            Ok(())
        }
        FieldKind::Array => value.is_array().then_some(()).ok_or_else(mismatch),
        FieldKind::Object(shape) => {
            if !value.is_object() {
                return Err(mismatch());
            }
            match value.as_object_mut() {
                Some(obj) => shape.validate(obj, path),
                None => Ok(()),
            }
        }
        FieldKind::ArrayOf(shape) => {
            if !value.is_array() {
                return Err(mismatch());
            }
            let items = match value.as_array_mut() {
                Some(items) => items,
                None => return Ok(()),
            };
            for (i, item) in items.iter_mut().enumerate() {
                let item_path = format!("{}[{}]", path, i);
                let found = type_name(item);
                let obj = item.as_object_mut().ok_or_else(|| {
                    Error::malformed_field(&item_path, format!("expected object, found {}", found))
                })?;
                shape.validate(obj, &item_path)?;
            }
            Ok(())
        }
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
