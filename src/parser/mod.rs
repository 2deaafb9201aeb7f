//! Maps raw JSON replies onto the typed result objects.
//!
//! Missing fields take defaults and `null` counts as missing. Only a
//! non-object top level or a nested value of the wrong JSON type is an
//! error, reported as [`LlmError::MalformedResponse`] with the path of the
//! offending value.

pub mod brand;
pub mod content;
pub mod image;
pub mod product;
pub mod seo;

pub use brand::parse_brand;
pub use content::parse_content;
pub use image::parse_image;
pub use product::parse_product;
pub use seo::parse_seo;

use serde_json::{Map, Value};

use crate::error::LlmError;

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

/// Read-only view over one JSON object that knows where it sits in the
/// reply, so errors can name the exact structure.
#[derive(Debug, Clone)]
pub(crate) struct ObjectReader<'a> {
    map: Option<&'a Map<String, Value>>,
    path: String,
}

impl<'a> ObjectReader<'a> {
    pub fn root(value: &'a Value) -> Result<Self, LlmError> {
        match value {
            Value::Object(map) => Ok(Self {
                map: Some(map),
                path: String::new(),
            }),
            other => Err(LlmError::malformed(format!(
                "expected a JSON object at the top level, got {}",
                type_name(other)
            ))),
        }
    }

    fn path_of(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &Value) -> LlmError {
        LlmError::malformed(format!(
            "{}: expected {expected}, got {}",
            self.path_of(key),
            type_name(found)
        ))
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(key))
            .filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn opt_string(&self, key: &str) -> Result<Option<String>, LlmError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(other) => Err(self.wrong_type(key, "a string", other)),
        }
    }

    pub fn string(&self, key: &str) -> Result<String, LlmError> {
        Ok(self.opt_string(key)?.unwrap_or_default())
    }

    pub fn string_list(&self, key: &str) -> Result<Vec<String>, LlmError> {
        let items = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.wrong_type(key, "an array", other)),
        };

        items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
                other => Err(LlmError::malformed(format!(
                    "{}[{i}]: expected a string, got {}",
                    self.path_of(key),
                    type_name(other)
                ))),
            })
            .collect()
    }

    /// Nested object; absent reads as an empty object.
    pub fn object(&self, key: &str) -> Result<ObjectReader<'a>, LlmError> {
        match self.get(key) {
            None => Ok(ObjectReader {
                map: None,
                path: self.path_of(key),
            }),
            Some(Value::Object(map)) => Ok(ObjectReader {
                map: Some(map),
                path: self.path_of(key),
            }),
            Some(other) => Err(self.wrong_type(key, "an object", other)),
        }
    }

    pub fn opt_object(&self, key: &str) -> Result<Option<&'a Map<String, Value>>, LlmError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(other) => Err(self.wrong_type(key, "an object", other)),
        }
    }

    /// Array of objects, mapped element-wise.
    pub fn objects(&self, key: &str) -> Result<Vec<ObjectReader<'a>>, LlmError> {
        let items = match self.get(key) {
            None => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => return Err(self.wrong_type(key, "an array", other)),
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{i}]", self.path_of(key));
                match item {
                    Value::Object(map) => Ok(ObjectReader {
                        map: Some(map),
                        path,
                    }),
                    other => Err(LlmError::malformed(format!(
                        "{path}: expected an object, got {}",
                        type_name(other)
                    ))),
                }
            })
            .collect()
    }

    pub fn opt_f64(&self, key: &str) -> Result<Option<f64>, LlmError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(v @ Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| self.wrong_type(key, "a number", v)),
            Some(other) => Err(self.wrong_type(key, "a number", other)),
        }
    }

    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, LlmError> {
        Ok(self.opt_f64(key)?.unwrap_or(default))
    }

    pub fn opt_i64(&self, key: &str) -> Result<Option<i64>, LlmError> {
        Ok(self.opt_f64(key)?.map(|n| n.round() as i64))
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}
