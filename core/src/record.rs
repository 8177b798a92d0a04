//! The request record: an unordered bag of string-keyed values.
//!
//! Records come from either a query string (every value is a string) or a
//! JSON object body (values keep their JSON type). Repeated keys collapse to
//! the last value.

use crate::error::{ServiceError, ServiceResult};
use serde_json::{Map, Value};

/// String-keyed values extracted from one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestRecord {
    fields: Map<String, Value>,
}

impl RequestRecord {
    /// Empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a form-urlencoded query string. A leading `?` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the query string cannot be decoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use sidecar_core::RequestRecord;
    ///
    /// let record = RequestRecord::from_query("?text=hi+there&port=80&port=81").unwrap();
    /// assert_eq!(record.get_str("text"), Some("hi there"));
    /// assert_eq!(record.get_str("port"), Some("81"));
    /// ```
    pub fn from_query(query: &str) -> ServiceResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| ServiceError::bad_request(format!("malformed query string: {e}")))?;

        Ok(pairs.into_iter().collect())
    }

    /// Wrap a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Unclassified` for `null`, which has no fields to look up,
    /// and `BadRequest` for any other value that is not a JSON object.
    pub fn from_json(value: Value) -> ServiceResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(ServiceError::unclassified("JSON body is null")),
            other => Err(ServiceError::bad_request(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Insert a value, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Value for `key` if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Whether `key` is present at all (even as `null` or `""`).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Whether `key` holds a truthy value (see [`is_truthy`]).
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(is_truthy)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, String)> for RequestRecord {
    fn from_iter<T: IntoIterator<Item = (K, String)>>(iter: T) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, Value::String(value));
        }
        record
    }
}

/// Truthiness of a loosely-typed field.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy; everything else, including
/// empty arrays and objects, is truthy. Optional fields holding a falsy value
/// are treated as absent.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render a value as display text.
///
/// Strings are returned verbatim, integral numbers without a fractional part,
/// arrays as comma-joined elements.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
