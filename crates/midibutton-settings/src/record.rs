//! The flat settings record exchanged with the host.
//!
//! The host persists one JSON object per button (and one for the global
//! settings). Values are primitives only. Older property inspectors stored
//! numbers as strings, so every typed getter accepts both representations and
//! returns `None` instead of failing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A flat string-keyed map of primitive values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(Map<String, Value>);

impl SettingsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from JSON text. The text must hold an object.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Wrap a JSON value. `null` is treated as an empty record, since the host
    /// sends it for buttons that were never configured.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            Value::Bool(_) => Err(Error::NotAnObject("bool")),
            Value::Number(_) => Err(Error::NotAnObject("number")),
            Value::String(_) => Err(Error::NotAnObject("string")),
            Value::Array(_) => Err(Error::NotAnObject("array")),
        }
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn insert_int(&mut self, key: &str, value: i64) {
        self.0.insert(key.to_string(), Value::Number(value.into()));
    }

    /// Non-finite floats have no JSON form and are skipped.
    pub fn insert_float(&mut self, key: &str, value: f64) {
        if let Some(number) = Number::from_f64(value) {
            self.0.insert(key.to_string(), Value::Number(number));
        }
    }

    pub fn insert_bool(&mut self, key: &str, value: bool) {
        self.0.insert(key.to_string(), Value::Bool(value));
    }

    pub fn insert_str(&mut self, key: &str, value: &str) {
        self.0
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Integer value of `key`: a JSON integer, an integral float, or a numeric string.
    pub fn int(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        }
    }

    /// Float value of `key`: any JSON number or a numeric string.
    pub fn float(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Boolean value of `key`. Accepts `true`/`false`, `0`/`1` and their string forms.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }
}

impl From<Map<String, Value>> for SettingsRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<SettingsRecord> for Value {
    fn from(record: SettingsRecord) -> Self {
        record.into_value()
    }
}

fn integral(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}
