use std::collections::BTreeMap;
use std::fmt::Display;

use crate::settings::SettingsProvider;

/// Named tunables of a control, keyed by the same names used in the settings store.
pub type Properties = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces a raw persisted string into the same kind of value as `self`.
    pub fn coerce(&self, raw: &str) -> PropertyValue {
        match self {
            PropertyValue::Bool(_) => PropertyValue::Bool(raw == "true"),
            PropertyValue::Number(_) => PropertyValue::Number(parse_int(raw)),
            PropertyValue::Text(_) => PropertyValue::Text(raw.to_string()),
        }
    }

    /// The string form written to the settings store.
    pub fn to_persisted(&self) -> String {
        self.to_string()
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                write!(f, "{:.0}", n)
            }
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Number(value.into())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value as f64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// Builds a property map from `(key, value)` pairs.
pub fn properties<K, V, I>(entries: I) -> Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parses a leading base-10 integer the way the settings store has always been read:
/// leading whitespace and a sign are allowed, trailing garbage is ignored,
/// and no digits at all gives NaN.
pub fn parse_int(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    // Digit runs longer than i64 still parse as f64.
    let value: f64 = digits.parse().unwrap_or(f64::NAN);
    if negative { -value } else { value }
}

/// Resolves each default against the settings store.
///
/// A key with a non-empty persisted value takes that value, coerced to the
/// kind of its default; everything else keeps the default.
pub fn resolve_defaults(defaults: &Properties, provider: &dyn SettingsProvider) -> Properties {
    defaults
        .iter()
        .map(|(key, default)| {
            let value = match provider.get_value(key) {
                Some(raw) if !raw.is_empty() => default.coerce(&raw),
                _ => default.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}
