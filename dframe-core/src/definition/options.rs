//! Checks over raw option objects shared by the factories.
//!
//! Each helper performs one check and returns the first failure; factories call them in a
//! fixed order so the reported error kind is deterministic.

use crate::error::{FrameworkError, Result};
use crate::permissions::Permissions;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub(crate) type Options = Map<String, Value>;

/// JSON-ish type name used in `InvalidType` errors.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Present and not null.
fn present<'a>(options: &'a Options, key: &str) -> Option<&'a Value> {
    options.get(key).filter(|v| !v.is_null())
}

pub(crate) fn object(options: &Value) -> Result<&Options> {
    match options {
        Value::Null => Err(FrameworkError::NoOptions),
        Value::Object(map) => Ok(map),
        other => Err(FrameworkError::invalid_type("options", "object", type_name(other))),
    }
}

/// Required non-empty string.
pub(crate) fn required_str(options: &Options, key: &str) -> Result<String> {
    match present(options, key) {
        None => Err(FrameworkError::InvalidOption(key.to_string())),
        Some(Value::String(s)) if s.is_empty() => Err(FrameworkError::InvalidOption(key.to_string())),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(FrameworkError::invalid_type(key, "string", type_name(other))),
    }
}

pub(crate) fn optional_str(options: &Options, key: &str) -> Result<Option<String>> {
    match present(options, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(FrameworkError::invalid_type(key, "string", type_name(other))),
    }
}

pub(crate) fn optional_bool(options: &Options, key: &str) -> Result<Option<bool>> {
    match present(options, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(FrameworkError::invalid_type(key, "boolean", type_name(other))),
    }
}

/// 2^64 as a float; every finite float below it fits in `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Optional non-negative number; fractional values are truncated. Floats outside the `u64`
/// range are rejected rather than saturated.
pub(crate) fn optional_u64(options: &Options, key: &str) -> Result<Option<u64>> {
    match present(options, key) {
        None => Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => Ok(Some(v)),
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f < U64_LIMIT => Ok(Some(f as u64)),
                _ => Err(FrameworkError::invalid_type(key, "non-negative number", "number")),
            },
        },
        Some(other) => Err(FrameworkError::invalid_type(key, "number", type_name(other))),
    }
}

pub(crate) fn optional_array<'a>(options: &'a Options, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match present(options, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(other) => Err(FrameworkError::invalid_type(key, "array", type_name(other))),
    }
}

/// Required scalar drawn from a closed set; reports the full set on failure.
pub(crate) fn required_enum<T>(
    options: &Options,
    key: &str,
    allowed: &[&str],
    parse: fn(&Value) -> Option<T>,
) -> Result<T> {
    let value = match present(options, key) {
        None => return Err(FrameworkError::InvalidOption(key.to_string())),
        Some(Value::String(s)) if s.is_empty() => return Err(FrameworkError::InvalidOption(key.to_string())),
        Some(value) => value,
    };
    parse(value).ok_or_else(|| FrameworkError::invalid_value(key, allowed))
}

/// Optional array whose members are drawn from a closed set; reports the full set on failure.
pub(crate) fn optional_enum_list<T>(
    options: &Options,
    key: &str,
    allowed: &[&str],
    parse: fn(&Value) -> Option<T>,
) -> Result<Option<Vec<T>>> {
    let Some(items) = optional_array(options, key)? else {
        return Ok(None);
    };
    items
        .iter()
        .map(|item| parse(item).ok_or_else(|| FrameworkError::invalid_values(key, allowed)))
        .collect::<Result<Vec<T>>>()
        .map(Some)
}

pub(crate) fn optional_permissions(options: &Options, key: &str) -> Result<Option<Permissions>> {
    match present(options, key) {
        None => Ok(None),
        Some(value) => Permissions::resolve(value)
            .map(Some)
            .ok_or_else(|| FrameworkError::invalid_type(key, "PermissionResolvable", type_name(value))),
    }
}

/// Optional `{ locale: text }` map.
pub(crate) fn optional_localizations(options: &Options, key: &str) -> Result<Option<BTreeMap<String, String>>> {
    match present(options, key) {
        None => Ok(None),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(locale, text)| match text {
                Value::String(s) => Ok((locale.clone(), s.clone())),
                other => Err(FrameworkError::invalid_type(key, "LocalizationMap", type_name(other))),
            })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Some),
        Some(other) => Err(FrameworkError::invalid_type(key, "LocalizationMap", type_name(other))),
    }
}

/// Handler key under `key`: required, a string, and registered in the catalog via `lookup`.
pub(crate) fn required_handler<H>(
    options: &Options,
    key: &str,
    kind: &'static str,
    lookup: impl Fn(&str) -> Option<H>,
) -> Result<H> {
    match present(options, key) {
        None => Err(FrameworkError::InvalidOption(key.to_string())),
        Some(Value::String(name)) => lookup(name).ok_or_else(|| FrameworkError::UnknownHandler {
            kind,
            key: name.clone(),
        }),
        Some(other) => Err(FrameworkError::invalid_type(key, "handler", type_name(other))),
    }
}

pub(crate) fn optional_handler<H>(
    options: &Options,
    key: &str,
    kind: &'static str,
    lookup: impl Fn(&str) -> Option<H>,
) -> Result<Option<H>> {
    if present(options, key).is_none() {
        return Ok(None);
    }
    required_handler(options, key, kind, lookup).map(Some)
}
