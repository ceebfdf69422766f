use serde_json::{Map, Value};
use thiserror::Error;

use super::preference::Preference;

/// Fields a recommendation request must carry, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "jee_advanced_rank",
    "jee_mains_rank",
    "max_fee",
    "min_salary",
    "category",
    "prefer_iit",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreferenceError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value format: {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> PreferenceError {
    PreferenceError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

/// Validate a raw request body and coerce it into a `Preference`.
///
/// Every field in `REQUIRED_FIELDS` must be present; the first missing one is
/// reported. Numbers may also arrive as numeric strings.
pub fn parse_preference(body: &Value) -> Result<Preference, PreferenceError> {
    let obj = body.as_object().ok_or(PreferenceError::NotAnObject)?;

    for field in REQUIRED_FIELDS {
        if !obj.contains_key(field) {
            return Err(PreferenceError::MissingField(field));
        }
    }

    Ok(Preference {
        jee_advanced_rank: coerce_rank(obj, "jee_advanced_rank")?,
        jee_mains_rank: coerce_rank(obj, "jee_mains_rank")?,
        max_fee: coerce_amount(obj, "max_fee")?,
        min_salary: coerce_amount(obj, "min_salary")?,
        category: coerce_category(obj, "category")?,
        prefer_iit: coerce_bool(obj, "prefer_iit")?,
    })
}

fn field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, PreferenceError> {
    obj.get(name).ok_or(PreferenceError::MissingField(name))
}

fn coerce_rank(obj: &Map<String, Value>, name: &'static str) -> Result<u64, PreferenceError> {
    let rank = match field(obj, name)? {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f >= 1.0 => f.trunc() as u64,
                    _ => return Err(invalid(name, format!("'{}' is not a positive integer", n))),
                }
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid(name, format!("'{}' is not a positive integer", s)))?,
        other => return Err(invalid(name, format!("expected an integer, got {}", other))),
    };

    if rank == 0 {
        return Err(invalid(name, "rank must be at least 1"));
    }
    Ok(rank)
}

fn coerce_amount(obj: &Map<String, Value>, name: &'static str) -> Result<f64, PreferenceError> {
    let amount = match field(obj, name)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| invalid(name, format!("'{}' is not a number", n)))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(name, format!("'{}' is not a number", s)))?,
        other => return Err(invalid(name, format!("expected a number, got {}", other))),
    };

    if !amount.is_finite() || amount < 0.0 {
        return Err(invalid(name, "must be a finite non-negative number"));
    }
    Ok(amount)
}

fn coerce_bool(obj: &Map<String, Value>, name: &'static str) -> Result<bool, PreferenceError> {
    match field(obj, name)? {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(invalid(name, format!("'{}' is not 0 or 1", n))),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(invalid(name, format!("'{}' is not a boolean", s))),
        },
        other => Err(invalid(name, format!("expected a boolean, got {}", other))),
    }
}

fn coerce_category(obj: &Map<String, Value>, name: &'static str) -> Result<String, PreferenceError> {
    match field(obj, name)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(invalid(name, "must not be empty")),
        other => Err(invalid(name, format!("expected a string, got {}", other))),
    }
}
