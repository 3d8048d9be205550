use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive type of a field, as inferred from its values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Integer,
    Number,
    Date,
    String,
}

/// Vega-Lite measurement type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    Nominal,
    Ordinal,
    Quantitative,
    Temporal,
}

/// Measurement types offered when a user overrides the inferred one.
/// Ordinal is not offered yet.
pub const MTYPES: [MeasureType; 3] = [
    MeasureType::Nominal,
    MeasureType::Quantitative,
    MeasureType::Temporal,
];

impl PrimitiveType {
    pub fn measure_type(&self) -> MeasureType {
        match self {
            PrimitiveType::Boolean => MeasureType::Nominal,
            PrimitiveType::Integer => MeasureType::Quantitative,
            PrimitiveType::Number => MeasureType::Quantitative,
            PrimitiveType::Date => MeasureType::Temporal,
            PrimitiveType::String => MeasureType::Nominal,
        }
    }

    fn test(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::Boolean => is_boolean_value(value),
            PrimitiveType::Integer => is_integer_value(value),
            PrimitiveType::Number => is_number_value(value),
            PrimitiveType::Date => is_date_value(value),
            PrimitiveType::String => true,
        }
    }
}

pub fn is_boolean_value(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::String(s) => s == "true" || s == "false",
        _ => false,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s {
                "Infinity" | "+Infinity" => Some(f64::INFINITY),
                "-Infinity" => Some(f64::NEG_INFINITY),
                _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
            }
        }
        _ => None,
    }
}

pub fn is_number_value(value: &Value) -> bool {
    as_number(value).is_some()
}

/// Integers are numbers that survive truncation to a 32-bit integer unchanged
pub fn is_integer_value(value: &Value) -> bool {
    match as_number(value) {
        Some(v) => v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64,
        None => false,
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d %Y", "%B %d, %Y", "%d %b %Y",
];

pub fn is_date_string(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
}

/// Numbers are accepted as dates (they are interpreted as timestamps or years)
pub fn is_date_value(value: &Value) -> bool {
    match value {
        Value::String(s) => is_number_value(value) || is_date_string(s),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Infer the primitive type of a sequence of values.
///
/// Candidate types are tested in precedence order (boolean, integer, number, date) and
/// discarded as soon as a valid value fails their test. Null values are ignored. If every
/// candidate is discarded the type is string.
pub fn infer_type<'a, I>(values: I) -> PrimitiveType
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut candidates = vec![
        PrimitiveType::Boolean,
        PrimitiveType::Integer,
        PrimitiveType::Number,
        PrimitiveType::Date,
    ];
    for value in values {
        if value.is_null() {
            continue;
        }
        candidates.retain(|candidate| candidate.test(value));
        if candidates.is_empty() {
            return PrimitiveType::String;
        }
    }
    candidates[0]
}

/// Infer the primitive type of every field of a collection of row objects.
///
/// Fields are taken from the first row, in its key order.
pub fn infer_all(rows: &[Value]) -> Vec<(String, PrimitiveType)> {
    let fields: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return Vec::new(),
    };

    fields
        .into_iter()
        .map(|field| {
            let dtype = infer_type(rows.iter().filter_map(|row| row.get(&field)));
            (field, dtype)
        })
        .collect()
}
