use serde_json::Value;

/// Coerces an artifact id to an integer key.
///
/// Accepts integers, floats with an integral value (`10.0`), and strings
/// holding either. Anything else is `None` and the caller drops the entry.
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => coerce_id_str(s),
        _ => None,
    }
}

/// String form of [`coerce_id`], used for JSON object keys.
pub fn coerce_id_str(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(integral))
}

/// A score is any finite JSON number; `null` and everything else is missing.
pub fn coerce_score(value: &Value) -> Option<f64> {
    value.as_f64().filter(|score| score.is_finite())
}

fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
