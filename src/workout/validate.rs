use serde_json::Value;

/// Loose truthiness of a JSON value.
///
/// `null`, `false`, `0`, `NaN` and `""` are falsy. Objects and arrays are
/// truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text form of a `short_id` value for file names and logs.
///
/// Strings are used as-is and numbers in their shortest form. Falsy values,
/// arrays and objects give `None`.
pub fn short_id_label(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
            _ => n.to_string(),
        }),
        Value::Bool(_) => Some("true".to_string()),
        _ => None,
    }
}

/// Cheap discriminator for workout payloads.
///
/// True iff `value` is an object with truthy `biometrics` and `exercises`
/// fields. This is a shape check, not schema validation.
pub fn is_workout_record(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("biometrics").is_some_and(is_truthy) && obj.get("exercises").is_some_and(is_truthy)
}
