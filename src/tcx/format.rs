//! Value formatting for TCX documents

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Format milliseconds since the epoch as `YYYY-MM-DDTHH:mm:ss.sssZ`.
///
/// Years outside 0..=9999 use the expanded six-digit form with an explicit
/// sign (`+010000-01-01T00:00:00.000Z`). Returns `None` outside chrono's
/// representable range.
pub fn format_iso_millis(timestamp_ms: i64) -> Option<String> {
    let dt = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)?;
    let year = dt.year();
    if (0..=9999).contains(&year) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    let sign = if year < 0 { '-' } else { '+' };
    Some(format!(
        "{}{:06}-{}",
        sign,
        year.unsigned_abs(),
        dt.format("%m-%dT%H:%M:%S%.3fZ")
    ))
}

/// Shortest rendering of a number: `300`, `245.5`, `-12`.
///
/// Magnitudes from 1e21 up and below 1e-6 switch to exponent form
/// (`1e+21`, `1.5e-7`).
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid rendering negative zero as "-0"
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        };
    }
    value.to_string()
}

/// Escape the five XML metacharacters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
