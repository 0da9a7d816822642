//! Free-form playtime strings ("23h 17m", "12 Hours", "45 Mins") to hours.
//!
//! Parsing is fail-soft: anything that is not a string, or any malformed
//! hour/minute token, yields `0.0` for the whole input. A zero result
//! therefore means either "no time" or "could not parse".

use once_cell::sync::Lazy;
use regex::Regex;

static HOUR_WORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\d|\s)(hours|hour|hrs|hr)\b").expect("valid hour regex"));

static MINUTE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|\d|\s)(minutes|minute|mins|min)\b").expect("valid minute regex")
});

// "12 h" -> "12h"
static DETACHED_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\s+([hm])\b").expect("valid unit regex"));

pub fn parse_duration(text: Option<&str>) -> f64 {
    match text {
        Some(text) => match try_parse(text) {
            Some(hours) => hours,
            None => {
                tracing::trace!("Unparseable duration '{}', counting as 0h", text);
                0.0
            }
        },
        None => 0.0,
    }
}

/// Same as [`parse_duration`] for a raw JSON field; non-strings are 0.
pub fn parse_duration_value(value: Option<&serde_json::Value>) -> f64 {
    parse_duration(value.and_then(|v| v.as_str()))
}

fn try_parse(text: &str) -> Option<f64> {
    let lowered = text.to_lowercase().replace('½', ".5");
    let canonical = HOUR_WORDS.replace_all(&lowered, "${1}h");
    let canonical = MINUTE_WORDS.replace_all(&canonical, "${1}m");
    let canonical = DETACHED_UNIT.replace_all(&canonical, "${1}${2}");

    let mut hours = 0.0;
    let mut minutes = 0.0;

    for token in canonical.split_whitespace() {
        if token.contains('h') {
            hours += numeric_prefix(token, 'h')?;
        } else if token.contains('m') {
            minutes += numeric_prefix(token, 'm')?;
        }
    }

    let total = hours + minutes / 60.0;
    total.is_finite().then(|| round2(total))
}

fn numeric_prefix(token: &str, unit: char) -> Option<f64> {
    let number = token.strip_suffix(unit)?;
    // ".5h" comes from a bare "½ Hours"
    let number = if number.starts_with('.') {
        format!("0{}", number)
    } else {
        number.to_string()
    };
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Two-decimal rounding. Values too large to scale are returned as is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
