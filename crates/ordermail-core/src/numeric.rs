//! Lenient numeric coercion for form values.
//!
//! Form fields arrive as strings (or, from JSON bodies, as any value). The
//! order arithmetic never rejects them:
//! - `parse_float` reads the longest leading decimal literal and ignores the rest
//! - `parse_number` falls back to a default when nothing numeric is found
//! - `to_fixed` formats with a fixed number of fractional digits, rounding the
//!   exact binary value with ties away from zero

use serde_json::Value;

/// The smallest subnormal double has 1074 fractional decimal digits, so this
/// precision always yields the exact expansion.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Magnitudes from here on are printed in exponent notation by `to_fixed`.
const FIXED_NOTATION_LIMIT: f64 = 1e21;

fn is_form_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Parse the longest decimal prefix of `input`. Returns NaN when there is none.
///
/// `"12abc"` → 12, `"  .5e1x"` → 5, `"1e"` → 1, `"0x10"` → 0, `"abc"` → NaN.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start_matches(is_form_whitespace);
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            digits += frac_digits;
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    // f64::from_str accepts "5." and ".5"
    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a value the way the form layer stringifies it before parsing.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => number_to_string(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Shortest round-trip representation, exponent form outside [1e-6, 1e21).
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-6..FIXED_NOTATION_LIMIT).contains(&magnitude) {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    format!("{}", value)
}

/// Coerce any form value to a float, NaN when nothing numeric is present.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_float(s),
        Value::Array(_) => parse_float(&value_to_string(value)),
        Value::Null | Value::Bool(_) | Value::Object(_) => f64::NAN,
    }
}

/// Lenient parse: absent or non-numeric input yields `default`.
pub fn parse_number(value: Option<&Value>, default: f64) -> f64 {
    let parsed = value.map(to_number).unwrap_or(f64::NAN);
    if parsed.is_nan() {
        default
    } else {
        parsed
    }
}

/// Truthiness of a submitted value: null, false, 0, NaN and "" are falsy,
/// every sequence and object is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Format `value` with exactly `digits` fractional digits.
///
/// The exact binary value is rounded to the nearest candidate; on an exact
/// tie the candidate with the larger magnitude wins. `10.005` is stored as
/// 10.00500000000000078… and becomes `"10.01"`, `1.005` is stored below the
/// midpoint and becomes `"1.00"`, `0.125` is an exact tie and becomes `"0.13"`.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() || value.abs() >= FIXED_NOTATION_LIMIT {
        return number_to_string(value);
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<char> = int_part
        .chars()
        .chain(frac_part.chars().chain(std::iter::repeat('0')).take(digits))
        .collect();

    let round_up = frac_part
        .as_bytes()
        .get(digits)
        .is_some_and(|next| *next >= b'5');

    if round_up {
        let mut carry = true;
        for digit in kept.iter_mut().rev() {
            if *digit == '9' {
                *digit = '0';
            } else {
                *digit = char::from(*digit as u8 + 1);
                carry = false;
                break;
            }
        }
        if carry {
            kept.insert(0, '1');
        }
    }

    let split = kept.len() - digits;
    let mut out = String::with_capacity(kept.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(&kept[..split]);
    if digits > 0 {
        out.push('.');
        out.extend(&kept[split..]);
    }
    out
}
