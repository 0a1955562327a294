//! Sanitization policy for the position text fields.
//!
//! Keystrokes are filtered to `[0-9.-]`. An empty field or a lone `-` is
//! provisional: the user is mid-entry, so nothing is committed and the
//! field is left alone until more input or focus loss. Anything parseable
//! is committed and normalized to one decimal place.

/// What an edit to a numeric field produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    /// Not a number yet; keep the sanitized text as typed.
    Provisional {
        /// Sanitized field text.
        display: String,
    },
    /// A committed value and its normalized text.
    Committed {
        /// Parsed value.
        value: f32,
        /// One-decimal rendering (`"3.0"`).
        display: String,
    },
}

/// Strip every character outside `[0-9.-]`.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Parse the longest numeric prefix, the way browser `parseFloat` does
/// (`"1.2.3"` → 1.2, `"1-"` → 1, `"-.5"` → -0.5). `None` when no digits
/// lead the string.
#[must_use]
pub fn parse_leading_float(text: &str) -> Option<f32> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_digit() {
            digits += 1;
        } else if b == b'.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        end += 1;
    }
    if digits == 0 {
        return None;
    }
    text[..end].parse().ok()
}

/// Render with one decimal place. Negative zero renders as `"0.0"`.
#[must_use]
pub fn format_one_decimal(value: f32) -> String {
    if value == 0.0 {
        return "0.0".to_owned();
    }
    format!("{value:.1}")
}

/// Apply the policy to freshly typed field text.
#[must_use]
pub fn edit(raw: &str) -> FieldEdit {
    let cleaned = sanitize(raw);
    if cleaned.is_empty() || cleaned == "-" {
        return FieldEdit::Provisional { display: cleaned };
    }
    match parse_leading_float(&cleaned) {
        Some(value) => FieldEdit::Committed {
            value,
            display: format_one_decimal(value),
        },
        None => FieldEdit::Provisional { display: cleaned },
    }
}

/// Focus left the field. Returns the replacement text when the current
/// contents never became a number.
#[must_use]
pub fn blur(current: &str) -> Option<String> {
    if parse_leading_float(&sanitize(current)).is_some() {
        None
    } else {
        Some(format_one_decimal(0.0))
    }
}

/// Field value for placement, with `fallback` for unparseable text.
#[must_use]
pub fn value_or(current: &str, fallback: f32) -> f32 {
    parse_leading_float(current).unwrap_or(fallback)
}

/// One press of a ± button: the current value (unparseable → 0) moved by
/// `delta`, rendered with one decimal.
#[must_use]
pub fn step(current: &str, delta: f32) -> String {
    format_one_decimal(value_or(current, 0.0) + delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(raw: &str) -> Option<(f32, String)> {
        match edit(raw) {
            FieldEdit::Committed { value, display } => Some((value, display)),
            FieldEdit::Provisional { .. } => None,
        }
    }

    #[test]
    fn integer_input_normalizes_to_one_decimal() {
        assert_eq!(committed("3"), Some((3.0, "3.0".to_owned())));
        assert_eq!(blur("3.0"), None);
    }

    #[test]
    fn empty_input_blurs_to_zero() {
        assert_eq!(
            edit(""),
            FieldEdit::Provisional {
                display: String::new()
            }
        );
        assert_eq!(blur("").as_deref(), Some("0.0"));
    }

    #[test]
    fn lone_minus_stays_provisional_until_blur() {
        assert_eq!(
            edit("-"),
            FieldEdit::Provisional {
                display: "-".to_owned()
            }
        );
        assert_eq!(committed("-2"), Some((-2.0, "-2.0".to_owned())));
        assert_eq!(blur("-").as_deref(), Some("0.0"));
    }

    #[test]
    fn foreign_characters_are_stripped() {
        assert_eq!(sanitize("1a.5b"), "1.5");
        assert_eq!(committed("abc4"), Some((4.0, "4.0".to_owned())));
        assert_eq!(blur("abc").as_deref(), Some("0.0"));
    }

    #[test]
    fn leading_prefix_parse_matches_browser() {
        assert_eq!(parse_leading_float("1.2.3"), Some(1.2));
        assert_eq!(parse_leading_float("1-"), Some(1.0));
        assert_eq!(parse_leading_float("-.5"), Some(-0.5));
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("--1"), None);
    }

    #[test]
    fn dot_only_is_provisional() {
        assert!(matches!(edit("."), FieldEdit::Provisional { .. }));
        assert!(matches!(edit("-."), FieldEdit::Provisional { .. }));
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(committed("2.46").map(|(_, d)| d).as_deref(), Some("2.5"));
        assert_eq!(format_one_decimal(-0.0), "0.0");
    }

    #[test]
    fn steps_move_by_delta() {
        assert_eq!(step("1.0", 0.1), "1.1");
        assert_eq!(step("", -0.1), "-0.1");
        assert_eq!(step("0.1", -0.1), "0.0");
    }

    #[test]
    fn fallback_applies_only_to_unparseable_text() {
        assert_eq!(value_or("", -3.0), -3.0);
        assert_eq!(value_or("0.0", -3.0), 0.0);
        assert_eq!(value_or("2.5", -3.0), 2.5);
    }
}
