//! Encoding and decoding of the framework's string attributes.
//!
//! Vectors are space-separated (`"1 2.5 -3"`). Numbers are written the way
//! the browser stringifies them: integral values carry no fractional part.

use std::str::FromStr;

use glam::{DVec3, Vec3};

use crate::error::PanelError;

/// Format a number the way JS `String(n)` would for the values the panel
/// produces (`1`, `0.5`, `-3`). Negative zero prints as `0`.
#[must_use]
pub fn format_number(value: f32) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    // f32 Display already yields the shortest round-trip form without a
    // trailing `.0`.
    format!("{value}")
}

/// Encode a vector as `"x y z"`.
#[must_use]
pub fn encode_vec3(v: Vec3) -> String {
    format!(
        "{} {} {}",
        format_number(v.x),
        format_number(v.y),
        format_number(v.z)
    )
}

/// Encode a yaw-only rotation as `"0 y 0"`.
#[must_use]
pub fn encode_y_rotation(degrees: f32) -> String {
    encode_vec3(Vec3::new(0.0, degrees, 0.0))
}

/// Encode a uniform scale as `"s s s"`.
#[must_use]
pub fn encode_uniform_scale(factor: f32) -> String {
    encode_vec3(Vec3::splat(factor))
}

/// Encode a visibility flag.
#[must_use]
pub fn encode_bool(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}

/// Parse `"x y z"`. Missing trailing components default to zero; any
/// non-numeric component is an error.
pub fn parse_vec3(attribute: &str, raw: &str) -> Result<Vec3, PanelError> {
    parse_components(attribute, raw).map(Vec3::from_array)
}

/// [`parse_vec3`] at full precision, for values read back out of the
/// scene and exported unchanged.
pub fn parse_dvec3(attribute: &str, raw: &str) -> Result<DVec3, PanelError> {
    parse_components(attribute, raw).map(DVec3::from_array)
}

fn parse_components<T: FromStr + Default + Copy>(
    attribute: &str,
    raw: &str,
) -> Result<[T; 3], PanelError> {
    let invalid = || PanelError::AttributeParse {
        attribute: attribute.to_owned(),
        value: raw.to_owned(),
    };
    let mut out = [T::default(); 3];
    let mut parts = raw.split_whitespace();
    for slot in &mut out {
        match parts.next() {
            Some(part) => *slot = part.parse().map_err(|_| invalid())?,
            None => break,
        }
    }
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(out)
}

/// Parse a visibility flag. The framework treats anything other than an
/// explicit `"false"` as visible.
#[must_use]
pub fn parse_bool(raw: &str) -> bool {
    !raw.trim().eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn vectors_encode_space_separated() {
        assert_eq!(encode_vec3(Vec3::new(0.0, 1.5, -3.0)), "0 1.5 -3");
        assert_eq!(encode_y_rotation(45.0), "0 45 0");
        assert_eq!(encode_uniform_scale(2.0), "2 2 2");
    }

    #[test]
    fn parse_tolerates_whitespace_and_short_input() {
        let v = parse_vec3("position", "  1   2.5  -3 ").unwrap();
        assert_eq!(v, Vec3::new(1.0, 2.5, -3.0));

        let v = parse_vec3("position", "4").unwrap();
        assert_eq!(v, Vec3::new(4.0, 0.0, 0.0));

        let v = parse_vec3("position", "").unwrap();
        assert_eq!(v, Vec3::ZERO);
    }

    #[test]
    fn full_precision_parse_keeps_doubles() {
        let v = parse_dvec3("position", "1.23456789 1234.5678 0.3").unwrap();
        assert_eq!(v, DVec3::new(1.234_567_89, 1234.5678, 0.3));
        assert!(parse_dvec3("position", "1 x 3").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_vec3("rotation", "0 abc 0").is_err());
        assert!(parse_vec3("rotation", "1 2 3 4").is_err());
    }

    #[test]
    fn visibility_defaults_to_true() {
        assert!(parse_bool("true"));
        assert!(parse_bool(""));
        assert!(!parse_bool("false"));
        assert!(!parse_bool(" FALSE "));
    }
}
