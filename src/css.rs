//! CSS dimension parsing and unit conversion.
//!
//! Only what the layout rewriter needs: turn an SVG `width="12pt"` into
//! pixels. The other unit families are convertible within themselves.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static DIMENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([0-9.]+)([a-z]+)$").expect("valid regex"));

static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([-+]?[0-9]*\.?[0-9]+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("unknown CSS unit '{0}'")]
    UnknownUnit(String),

    #[error("cannot convert from {from} to {to}")]
    Incompatible { from: String, to: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
}

/// Size of one `unit` in its family's base unit (px, deg, ms, Hz, dppx).
fn unit_factor(unit: &str) -> Option<(Family, f64)> {
    let entry = match unit.to_ascii_lowercase().as_str() {
        "px" => (Family::Length, 1.0),
        "cm" => (Family::Length, 96.0 / 2.54),
        "mm" => (Family::Length, 96.0 / 25.4),
        "in" => (Family::Length, 96.0),
        "pt" => (Family::Length, 96.0 / 72.0),
        "pc" => (Family::Length, 16.0),
        "ex" => (Family::Length, 6.0),
        "deg" => (Family::Angle, 1.0),
        "grad" => (Family::Angle, 0.9),
        "rad" => (Family::Angle, 180.0 / std::f64::consts::PI),
        "turn" => (Family::Angle, 360.0),
        "ms" => (Family::Time, 1.0),
        "s" => (Family::Time, 1000.0),
        "hz" => (Family::Frequency, 1.0),
        "khz" => (Family::Frequency, 1000.0),
        "dppx" => (Family::Resolution, 1.0),
        "dpi" => (Family::Resolution, 1.0 / 96.0),
        "dpcm" => (Family::Resolution, 2.54 / 96.0),
        _ => return None,
    };
    Some(entry)
}

/// Split a CSS dimension into value and unit.
///
/// A value without any letters is taken as pixels, so `"100"` and `"100%"`
/// both give `(100.0, "px")`. Returns `None` when no number can be read.
pub fn parse_dimension(input: &str) -> Option<(f64, String)> {
    let input = input.trim();
    if !input.chars().any(|c| c.is_ascii_alphabetic()) {
        let caps = LEADING_NUMBER.captures(input)?;
        let value = caps[1].parse::<f64>().ok()?;
        return Some((value, "px".to_string()));
    }
    let caps = DIMENSION.captures(input)?;
    let value = caps[1].parse::<f64>().ok()?;
    Some((value, caps[2].to_string()))
}

/// Convert `value` from one unit to another of the same family.
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let (from_family, from_factor) =
        unit_factor(from).ok_or_else(|| UnitError::UnknownUnit(from.to_string()))?;
    let (to_family, to_factor) =
        unit_factor(to).ok_or_else(|| UnitError::UnknownUnit(to.to_string()))?;
    if from_family != to_family {
        return Err(UnitError::Incompatible {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(value * from_factor / to_factor)
}

/// Parse a dimension attribute and express it in pixels.
pub fn dimension_to_px(input: &str) -> Option<f64> {
    let (value, unit) = parse_dimension(input)?;
    convert(value, &unit, "px").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unitless_is_pixels() {
        assert_eq!(parse_dimension("640"), Some((640.0, "px".to_string())));
        assert_eq!(parse_dimension("100%"), Some((100.0, "px".to_string())));
        assert_eq!(parse_dimension(""), None);
    }

    #[test]
    fn parses_value_and_unit() {
        assert_eq!(parse_dimension("12.5pt"), Some((12.5, "pt".to_string())));
        assert_eq!(parse_dimension("3IN"), Some((3.0, "IN".to_string())));
        assert_eq!(parse_dimension("12 pt"), None);
        assert_eq!(parse_dimension("auto"), None);
    }

    #[test]
    fn lengths_convert_to_pixels() {
        assert!(approx(convert(72.0, "pt", "px").unwrap(), 96.0));
        assert!(approx(convert(1.0, "in", "px").unwrap(), 96.0));
        assert!(approx(convert(2.54, "cm", "px").unwrap(), 96.0));
        assert!(approx(convert(1.0, "pc", "px").unwrap(), 16.0));
        assert!(approx(convert(96.0, "px", "in").unwrap(), 1.0));
    }

    #[test]
    fn other_families_convert_within_themselves() {
        assert!(approx(convert(1.0, "turn", "deg").unwrap(), 360.0));
        assert!(approx(convert(2.0, "s", "ms").unwrap(), 2000.0));
        assert!(approx(convert(1.0, "kHz", "Hz").unwrap(), 1000.0));
        assert!(approx(convert(1.0, "dppx", "dpi").unwrap(), 96.0));
    }

    #[test]
    fn cross_family_conversion_fails() {
        assert!(matches!(
            convert(1.0, "deg", "px"),
            Err(UnitError::Incompatible { .. })
        ));
        assert!(matches!(convert(1.0, "em", "px"), Err(UnitError::UnknownUnit(_))));
    }

    #[test]
    fn svg_attribute_to_px() {
        assert!(approx(dimension_to_px("432pt").unwrap(), 576.0));
        assert!(approx(dimension_to_px("2IN").unwrap(), 192.0));
        assert_eq!(dimension_to_px("auto"), None);
    }
}
