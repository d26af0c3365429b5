//! Lenient numeric parsing for weight cells.

use tracing::trace;

/// Parse a weight cell. Missing cells, unparsable text and `NaN` give
/// `None`; overflow to `±inf` is kept so callers can clamp it.
pub fn parse_numeric(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    match raw.parse::<f64>() {
        Ok(v) if !v.is_nan() => Some(v),
        _ => {
            trace!("weight {raw:?} is not a number, falling back");
            None
        }
    }
}

/// Parse a weight cell, substituting `default` on any failure.
pub fn parse_numeric_or_default(value: Option<&str>, default: f64) -> f64 {
    parse_numeric(value).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_numeric(Some("3")), Some(3.0));
        assert_eq!(parse_numeric(Some(" -1.25 ")), Some(-1.25));
        assert_eq!(parse_numeric(Some("1e2")), Some(100.0));
        assert_eq!(parse_numeric(Some("1e400")), Some(f64::INFINITY));
        assert_eq!(parse_numeric(Some("-inf")), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn failures_fall_back() {
        assert_eq!(parse_numeric_or_default(None, 7.0), 7.0);
        assert_eq!(parse_numeric_or_default(Some(""), 7.0), 7.0);
        assert_eq!(parse_numeric_or_default(Some("heavy"), 7.0), 7.0);
        assert_eq!(parse_numeric_or_default(Some("NaN"), 7.0), 7.0);
        assert_eq!(parse_numeric_or_default(Some("4.5"), 7.0), 4.5);
    }
}
