//! Field Extractor
//!
//! Pulls single numeric fields out of the station's free-text readout. The
//! readout repeats each wind figure in two sub-sections, so there is a primary
//! and a secondary pattern for each of them.

use regex::Regex;
use std::sync::LazyLock;

/// A compiled pattern with exactly one numeric capture group
#[derive(Debug)]
pub struct Pattern {
    name: &'static str,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern
    ///
    /// Panics on an invalid expression or a capture count other than one;
    /// patterns are compile-time literals.
    pub fn new(name: &'static str, expr: &str) -> Self {
        let regex = Regex::new(expr).expect("field pattern must compile");
        assert_eq!(
            regex.captures_len(),
            2,
            "field pattern {name} must have exactly one capture group"
        );
        Self { name, regex }
    }
}

macro_rules! pattern {
    ($ident:ident, $name:literal, $expr:literal) => {
        pub static $ident: LazyLock<Pattern> = LazyLock::new(|| Pattern::new($name, $expr));
    };
}

pattern!(WIND_AVG_PRIMARY, "wind_avg_primary", r"MEAN02\s+\d+/(\d+)");
pattern!(WIND_AVG_SECONDARY, "wind_avg_secondary", r"MEAN02\s+\d+/\d+ KT\s+\d+/(\d+)");
pattern!(WIND_DEGREES_PRIMARY, "wind_degrees_primary", r"MEAN02\s+(\d+)/\d+");
pattern!(WIND_DEGREES_SECONDARY, "wind_degrees_secondary", r"MEAN02\s+\d+/\d+ KT\s+(\d+)/\d+");
pattern!(WIND_MIN_PRIMARY, "wind_min_primary", r"MIN/MAX\s+(\d+)/\d+");
pattern!(WIND_MAX_PRIMARY, "wind_max_primary", r"MIN/MAX\s+\d+/(\d+)");
pattern!(WIND_MIN_SECONDARY, "wind_min_secondary", r"MIN/MAX\s+\d+/\d+\s+(\d+)/\d+");
pattern!(WIND_MAX_SECONDARY, "wind_max_secondary", r"MIN/MAX\s+\d+/\d+\s+\d+/(\d+)");
pattern!(TEMPERATURE, "temperature", r"\bT\s+(-?\d+(?:\.\d+)?)");

/// Value of the first capture on the first match, `NaN` when absent
pub fn extract(text: &str, pattern: &Pattern) -> f64 {
    let value = pattern
        .regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|capture| capture.as_str().parse::<f64>().ok())
        .unwrap_or(f64::NAN);
    tracing::trace!(field = pattern.name, value, "extracted");
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const READOUT: &str = "<pre>RWY 01 MEAN02 070/10 KT 075/12\nMIN/MAX 8/14 9/15\nT 18.5 DP 9</pre>";

    #[test]
    fn test_primary_and_secondary_wind() {
        assert_eq!(extract(READOUT, &WIND_AVG_PRIMARY), 10.0);
        assert_eq!(extract(READOUT, &WIND_AVG_SECONDARY), 12.0);
        assert_eq!(extract(READOUT, &WIND_DEGREES_PRIMARY), 70.0);
        assert_eq!(extract(READOUT, &WIND_DEGREES_SECONDARY), 75.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(extract(READOUT, &WIND_MIN_PRIMARY), 8.0);
        assert_eq!(extract(READOUT, &WIND_MAX_PRIMARY), 14.0);
        assert_eq!(extract(READOUT, &WIND_MIN_SECONDARY), 9.0);
        assert_eq!(extract(READOUT, &WIND_MAX_SECONDARY), 15.0);
    }

    #[test]
    fn test_temperature() {
        assert_eq!(extract(READOUT, &TEMPERATURE), 18.5);
        assert_eq!(extract("T -3.5", &TEMPERATURE), -3.5);
        assert_eq!(extract("T 7", &TEMPERATURE), 7.0);
        // `T` must be a word on its own
        assert!(extract("QFT 12", &TEMPERATURE).is_nan());
    }

    #[test]
    fn test_missing_is_nan() {
        assert!(extract("", &WIND_AVG_PRIMARY).is_nan());
        assert!(extract("MEAN02 070/10", &WIND_AVG_SECONDARY).is_nan());
        assert!(extract("station offline", &TEMPERATURE).is_nan());
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract("MIN/MAX 3/4 MIN/MAX 5/6", &WIND_MIN_PRIMARY), 3.0);
    }

    #[test]
    #[should_panic(expected = "exactly one capture group")]
    fn test_pattern_requires_one_group() {
        Pattern::new("broken", r"(\d+)/(\d+)");
    }
}
