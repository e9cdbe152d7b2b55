//! Sample Assembler
//!
//! Reconciles the redundant readings of one readout into a single [`Sample`].
//! Nothing here fails: a reading that cannot be found stays `NaN`.

use crate::domain::sample::Sample;
use crate::domain::units::knots_to_mps;
use crate::parsing::extract::{
    extract, TEMPERATURE, WIND_AVG_PRIMARY, WIND_AVG_SECONDARY, WIND_DEGREES_PRIMARY,
    WIND_DEGREES_SECONDARY, WIND_MAX_PRIMARY, WIND_MAX_SECONDARY, WIND_MIN_PRIMARY,
    WIND_MIN_SECONDARY,
};

/// Build a sample from raw readout text collected at `collection_time_ms`
pub fn assemble(raw_text: &str, collection_time_ms: i64) -> Sample {
    let wind_avg = mean(
        extract(raw_text, &WIND_AVG_PRIMARY),
        extract(raw_text, &WIND_AVG_SECONDARY),
    );
    let wind_degrees = mean(
        extract(raw_text, &WIND_DEGREES_PRIMARY),
        extract(raw_text, &WIND_DEGREES_SECONDARY),
    );
    let wind_min = lowest(
        extract(raw_text, &WIND_MIN_PRIMARY),
        extract(raw_text, &WIND_MIN_SECONDARY),
    );
    let wind_max = highest(
        extract(raw_text, &WIND_MAX_PRIMARY),
        extract(raw_text, &WIND_MAX_SECONDARY),
    );

    let wind_avg = knots_to_mps(wind_avg);
    let wind_min = knots_to_mps(wind_min);
    // The gust figure can trail the two-minute mean; never report it below.
    // f64::max prefers the present operand, so a missing max takes the mean.
    let wind_max = knots_to_mps(wind_max).max(wind_avg);

    let sample = Sample {
        timestamp: collection_time_ms,
        wind_avg,
        wind_degrees,
        wind_min,
        wind_max,
        temperature: extract(raw_text, &TEMPERATURE),
    };
    tracing::debug!(?sample, "assembled sample");
    sample
}

/// Arithmetic mean; `NaN` when either reading is missing
fn mean(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Lower of two readings; `NaN` when either reading is missing
fn lowest(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

/// Higher of two readings; `NaN` when either reading is missing
fn highest(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
