//! Conversion between human time strings and milliseconds.
//!
//! A time string is an unsigned integer followed by one of `h`, `m`, `s`
//! or `ms` (case insensitive), e.g. `"10s"` or `"2H"`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const MILLIS_PER_HOUR: u64 = 3_600_000;
const MILLIS_PER_MINUTE: u64 = 60_000;
const MILLIS_PER_SECOND: u64 = 1_000;

static TIME_STRING: LazyLock<Regex> = LazyLock::new(|| {
    // `ms` is listed before `m` so the longer suffix wins.
    Regex::new(r"(?i)^(\d+)(ms|h|m|s)$").expect("time string pattern is valid")
});

/// A time string that does not match `<integer><h|m|s|ms>`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid input '{input}': Time string must be an integer followed by one of \"H\", \"M\", \"S\", or \"MS\" (case insensitive).")]
pub struct ParseDurationError {
    /// The offending text, verbatim.
    pub input: String,
}

impl ParseDurationError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Parses a time string into milliseconds.
///
/// # Errors
///
/// Returns `ParseDurationError` when the text is not an unsigned integer
/// immediately followed by a known unit, or when the result overflows.
pub fn parse_duration(text: &str) -> Result<u64, ParseDurationError> {
    let captures = TIME_STRING
        .captures(text)
        .ok_or_else(|| ParseDurationError::new(text))?;

    let amount: u64 = captures[1]
        .parse()
        .map_err(|_| ParseDurationError::new(text))?;

    let multiplier = match captures[2].to_ascii_lowercase().as_str() {
        "h" => MILLIS_PER_HOUR,
        "m" => MILLIS_PER_MINUTE,
        "s" => MILLIS_PER_SECOND,
        _ => 1,
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| ParseDurationError::new(text))
}

/// Formats milliseconds using the largest unit the value reaches.
///
/// The quotient is not rounded, so `90_000` becomes `"1.5m"`. Values under a
/// second are printed as a bare millisecond count.
#[must_use]
pub fn format_duration(millis: u64) -> String {
    if millis >= MILLIS_PER_HOUR {
        format!("{}h", quotient(millis, MILLIS_PER_HOUR))
    } else if millis >= MILLIS_PER_MINUTE {
        format!("{}m", quotient(millis, MILLIS_PER_MINUTE))
    } else if millis >= MILLIS_PER_SECOND {
        format!("{}s", quotient(millis, MILLIS_PER_SECOND))
    } else {
        millis.to_string()
    }
}

/// Same as [`format_duration`] for fractional millisecond values such as a
/// tracked average.
#[must_use]
pub fn format_duration_f64(millis: f64) -> String {
    let hour = MILLIS_PER_HOUR as f64;
    let minute = MILLIS_PER_MINUTE as f64;
    let second = MILLIS_PER_SECOND as f64;

    if millis >= hour {
        format!("{}h", millis / hour)
    } else if millis >= minute {
        format!("{}m", millis / minute)
    } else if millis >= second {
        format!("{}s", millis / second)
    } else {
        format!("{millis}")
    }
}

fn quotient(millis: u64, unit: u64) -> String {
    if millis % unit == 0 {
        (millis / unit).to_string()
    } else {
        // f64's Display prints the shortest exact representation, no rounding.
        (millis as f64 / unit as f64).to_string()
    }
}
