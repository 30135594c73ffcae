//! QTI durations
//!
//! A duration is an ISO-8601 period normalized at parse time to a total
//! number of seconds. Calendar fields use the fixed reference lengths
//! (1 year = 360 days, 1 month = 30 days); equality and ordering compare
//! second totals, never the original field spelling, so `PT90S` and
//! `PT1M30S` are the same duration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_MONTH: f64 = 30.0 * SECONDS_PER_DAY;
const SECONDS_PER_YEAR: f64 = 360.0 * SECONDS_PER_DAY;

/// Error raised when an ISO-8601 period string cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ISO-8601 duration: {input}")]
pub struct DurationParseError {
    /// The rejected input
    pub input: String,
}

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .expect("duration regex")
});

/// A non-negative span of time, normalized to seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct QtiDuration {
    seconds: f64,
}

impl QtiDuration {
    /// Build from a second total. Negative spans are rejected.
    pub fn from_seconds(seconds: f64) -> Result<Self, DurationParseError> {
        if seconds.is_finite() && seconds >= 0.0 {
            Ok(Self { seconds })
        } else {
            Err(DurationParseError {
                input: seconds.to_string(),
            })
        }
    }

    /// Parse an ISO-8601 period (`P2DT3H20M`, `PT90.5S`, ...).
    ///
    /// A bare `P` or `PnDT` with an empty time part is rejected, as are
    /// negative periods and week notation.
    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let reject = || DurationParseError {
            input: input.to_string(),
        };

        let caps = DURATION_RE.captures(input).ok_or_else(reject)?;
        // At least one field must be present; "P" and "P...T" alone are not
        // valid periods.
        if caps.iter().skip(1).all(|group| group.is_none()) || input.ends_with('T') {
            return Err(reject());
        }

        let field = |idx: usize| -> f64 {
            caps.get(idx)
                .map(|m| m.as_str().parse::<f64>().unwrap_or(0.0))
                .unwrap_or(0.0)
        };

        let seconds = field(1) * SECONDS_PER_YEAR
            + field(2) * SECONDS_PER_MONTH
            + field(3) * SECONDS_PER_DAY
            + field(4) * SECONDS_PER_HOUR
            + field(5) * SECONDS_PER_MINUTE
            + field(6);

        Ok(Self { seconds })
    }

    /// The normalized second total.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Seconds truncated to a whole number, the precision used by the
    /// duration comparison operators.
    pub fn truncated_seconds(&self) -> i64 {
        self.seconds.trunc() as i64
    }
}

impl fmt::Display for QtiDuration {
    /// Render as a day/time period (`P1DT2H3M4S`). Sub-second precision is
    /// kept on the seconds field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.seconds;
        let days = (rest / SECONDS_PER_DAY).floor();
        rest -= days * SECONDS_PER_DAY;
        let hours = (rest / SECONDS_PER_HOUR).floor();
        rest -= hours * SECONDS_PER_HOUR;
        let minutes = (rest / SECONDS_PER_MINUTE).floor();
        rest -= minutes * SECONDS_PER_MINUTE;

        write!(f, "P")?;
        if days > 0.0 {
            write!(f, "{}D", days as u64)?;
        }
        if hours > 0.0 || minutes > 0.0 || rest > 0.0 || days == 0.0 {
            write!(f, "T")?;
            if hours > 0.0 {
                write!(f, "{}H", hours as u64)?;
            }
            if minutes > 0.0 {
                write!(f, "{}M", minutes as u64)?;
            }
            if rest > 0.0 || (hours == 0.0 && minutes == 0.0) {
                if rest == rest.trunc() {
                    write!(f, "{}S", rest as u64)?;
                } else {
                    write!(f, "{}S", rest)?;
                }
            }
        }
        Ok(())
    }
}
