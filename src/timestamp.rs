/// Timestamp normalization and validation
///
/// Summary text produced by the LLM pipeline carries timestamps in several
/// textual encodings. This module reduces all of them to a single canonical
/// `HH:MM:SS` form that the rest of the pipeline can link against.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while normalizing a raw timestamp token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("empty timestamp token")]
    Empty,

    #[error("malformed colon timestamp: {0}")]
    MalformedColon(String),

    #[error("timestamp component out of range: {0}")]
    ComponentOutOfRange(String),

    #[error("negative timestamp token: {0}")]
    Negative(String),

    #[error("non-numeric timestamp token: {0}")]
    NotNumeric(String),
}

/// A normalized timestamp: canonical `HH:MM:SS` text plus its total seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampToken {
    canonical: String,
    seconds: u64,
}

impl TimestampToken {
    /// Build a token from a total number of elapsed seconds
    pub fn from_seconds(total: u64) -> Self {
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        Self {
            canonical: format!("{:02}:{:02}:{:02}", hours, minutes, seconds),
            seconds: total,
        }
    }

    /// Canonical zero-padded `HH:MM:SS` text
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Total elapsed seconds
    pub fn seconds(&self) -> u64 {
        self.seconds
    }
}

impl fmt::Display for TimestampToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical)
    }
}

/// Normalize a raw timestamp token into canonical `HH:MM:SS` form.
///
/// Accepted shapes:
/// - `"[HH:MM:SS]"` or `"HH:MM:SS"`: already canonical, components re-padded
/// - `"MM:SS"`: interpreted as `00:MM:SS`
/// - `"125"`: bare integer seconds
/// - `"10.88"`: bare decimal tokens are read as *fractional minutes*: the
///   integer part is minutes and the fraction times 60, rounded, is seconds
///   (`10.88` -> `00:10:53`). Decimal-seconds data must be converted upstream;
///   only the fractional-minutes convention is supported here.
///
/// Failure is recoverable: callers treat any error as "no timestamp available".
pub fn normalize(raw: &str) -> Result<TimestampToken, NormalizeError> {
    let token = raw.trim().trim_matches(['[', ']']).trim();

    if token.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if token.contains(':') {
        return normalize_colon(token);
    }

    if let Ok(seconds) = token.parse::<u64>() {
        return Ok(TimestampToken::from_seconds(seconds));
    }

    match token.parse::<f64>() {
        Ok(value) if value.is_sign_negative() => Err(NormalizeError::Negative(token.to_string())),
        Ok(value) if value.is_finite() => Ok(normalize_fractional_minutes(value)),
        _ => Err(NormalizeError::NotNumeric(token.to_string())),
    }
}

/// Parse a colon-grouped timestamp (`MM:SS` or `HH:MM:SS`)
fn normalize_colon(token: &str) -> Result<TimestampToken, NormalizeError> {
    let parts: Vec<&str> = token.split(':').collect();

    let components: Vec<u64> = parts
        .iter()
        .map(|part| part.trim().parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| NormalizeError::MalformedColon(token.to_string()))?;

    let (hours, minutes, seconds) = match components.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(NormalizeError::MalformedColon(token.to_string())),
    };

    if minutes >= 60 || seconds >= 60 {
        return Err(NormalizeError::ComponentOutOfRange(token.to_string()));
    }

    Ok(TimestampToken::from_seconds(hours * 3600 + minutes * 60 + seconds))
}

/// Convert a fractional-minutes value (`10.88` = 10 min 53 s) to a token
fn normalize_fractional_minutes(value: f64) -> TimestampToken {
    let minutes = value.trunc() as u64;
    let mut seconds = (value.fract() * 60.0).round() as u64;
    let mut carry = 0;
    if seconds >= 60 {
        seconds -= 60;
        carry = 1;
    }
    TimestampToken::from_seconds((minutes + carry) * 60 + seconds)
}

/// Check a timestamp against the video's total duration.
///
/// Returns true iff the timestamp falls inside `[0, duration]`. Out-of-range
/// timestamps are syntactically valid but semantically impossible; the merge
/// step falls back to the transcript index when this rejects one.
pub fn validate(ts: &TimestampToken, duration: &TimestampToken) -> bool {
    ts.seconds() <= duration.seconds()
}
