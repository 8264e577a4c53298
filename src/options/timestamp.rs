//! Deploy start timestamps: Unix seconds or ISO 8601.

use super::OptionResult;
use crate::env::EnvConfig;
use crate::error::ConfigError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("year-month pattern is valid"));

/// Date-time shapes carrying an offset (`-07:00` or `+0000`)
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
];

/// Date-time shapes accepted without an offset. Interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%MZ",
];

/// Read an optional timestamp option.
///
/// Integer-looking values are taken as Unix seconds before any date parsing is
/// attempted. Negative results are rejected, as are integers beyond `i64`.
pub fn timestamp_option(env: &EnvConfig, name: &str) -> OptionResult<Option<i64>> {
    let Some(raw) = env.input(name) else {
        return Ok(None);
    };

    if INTEGER.is_match(raw) && raw.parse::<i64>().is_err() {
        return Err(ConfigError::TimestampOutOfRange {
            name: name.to_string(),
        });
    }

    parse_timestamp(raw)
        .filter(|seconds| *seconds >= 0)
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidTimestamp {
            name: name.to_string(),
        })
}

/// Parse a raw timestamp without range checks
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    let integer = if INTEGER.is_match(raw) {
        raw.parse::<i64>().ok()
    } else {
        None
    };

    integer.or_else(|| parse_iso8601(raw))
}

fn parse_iso8601(raw: &str) -> Option<i64> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.timestamp());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(datetime) = DateTime::parse_from_str(raw, format) {
            return Some(datetime.timestamp());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().timestamp());
        }
    }

    // `2017-07` is the first day of the month
    let date = if YEAR_MONTH.is_match(raw) {
        NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    };

    date.ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
}
