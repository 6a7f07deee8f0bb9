//! Parsing of the `from` / `to` query bounds used by measurement listings.
//!
//! Both bounds accept either a calendar day (`YYYY-MM-DD`) or a full
//! RFC 3339 timestamp. A calendar-day `to` covers the whole day, so
//! `from=2025-03-01&to=2025-03-01` matches everything recorded that day.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Inclusive date range; either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

impl DateRange {
    /// Build a range from raw query values. Empty strings count as absent.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, CoreError> {
        let from = non_empty(from).map(|s| parse_bound("from", s, false)).transpose()?;
        let to = non_empty(to).map(|s| parse_bound("to", s, true)).transpose()?;

        if let (Some(f), Some(t)) = (from, to) {
            if f > t {
                return Err(CoreError::Validation(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }
        Ok(Self { from, to })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(field: &str, value: &str, end_of_day: bool) -> Result<Timestamp, CoreError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CoreError::Validation(format!(
            "Invalid '{field}' date: '{value}'. Expected YYYY-MM-DD or RFC 3339"
        ))
    })?;
    let start = day.and_time(NaiveTime::MIN).and_utc();
    Ok(if end_of_day {
        start + TimeDelta::days(1) - TimeDelta::milliseconds(1)
    } else {
        start
    })
}
