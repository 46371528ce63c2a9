//! Currency and date formatting in the en-US style used across the pages.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

const DATE_FORMAT: &str = "%b %-d, %Y";
const DATE_TIME_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// `$` followed by the amount with exactly two decimals.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}

/// [`format_currency`] for a JSON number or numeric string.
///
/// Returns `None` when the value is not numeric.
#[must_use]
pub fn format_amount(value: &Value) -> Option<String> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
        .map(format_currency)
}

/// `YYYY-MM-DD` and nothing else
fn parse_plain_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    let year = input[0..4].parse().ok()?;
    let month = input[5..7].parse().ok()?;
    let day = input[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// A timestamp already expressed in the display timezone
fn parse_timestamp<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(tz).naive_local());
    }
    // Timestamps without an offset are taken as display-local.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .into_iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// "Mar 15, 2024" in the host timezone.
///
/// A pure `YYYY-MM-DD` date is formatted from its components and never
/// shifts a day, whatever the host offset.
#[must_use]
pub fn format_date(input: &str) -> Option<String> {
    format_date_in(input, &Local)
}

/// [`format_date`] for an explicit display timezone.
#[must_use]
pub fn format_date_in<Tz>(input: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let input = input.trim();
    if let Some(date) = parse_plain_date(input) {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    parse_timestamp(input, tz).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// "Mar 15, 2024, 02:30 PM" in the host timezone; plain dates get no time.
#[must_use]
pub fn format_date_time(input: &str) -> Option<String> {
    format_date_time_in(input, &Local)
}

#[must_use]
pub fn format_date_time_in<Tz>(input: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let input = input.trim();
    if let Some(date) = parse_plain_date(input) {
        return Some(date.format(DATE_FORMAT).to_string());
    }
    parse_timestamp(input, tz).map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rust_decimal::prelude::FromPrimitive;
    use serde_json::json;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(Decimal::new(45, 0)), "$45.00");
        assert_eq!(format_currency(Decimal::new(12_345, 3)), "$12.35");
        assert_eq!(format_currency(Decimal::new(1, 1)), "$0.10");
        assert_eq!(format_currency(Decimal::from_f64(99.999).unwrap()), "$100.00");
        assert_eq!(format_amount(&json!("150.5")), Some("$150.50".to_owned()));
        assert_eq!(format_amount(&json!(75)), Some("$75.00".to_owned()));
        assert_eq!(format_amount(&json!("n/a")), None);
        assert_eq!(format_amount(&Value::Null), None);
    }

    #[test]
    fn test_plain_date_never_shifts() {
        let zones = [
            FixedOffset::west_opt(12 * 3600).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
            FixedOffset::east_opt(14 * 3600).unwrap(),
        ];
        for tz in &zones {
            assert_eq!(format_date_in("2024-03-15", tz).as_deref(), Some("Mar 15, 2024"));
            assert_eq!(
                format_date_time_in("2024-03-15", tz).as_deref(),
                Some("Mar 15, 2024")
            );
        }
        assert_eq!(format_date("2024-03-15").as_deref(), Some("Mar 15, 2024"));
    }

    #[test]
    fn test_timestamps_convert_to_display_zone() {
        assert_eq!(
            format_date_time_in("2024-03-15T14:30:00Z", &Utc).as_deref(),
            Some("Mar 15, 2024, 02:30 PM")
        );
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            format_date_time_in("2024-03-15T20:30:00.000000Z", &tokyo).as_deref(),
            Some("Mar 16, 2024, 05:30 AM")
        );
        assert_eq!(
            format_date_in("2024-03-15T20:30:00Z", &tokyo).as_deref(),
            Some("Mar 16, 2024")
        );
        assert_eq!(
            format_date_time_in("2024-03-15 09:05:00", &tokyo).as_deref(),
            Some("Mar 15, 2024, 09:05 AM")
        );
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(format_date("2024-02-30"), None);
        assert_eq!(format_date("15/03/2024"), None);
        assert_eq!(format_date_time(""), None);
    }
}
