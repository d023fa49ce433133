//! Conversion of user-typed time range bounds into the timestamp format used
//! by the alarm log index.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};

/// Timestamp format of the alarm log `time` and `message_time` fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Converts `raw` into a UTC timestamp string.
///
/// Accepts absolute times (`2021-05-17 08:00:00.000`, `2021-05-17`, RFC 3339)
/// and amounts relative to `now` (`now`, `8 hours`, `1 day 2h`, `30 min ago`).
/// Input that is neither is returned unchanged, so `*` stays an open bound.
pub fn convert_time_input(raw: &str, now: DateTime<Utc>) -> String {
    match parse_time_input(raw, now) {
        Some(time) => format_timestamp(time),
        None => raw.to_string(),
    }
}

pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_time_input(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    parse_absolute(raw).or_else(|| parse_relative(raw).and_then(|amount| amount.before(now)))
}

fn parse_absolute(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(time.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|time| time.and_utc())
}

/// A relative amount of time, months kept apart since they vary in length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimeAmount {
    months: u32,
    duration: Duration,
}

impl Default for TimeAmount {
    fn default() -> Self {
        Self {
            months: 0,
            duration: Duration::zero(),
        }
    }
}

impl TimeAmount {
    fn before(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_months(Months::new(self.months))?
            .checked_sub_signed(self.duration)
    }
}

fn parse_relative(raw: &str) -> Option<TimeAmount> {
    let lower = raw.to_lowercase();
    let lower = lower.strip_suffix("ago").unwrap_or(&lower).trim();
    if lower == "now" {
        return Some(TimeAmount::default());
    }

    let mut amount = TimeAmount::default();
    let mut pending: Option<i64> = None;
    let mut matched_any = false;

    for word in lower.split_whitespace() {
        let digits_end = word
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(word.len());
        let (number, unit) = word.split_at(digits_end);

        let count = match (number.is_empty(), pending.take()) {
            (false, None) => number.parse::<i64>().ok()?,
            (true, Some(count)) => count,
            _ => return None,
        };
        if unit.is_empty() {
            pending = Some(count);
            continue;
        }
        add_unit(&mut amount, count, unit)?;
        matched_any = true;
    }

    if pending.is_some() || !matched_any {
        return None;
    }
    Some(amount)
}

fn add_unit(amount: &mut TimeAmount, count: i64, unit: &str) -> Option<()> {
    let duration = match unit {
        "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => {
            Duration::try_milliseconds(count)?
        }
        "s" | "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(count)?,
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(count)?,
        "h" | "hour" | "hours" => Duration::try_hours(count)?,
        "d" | "day" | "days" => Duration::try_days(count)?,
        "w" | "week" | "weeks" => Duration::try_weeks(count)?,
        "mo" | "month" | "months" => {
            amount.months = amount.months.checked_add(u32::try_from(count).ok()?)?;
            return Some(());
        }
        "y" | "year" | "years" => {
            let months = u32::try_from(count).ok()?.checked_mul(12)?;
            amount.months = amount.months.checked_add(months)?;
            return Some(());
        }
        _ => return None,
    };
    amount.duration = amount.duration.checked_add(&duration)?;
    Some(())
}
