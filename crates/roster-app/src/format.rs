// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parses the date shapes patient documents carry.
///
/// RFC 3339 timestamps keep their offset. Timestamps without an offset and bare
/// calendar dates are read as UTC.
pub fn parse_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(parsed);
    }

    let with_fraction = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let with_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    for description in [with_fraction, with_seconds, with_minutes] {
        if let Ok(parsed) = PrimitiveDateTime::parse(raw, description) {
            return Some(parsed.assume_utc());
        }
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

pub fn format_date(raw: &str, include_time: bool) -> String {
    format_date_in(raw, include_time, UtcOffset::UTC)
}

/// Formats `raw` as `Mar 05, 2024`, or `Mar 05, 2024 2:07pm` with time.
///
/// Unparseable input renders as an empty string.
pub fn format_date_in(raw: &str, include_time: bool, offset: UtcOffset) -> String {
    match parse_date(raw) {
        Some(parsed) => format_datetime(parsed.to_offset(offset), include_time),
        None => String::new(),
    }
}

pub fn format_datetime(value: OffsetDateTime, include_time: bool) -> String {
    let date_part = format_description!("[month repr:short] [day], [year]");
    let time_part = format_description!("[hour repr:12 padding:none]:[minute][period case:lower]");

    let Ok(date) = value.format(date_part) else {
        return String::new();
    };
    if !include_time {
        return date;
    }
    match value.format(time_part) {
        Ok(clock) => format!("{date} {clock}"),
        Err(_) => date,
    }
}
