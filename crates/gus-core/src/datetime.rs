//! Datetime literal rendering and parsing
//!
//! The query language accepts datetime literals of the form
//! `2019-06-09T01:00:00.000000Z`; the platform's own exports use
//! `2019-06-09 01:00:00`. Both conversions live here so the query and
//! client layers render timestamps identically.

use chrono::{NaiveDate, NaiveDateTime};

/// Platform-standard timestamp format (`2019-06-09 01:00:00`)
pub const SF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Plain calendar date format (`2019-06-09`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Render a timestamp as a query-language datetime literal.
///
/// Microsecond precision with an explicit UTC-style `Z` suffix; the input
/// is taken to already be in UTC.
pub fn soql_literal(dt: NaiveDateTime) -> String {
    format!("{}Z", dt.format("%Y-%m-%dT%H:%M:%S%.6f"))
}

/// Render a timestamp in the platform's standard form.
pub fn sf_standard(dt: NaiveDateTime) -> String {
    dt.format(SF_FORMAT).to_string()
}

/// Render a timestamp for compact human display (`09 Jun, 01:00AM`).
pub fn easy_view(dt: NaiveDateTime) -> String {
    dt.format("%d %b, %I:%M%p").to_string()
}

/// Parse a plain calendar date (`2019-06-09`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Parse a platform-standard timestamp (`2019-06-09 01:00:00`).
pub fn parse_sf(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, SF_FORMAT).ok()
}

/// Parse a query-language datetime literal, with or without the trailing `Z`.
pub fn parse_soql(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.strip_suffix('Z').unwrap_or(s);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()
}
