//! Shift window resolution
//!
//! Maps a named regional coverage shift and a calendar date onto a
//! start/end timestamp window. Weekday and weekend schedules differ, and
//! not every shift is staffed on every day: an undefined combination
//! resolves to no window at all, which callers must treat as "no time
//! filter applies".

use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};
use thiserror::Error;

use gus_core::datetime;

/// Error for unrecognized shift names
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown shift `{0}`")]
pub struct UnknownShift(pub String);

/// Regional coverage shifts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    /// Singapore
    Sin,
    /// Dublin (weekdays only)
    Dub,
    /// Americas
    Usa,
    /// The full 24-hour rotation
    All,
}

impl Shift {
    /// Convert to the conventional region code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sin => "SIN",
            Self::Dub => "DUB",
            Self::Usa => "USA",
            Self::All => "ALL",
        }
    }
}

impl FromStr for Shift {
    type Err = UnknownShift;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SIN" => Ok(Self::Sin),
            "DUB" => Ok(Self::Dub),
            "USA" => Ok(Self::Usa),
            "ALL" => Ok(Self::All),
            other => Err(UnknownShift(other.to_string())),
        }
    }
}

/// Start/end timestamps for one shift on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftWindow {
    /// The window start as a query-language datetime literal.
    pub fn start_literal(&self) -> String {
        datetime::soql_literal(self.start)
    }

    /// The window end as a query-language datetime literal.
    pub fn end_literal(&self) -> String {
        datetime::soql_literal(self.end)
    }
}

/// Shift boundary hours; minutes are always on the hour.
fn boundaries(weekday: bool, shift: Shift) -> Option<(u32, u32)> {
    match (weekday, shift) {
        (true, Shift::Sin) => Some((1, 9)),
        (true, Shift::Dub) => Some((9, 16)),
        (true, Shift::Usa) => Some((16, 1)),
        (true, Shift::All) => Some((1, 1)),
        (false, Shift::Sin) => Some((1, 13)),
        (false, Shift::Usa) => Some((13, 1)),
        (false, Shift::All) => Some((1, 1)),
        (false, Shift::Dub) => None,
    }
}

/// Resolve the window for `shift` on `date`.
///
/// An overnight shift (start hour not below end hour) ends on the
/// following calendar day. `None` means the combination has no defined
/// boundaries, not that resolution failed.
pub fn resolve(date: NaiveDate, shift: Shift) -> Option<ShiftWindow> {
    let is_weekday = !matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let (start_hour, end_hour) = boundaries(is_weekday, shift)?;

    let start = date.and_hms_opt(start_hour, 0, 0)?;
    let end = if start_hour < end_hour {
        date.and_hms_opt(end_hour, 0, 0)?
    } else {
        date.checked_add_days(Days::new(1))?.and_hms_opt(end_hour, 0, 0)?
    };

    Some(ShiftWindow { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2019-06-10 is a Monday, 2019-06-09 a Sunday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 6, 10).unwrap()
    }

    fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 6, 9).unwrap()
    }

    #[test]
    fn test_weekday_sin_window() {
        let window = resolve(monday(), Shift::Sin).unwrap();
        assert_eq!(window.start_literal(), "2019-06-10T01:00:00.000000Z");
        assert_eq!(window.end_literal(), "2019-06-10T09:00:00.000000Z");
    }

    #[test]
    fn test_weekday_usa_is_overnight() {
        let window = resolve(monday(), Shift::Usa).unwrap();
        assert_eq!(window.start.date(), monday());
        assert_eq!(
            window.end.date(),
            monday().succ_opt().unwrap(),
            "overnight shift must end on the following calendar day"
        );
        assert_eq!(window.end_literal(), "2019-06-11T01:00:00.000000Z");
    }

    #[test]
    fn test_all_shift_covers_full_day() {
        let window = resolve(monday(), Shift::All).unwrap();
        assert_eq!(window.end - window.start, chrono::Duration::hours(24));
    }

    #[test]
    fn test_weekend_sin_runs_longer() {
        let window = resolve(sunday(), Shift::Sin).unwrap();
        assert_eq!(window.end_literal(), "2019-06-09T13:00:00.000000Z");
    }

    #[test]
    fn test_weekend_dub_is_undefined() {
        assert_eq!(resolve(sunday(), Shift::Dub), None);
        assert!(resolve(monday(), Shift::Dub).is_some());
    }

    #[test]
    fn test_shift_parsing() {
        assert_eq!("sin".parse(), Ok(Shift::Sin));
        assert_eq!("USA".parse(), Ok(Shift::Usa));
        assert_eq!(
            "EMEA".parse::<Shift>(),
            Err(UnknownShift("EMEA".to_string()))
        );
    }
}
