//! # Report Ranges
//!
//! Inclusive calendar-day ranges used by the sales reports.
//!
//! ```text
//! by_date(2024-03-01, 2024-03-03)
//!
//!   2024-03-01 00:00Z                               2024-03-04 00:00Z
//!        │◄──────────── included ──────────────────►│
//!        [ start_at                        end_before )
//! ```
//!
//! Days are UTC. The upper bound is exclusive at midnight after `end`, so
//! every instant of the last day is included.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::{CoreError, CoreResult, ValidationError};

/// An inclusive range of UTC calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
    end_before: NaiveDate,
}

impl DateRange {
    /// Builds the range `[start, end]`.
    ///
    /// Fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let end_before = end.succ_opt().ok_or_else(|| ValidationError::InvalidFormat {
            field: "endDate".to_string(),
            reason: "date is out of range".to_string(),
        })?;

        Ok(DateRange {
            start,
            end,
            end_before,
        })
    }

    /// The whole of `month` in `year`, from day 1 to the month's last day.
    pub fn for_month(year: i32, month: u32) -> CoreResult<Self> {
        let invalid = || ValidationError::OutOfRange {
            field: "mes".to_string(),
            min: 1,
            max: 12,
        };

        if !(1..=12).contains(&month) {
            return Err(invalid().into());
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ValidationError::InvalidFormat {
                field: "ano".to_string(),
                reason: format!("{year} is not a representable year"),
            }
        })?;

        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last = next_first
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        DateRange::new(first, last)
    }

    /// Monday through Sunday of the week that contains `day`.
    pub fn week_containing(day: NaiveDate) -> CoreResult<Self> {
        let offset = u64::from(day.weekday().num_days_from_monday());
        let monday = day
            .checked_sub_days(chrono::Days::new(offset))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: "week starts before the earliest supported date".to_string(),
            })?;
        let sunday = monday
            .checked_add_days(chrono::Days::new(6))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: "week ends after the latest supported date".to_string(),
            })?;

        DateRange::new(monday, sunday)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant included (midnight UTC of `start`).
    pub fn start_at(&self) -> DateTime<Utc> {
        midnight(self.start)
    }

    /// First instant excluded (midnight UTC after `end`).
    pub fn end_before(&self) -> DateTime<Utc> {
        midnight(self.end_before)
    }

    #[cfg(test)]
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        *at >= self.start_at() && *at < self.end_before()
    }
}

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_range_includes_whole_last_day() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 3)).unwrap();

        assert!(range.contains(&at(2024, 3, 1, 0, 0, 0)));
        assert!(range.contains(&at(2024, 3, 3, 23, 59, 59)));
        assert!(!range.contains(&at(2024, 3, 4, 0, 0, 0)));
        assert!(!range.contains(&at(2024, 2, 29, 23, 59, 59)));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
        assert_eq!(range.end_before(), at(2024, 3, 2, 0, 0, 0));
    }

    #[test]
    fn test_start_after_end_rejected() {
        let err = DateRange::new(date(2024, 3, 5), date(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_month_bounds() {
        let feb = DateRange::for_month(2024, 2).unwrap();
        assert_eq!(feb.start(), date(2024, 2, 1));
        assert_eq!(feb.end(), date(2024, 2, 29));

        let dec = DateRange::for_month(2023, 12).unwrap();
        assert_eq!(dec.end(), date(2023, 12, 31));
        assert_eq!(dec.end_before(), at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            DateRange::for_month(2024, 13),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
        assert!(DateRange::for_month(2024, 0).is_err());
    }

    #[test]
    fn test_week_runs_monday_to_sunday() {
        // 2024-03-07 is a Thursday.
        let week = DateRange::week_containing(date(2024, 3, 7)).unwrap();
        assert_eq!(week.start(), date(2024, 3, 4));
        assert_eq!(week.end(), date(2024, 3, 10));

        let from_monday = DateRange::week_containing(date(2024, 3, 4)).unwrap();
        let from_sunday = DateRange::week_containing(date(2024, 3, 10)).unwrap();
        assert_eq!(from_monday, week);
        assert_eq!(from_sunday, week);
    }
}
