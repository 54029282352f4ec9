use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A single ISO-8601 calendar week.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week {
    pub year: i32,
    pub week: u32,
}

impl Week {
    pub fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// Monday of this ISO week, if the (year, week) pair is valid.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// Sunday of this ISO week, if the (year, week) pair is valid.
    pub fn sunday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Sun)
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{}", self.year, self.week)
    }
}

/// Number of ISO weeks in a year (52 or 53).
///
/// December 28th always falls in the last ISO week of its year.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// A requested week window: `week_from..=week_to` starting in `year`.
///
/// When `week_from > week_to` the window wraps the year boundary and the
/// trailing weeks belong to `year + 1` (e.g. W51 of 2025 through W2 of 2026).
/// Week numbers outside `1..=53` are the caller's responsibility; expansion
/// clamps to the ISO week count of the year it walks through.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindowRequest {
    pub year: i32,
    pub week_from: u32,
    pub week_to: u32,
}

impl WeekWindowRequest {
    pub fn new(year: i32, week_from: u32, week_to: u32) -> Self {
        Self {
            year,
            week_from,
            week_to,
        }
    }

    /// Expand the request into the ordered, year-boundary-aware week sequence.
    pub fn expand(&self) -> Vec<Week> {
        let mut weeks = Vec::new();
        if self.week_from <= self.week_to {
            for w in self.week_from..=self.week_to {
                weeks.push(Week::new(self.year, w));
            }
        } else {
            let last = weeks_in_year(self.year);
            for w in self.week_from..=last {
                weeks.push(Week::new(self.year, w));
            }
            for w in 1..=self.week_to {
                weeks.push(Week::new(self.year + 1, w));
            }
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weeks_in_year() {
        // 2020 is a long ISO year, 2025 is not
        assert_eq!(weeks_in_year(2020), 53);
        assert_eq!(weeks_in_year(2025), 52);
        assert_eq!(weeks_in_year(2026), 53);
    }

    #[test]
    fn test_expand_same_year() {
        let weeks = WeekWindowRequest::new(2025, 10, 13).expand();
        assert_eq!(
            weeks,
            vec![
                Week::new(2025, 10),
                Week::new(2025, 11),
                Week::new(2025, 12),
                Week::new(2025, 13),
            ]
        );
    }

    #[test]
    fn test_expand_single_week() {
        let weeks = WeekWindowRequest::new(2025, 7, 7).expand();
        assert_eq!(weeks, vec![Week::new(2025, 7)]);
    }

    #[test]
    fn test_expand_wraps_year_boundary() {
        let weeks = WeekWindowRequest::new(2025, 51, 2).expand();
        assert_eq!(
            weeks,
            vec![
                Week::new(2025, 51),
                Week::new(2025, 52),
                Week::new(2026, 1),
                Week::new(2026, 2),
            ]
        );
    }

    #[test]
    fn test_expand_wrap_respects_long_year() {
        // 2020 has 53 ISO weeks, so the wrap starts at W52 and includes W53
        let weeks = WeekWindowRequest::new(2020, 52, 1).expand();
        assert_eq!(
            weeks,
            vec![Week::new(2020, 52), Week::new(2020, 53), Week::new(2021, 1)]
        );
    }

    #[test]
    fn test_week_monday_sunday() {
        let week = Week::new(2025, 51);
        assert_eq!(week.monday(), NaiveDate::from_ymd_opt(2025, 12, 15));
        assert_eq!(week.sunday(), NaiveDate::from_ymd_opt(2025, 12, 21));
    }

    #[test]
    fn test_week_display() {
        assert_eq!(Week::new(2026, 1).to_string(), "2026-W1");
    }
}
