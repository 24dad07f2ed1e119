/// Relative ("3 hours ago") wording.
use chrono::{DateTime, Datelike, Months, Utc};

use crate::input::TimestampInput;

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2520;
const MINUTES_IN_MONTH: i64 = 43200;
const MINUTES_IN_TWO_MONTHS: i64 = 86400;

/// Options for relative formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelativeOptions {
    /// Append "ago" / prepend "in" depending on direction
    pub add_suffix: bool,
    /// Finer wording for distances under 90 seconds
    pub include_seconds: bool,
    /// Reference instant; the current time when unset
    pub base: Option<TimestampInput>,
}

impl RelativeOptions {
    pub fn with_suffix(mut self) -> Self {
        self.add_suffix = true;
        self
    }

    pub fn including_seconds(mut self) -> Self {
        self.include_seconds = true;
        self
    }

    pub fn relative_to(mut self, base: impl Into<TimestampInput>) -> Self {
        self.base = Some(base.into());
        self
    }
}

/// Describe the distance between `instant` and `base` in words.
pub fn distance_in_words(
    instant: DateTime<Utc>,
    base: DateTime<Utc>,
    options: &RelativeOptions,
) -> String {
    let is_future = instant > base;
    let (earlier, later) = if is_future {
        (base, instant)
    } else {
        (instant, base)
    };

    let seconds = (later - earlier).num_seconds();
    let minutes = rounded_div(seconds, 60);

    let phrase = if minutes < 2 {
        if options.include_seconds {
            match seconds {
                0..=4 => "less than 5 seconds".to_string(),
                5..=9 => "less than 10 seconds".to_string(),
                10..=19 => "less than 20 seconds".to_string(),
                20..=39 => "half a minute".to_string(),
                40..=59 => "less than a minute".to_string(),
                _ => "1 minute".to_string(),
            }
        } else if minutes == 0 {
            "less than a minute".to_string()
        } else {
            "1 minute".to_string()
        }
    } else if minutes < 45 {
        count_phrase(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        format!("about {}", count_phrase(rounded_div(minutes, 60), "hour"))
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        count_phrase(rounded_div(minutes, MINUTES_IN_DAY), "day")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        format!(
            "about {}",
            count_phrase(rounded_div(minutes, MINUTES_IN_MONTH), "month")
        )
    } else {
        let months = calendar_months_between(earlier, later);
        if months < 12 {
            count_phrase(rounded_div(minutes, MINUTES_IN_MONTH), "month")
        } else {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", count_phrase(years, "year")),
                3..=8 => format!("over {}", count_phrase(years, "year")),
                _ => format!("almost {}", count_phrase(years + 1, "year")),
            }
        }
    };

    match (options.add_suffix, is_future) {
        (false, _) => phrase,
        (true, true) => format!("in {}", phrase),
        (true, false) => format!("{} ago", phrase),
    }
}

fn count_phrase(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Non-negative division rounded half up.
fn rounded_div(value: i64, divisor: i64) -> i64 {
    (value + divisor / 2) / divisor
}

/// Full calendar months from `earlier` to `later` (`earlier <= later`).
fn calendar_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12 + i64::from(later.month())
        - i64::from(earlier.month());

    if months > 0 {
        let anniversary = u32::try_from(months)
            .ok()
            .and_then(|m| earlier.checked_add_months(Months::new(m)));
        match anniversary {
            Some(anniversary) if anniversary > later => months -= 1,
            Some(_) => {}
            None => months -= 1,
        }
    }

    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn words_before(delta: Duration) -> String {
        distance_in_words(base() - delta, base(), &RelativeOptions::default())
    }

    #[test]
    fn test_minutes_and_hours() {
        assert_eq!(words_before(Duration::seconds(0)), "less than a minute");
        assert_eq!(words_before(Duration::seconds(29)), "less than a minute");
        assert_eq!(words_before(Duration::seconds(30)), "1 minute");
        assert_eq!(words_before(Duration::seconds(89)), "1 minute");
        assert_eq!(words_before(Duration::seconds(90)), "2 minutes");
        assert_eq!(words_before(Duration::minutes(44)), "44 minutes");
        assert_eq!(words_before(Duration::minutes(45)), "about 1 hour");
        assert_eq!(words_before(Duration::minutes(89)), "about 1 hour");
        assert_eq!(words_before(Duration::minutes(90)), "about 2 hours");
        assert_eq!(words_before(Duration::hours(3)), "about 3 hours");
        assert_eq!(words_before(Duration::hours(23)), "about 23 hours");
    }

    #[test]
    fn test_days_and_months() {
        assert_eq!(words_before(Duration::hours(24)), "1 day");
        assert_eq!(words_before(Duration::hours(41)), "1 day");
        assert_eq!(words_before(Duration::hours(42)), "2 days");
        assert_eq!(words_before(Duration::days(29)), "29 days");
        assert_eq!(words_before(Duration::days(30)), "about 1 month");
        assert_eq!(words_before(Duration::days(50)), "about 2 months");
        assert_eq!(words_before(Duration::days(100)), "3 months");
    }

    #[test]
    fn test_years() {
        assert_eq!(words_before(Duration::days(366)), "about 1 year");
        assert_eq!(words_before(Duration::days(365 + 150)), "over 1 year");
        assert_eq!(words_before(Duration::days(365 + 300)), "almost 2 years");
        assert_eq!(words_before(Duration::days(3 * 365 + 10)), "about 3 years");
    }

    #[test]
    fn test_include_seconds() {
        let opts = RelativeOptions::default().including_seconds();
        let words = |secs| distance_in_words(base() - Duration::seconds(secs), base(), &opts);
        assert_eq!(words(3), "less than 5 seconds");
        assert_eq!(words(7), "less than 10 seconds");
        assert_eq!(words(15), "less than 20 seconds");
        assert_eq!(words(30), "half a minute");
        assert_eq!(words(50), "less than a minute");
        assert_eq!(words(70), "1 minute");
        assert_eq!(words(120), "2 minutes");
    }

    #[test]
    fn test_suffix_direction() {
        let opts = RelativeOptions::default().with_suffix();
        let past = distance_in_words(base() - Duration::hours(3), base(), &opts);
        let future = distance_in_words(base() + Duration::hours(3), base(), &opts);
        let same = distance_in_words(base(), base(), &opts);
        assert_eq!(past, "about 3 hours ago");
        assert_eq!(future, "in about 3 hours");
        assert_eq!(same, "less than a minute ago");
    }

    #[test]
    fn test_calendar_months() {
        let jan_31 = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let feb_29 = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        let mar_30 = Utc.with_ymd_and_hms(2024, 3, 30, 0, 0, 0).unwrap();
        assert_eq!(calendar_months_between(jan_31, feb_29), 1);
        assert_eq!(calendar_months_between(jan_31, mar_30), 1);
        assert_eq!(calendar_months_between(jan_31, jan_31), 0);
    }
}
