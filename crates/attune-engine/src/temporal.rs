// SPDX-FileCopyrightText: 2026 Attune Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporal context: time-of-day and weekend awareness for routing and
//! prompt ambience.

use attune_core::{DayPeriod, TemporalContext};
use chrono::{DateTime, Datelike, Local, Timelike, Weekday};

/// Map an hour of day (0-23) to its period.
pub fn period_for_hour(hour: u32) -> DayPeriod {
    match hour {
        5..=11 => DayPeriod::Morning,
        12..=16 => DayPeriod::Afternoon,
        17..=20 => DayPeriod::Evening,
        _ => DayPeriod::LateNight,
    }
}

/// Build the temporal context for a local timestamp.
pub fn temporal_context(now: DateTime<Local>) -> TemporalContext {
    let hour = now.hour();
    TemporalContext {
        hour,
        period: period_for_hour(hour),
        weekend: matches!(now.weekday(), Weekday::Sat | Weekday::Sun),
    }
}

/// Ambient mood hint injected into the system prompt.
pub fn mood_hint(period: DayPeriod) -> &'static str {
    match period {
        DayPeriod::Morning => "fresh and energized",
        DayPeriod::Afternoon => "calm and steady",
        DayPeriod::Evening => "relaxed",
        DayPeriod::LateNight => "intimate and quiet",
    }
}

/// Optional greeting for the period; late night has none.
pub fn greeting(period: DayPeriod) -> Option<&'static str> {
    match period {
        DayPeriod::Morning => Some("good morning"),
        DayPeriod::Afternoon => Some("good afternoon"),
        DayPeriod::Evening => Some("good evening"),
        DayPeriod::LateNight => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn hours_map_to_periods() {
        assert_eq!(period_for_hour(5), DayPeriod::Morning);
        assert_eq!(period_for_hour(11), DayPeriod::Morning);
        assert_eq!(period_for_hour(12), DayPeriod::Afternoon);
        assert_eq!(period_for_hour(16), DayPeriod::Afternoon);
        assert_eq!(period_for_hour(17), DayPeriod::Evening);
        assert_eq!(period_for_hour(20), DayPeriod::Evening);
        assert_eq!(period_for_hour(21), DayPeriod::LateNight);
        assert_eq!(period_for_hour(0), DayPeriod::LateNight);
        assert_eq!(period_for_hour(4), DayPeriod::LateNight);
    }

    #[test]
    fn weekend_detection() {
        // 2026-03-07 is a Saturday.
        let saturday = Local.with_ymd_and_hms(2026, 3, 7, 10, 0, 0).unwrap();
        assert!(temporal_context(saturday).weekend);
        // 2026-03-09 is a Monday.
        let monday = Local.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap();
        assert!(!temporal_context(monday).weekend);
    }

    #[test]
    fn late_night_has_no_greeting() {
        assert!(greeting(DayPeriod::LateNight).is_none());
        assert_eq!(greeting(DayPeriod::Morning), Some("good morning"));
    }
}
