// SPDX-FileCopyrightText: 2026 Advo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Office-hours gating.
//!
//! A pure predicate over (current local time, weekly schedule). The engine
//! consults it before the completion call; outside hours the offline
//! message is served instead.

use advo_core::types::{DaySchedule, WeeklySchedule};
use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

fn day_schedule(schedule: &WeeklySchedule, weekday: Weekday) -> Option<&DaySchedule> {
    match weekday {
        Weekday::Mon => schedule.monday.as_ref(),
        Weekday::Tue => schedule.tuesday.as_ref(),
        Weekday::Wed => schedule.wednesday.as_ref(),
        Weekday::Thu => schedule.thursday.as_ref(),
        Weekday::Fri => schedule.friday.as_ref(),
        Weekday::Sat => schedule.saturday.as_ref(),
        Weekday::Sun => schedule.sunday.as_ref(),
    }
}

fn is_empty(schedule: &WeeklySchedule) -> bool {
    *schedule == WeeklySchedule::default()
}

/// True when `now` falls within the schedule.
///
/// An entirely empty schedule means "always open" (gating was enabled but
/// never filled in); a missing or disabled day means closed. Interval ends
/// are inclusive. Unparseable times close the day rather than opening it.
pub fn is_open(schedule: &WeeklySchedule, now: NaiveDateTime) -> bool {
    if is_empty(schedule) {
        return true;
    }

    let Some(day) = day_schedule(schedule, now.weekday()) else {
        return false;
    };
    if !day.enabled {
        return false;
    }

    let (Ok(start), Ok(end)) = (
        NaiveTime::parse_from_str(&day.start, "%H:%M"),
        NaiveTime::parse_from_str(&day.end, "%H:%M"),
    ) else {
        return false;
    };

    let current = now.time();
    start <= current && current <= end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(datetime: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M").unwrap()
    }

    fn workweek() -> WeeklySchedule {
        let day = DaySchedule {
            enabled: true,
            start: "09:00".to_string(),
            end: "18:00".to_string(),
        };
        WeeklySchedule {
            monday: Some(day.clone()),
            tuesday: Some(day.clone()),
            wednesday: Some(day.clone()),
            thursday: Some(day.clone()),
            friday: Some(day),
            saturday: None,
            sunday: None,
        }
    }

    #[test]
    fn empty_schedule_is_always_open() {
        // 2026-08-02 is a Sunday.
        assert!(is_open(&WeeklySchedule::default(), at("2026-08-02 03:00")));
    }

    #[test]
    fn open_within_weekday_hours() {
        // 2026-08-03 is a Monday.
        assert!(is_open(&workweek(), at("2026-08-03 09:00")));
        assert!(is_open(&workweek(), at("2026-08-03 12:30")));
        assert!(is_open(&workweek(), at("2026-08-03 18:00")));
    }

    #[test]
    fn closed_outside_weekday_hours() {
        assert!(!is_open(&workweek(), at("2026-08-03 08:59")));
        assert!(!is_open(&workweek(), at("2026-08-03 18:01")));
        assert!(!is_open(&workweek(), at("2026-08-03 23:30")));
    }

    #[test]
    fn closed_on_missing_day() {
        // Saturday has no entry.
        assert!(!is_open(&workweek(), at("2026-08-08 12:00")));
    }

    #[test]
    fn closed_on_disabled_day() {
        let mut schedule = workweek();
        schedule.monday = Some(DaySchedule {
            enabled: false,
            start: "09:00".to_string(),
            end: "18:00".to_string(),
        });
        assert!(!is_open(&schedule, at("2026-08-03 12:00")));
    }

    #[test]
    fn bad_time_strings_close_the_day() {
        let mut schedule = workweek();
        schedule.monday = Some(DaySchedule {
            enabled: true,
            start: "nine".to_string(),
            end: "18:00".to_string(),
        });
        assert!(!is_open(&schedule, at("2026-08-03 12:00")));
    }
}
