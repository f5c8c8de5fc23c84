//! Summer/winter class-period timetables and the term separator-week
//! calculation used to split a course's run across them.
//!
//! Period boundaries are fixed wall-clock times in Asia/Shanghai.

use chrono::{Datelike, NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTimes {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct TimeTable {
    pub event_times: Vec<EventTimes>,
}

fn period(start: (u32, u32), end: (u32, u32)) -> EventTimes {
    EventTimes {
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid period start"),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid period end"),
    }
}

/// Class periods for the warmer half of the year.
#[must_use]
pub fn summer_time_table() -> TimeTable {
    TimeTable {
        event_times: vec![
            period((8, 0), (8, 45)),
            period((8, 55), (9, 40)),
            period((10, 10), (10, 55)),
            period((11, 5), (11, 50)),
            period((14, 30), (15, 15)),
            period((15, 25), (16, 10)),
            period((16, 40), (17, 25)),
            period((17, 35), (18, 20)),
            period((19, 30), (20, 15)),
            period((20, 25), (21, 10)),
            period((21, 20), (22, 5)),
        ],
    }
}

/// Class periods for the colder half of the year — same morning slots,
/// afternoon/evening shifted earlier.
#[must_use]
pub fn winter_time_table() -> TimeTable {
    TimeTable {
        event_times: vec![
            period((8, 0), (8, 45)),
            period((8, 55), (9, 40)),
            period((10, 10), (10, 55)),
            period((11, 5), (11, 50)),
            period((14, 0), (14, 45)),
            period((14, 55), (15, 40)),
            period((16, 10), (16, 55)),
            period((17, 5), (17, 50)),
            period((19, 0), (19, 45)),
            period((19, 55), (20, 40)),
            period((20, 50), (21, 35)),
        ],
    }
}

pub struct TermTimeTable {
    pub sep_weeks: i64,
    pub pre_table: TimeTable,
    pub suf_table: TimeTable,
}

/// Computes which week of the term the summer/winter schedule switches on.
///
/// If the term starts before October, the transition anchor is May 1 of
/// the start year and the pre-separator table is winter; otherwise the
/// anchor is October 1 and the pre-separator table is summer. `sep_weeks`
/// is `ceil(hours between start and anchor / 168) + 1`.
#[must_use]
pub fn term_time_table(term_start: NaiveDate) -> TermTimeTable {
    let (anchor_month, anchor_day, pre_table, suf_table) = if term_start.month() < 10 {
        (5_u32, 1_u32, winter_time_table(), summer_time_table())
    } else {
        (10_u32, 1_u32, summer_time_table(), winter_time_table())
    };

    let anchor = NaiveDate::from_ymd_opt(term_start.year(), anchor_month, anchor_day)
        .expect("valid separator anchor date");
    let hours = (anchor - term_start).num_hours() as f64;
    let sep_weeks = (hours / (24.0 * 7.0)).ceil() as i64 + 1;

    TermTimeTable {
        sep_weeks,
        pre_table,
        suf_table,
    }
}
