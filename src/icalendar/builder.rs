//! Builds [`Calendar`]s from upstream course/exam data.
//!
//! Built from the primitives in this module plus [`crate::timetable`] and
//! [`crate::config`]: a course's week range is cut at the term's separator
//! week, each side becoming one weekly-recurring `VEVENT` against the
//! summer or winter period table.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::config;
use crate::errors::AppError;
use crate::timetable::{term_time_table, TimeTable};
use crate::upstream::{CourseEntry, CourseList, Examination, ExamList, TeachingCalendar};

use super::calendar::Calendar;
use super::event::Event;
use super::location::Location;
use super::repeat_rule::RepeatRule;
use super::timezone::Timezone;

fn parse_weekday(day: &str) -> Option<Weekday> {
    match day.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parses a weeks specification such as `"1-14"` or `"1-7,9,12-14"` into
/// an ordered list of inclusive `(start, end)` week ranges.
fn parse_weeks(weeks: &str) -> Vec<(u32, u32)> {
    let mut ranges = Vec::new();
    for segment in weeks.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if let Some((start, end)) = segment.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.trim().parse(), end.trim().parse()) {
                ranges.push((start, end));
            }
        } else if let Ok(week) = segment.parse() {
            ranges.push((week, week));
        }
    }
    ranges
}

/// Splits an inclusive week range at `sep_weeks`, returning up to two
/// sub-ranges: one entirely before the separator, one from it onward.
fn split_at_separator(range: (u32, u32), sep_weeks: i64) -> Vec<(u32, u32)> {
    let (start, end) = range;
    let sep = sep_weeks.max(0) as u32;
    if sep <= start || sep > end {
        return vec![range];
    }
    let mut out = Vec::new();
    if start < sep {
        out.push((start, sep - 1));
    }
    out.push((sep, end));
    out
}

fn date_for_week(term_start: NaiveDate, week: u32, weekday: Weekday) -> NaiveDate {
    let term_start_weekday = term_start.weekday().num_days_from_monday() as i64;
    let target_weekday = weekday.num_days_from_monday() as i64;
    let week_start = term_start + chrono::Duration::days((week as i64 - 1) * 7 - term_start_weekday);
    week_start + chrono::Duration::days(target_weekday)
}

fn periods_for(table: &TimeTable, start_time: i32, duration: i32) -> Option<(NaiveTime, NaiveTime)> {
    let start_idx = usize::try_from(start_time - 1).ok()?;
    let end_idx = start_idx.checked_add(usize::try_from(duration.max(1)).ok()? - 1)?;
    let start = table.event_times.get(start_idx)?;
    let end = table.event_times.get(end_idx)?;
    Some((start.start, end.end))
}

fn course_events(
    course: &CourseEntry,
    term_start: NaiveDate,
    sep_weeks: i64,
    pre_table: &TimeTable,
    suf_table: &TimeTable,
) -> Vec<Event> {
    let Some(weekday) = parse_weekday(&course.day) else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for range in parse_weeks(&course.weeks) {
        for (sub_start, sub_end) in split_at_separator(range, sep_weeks) {
            if sub_start > sub_end {
                continue;
            }
            let table = if sub_start < sep_weeks.max(0) as u32 {
                pre_table
            } else {
                suf_table
            };
            let Some((start_time, end_time)) =
                periods_for(table, course.start_time, course.duration)
            else {
                continue;
            };

            let first_date = date_for_week(term_start, sub_start, weekday);
            let start = first_date.and_time(start_time);
            let end = first_date.and_time(end_time);
            let occurrences = sub_end - sub_start + 1;

            let mut event = Event::new(format!("{}{}", config::COURSE_SUMMARY_PREFIX, course.name))
                .with_description(format!(
                    "{} {} {}",
                    course.teacher, course.classroom, config::COURSE_DESC_SUFFIX
                ))
                .with_location(Location::new(course.classroom.clone()))
                .with_start(start)
                .with_end(end)
                .with_repeat_rule(RepeatRule {
                    frequency: "WEEKLY".to_string(),
                    interval: 1,
                    count: i32::try_from(occurrences).unwrap_or(1),
                    until: None,
                });

            for alarm in config::default_course_alarms() {
                event.add_alarm(alarm);
            }
            events.push(event);
        }
    }
    events
}

/// Builds a calendar of recurring `VEVENT`s for every course, split at the
/// term's summer/winter separator week.
pub fn build_course_calendar(
    courses: &CourseList,
    calendar: &TeachingCalendar,
) -> Result<Calendar, AppError> {
    let term_start = NaiveDate::parse_from_str(calendar.start.trim(), "%Y-%m-%d")
        .map_err(|err| AppError::Logical(format!("invalid teaching calendar start date: {err}")))?;
    let term = term_time_table(term_start);

    let mut ics = Calendar::new();
    ics.set_product_id(config::PROD_ID);
    ics.set_timezone(Timezone::default_shanghai());
    for course in &courses.courses {
        for event in course_events(
            course,
            term_start,
            term.sep_weeks,
            &term.pre_table,
            &term.suf_table,
        ) {
            ics.add_event(event);
        }
    }
    Ok(ics)
}

fn parse_exam_instant(value: &str) -> Result<chrono::NaiveDateTime, AppError> {
    chrono::NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|err| AppError::Logical(format!("invalid exam time {value:?}: {err}")))
}

fn exam_event(exam: &Examination) -> Result<Event, AppError> {
    let start = parse_exam_instant(&exam.start_time)?;
    let end = parse_exam_instant(&exam.end_time)?;

    let mut event = Event::new(format!("{}{}", config::EXAM_SUMMARY_PREFIX, exam.name))
        .with_description(format!("{} {}", exam.exam_type, config::EXAM_DESC_SUFFIX))
        .with_location(Location::new(exam.location.clone()))
        .with_start(start)
        .with_end(end);

    for alarm in config::default_exam_alarms() {
        event.add_alarm(alarm);
    }
    Ok(event)
}

/// Builds a calendar of one `VEVENT` per exam.
pub fn build_exam_calendar(exams: &ExamList) -> Result<Calendar, AppError> {
    let mut ics = Calendar::new();
    ics.set_product_id(config::PROD_ID);
    ics.set_timezone(Timezone::default_shanghai());
    for exam in &exams.exams {
        ics.add_event(exam_event(exam)?);
    }
    Ok(ics)
}
