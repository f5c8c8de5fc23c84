//! Minimal iCalendar (RFC 5545) text generation: enough of the
//! VEVENT/VALARM/VTIMEZONE surface to express course schedules and exam
//! reminders, not a general-purpose ICS library.

mod alarm;
mod builder;
mod calendar;
mod event;
mod format;
mod location;
mod repeat_rule;
mod timezone;

pub use alarm::Alarm;
pub use builder::{build_course_calendar, build_exam_calendar};
pub use calendar::Calendar;
pub use event::Event;
pub use location::Location;
pub use repeat_rule::RepeatRule;
pub use timezone::Timezone;
