//! `RRULE` construction and formatting: `FREQ`/`INTERVAL`/`COUNT`/`UNTIL`.

use chrono::NaiveDateTime;

use super::format::time_to_ics;

#[derive(Debug, Clone, Default)]
pub struct RepeatRule {
    pub frequency: String,
    pub interval: i32,
    pub count: i32,
    pub until: Option<NaiveDateTime>,
}

impl RepeatRule {
    #[must_use]
    pub fn to_ics(&self) -> String {
        let mut out = format!("RRULE:FREQ={}", self.frequency);
        if self.interval > 1 {
            out.push_str(&format!(";INTERVAL={}", self.interval));
        }
        if self.count > 0 {
            out.push_str(&format!(";COUNT={}", self.count));
        }
        if let Some(until) = self.until {
            out.push_str(&format!(";UNTIL{}", time_to_ics(until, None, "=")));
        }
        out
    }
}
