//! A single `VEVENT`.

use chrono::NaiveDateTime;

use super::alarm::Alarm;
use super::format::time_to_ics;
use super::location::Location;
use super::repeat_rule::RepeatRule;
use super::timezone::Timezone;

#[derive(Debug, Clone)]
pub struct Event {
    pub summary: String,
    pub description: String,
    pub location: Option<Location>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub alarms: Vec<Alarm>,
    pub repeat_rule: Option<RepeatRule>,
}

impl Event {
    #[must_use]
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: String::new(),
            location: None,
            start: None,
            end: None,
            alarms: Vec::new(),
            repeat_rule: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn add_alarm(&mut self, alarm: Alarm) {
        self.alarms.push(alarm);
    }

    #[must_use]
    pub fn with_repeat_rule(mut self, rule: RepeatRule) -> Self {
        self.repeat_rule = Some(rule);
        self
    }

    fn uid(&self) -> String {
        let stamp = self
            .start
            .map(|t| t.format("%Y%m%dT%H%M%S").to_string())
            .unwrap_or_default();
        format!("{}{stamp}", self.summary)
    }

    #[must_use]
    pub fn to_ics(&self, timezone: Option<&Timezone>) -> String {
        let mut out = String::from("BEGIN:VEVENT\n");
        out.push_str(&format!("SUMMARY:{}\n", self.summary));
        if !self.description.is_empty() {
            out.push_str(&format!("DESCRIPTION:{}\n", self.description));
        }
        if let Some(location) = &self.location {
            out.push_str(&location.to_ics());
            out.push('\n');
        }
        let tzid = timezone.map(Timezone::id);
        if let Some(start) = self.start {
            out.push_str(&format!("DTSTART{}\n", time_to_ics(start, tzid, ":")));
        }
        if let Some(end) = self.end {
            out.push_str(&format!("DTEND{}\n", time_to_ics(end, tzid, ":")));
        }
        for alarm in &self.alarms {
            out.push_str(&alarm.to_ics());
        }
        if let Some(rule) = &self.repeat_rule {
            out.push_str(&rule.to_ics());
            out.push('\n');
        }
        out.push_str(&format!("UID:{}\n", self.uid()));
        out.push_str("END:VEVENT\n");
        out
    }
}
