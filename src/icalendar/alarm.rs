//! A `VALARM` reminder block.

use chrono::Duration;

use super::format::duration_to_ics;

#[derive(Debug, Clone)]
pub struct Alarm {
    pub action: String,
    pub trigger: Duration,
    pub description: String,
}

impl Alarm {
    #[must_use]
    pub fn new(action: impl Into<String>, trigger: Duration, description: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            trigger,
            description: description.into(),
        }
    }

    #[must_use]
    pub fn to_ics(&self) -> String {
        let action = if self.action.is_empty() {
            "DISPLAY"
        } else {
            self.action.as_str()
        };
        format!(
            "BEGIN:VALARM\nACTION:{action}\nTRIGGER:{}\nDESCRIPTION:{}\nEND:VALARM\n",
            duration_to_ics(self.trigger),
            self.description
        )
    }
}
