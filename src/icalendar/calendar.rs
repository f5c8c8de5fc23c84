//! A `VCALENDAR` document: timezone plus a list of events.

use super::event::Event;
use super::timezone::Timezone;

#[derive(Debug, Clone, Default)]
pub struct Calendar {
    events: Vec<Event>,
    product_id: String,
    timezone: Option<Timezone>,
}

impl Calendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn set_product_id(&mut self, product_id: impl Into<String>) {
        self.product_id = product_id.into();
    }

    pub fn set_timezone(&mut self, timezone: Timezone) {
        self.timezone = Some(timezone);
    }

    #[must_use]
    pub fn to_ics(&self) -> String {
        let mut out = String::from("BEGIN:VCALENDAR\nVERSION:2.0\n");
        if !self.product_id.is_empty() {
            out.push_str(&format!("PRODID:{}\n", self.product_id));
        }
        if let Some(timezone) = &self.timezone {
            out.push_str(&timezone.to_ics());
        }
        for event in &self.events {
            out.push_str(&event.to_ics(self.timezone.as_ref()));
        }
        out.push_str("END:VCALENDAR\n");
        out
    }
}
