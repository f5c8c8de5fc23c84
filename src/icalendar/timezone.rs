//! A `VTIMEZONE` block. Offsets are plain whole hours, so the default
//! Shanghai timezone renders `+0800`.

use chrono::{NaiveDate, NaiveDateTime};

use super::format::{offset_to_ics, time_to_ics};

#[derive(Debug, Clone)]
pub struct Timezone {
    pub id: String,
    pub offset_from_hours: i64,
    pub offset_to_hours: i64,
    pub start: NaiveDateTime,
    pub name: String,
}

impl Timezone {
    #[must_use]
    pub fn default_shanghai() -> Self {
        Self {
            id: "Asia/Shanghai".to_string(),
            offset_from_hours: 8,
            offset_to_hours: 8,
            start: NaiveDate::from_ymd_opt(1970, 1, 1)
                .expect("valid epoch date")
                .and_hms_opt(0, 0, 0)
                .expect("valid epoch time"),
            name: "Asia/Shanghai".to_string(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn to_ics(&self) -> String {
        format!(
            "BEGIN:VTIMEZONE\nTZID:{}\nBEGIN:STANDARD\nDTSTART{}\nTZOFFSETFROM:{}\nTZOFFSETTO:{}\nTZNAME:{}\nEND:STANDARD\nEND:VTIMEZONE\n",
            self.id,
            time_to_ics(self.start, None, ":"),
            offset_to_ics(self.offset_from_hours),
            offset_to_ics(self.offset_to_hours),
            self.name,
        )
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self::default_shanghai()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shanghai_renders_plus_eight() {
        let tz = Timezone::default_shanghai();
        let rendered = tz.to_ics();
        assert!(rendered.contains("TZOFFSETFROM:+0800"));
        assert!(rendered.contains("TZID:Asia/Shanghai"));
    }
}
