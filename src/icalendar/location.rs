//! An event's `LOCATION` field.

#[derive(Debug, Clone, Default)]
pub struct Location {
    pub name: String,
}

impl Location {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn to_ics(&self) -> String {
        format!("LOCATION:{}", self.name)
    }
}
