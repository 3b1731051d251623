use crate::validation::{ValidationError, require_text};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineKind {
    Exam,
    Homework,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineKind::Exam => "exam",
            TimelineKind::Homework => "homework",
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TimelineKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exam" => Ok(TimelineKind::Exam),
            "homework" => Ok(TimelineKind::Homework),
            _ => Err(ValidationError::InvalidChoice {
                field: "event type",
                expected: "exam, homework",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
}

impl TimelineEvent {
    pub fn new(date: &str, title: &str, kind: TimelineKind) -> Result<Self, ValidationError> {
        Ok(Self {
            date: require_text("date", date)?,
            title: require_text("title", title)?,
            kind,
        })
    }
}

/// Append-only event list, newest first. Lives in session state only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TimelineEvent) {
        self.events.insert(0, event);
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
