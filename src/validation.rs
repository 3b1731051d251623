use crate::student::{StudentRecord, SubjectMarks};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a whole number (got '{value}')")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be one of {expected} (got '{value}')")]
    InvalidChoice {
        field: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Raw "add student" form as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub roll_no: String,
    #[serde(default)]
    pub bangla: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub math: String,
    #[serde(default)]
    pub science: String,
}

impl StudentForm {
    /// Parses every field up front so a bad value rejects the whole form.
    pub fn parse(&self) -> Result<StudentRecord, ValidationError> {
        let bangla = parse_field::<i32>("bangla marks", &self.bangla)?;
        let english = parse_field::<i32>("english marks", &self.english)?;
        let math = parse_field::<i32>("math marks", &self.math)?;
        let science = parse_field::<i32>("science marks", &self.science)?;
        let roll_no = parse_roll(&self.roll_no)?;
        Ok(StudentRecord::new(
            roll_no,
            self.name.trim(),
            SubjectMarks::new(bangla, english, math, science),
        ))
    }
}

pub fn parse_roll(raw: &str) -> Result<i64, ValidationError> {
    parse_field::<i64>("roll number", raw)
}

fn parse_field<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

pub(crate) fn require_text(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(trimmed.to_string())
}
