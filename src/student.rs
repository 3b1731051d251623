use crate::grade::{Grade, compute_grade, compute_total};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Bangla,
    English,
    Math,
    Science,
}

impl Subject {
    pub const ALL: [Subject; 4] = [
        Subject::Bangla,
        Subject::English,
        Subject::Math,
        Subject::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Bangla => "bangla",
            Subject::English => "english",
            Subject::Math => "math",
            Subject::Science => "science",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubjectMarks {
    pub bangla: i32,
    pub english: i32,
    pub math: i32,
    pub science: i32,
}

impl SubjectMarks {
    pub fn new(bangla: i32, english: i32, math: i32, science: i32) -> Self {
        Self {
            bangla,
            english,
            math,
            science,
        }
    }

    pub fn get(&self, subject: Subject) -> i32 {
        match subject {
            Subject::Bangla => self.bangla,
            Subject::English => self.english,
            Subject::Math => self.math,
            Subject::Science => self.science,
        }
    }

    pub fn total(&self) -> i64 {
        compute_total(self.bangla, self.english, self.math, self.science)
    }
}

/// One persisted student result.
///
/// Total and grade are derived once in [`StudentRecord::new`]; records are
/// never edited in place, only inserted and deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub roll_no: i64,
    pub name: String,
    pub bangla_marks: i32,
    pub english_marks: i32,
    pub math_marks: i32,
    pub science_marks: i32,
    pub total_marks: i64,
    pub grade: Grade,
}

impl StudentRecord {
    pub fn new(roll_no: i64, name: impl Into<String>, marks: SubjectMarks) -> Self {
        let total_marks = marks.total();
        Self {
            roll_no,
            name: name.into(),
            bangla_marks: marks.bangla,
            english_marks: marks.english,
            math_marks: marks.math,
            science_marks: marks.science,
            total_marks,
            grade: compute_grade(total_marks),
        }
    }

    pub fn marks(&self) -> SubjectMarks {
        SubjectMarks::new(
            self.bangla_marks,
            self.english_marks,
            self.math_marks,
            self.science_marks,
        )
    }

    /// True when the stored total and grade agree with the subject marks.
    pub fn is_consistent(&self) -> bool {
        let total = self.marks().total();
        self.total_marks == total && self.grade == compute_grade(total)
    }
}
