use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Letter grade derived from a student's total marks.
///
/// Variants are declared best first, so ordered maps keyed by `Grade`
/// iterate from `A+` down to `Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "Fail")]
    Fail,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::APlus, Grade::A, Grade::B, Grade::C, Grade::Fail];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::Fail => "Fail",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown grade '{0}'")]
pub struct UnknownGrade(pub String);

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str() == s)
            .ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

/// Sum of the four subject marks. Out-of-range marks are taken as-is.
pub fn compute_total(bangla: i32, english: i32, math: i32, science: i32) -> i64 {
    i64::from(bangla) + i64::from(english) + i64::from(math) + i64::from(science)
}

/// Maps a total to its grade. Thresholds are inclusive on the lower bound.
pub fn compute_grade(total: i64) -> Grade {
    if total >= 320 {
        Grade::APlus
    } else if total >= 280 {
        Grade::A
    } else if total >= 240 {
        Grade::B
    } else if total >= 200 {
        Grade::C
    } else {
        Grade::Fail
    }
}
