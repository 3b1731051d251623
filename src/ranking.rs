use crate::grade::Grade;
use crate::student::{StudentRecord, Subject};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub roll_no: i64,
    pub name: String,
    pub total_marks: i64,
    pub grade: Grade,
    /// `total_marks / 4`, floored.
    pub average: i64,
}

fn sorted_by_total(records: &[StudentRecord]) -> Vec<&StudentRecord> {
    let mut sorted: Vec<&StudentRecord> = records.iter().collect();
    // `sort_by` is stable: equal totals keep their input order.
    sorted.sort_by(|a, b| b.total_marks.cmp(&a.total_marks));
    sorted
}

/// The `n` highest totals, ties kept in input order.
pub fn top_n(records: &[StudentRecord], n: usize) -> Vec<StudentRecord> {
    sorted_by_total(records)
        .into_iter()
        .take(n)
        .cloned()
        .collect()
}

/// 1-based position of `roll_no` in the descending total ordering.
pub fn rank_of(records: &[StudentRecord], roll_no: i64) -> Option<usize> {
    sorted_by_total(records)
        .iter()
        .position(|record| record.roll_no == roll_no)
        .map(|idx| idx + 1)
}

/// Floored per-subject average. An empty slice yields zero for every subject.
pub fn subject_averages(records: &[StudentRecord]) -> BTreeMap<Subject, i64> {
    let mut averages: BTreeMap<Subject, i64> =
        Subject::ALL.into_iter().map(|subject| (subject, 0)).collect();
    if records.is_empty() {
        return averages;
    }
    let count = records.len() as i64;
    for subject in Subject::ALL {
        let sum: i64 = records
            .iter()
            .map(|record| i64::from(record.marks().get(subject)))
            .sum();
        averages.insert(subject, sum.div_euclid(count));
    }
    averages
}

pub fn grade_distribution(records: &[StudentRecord]) -> BTreeMap<Grade, usize> {
    let mut distribution: BTreeMap<Grade, usize> =
        Grade::ALL.into_iter().map(|grade| (grade, 0)).collect();
    for record in records {
        *distribution.entry(record.grade).or_insert(0) += 1;
    }
    distribution
}

pub fn leaderboard(records: &[StudentRecord], n: usize) -> Vec<LeaderboardEntry> {
    sorted_by_total(records)
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(idx, record)| LeaderboardEntry {
            rank: idx + 1,
            roll_no: record.roll_no,
            name: record.name.clone(),
            total_marks: record.total_marks,
            grade: record.grade,
            // Mean mark across the four subjects. May have been meant as a
            // class-wide figure.
            average: record.total_marks.div_euclid(4),
        })
        .collect()
}
