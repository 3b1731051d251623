use crate::StudentRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct StudentCsvRecord<'a> {
    roll_no: i64,
    name: &'a str,
    bangla: i32,
    english: i32,
    math: i32,
    science: i32,
    total: i64,
    grade: &'static str,
}

impl<'a> From<&'a StudentRecord> for StudentCsvRecord<'a> {
    fn from(record: &'a StudentRecord) -> Self {
        Self {
            roll_no: record.roll_no,
            name: &record.name,
            bangla: record.bangla_marks,
            english: record.english_marks,
            math: record.math_marks,
            science: record.science_marks,
            total: record.total_marks,
            grade: record.grade.as_str(),
        }
    }
}

pub const CSV_HEADER: [&str; 8] = [
    "Roll No", "Name", "Bangla", "English", "Math", "Science", "Total", "Grade",
];

/// Writes the header and one row per record, in the order given.
pub fn write_students_csv<W: Write>(
    records: &[StudentRecord],
    writer: W,
) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    // Written explicitly so an empty export still carries the header row.
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(StudentCsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_students_csv<P: AsRef<Path>>(
    records: &[StudentRecord],
    path: P,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_students_csv(records, file)
}
