use crate::StudentRecord;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("roll number {0} already exists")]
    Conflict(i64),
    #[error("roll number {0} not found")]
    NotFound(i64),
    #[error("student store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence boundary for student records.
///
/// `list_all` returns records in insertion order; ranking relies on it for
/// tie-breaks.
pub trait StudentStore: Send + Sync {
    fn insert(&self, record: StudentRecord) -> StoreResult<()>;
    fn find_by_roll(&self, roll_no: i64) -> StoreResult<StudentRecord>;
    fn list_all(&self) -> StoreResult<Vec<StudentRecord>>;
    fn delete_by_roll(&self, roll_no: i64) -> StoreResult<()>;
}

/// Rejects a loaded record whose total or grade disagrees with its marks.
pub fn validate_record(record: &StudentRecord) -> StoreResult<()> {
    if record.is_consistent() {
        Ok(())
    } else {
        Err(StoreError::InvalidData(format!(
            "roll {} stores total {} / grade {} that do not match its marks",
            record.roll_no, record.total_marks, record.grade
        )))
    }
}

#[derive(Default)]
pub struct MemoryStudentStore {
    records: Mutex<Vec<StudentRecord>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StudentStore for MemoryStudentStore {
    fn insert(&self, record: StudentRecord) -> StoreResult<()> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.roll_no == record.roll_no) {
            return Err(StoreError::Conflict(record.roll_no));
        }
        records.push(record);
        Ok(())
    }

    fn find_by_roll(&self, roll_no: i64) -> StoreResult<StudentRecord> {
        self.records
            .lock()
            .iter()
            .find(|r| r.roll_no == roll_no)
            .cloned()
            .ok_or(StoreError::NotFound(roll_no))
    }

    fn list_all(&self) -> StoreResult<Vec<StudentRecord>> {
        Ok(self.records.lock().clone())
    }

    fn delete_by_roll(&self, roll_no: i64) -> StoreResult<()> {
        let mut records = self.records.lock();
        let idx = records
            .iter()
            .position(|r| r.roll_no == roll_no)
            .ok_or(StoreError::NotFound(roll_no))?;
        records.remove(idx);
        Ok(())
    }
}

pub mod export;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use export::{ExportError, export_students_csv, write_students_csv};
