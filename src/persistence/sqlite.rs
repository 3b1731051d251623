use super::{StoreError, StoreResult, StudentStore, validate_record};
use crate::{Grade, StudentRecord};
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::str::FromStr;

pub struct SqliteStudentStore {
    connection: Mutex<Connection>,
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        StoreError::Unavailable(value.to_string())
    }
}

const SELECT_COLUMNS: &str = "roll_no, name, bangla_marks, english_marks, math_marks, \
     science_marks, total_marks, grade";

impl SqliteStudentStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        // `id` only records insertion order; `roll_no` is the key callers use.
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                roll_no INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                bangla_marks INTEGER NOT NULL,
                english_marks INTEGER NOT NULL,
                math_marks INTEGER NOT NULL,
                science_marks INTEGER NOT NULL,
                total_marks INTEGER NOT NULL,
                grade TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(StudentRecord, String)> {
        let grade_text: String = row.get(7)?;
        let record = StudentRecord {
            roll_no: row.get(0)?,
            name: row.get(1)?,
            bangla_marks: row.get(2)?,
            english_marks: row.get(3)?,
            math_marks: row.get(4)?,
            science_marks: row.get(5)?,
            total_marks: row.get(6)?,
            grade: Grade::Fail,
        };
        Ok((record, grade_text))
    }

    fn finish_record(
        (mut record, grade_text): (StudentRecord, String),
    ) -> StoreResult<StudentRecord> {
        record.grade = Grade::from_str(&grade_text)
            .map_err(|err| StoreError::InvalidData(format!("roll {}: {err}", record.roll_no)))?;
        validate_record(&record)?;
        Ok(record)
    }
}

impl StudentStore for SqliteStudentStore {
    fn insert(&self, record: StudentRecord) -> StoreResult<()> {
        let conn = self.connection.lock();
        let result = conn.execute(
            "INSERT INTO students (roll_no, name, bangla_marks, english_marks, math_marks, \
             science_marks, total_marks, grade) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.roll_no,
                record.name,
                record.bangla_marks,
                record.english_marks,
                record.math_marks,
                record.science_marks,
                record.total_marks,
                record.grade.as_str(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::Conflict(record.roll_no))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_by_roll(&self, roll_no: i64) -> StoreResult<StudentRecord> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM students WHERE roll_no = ?1"
        ))?;
        let row = stmt
            .query_row(params![roll_no], Self::record_from_row)
            .optional()?;
        match row {
            Some(row) => Self::finish_record(row),
            None => Err(StoreError::NotFound(roll_no)),
        }
    }

    fn list_all(&self) -> StoreResult<Vec<StudentRecord>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM students ORDER BY id ASC"
        ))?;
        let rows = stmt.query_map([], Self::record_from_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(Self::finish_record(row?)?);
        }
        Ok(records)
    }

    fn delete_by_roll(&self, roll_no: i64) -> StoreResult<()> {
        let conn = self.connection.lock();
        let removed = conn.execute("DELETE FROM students WHERE roll_no = ?1", params![roll_no])?;
        if removed == 0 {
            return Err(StoreError::NotFound(roll_no));
        }
        Ok(())
    }
}
