use crate::auth::{AuthSession, Credentials};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::grade::Grade;
use crate::persistence::{StoreError, StudentStore, write_students_csv};
use crate::ranking::{self, LeaderboardEntry};
use crate::student::{StudentRecord, Subject};
use crate::timeline::{Timeline, TimelineEvent, TimelineKind};
use crate::validation::{StudentForm, parse_roll};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_PERFORMERS: usize = 3;
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Per-user state owned by the presentation layer and handed to each command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub auth: AuthSession,
    pub timeline: Timeline,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A read of every record. `store_available` is false when the store could not
/// be reached and `students` is an empty stand-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentListing {
    pub students: Vec<StudentRecord>,
    pub store_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub top_performers: Vec<StudentRecord>,
    pub grade_distribution: BTreeMap<Grade, usize>,
    pub subject_averages: BTreeMap<Subject, i64>,
    pub students: Vec<StudentRecord>,
    pub store_available: bool,
    pub timeline: Vec<TimelineEvent>,
}

pub struct Dashboard {
    store: Box<dyn StudentStore>,
    credentials: Credentials,
    top_performers: usize,
    leaderboard_size: usize,
}

impl Dashboard {
    pub fn new(store: impl StudentStore + 'static, credentials: Credentials) -> Self {
        Self {
            store: Box::new(store),
            credentials,
            top_performers: DEFAULT_TOP_PERFORMERS,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }

    pub fn from_config(store: impl StudentStore + 'static, config: &DashboardConfig) -> Self {
        Self::new(store, config.credentials())
            .with_limits(config.top_performers, config.leaderboard_size)
    }

    pub fn with_limits(mut self, top_performers: usize, leaderboard_size: usize) -> Self {
        self.top_performers = top_performers;
        self.leaderboard_size = leaderboard_size;
        self
    }

    pub fn top_performers_limit(&self) -> usize {
        self.top_performers
    }

    pub fn leaderboard_limit(&self) -> usize {
        self.leaderboard_size
    }

    fn require_teacher(session: &SessionState) -> DashboardResult<()> {
        if session.auth.is_logged_in() {
            Ok(())
        } else {
            Err(DashboardError::Unauthorized)
        }
    }

    pub fn login(
        &self,
        session: &mut SessionState,
        username: &str,
        password: &str,
    ) -> DashboardResult<()> {
        if session.auth.login(&self.credentials, username, password) {
            info!(username = username.trim(), "teacher logged in");
            Ok(())
        } else {
            warn!(username = username.trim(), "rejected teacher login");
            Err(DashboardError::InvalidCredentials)
        }
    }

    pub fn logout(&self, session: &mut SessionState) {
        session.auth.logout();
        info!("teacher logged out");
    }

    /// Parses the form, derives total and grade, and writes the record in one
    /// insert. A parse failure writes nothing.
    pub fn add_student(
        &self,
        session: &SessionState,
        form: &StudentForm,
    ) -> DashboardResult<StudentRecord> {
        Self::require_teacher(session)?;
        let record = form.parse()?;
        self.store.insert(record.clone())?;
        info!(
            roll_no = record.roll_no,
            total = record.total_marks,
            grade = %record.grade,
            "student added"
        );
        Ok(record)
    }

    pub fn delete_student(&self, session: &SessionState, roll_no: i64) -> DashboardResult<()> {
        Self::require_teacher(session)?;
        self.store.delete_by_roll(roll_no)?;
        info!(roll_no, "student deleted");
        Ok(())
    }

    /// Only an unreachable store degrades to an empty listing; corrupt rows
    /// are reported.
    fn read_all(&self) -> DashboardResult<StudentListing> {
        match self.store.list_all() {
            Ok(students) => {
                debug!(count = students.len(), "loaded students");
                Ok(StudentListing {
                    students,
                    store_available: true,
                })
            }
            Err(StoreError::Unavailable(message)) => {
                warn!(error = %message, "student store read failed, showing no students");
                Ok(StudentListing {
                    students: Vec::new(),
                    store_available: false,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn student_listing(&self, session: &SessionState) -> DashboardResult<StudentListing> {
        Self::require_teacher(session)?;
        self.read_all()
    }

    /// Public lookup by the raw roll number a student typed.
    pub fn search_result(&self, roll_input: &str) -> DashboardResult<StudentRecord> {
        let roll_no = parse_roll(roll_input)?;
        match self.store.find_by_roll(roll_no) {
            Ok(record) => Ok(record),
            Err(StoreError::Unavailable(message)) => {
                warn!(roll_no, error = %message, "student store read failed during lookup");
                Err(DashboardError::NotFound(roll_no))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn top_performers(
        &self,
        session: &SessionState,
        n: Option<usize>,
    ) -> DashboardResult<Vec<StudentRecord>> {
        Self::require_teacher(session)?;
        let listing = self.read_all()?;
        Ok(ranking::top_n(&listing.students, n.unwrap_or(self.top_performers)))
    }

    pub fn leaderboard(
        &self,
        session: &SessionState,
        n: Option<usize>,
    ) -> DashboardResult<Vec<LeaderboardEntry>> {
        Self::require_teacher(session)?;
        let listing = self.read_all()?;
        Ok(ranking::leaderboard(
            &listing.students,
            n.unwrap_or(self.leaderboard_size),
        ))
    }

    pub fn rank(&self, session: &SessionState, roll_no: i64) -> DashboardResult<usize> {
        Self::require_teacher(session)?;
        let listing = self.read_all()?;
        ranking::rank_of(&listing.students, roll_no).ok_or(DashboardError::NotFound(roll_no))
    }

    pub fn subject_averages(
        &self,
        session: &SessionState,
    ) -> DashboardResult<BTreeMap<Subject, i64>> {
        Self::require_teacher(session)?;
        Ok(ranking::subject_averages(&self.read_all()?.students))
    }

    pub fn grade_distribution(
        &self,
        session: &SessionState,
    ) -> DashboardResult<BTreeMap<Grade, usize>> {
        Self::require_teacher(session)?;
        Ok(ranking::grade_distribution(&self.read_all()?.students))
    }

    /// Everything the teacher dashboard page shows, from a single read.
    pub fn overview(&self, session: &SessionState) -> DashboardResult<DashboardOverview> {
        Self::require_teacher(session)?;
        let listing = self.read_all()?;
        Ok(DashboardOverview {
            top_performers: ranking::top_n(&listing.students, self.top_performers),
            grade_distribution: ranking::grade_distribution(&listing.students),
            subject_averages: ranking::subject_averages(&listing.students),
            students: listing.students,
            store_available: listing.store_available,
            timeline: session.timeline.events().to_vec(),
        })
    }

    /// Writes the CSV export and returns the number of data rows.
    ///
    /// Unlike the on-screen views, an unreachable store is reported instead of
    /// producing an empty file.
    pub fn export_csv<W: Write>(&self, session: &SessionState, writer: W) -> DashboardResult<usize> {
        Self::require_teacher(session)?;
        let records = self.store.list_all()?;
        write_students_csv(&records, writer)?;
        info!(rows = records.len(), "exported students");
        Ok(records.len())
    }

    pub fn add_timeline_event(
        &self,
        session: &mut SessionState,
        kind: TimelineKind,
        date: &str,
        title: &str,
    ) -> DashboardResult<TimelineEvent> {
        Self::require_teacher(session)?;
        let event = TimelineEvent::new(date, title, kind)?;
        session.timeline.push(event.clone());
        info!(kind = %event.kind, date = %event.date, "timeline event added");
        Ok(event)
    }

    pub fn timeline<'a>(&self, session: &'a SessionState) -> DashboardResult<&'a [TimelineEvent]> {
        Self::require_teacher(session)?;
        Ok(session.timeline.events())
    }
}
