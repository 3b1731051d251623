pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod grade;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod ranking;
pub mod student;
pub mod timeline;
pub mod validation;

pub use auth::{AuthSession, Credentials, authenticate};
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, DashboardOverview, SessionState, StudentListing};
pub use error::{DashboardError, DashboardResult};
pub use grade::{Grade, compute_grade, compute_total};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStudentStore;
pub use persistence::{
    ExportError, MemoryStudentStore, StoreError, StoreResult, StudentStore, export_students_csv,
    write_students_csv,
};
pub use ranking::{
    LeaderboardEntry, grade_distribution, leaderboard, rank_of, subject_averages, top_n,
};
pub use student::{StudentRecord, Subject, SubjectMarks};
pub use timeline::{Timeline, TimelineEvent, TimelineKind};
pub use validation::{StudentForm, ValidationError, parse_roll};

/// Installs the `tracing` subscriber used by the binaries. `RUST_LOG` wins
/// over the default `result_dashboard=info` directive.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("result_dashboard=info"));
    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
