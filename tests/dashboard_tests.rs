use result_dashboard::{
    Credentials, Dashboard, DashboardError, Grade, MemoryStudentStore, SessionState,
    StoreError, StoreResult, StudentForm, StudentRecord, StudentStore, Subject, TimelineKind,
};

fn form(roll: &str, name: &str, marks: [&str; 4]) -> StudentForm {
    StudentForm {
        name: name.to_string(),
        roll_no: roll.to_string(),
        bangla: marks[0].to_string(),
        english: marks[1].to_string(),
        math: marks[2].to_string(),
        science: marks[3].to_string(),
    }
}

fn dashboard() -> Dashboard {
    Dashboard::new(MemoryStudentStore::new(), Credentials::default())
}

fn teacher_session(dashboard: &Dashboard) -> SessionState {
    let mut session = SessionState::new();
    dashboard.login(&mut session, "talha", "258090").unwrap();
    session
}

/// Store whose backend is never reachable.
struct OfflineStore;

impl StudentStore for OfflineStore {
    fn insert(&self, _record: StudentRecord) -> StoreResult<()> {
        Err(StoreError::Unavailable("database is locked".into()))
    }

    fn find_by_roll(&self, _roll_no: i64) -> StoreResult<StudentRecord> {
        Err(StoreError::Unavailable("database is locked".into()))
    }

    fn list_all(&self) -> StoreResult<Vec<StudentRecord>> {
        Err(StoreError::Unavailable("database is locked".into()))
    }

    fn delete_by_roll(&self, _roll_no: i64) -> StoreResult<()> {
        Err(StoreError::Unavailable("database is locked".into()))
    }
}

/// Store that is reachable but holds a row whose grade disagrees with its marks.
struct CorruptStore;

impl StudentStore for CorruptStore {
    fn insert(&self, record: StudentRecord) -> StoreResult<()> {
        Err(StoreError::Conflict(record.roll_no))
    }

    fn find_by_roll(&self, roll_no: i64) -> StoreResult<StudentRecord> {
        Err(StoreError::NotFound(roll_no))
    }

    fn list_all(&self) -> StoreResult<Vec<StudentRecord>> {
        Err(StoreError::InvalidData(
            "roll 1: stored total or grade does not match marks".into(),
        ))
    }

    fn delete_by_roll(&self, roll_no: i64) -> StoreResult<()> {
        Err(StoreError::NotFound(roll_no))
    }
}

#[test]
fn ranking_and_grades_follow_insertion_order_on_ties() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);

    dashboard
        .add_student(&session, &form("1", "Rahim", ["90", "90", "85", "85"]))
        .unwrap();
    dashboard
        .add_student(&session, &form("2", "Karim", ["60", "60", "65", "65"]))
        .unwrap();
    dashboard
        .add_student(&session, &form("3", "Nadia", ["85", "85", "90", "90"]))
        .unwrap();

    let top: Vec<i64> = dashboard
        .top_performers(&session, Some(2))
        .unwrap()
        .iter()
        .map(|r| r.roll_no)
        .collect();
    assert_eq!(top, vec![1, 3]);

    let listing = dashboard.student_listing(&session).unwrap();
    assert!(listing.store_available);
    let grades: Vec<Grade> = listing.students.iter().map(|r| r.grade).collect();
    assert_eq!(grades, vec![Grade::APlus, Grade::B, Grade::APlus]);

    assert_eq!(dashboard.rank(&session, 3).unwrap(), 2);
    assert_eq!(dashboard.rank(&session, 2).unwrap(), 3);
    assert!(matches!(
        dashboard.rank(&session, 7),
        Err(DashboardError::NotFound(7))
    ));
}

#[test]
fn invalid_form_writes_nothing() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);

    let err = dashboard
        .add_student(&session, &form("4", "Bad", ["80", "x", "70", "70"]))
        .unwrap_err();
    assert!(matches!(err, DashboardError::Validation(_)));
    assert_eq!(err.code(), "invalid_request");
    assert!(dashboard.student_listing(&session).unwrap().students.is_empty());
}

#[test]
fn duplicate_roll_is_a_conflict() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);
    dashboard
        .add_student(&session, &form("1", "Rahim", ["50", "50", "50", "50"]))
        .unwrap();
    let err = dashboard
        .add_student(&session, &form("1", "Other", ["99", "99", "99", "99"]))
        .unwrap_err();
    assert!(matches!(err, DashboardError::Conflict(1)));
    let students = dashboard.student_listing(&session).unwrap().students;
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].name, "Rahim");
}

#[test]
fn delete_miss_reports_not_found_and_keeps_records() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);
    dashboard
        .add_student(&session, &form("1", "Rahim", ["50", "50", "50", "50"]))
        .unwrap();
    let before = dashboard.student_listing(&session).unwrap();

    assert!(matches!(
        dashboard.delete_student(&session, 42),
        Err(DashboardError::NotFound(42))
    ));
    assert_eq!(dashboard.student_listing(&session).unwrap(), before);

    dashboard.delete_student(&session, 1).unwrap();
    assert!(dashboard.student_listing(&session).unwrap().students.is_empty());
}

#[test]
fn teacher_commands_require_login() {
    let dashboard = dashboard();
    let mut session = SessionState::new();

    assert!(matches!(
        dashboard.add_student(&session, &form("1", "A", ["1", "1", "1", "1"])),
        Err(DashboardError::Unauthorized)
    ));
    assert!(matches!(
        dashboard.student_listing(&session),
        Err(DashboardError::Unauthorized)
    ));
    assert!(matches!(
        dashboard.login(&mut session, "talha", "nope"),
        Err(DashboardError::InvalidCredentials)
    ));
    assert!(!session.auth.is_logged_in());

    dashboard.login(&mut session, " talha ", " 258090 ").unwrap();
    assert!(dashboard.student_listing(&session).is_ok());

    dashboard.logout(&mut session);
    assert!(matches!(
        dashboard.overview(&session),
        Err(DashboardError::Unauthorized)
    ));
}

#[test]
fn student_search_is_public_and_validates_roll() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);
    dashboard
        .add_student(&session, &form("11", "Rahim", ["80", "70", "60", "50"]))
        .unwrap();

    let record = dashboard.search_result(" 11 ").unwrap();
    assert_eq!(record.name, "Rahim");
    assert_eq!(record.total_marks, 260);
    assert_eq!(record.grade, Grade::B);

    assert!(matches!(
        dashboard.search_result("12"),
        Err(DashboardError::NotFound(12))
    ));
    assert!(matches!(
        dashboard.search_result("eleven"),
        Err(DashboardError::Validation(_))
    ));
}

#[test]
fn overview_collects_dashboard_views() {
    let dashboard = dashboard().with_limits(2, 10);
    let mut session = teacher_session(&dashboard);
    for (roll, marks) in [
        ("1", ["90", "90", "90", "90"]),
        ("2", ["50", "50", "50", "50"]),
        ("3", ["70", "70", "70", "70"]),
    ] {
        dashboard
            .add_student(&session, &form(roll, "S", marks))
            .unwrap();
    }
    dashboard
        .add_timeline_event(&mut session, TimelineKind::Exam, "2025-05-01", "Finals")
        .unwrap();

    let overview = dashboard.overview(&session).unwrap();
    assert_eq!(overview.top_performers.len(), 2);
    assert_eq!(overview.top_performers[0].roll_no, 1);
    assert_eq!(overview.top_performers[1].roll_no, 3);
    assert_eq!(overview.grade_distribution[&Grade::APlus], 1);
    assert_eq!(overview.grade_distribution[&Grade::A], 1);
    assert_eq!(overview.grade_distribution[&Grade::C], 1);
    assert_eq!(overview.subject_averages[&Subject::Math], 70);
    assert_eq!(overview.students.len(), 3);
    assert!(overview.store_available);
    assert_eq!(overview.timeline.len(), 1);
    assert_eq!(overview.timeline[0].title, "Finals");
}

#[test]
fn leaderboard_defaults_to_configured_size() {
    let dashboard = dashboard().with_limits(3, 2);
    let session = teacher_session(&dashboard);
    for roll in 1..=4 {
        let mark = (50 + roll * 10).to_string();
        let mark = mark.as_str();
        dashboard
            .add_student(&session, &form(&roll.to_string(), "S", [mark; 4]))
            .unwrap();
    }
    let board = dashboard.leaderboard(&session, None).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].roll_no, 4);
    assert_eq!(board[0].average, 90);
    assert_eq!(dashboard.leaderboard(&session, Some(10)).unwrap().len(), 4);
}

#[test]
fn unreachable_store_reads_as_empty_but_writes_fail() {
    let dashboard = Dashboard::new(OfflineStore, Credentials::default());
    let session = teacher_session(&dashboard);

    let listing = dashboard.student_listing(&session).unwrap();
    assert!(listing.students.is_empty());
    assert!(!listing.store_available);
    assert!(dashboard.top_performers(&session, None).unwrap().is_empty());
    let averages = dashboard.subject_averages(&session).unwrap();
    assert!(averages.values().all(|avg| *avg == 0));
    assert!(!dashboard.overview(&session).unwrap().store_available);
    assert!(matches!(
        dashboard.search_result("1"),
        Err(DashboardError::NotFound(1))
    ));

    let err = dashboard
        .add_student(&session, &form("1", "A", ["1", "1", "1", "1"]))
        .unwrap_err();
    assert!(matches!(err, DashboardError::StoreUnavailable(_)));
    assert!(matches!(
        dashboard.delete_student(&session, 1),
        Err(DashboardError::StoreUnavailable(_))
    ));
    assert!(matches!(
        dashboard.export_csv(&session, Vec::new()),
        Err(DashboardError::StoreUnavailable(_))
    ));
}

#[test]
fn export_requires_login_and_counts_rows() {
    let dashboard = dashboard();
    let session = teacher_session(&dashboard);
    dashboard
        .add_student(&session, &form("1", "A", ["80", "80", "80", "80"]))
        .unwrap();

    let mut buffer = Vec::new();
    assert_eq!(dashboard.export_csv(&session, &mut buffer).unwrap(), 1);
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.ends_with("1,A,80,80,80,80,320,A+\n"));

    assert!(matches!(
        dashboard.export_csv(&SessionState::new(), Vec::new()),
        Err(DashboardError::Unauthorized)
    ));
}

#[test]
fn corrupt_rows_are_reported_instead_of_hidden() {
    let dashboard = Dashboard::new(CorruptStore, Credentials::default());
    let session = teacher_session(&dashboard);

    assert!(matches!(
        dashboard.student_listing(&session),
        Err(DashboardError::InvalidData(_))
    ));
    assert!(matches!(
        dashboard.overview(&session),
        Err(DashboardError::InvalidData(_))
    ));
    assert!(matches!(
        dashboard.top_performers(&session, None),
        Err(DashboardError::InvalidData(_))
    ));
    assert!(matches!(
        dashboard.grade_distribution(&session),
        Err(DashboardError::InvalidData(_))
    ));
}
