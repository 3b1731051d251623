use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Dashboard, DashboardError, DashboardOverview, LeaderboardEntry, SessionState, StudentForm,
    StudentListing, StudentRecord, TimelineEvent, TimelineKind, parse_roll,
};

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Dashboard>,
    session: Arc<RwLock<SessionState>>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            session: Arc::new(RwLock::new(SessionState::new())),
        }
    }

    pub fn with_shared(dashboard: Arc<Dashboard>, session: Arc<RwLock<SessionState>>) -> Self {
        Self { dashboard, session }
    }

    fn dashboard(&self) -> Arc<Dashboard> {
        self.dashboard.clone()
    }

    fn session(&self) -> Arc<RwLock<SessionState>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(value: DashboardError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
            DashboardError::InvalidCredentials | DashboardError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::Conflict(_) => StatusCode::CONFLICT,
            DashboardError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::InvalidData(_) | DashboardError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(ErrorBody {
            error: self.0.code(),
            message: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    n: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RollQuery {
    #[serde(default)]
    roll: String,
}

#[derive(Debug, Deserialize)]
struct TimelinePayload {
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "type")]
    kind: TimelineKind,
}

#[derive(Debug, Serialize)]
struct RankBody {
    roll_no: i64,
    rank: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/teacher_dashboard", get(teacher_dashboard))
        .route("/students", get(list_students).post(add_student))
        .route("/students/:roll", delete(delete_student))
        .route("/students/:roll/rank", get(student_rank))
        .route("/leaderboard", get(leaderboard))
        .route("/export", get(export_csv))
        .route("/timeline", get(list_timeline).post(add_timeline_event))
        .route("/student", get(student_page))
        .route("/student_result", get(student_result))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, dashboard: Dashboard) -> std::io::Result<()> {
    let state = AppState::new(dashboard);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn index() -> impl IntoResponse {
    Json(json!({
        "title": "Student Result Management",
        "pages": {
            "teacher_login": "/login",
            "teacher_dashboard": "/teacher_dashboard",
            "student": "/student",
            "student_result": "/student_result",
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session();
    {
        let mut guard = session.write();
        state
            .dashboard()
            .login(&mut guard, &payload.username, &payload.password)?;
    }
    Ok(Json(json!({ "logged_in": true })))
}

async fn logout(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session = state.session();
    {
        let mut guard = session.write();
        state.dashboard().logout(&mut guard);
    }
    Json(json!({ "logged_in": false }))
}

async fn teacher_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardOverview>, ApiError> {
    let session = state.session();
    let overview = {
        let guard = session.read();
        state.dashboard().overview(&guard)?
    };
    Ok(Json(overview))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<StudentListing>, ApiError> {
    let session = state.session();
    let listing = {
        let guard = session.read();
        state.dashboard().student_listing(&guard)?
    };
    Ok(Json(listing))
}

async fn add_student(
    State(state): State<AppState>,
    Json(form): Json<StudentForm>,
) -> Result<(StatusCode, Json<StudentRecord>), ApiError> {
    let session = state.session();
    let created = {
        let guard = session.read();
        state.dashboard().add_student(&guard, &form)?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_student(
    State(state): State<AppState>,
    Path(roll): Path<String>,
) -> Result<StatusCode, ApiError> {
    let roll_no = parse_roll(&roll).map_err(DashboardError::from)?;
    let session = state.session();
    {
        let guard = session.read();
        state.dashboard().delete_student(&guard, roll_no)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn student_rank(
    State(state): State<AppState>,
    Path(roll): Path<String>,
) -> Result<Json<RankBody>, ApiError> {
    let roll_no = parse_roll(&roll).map_err(DashboardError::from)?;
    let session = state.session();
    let rank = {
        let guard = session.read();
        state.dashboard().rank(&guard, roll_no)?
    };
    Ok(Json(RankBody { roll_no, rank }))
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let session = state.session();
    let entries = {
        let guard = session.read();
        state.dashboard().leaderboard(&guard, query.n)?
    };
    Ok(Json(entries))
}

async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session();
    let mut buffer = Vec::new();
    {
        let guard = session.read();
        state.dashboard().export_csv(&guard, &mut buffer)?;
    }
    let filename = format!(
        "attachment; filename=\"students-{}.csv\"",
        chrono::Local::now().format("%Y%m%d")
    );
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, filename),
    ];
    Ok((StatusCode::OK, headers, buffer).into_response())
}

async fn list_timeline(
    State(state): State<AppState>,
) -> Result<Json<Vec<TimelineEvent>>, ApiError> {
    let session = state.session();
    let events = {
        let guard = session.read();
        state.dashboard().timeline(&guard)?.to_vec()
    };
    Ok(Json(events))
}

async fn add_timeline_event(
    State(state): State<AppState>,
    Json(payload): Json<TimelinePayload>,
) -> Result<(StatusCode, Json<TimelineEvent>), ApiError> {
    let session = state.session();
    let event = {
        let mut guard = session.write();
        state
            .dashboard()
            .add_timeline_event(&mut guard, payload.kind, &payload.date, &payload.title)?
    };
    Ok((StatusCode::CREATED, Json(event)))
}

async fn student_page() -> impl IntoResponse {
    Json(json!({
        "title": "Check Your Result",
        "lookup": "/student_result?roll=<roll number>",
    }))
}

async fn student_result(
    State(state): State<AppState>,
    Query(query): Query<RollQuery>,
) -> Result<Json<StudentRecord>, ApiError> {
    let record = state.dashboard().search_result(&query.roll)?;
    Ok(Json(record))
}
