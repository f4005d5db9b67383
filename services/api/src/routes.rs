use crate::infra::{
    default_profile, deserialize_date, deserialize_optional_date, AppState, DashboardState,
    PersonalAttendanceView,
};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use continuum::error::AppError;
use continuum::workflows::assistant::{AssistantQuestion, AssistantReply, ChatCompletion, Page};
use continuum::workflows::attendance::report::{
    AttendanceReportView, ReportOptions, SummaryRowView, VisualizationView,
};
use continuum::workflows::attendance::{
    DailyAttendance, EmployeeQueryResult, EmployeeSummary, ReportFilter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    pub(crate) project: Option<String>,
    #[serde(default)]
    pub(crate) employee: Option<String>,
    #[serde(default)]
    pub(crate) month: Option<String>,
}

impl ReportQuery {
    fn to_filter(&self) -> Result<ReportFilter, AppError> {
        ReportFilter::from_labels(
            self.project.as_deref(),
            self.employee.as_deref(),
            self.month.as_deref(),
        )
        .map_err(AppError::from)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WindowQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) end: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogAttendanceRequest {
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
    pub(crate) hours_worked: u32,
    #[serde(default)]
    pub(crate) time_off: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogAttendanceResponse {
    pub(crate) message: String,
    pub(crate) logged: DailyAttendance,
}

#[derive(Debug, Serialize)]
pub(crate) struct PageView {
    pub(crate) page: Page,
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
}

pub(crate) fn dashboard_router<C>(state: DashboardState<C>) -> Router
where
    C: ChatCompletion + 'static,
{
    Router::new()
        .route("/api/v1/login", post(login_endpoint::<C>))
        .route("/api/v1/attendance/summary", get(summary_endpoint::<C>))
        .route("/api/v1/attendance/options", get(options_endpoint::<C>))
        .route("/api/v1/attendance/report", get(report_endpoint::<C>))
        .route(
            "/api/v1/attendance/visualization",
            get(visualization_endpoint::<C>),
        )
        .route("/api/v1/employees", get(employees_endpoint::<C>))
        .route("/api/v1/employees/:name", get(employee_endpoint::<C>))
        .route("/api/v1/assistant/ask", post(ask_endpoint::<C>))
        .route("/api/v1/pages/:page", get(page_endpoint))
        .route(
            "/api/v1/me/attendance",
            get(personal_attendance_endpoint::<C>).post(log_attendance_endpoint::<C>),
        )
        .with_state(state)
}

pub(crate) fn with_dashboard_routes<C>(state: DashboardState<C>) -> Router
where
    C: ChatCompletion + 'static,
{
    dashboard_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn login_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError>
where
    C: ChatCompletion + 'static,
{
    if state
        .credentials
        .verify(&request.username, &request.password)
    {
        info!(username = %request.username, "login accepted");
        Ok(Json(json!({ "status": "authenticated" })))
    } else {
        warn!(username = %request.username, "login rejected");
        Err(AppError::Unauthorized)
    }
}

pub(crate) async fn summary_endpoint<C>(
    State(state): State<DashboardState<C>>,
) -> Json<Vec<SummaryRowView>>
where
    C: ChatCompletion + 'static,
{
    let rows = state
        .dataset
        .summary()
        .rows()
        .iter()
        .map(EmployeeSummary::to_view)
        .collect();
    Json(rows)
}

pub(crate) async fn options_endpoint<C>(
    State(state): State<DashboardState<C>>,
) -> Json<ReportOptions>
where
    C: ChatCompletion + 'static,
{
    Json(state.dataset.report_options())
}

pub(crate) async fn report_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<AttendanceReportView>, AppError>
where
    C: ChatCompletion + 'static,
{
    let filter = query.to_filter()?;
    Ok(Json(state.dataset.report(&filter)))
}

pub(crate) async fn visualization_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<VisualizationView>, AppError>
where
    C: ChatCompletion + 'static,
{
    let filter = query.to_filter()?;
    Ok(Json(state.dataset.visualization(&filter)))
}

pub(crate) async fn employees_endpoint<C>(
    State(state): State<DashboardState<C>>,
) -> Json<Vec<String>>
where
    C: ChatCompletion + 'static,
{
    let names = state
        .dataset
        .chat_employees()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(names)
}

pub(crate) async fn employee_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Json<EmployeeQueryResult>
where
    C: ChatCompletion + 'static,
{
    Json(state.dataset.query_employee(&name, window.start, window.end))
}

pub(crate) async fn ask_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Json(question): Json<AssistantQuestion>,
) -> Result<Json<AssistantReply>, AppError>
where
    C: ChatCompletion + 'static,
{
    let reply = state.assistant.ask(&question).await?;
    Ok(Json(reply))
}

pub(crate) async fn page_endpoint(Path(page): Path<String>) -> Result<Json<PageView>, AppError> {
    let page = Page::parse(&page).ok_or_else(|| AppError::NotFound(format!("page '{page}'")))?;
    Ok(Json(PageView {
        page,
        title: page.label(),
        description: page.description(),
    }))
}

pub(crate) async fn personal_attendance_endpoint<C>(
    State(state): State<DashboardState<C>>,
) -> Json<PersonalAttendanceView>
where
    C: ChatCompletion + 'static,
{
    Json(state.personal_log.view(&default_profile()))
}

pub(crate) async fn log_attendance_endpoint<C>(
    State(state): State<DashboardState<C>>,
    Json(request): Json<LogAttendanceRequest>,
) -> Result<Json<LogAttendanceResponse>, AppError>
where
    C: ChatCompletion + 'static,
{
    let logged = state
        .personal_log
        .record(request.date, request.hours_worked, request.time_off)?;
    Ok(Json(LogAttendanceResponse {
        message: format!("Attendance logged for {}", logged.date),
        logged,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use continuum::auth::StaticCredentials;
    use continuum::workflows::assistant::{Assistant, AssistantError, CompletionRequest};
    use continuum::workflows::attendance::{
        AttendanceDataset, JoinPolicy, RawProjectLogEntry, TimeOffRecord, WorkdaysRecord,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    struct CannedChat(&'static str);

    impl ChatCompletion for CannedChat {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, AssistantError> {
            Ok(self.0.to_string())
        }
    }

    fn state(reply: &'static str) -> DashboardState<CannedChat> {
        let dataset = AttendanceDataset::load(
            vec![TimeOffRecord {
                employee: "Bob".to_string(),
                time_off_days: 3.0,
            }],
            vec![
                WorkdaysRecord {
                    employee: "Bob".to_string(),
                    workdays: 20.0,
                },
                WorkdaysRecord {
                    employee: "Alice".to_string(),
                    workdays: 21.0,
                },
            ],
            vec![
                RawProjectLogEntry::new("Alice", "ProjA", "01/05/2023", 4.0),
                RawProjectLogEntry::new("Bob", "ProjA", "02/10/2023", 6.0),
            ],
            JoinPolicy::Outer,
        )
        .expect("dataset loads");
        let dataset = Arc::new(dataset);
        let assistant = Assistant::new(dataset.clone(), Arc::new(CannedChat(reply)), "stub", 0.7);
        DashboardState::new(
            dataset,
            assistant,
            Arc::new(StaticCredentials::new("Zhalae", "password")),
            2023,
        )
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).expect("json body");
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request builds")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn login_accepts_only_configured_pair() {
        let router = dashboard_router(state("ok"));
        let (status, _) = call(
            router.clone(),
            post_json(
                "/api/v1/login",
                json!({ "username": "Zhalae", "password": "password" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            router,
            post_json(
                "/api/v1/login",
                json!({ "username": "Zhalae", "password": "wrong" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid username or password");
    }

    #[tokio::test]
    async fn report_filters_by_month_label() {
        let router = dashboard_router(state("ok"));
        let (status, body) = call(
            router,
            get_request("/api/v1/attendance/report?project=All&month=February"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rows = body["rows"].as_array().expect("rows array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["employee"], "Bob");
        assert_eq!(rows[0]["hours_worked"], 6.0);
    }

    #[tokio::test]
    async fn report_rejects_unknown_month() {
        let router = dashboard_router(state("ok"));
        let (status, body) =
            call(router, get_request("/api/v1/attendance/report?month=Smarch")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("message").contains("Smarch"));
    }

    #[tokio::test]
    async fn employee_query_uses_window_and_sentinels() {
        let router = dashboard_router(state("ok"));
        let (status, body) = call(
            router,
            get_request("/api/v1/employees/Alice?start=2023-01-01&end=2023-01-31"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_hours"], 4.0);
        assert_eq!(body["coworkers"], json!(["Bob"]));
        assert_eq!(body["time_off"], "N/A");
        assert_eq!(body["workdays"], 21.0);
        assert_eq!(body["window"]["start"], "2023-01-01");
    }

    #[tokio::test]
    async fn ask_returns_reply_and_destination() {
        let router = dashboard_router(state("Sure, here is the visualization."));
        let (status, body) = call(
            router,
            post_json(
                "/api/v1/assistant/ask",
                json!({ "employee": "Alice", "question": "Show charts" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Sure, here is the visualization.");
        assert_eq!(body["navigate_to"], "visualization");
    }

    #[tokio::test]
    async fn ask_requires_a_question() {
        let router = dashboard_router(state("unused"));
        let (status, body) = call(
            router,
            post_json(
                "/api/v1/assistant/ask",
                json!({ "employee": "Alice", "question": "" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please select an employee and enter a question.");
    }

    #[tokio::test]
    async fn personal_log_round_trip() {
        let router = dashboard_router(state("ok"));
        let (status, body) = call(
            router.clone(),
            post_json(
                "/api/v1/me/attendance",
                json!({ "date": "2023-01-02", "hours_worked": 0, "time_off": 8 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Attendance logged for 2023-01-02");

        let (_, body) = call(router.clone(), get_request("/api/v1/me/attendance")).await;
        assert_eq!(body["monthly_summary"][0]["time_off"], 8);
        assert_eq!(body["monthly_summary"][0]["workdays"], 21);

        let (status, _) = call(
            router,
            post_json(
                "/api/v1/me/attendance",
                json!({ "date": "2024-01-02", "hours_worked": 8 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn pages_resolve_by_label() {
        let (status, body) = call(
            dashboard_router(state("ok")),
            get_request("/api/v1/pages/attendance_report"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Attendance Report");

        let error = page_endpoint(Path("settings".to_string()))
            .await
            .err()
            .expect("unknown page rejected");
        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }
}
