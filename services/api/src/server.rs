use crate::cli::ServeArgs;
use crate::infra::{AppState, DashboardState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use continuum::auth::StaticCredentials;
use continuum::config::AppConfig;
use continuum::error::AppError;
use continuum::telemetry;
use continuum::workflows::assistant::{Assistant, OpenAiCompatibleClient};
use continuum::workflows::attendance::AttendanceDataset;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let filter_origin = telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = Arc::new(AttendanceDataset::from_paths(
        &config.data.paths,
        config.data.join_policy,
    )?);
    info!(
        employees = dataset.summary().len(),
        log_entries = dataset.project_log().len(),
        join_policy = dataset.join_policy().label(),
        "attendance dataset loaded"
    );

    let client = Arc::new(OpenAiCompatibleClient::new(&config.llm)?);
    let assistant = Assistant::new(
        dataset.clone(),
        client,
        config.llm.model.clone(),
        config.llm.temperature,
    );
    let credentials = Arc::new(StaticCredentials::from_config(&config.auth));
    let dashboard = DashboardState::new(dataset, assistant, credentials, config.attendance_year);

    let app = with_dashboard_routes(dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        llm = %config.llm.base_url,
        ?filter_origin,
        "attendance dashboard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
