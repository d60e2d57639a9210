use axum::{
    Router,
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::config::{ServerConfig, projection_config};
use crate::core::{RawRoiInput, calculate_with};
use crate::error::{ConfigError, StrictInputError, require_strict};
use crate::store::{Scenario, ScenarioStore};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ScenarioStore,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalcOptions {
    strict: bool,
    horizon_months: Option<u32>,
    volume_growth: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SaveScenarioPayload {
    scenario: Scenario,
}

#[derive(Debug, Serialize)]
struct ScenarioResponse {
    scenario: Scenario,
}

#[derive(Debug, Serialize)]
struct ScenarioListResponse {
    scenarios: Vec<Scenario>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Payload { status: StatusCode, message: String },
    #[error(transparent)]
    Strict(#[from] StrictInputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("scenario {0} not found")]
    ScenarioNotFound(Uuid),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Payload { status, .. } => *status,
            ApiError::Strict(_) | ApiError::Config(_) => StatusCode::BAD_REQUEST,
            ApiError::ScenarioNotFound(_) | ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Payload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Payload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Payload {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status != StatusCode::NOT_FOUND {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        error_response(status, &self.to_string())
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/health", get(health_handler))
        .route("/api/calc", get(calc_get_handler).post(calc_post_handler))
        .route(
            "/api/scenarios",
            get(list_scenarios_handler)
                .post(save_scenario_handler)
                .delete(clear_scenarios_handler),
        )
        .route("/api/scenarios/:id", get(get_scenario_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let state = AppState {
        store: ScenarioStore::new(config.history_capacity),
    };
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, history_capacity = config.history_capacity, "ROI HTTP API listening");
    if config.host.is_unspecified() {
        tracing::info!("local access: http://127.0.0.1:{}/", config.port);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

async fn calc_get_handler(
    State(state): State<AppState>,
    options: Result<Query<CalcOptions>, QueryRejection>,
    raw: Result<Query<RawRoiInput>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(options) = options?;
    let Query(raw) = raw?;
    calc_handler_impl(&state, raw, options)
}

async fn calc_post_handler(
    State(state): State<AppState>,
    options: Result<Query<CalcOptions>, QueryRejection>,
    raw: Result<Json<RawRoiInput>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(options) = options?;
    let Json(raw) = raw?;
    calc_handler_impl(&state, raw, options)
}

fn calc_handler_impl(
    state: &AppState,
    raw: RawRoiInput,
    options: CalcOptions,
) -> Result<Response, ApiError> {
    let projection = projection_config(options.horizon_months, options.volume_growth)?;
    let coerced = raw.coerce();
    let input = if options.strict {
        require_strict(coerced)?
    } else {
        let fallbacks = coerced.rejected_fields();
        if !fallbacks.is_empty() {
            tracing::debug!(fields = ?fallbacks, "coerced non-numeric fields to 0");
        }
        coerced.input
    };

    let result = calculate_with(&input, &projection);
    let scenario = state.store.record(input, result);
    tracing::info!(
        id = %scenario.id,
        monthly_savings = scenario.result.monthly_savings,
        roi_percent = scenario.result.roi_percent,
        "calculated scenario"
    );

    Ok(json_response(StatusCode::OK, ScenarioResponse { scenario }))
}

async fn list_scenarios_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        ScenarioListResponse {
            scenarios: state.store.list(),
        },
    )
}

async fn save_scenario_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveScenarioPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let scenario = payload.scenario;
    state.store.insert(scenario.clone());
    tracing::info!(id = %scenario.id, "saved scenario");
    Ok(json_response(
        StatusCode::CREATED,
        ScenarioResponse { scenario },
    ))
}

async fn clear_scenarios_handler(State(state): State<AppState>) -> StatusCode {
    let removed = state.store.clear();
    tracing::info!(removed, "cleared scenario history");
    StatusCode::NO_CONTENT
}

async fn get_scenario_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(id) = id?;
    let scenario = state.store.get(id).ok_or(ApiError::ScenarioNotFound(id))?;
    Ok(json_response(StatusCode::OK, ScenarioResponse { scenario }))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
