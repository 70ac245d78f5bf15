use std::{
    collections::BTreeMap,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use plot_protocol::{ErrorResponse, FeatureCollection, PlotRecord, UpdatePlotResponse};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod db;
pub mod seed;

pub const UPDATE_MESSAGE: &str = "Plot updated successfully!";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub db_path: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub seed_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            db_path: PathBuf::from("plothub.db"),
            static_dir: Some(PathBuf::from("web-dist")),
            seed_dir: None,
        }
    }
}

/// Shared handler state. The single connection lock is what serializes
/// concurrent plot edits.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    fields: BTreeMap<String, Vec<String>>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    fn unprocessable(fields: FieldErrors) -> Self {
        let message = fields
            .0
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "the given data was invalid".to_string());
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message,
            fields: fields.0,
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                errors: self.fields,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Default)]
struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, format!("The {} field is required.", label(field)));
        }
        value
    }

    /// Required integer; numeric strings such as `"1"` are accepted.
    fn integer(&mut self, field: &str, value: Option<Value>) -> Option<i64> {
        let value = self.required(field, value.filter(|value| !is_blank(value)))?;
        let parsed = match &value {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.add(field, format!("The {} field must be an integer.", label(field)));
        }
        parsed
    }

    /// Required string holding syntactically valid JSON. Any JSON value passes.
    fn json(&mut self, field: &str, value: Option<Value>) -> Option<String> {
        let value = self.required(field, value.filter(|value| !is_blank(value)))?;
        match value {
            Value::String(text) if serde_json::from_str::<Value>(&text).is_ok() => Some(text),
            _ => {
                self.add(
                    field,
                    format!("The {} field must be a valid JSON string.", label(field)),
                );
                None
            }
        }
    }

    fn finish<T>(self, values: Option<T>) -> Result<T, ApiError> {
        match values {
            Some(values) if self.0.is_empty() => Ok(values),
            _ => Err(ApiError::unprocessable(self)),
        }
    }
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Create body as received. Fields stay untyped until `FieldErrors` checks
/// them, so a wrongly typed field gets a field message instead of a
/// rejection of the whole body.
#[derive(Debug, Deserialize)]
struct StorePlotForm {
    section_id: Option<Value>,
    geometry: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct UpdatePlotForm {
    plot_id: Option<Value>,
    geometry: Option<Value>,
}

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(healthz))
        .route("/plots/geojson", get(plots_geojson))
        .route("/plots/plots", post(store_plot))
        .route("/plots/update", put(update_plot))
        .route("/plots/plots/update", put(update_plot));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = db::open_database(&config.db_path)?;
    if let Some(dir) = &config.seed_dir {
        let report = seed::seed_from_dir(&mut conn, dir)?;
        tracing::info!(?report, dir = %dir.display(), "seed import finished");
    }

    let app = build_router(AppState::new(conn), config.static_dir.as_deref());

    let addr: SocketAddr = config.bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "plothub listening");
    serve(listener, app).await?;
    Ok(())
}

pub async fn serve(listener: tokio::net::TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app).await
}

async fn healthz() -> &'static str {
    "ok"
}

async fn plots_geojson(
    State(state): State<AppState>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let db = state.db.lock().await;
    let rows = db::list_plots_with_section(&db)
        .map_err(|e| ApiError::internal(format!("failed to query plots: {e}")))?;

    Ok(Json(FeatureCollection::new(
        rows.into_iter().map(db::PlotRow::into_feature).collect(),
    )))
}

async fn store_plot(
    State(state): State<AppState>,
    payload: Result<Json<StorePlotForm>, JsonRejection>,
) -> Result<(StatusCode, Json<PlotRecord>), ApiError> {
    let Json(payload) = payload?;
    let mut fields = FieldErrors::default();
    let section_id = fields.integer("section_id", payload.section_id);
    let geometry = fields.json("geometry", payload.geometry);
    let (section_id, geometry) = fields.finish(section_id.zip(geometry))?;

    let db = state.db.lock().await;
    let known_section = db::section_exists(&db, section_id)
        .map_err(|e| ApiError::internal(format!("failed to query section: {e}")))?;
    if !known_section {
        let mut fields = FieldErrors::default();
        fields.add("section_id", "The selected section id is invalid.");
        return Err(ApiError::unprocessable(fields));
    }

    let plot_id = db::insert_plot(&db, section_id, &geometry)
        .map_err(|e| ApiError::internal(format!("failed to create plot: {e}")))?;
    let plot = db::find_plot(&db, plot_id)
        .map_err(|e| ApiError::internal(format!("failed to load plot: {e}")))?
        .ok_or_else(|| ApiError::internal(format!("plot {plot_id} vanished after insert")))?;

    tracing::info!(plot_id, section_id, "plot created");
    Ok((StatusCode::CREATED, Json(plot)))
}

async fn update_plot(
    State(state): State<AppState>,
    payload: Result<Json<UpdatePlotForm>, JsonRejection>,
) -> Result<Json<UpdatePlotResponse>, ApiError> {
    let Json(payload) = payload?;
    let mut fields = FieldErrors::default();
    let plot_id = fields.integer("plot_id", payload.plot_id);
    let geometry = fields.json("geometry", payload.geometry);
    let (plot_id, geometry) = fields.finish(plot_id.zip(geometry))?;

    let db = state.db.lock().await;
    let updated = db::update_plot_geometry(&db, plot_id, &geometry)
        .map_err(|e| ApiError::internal(format!("failed to update plot: {e}")))?;
    if !updated {
        return Err(ApiError::not_found(format!("plot {plot_id} not found")));
    }

    let plot = db::find_plot(&db, plot_id)
        .map_err(|e| ApiError::internal(format!("failed to load plot: {e}")))?
        .ok_or_else(|| ApiError::not_found(format!("plot {plot_id} not found")))?;

    tracing::info!(plot_id, "plot geometry updated");
    Ok(Json(UpdatePlotResponse {
        message: UPDATE_MESSAGE.to_string(),
        plot,
    }))
}
