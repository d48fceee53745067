//! HTTP request dispatcher
//!
//! Routes:
//! - `GET /` service descriptor
//! - `GET /health` liveness and configured mode
//! - `POST /analyze` score `{"text": ...}`

pub mod handlers;


use crate::analyzer::Analyzer;
use crate::config::{AnalyzerConfig, Settings};
use crate::error::{Result, ServiceError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::OnceCell;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Builds the process analyzer from its configuration
type AnalyzerBuilder = Arc<dyn Fn(&AnalyzerConfig) -> Analyzer + Send + Sync>;

/// Shared by every request. The analyzer is built at most once, either at
/// startup (`preload`) or by the first request that needs it.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    analyzer: Arc<OnceCell<Arc<Analyzer>>>,
    build: AnalyzerBuilder,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self::with_builder(settings, Analyzer::select)
    }

    /// State whose analyzer is produced by `build` on first use
    pub fn with_builder<F>(settings: Settings, build: F) -> Self
    where
        F: Fn(&AnalyzerConfig) -> Analyzer + Send + Sync + 'static,
    {
        Self {
            settings: Arc::new(settings),
            analyzer: Arc::new(OnceCell::new()),
            build: Arc::new(build),
        }
    }

    /// State with an analyzer that is already built
    pub fn with_analyzer(settings: Settings, analyzer: Analyzer) -> Self {
        Self {
            settings: Arc::new(settings),
            analyzer: Arc::new(OnceCell::from(Arc::new(analyzer))),
            build: Arc::new(Analyzer::select),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The process analyzer, constructing it on first use.
    ///
    /// Construction runs in a detached task that owns the state, so a caller
    /// that goes away mid-construction does not release the cell to the next
    /// waiter; every caller awaits the same single build.
    pub async fn analyzer(&self) -> Result<Arc<Analyzer>> {
        if let Some(analyzer) = self.analyzer.get() {
            return Ok(analyzer.clone());
        }

        let state = self.clone();
        tokio::spawn(async move { state.init_analyzer().await })
            .await
            .map_err(|e| ServiceError::Internal(format!("analyzer construction failed: {}", e)))?
    }

    async fn init_analyzer(&self) -> Result<Arc<Analyzer>> {
        self.analyzer
            .get_or_try_init(|| async {
                let config = self.settings.analyzer_config();
                let build = self.build.clone();
                tokio::task::spawn_blocking(move || Arc::new(build(&config)))
                    .await
                    .map_err(|e| {
                        ServiceError::Internal(format!("analyzer construction failed: {}", e))
                    })
            })
            .await
            .cloned()
    }
}

/// Request failure rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = match self.0 {
            ServiceError::InvalidRequest(msg) => msg,
            other => {
                error!(error = %other, "Error analyzing text");
                other.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let bind_addr = settings.bind_addr();
    let state = AppState::new(settings);

    if state.settings().preload {
        let analyzer = state.analyzer().await?;
        info!(model_type = analyzer.model_type(), "Analyzer preloaded");
    }

    let listener = TcpListener::bind(&bind_addr).await.map_err(|e| {
        error!("Failed to bind listener to {}: {}", bind_addr, e);
        anyhow::anyhow!("Failed to bind listener to {}: {}", bind_addr, e)
    })?;

    info!(
        enhanced_model = state.settings().use_enhanced_model,
        "Sentiment service listening on http://{}", bind_addr
    );

    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            anyhow::anyhow!("Server error: {}", e)
        })?;

    info!("Sentiment service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
