//! HTTP API server for the recycling guide

pub mod error;
pub mod health;
pub mod recycle;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::{AudioMode, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use crate::pipeline::RecyclePipeline;
use crate::{Config, Result};

pub use error::ApiError;

/// Shared state for API handlers
pub struct ApiState {
    pub pipeline: RecyclePipeline,
    pub audio_mode: AudioMode,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    pipeline: RecyclePipeline,
    audio_mode: AudioMode,
    port: u16,
    static_dir: Option<PathBuf>,
    max_upload_bytes: usize,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(pipeline: RecyclePipeline) -> Self {
        Self {
            pipeline,
            audio_mode: AudioMode::default(),
            port: DEFAULT_PORT,
            static_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Create a builder with the production pipeline and server settings
    ///
    /// # Errors
    ///
    /// Returns error if a configured API key is empty
    pub fn from_config(config: &Config) -> Result<Self> {
        let pipeline = RecyclePipeline::from_config(config)?;
        Ok(Self::new(pipeline)
            .audio_mode(config.audio_mode)
            .port(config.server.port)
            .static_dir(Some(config.server.static_dir.clone()))
            .max_upload_bytes(config.server.max_upload_bytes))
    }

    /// Set where audio is generated
    #[must_use]
    pub const fn audio_mode(mut self, mode: AudioMode) -> Self {
        self.audio_mode = mode;
        self
    }

    /// Set the listen port
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the static files directory for serving the web UI
    #[must_use]
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Set the request body limit
    #[must_use]
    pub const fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        let state = Arc::new(ApiState {
            pipeline: self.pipeline,
            audio_mode: self.audio_mode,
        });

        ApiServer {
            state,
            port: self.port,
            static_dir: self.static_dir,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
    max_upload_bytes: usize,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .merge(recycle::router(self.state.clone()))
            .merge(health::router())
            .merge(health::status_router(self.state.clone()));

        // Serve the landing page and assets if configured
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            router = router
                .route_service("/", ServeFile::new(&index_file))
                .nest_service("/static", ServeDir::new(static_dir));
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router
            .layer(DefaultBodyLimit::max(self.max_upload_bytes))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(
            port = self.port,
            mode = %self.state.audio_mode,
            summary = %self.state.pipeline.summary_kind(),
            "API server listening"
        );

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
