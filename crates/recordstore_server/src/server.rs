//! HTTP server wiring: router assembly, request logging and process startup.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use log::info;
use recordstore_core::{
    default_log_level, init_logging, initialize_storage, InitError, LoggingError, StorageConfig,
};
use tokio::net::TcpListener;

use crate::config::{Args, ServerConfig};
use crate::routes::{health_routes, record_routes, AppState};

/// HTTP server for the record store
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Builds the server; storage must already be initialized.
    pub fn new(config: ServerConfig, storage: StorageConfig) -> Self {
        let router = Self::build_router(storage);
        Self { config, router }
    }

    fn build_router(storage: StorageConfig) -> Router {
        let state = Arc::new(AppState::new(storage));

        Router::new()
            .merge(health_routes())
            .merge(record_routes(state))
            .layer(middleware::from_fn(log_request))
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the listener and serves until the process is stopped.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        info!(
            "event=server_start module=http status=ok addr={}",
            listener.local_addr()?
        );

        axum::serve(listener, self.router).await
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http method={} path={} code={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}

/// Startup failure of the `recordstore` binary.
#[derive(Debug)]
pub enum ServeError {
    Logging(LoggingError),
    Init(InitError),
    Io(std::io::Error),
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "logging setup failed: {err}"),
            Self::Init(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "server I/O failed: {err}"),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Init(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<LoggingError> for ServeError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<InitError> for ServeError {
    fn from(value: InitError) -> Self {
        Self::Init(value)
    }
}

impl From<std::io::Error> for ServeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Initializes logging and storage from `args`, then serves HTTP.
pub async fn run(args: Args) -> Result<(), ServeError> {
    let cwd = std::env::current_dir()?;
    let log_dir = args.absolute_log_dir(&cwd);
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, &log_dir.to_string_lossy())?;

    // Storage is ready before the listener accepts its first request.
    let storage = args.storage_config();
    initialize_storage(&storage)?;

    HttpServer::new(args.server_config(), storage).start().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::HttpServer;
    use crate::config::ServerConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use recordstore_core::{initialize_storage, StorageConfig};
    use tower::ServiceExt;

    #[test]
    fn socket_addr_comes_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let server = HttpServer::new(
            ServerConfig::with_port(8080),
            StorageConfig::rooted_at(dir.path()),
        );
        assert_eq!(server.socket_addr(), "127.0.0.1:8080");
    }

    #[tokio::test]
    async fn router_serves_health_and_record_routes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig::rooted_at(dir.path());
        initialize_storage(&storage).unwrap();
        let router = HttpServer::new(ServerConfig::default(), storage).router();

        for uri in ["/health", "/list-files/", "/rebuild-project/"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }

        let request = Request::builder()
            .uri("/no-such-route/")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
