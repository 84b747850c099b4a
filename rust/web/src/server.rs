use crate::handlers;
use crate::middleware::with_request_logging;
use crate::session::SessionManager;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::info;
use warp::filters::BoxedFilter;
use warp::hyper::body::Bytes;
use warp::reply::Reply;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8000)
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    sessions: Arc<SessionManager>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        Self::new_with_sessions(config, Arc::new(SessionManager::new()))
    }

    pub fn new_with_sessions(config: ServerConfig, sessions: Arc<SessionManager>) -> Self {
        Self { config, sessions }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let bind_addr = Self::bind_addr(context.config())?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!(%addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route the server answers, wrapped in request logging.
    pub fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let routes = Self::health_route().or(Self::api_routes(context)).unify();
        with_request_logging(routes).boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn api_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let sessions = context.sessions();

        let create = warp::path!("api" / "games")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(Self::body())
            .and_then(|sessions: Arc<SessionManager>, body: Bytes| async move {
                Ok::<_, Infallible>(handlers::create_game(sessions, body).await)
            });

        let get = warp::path!("api" / "games" / String)
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(|game_id: String, sessions: Arc<SessionManager>| async move {
                Ok::<_, Infallible>(handlers::get_game(sessions, game_id).await)
            });

        let action = warp::path!("api" / "games" / String / "action")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(Self::body())
            .and_then(
                |game_id: String, sessions: Arc<SessionManager>, body: Bytes| async move {
                    Ok::<_, Infallible>(handlers::submit_action(sessions, game_id, body).await)
                },
            );

        let reset = warp::path!("api" / "games" / String / "reset")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(Self::body())
            .and_then(
                |game_id: String, sessions: Arc<SessionManager>, body: Bytes| async move {
                    Ok::<_, Infallible>(handlers::reset_game(sessions, game_id, body).await)
                },
            );

        let delete = warp::path!("api" / "games" / String)
            .and(warp::delete())
            .and(Self::with_session_manager(sessions))
            .and_then(|game_id: String, sessions: Arc<SessionManager>| async move {
                Ok::<_, Infallible>(handlers::delete_game(sessions, game_id).await)
            });

        create
            .or(get)
            .unify()
            .or(action)
            .unify()
            .or(reset)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    // bodies are parsed by the handlers so malformed JSON gets the API's error format
    fn body() -> impl Filter<Extract = (Bytes,), Error = warp::Rejection> + Clone {
        warp::body::bytes()
    }

    fn with_session_manager(
        sessions: Arc<SessionManager>,
    ) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&sessions))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
