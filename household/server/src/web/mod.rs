use axum::Router;
use axum::http::StatusCode;
use sea_orm::DatabaseConnection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::crud::{Crud, CrudService, SeaOrmStore, Store, Table};
use crate::db;
use crate::note::Notes;
use crate::project::Projects;
use crate::shopping::ShoppingItems;
use crate::task::{TaskService, Tasks};
use crate::wishlist::Wishlists;

pub mod api;
pub mod middleware;

/// One service per entity kind, shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn Crud<Tasks>>,
    pub projects: Arc<dyn Crud<Projects>>,
    pub notes: Arc<dyn Crud<Notes>>,
    pub wishlists: Arc<dyn Crud<Wishlists>>,
    pub shopping: Arc<dyn Crud<ShoppingItems>>,
}

impl AppState {
    /// Wires every service to a sea-orm store on `db`, each storage call
    /// bounded by `query_timeout`.
    pub fn new(db: Arc<DatabaseConnection>, query_timeout: Duration) -> Self {
        let tasks: Arc<dyn Store<Tasks>> = Arc::new(SeaOrmStore::new(db.clone(), query_timeout));
        let projects: Arc<dyn Store<Projects>> =
            Arc::new(SeaOrmStore::new(db.clone(), query_timeout));
        Self {
            tasks: Arc::new(TaskService::new(tasks, projects.clone())),
            projects: Arc::new(CrudService::new(projects)),
            notes: crud_over::<Notes>(db.clone(), query_timeout),
            wishlists: crud_over::<Wishlists>(db.clone(), query_timeout),
            shopping: crud_over::<ShoppingItems>(db, query_timeout),
        }
    }
}

fn crud_over<R: Table>(db: Arc<DatabaseConnection>, query_timeout: Duration) -> Arc<dyn Crud<R>> {
    let store: Arc<dyn Store<R>> = Arc::new(SeaOrmStore::<R>::new(db, query_timeout));
    Arc::new(CrudService::new(store))
}

/// Builds the complete application: the JSON API, the health check and the
/// static frontend for every other path.
pub fn create_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let api_router = api::create_api_router(&state, config)?;

    let index = Path::new(&config.static_dir).join("index.html");
    let frontend = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    let app = Router::new()
        .merge(api_router)
        .route("/health", axum::routing::get(health_check_handler))
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(request_timeout_layer(config.request_timeout())),
        );
    Ok(app)
}

/// Answers 408 when a request outlives `timeout`.
fn request_timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let db = Arc::new(db::connect_and_migrate(&config.database_url()?).await?);
    let state = AppState::new(db.clone(), config.query_timeout());
    let app = create_app(state, &config)?;

    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await?,
        Err(_) => tracing::warn!("Database connection still shared at shutdown; not closing"),
    }
    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
