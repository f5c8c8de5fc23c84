use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use campus_spider_proxy::{
    auth_middleware, config, env_config, handlers, logging, request_id, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    env_config::validate_env()?;
    env_config::log_env_config();

    let spider_url = std::env::var("SPIDER_URL")?;
    let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config::API_PORT);
    let worker_pool_size = std::env::var("WORKER_POOL_SIZE")
        .ok()
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(config::DEFAULT_WORKER_POOL_SIZE);

    let state = AppState::new(&spider_url, worker_pool_size);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/account", post(handlers::account))
        .route("/icalendar", get(handlers::icalendar_help));

    let protected_routes = Router::new()
        .route("/courses", get(handlers::courses))
        .route("/exams", get(handlers::exams))
        .route("/info", get(handlers::info))
        .route("/scores", get(handlers::scores))
        .route("/minor/scores", get(handlers::minor_scores))
        .route("/compulsory/rank", get(handlers::compulsory_rank))
        .route("/rank", get(handlers::rank))
        .route("/calendar", get(handlers::calendar))
        .route("/classroom/today", get(handlers::classroom_today))
        .route("/classroom/tomorrow", get(handlers::classroom_tomorrow))
        .route("/icalendar/courses", get(handlers::icalendar_courses))
        .route("/icalendar/exams", get(handlers::icalendar_exams))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware::auth_middleware,
        ));

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .with_state(state.clone());

    let addr = format!("{host}:{port}");
    tracing::info!("campus-spider-proxy listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, then lets in-flight cache
/// refreshes drain through the worker pool before the process exits.
async fn shutdown_signal(state: Arc<AppState>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutting down, waiting for in-flight refreshes to finish");
    state.worker_pool.wait().await;
}
