use std::net::SocketAddr;

use axum::http::{header, HeaderValue};
use dance_pose_backend::config::Config;
use dance_pose_backend::constants::SERVICE_NAME;
use dance_pose_backend::logging::{init_tracing, LogConfig};
use dance_pose_backend::routes::build_router;
use dance_pose_backend::state::AppState;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    init_tracing(&LogConfig::from(&config));
    tracing::info!(service = SERVICE_NAME, "Starting");

    let state = AppState::new(&config);

    let cors_layer = build_cors_layer(&config);

    let app = build_router(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ));

    let addr = SocketAddr::new(config.host, config.port);
    tracing::info!(
        %addr,
        max_frames = config.limits.max_frames_per_request,
        max_concurrent = config.limits.max_concurrent_analyses,
        "Listening"
    );
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind TCP listener");
            std::process::exit(1);
        }
    };

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "HTTP server crashed");
    }
    tracing::info!("Shutdown complete");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origin.trim() == "*" {
        // 通配符模式仅用于开发环境
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any);
    }

    match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_methods(Any),
        Err(e) => {
            panic!(
                "FATAL: Invalid CORS_ORIGIN '{}': {}. \
                 Fix the CORS_ORIGIN environment variable.",
                config.cors_origin, e
            );
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler, waiting on Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutdown signal received");
}
