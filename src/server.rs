use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    error::ErrorVerbosity,
    middleware::{
        cors_preflight::cors_preflight, method_not_allowed::method_not_allowed,
        not_found::not_found,
    },
    route,
    state::ApiState,
    store::BookStore,
};

pub struct ServerConfig {
    socket_address: SocketAddr,
    environment: String,
    error_verbosity: ErrorVerbosity,
}

impl ServerConfig {
    pub fn new(
        socket_address: SocketAddr,
        environment: String,
        error_verbosity: ErrorVerbosity,
    ) -> Self {
        Self {
            socket_address,
            environment,
            error_verbosity,
        }
    }
}

pub struct Server {
    config: ServerConfig,
    store: Arc<dyn BookStore>,
}

impl Server {
    pub fn new(config: ServerConfig, store: Arc<dyn BookStore>) -> Self {
        Self { config, store }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let state = ApiState::new(
            self.config.error_verbosity,
            self.config.environment,
            self.store,
        );

        let app = app(state);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

/// Assembles the full application: the versioned route table, the
/// method-not-allowed and not-found mappings, tracing and CORS.
///
/// Split out of [`Server::run`] so the end-to-end tests can drive the exact
/// router the binary serves.
pub(crate) fn app(state: ApiState) -> Router {
    let v1 = Router::<ApiState>::new()
        .route("/healthcheck", get(route::health::healthcheck))
        .nest("/books", route::books::app::app());

    Router::new()
        .nest("/v1", v1)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed,
        ))
        .layer(middleware::from_fn(cors_preflight))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                ),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
