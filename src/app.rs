use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{dogs, feeding, milestones, offline, weigh_ins};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(dogs::router())
                .merge(weigh_ins::router())
                .merge(feeding::router())
                .merge(milestones::router())
                .merge(offline::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

/// Address to bind, from `APP_HOST`/`APP_PORT` with `0.0.0.0:8080` as fallback.
fn listen_addr(host: Option<String>, port: Option<String>) -> anyhow::Result<SocketAddr> {
    let host = host.unwrap_or_else(|| "0.0.0.0".into());
    let port = port.unwrap_or_else(|| "8080".into());
    Ok(format!("{host}:{port}").parse()?)
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr = listen_addr(std::env::var("APP_HOST").ok(), std::env::var("APP_PORT").ok())?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
