use petfit::app::{build_app, serve};
use petfit::offline::{spawn_probe, spawn_sync_worker, Connectivity};
use petfit::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "petfit=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let runtime = AppState::init().await?;
    let state = runtime.state;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(runtime.pg.pool()).await {
        tracing::warn!(error = %e, "migrations failed; continuing");
    }

    let _probe = spawn_probe(state.store.clone(), runtime.monitor.clone(), state.config.probe_interval);
    let sync = spawn_sync_worker(state.reconciler.clone(), runtime.monitor.subscribe());
    if runtime.monitor.is_connected() && !state.queue.list().await.is_empty() {
        sync.trigger();
    }

    serve(build_app(state)).await
}
