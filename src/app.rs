/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → store 生成 → Router 組み立て
 * - Middleware の適用 (CORS / request-id / timeout など)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::{Config, StoreBackend},
    middleware::{self, http::HttpLimits},
    repos::{MemoryStore, PgStore, SnsStore},
    state::AppState,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,sns_store=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    let store = build_store(&config).await?;
    tracing::info!(
        "starting API in {:?} mode on {} (store: {})",
        config.app_env,
        config.addr,
        store.backend_name()
    );

    let app = build_router(AppState::new(store), &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn SnsStore>> {
    let store: Arc<dyn SnsStore> = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => Arc::new(
            PgStore::connect(database_url, *max_connections)
                .await
                .context("connecting to postgres")?,
        ),
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, HttpLimits::default())
}
