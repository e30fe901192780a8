use std::{net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use tokio::{net::TcpListener, signal};
use tower_http::compression::CompressionLayer;
use tracing::{error, info, warn};

use hotel_pos_api::{
    app_router, config, db, handlers::health, middleware_helpers::cors, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config().context("loading configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);
    health::init_start_time();

    let cors = cors::cors_layer(&cfg).ok_or_else(|| {
        anyhow!("no CORS policy: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true")
    })?;

    let pool = db::connect_with(&cfg)
        .await
        .context("connecting to database")?;
    if cfg.auto_migrate {
        db::run_migrations(&pool)
            .await
            .context("applying migrations")?;
    } else {
        warn!("auto_migrate disabled; run `hotel-pos-cli migrate` before serving traffic");
    }

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;

    let app = app_router(AppState::new(Arc::new(pool), cfg))
        .layer(CompressionLayer::new())
        .layer(cors);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "hotel-pos-api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("interrupt received, draining"),
        () = sigterm => info!("SIGTERM received, draining"),
    }
}
