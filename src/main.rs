// src/main.rs

use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use flour_crm::{
    config::{AppConfig, AppState},
    routes::build_router,
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let port = config.port;
    let admin_bootstrap = config.admin_bootstrap.clone();

    let app_state = AppState::new(config).await?;

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    if let Some(admin) = admin_bootstrap {
        let created = app_state
            .auth_service
            .bootstrap_admin(&admin.email, &admin.password)
            .await
            .map_err(|e| anyhow::anyhow!("failed to create the bootstrap admin: {}", e))?;
        if created {
            tracing::info!(email = %admin.email, "bootstrap admin created");
        }
    }

    // Expired sessions are dropped lazily on read; sweep the rest periodically
    let sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "expired sessions purged");
            }
        }
    });

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Flour CRM listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
