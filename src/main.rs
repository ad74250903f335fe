use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use barberbook::app::build_app;
use barberbook::config::AppConfig;
use barberbook::db;
use barberbook::models::Schedule;
use barberbook::services::mail::http::HttpMailer;
use barberbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if !config.email_configured() {
        tracing::warn!("EMAIL_USER/EMAIL_PASS not set, status emails will fail");
    }
    let mailer = HttpMailer::new(
        config.email_api_url.clone(),
        config.email_user.clone(),
        config.email_pass.clone(),
    )?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        schedule: Schedule::default(),
        mailer: Box::new(mailer),
    });

    let app = build_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
