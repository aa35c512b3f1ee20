use std::net::TcpListener;

use anyhow::Context;

use subscription_service::app;
use subscription_service::repo::PgSubscriptionRepo;
use subscription_service::service::SubscriptionService;
use subscription_service::settings::Settings;
use subscription_service::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;

    let subscriber = telemetry::create_subscriber(&settings.telemetry, std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    tracing::info!("Starting subscription service");

    let pool = settings.database.connect().await?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let service = SubscriptionService::new(PgSubscriptionRepo::new(pool.clone()));

    let listener = TcpListener::bind(settings.app.addr())?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Server starting");

    // Stops gracefully on SIGINT/SIGTERM
    app::run(listener, service)?.await.context("Failed to run app")?;

    tracing::info!("Closing database connection");
    pool.close().await;
    tracing::info!("Server exited");

    Ok(())
}
