mod api_doc;
mod auth;
mod error;
mod handlers;
mod setup;
mod state;
mod telemetry;

use depot_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing before anything else logs
    telemetry::init_telemetry()?;

    // Initialize the application (database, storage, services, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
