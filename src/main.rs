use anyhow::Context;
use newsletter_gateway::configuration::get_configuration;
use newsletter_gateway::startup::Application;
use newsletter_gateway::telemetry::get_subscriber;
use newsletter_gateway::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("newsletter-gateway", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration().context("Failed to read configuration")?;

    let app = Application::build(cfg).await?;
    if let Err(e) = app.run_until_stopped().await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Server exited with an error"
        );
        return Err(e.into());
    }

    tracing::info!("Server exited gracefully");
    Ok(())
}
