use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use anyhow::Context;
use reqwest::Client;
use tracing_actix_web::TracingLogger;

use crate::configuration::FeedSettings;
use crate::configuration::Settings;
use crate::gateway::SubscriptionGateway;
use crate::registry::ProviderId;
use crate::routes::health_check;
use crate::routes::rss;
use crate::routes::subscribe;

/// Wrapper for actix's `Server` with access to the bound port.
pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener, build the outbound HTTP client and the gateway, and
    /// prepare (but do not start) the server.
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener =
            TcpListener::bind(&addr).with_context(|| format!("Could not bind to {addr}"))?;

        // port 0 lets the OS pick; record what we actually got
        let port = listener.local_addr()?.port();

        // one client (and connection pool) for every provider call
        let http_client = Client::builder()
            .timeout(cfg.subscription.timeout())
            .build()
            .context("Could not build HTTP client")?;

        let gateway = SubscriptionGateway::new(cfg.subscription.clone(), http_client);
        check_provider(&gateway, cfg.subscription.validate_on_startup)?;

        let server = run(listener, gateway, cfg.feed)?;
        tracing::info!("Listening on {addr} (port {port})");

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Consumes `self`; await it last, or hand it to `tokio::spawn`
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// Try the provider once at startup so that operators see problems early.
///
/// A configuration fault only stops the server when `strict` is set;
/// otherwise it is logged here and reported again on every request.
fn check_provider(
    gateway: &SubscriptionGateway,
    strict: bool,
) -> Result<(), anyhow::Error> {
    match gateway.provider() {
        Ok(provider) if provider.id() == ProviderId::Netlify => {
            tracing::warn!(
                provider = %provider.id(),
                "Subscriptions are validated and logged only; nothing is forwarded to a mailing \
                 list by this service"
            );
        }
        Ok(provider) => {
            tracing::info!(provider = %provider.id(), "Subscription provider ready");
        }
        Err(e) if strict => {
            return Err(e).context("Subscription provider is misconfigured");
        }
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                "Subscription provider is misconfigured; subscribe requests will fail"
            );
        }
    }
    Ok(())
}

/// Declares all endpoints. The listener must already be bound.
pub fn run(
    listener: TcpListener,
    gateway: SubscriptionGateway,
    feed: FeedSettings,
) -> Result<Server, anyhow::Error> {
    // `Data` is an `Arc`; every worker gets a handle to the same gateway
    let gateway = web::Data::new(gateway);
    let feed = web::Data::new(feed);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/api/subscribe", web::post().to(subscribe))
            .route("/rss.xml", web::get().to(rss))
            .app_data(gateway.clone())
            .app_data(feed.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
