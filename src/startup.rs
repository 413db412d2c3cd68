use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::routes::health_check;
use crate::routes::submission_created;
use crate::subscription_client::SubscriptionClient;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind a listener, build the outbound client from config, and wrap the
    /// resulting `Server`
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;

        // get the randomised port assigned by OS; this will be saved in the
        // `port` field
        let port = listener.local_addr().unwrap().port();

        let subscription_client = cfg.provider.client();

        let server = run(listener, subscription_client)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call
    /// (or passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    subscription_client: SubscriptionClient,
) -> Result<Server, std::io::Error> {
    // `Data` is externally an `Arc` (for sharing/cloning), internally a
    // `HashMap` (for wrapping arbitrary types). actix spins up a worker per
    // core, each running its own copy of the `App` closure, so anything the
    // handlers need must be cloneable.
    let subscription_client = Data::new(subscription_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default()) // wrap the whole app in tracing middleware
            .route("/health_check", web::get().to(health_check))
            // endpoint: POST /hooks/submission-created
            // who: the hosting platform, once per form submission
            // what: forward the email to the subscription provider
            .route(
                "/hooks/submission-created",
                web::post().to(submission_created),
            )
            .app_data(subscription_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
