use site_host::configuration::get_configuration;
use site_host::startup::Application;
use site_host::telemetry::get_subscriber;
use site_host::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main] // requires tokio features: macros, rt-multi-thread
async fn main() -> Result<(), anyhow::Error> {
    // RUST_LOG default is "error"; only logs at the specified level and higher
    // are emitted
    let subscriber = get_subscriber("site-host", "info", std::io::stdout);
    init_subscriber(subscriber);

    let cfg = get_configuration().unwrap();

    // each webhook invocation is independent and stateless; one server task is
    // all there is
    Application::build(cfg).await?.run_until_stopped().await?;

    Ok(())
}
