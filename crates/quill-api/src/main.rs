use quill_api::setup;
use quill_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration; a port given as the first argument wins over PORT
    let config = Config::from_env()?.with_port_override(std::env::args().nth(1));

    // Initialize the application (stores, storage, routes)
    let (_state, router) = setup::initialize_app(config.clone()).await?;

    // Start the server
    setup::server::start_server(&config, router).await?;

    Ok(())
}
