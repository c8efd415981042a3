use dotenvy::dotenv;
use log::{error, info};
use std::env;
use std::error::Error;

use frontdoor::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file
    dotenv().ok();
    // Set logging levels if not already set
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "frontdoor=debug,tower_http=info");
    }

    // Initialize tracing with previously set logging levels
    tracing_subscriber::fmt::init();

    let config = Config::from_env().map_err(|e| {
        error!("{}", e);
        e
    })?;
    if config.base_url.is_empty() {
        info!("API_URL is not set, redirecting / to itself");
    }

    let target = config.login_target();
    info!("Redirecting / to {}", target.0);

    let app = frontdoor::app(&target);

    // Bind and serve
    info!("Listening on http://{}", config.listen_addr);
    axum::Server::bind(&config.listen_addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
