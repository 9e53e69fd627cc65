#![cfg(not(tarpaulin_include))]

use forecast::app;
use forecast::config::Config;

/// Main entry point for the sales forecast web application
///
/// Settings come from the environment (see `Config::from_env`). Log output
/// defaults to `info` unless `RUST_LOG` says otherwise.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!(
        "Starting {} with data file {}",
        config.site_name,
        config.data_file.display()
    );

    app::run(config).await
}
