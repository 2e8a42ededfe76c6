mod api;
mod core;
mod data;
mod domain;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use crate::core::config::{load_config, resolve};

#[derive(Parser)]
#[command(
    name = "rickdex",
    about = "Terminal browser for the Rick and Morty character catalogue"
)]
struct Args {
    /// Override the API base URL (also settable via RICKDEX_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Start with a name filter already applied
    #[arg(short, long, default_value = "")]
    name: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to rickdex.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("rickdex.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    let resolved = resolve(&config, args.base_url.as_deref());

    log::info!("Rickdex starting up (base_url: {})", resolved.base_url);

    tui::run(resolved, args.name)
}
