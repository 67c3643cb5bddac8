use clap::Parser;

use revox::cli::CliHandler;
use revox::commands::Cli;
use revox::config::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_verbose = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map(|config| config.verbose)
    .unwrap_or(false);

    let log_level = if cli.verbose || config_verbose {
        "debug"
    } else {
        "info"
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!("revox={}", log_level));
    subscriber.init();

    let mut handler = CliHandler::with_config_path(cli.config);

    if let Err(e) = handler.execute(cli.command).await {
        if !handler.has_reported() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
