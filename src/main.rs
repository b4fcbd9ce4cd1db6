use clap::Parser;
use tracing_subscriber::EnvFilter;

use leadbouncer::{cli, config, errors, models};

#[tokio::main]
async fn main() {
    // Local .env is optional; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::CreateAccount(args) => cli::account::handle_create_account(args).await,
        cli::Commands::CheckConfig => handle_check_config().await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                errors::BouncerError::Config(_) => 2,
                errors::BouncerError::InvalidInput(_) => 3,
                errors::BouncerError::Database(_) => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn handle_check_config() -> Result<(), errors::BouncerError> {
    let config = config::Config::from_env();
    let mut configured = 0;
    for signal in models::SignalType::ALL {
        match config.credential_for(signal) {
            Some(_) => {
                println!("{:<8} configured ({})", signal.as_str(), config.provider(signal).base_url);
                configured += 1;
            }
            None => println!("{:<8} no API key", signal.as_str()),
        }
    }
    if config.broker_url.is_some() {
        println!("broker   configured");
    } else {
        println!("broker   not configured (webhook-style providers only)");
    }
    if configured == 0 {
        return Err(errors::BouncerError::Config(
            "No signal providers configured".to_string(),
        ));
    }
    Ok(())
}
