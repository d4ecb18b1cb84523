use clap::Parser;
use cryptolog_cli::cli::Cli;
use cryptolog_cli::config::load_config;
use cryptolog_cli::errors::AppError;
use cryptolog_cli::{app, logger};
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logger::init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("cryptolog: {}", e);
        // Exit directly: a pending blocking read on stdin would otherwise
        // hold up runtime shutdown.
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let cfg = load_config(&cli)?;
    info!(
        "Starting cryptolog: salt lifetime {:?}, replace all matches: {}",
        cfg.salt_lifetime, cfg.replace_all_matches
    );

    let reader = BufReader::new(tokio::io::stdin());
    app::run(&cfg, reader).await?;
    Ok(())
}
