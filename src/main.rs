use clap::Parser;
use dotenv::dotenv;
use set_balance::utils::{AppError, ErrorClass};
use set_balance::{cli, config, database, services};
use std::io::Write;

const RULE: &str = "--------------------------";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logger: plain console lines, RUST_LOG still filters
    env_logger::Builder::from_env(env_logger::Env::new().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = cli::Args::parse();

    let code = match run(args).await {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => report(&e),
    };

    std::process::exit(code);
}

async fn run(args: cli::Args) -> Result<services::Outcome, AppError> {
    log::info!("{}", RULE);
    log::info!("Set balance to a user account!");
    log::info!("{}", RULE);

    if args.is_empty() {
        cli::print_usage();
        log::info!("{}", RULE);
    }

    let config = config::AppConfig::from_env()?;

    // Checked before connecting so a disabled install never touches the store
    if !config.balance.enabled {
        return Err(AppError::ConfigurationDisabled);
    }

    let db = database::MongoDB::new(&config.mongo_uri).await?;
    let store = database::MongoBalanceStore::new(db);

    let mut prompt = cli::StdinPrompt::new();
    services::set_balance(&store, config.balance.enabled, args, &mut prompt).await
}

/// Top-level error boundary: log according to class, return the exit code.
fn report(e: &AppError) -> i32 {
    match e.class() {
        ErrorClass::TransientNetworkNoise => {
            log::warn!("Transient network error: {}", e);
        }
        ErrorClass::Fatal => {
            log::error!("Error: {}", e);
            log::debug!("{:?}", e);
        }
    }
    e.exit_code()
}
