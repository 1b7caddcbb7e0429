use clap::Parser;
use solo_rewards::cli::{self, Cli};
use solo_rewards::config::LoggingConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            init_logging_simple();
            error!("Failed to load configuration: {}", e);
            eprintln!("\x1b[31m✗ {e}\x1b[0m");
            std::process::exit(2);
        }
    };

    let mut logging = config.logging.clone();
    if let Some(level) = &cli.log_level {
        logging.level = level.clone();
    }
    init_logging(&logging);

    if let Err(e) = cli::run(&cli.command, &config) {
        error!("{}", e);
        eprintln!("\x1b[31m✗ {e}\x1b[0m");
        std::process::exit(1);
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,solo_rewards={}", logging.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn init_logging_simple() {
    // Minimal logging before configuration is available
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .try_init();
}
