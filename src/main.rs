use clap::Parser;
use riskcore::cli::Cli;
use riskcore::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {:#}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    riskcore::telemetry::init_telemetry(&config.telemetry)?;

    cli.command.execute(&config, cli.json)
}
