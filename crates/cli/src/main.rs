use cerberus::Commands;
use cerberus_config::ConfigLoader;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cerberus")]
#[command(about = "Event-driven bot host with plugins and cron jobs", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (JSON); defaults to $CERBERUS_CONFIG
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().overrides(cli.command.params().iter().cloned());
    if let Some(path) = cli.config {
        loader = loader.path(path);
    }
    let config = loader.load()?;

    cerberus_utils::tracing::init(config.log_level())
        .map_err(|e| eyre::eyre!("failed to initialize logging: {e}"))?;

    cli.command.execute(config).await
}
