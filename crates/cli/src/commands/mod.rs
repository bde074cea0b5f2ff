use cerberus_config::HostConfig;
use clap::Subcommand;

pub mod cron;
pub mod events;
pub mod run;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the host and dispatch events read from stdin
    Run {
        /// Parameters as key=value (a bare key sets an empty value)
        #[arg(value_name = "PARAM=VALUE")]
        params: Vec<String>,
    },

    /// List the events the host accepts
    Events,

    /// Explain a cron expression
    Cron {
        /// Five-field expression, e.g. "*/15 9-17 * * mon-fri"
        expression: String,

        /// Point in time to check (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
}

impl Commands {
    /// Parameters the configuration loader should apply
    pub fn params(&self) -> &[String] {
        match self {
            Commands::Run { params } => params.as_slice(),
            _ => &[],
        }
    }

    pub async fn execute(self, config: HostConfig) -> eyre::Result<()> {
        match self {
            Commands::Run { .. } => run::execute(config).await,
            Commands::Events => events::execute(&config),
            Commands::Cron { expression, at } => cron::execute(&expression, at.as_deref()),
        }
    }
}
