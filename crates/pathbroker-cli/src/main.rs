use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pathbroker_cli::output::{render_locations, render_reply, OutputFormat};
use pathbroker_lib::{BrokerConfig, PathBroker, PathQuery};

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus path broker utilities")]
struct Cli {
    /// Path-finding executable to spawn (overrides PATHFINDER_EXECUTABLE).
    #[arg(long, global = true)]
    executable: Option<PathBuf>,

    /// Argument placed before the positional parameters; repeatable.
    #[arg(long = "launcher-arg", global = true, allow_hyphen_values = true)]
    launcher_args: Vec<String>,

    /// Trailing output-mode flag; pass an empty string to omit it.
    #[arg(long, global = true, allow_hyphen_values = true)]
    mode_flag: Option<String>,

    /// Seconds to wait for the executable before killing it.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// JSON gazetteer replacing the built-in campus locations.
    #[arg(long, global = true)]
    gazetteer: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a path between two locations and print a map link.
    Route {
        /// Algorithm selector understood by the executable.
        #[arg(long, short = 'a')]
        algorithm: String,
        /// Starting location.
        #[arg(long = "from")]
        from: String,
        /// Destination location.
        #[arg(long = "to")]
        to: String,
    },
    /// List the locations that can appear on a map link.
    Locations,
}

impl Cli {
    fn broker_config(&self) -> Result<BrokerConfig> {
        let mut config =
            BrokerConfig::from_env().context("invalid path broker environment configuration")?;

        if let Some(executable) = &self.executable {
            config.executable = executable.clone();
        }
        if !self.launcher_args.is_empty() {
            config.launcher_args = self.launcher_args.clone();
        }
        if let Some(flag) = &self.mode_flag {
            config.mode_flag = Some(flag.trim().to_string()).filter(|f| !f.is_empty());
        }
        if let Some(secs) = self.timeout_secs {
            if secs == 0 {
                bail!("--timeout-secs must be greater than zero");
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(path) = &self.gazetteer {
            config.gazetteer_path = Some(path.clone());
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.broker_config()?;
    let broker = PathBroker::from_config(&config).context("failed to initialize path broker")?;

    match &cli.command {
        Command::Route {
            algorithm,
            from,
            to,
        } => handle_route(&broker, PathQuery::new(algorithm, from, to), cli.format).await,
        Command::Locations => {
            print!("{}", render_locations(broker.gazetteer(), cli.format)?);
            Ok(())
        }
    }
}

async fn handle_route(broker: &PathBroker, query: PathQuery, format: OutputFormat) -> Result<()> {
    let reply = broker.find_path(&query).await;
    print!("{}", render_reply(&reply, format)?);
    if format == OutputFormat::Json {
        println!();
    }

    if !reply.is_success() {
        bail!("path computation from {} to {} failed", query.source, query.destination);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
