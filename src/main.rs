use clap::{Parser, Subcommand};
use hue_switch_watcher::config::{self, Config};
use hue_switch_watcher::{Result, SwitchWatcher};
use log::{error, info, warn};
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "hue-switch-watcher", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the configured switches and announce button presses (default)
    Watch {
        /// Poll interval in milliseconds, overriding POLL_INTERVAL_MS
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Print the bridge's sensor list as JSON
    Sensors,
    /// Print the sensor currently matching a configured switch
    Switch {
        /// Switch name, e.g. "studio"
        name: String,
    },
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() {
    // Load .env file before anything else
    config::load_dotenv();
    init_logger();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let watcher = SwitchWatcher::from_config(&config)?;

    match cli.command.unwrap_or(Command::Watch { interval_ms: None }) {
        Command::Watch { interval_ms } => {
            let watcher = match interval_ms {
                Some(ms) => watcher.with_interval(Duration::from_millis(ms)),
                None => watcher,
            };
            watch(watcher, &config).await
        }
        Command::Sensors => {
            let sensors = watcher.sensors().await?;
            println!("{}", serde_json::to_string_pretty(&sensors)?);
            Ok(())
        }
        Command::Switch { name } => {
            match watcher.switch(&name).await? {
                Some((id, sensor)) => {
                    println!("{}", serde_json::to_string_pretty(&sensor)?);
                    info!("Switch {} is sensor {}", name, id);
                }
                None => info!("Switch {} has no matching sensor", name),
            }
            Ok(())
        }
    }
}

async fn watch(watcher: SwitchWatcher, config: &Config) -> Result<()> {
    info!("Starting Hue switch watcher");
    info!("  Bridge: {}:{}", config.hue.host, config.hue.port);
    for name in watcher.switches().names() {
        info!("  Switch: {}", name);
    }

    let token = CancellationToken::new();
    let mut handle = watcher.start(token.clone());

    let result = tokio::select! {
        result = &mut handle => result,
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Received shutdown signal, finishing current cycle"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
            token.cancel();

            // A blocked fetch or a reset storm only sees the token between cycles.
            tokio::select! {
                result = &mut handle => result,
                _ = signal::ctrl_c() => {
                    warn!("Second shutdown signal, aborting poll task");
                    handle.abort();
                    return Ok(());
                }
                _ = tokio::time::sleep(SHUTDOWN_GRACE) => {
                    warn!("Poll task did not stop within {:?}, aborting", SHUTDOWN_GRACE);
                    handle.abort();
                    return Ok(());
                }
            }
        }
    };

    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Poll task panicked: {}", e);
            std::process::exit(1);
        }
    }
}
