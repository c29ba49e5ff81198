// Sweepbot - robot nettoyeur autonome
// Mode terminal interactif par défaut, flux JSON avec --headless

use std::io::stdout;
use std::time::Duration;

use clap::Parser;
use sweepbot::config::{Pacing, SimConfig};
use sweepbot::display::{spawn_key_reader, JsonLinesPresenter, TerminalGuard, TerminalPresenter};
use sweepbot::simulation::Simulation;
use sweepbot::types::{DEFAULT_COLS, DEFAULT_ROWS};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sweepbot - autonomous cleaning robot simulation")]
struct Args {
    /// Number of rows of the house
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,
    /// Number of columns of the house
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,
    /// Probability for each tile to start dirty
    #[arg(long, default_value_t = 0.5)]
    dirty_probability: f64,
    /// Seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,
    /// Pause after each step, in milliseconds
    #[arg(long, default_value_t = 100)]
    step_ms: u64,
    /// Run once without a terminal UI and print JSON lines
    #[arg(long)]
    headless: bool,
    /// Disable every pacing delay
    #[arg(long)]
    fast: bool,
}

impl Args {
    fn config(&self) -> SimConfig {
        let pacing = if self.fast {
            Pacing::instant()
        } else {
            Pacing::default().with_step(Duration::from_millis(self.step_ms))
        };
        SimConfig {
            rows: self.rows,
            cols: self.cols,
            dirty_probability: self.dirty_probability,
            seed: self.seed,
            pacing,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // NOTE - Logs on stderr, the terminal UI owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();

    if args.headless {
        run_headless(config).await
    } else {
        run_interactive(config).await
    }
}

async fn run_headless(config: SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    let presenter = JsonLinesPresenter::new(stdout(), config.pacing.message);
    let mut simulation = Simulation::new(config, presenter)?;

    simulation.start().await?;
    if let Some(report) = simulation.wait().await {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

async fn run_interactive(config: SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    let guard = TerminalGuard::enter()?;
    let presenter = TerminalPresenter::new(config.pacing.message);
    let mut simulation = Simulation::new(config, presenter)?;

    // NOTE - Keyboard thread -> commands channel -> host
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let _keys = spawn_key_reader(command_tx);
    let mut reap_tick = tokio::time::interval(Duration::from_millis(200));

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                let Some(command) = command else { break };
                if !simulation.handle(command).await? {
                    break;
                }
            }
            _ = reap_tick.tick() => {
                if let Some(report) = simulation.reap().await {
                    info!(?report, "sweep ended");
                }
            }
        }
    }

    drop(guard);
    if let Some(controller) = simulation.controller() {
        println!("{}", controller.status());
    }
    Ok(())
}
