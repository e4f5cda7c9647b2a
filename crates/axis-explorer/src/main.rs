//! axis-explorer - play an NDLR from an axis-system button grid
//!
//! Subcommands:
//! - `axis-explorer run` - Start a deck session (default)
//! - `axis-explorer ports` - List MIDI output ports
//! - `axis-explorer config` - Print the effective configuration
//! - `axis-explorer axis <root>` - Print the axis for a root

use std::path::PathBuf;

use anyhow::{Context, Result};
use axis::{Axis, ControlSink, Controllers, Ndlr, Pitch, SceneStateMachine};
use axis_explorer::{console, list_output_ports, run, LogSink, MidiOutputSink};
use axisconf::AxisConfig;
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "axis-explorer")]
#[command(about = "Drive an NDLR from an axis-system button grid")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./axis-explorer.toml)
    #[arg(long, global = true, env = "AXIS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a deck session on the console
    Run(RunArgs),

    /// List MIDI output ports
    Ports,

    /// Print the effective configuration as TOML
    Config,

    /// Print the axis for a root
    Axis {
        /// Root pitch (C, F#, Bb, ...)
        root: Pitch,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// MIDI output port name pattern
    #[arg(short, long)]
    port: Option<String>,

    /// MIDI channel (1-16; other values wrap)
    #[arg(short, long, allow_hyphen_values = true)]
    channel: Option<i32>,

    /// Skip root selection and start on this root
    #[arg(short, long)]
    root: Option<Pitch>,

    /// Log control changes instead of opening a MIDI port
    #[arg(long)]
    dry_run: bool,

    /// Disable ANSI colors on the console deck
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|e| {
        eprintln!("invalid log filter {log_level:?} ({e}), using info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = AxisConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(&config.telemetry.log_level);
    for file in &sources.files {
        info!("Loaded config: {}", file.display());
    }

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Run(args) => run_session(config, args).await?,
        Commands::Ports => {
            let ports = list_output_ports().context("Failed to enumerate MIDI ports")?;
            if ports.is_empty() {
                println!("No MIDI output ports found");
            }
            for port in ports {
                println!("{}: {}", port.index, port.name);
            }
        }
        Commands::Config => print!("{}", config.to_toml()),
        Commands::Axis { root, json } => print_axis(root, json)?,
    }

    Ok(())
}

async fn run_session(mut config: AxisConfig, args: RunArgs) -> Result<()> {
    if let Some(port) = args.port {
        config.midi.output_port = port;
    }
    if let Some(channel) = args.channel {
        config.midi.channel = channel;
    }
    if args.no_color {
        config.deck.color = false;
    }

    let initial_root = match args.root {
        Some(root) => Some(root),
        None => config
            .deck
            .initial_root
            .as_deref()
            .map(str::parse::<Pitch>)
            .transpose()
            .context("Invalid deck.initial_root")?,
    };

    let sink: Box<dyn ControlSink> = if args.dry_run {
        info!("Dry run: control changes are logged, not sent");
        Box::new(LogSink::default())
    } else {
        let output = MidiOutputSink::open(&config.midi.output_port).with_context(|| {
            format!(
                "No MIDI output matching {:?} (see `axis-explorer ports`)",
                config.midi.output_port
            )
        })?;
        Box::new(output)
    };

    let controllers = Controllers {
        chord_degree: config.midi.chord_degree_cc,
        ..Controllers::default()
    };
    let ndlr = Ndlr::with_controllers(sink, config.midi.channel, controllers);
    info!(
        channel = ndlr.channel() + 1,
        chord_degree_cc = controllers.chord_degree,
        "NDLR link ready"
    );

    let renderer = console::ConsoleRenderer::new(std::io::stdout(), config.deck.color);
    let mut machine = match initial_root {
        Some(root) => SceneStateMachine::with_root(ndlr, renderer, root),
        None => SceneStateMachine::new(ndlr, renderer),
    };

    let (tx, rx) = mpsc::unbounded_channel();
    // Detached; the thread ends on EOF or quit.
    let _reader = console::spawn_stdin_reader(tx).context("Failed to start console input")?;

    let summary = run(&mut machine, rx).await.context("MIDI send failed")?;
    info!(
        events = summary.events,
        commands = summary.commands,
        transitions = summary.transitions,
        "session ended"
    );

    Ok(())
}

fn print_axis(root: Pitch, json: bool) -> Result<()> {
    let axis = Axis::new(root);
    if json {
        let value = serde_json::json!({
            "root": axis.root(),
            "tonic_primary": axis.tonic_primary(),
            "tonic_secondary": axis.tonic_secondary(),
            "subdominant_primary": axis.subdominant_primary(),
            "subdominant_secondary": axis.subdominant_secondary(),
            "dominant_primary": axis.dominant_primary(),
            "dominant_secondary": axis.dominant_secondary(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{axis}");
    }
    Ok(())
}
