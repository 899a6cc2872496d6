//! Magic cube animator entry point.
//!
//! Builds the cube in its solved state, streams host commands to stdout as
//! JSON lines, and then either performs one face turn, a fixed number of
//! random moves, or random moves until stopped.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --moves 20 --seed 7 > frames.jsonl
//! cargo run --release -- --continuous --max-seconds 30
//! cargo run --release -- --face R --reverse
//! ```

use clap::Parser;
use log::{error, info, warn};
use magicube::animator::{Direction, RotationMove};
use magicube::app::CubeApp;
use magicube::error::CubeError;
use magicube::pacer::RealTimePacer;
use magicube::resources::cubeconfig::CubeConfig;
use magicube::resources::facetable::Face;
use magicube::resources::sequencer::StopSignal;
use std::path::PathBuf;
use std::time::Duration;

/// Animate random face turns of a 3x3x3 magic cube.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of random moves to perform.
    #[arg(long, default_value_t = 10)]
    moves: usize,

    /// Keep performing random moves until stopped.
    #[arg(long, conflicts_with = "face")]
    continuous: bool,

    /// Stop a continuous run after this many seconds.
    #[arg(long, value_name = "S", requires = "continuous")]
    max_seconds: Option<f64>,

    /// Turn a single face (R, L, U, D, F or B) and exit.
    #[arg(long, value_name = "F")]
    face: Option<Face>,

    /// Turn the single face in the negative direction.
    #[arg(long, requires = "face")]
    reverse: bool,

    /// Seed for the random move generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Animation steps per quarter turn.
    #[arg(long)]
    steps: Option<u32>,

    /// Delay between animation steps, in milliseconds.
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Pause between moves, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Build the cube without legs.
    #[arg(long)]
    no_legs: bool,

    /// Let the inner leg segments telescope while turning.
    #[arg(long, conflicts_with = "no_legs")]
    telescoping: bool,

    /// Write the effective configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn build_config(cli: &Cli) -> CubeConfig {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = CubeConfig::with_path(path);
            if let Err(e) = config.load_from_file() {
                warn!("{e}, using defaults");
            }
            config
        }
        None => {
            let mut config = CubeConfig::new();
            config.load_from_file().ok(); // ignore errors, use defaults
            config
        }
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(steps) = cli.steps {
        config.step_count = steps.max(1);
    }
    if let Some(ms) = cli.step_delay_ms {
        config.step_delay_ms = ms;
    }
    if let Some(ms) = cli.pause_ms {
        config.move_pause_ms = ms;
    }
    if cli.no_legs {
        config.legs = false;
    }
    if cli.telescoping {
        config.leg.telescoping = true;
    }
    config
}

fn run(cli: &Cli, app: &mut CubeApp) -> Result<(), CubeError> {
    let mut pacer = RealTimePacer::new();

    if let Some(face) = cli.face {
        let direction = if cli.reverse {
            Direction::Negative
        } else {
            Direction::Positive
        };
        return app.animate_face(RotationMove::new(face, direction), &mut pacer);
    }

    if cli.continuous {
        let stop = StopSignal::new();
        if let Some(secs) = cli.max_seconds {
            let stop = stop.clone();
            let limit = Duration::from_secs_f64(secs.max(0.0));
            std::thread::spawn(move || {
                std::thread::sleep(limit);
                info!("Time limit reached, stopping after the current move");
                stop.request();
            });
        }
        app.perform_continuous(stop, &mut pacer)?;
        return Ok(());
    }

    app.perform_n_random_moves(cli.moves, &mut pacer)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli);

    // Early-exit: write the configuration and quit
    if let Some(path) = &cli.write_config {
        let mut out = config.clone();
        out.config_path = path.clone();
        if let Err(e) = out.save_to_file() {
            error!("{e}");
            std::process::exit(1);
        }
        return;
    }

    let mut app = CubeApp::new(config);
    app.attach_host(std::io::stdout());

    let result = run(&cli, &mut app);
    app.shutdown();

    info!("Moves: {}", app.history().notation());
    if let Err(e) = result {
        error!("Stopped: {e}");
        std::process::exit(1);
    }
}
