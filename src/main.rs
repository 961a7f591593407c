use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use tank_arena::app::GameApp;
use tank_arena::config::GameConfig;
use tank_arena::engine::window::GameWindow;
use tank_arena::error::GameError;
use tank_arena::game::Game;

#[derive(Parser)]
#[command(name = "tank-arena", about = "Drive a tank, shoot targets")]
struct Args {
    /// JSON config file; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for target placement (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. "debug" or "tank_arena::physics=trace"
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), GameError> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.targets.seed = seed;
    }
    info!("target seed {}", config.targets.seed);

    let sdl = sdl2::init().map_err(GameError::Sdl)?;
    let mut window = GameWindow::new(&sdl, "Tank Arena", args.width, args.height)?;
    let game = Game::new(config)?;
    let mut app = GameApp::new(game)?;
    app.run(&sdl, &mut window)
}
