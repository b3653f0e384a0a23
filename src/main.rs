use clap::Parser;
use hero_duel::config::{self, SimConfig, WINDOW_HEIGHT, WINDOW_WIDTH};
use hero_duel::game::Game;
use hero_duel::logging;
use hero_duel::render::Renderer;
use log::{error, info, warn};
use macroquad::prelude::*;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Milliseconds between simulation ticks.
    #[arg(long, default_value_t = config::TICK_PERIOD_MS)]
    tick_ms: u32,

    /// Distance from the pointer at which a hero turns around.
    #[arg(long, default_value_t = config::EVASION_BUFFER)]
    evasion_buffer: f64,

    /// Start with the simulation paused.
    #[arg(long)]
    paused: bool,

    /// Refuse to fire again before a hero's fire interval has elapsed.
    #[arg(long)]
    enforce_fire_interval: bool,

    /// Debug filter to specify log topics (e.g., "movement,collision")
    /// Available topics: movement, collision, command, clock
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Hero Duel".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    if let Some(filter) = &args.debug_filter {
        for topic in logging::parse_debug_filter(filter) {
            if !logging::TOPICS.contains(&topic.as_str()) {
                warn!("Unknown debug topic '{}'", topic);
            }
        }
    }

    info!("Initializing Hero Duel...");

    let config = SimConfig {
        evasion_buffer: args.evasion_buffer,
        enforce_fire_interval: args.enforce_fire_interval,
        ..SimConfig::default().with_tick_ms(args.tick_ms)
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if args.paused {
        game.set_running(false);
    }

    let mut renderer = Renderer::new(game.config());
    game.run(&mut renderer).await;
}
