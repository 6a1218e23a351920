#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Canvas Snake, either in a window or
//! headless for a fixed number of frames.

mod setup;
mod store;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use canvas_snake_core::{Command, Event, GameConfig, InputEvent, Key, WINDOW_TITLE};
use canvas_snake_rendering::{
    Color, FrameInput, FrameQueue, LayeredCanvas, Presentation, RenderingBackend, Scene,
};
use canvas_snake_rendering_macroquad::MacroquadBackend;
use canvas_snake_system_game_loop::GameController;
use canvas_snake_world::query;
use clap::Parser;
use tracing::{debug, info};

use self::store::FileScoreStore;

const DEFAULT_HIGH_SCORE_FILE: &str = "canvas-snake-high-score.toml";

type Controller = GameController<LayeredCanvas, FrameQueue, FileScoreStore>;

/// Grid snake game drawn on layered surfaces.
#[derive(Debug, Parser)]
#[command(name = "canvas-snake", version)]
struct Opts {
    /// TOML file with game settings; defaults apply to anything it omits.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for food placement. Drawn at random when neither this nor the
    /// config file sets one.
    #[arg(long)]
    seed: Option<u64>,
    /// File holding the persisted high score.
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Start with the debug overlay visible.
    #[arg(long)]
    debug: bool,
    /// Run without a window, driving frames from a synthetic clock.
    #[arg(long)]
    headless: bool,
    /// Number of frames to run in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u32,
    /// Synthetic frame duration in milliseconds for headless mode.
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,
    /// Log filter directives, overriding `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,
}

/// Entry point for the Canvas Snake command-line interface.
fn main() -> Result<()> {
    let opts = Opts::parse();
    setup::init_logging(opts.log_level.as_deref())?;

    let config = load_config(&opts)?;
    info!(
        seed = ?config.seed,
        columns = config.columns,
        rows = config.rows,
        "starting canvas snake"
    );

    let canvas = LayeredCanvas::new();
    let controller = GameController::new(
        config,
        canvas.clone(),
        FrameQueue::new(),
        FileScoreStore::new(&opts.high_score_file),
    )
    .context("invalid game configuration")?;

    if opts.headless {
        run_headless(controller, opts.frames, opts.frame_ms)
    } else {
        run_windowed(controller, canvas)
    }
}

fn load_config(opts: &Opts) -> Result<GameConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if opts.seed.is_some() {
        config.seed = opts.seed;
    }
    if opts.debug {
        config.show_debug = true;
    }
    if config.seed.is_none() {
        let seed: u64 = rand::random();
        info!(seed, "no seed configured, drew one at random");
        config.seed = Some(seed);
    }
    Ok(config)
}

fn run_headless(mut controller: Controller, frames: u32, frame_ms: f64) -> Result<()> {
    let frame_length = Duration::try_from_secs_f64(frame_ms / 1_000.0)
        .with_context(|| format!("invalid frame duration {frame_ms} ms"))?;

    let mut events = Vec::new();
    controller.start(&mut events);
    if controller.is_paused() {
        controller.apply(Command::Input(InputEvent::KeyUp(Key::Enter)), &mut events);
    }
    log_events(&mut events);

    let mut now = Duration::ZERO;
    let mut ran = 0;
    while ran < frames && controller.scheduler_mut().take_pending().is_some() {
        now += frame_length;
        controller.apply(
            Command::Frame {
                timestamp: Some(now),
            },
            &mut events,
        );
        log_events(&mut events);
        ran += 1;
    }

    let length = controller
        .playfield()
        .map_or(0, |playfield| query::snake(playfield).body().len());
    info!(
        frames = ran,
        score = controller.score(),
        length,
        game_count = controller.game_count(),
        dead = controller.is_game_over(),
        "headless run finished"
    );
    controller.tear_down();
    Ok(())
}

fn run_windowed(mut controller: Controller, canvas: LayeredCanvas) -> Result<()> {
    let config = controller.config().clone();
    let mut events = Vec::new();
    controller.start(&mut events);
    log_events(&mut events);

    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from(canvas_snake_core::Color::BACKGROUND),
        Scene::new(config.width(), config.height()),
    );

    MacroquadBackend::new()
        .with_vsync(true)
        .run(presentation, move |input: FrameInput, scene: &mut Scene| {
            for event in input.events {
                controller.apply(Command::Input(event), &mut events);
            }
            if controller.scheduler_mut().take_pending().is_some() {
                controller.apply(
                    Command::Frame {
                        timestamp: Some(input.elapsed),
                    },
                    &mut events,
                );
            }
            log_events(&mut events);
            scene.shapes = canvas.composite();
        })
}

fn log_events(events: &mut Vec<Event>) {
    for event in events.drain(..) {
        match event {
            Event::FrameRequested { .. } | Event::SnakeAdvanced { .. } => {}
            other => debug!(event = ?other, "game event"),
        }
    }
}
