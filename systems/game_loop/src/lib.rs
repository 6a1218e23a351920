#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame sequencing, pause and restart handling for Canvas Snake.
//!
//! [`GameController`] owns one game session at a time. Each frame it updates
//! the HUD, advances the snake, runs the food and wall checks against the
//! snake, then asks the host scheduler for another frame. Once the snake is
//! dead it shows the game-over screen and stops scheduling until the restart
//! key is released.

use std::time::Duration;

use canvas_snake_core::{
    Command, ConfigError, Event, FrameHandle, FrameScheduler, GameConfig, InputEvent, Key,
    PauseState, ScoreStore, SurfaceProvider,
};
use canvas_snake_system_hud::Hud;
use canvas_snake_world::{query, Playfield};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

const FALLBACK_SEED: u64 = 0x0c0f_fee5_5a4e_6b65;

struct Session {
    playfield: Playfield,
    hud: Hud,
}

/// Drives a game session from host commands.
///
/// Host collaborators are injected: the surface provider hands out layers to
/// entities, the scheduler stands in for the display's frame callback and the
/// store keeps the high score between runs.
pub struct GameController<P, S, H>
where
    P: SurfaceProvider,
    S: FrameScheduler,
    H: ScoreStore,
{
    config: GameConfig,
    provider: P,
    scheduler: S,
    store: H,
    rng: ChaCha8Rng,
    session: Option<Session>,
    pause: PauseState,
    game_count: u32,
    show_debug: bool,
    pending_frame: Option<FrameHandle>,
    halted: bool,
}

impl<P, S, H> GameController<P, S, H>
where
    P: SurfaceProvider,
    S: FrameScheduler,
    H: ScoreStore,
{
    /// Validates the configuration and sets up the first game.
    ///
    /// No frame is requested until [`GameController::start`] runs.
    pub fn new(config: GameConfig, provider: P, scheduler: S, store: H) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or(FALLBACK_SEED);
        let mut controller = Self {
            pause: PauseState::from_paused(config.start_paused),
            show_debug: config.show_debug,
            config,
            provider,
            scheduler,
            store,
            rng: ChaCha8Rng::seed_from_u64(seed),
            session: None,
            game_count: 1,
            pending_frame: None,
            halted: false,
        };
        controller.set_up();
        Ok(controller)
    }

    /// Runs the first frame, which schedules every following one.
    pub fn start(&mut self, out_events: &mut Vec<Event>) {
        self.run_frame(None, out_events);
    }

    /// Executes a host command and reports what happened.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        match command {
            Command::Frame { timestamp } => {
                self.pending_frame = None;
                self.run_frame(timestamp, out_events);
            }
            Command::Input(input) => self.handle_input(input, out_events),
        }
    }

    /// Tears down every entity and withdraws the pending frame.
    ///
    /// Commands received afterwards, restart included, have no effect.
    pub fn tear_down(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(mut session) = self.session.take() {
            self.show_debug = session.hud.is_debug_enabled();
            session.playfield.tear_down();
            session.hud.tear_down();
        }
    }

    /// Configuration the controller was built with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ordinal of the current game, starting at 1.
    #[must_use]
    pub const fn game_count(&self) -> u32 {
        self.game_count
    }

    /// Current pause state.
    #[must_use]
    pub const fn pause_state(&self) -> PauseState {
        self.pause
    }

    /// Reports whether the game is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Frame requested from the scheduler and not yet run.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Reports whether scheduling stopped on game over.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Entities of the current game, `None` once torn down.
    #[must_use]
    pub fn playfield(&self) -> Option<&Playfield> {
        self.session.as_ref().map(|session| &session.playfield)
    }

    /// HUD of the current game, `None` once torn down.
    #[must_use]
    pub fn hud(&self) -> Option<&Hud> {
        self.session.as_ref().map(|session| &session.hud)
    }

    /// Meals eaten in the current game.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.playfield().map_or(0, query::eat_count)
    }

    /// Reports whether the snake of the current game has died.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.playfield().is_some_and(query::is_game_over)
    }

    /// Host scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable access to the host scheduler, used by adapters to drain frames.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Persisted high score store.
    #[must_use]
    pub const fn store(&self) -> &H {
        &self.store
    }

    fn set_up(&mut self) {
        let food_rng = ChaCha8Rng::seed_from_u64(self.rng.gen());
        let playfield = Playfield::new(&self.config, &mut self.provider, food_rng);
        let mut hud = Hud::new(&self.config, &mut self.provider, &self.store, self.game_count);
        hud.set_debug(self.show_debug);
        self.session = Some(Session { playfield, hud });
        self.halted = false;
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.tear_down();
        self.game_count = self.game_count.saturating_add(1);
        self.set_up();
        info!(game_count = self.game_count, "game restarted");
        out_events.push(Event::GameRestarted {
            game_count: self.game_count,
        });
        self.run_frame(None, out_events);
    }

    fn handle_input(&mut self, input: InputEvent, out_events: &mut Vec<Event>) {
        let pause = self.pause;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match input {
            InputEvent::KeyDown(key) if key.direction().is_some() => {
                session.playfield.steer(key, pause);
            }
            InputEvent::KeyUp(Key::Enter) => {
                if query::is_game_over(&session.playfield) {
                    self.restart(out_events);
                } else {
                    self.pause = self.pause.toggled();
                    debug!(paused = self.pause.is_paused(), "pause toggled");
                    out_events.push(Event::PauseToggled {
                        paused: self.pause.is_paused(),
                    });
                }
            }
            InputEvent::PointerMoved { x, y } => session.hud.pointer_moved(x, y),
            InputEvent::PointerPressed { x, y } => session.hud.pointer_pressed(x, y),
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
    }

    fn run_frame(&mut self, timestamp: Option<Duration>, out_events: &mut Vec<Event>) {
        let pause = self.pause;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let score = query::eat_count(&session.playfield);
        if score != session.hud.score() {
            out_events.push(Event::ScoreChanged { score });
        }
        if let Some(event) = session.hud.set_score(score, &mut self.store) {
            out_events.push(event);
        }

        if query::is_game_over(&session.playfield) {
            session.hud.set_game_over(true);
            session.hud.draw(timestamp, pause.is_paused());
            if !self.halted {
                self.halted = true;
                out_events.push(Event::LoopHalted);
            }
            return;
        }

        session.hud.draw(timestamp, pause.is_paused());
        session.playfield.draw(timestamp, pause, out_events);
        session.playfield.resolve_collisions(out_events);

        let handle = self.scheduler.request_frame();
        self.pending_frame = Some(handle);
        out_events.push(Event::FrameRequested { handle });
    }
}
