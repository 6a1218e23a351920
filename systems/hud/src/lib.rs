#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Heads-up display drawn above the playfield.
//!
//! The HUD shows the running score, the pause and game-over screens and an
//! optional debug overlay. It owns no game state beyond what it displays; the
//! game loop pushes the score, the game-over flag and pointer input into it.

mod store;

use std::{fmt, time::Duration};

use canvas_snake_core::{
    Color, Event, GameConfig, Layer, RenderSurface, ScoreStore, SurfaceProvider, TextAlign,
    TextBaseline, TextStyle,
};
use tracing::{info, warn};

pub use store::MemoryScoreStore;

const DEBUG_OPTION_LABEL: &str = "Show Debug Info";
const CHECKBOX_INSET: i32 = 5;

/// Screen shown by the most recent draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    /// Score in the top-right corner over the running game.
    #[default]
    Score,
    /// Translucent pause overlay with the options menu.
    Paused,
    /// Translucent game-over overlay with the final score.
    GameOver,
}

#[derive(Clone, Copy, Debug, Default)]
struct DebugOverlay {
    enabled: bool,
    pointer: (i32, i32),
    last_timestamp: Option<Duration>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// Score display, overlay screens and debug information.
pub struct Hud {
    grid_size: i32,
    width: i32,
    height: i32,
    score: u32,
    high_score: u32,
    game_over: bool,
    game_count: u32,
    screen: Screen,
    debug: DebugOverlay,
    surface: Option<Box<dyn RenderSurface>>,
}

impl Hud {
    /// Creates the HUD on the top layer and reads the persisted high score.
    ///
    /// A failing store is logged and treated as holding no score.
    #[must_use]
    pub fn new(
        config: &GameConfig,
        provider: &mut dyn SurfaceProvider,
        store: &dyn ScoreStore,
        game_count: u32,
    ) -> Self {
        let high_score = match store.load_high_score() {
            Ok(stored) => stored.unwrap_or(0),
            Err(error) => {
                warn!(%error, "could not read high score, starting from zero");
                0
            }
        };
        let surface = provider.create_surface(Layer::Hud, config.width(), config.height());

        Self {
            grid_size: config.grid_size,
            width: config.width(),
            height: config.height(),
            score: 0,
            high_score,
            game_over: false,
            game_count,
            screen: Screen::Score,
            debug: DebugOverlay {
                enabled: config.show_debug,
                ..DebugOverlay::default()
            },
            surface: Some(surface),
        }
    }

    /// Score of the current game.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Best score known to the HUD.
    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Ordinal of the game being displayed.
    #[must_use]
    pub const fn game_count(&self) -> u32 {
        self.game_count
    }

    /// Screen shown by the most recent draw.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// Reports whether the debug overlay is shown.
    #[must_use]
    pub const fn is_debug_enabled(&self) -> bool {
        self.debug.enabled
    }

    /// Last pointer position reported by the host.
    #[must_use]
    pub const fn pointer(&self) -> (i32, i32) {
        self.debug.pointer
    }

    /// Shows or hides the debug overlay.
    pub fn set_debug(&mut self, enabled: bool) {
        self.debug.enabled = enabled;
    }

    /// Switches the HUD to the game-over screen.
    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    /// Records the current score, persisting it when it beats the high score.
    ///
    /// Returns the raised high score, if any. Write failures are logged and
    /// the in-memory high score is raised regardless.
    pub fn set_score(&mut self, score: u32, store: &mut dyn ScoreStore) -> Option<Event> {
        self.score = score;
        if score <= self.high_score {
            return None;
        }

        self.high_score = score;
        if let Err(error) = store.store_high_score(score) {
            warn!(%error, high_score = score, "could not persist high score");
        }
        info!(high_score = score, "new high score");
        Some(Event::HighScoreChanged { high_score: score })
    }

    /// Tracks the pointer for the debug overlay.
    pub fn pointer_moved(&mut self, x: i32, y: i32) {
        self.debug.pointer = (x, y);
    }

    /// Toggles the debug option when its entry on the pause screen is hit.
    pub fn pointer_pressed(&mut self, x: i32, y: i32) {
        if self.screen != Screen::Paused {
            return;
        }
        let (label, checkbox) = self.debug_option_bounds();
        let hit_box = Rect {
            x: checkbox.x - CHECKBOX_INSET,
            y: checkbox.y - CHECKBOX_INSET,
            width: label.x + label.width - (checkbox.x - CHECKBOX_INSET),
            height: self.grid_size,
        };
        if hit_box.contains(x, y) {
            self.debug.enabled = !self.debug.enabled;
            info!(enabled = self.debug.enabled, "debug overlay toggled");
        }
    }

    /// Redraws the HUD for the current frame.
    pub fn draw(&mut self, timestamp: Option<Duration>, paused: bool) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        surface.clear();

        if self.debug.enabled {
            self.render_debug(surface.as_mut(), timestamp);
        }

        self.screen = if self.game_over {
            self.render_game_over(surface.as_mut());
            Screen::GameOver
        } else if paused {
            self.render_pause(surface.as_mut());
            Screen::Paused
        } else {
            self.render_score(surface.as_mut());
            Screen::Score
        };

        self.surface = Some(surface);
    }

    /// Releases the render surface; later draws are no-ops.
    pub fn tear_down(&mut self) {
        self.surface = None;
    }

    /// Reports whether [`Hud::tear_down`] has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.surface.is_none()
    }

    fn font_size(&self) -> u16 {
        u16::try_from(self.grid_size).unwrap_or(u16::MAX)
    }

    fn default_style(&self) -> TextStyle {
        TextStyle::new(
            Color::TEXT,
            self.font_size(),
            TextAlign::Right,
            TextBaseline::Top,
        )
    }

    fn overlay_style(&self) -> TextStyle {
        TextStyle::new(
            Color::OVERLAY_TEXT,
            self.font_size(),
            TextAlign::Center,
            TextBaseline::Middle,
        )
    }

    fn render_overlay(&self, surface: &mut dyn RenderSurface) {
        surface.fill_rect(0, 0, self.width, self.height, Color::OVERLAY);
    }

    fn render_score(&self, surface: &mut dyn RenderSurface) {
        surface.fill_text(
            &self.score.to_string(),
            self.width - self.grid_size,
            self.grid_size,
            self.default_style(),
        );
    }

    fn render_pause(&self, surface: &mut dyn RenderSurface) {
        self.render_overlay(surface);
        let (center_x, center_y) = (self.width / 2, self.height / 2);
        surface.fill_text(
            "Paused",
            center_x,
            center_y - self.grid_size * 4,
            self.overlay_style(),
        );
        self.render_options(surface);
    }

    fn render_options(&self, surface: &mut dyn RenderSurface) {
        let (label, checkbox) = self.debug_option_bounds();
        surface.fill_rect(label.x, label.y, label.width, label.height, Color::OVERLAY);
        let checkbox_color = if self.debug.enabled {
            Color::CHECKBOX
        } else {
            Color::OVERLAY
        };
        surface.fill_rect(
            checkbox.x,
            checkbox.y,
            checkbox.width,
            checkbox.height,
            checkbox_color,
        );
        surface.fill_text(
            DEBUG_OPTION_LABEL,
            label.x + label.width / 2,
            label.y + self.grid_size / 2,
            self.overlay_style(),
        );
    }

    fn render_game_over(&self, surface: &mut dyn RenderSurface) {
        self.render_overlay(surface);
        let (center_x, center_y) = (self.width / 2, self.height / 2);
        let grid = self.grid_size;
        let lines = [
            ("Game Over".to_owned(), center_y - grid * 4),
            (format!("Score {}", self.score), center_y - grid * 2),
            (format!("High score {}", self.high_score), center_y - grid),
            ("Press Enter to".to_owned(), center_y + grid),
            ("Start a New Game".to_owned(), center_y + grid * 2),
            (format!("Game no. {}", self.game_count), center_y + grid * 4),
        ];
        for (text, y) in lines {
            surface.fill_text(&text, center_x, y, self.overlay_style());
        }
    }

    fn render_debug(&mut self, surface: &mut dyn RenderSurface, timestamp: Option<Duration>) {
        let (x, y) = self.debug.pointer;
        let mut lines = vec![format!("Mouse: {x}, {y}")];
        if let Some(now) = timestamp {
            if let Some(fps) = self
                .debug
                .last_timestamp
                .and_then(|last| frames_per_second(now.saturating_sub(last)))
            {
                lines.push(format!("FPS: {fps}"));
            }
            self.debug.last_timestamp = Some(now);
        }
        lines.push(format!("Game count: {}", self.game_count));

        let style = self.default_style();
        for (index, line) in (1..).zip(&lines) {
            surface.fill_text(
                line,
                self.width - self.grid_size,
                self.height - self.grid_size * index,
                style,
            );
        }
    }

    /// Label and checkbox rectangles of the debug option on the pause screen.
    fn debug_option_bounds(&self) -> (Rect, Rect) {
        let grid = self.grid_size;
        // Monospace glyphs advance roughly 0.6 em.
        let label_width = DEBUG_OPTION_LABEL.len() as i32 * grid * 3 / 5;
        let label = Rect {
            x: self.width / 2 - label_width / 2,
            y: self.height / 2 - grid,
            width: label_width,
            height: grid,
        };
        let checkbox = Rect {
            x: label.x - grid * 3 / 2 + CHECKBOX_INSET,
            y: label.y + CHECKBOX_INSET,
            width: grid - 2 * CHECKBOX_INSET,
            height: grid - 2 * CHECKBOX_INSET,
        };
        (label, checkbox)
    }
}

fn frames_per_second(frame_length: Duration) -> Option<u64> {
    let micros = frame_length.as_micros();
    if micros == 0 {
        return None;
    }
    u64::try_from(1_000_000 / micros).ok()
}

impl fmt::Debug for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hud")
            .field("score", &self.score)
            .field("high_score", &self.high_score)
            .field("game_over", &self.game_over)
            .field("game_count", &self.game_count)
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}
