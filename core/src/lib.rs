#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Canvas Snake engine.
//!
//! This crate defines the message surface that connects adapters, the entity
//! world, and the game loop. Adapters submit [`Command`] values (animation
//! frames and input), the game loop executes them via its `apply` entry point,
//! and then broadcasts [`Event`] values describing what happened. Collision
//! checks never invoke callbacks: they return [`CollisionEvent`] values that
//! the loop routes to the entity owning the addressed [`ColliderTag`].

pub mod config;
pub mod host;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, GameConfig};
pub use host::{
    FrameHandle, FrameScheduler, Layer, RenderSurface, ScoreStore, ScoreStoreError,
    SurfaceProvider, TextAlign, TextBaseline, TextStyle,
};

/// Title shown by windowed adapters.
pub const WINDOW_TITLE: &str = "Canvas Snake";

/// Commands that drive the game loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Runs one animation frame.
    Frame {
        /// Host timestamp of the frame measured from an arbitrary origin, if known.
        timestamp: Option<Duration>,
    },
    /// Delivers a single input event from the host.
    Input(InputEvent),
}

/// Events broadcast by the game loop after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// The snake stepped forward by one cell.
    SnakeAdvanced {
        /// Cell occupied by the new head.
        head: GridCell,
        /// Tail segment dropped by the step, if the snake was not growing.
        removed: Option<GridCell>,
    },
    /// The snake ate and its target length increased.
    SnakeGrew {
        /// Length the body will reach once growth completes.
        target_length: usize,
    },
    /// The food was eaten and respawned elsewhere.
    FoodEaten {
        /// Cell the food occupied when eaten.
        from: GridCell,
        /// Cell the food respawned on.
        to: GridCell,
        /// Number of times food has been eaten this game.
        eat_count: u32,
    },
    /// The snake entered its terminal state.
    SnakeDied {
        /// Collider part the snake ran into.
        cause: ColliderTag,
    },
    /// The pause flag flipped.
    PauseToggled {
        /// Whether the game is paused after the toggle.
        paused: bool,
    },
    /// A new game replaced the previous one.
    GameRestarted {
        /// Ordinal of the game that just started.
        game_count: u32,
    },
    /// The score reported to the HUD changed.
    ScoreChanged {
        /// Current score.
        score: u32,
    },
    /// The persisted high score was raised.
    HighScoreChanged {
        /// New high score.
        high_score: u32,
    },
    /// Another frame was requested from the host scheduler.
    FrameRequested {
        /// Handle identifying the pending frame.
        handle: FrameHandle,
    },
    /// The loop stopped requesting frames because the game is over.
    LoopHalted,
}

/// Input events delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The pointer moved over the game surface.
    PointerMoved {
        /// Horizontal pointer position in world units.
        x: i32,
        /// Vertical pointer position in world units.
        y: i32,
    },
    /// The primary pointer button went down over the game surface.
    PointerPressed {
        /// Horizontal pointer position in world units.
        x: i32,
        /// Vertical pointer position in world units.
        y: i32,
    },
}

/// Keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Steer west.
    ArrowLeft,
    /// Steer east.
    ArrowRight,
    /// Steer north.
    ArrowUp,
    /// Steer south.
    ArrowDown,
    /// Toggle pause, or restart once the game is over.
    Enter,
}

impl Key {
    /// Direction selected by an arrow key.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::ArrowLeft => Some(Direction::West),
            Self::ArrowRight => Some(Direction::East),
            Self::ArrowUp => Some(Direction::North),
            Self::ArrowDown => Some(Direction::South),
            Self::Enter => None,
        }
    }
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing y.
    North,
    /// Movement toward increasing x.
    East,
    /// Movement toward increasing y.
    South,
    /// Movement toward decreasing x.
    West,
}

/// Location of a grid cell expressed in world units.
///
/// Playable cells are multiples of the grid size inside `[0, width) x [0, height)`;
/// the wall ring sits one cell outside, so coordinates are signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    x: i32,
    y: i32,
}

impl GridCell {
    /// Creates a cell at the provided world-unit coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Creates a cell from column and row indices scaled by the grid size.
    #[must_use]
    pub const fn from_indices(column: i32, row: i32, grid_size: i32) -> Self {
        Self {
            x: column.wrapping_mul(grid_size),
            y: row.wrapping_mul(grid_size),
        }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell reached by applying a step vector.
    #[must_use]
    pub const fn offset(self, vector: StepVector) -> Self {
        Self {
            x: self.x.wrapping_add(vector.dx),
            y: self.y.wrapping_add(vector.dy),
        }
    }

    /// Interned key used for set membership tests.
    #[must_use]
    pub const fn key(self) -> CellKey {
        CellKey(((self.x as u32 as u64) << 32) | self.y as u32 as u64)
    }

    /// Reports whether both coordinates are multiples of the grid size.
    #[must_use]
    pub fn is_aligned(self, grid_size: i32) -> bool {
        grid_size != 0 && self.x % grid_size == 0 && self.y % grid_size == 0
    }
}

/// Opaque hashable identity of a [`GridCell`].
///
/// Both coordinates are packed into a single integer, so distinct cells never
/// share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey(u64);

impl CellKey {
    /// Recovers the cell encoded by the key.
    #[must_use]
    pub const fn cell(self) -> GridCell {
        GridCell {
            x: (self.0 >> 32) as u32 as i32,
            y: self.0 as u32 as i32,
        }
    }

    /// Raw packed representation.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<GridCell> for CellKey {
    fn from(cell: GridCell) -> Self {
        cell.key()
    }
}

/// Per-step displacement of the snake head in world units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepVector {
    dx: i32,
    dy: i32,
}

impl StepVector {
    /// Builds a vector of `distance` world units pointing in `direction`.
    #[must_use]
    pub const fn toward(direction: Direction, distance: i32) -> Self {
        match direction {
            Direction::North => Self {
                dx: 0,
                dy: -distance,
            },
            Direction::East => Self {
                dx: distance,
                dy: 0,
            },
            Direction::South => Self {
                dx: 0,
                dy: distance,
            },
            Direction::West => Self {
                dx: -distance,
                dy: 0,
            },
        }
    }

    /// Horizontal displacement.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Vertical displacement.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }
}

/// Closed set of collider owners and sub-parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColliderTag {
    /// Entire snake body, head included.
    Snake,
    /// The single food cell.
    Food,
    /// Static boundary ring.
    Wall,
    /// Snake head only, used for self-collision.
    SnakeHead,
    /// Snake body without the head, used for self-collision.
    SnakeTail,
}

impl ColliderTag {
    /// Entity responsible for reacting to results addressed to this tag.
    #[must_use]
    pub const fn owner(self) -> EntityKind {
        match self {
            Self::Snake | Self::SnakeHead | Self::SnakeTail => EntityKind::Snake,
            Self::Food => EntityKind::Food,
            Self::Wall => EntityKind::Wall,
        }
    }
}

/// Entities that own colliders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled snake.
    Snake,
    /// The food pellet.
    Food,
    /// The boundary wall.
    Wall,
}

/// Result of an overlap test, addressed to a single collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Collider that was hit; its owner applies the event.
    pub target: ColliderTag,
    /// Collider it overlapped with.
    pub source: ColliderTag,
}

impl CollisionEvent {
    /// Creates a collision result addressed to `target`.
    #[must_use]
    pub const fn new(target: ColliderTag, source: ColliderTag) -> Self {
        Self { target, source }
    }
}

/// Life cycle of the snake.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnakeLife {
    /// Moving and reacting to input.
    #[default]
    Alive,
    /// Terminal state; only a full restart replaces the snake.
    Dead,
}

impl SnakeLife {
    /// Transitions `Alive` into `Dead`.
    pub const fn die(self) -> Result<Self, TransitionError> {
        match self {
            Self::Alive => Ok(Self::Dead),
            Self::Dead => Err(TransitionError::AlreadyDead),
        }
    }

    /// Reports whether the snake reached the terminal state.
    #[must_use]
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Pause flag orthogonal to the snake's life cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseState {
    /// Movement proceeds normally.
    #[default]
    Running,
    /// Movement and steering are suspended.
    Paused,
}

impl PauseState {
    /// Flips between the two states; never fails.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Running => Self::Paused,
            Self::Paused => Self::Running,
        }
    }

    /// Reports whether movement is suspended.
    #[must_use]
    pub const fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Builds the state matching a boolean pause flag.
    #[must_use]
    pub const fn from_paused(paused: bool) -> Self {
        if paused {
            Self::Paused
        } else {
            Self::Running
        }
    }
}

/// State transitions rejected because they would not change anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TransitionError {
    /// The snake is already dead.
    #[error("snake is already dead")]
    AlreadyDead,
}

/// RGBA color with byte channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

impl Color {
    /// Opaque snake body color.
    pub const SNAKE: Self = Self::from_rgb(0x00, 0x80, 0x00);
    /// Opaque food color.
    pub const FOOD: Self = Self::from_rgb(0xff, 0x00, 0x00);
    /// Grid line color.
    pub const GRID_LINE: Self = Self::from_rgb(0xff, 0xff, 0xff);
    /// Background behind the playfield.
    pub const BACKGROUND: Self = Self::from_rgb(0xf5, 0xf5, 0xf5);
    /// Default HUD text color.
    pub const TEXT: Self = Self::from_rgb(0x00, 0x00, 0x00);
    /// Text drawn over translucent overlays.
    pub const OVERLAY_TEXT: Self = Self::from_rgb(0xff, 0xff, 0xff);
    /// Translucent backdrop used by the pause and game-over screens.
    pub const OVERLAY: Self = Self::from_rgba(0x00, 0x00, 0x00, 0xbf);
    /// Fill of a ticked option checkbox.
    pub const CHECKBOX: Self = Self::from_rgb(0x00, 0x80, 0x00);

    /// Creates an opaque color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::from_rgba(red, green, blue, 0xff)
    }

    /// Creates a color from byte RGBA components.
    #[must_use]
    pub const fn from_rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Alpha component of the color.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }
}
