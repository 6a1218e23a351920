//! Contracts implemented by the host environment.
//!
//! The game core never reaches for a window, a clock or a storage slot on its
//! own. Everything it needs from the outside world is injected through the
//! traits in this module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Stacking order of entity surfaces, bottom first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    /// Snake and food share the background layer.
    Playfield,
    /// Grid lines drawn above the playfield.
    Grid,
    /// Score and overlay screens drawn on top of everything.
    Hud,
}

impl Layer {
    /// All layers in compositing order.
    pub const ORDER: [Layer; 3] = [Layer::Playfield, Layer::Grid, Layer::Hud];
}

/// Horizontal anchoring of drawn text relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Position marks the left edge.
    Left,
    /// Position marks the horizontal center.
    Center,
    /// Position marks the right edge.
    #[default]
    Right,
}

/// Vertical anchoring of drawn text relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Position marks the top of the text box.
    #[default]
    Top,
    /// Position marks the vertical middle of the text box.
    Middle,
}

/// Styling applied by [`RenderSurface::fill_text`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// Fill color of the glyphs.
    pub color: Color,
    /// Font size in world units.
    pub size: u16,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Vertical anchoring.
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// Creates a style with explicit anchoring.
    #[must_use]
    pub const fn new(color: Color, size: u16, align: TextAlign, baseline: TextBaseline) -> Self {
        Self {
            color,
            size,
            align,
            baseline,
        }
    }
}

/// Exclusive 2D raster surface owned by a single entity.
pub trait RenderSurface {
    /// Width of the surface in world units.
    fn width(&self) -> i32;

    /// Height of the surface in world units.
    fn height(&self) -> i32;

    /// Erases everything inside the rectangle.
    fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Paints the rectangle with a solid color.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color);

    /// Draws a single line of text anchored at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle);

    /// Erases the whole surface.
    fn clear(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.clear_rect(0, 0, width, height);
    }
}

/// Factory handing out layered surfaces to entities.
///
/// Dropping a surface detaches it from the host; nothing drawn on it remains
/// visible afterwards.
pub trait SurfaceProvider {
    /// Creates a new surface on `layer` sized to the game area.
    fn create_surface(&mut self, layer: Layer, width: i32, height: i32) -> Box<dyn RenderSurface>;
}

/// Identifier of a frame requested from the host scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Display-synchronised frame scheduling supplied by the host.
pub trait FrameScheduler {
    /// Asks the host to run one more frame.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraws a previously requested frame if it has not run yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Single persisted slot holding the best score ever reached.
pub trait ScoreStore {
    /// Reads the stored high score, `None` when nothing was stored yet.
    fn load_high_score(&self) -> Result<Option<u32>, ScoreStoreError>;

    /// Overwrites the stored high score.
    fn store_high_score(&mut self, high_score: u32) -> Result<(), ScoreStoreError>;
}

/// Failures reported by a [`ScoreStore`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScoreStoreError {
    /// The backing storage could not be read or written.
    #[error("high score storage unavailable: {reason}")]
    Unavailable {
        /// Description of the underlying failure.
        reason: String,
    },
    /// The stored value is not a valid score.
    #[error("stored high score `{value}` is not a valid score")]
    Corrupt {
        /// Raw stored value.
        value: String,
    },
}
