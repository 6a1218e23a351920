#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Canvas Snake adapters.

mod canvas;

use anyhow::Result as AnyResult;
use canvas_snake_core::{FrameHandle, FrameScheduler, InputEvent};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

pub use canvas::{FilledRect, LayeredCanvas, RetainedSurface, Shape, TextRun};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl From<canvas_snake_core::Color> for Color {
    fn from(color: canvas_snake_core::Color) -> Self {
        Self::new(
            f32::from(color.red()) / 255.0,
            f32::from(color.green()) / 255.0,
            f32::from(color.blue()) / 255.0,
            f32::from(color.alpha()) / 255.0,
        )
    }
}

/// Input gathered by adapters during one display frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Time elapsed since the backend started.
    pub elapsed: Duration,
    /// Input events observed since the previous frame, in arrival order.
    pub events: Vec<InputEvent>,
}

/// Everything a backend draws in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width of the game area in world units.
    pub width: i32,
    /// Height of the game area in world units.
    pub height: i32,
    /// Primitives to draw, bottom first.
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Creates an empty scene of the provided extent.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
        }
    }

    /// Size of the game area as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Canvas Snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the elapsed time and the
    /// input captured during the display frame, and replaces the scene
    /// contents before they are drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Frame scheduler holding at most one pending frame.
///
/// Backends drain it once per display frame; a request made while a frame is
/// already pending replaces it.
#[derive(Clone, Debug, Default)]
pub struct FrameQueue {
    issued: u64,
    pending: Option<FrameHandle>,
}

impl FrameQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the frame waiting to run, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Removes and returns the pending frame.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.issued += 1;
        let handle = FrameHandle::new(self.issued);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Uniform scale and offset fitting the world into a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    /// Fits `world` into `screen`, preserving aspect ratio and centering.
    pub fn fit(world: Vec2, screen: Vec2) -> Result<Self, RenderingError> {
        if world.x <= 0.0 || world.y <= 0.0 {
            return Err(RenderingError::EmptyWorld {
                width: world.x,
                height: world.y,
            });
        }
        let scale = (screen.x / world.x).min(screen.y / world.y).max(0.0);
        let offset = (screen - world * scale) * 0.5;
        Ok(Self { scale, offset })
    }

    /// Screen pixels per world unit.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Screen position of the world origin.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Converts a world position into screen pixels.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }

    /// Converts a screen position into world units.
    #[must_use]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        if self.scale == 0.0 {
            return Vec2::ZERO;
        }
        (screen - self.offset) / self.scale
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The world must have a positive extent to be fitted into a window.
    EmptyWorld {
        /// Provided world width.
        width: f32,
        /// Provided world height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWorld { width, height } => {
                write!(
                    f,
                    "world extent must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
