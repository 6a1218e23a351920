#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Canvas Snake.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter draws the flattened shape list of a [`Scene`] scaled into the
//! window, and turns keyboard and mouse observations into game input events
//! expressed in world units.

use anyhow::{Context, Result};
use canvas_snake_core::{InputEvent, Key, TextAlign, TextBaseline};
use canvas_snake_rendering::{
    Color, FilledRect, FrameInput, Presentation, RenderingBackend, Scene, Shape, TextRun,
    Viewport,
};
use glam::Vec2;
use macroquad::input::{
    is_key_pressed, is_key_released, is_mouse_button_pressed, mouse_position, KeyCode,
    MouseButton,
};
use std::{sync::mpsc, time::Duration};
use tracing::info;

/// Arrow keys polled each frame, paired with the game key they produce.
const ARROW_KEYS: [(KeyCode, Key); 4] = [
    (KeyCode::Left, Key::ArrowLeft),
    (KeyCode::Right, Key::ArrowRight),
    (KeyCode::Up, Key::ArrowUp),
    (KeyCode::Down, Key::ArrowDown),
];

/// Raw input observed by the backend during one display frame.
#[doc(hidden)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// Keys that went down this frame, in polling order.
    pub keys_pressed: Vec<Key>,
    /// Keys that went up this frame, in polling order.
    pub keys_released: Vec<Key>,
    /// Cursor position in screen pixels.
    pub cursor: Vec2,
    /// Whether the primary mouse button went down this frame.
    pub primary_pressed: bool,
}

/// Converts per-frame observations into game input events.
///
/// Pointer events are only reported while the cursor is over the game area,
/// and movement is only reported when the world position actually changes.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTranslator {
    last_pointer: Option<(i32, i32)>,
}

impl InputTranslator {
    /// Returns the events implied by `observations` for a scene of `world`
    /// size drawn through `viewport`.
    pub fn translate(
        &mut self,
        observations: &InputObservations,
        viewport: &Viewport,
        world: Vec2,
    ) -> Vec<InputEvent> {
        let mut events: Vec<InputEvent> = observations
            .keys_pressed
            .iter()
            .copied()
            .map(InputEvent::KeyDown)
            .collect();
        events.extend(
            observations
                .keys_released
                .iter()
                .copied()
                .map(InputEvent::KeyUp),
        );

        let position = viewport.to_world(observations.cursor);
        let inside = position.x >= 0.0
            && position.y >= 0.0
            && position.x < world.x
            && position.y < world.y;
        if !inside {
            self.last_pointer = None;
            return events;
        }

        let (x, y) = (position.x.floor() as i32, position.y.floor() as i32);
        if self.last_pointer != Some((x, y)) {
            self.last_pointer = Some((x, y));
            events.push(InputEvent::PointerMoved { x, y });
        }
        if observations.primary_pressed {
            events.push(InputEvent::PointerPressed { x, y });
        }
        events
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

fn poll_observations() -> InputObservations {
    let keys_pressed = ARROW_KEYS
        .iter()
        .filter(|(code, _)| is_key_pressed(*code))
        .map(|(_, key)| *key)
        .collect();
    let keys_released = if is_key_released(KeyCode::Enter) {
        vec![Key::Enter]
    } else {
        Vec::new()
    };
    let (cursor_x, cursor_y) = mouse_position();

    InputObservations {
        keys_pressed,
        keys_released,
        cursor: Vec2::new(cursor_x, cursor_y),
        primary_pressed: is_mouse_button_pressed(MouseButton::Left),
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let _ = Viewport::fit(scene.size(), scene.size())
            .context("scene cannot be presented")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.width,
            window_height: scene.height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (error_sender, error_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut translator = InputTranslator::default();
            let mut fps_counter = FpsCounter::default();
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let screen = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let viewport = match Viewport::fit(scene.size(), screen)
                    .context("scene lost its extent")
                {
                    Ok(viewport) => viewport,
                    Err(error) => {
                        let _ = error_sender.send(Err(error));
                        return;
                    }
                };

                let observations = poll_observations();
                let frame_input = FrameInput {
                    elapsed: Duration::from_secs_f64(macroquad::time::get_time().max(0.0)),
                    events: translator.translate(&observations, &viewport, scene.size()),
                };
                update_scene(frame_input, &mut scene);

                macroquad::window::clear_background(background);
                draw_scene(&scene, &viewport);

                let frame_dt =
                    Duration::from_secs_f32(macroquad::time::get_frame_time().max(0.0));
                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        error_receiver.try_recv().unwrap_or(Ok(()))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn draw_scene(scene: &Scene, viewport: &Viewport) {
    for shape in &scene.shapes {
        match shape {
            Shape::Rect(rect) => draw_rect(rect, viewport),
            Shape::Text(run) => draw_text_run(run, viewport),
        }
    }
}

fn draw_rect(rect: &FilledRect, viewport: &Viewport) {
    let origin = viewport.to_screen(Vec2::new(rect.x as f32, rect.y as f32));
    let scale = viewport.scale();
    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        rect.width as f32 * scale,
        rect.height as f32 * scale,
        to_macroquad_color(Color::from(rect.color)),
    );
}

fn draw_text_run(run: &TextRun, viewport: &Viewport) {
    let font_size = scaled_font_size(run.style.size, viewport.scale());
    let dimensions = macroquad::text::measure_text(&run.text, None, font_size, 1.0);
    let anchor = viewport.to_screen(Vec2::new(run.x as f32, run.y as f32));
    let origin = text_origin(
        anchor,
        Vec2::new(dimensions.width, dimensions.height),
        dimensions.offset_y,
        run.style.align,
        run.style.baseline,
    );
    macroquad::text::draw_text(
        &run.text,
        origin.x,
        origin.y,
        f32::from(font_size),
        to_macroquad_color(Color::from(run.style.color)),
    );
}

fn scaled_font_size(size: u16, scale: f32) -> u16 {
    let scaled = (f32::from(size) * scale).round();
    scaled.clamp(1.0, f32::from(u16::MAX)) as u16
}

/// Baseline-left position macroquad expects for text anchored at `anchor`.
fn text_origin(
    anchor: Vec2,
    extent: Vec2,
    ascent: f32,
    align: TextAlign,
    baseline: TextBaseline,
) -> Vec2 {
    let x = match align {
        TextAlign::Left => anchor.x,
        TextAlign::Center => anchor.x - extent.x * 0.5,
        TextAlign::Right => anchor.x - extent.x,
    };
    let y = match baseline {
        TextBaseline::Top => anchor.y + ascent,
        TextBaseline::Middle => anchor.y + ascent - extent.y * 0.5,
    };
    Vec2::new(x, y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_aligned_top_text_ends_at_anchor() {
        let origin = text_origin(
            Vec2::new(100.0, 40.0),
            Vec2::new(30.0, 12.0),
            10.0,
            TextAlign::Right,
            TextBaseline::Top,
        );

        assert_eq!(origin, Vec2::new(70.0, 50.0));
    }

    #[test]
    fn centered_middle_text_straddles_anchor() {
        let origin = text_origin(
            Vec2::new(600.0, 300.0),
            Vec2::new(80.0, 20.0),
            16.0,
            TextAlign::Center,
            TextBaseline::Middle,
        );

        assert_eq!(origin, Vec2::new(560.0, 306.0));
    }

    #[test]
    fn font_size_follows_viewport_scale() {
        assert_eq!(scaled_font_size(20, 0.5), 10);
        assert_eq!(scaled_font_size(20, 1.5), 30);
        assert_eq!(scaled_font_size(20, 0.0), 1);
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();
        let frame = Duration::from_millis(250);

        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), None);
        assert_eq!(counter.record_frame(frame), Some(4.0));
        assert_eq!(counter.record_frame(frame), None);
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let converted = to_macroquad_color(Color::new(0.25, 0.5, 0.75, 1.0));

        assert_eq!(
            (converted.r, converted.g, converted.b, converted.a),
            (0.25, 0.5, 0.75, 1.0)
        );
    }
}
