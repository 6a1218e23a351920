//! The player-controlled snake.

use std::{collections::VecDeque, fmt, time::Duration};

use canvas_snake_core::{
    ColliderTag, CollisionEvent, Color, Direction, EntityKind, Event, GameConfig, GridCell, Key,
    Layer, PauseState, RenderSurface, SnakeLife, StepVector, SurfaceProvider, TransitionError,
};
use tracing::{debug, info, trace};

use crate::{collider::SpatialCollider, entity::GridEntity};

const ORIGIN: GridCell = GridCell::new(0, 0);

/// Body segments, movement vector and growth state of the snake.
///
/// The head is the front of the body. Each move pushes a new head and pops
/// the tail once the body has reached its target length, so eating lengthens
/// the snake by one segment on the following move.
pub struct Snake {
    grid_size: i32,
    life: SnakeLife,
    vector: StepVector,
    body: VecDeque<GridCell>,
    target_length: usize,
    time_factor: f64,
    time_factor_step: f64,
    last_step: Option<Duration>,
    colliders: Option<SnakeColliders>,
    surface: Option<Box<dyn RenderSurface>>,
}

struct SnakeColliders {
    body: SpatialCollider,
    head: SpatialCollider,
    tail: SpatialCollider,
}

impl Snake {
    /// Creates a snake at the origin heading east, drawing on its own surface.
    #[must_use]
    pub fn new(config: &GameConfig, provider: &mut dyn SurfaceProvider) -> Self {
        let surface = provider.create_surface(Layer::Playfield, config.width(), config.height());
        let mut snake = Self {
            grid_size: config.grid_size,
            life: SnakeLife::Alive,
            vector: StepVector::toward(Direction::East, config.grid_size),
            body: VecDeque::from([ORIGIN]),
            target_length: config.initial_length,
            time_factor: config.initial_time_factor,
            time_factor_step: config.time_factor_step,
            last_step: None,
            colliders: Some(SnakeColliders {
                body: SpatialCollider::new(ColliderTag::Snake),
                head: SpatialCollider::new(ColliderTag::SnakeHead),
                tail: SpatialCollider::new(ColliderTag::SnakeTail),
            }),
            surface: Some(surface),
        };
        snake.refresh_colliders();
        snake
    }

    /// Replaces the body, head first, and sets the target length to its size.
    ///
    /// An empty sequence leaves the snake unchanged.
    #[must_use]
    pub fn with_body<I>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = GridCell>,
    {
        let body: VecDeque<GridCell> = segments.into_iter().collect();
        if body.is_empty() {
            return self;
        }
        self.target_length = body.len();
        self.body = body;
        self.refresh_colliders();
        self
    }

    /// Points the snake in `direction`.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.vector = StepVector::toward(direction, self.grid_size);
        self
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> GridCell {
        self.body.front().copied().unwrap_or(ORIGIN)
    }

    /// Body segments, head first.
    #[must_use]
    pub fn body(&self) -> &VecDeque<GridCell> {
        &self.body
    }

    /// Current per-step displacement.
    #[must_use]
    pub const fn vector(&self) -> StepVector {
        self.vector
    }

    /// Length the body grows to before it starts sliding.
    #[must_use]
    pub const fn target_length(&self) -> usize {
        self.target_length
    }

    /// Natural logarithm of the inter-step delay in milliseconds.
    #[must_use]
    pub const fn time_factor(&self) -> f64 {
        self.time_factor
    }

    /// Current life-cycle state.
    #[must_use]
    pub const fn life(&self) -> SnakeLife {
        self.life
    }

    /// Reports whether the snake has died.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.life.is_dead()
    }

    /// Timestamp of the last completed step, if any.
    #[must_use]
    pub const fn last_step(&self) -> Option<Duration> {
        self.last_step
    }

    /// Collider covering the head only.
    #[must_use]
    pub fn head_collider(&self) -> Option<&SpatialCollider> {
        self.colliders.as_ref().map(|colliders| &colliders.head)
    }

    /// Collider covering every segment except the head.
    #[must_use]
    pub fn tail_collider(&self) -> Option<&SpatialCollider> {
        self.colliders.as_ref().map(|colliders| &colliders.tail)
    }

    /// Minimum delay between two steps, `exp(time_factor)` milliseconds.
    #[must_use]
    pub fn step_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_factor.exp() / 1000.0).unwrap_or(Duration::MAX)
    }

    /// Reports whether a step is allowed at `now`.
    ///
    /// Steps are always allowed when either the current or the previous
    /// timestamp is unknown.
    #[must_use]
    pub fn is_step_due(&self, now: Option<Duration>) -> bool {
        match (now, self.last_step) {
            (Some(now), Some(last)) => now >= last.saturating_add(self.step_interval()),
            _ => true,
        }
    }

    /// Steers the snake with an arrow key; ignored while paused.
    ///
    /// Reversal is accepted, which makes the head run into the body on the
    /// next step.
    pub fn handle_key(&mut self, key: Key, pause: PauseState) {
        if pause.is_paused() || self.is_torn_down() {
            return;
        }
        if let Some(direction) = key.direction() {
            self.vector = StepVector::toward(direction, self.grid_size);
            trace!(?direction, "snake steered");
        }
    }

    /// Advances the snake if the timing gate allows it, then paints the body.
    ///
    /// Does nothing at all once dead, while paused or after teardown.
    pub fn draw(&mut self, timestamp: Option<Duration>, pause: PauseState, out: &mut Vec<Event>) {
        if self.life.is_dead() || pause.is_paused() || self.is_torn_down() {
            return;
        }

        if self.is_step_due(timestamp) {
            let removed = self.move_step(out);
            if let (Some(cell), Some(surface)) = (removed, self.surface.as_mut()) {
                surface.clear_rect(cell.x(), cell.y(), self.grid_size, self.grid_size);
            }
            self.last_step = timestamp;
        }

        self.paint();
    }

    /// Moves the head one cell along the vector and checks for self-collision.
    ///
    /// Returns the segment dropped from the tail, `None` while growing.
    pub fn move_step(&mut self, out: &mut Vec<Event>) -> Option<GridCell> {
        if self.life.is_dead() || self.is_torn_down() {
            return None;
        }

        let head = self.head().offset(self.vector);
        let removed = if self.body.len() >= self.target_length {
            self.body.pop_back()
        } else {
            None
        };
        self.body.push_front(head);
        self.refresh_colliders();
        out.push(Event::SnakeAdvanced { head, removed });

        self.check_self_collision(out);
        removed
    }

    /// Lengthens the target by one segment and shortens the step delay.
    pub fn eat(&mut self) -> Event {
        self.target_length = self.target_length.saturating_add(1);
        self.time_factor -= self.time_factor_step;
        debug!(
            target_length = self.target_length,
            time_factor = self.time_factor,
            "snake grew"
        );
        Event::SnakeGrew {
            target_length: self.target_length,
        }
    }

    /// Moves the snake into its terminal state.
    pub fn die(&mut self, cause: ColliderTag) -> Result<Event, TransitionError> {
        self.life = self.life.die()?;
        info!(?cause, length = self.body.len(), "snake died");
        Ok(Event::SnakeDied { cause })
    }

    fn check_self_collision(&mut self, out: &mut Vec<Event>) {
        let mut results = Vec::new();
        if let Some(colliders) = &self.colliders {
            colliders.head.check_bounds(&[&colliders.tail], &mut results);
        }
        for result in results {
            if let Some(event) = self.collide(result) {
                out.push(event);
            }
        }
    }

    fn refresh_colliders(&mut self) {
        let Some(colliders) = self.colliders.as_mut() else {
            return;
        };
        colliders.body.replace_bounds(self.body.iter().copied());
        colliders.head.replace_bounds(self.body.front().copied());
        colliders
            .tail
            .replace_bounds(self.body.iter().skip(1).copied());
    }

    fn paint(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        for cell in &self.body {
            surface.fill_rect(
                cell.x(),
                cell.y(),
                self.grid_size,
                self.grid_size,
                Color::SNAKE,
            );
        }
    }
}

impl GridEntity for Snake {
    fn kind(&self) -> EntityKind {
        EntityKind::Snake
    }

    fn cells(&self) -> Vec<GridCell> {
        self.body.iter().copied().collect()
    }

    fn collider(&self) -> Option<&SpatialCollider> {
        self.colliders.as_ref().map(|colliders| &colliders.body)
    }

    fn collide(&mut self, event: CollisionEvent) -> Option<Event> {
        if self.is_torn_down() || event.target.owner() != EntityKind::Snake {
            return None;
        }
        match event.source {
            ColliderTag::Food => Some(self.eat()),
            ColliderTag::Wall | ColliderTag::SnakeHead | ColliderTag::SnakeTail => {
                match self.die(event.source) {
                    Ok(event) => Some(event),
                    Err(error) => {
                        debug!(%error, source = ?event.source, "collision ignored");
                        None
                    }
                }
            }
            ColliderTag::Snake => None,
        }
    }

    fn tear_down(&mut self) {
        self.surface = None;
        self.colliders = None;
    }

    fn is_torn_down(&self) -> bool {
        self.colliders.is_none()
    }
}

impl fmt::Debug for Snake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snake")
            .field("life", &self.life)
            .field("vector", &self.vector)
            .field("body", &self.body)
            .field("target_length", &self.target_length)
            .field("time_factor", &self.time_factor)
            .field("last_step", &self.last_step)
            .finish_non_exhaustive()
    }
}
