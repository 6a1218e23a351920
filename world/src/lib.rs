#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entities and collision model of Canvas Snake.
//!
//! Every entity owns its colliders. The [`Playfield`] only reads collider
//! snapshots to run the pairwise checks, then routes each result back to the
//! entity owning the addressed tag.

mod collider;
mod entity;
mod food;
mod snake;
mod wall;

use std::time::Duration;

use canvas_snake_core::{
    CollisionEvent, EntityKind, Event, GameConfig, Key, PauseState, SurfaceProvider,
};
use rand_chacha::ChaCha8Rng;

pub use collider::SpatialCollider;
pub use entity::GridEntity;
pub use food::Food;
pub use snake::Snake;
pub use wall::Wall;

/// The snake, the food and the wall of a single game.
#[derive(Debug)]
pub struct Playfield {
    snake: Snake,
    food: Food,
    wall: Wall,
}

impl Playfield {
    /// Creates every entity of a fresh game, each on its own surface.
    ///
    /// The snake requests its surface before the food, so the food paints
    /// above it on the shared playfield layer.
    #[must_use]
    pub fn new(config: &GameConfig, provider: &mut dyn SurfaceProvider, rng: ChaCha8Rng) -> Self {
        let snake = Snake::new(config, provider);
        let wall = Wall::new(config, provider);
        let food = Food::new(config, provider, rng);
        Self { snake, food, wall }
    }

    /// Assembles a playfield from entities built elsewhere.
    #[must_use]
    pub fn from_parts(snake: Snake, food: Food, wall: Wall) -> Self {
        Self { snake, food, wall }
    }

    /// Forwards a steering key to the snake.
    pub fn steer(&mut self, key: Key, pause: PauseState) {
        self.snake.handle_key(key, pause);
    }

    /// Advances and paints the snake, then repaints the food.
    pub fn draw(&mut self, timestamp: Option<Duration>, pause: PauseState, out: &mut Vec<Event>) {
        self.snake.draw(timestamp, pause, out);
        self.food.draw();
    }

    /// Runs the food-versus-snake and wall-versus-snake checks.
    ///
    /// Each check contributes at most one pair of results.
    pub fn check_collisions(&self, out: &mut Vec<CollisionEvent>) {
        let Some(snake) = self.snake.collider() else {
            return;
        };
        if let Some(food) = self.food.collider() {
            food.check_bounds(&[snake], out);
        }
        if let Some(wall) = self.wall.collider() {
            wall.check_bounds(&[snake], out);
        }
    }

    /// Delivers each result to the entity owning its target tag.
    pub fn dispatch(&mut self, results: &[CollisionEvent], out: &mut Vec<Event>) {
        for &result in results {
            let reaction = match result.target.owner() {
                EntityKind::Snake => self.snake.collide(result),
                EntityKind::Food => self.food.collide(result),
                EntityKind::Wall => self.wall.collide(result),
            };
            if let Some(event) = reaction {
                out.push(event);
            }
        }
    }

    /// Checks every pairing and applies the results in one go.
    pub fn resolve_collisions(&mut self, out: &mut Vec<Event>) {
        let mut results = Vec::new();
        self.check_collisions(&mut results);
        self.dispatch(&results, out);
    }

    /// Tears down every entity.
    pub fn tear_down(&mut self) {
        self.snake.tear_down();
        self.food.tear_down();
        self.wall.tear_down();
    }
}

/// Read-only queries over a [`Playfield`].
pub mod query {
    use canvas_snake_core::GridCell;

    use super::{Food, Playfield, Snake, Wall};
    use crate::GridEntity;

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(playfield: &Playfield) -> &Snake {
        &playfield.snake
    }

    /// Provides read-only access to the food.
    #[must_use]
    pub fn food(playfield: &Playfield) -> &Food {
        &playfield.food
    }

    /// Provides read-only access to the wall.
    #[must_use]
    pub fn wall(playfield: &Playfield) -> &Wall {
        &playfield.wall
    }

    /// Number of meals eaten in the current game.
    #[must_use]
    pub fn eat_count(playfield: &Playfield) -> u32 {
        playfield.food.eat_count()
    }

    /// Reports whether the snake has died.
    #[must_use]
    pub fn is_game_over(playfield: &Playfield) -> bool {
        playfield.snake.is_dead()
    }

    /// Reports whether every entity has been torn down.
    #[must_use]
    pub fn is_torn_down(playfield: &Playfield) -> bool {
        playfield.snake.is_torn_down()
            && playfield.food.is_torn_down()
            && playfield.wall.is_torn_down()
    }

    /// Captures the observable state of the playfield.
    #[must_use]
    pub fn snapshot(playfield: &Playfield) -> PlayfieldSnapshot {
        PlayfieldSnapshot {
            body: playfield.snake.cells(),
            target_length: playfield.snake.target_length(),
            food: playfield.food.cell(),
            eat_count: playfield.food.eat_count(),
            dead: playfield.snake.is_dead(),
        }
    }

    /// Plain-data copy of the playfield state at one instant.
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct PlayfieldSnapshot {
        /// Snake segments, head first.
        pub body: Vec<GridCell>,
        /// Length the snake grows to.
        pub target_length: usize,
        /// Cell holding the food.
        pub food: GridCell,
        /// Meals eaten so far.
        pub eat_count: u32,
        /// Whether the snake has died.
        pub dead: bool,
    }
}
