//! The food pellet.

use std::fmt;

use canvas_snake_core::{
    ColliderTag, CollisionEvent, Color, EntityKind, Event, GameConfig, GridCell, Layer,
    RenderSurface, SurfaceProvider,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::{collider::SpatialCollider, entity::GridEntity};

/// Single food cell that respawns at a random cell whenever it is eaten.
///
/// Respawn positions are drawn uniformly from the whole playfield; cells
/// covered by the snake are not excluded.
pub struct Food {
    grid_size: i32,
    columns: i32,
    rows: i32,
    cell: GridCell,
    eat_count: u32,
    rng: ChaCha8Rng,
    collider: Option<SpatialCollider>,
    surface: Option<Box<dyn RenderSurface>>,
}

impl Food {
    /// Spawns the food on a random cell and paints it.
    #[must_use]
    pub fn new(config: &GameConfig, provider: &mut dyn SurfaceProvider, rng: ChaCha8Rng) -> Self {
        let surface = provider.create_surface(Layer::Playfield, config.width(), config.height());
        let mut food = Self {
            grid_size: config.grid_size,
            columns: config.columns,
            rows: config.rows,
            cell: GridCell::new(0, 0),
            eat_count: 0,
            rng,
            collider: None,
            surface: Some(surface),
        };
        food.cell = food.random_cell();
        food.collider = Some(SpatialCollider::with_bounds(ColliderTag::Food, [food.cell]));
        food.draw();
        food
    }

    /// Cell currently holding the food.
    #[must_use]
    pub const fn cell(&self) -> GridCell {
        self.cell
    }

    /// Number of times the food was eaten since it spawned.
    #[must_use]
    pub const fn eat_count(&self) -> u32 {
        self.eat_count
    }

    /// Paints the food cell.
    pub fn draw(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.fill_rect(
                self.cell.x(),
                self.cell.y(),
                self.grid_size,
                self.grid_size,
                Color::FOOD,
            );
        }
    }

    /// Moves the food to a fresh random cell and counts the meal.
    ///
    /// Returns `None` after teardown.
    pub fn eaten(&mut self) -> Option<Event> {
        if self.is_torn_down() {
            return None;
        }

        let from = self.cell;
        if let Some(surface) = self.surface.as_mut() {
            surface.clear_rect(from.x(), from.y(), self.grid_size, self.grid_size);
        }
        self.cell = self.random_cell();
        self.draw();
        if let Some(collider) = self.collider.as_mut() {
            collider.replace_bounds([self.cell]);
        }
        self.eat_count = self.eat_count.saturating_add(1);
        debug!(?from, to = ?self.cell, eat_count = self.eat_count, "food respawned");

        Some(Event::FoodEaten {
            from,
            to: self.cell,
            eat_count: self.eat_count,
        })
    }

    fn random_cell(&mut self) -> GridCell {
        let column = self.rng.gen_range(0..self.columns.max(1));
        let row = self.rng.gen_range(0..self.rows.max(1));
        GridCell::from_indices(column, row, self.grid_size)
    }
}

impl GridEntity for Food {
    fn kind(&self) -> EntityKind {
        EntityKind::Food
    }

    fn cells(&self) -> Vec<GridCell> {
        vec![self.cell]
    }

    fn collider(&self) -> Option<&SpatialCollider> {
        self.collider.as_ref()
    }

    fn collide(&mut self, event: CollisionEvent) -> Option<Event> {
        if event.target != ColliderTag::Food || event.source.owner() != EntityKind::Snake {
            return None;
        }
        self.eaten()
    }

    fn tear_down(&mut self) {
        self.surface = None;
        self.collider = None;
    }

    fn is_torn_down(&self) -> bool {
        self.collider.is_none()
    }
}

impl fmt::Debug for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Food")
            .field("cell", &self.cell)
            .field("eat_count", &self.eat_count)
            .finish_non_exhaustive()
    }
}
