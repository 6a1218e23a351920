//! Static boundary ring and grid lines.

use std::fmt;

use canvas_snake_core::{
    ColliderTag, CollisionEvent, Color, EntityKind, Event, GameConfig, GridCell, Layer,
    RenderSurface, SurfaceProvider,
};

use crate::{collider::SpatialCollider, entity::GridEntity};

const GRID_LINE_WIDTH: i32 = 1;

/// Ring of cells one cell outside the playable area.
///
/// The ring is computed once at construction and never changes. Hitting the
/// wall is the snake's problem; the wall itself ignores collisions.
pub struct Wall {
    grid_size: i32,
    cells: Vec<GridCell>,
    collider: Option<SpatialCollider>,
    surface: Option<Box<dyn RenderSurface>>,
}

impl Wall {
    /// Builds the ring around the configured grid and draws the grid lines.
    #[must_use]
    pub fn new(config: &GameConfig, provider: &mut dyn SurfaceProvider) -> Self {
        let cells = ring_cells(config.grid_size, config.width(), config.height());
        let surface = provider.create_surface(Layer::Grid, config.width(), config.height());
        let mut wall = Self {
            grid_size: config.grid_size,
            collider: Some(SpatialCollider::with_bounds(
                ColliderTag::Wall,
                cells.iter().copied(),
            )),
            cells,
            surface: Some(surface),
        };
        wall.draw();
        wall
    }

    /// Repaints the grid lines from scratch.
    pub fn draw(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
            draw_grid_lines(&mut **surface, self.grid_size);
        }
    }
}

fn ring_cells(grid_size: i32, width: i32, height: i32) -> Vec<GridCell> {
    let step = grid_size.max(1);
    let stride = step as usize;
    let mut cells = Vec::new();
    for x in (-step..=width).step_by(stride) {
        cells.push(GridCell::new(x, -step));
        cells.push(GridCell::new(x, height));
    }
    for y in (0..height).step_by(stride) {
        cells.push(GridCell::new(-step, y));
        cells.push(GridCell::new(width, y));
    }
    cells
}

fn draw_grid_lines(surface: &mut dyn RenderSurface, grid_size: i32) {
    let (width, height) = (surface.width(), surface.height());
    let stride = grid_size.max(1) as usize;
    for y in (0..height).step_by(stride) {
        surface.fill_rect(0, y, width, GRID_LINE_WIDTH, Color::GRID_LINE);
    }
    for x in (0..width).step_by(stride) {
        surface.fill_rect(x, 0, GRID_LINE_WIDTH, height, Color::GRID_LINE);
    }
}

impl GridEntity for Wall {
    fn kind(&self) -> EntityKind {
        EntityKind::Wall
    }

    fn cells(&self) -> Vec<GridCell> {
        self.cells.clone()
    }

    fn collider(&self) -> Option<&SpatialCollider> {
        self.collider.as_ref()
    }

    fn collide(&mut self, _event: CollisionEvent) -> Option<Event> {
        None
    }

    fn tear_down(&mut self) {
        self.surface = None;
        self.collider = None;
    }

    fn is_torn_down(&self) -> bool {
        self.collider.is_none()
    }
}

impl fmt::Debug for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wall")
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}
