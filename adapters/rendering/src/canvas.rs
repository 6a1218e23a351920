//! Retained in-memory surfaces and the layered canvas compositing them.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use canvas_snake_core::{Color, Layer, RenderSurface, SurfaceProvider, TextStyle};

/// Axis-aligned rectangle painted with a solid color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FilledRect {
    /// Left edge in world units.
    pub x: i32,
    /// Top edge in world units.
    pub y: i32,
    /// Horizontal extent in world units.
    pub width: i32,
    /// Vertical extent in world units.
    pub height: i32,
    /// Fill color.
    pub color: Color,
}

impl FilledRect {
    fn same_area(&self, other: &FilledRect) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }

    fn within(&self, x: i32, y: i32, width: i32, height: i32) -> bool {
        self.x >= x
            && self.y >= y
            && self.x + self.width <= x + width
            && self.y + self.height <= y + height
    }
}

/// Single line of text anchored at a point.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextRun {
    /// Text content.
    pub text: String,
    /// Anchor x coordinate in world units.
    pub x: i32,
    /// Anchor y coordinate in world units.
    pub y: i32,
    /// Color, size and anchoring.
    pub style: TextStyle,
}

/// Drawing primitive remembered by a retained surface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Solid rectangle.
    Rect(FilledRect),
    /// Text line.
    Text(TextRun),
}

type ShapeBuffer = Rc<RefCell<Vec<Shape>>>;

/// Surface that records primitives instead of rasterising them.
///
/// Clearing removes rectangles fully covered by the cleared area and text
/// anchored inside it. Opaque fills replace the rectangles they cover, so
/// repainting the same cells every frame does not grow the buffer.
#[derive(Debug)]
pub struct RetainedSurface {
    width: i32,
    height: i32,
    shapes: ShapeBuffer,
}

impl RetainedSurface {
    /// Creates an empty surface with the given extent.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            shapes: Rc::default(),
        }
    }

    /// Copy of every primitive currently visible, oldest first.
    #[must_use]
    pub fn shapes(&self) -> Vec<Shape> {
        self.shapes.borrow().clone()
    }

    fn buffer(&self) -> Weak<RefCell<Vec<Shape>>> {
        Rc::downgrade(&self.shapes)
    }
}

impl RenderSurface for RetainedSurface {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.shapes.borrow_mut().retain(|shape| match shape {
            Shape::Rect(rect) => !rect.within(x, y, width, height),
            Shape::Text(run) => {
                !(run.x >= x && run.y >= y && run.x < x + width && run.y < y + height)
            }
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let rect = FilledRect {
            x,
            y,
            width,
            height,
            color,
        };
        let opaque = color.alpha() == u8::MAX;
        let mut shapes = self.shapes.borrow_mut();
        shapes.retain(|shape| match shape {
            Shape::Rect(existing) => {
                !(existing.same_area(&rect) || (opaque && existing.within(x, y, width, height)))
            }
            Shape::Text(_) => true,
        });
        shapes.push(Shape::Rect(rect));
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) {
        self.shapes.borrow_mut().push(Shape::Text(TextRun {
            text: text.to_owned(),
            x,
            y,
            style,
        }));
    }
}

#[derive(Debug)]
struct RegisteredSurface {
    layer: Layer,
    shapes: Weak<RefCell<Vec<Shape>>>,
}

/// Surface provider compositing every live surface in stacking order.
///
/// Clones share the same registry, so adapters may keep one handle for
/// compositing while the game loop hands another to entities.
#[derive(Clone, Debug, Default)]
pub struct LayeredCanvas {
    registry: Rc<RefCell<Vec<RegisteredSurface>>>,
}

impl LayeredCanvas {
    /// Creates a canvas without surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces still owned by an entity.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.prune();
        self.registry.borrow().len()
    }

    /// Primitives of every live surface on `layer`, in creation order.
    #[must_use]
    pub fn shapes_on(&self, layer: Layer) -> Vec<Shape> {
        self.prune();
        let registry = self.registry.borrow();
        let mut shapes = Vec::new();
        for entry in registry.iter().filter(|entry| entry.layer == layer) {
            if let Some(buffer) = entry.shapes.upgrade() {
                shapes.extend(buffer.borrow().iter().cloned());
            }
        }
        shapes
    }

    /// Primitives of every live surface, bottom layer first.
    #[must_use]
    pub fn composite(&self) -> Vec<Shape> {
        Layer::ORDER
            .iter()
            .flat_map(|&layer| self.shapes_on(layer))
            .collect()
    }

    fn prune(&self) {
        self.registry
            .borrow_mut()
            .retain(|entry| entry.shapes.strong_count() > 0);
    }
}

impl SurfaceProvider for LayeredCanvas {
    fn create_surface(&mut self, layer: Layer, width: i32, height: i32) -> Box<dyn RenderSurface> {
        let surface = RetainedSurface::new(width, height);
        self.registry.borrow_mut().push(RegisteredSurface {
            layer,
            shapes: surface.buffer(),
        });
        Box::new(surface)
    }
}
