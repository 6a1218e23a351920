//! Contract shared by every entity living on the playfield.

use canvas_snake_core::{CollisionEvent, EntityKind, Event, GridCell};

use crate::collider::SpatialCollider;

/// Life cycle and collider ownership common to the snake, the food and the wall.
///
/// Entities are constructed with every host collaborator they need, own their
/// colliders exclusively and react to collision results addressed to them.
/// After [`GridEntity::tear_down`] every operation becomes a no-op.
pub trait GridEntity {
    /// Kind of entity, used to route collision results.
    fn kind(&self) -> EntityKind;

    /// Cells currently occupied by the entity.
    fn cells(&self) -> Vec<GridCell>;

    /// Primary collider, `None` once torn down.
    fn collider(&self) -> Option<&SpatialCollider>;

    /// Applies a collision result addressed to one of the entity's colliders.
    ///
    /// Returns the resulting game event, if the pairing means anything to the
    /// entity.
    fn collide(&mut self, event: CollisionEvent) -> Option<Event>;

    /// Releases the render surface and discards every collider.
    fn tear_down(&mut self);

    /// Reports whether [`GridEntity::tear_down`] has run.
    fn is_torn_down(&self) -> bool;
}
