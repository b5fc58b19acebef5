//! Collision detection between the player and hazard tiles

use super::entity::Entity;
use super::grid::Tile;

/// True if `tile` kills whoever stands on it.
///
/// Only the tile is inspected: callers resolve which tile the entity
/// occupies first. Empty and blank tiles never kill.
pub fn collide(tile: &Tile, _entity: &Entity) -> bool {
    tile.is_deadly && tile.has_letter()
}
