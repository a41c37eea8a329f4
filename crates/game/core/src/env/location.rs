use super::store::EntityStore;
use crate::state::{EntityId, Position};

/// Spatial queries used for range checks and area selection.
pub trait LocationGraph {
    /// Distance between two positions in map units.
    fn distance(&self, from: Position, to: Position) -> u32;

    /// Entities whose location lies within `radius` of `center`, ascending by id.
    fn entities_within_radius(
        &self,
        store: &dyn EntityStore,
        center: Position,
        radius: u32,
    ) -> Vec<EntityId> {
        store
            .ids()
            .into_iter()
            .filter(|id| {
                store
                    .get(*id)
                    .is_some_and(|e| self.distance(center, e.location) <= radius)
            })
            .collect()
    }
}

/// Open grid using Chebyshev (chessboard) distance: `max(|dx|, |dy|)`.
///
/// Diagonal steps cost the same as orthogonal ones, like a chess king.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChebyshevGrid;

impl LocationGraph for ChebyshevGrid {
    fn distance(&self, from: Position, to: Position) -> u32 {
        let dx = from.x.abs_diff(to.x);
        let dy = from.y.abs_diff(to.y);
        dx.max(dy)
    }
}
