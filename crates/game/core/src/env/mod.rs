//! Collaborators the engine talks to.
//!
//! The engine owns no world state. Entities come from an [`EntityStore`],
//! spatial questions go to a [`LocationGraph`], and finished casts are handed
//! to an [`EventSink`]. Hosts pick the implementations; [`EntityMap`],
//! [`ChebyshevGrid`] and [`NullSink`] cover single-threaded use and tests.
mod events;
mod location;
mod store;

pub use events::{EventSink, NullSink, RecordingSink};
pub use location::{ChebyshevGrid, LocationGraph};
pub use store::{EntityMap, EntityStore};

/// Collaborators a single cast needs besides the entity store.
#[derive(Clone, Copy)]
pub struct CastEnv<'a> {
    pub graph: &'a dyn LocationGraph,
    pub events: &'a dyn EventSink,
}

impl<'a> CastEnv<'a> {
    pub fn new(graph: &'a dyn LocationGraph, events: &'a dyn EventSink) -> Self {
        Self { graph, events }
    }
}

impl CastEnv<'static> {
    /// Chebyshev grid, events discarded.
    pub fn detached() -> Self {
        Self {
            graph: &ChebyshevGrid,
            events: &NullSink,
        }
    }
}
