//! Concurrent host for the ability rules engine.
//!
//! This crate wires the pure [`rules_core`] engine into a shared, thread-safe
//! world. Consumers embed a [`World`] to spawn entities, run casts from any
//! thread, drive turns and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`world`] hosts the entity world, per-entity locking and turn budgets
//! - [`events`] provides a topic-based event bus that doubles as the engine's event sink
//! - [`logging`] installs the tracing subscriber
pub mod error;
pub mod events;
pub mod logging;
pub mod world;

pub use error::{Result, RuntimeError};
pub use events::{Event, EventBus, Topic, TurnEvent};
pub use world::{LockedEntities, World};
