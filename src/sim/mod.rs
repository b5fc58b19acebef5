//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only; pauses are countdowns, never sleeps
//! - Stable iteration order (row-major tiles, chain order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod grid;
pub mod hazard;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::collide;
pub use entity::{Chain, Direction, Entity, EntityKind, PathSample};
pub use grid::{Grid, Tile};
pub use hazard::{HazardScheduler, select_hazard};
pub use state::{EntityView, GameEvent, GamePhase, GameState, Progress, Signal, Snapshot};
pub use tick::{TickInput, tick};
