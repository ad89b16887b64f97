//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order for obstacles)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, obstacle_columns};
pub use state::{GameEvent, GameState, Obstacle, Particle, Player};
pub use tick::{TickInput, tick};
