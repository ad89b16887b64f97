//! Fire Flap - a single-screen arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, particles)
//! - `engine`: Phase-aware per-frame driver (intents in, events out, render)
//! - `renderer`: Scene building and the WebGPU sprite pipeline
//! - `tuning`: Data-driven game balance
//! - `settings`: Player render preferences

pub mod engine;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, Phase, RenderSurface};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (units, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Player spawn
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    pub const PLAYER_SPAWN_Y: f32 = 250.0;
    pub const PLAYER_SIZE: f32 = 60.0;

    /// Downward acceleration (units/tick²)
    pub const GRAVITY: f32 = 0.6;
    /// Jump impulse; negative is upward
    pub const JUMP_STRENGTH: f32 = -10.0;

    /// Obstacle defaults
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const OBSTACLE_GAP: f32 = 180.0;
    pub const OBSTACLE_WIDTH: f32 = 80.0;
    /// One obstacle every this many ticks, starting at tick 0
    pub const SPAWN_INTERVAL: u64 = 120;
    /// Smallest allowed top column
    pub const MIN_TOP_HEIGHT: f32 = 50.0;
    /// Smallest allowed bottom column
    pub const MIN_BOTTOM_HEIGHT: f32 = 100.0;

    /// Screen shake
    pub const SHAKE_DECAY: f32 = 0.9;
    pub const CRASH_SHAKE: f32 = 20.0;

    /// Particle bursts
    pub const BURST_SIZE: usize = 20;
    pub const BURST_SPEED: f32 = 5.0;
    pub const BURST_MAX_HUE: f32 = 60.0;
    pub const PARTICLE_GRAVITY: f32 = 0.3;
    pub const PARTICLE_FADE: f32 = 0.02;
    pub const PARTICLE_RADIUS: f32 = 4.0;
    pub const PARTICLE_SATURATION: f32 = 1.0;
    pub const PARTICLE_LIGHTNESS: f32 = 0.6;

    /// Player sprite tilt (radians per unit of velocity, and its cap)
    pub const TILT_PER_VELOCITY: f32 = 0.05;
    pub const MAX_TILT: f32 = std::f32::consts::FRAC_PI_4;
}
