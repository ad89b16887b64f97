//! Game state and core simulation types
//!
//! Everything the tick mutates lives here, including the seeded RNG, so a
//! snapshot can be captured and replayed deterministically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, obstacle_columns};
use crate::consts::*;
use crate::tuning::Tuning;

/// Events reported to the host while a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score went up; carries the new total
    ScoreChanged(u32),
    /// The player hit a column or left the playfield
    GameOver,
}

/// The player sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Fixed for the whole run
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (positive = falling)
    pub velocity: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: PLAYER_SPAWN_X,
            y: PLAYER_SPAWN_Y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            velocity: 0.0,
        }
    }
}

impl Player {
    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Sprite rotation: nose down while falling, capped at 45°
    pub fn tilt(&self) -> f32 {
        (self.velocity * TILT_PER_VELOCITY).min(MAX_TILT)
    }
}

/// A pair of fire columns with a gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Height of the top column
    pub top_height: f32,
    /// Opening below the top column
    pub gap: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Obstacle {
    /// Top edge of the bottom column
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.top_height + self.gap
    }

    /// Top and bottom column rectangles
    pub fn columns(&self, width: f32, playfield_height: f32) -> [Rect; 2] {
        obstacle_columns(self.x, self.top_height, self.gap, width, playfield_height)
    }

    pub fn collides_with(&self, bounds: &Rect, width: f32, playfield_height: f32) -> bool {
        self.columns(width, playfield_height)
            .iter()
            .any(|column| column.overlaps(bounds))
    }
}

/// A spark from a crash burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 at spawn, fades toward 0
    pub life: f32,
    /// Hue in degrees (fire palette, 0-60)
    pub hue: f32,
}

impl Particle {
    /// Advance one tick
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life -= PARTICLE_FADE;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Complete simulation snapshot (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub player: Player,
    /// Active obstacles in spawn order (also left-to-right)
    pub obstacles: Vec<Obstacle>,
    /// Active particles (no ordering)
    pub particles: Vec<Particle>,
    pub score: u32,
    /// Ticks since the run started
    pub frame_count: u64,
    /// Camera shake magnitude
    pub shake: f32,
    rng: Pcg32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            player: Player::default(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            score: 0,
            frame_count: 0,
            shake: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Return every entity and counter to its spawn default.
    ///
    /// Tuning is kept and the RNG stream carries on, so a restarted run gets
    /// a fresh obstacle layout.
    pub fn reset(&mut self) {
        self.player = Player::default();
        self.obstacles.clear();
        self.particles.clear();
        self.score = 0;
        self.frame_count = 0;
        self.shake = 0.0;
    }

    /// Push a new obstacle at the right edge with a random gap position
    pub fn spawn_obstacle(&mut self) {
        let lo = MIN_TOP_HEIGHT;
        let hi = self.tuning.max_top_height().max(lo);
        let top_height = self.rng.random_range(lo..=hi);
        log::debug!(
            "Spawned obstacle at tick {} (top height {:.1})",
            self.frame_count,
            top_height
        );
        self.obstacles.push(Obstacle {
            x: self.tuning.playfield_width,
            top_height,
            gap: self.tuning.obstacle_gap,
            passed: false,
        });
    }

    /// Emit a burst of fire-coloured particles from `center`
    pub fn spawn_burst(&mut self, center: Vec2) {
        self.particles.reserve(BURST_SIZE);
        for _ in 0..BURST_SIZE {
            let vel = Vec2::new(
                self.rng.random_range(-BURST_SPEED..=BURST_SPEED),
                self.rng.random_range(-BURST_SPEED..=BURST_SPEED),
            );
            let hue = self.rng.random_range(0.0..=BURST_MAX_HUE);
            self.particles.push(Particle {
                pos: center,
                vel,
                life: 1.0,
                hue,
            });
        }
    }

    /// Terminal sequence: burst at the player, kick the camera
    pub fn crash(&mut self) {
        let center = self.player.center();
        self.spawn_burst(center);
        self.shake = CRASH_SHAKE;
    }

    /// Player's vertical extent leaves the playfield
    pub fn player_out_of_bounds(&self) -> bool {
        let bounds = self.player.bounds();
        bounds.y < 0.0 || bounds.bottom() > self.tuning.playfield_height
    }
}
