//! Fixed-step simulation tick
//!
//! One call per display frame. The order of the steps below is load-bearing:
//! collisions are tested after obstacles move, bursts created by a column hit
//! are aged in the same tick, and a boundary burst is not.

use super::state::{GameEvent, GameState};
use crate::consts::SHAKE_DECAY;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click/tap)
    pub jump: bool,
}

/// Advance the game state by one tick and return what happened.
///
/// The terminal sequence (burst, shake, `GameOver`) runs at most once per
/// call even if several columns and a boundary are hit together.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let tuning = state.tuning;

    // Decay screen shake
    if state.shake > 0.0 {
        state.shake *= SHAKE_DECAY;
    }

    // Player physics: a jump replaces the velocity, it does not add to it
    let player = &mut state.player;
    if input.jump {
        player.velocity = tuning.jump_strength;
    } else {
        player.velocity += tuning.gravity;
    }
    player.y += player.velocity;

    // A zero interval (unvalidated tuning) never spawns
    if state.frame_count.checked_rem(tuning.spawn_interval) == Some(0) {
        state.spawn_obstacle();
    }

    // Move, collide and score obstacles in spawn order
    let bounds = state.player.bounds();
    let mut crashed = false;
    let mut scored = false;
    for obstacle in &mut state.obstacles {
        obstacle.x -= tuning.obstacle_speed;

        if !crashed
            && obstacle.collides_with(&bounds, tuning.obstacle_width, tuning.playfield_height)
        {
            crashed = true;
        }

        if !obstacle.passed && obstacle.x + tuning.obstacle_width < bounds.x {
            obstacle.passed = true;
            state.score += 1;
            scored = true;
        }
    }
    state
        .obstacles
        .retain(|o| o.x + tuning.obstacle_width >= 0.0);

    if crashed {
        state.crash();
        events.push(GameEvent::GameOver);
    }
    if scored {
        log::debug!("Score: {}", state.score);
        events.push(GameEvent::ScoreChanged(state.score));
    }

    for particle in &mut state.particles {
        particle.update();
    }
    state.particles.retain(|p| p.is_alive());

    if !crashed && state.player_out_of_bounds() {
        state.crash();
        events.push(GameEvent::GameOver);
    }

    state.frame_count += 1;
    events
}
