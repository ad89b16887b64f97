//! Idle/demo mode bot
//!
//! Flaps whenever the player's bottom edge is about to sink below the safe
//! line of the next gap. Pure function of the state, so demo runs stay
//! deterministic.

use super::state::GameState;

/// How far above the bottom column the player tries to stay
const FLOOR_MARGIN: f32 = 15.0;
/// Rest height (fraction of the playfield) when nothing is ahead
const IDLE_LINE: f32 = 0.6;

/// Should the bot flap this tick?
pub fn wants_jump(state: &GameState) -> bool {
    let tuning = &state.tuning;
    let player = &state.player;

    let safe_line = state
        .obstacles
        .iter()
        .find(|o| o.x + tuning.obstacle_width >= player.x)
        .map(|o| o.bottom_y() - FLOOR_MARGIN)
        .unwrap_or(tuning.playfield_height * IDLE_LINE);

    // Where the bottom edge ends up if we let gravity act once more
    let next_velocity = player.velocity + tuning.gravity;
    let next_bottom = player.y + player.height + next_velocity;

    // Never flap into the ceiling
    let room_above = player.y + tuning.jump_strength > 0.0;

    next_bottom > safe_line && room_above
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::Tuning;

    fn gap_at(top_height: f32) -> Obstacle {
        Obstacle {
            x: 300.0,
            top_height,
            gap: 180.0,
            passed: false,
        }
    }

    #[test]
    fn test_flaps_when_sinking_below_gap() {
        let mut state = GameState::new(1, Tuning::default());
        state.obstacles.push(gap_at(100.0)); // safe line at 265
        state.player.y = 210.0;
        state.player.velocity = 2.0;
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_holds_when_high_in_gap() {
        let mut state = GameState::new(1, Tuning::default());
        state.obstacles.push(gap_at(100.0));
        state.player.y = 120.0;
        state.player.velocity = 0.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_ignores_passed_obstacles() {
        let mut state = GameState::new(1, Tuning::default());
        // Behind the player, low gap: must not steer by it
        state.obstacles.push(Obstacle {
            x: 0.0,
            top_height: 320.0,
            gap: 180.0,
            passed: true,
        });
        state.obstacles.push(gap_at(50.0)); // safe line at 215
        state.player.y = 160.0;
        state.player.velocity = 1.0;
        assert!(wants_jump(&state));
    }

    #[test]
    fn test_never_flaps_into_ceiling() {
        let mut state = GameState::new(1, Tuning::default());
        state.player.y = 8.0;
        state.player.velocity = 30.0;
        assert!(!wants_jump(&state));
    }

    #[test]
    fn test_keeps_player_in_bounds_without_obstacles() {
        let mut state = GameState::new(1, Tuning::default());
        state.frame_count = 1; // skip the tick-0 spawn
        for _ in 0..100 {
            let input = TickInput {
                jump: wants_jump(&state),
            };
            tick(&mut state, &input);
            assert!(!state.player_out_of_bounds());
            state.obstacles.clear();
        }
    }
}
