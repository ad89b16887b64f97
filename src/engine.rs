//! Per-frame driver
//!
//! Owns the run phase, queues input intents between frames, steps the
//! simulation once per display refresh and renders the updated snapshot in
//! the same call.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{AssetStatus, Scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, autopilot, tick};
use crate::tuning::{Tuning, TuningError};

/// Decorrelates the render-only jitter stream from the simulation stream
const FX_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Run phase as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for start; nothing ticks
    Idle,
    /// One tick per frame
    Playing,
    /// Run ended; waits for restart
    Over,
}

/// Where a frame ends up
pub trait RenderSurface {
    /// Poll which sprites can be drawn this frame
    fn assets(&mut self) -> AssetStatus;

    /// Draw one finished frame. Must not fail the tick.
    fn present(&mut self, scene: &Scene);
}

pub struct Engine {
    state: GameState,
    phase: Phase,
    settings: Settings,
    /// Jump requested since the last tick
    jump_queued: bool,
    /// Idle/demo mode - the bot flaps
    autopilot: bool,
    /// Camera jitter (never touches simulation state)
    fx_rng: Pcg32,
}

impl Engine {
    /// Fails if `tuning` does not pass `Tuning::validate`.
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(seed, tuning),
            phase: Phase::Idle,
            settings,
            jump_queued: false,
            autopilot: false,
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM_SALT),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    /// Idle → Playing with a fresh snapshot. Returns false in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::debug!("Ignoring start while {:?}", self.phase);
            return false;
        }
        self.state.reset();
        self.jump_queued = false;
        self.phase = Phase::Playing;
        log::info!("Run started (seed {})", self.state.seed);
        true
    }

    /// Over → Idle → Playing. Returns false unless the run had ended.
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::Over {
            log::debug!("Ignoring restart while {:?}", self.phase);
            return false;
        }
        self.phase = Phase::Idle;
        self.start()
    }

    /// Queue a flap for the next tick. Ignored unless playing.
    pub fn request_jump(&mut self) {
        if self.phase == Phase::Playing {
            self.jump_queued = true;
        }
    }

    /// Run one frame: tick, then render the updated snapshot.
    ///
    /// Does nothing outside `Phase::Playing`.
    pub fn advance<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> Vec<GameEvent> {
        if self.phase != Phase::Playing {
            return Vec::new();
        }

        let jump = std::mem::take(&mut self.jump_queued)
            || (self.autopilot && autopilot::wants_jump(&self.state));
        let events = tick(&mut self.state, &TickInput { jump });

        if events.contains(&GameEvent::GameOver) {
            self.phase = Phase::Over;
            log::info!(
                "Game over at tick {} with score {}",
                self.state.frame_count,
                self.state.score
            );
        }

        let offset = self.shake_offset();
        let scene = Scene::build(&self.state, surface.assets(), &self.settings, offset);
        surface.present(&scene);

        events
    }

    /// Uniform jitter in [-shake/2, shake/2] on both axes while shaking
    fn shake_offset(&mut self) -> Vec2 {
        let shake = self.state.shake;
        if shake > 0.0 && self.settings.screen_shake {
            let half = shake / 2.0;
            Vec2::new(
                self.fx_rng.random_range(-half..=half),
                self.fx_rng.random_range(-half..=half),
            )
        } else {
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::renderer::{Headless, Layer};
    use crate::sim::{Obstacle, Player};

    fn engine() -> Engine {
        Engine::new(2024, Tuning::default(), Settings::default()).unwrap()
    }

    fn surface() -> Headless {
        Headless::new(AssetStatus::READY)
    }

    #[test]
    fn test_idle_does_not_tick() {
        let mut engine = engine();
        let mut surface = surface();
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.advance(&mut surface).is_empty());
        assert_eq!(engine.state().frame_count, 0);
        assert_eq!(surface.frames, 0);
    }

    #[test]
    fn test_start_enters_playing() {
        let mut engine = engine();
        assert!(engine.start());
        assert!(engine.is_playing());
        // Only from Idle
        assert!(!engine.start());
        assert!(!engine.restart());
    }

    #[test]
    fn test_jump_ignored_when_idle() {
        let mut engine = engine();
        engine.request_jump();
        engine.start();
        engine.advance(&mut surface());
        assert_eq!(engine.state().player.velocity, GRAVITY);
    }

    #[test]
    fn test_queued_jump_consumed_once() {
        let mut engine = engine();
        let mut surface = surface();
        engine.start();
        engine.request_jump();
        engine.request_jump();
        engine.advance(&mut surface);
        assert_eq!(engine.state().player.velocity, JUMP_STRENGTH);
        engine.advance(&mut surface);
        assert_eq!(engine.state().player.velocity, JUMP_STRENGTH + GRAVITY);
    }

    #[test]
    fn test_render_uses_updated_snapshot() {
        let settings = Settings {
            screen_shake: false,
            ..Settings::default()
        };
        let mut engine = Engine::new(5, Tuning::default(), settings.clone()).unwrap();
        let mut surface = surface();
        engine.start();
        engine.advance(&mut surface);

        let expected = Scene::build(engine.state(), AssetStatus::READY, &settings, Vec2::ZERO);
        assert_eq!(surface.frames, 1);
        assert_eq!(surface.last_scene.as_ref(), Some(&expected));
    }

    #[test]
    fn test_unready_assets_skip_draws() {
        let mut engine = engine();
        let mut surface = Headless::new(AssetStatus::default());
        engine.start();
        engine.advance(&mut surface);
        let scene = surface.last_scene.unwrap();
        assert!(scene.layer(Layer::Player).is_none());
        assert!(scene.layer(Layer::Obstacles).is_none());
        assert_eq!(engine.state().frame_count, 1);
    }

    #[test]
    fn test_collision_ends_run_once() {
        let mut engine = engine();
        let mut surface = surface();
        engine.start();
        engine.advance(&mut surface);

        // Park a column right on top of the player
        engine.state.obstacles.push(Obstacle {
            x: PLAYER_SPAWN_X + OBSTACLE_SPEED,
            top_height: 500.0,
            gap: OBSTACLE_GAP,
            passed: false,
        });
        let events = engine.advance(&mut surface);
        assert_eq!(events, vec![GameEvent::GameOver]);
        assert_eq!(engine.phase(), Phase::Over);
        assert_eq!(engine.state().particles.len(), BURST_SIZE);
        assert_eq!(engine.state().shake, CRASH_SHAKE);

        // Terminal: no more ticks, no more events
        let frame = engine.state().frame_count;
        assert!(engine.advance(&mut surface).is_empty());
        assert_eq!(engine.state().frame_count, frame);
        engine.request_jump();
        assert!(!engine.jump_queued);
    }

    #[test]
    fn test_falling_off_screen_ends_run() {
        let mut engine = engine();
        let mut surface = surface();
        engine.start();
        let mut game_overs = 0;
        for _ in 0..200 {
            game_overs += engine
                .advance(&mut surface)
                .iter()
                .filter(|e| **e == GameEvent::GameOver)
                .count();
        }
        assert_eq!(game_overs, 1);
        assert_eq!(engine.phase(), Phase::Over);
        // 0.3·n(n+1) > 290 first holds at n = 31
        assert_eq!(engine.state().frame_count, 31);
    }

    #[test]
    fn test_restart_resets_run() {
        let mut engine = engine();
        let mut surface = surface();
        engine.start();
        engine.state.score = 4;
        while engine.is_playing() {
            engine.advance(&mut surface);
        }
        assert!(!engine.state().particles.is_empty());

        assert!(engine.restart());
        assert!(engine.is_playing());
        let state = engine.state();
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.player, Player::default());
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.shake, 0.0);
    }

    #[test]
    fn test_shake_offset_bounds() {
        let mut engine = engine();
        engine.state.shake = CRASH_SHAKE;
        for _ in 0..200 {
            let offset = engine.shake_offset();
            assert!(offset.x.abs() <= CRASH_SHAKE / 2.0);
            assert!(offset.y.abs() <= CRASH_SHAKE / 2.0);
        }
        engine.state.shake = 0.0;
        assert_eq!(engine.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_shake_offset_leaves_simulation_alone() {
        let mut a = engine();
        let mut b = engine();
        let mut surface = surface();
        a.start();
        b.start();
        // Burn jitter samples on one engine only
        a.state.shake = 5.0;
        b.state.shake = 5.0;
        for _ in 0..10 {
            a.shake_offset();
        }
        for _ in 0..30 {
            a.advance(&mut surface);
            b.advance(&mut surface);
        }
        assert_eq!(a.state().obstacles, b.state().obstacles);
        assert_eq!(a.state().player, b.state().player);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut engine = engine();
        let mut surface = surface();
        engine.set_autopilot(true);
        engine.start();
        let mut last_score = 0;
        for _ in 0..2000 {
            for event in engine.advance(&mut surface) {
                if let GameEvent::ScoreChanged(score) = event {
                    assert_eq!(score, last_score + 1);
                    last_score = score;
                }
            }
            if !engine.is_playing() {
                break;
            }
        }
        assert_eq!(engine.score(), last_score);
        assert!(last_score > 0, "autopilot never cleared an obstacle");
    }

    #[test]
    fn test_rejects_invalid_tuning() {
        let tuning = Tuning {
            spawn_interval: 0,
            ..Tuning::default()
        };
        let err = Engine::new(1, tuning, Settings::default()).err();
        assert!(matches!(
            err,
            Some(TuningError::Invalid {
                field: "spawn_interval",
                ..
            })
        ));
    }
}
