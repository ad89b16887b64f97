//! Frame description built from a simulation snapshot
//!
//! A `Scene` is plain data: ordered batches of playfield-space vertices, each
//! tied to one texture, plus the camera-shake offset applied to all of them.
//! Building it needs no GPU, so the draw order and asset fallbacks are
//! testable on their own.

use glam::Vec2;

use super::assets::{AssetStatus, SpriteId};
use super::shapes::{UvOrientation, circle, hsl_to_rgb, rotated_sprite, sprite_quad};
use super::vertex::{Vertex, colors};
use crate::consts::{PARTICLE_LIGHTNESS, PARTICLE_RADIUS, PARTICLE_SATURATION};
use crate::settings::Settings;
use crate::sim::GameState;

/// Segments per particle circle
const PARTICLE_SEGMENTS: u32 = 10;

/// What a batch samples from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    /// 1×1 white texel; vertex color only
    Solid,
    Sprite(SpriteId),
}

/// Which part of the scene a batch belongs to (back to front)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Obstacles,
    Particles,
    Player,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub layer: Layer,
    pub texture: Texture,
    pub vertices: Vec<Vertex>,
}

/// One frame, back to front
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    /// Playfield size in units
    pub size: Vec2,
    /// Whole-scene displacement from camera shake
    pub offset: Vec2,
    pub batches: Vec<Batch>,
}

impl Scene {
    /// Build the frame for `state`. Sprites whose image is not ready are left
    /// out for this frame.
    pub fn build(state: &GameState, assets: AssetStatus, settings: &Settings, offset: Vec2) -> Self {
        let tuning = &state.tuning;
        let mut scene = Scene {
            size: Vec2::new(tuning.playfield_width, tuning.playfield_height),
            offset: if settings.screen_shake { offset } else { Vec2::ZERO },
            batches: Vec::with_capacity(3),
        };

        if assets.is_ready(SpriteId::Fire) && !state.obstacles.is_empty() {
            let mut vertices = Vec::with_capacity(state.obstacles.len() * 12);
            for obstacle in &state.obstacles {
                let [top, bottom] = obstacle.columns(tuning.obstacle_width, tuning.playfield_height);
                // Top flame hangs down into the gap
                vertices.extend(sprite_quad(&top, UvOrientation::HalfTurn, colors::WHITE));
                vertices.extend(sprite_quad(&bottom, UvOrientation::Upright, colors::WHITE));
            }
            scene.push(Layer::Obstacles, Texture::Sprite(SpriteId::Fire), vertices);
        }

        if settings.particles && !state.particles.is_empty() {
            let mut vertices =
                Vec::with_capacity(state.particles.len() * (PARTICLE_SEGMENTS as usize) * 3);
            for particle in state.particles.iter().filter(|p| p.is_alive()) {
                let [r, g, b] = hsl_to_rgb(particle.hue, PARTICLE_SATURATION, PARTICLE_LIGHTNESS);
                let color = [r, g, b, particle.life.clamp(0.0, 1.0)];
                vertices.extend(circle(particle.pos, PARTICLE_RADIUS, color, PARTICLE_SEGMENTS));
            }
            scene.push(Layer::Particles, Texture::Solid, vertices);
        }

        if assets.is_ready(SpriteId::Player) {
            let player = &state.player;
            let vertices = rotated_sprite(
                player.center(),
                Vec2::new(player.width, player.height),
                player.tilt(),
                colors::WHITE,
            );
            scene.push(Layer::Player, Texture::Sprite(SpriteId::Player), vertices.to_vec());
        }

        scene
    }

    fn push(&mut self, layer: Layer, texture: Texture, vertices: Vec<Vertex>) {
        if !vertices.is_empty() {
            self.batches.push(Batch {
                layer,
                texture,
                vertices,
            });
        }
    }

    /// Batch for `layer`, if it was drawn this frame
    pub fn layer(&self, layer: Layer) -> Option<&Batch> {
        self.batches.iter().find(|b| b.layer == layer)
    }

    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, Particle};
    use crate::tuning::Tuning;

    fn busy_state() -> GameState {
        let mut state = GameState::new(8, Tuning::default());
        state.obstacles.push(Obstacle {
            x: 400.0,
            top_height: 150.0,
            gap: 180.0,
            passed: false,
        });
        state.particles.push(Particle {
            pos: Vec2::new(130.0, 280.0),
            vel: Vec2::ZERO,
            life: 0.25,
            hue: 0.0,
        });
        state
    }

    #[test]
    fn test_draw_order_back_to_front() {
        let scene = Scene::build(&busy_state(), AssetStatus::READY, &Settings::default(), Vec2::ZERO);
        let layers: Vec<Layer> = scene.batches.iter().map(|b| b.layer).collect();
        assert_eq!(layers, vec![Layer::Obstacles, Layer::Particles, Layer::Player]);
    }

    #[test]
    fn test_missing_assets_skip_sprites_only() {
        let assets = AssetStatus {
            player: false,
            fire: false,
        };
        let scene = Scene::build(&busy_state(), assets, &Settings::default(), Vec2::ZERO);
        assert!(scene.layer(Layer::Obstacles).is_none());
        assert!(scene.layer(Layer::Player).is_none());
        assert!(scene.layer(Layer::Particles).is_some());

        let assets = AssetStatus {
            player: true,
            fire: false,
        };
        let scene = Scene::build(&busy_state(), assets, &Settings::default(), Vec2::ZERO);
        assert!(scene.layer(Layer::Player).is_some());
        assert!(scene.layer(Layer::Obstacles).is_none());
    }

    #[test]
    fn test_obstacle_columns_cover_playfield() {
        let scene = Scene::build(&busy_state(), AssetStatus::READY, &Settings::default(), Vec2::ZERO);
        let batch = scene.layer(Layer::Obstacles).unwrap();
        assert_eq!(batch.vertices.len(), 12);
        let ys: Vec<f32> = batch.vertices.iter().map(|v| v.position[1]).collect();
        assert!(ys.contains(&0.0));
        assert!(ys.contains(&150.0));
        assert!(ys.contains(&330.0));
        assert!(ys.contains(&600.0));
    }

    #[test]
    fn test_particle_opacity_is_life() {
        let scene = Scene::build(&busy_state(), AssetStatus::READY, &Settings::default(), Vec2::ZERO);
        let batch = scene.layer(Layer::Particles).unwrap();
        assert_eq!(batch.texture, Texture::Solid);
        assert!(batch.vertices.iter().all(|v| v.color[3] == 0.25));
    }

    #[test]
    fn test_settings_disable_effects() {
        let settings = Settings {
            screen_shake: false,
            particles: false,
            ..Settings::default()
        };
        let scene = Scene::build(&busy_state(), AssetStatus::READY, &settings, Vec2::new(4.0, -3.0));
        assert_eq!(scene.offset, Vec2::ZERO);
        assert!(scene.layer(Layer::Particles).is_none());
    }

    #[test]
    fn test_shake_offset_carried() {
        let offset = Vec2::new(4.0, -3.0);
        let scene = Scene::build(&busy_state(), AssetStatus::READY, &Settings::default(), offset);
        assert_eq!(scene.offset, offset);
        assert_eq!(scene.size, Vec2::new(800.0, 600.0));
    }
}
