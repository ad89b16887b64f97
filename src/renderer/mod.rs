//! Rendering module
//!
//! `scene` turns a snapshot into back-to-front sprite batches without touching
//! the GPU; `pipeline` draws those batches with WebGPU.

pub mod assets;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod textures;
pub mod vertex;

pub use assets::{AssetStatus, SpriteId};
pub use pipeline::SpriteRenderer;
pub use scene::{Batch, Layer, Scene, Texture};

use thiserror::Error;

use crate::engine::RenderSurface;

/// Renderer setup failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no usable format")]
    UnsupportedSurface,
}

/// Surface that draws nothing, for headless runs and tests
#[derive(Debug, Default)]
pub struct Headless {
    /// Assets reported as ready every frame
    pub assets: AssetStatus,
    /// Frames presented so far
    pub frames: u64,
    /// Most recent frame
    pub last_scene: Option<Scene>,
}

impl Headless {
    pub fn new(assets: AssetStatus) -> Self {
        Self {
            assets,
            ..Self::default()
        }
    }
}

impl RenderSurface for Headless {
    fn assets(&mut self) -> AssetStatus {
        self.assets
    }

    fn present(&mut self, scene: &Scene) {
        self.frames += 1;
        self.last_scene = Some(scene.clone());
    }
}
