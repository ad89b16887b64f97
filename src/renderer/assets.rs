//! Sprite assets and their readiness
//!
//! Images load asynchronously. The render step polls a ready flag per asset
//! and simply leaves out whatever is not available yet.

/// The two images the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Fire,
}

impl SpriteId {
    pub const ALL: [SpriteId; 2] = [SpriteId::Player, SpriteId::Fire];

    /// Path relative to the page
    pub fn path(&self) -> &'static str {
        match self {
            SpriteId::Player => "assets/player.png",
            SpriteId::Fire => "assets/fire.png",
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            SpriteId::Player => 0,
            SpriteId::Fire => 1,
        }
    }

    /// Procedural RGBA8 stand-in, drawn until the real image has decoded
    pub fn placeholder(&self) -> ((u32, u32), Vec<u8>) {
        match self {
            SpriteId::Player => ((PLAYER_TEXELS, PLAYER_TEXELS), player_pixels()),
            SpriteId::Fire => ((FIRE_TEXELS.0, FIRE_TEXELS.1), fire_pixels()),
        }
    }
}

const PLAYER_TEXELS: u32 = 32;
/// Width, height
const FIRE_TEXELS: (u32, u32) = (16, 64);

/// Round yellow body with a dark eye facing right
fn player_pixels() -> Vec<u8> {
    let n = PLAYER_TEXELS as f32;
    let center = n / 2.0;
    let radius = center - 1.0;
    let eye = (center + radius * 0.45, center - radius * 0.3);

    let mut rgba = Vec::with_capacity((PLAYER_TEXELS * PLAYER_TEXELS * 4) as usize);
    for y in 0..PLAYER_TEXELS {
        for x in 0..PLAYER_TEXELS {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let body = (px - center).hypot(py - center) <= radius;
            let pupil = (px - eye.0).hypot(py - eye.1) <= radius * 0.18;
            let texel = match (body, pupil) {
                (true, true) => [30, 20, 20, 255],
                (true, false) => [255, 200, 40, 255],
                (false, _) => [0, 0, 0, 0],
            };
            rgba.extend_from_slice(&texel);
        }
    }
    rgba
}

/// Opaque flame column: yellow tip at the top, deep red base at the bottom
fn fire_pixels() -> Vec<u8> {
    const TIP: [f32; 3] = [255.0, 220.0, 60.0];
    const BASE: [f32; 3] = [200.0, 30.0, 10.0];

    let (width, height) = FIRE_TEXELS;
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let t = y as f32 / (height - 1) as f32;
        let [r, g, b] = [0, 1, 2].map(|i| (TIP[i] + (BASE[i] - TIP[i]) * t).round() as u8);
        for _ in 0..width {
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
    }
    rgba
}

/// Per-asset ready flags for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStatus {
    pub player: bool,
    pub fire: bool,
}

impl AssetStatus {
    /// Everything loaded
    pub const READY: AssetStatus = AssetStatus {
        player: true,
        fire: true,
    };

    pub fn is_ready(&self, sprite: SpriteId) -> bool {
        match sprite {
            SpriteId::Player => self.player,
            SpriteId::Fire => self.fire,
        }
    }

    pub fn set(&mut self, sprite: SpriteId, ready: bool) {
        match sprite {
            SpriteId::Player => self.player = ready,
            SpriteId::Fire => self.fire = ready,
        }
    }
}
