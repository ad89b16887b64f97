//! Axis-aligned collision geometry
//!
//! Everything that can collide in the playfield is a rectangle: the player's
//! bounding box and the two columns of every obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Collision geometry of one obstacle: the column hanging from the top of the
/// playfield and the one standing on the bottom.
pub fn obstacle_columns(
    x: f32,
    top_height: f32,
    gap: f32,
    width: f32,
    playfield_height: f32,
) -> [Rect; 2] {
    let bottom_y = top_height + gap;
    [
        Rect::new(x, 0.0, width, top_height),
        Rect::new(x, bottom_y, width, playfield_height - bottom_y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_shared_edge_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Touching on the right edge
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        // Touching on the bottom edge
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        // Touching at a corner
        assert!(!a.overlaps(&Rect::new(10.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_obstacle_columns_span_playfield() {
        let [top, bottom] = obstacle_columns(300.0, 120.0, 180.0, 80.0, 600.0);
        assert_eq!(top, Rect::new(300.0, 0.0, 80.0, 120.0));
        assert_eq!(bottom.y, 300.0);
        assert_eq!(bottom.bottom(), 600.0);
        assert_eq!(bottom.width, 80.0);
    }

    #[test]
    fn test_center() {
        let r = Rect::new(100.0, 250.0, 60.0, 60.0);
        assert_eq!(r.center(), Vec2::new(130.0, 280.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.5f32..200.0, ah in 0.5f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.5f32..200.0, bh in 0.5f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn edge_adjacent_never_overlaps(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
        ) {
            let a = Rect::new(x, y, w, h);
            let right = Rect::new(a.right(), y, w, h);
            let below = Rect::new(x, a.bottom(), w, h);
            prop_assert!(!a.overlaps(&right));
            prop_assert!(!a.overlaps(&below));
        }
    }
}
