//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Texture-coordinate orientation of a sprite quad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvOrientation {
    Upright,
    /// Rotated half a turn (flipped on both axes)
    HalfTurn,
}

/// Convert HSL (hue in degrees, saturation/lightness in 0-1) to RGB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m]
}

/// Axis-aligned textured quad covering `rect` (two triangles)
pub fn sprite_quad(rect: &Rect, orientation: UvOrientation, color: [f32; 4]) -> [Vertex; 6] {
    let (u0, v0, u1, v1) = match orientation {
        UvOrientation::Upright => (0.0, 0.0, 1.0, 1.0),
        UvOrientation::HalfTurn => (1.0, 1.0, 0.0, 0.0),
    };
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    [
        Vertex::new(x0, y0, u0, v0, color),
        Vertex::new(x1, y0, u1, v0, color),
        Vertex::new(x0, y1, u0, v1, color),
        Vertex::new(x0, y1, u0, v1, color),
        Vertex::new(x1, y0, u1, v0, color),
        Vertex::new(x1, y1, u1, v1, color),
    ]
}

/// Textured quad of `size` centered on `center`, rotated by `angle`
/// (clockwise on screen, since y grows downward)
pub fn rotated_sprite(center: Vec2, size: Vec2, angle: f32, color: [f32; 4]) -> [Vertex; 6] {
    let half = size / 2.0;
    let rot = Vec2::from_angle(angle);
    let corner = |dx: f32, dy: f32, u: f32, v: f32| {
        let p = center + rot.rotate(Vec2::new(dx, dy));
        Vertex::new(p.x, p.y, u, v, color)
    };
    let tl = corner(-half.x, -half.y, 0.0, 0.0);
    let tr = corner(half.x, -half.y, 1.0, 0.0);
    let bl = corner(-half.x, half.y, 0.0, 1.0);
    let br = corner(half.x, half.y, 1.0, 1.0);
    [tl, tr, bl, bl, tr, br]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::solid(center.x, center.y, color));
        vertices.push(Vertex::solid(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::solid(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_hsl_fire_palette() {
        // hsl(0, 100%, 60%) is a light red
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.6), [1.0, 0.2, 0.2]));
        // hsl(60, 100%, 60%) is a light yellow
        assert!(close(hsl_to_rgb(60.0, 1.0, 0.6), [1.0, 1.0, 0.2]));
        // hsl(30, 100%, 60%) is orange
        assert!(close(hsl_to_rgb(30.0, 1.0, 0.6), [1.0, 0.6, 0.2]));
    }

    #[test]
    fn test_sprite_quad_half_turn_flips_uv() {
        let rect = Rect::new(10.0, 0.0, 80.0, 120.0);
        let upright = sprite_quad(&rect, UvOrientation::Upright, [1.0; 4]);
        let flipped = sprite_quad(&rect, UvOrientation::HalfTurn, [1.0; 4]);
        for (a, b) in upright.iter().zip(flipped.iter()) {
            assert_eq!(a.position, b.position);
            assert_eq!(a.uv[0], 1.0 - b.uv[0]);
            assert_eq!(a.uv[1], 1.0 - b.uv[1]);
        }
        assert_eq!(upright[0].position, [10.0, 0.0]);
        assert_eq!(upright[5].position, [90.0, 120.0]);
    }

    #[test]
    fn test_rotated_sprite_unrotated_matches_bounds() {
        let verts = rotated_sprite(Vec2::new(130.0, 280.0), Vec2::splat(60.0), 0.0, [1.0; 4]);
        assert_eq!(verts[0].position, [100.0, 250.0]);
        assert_eq!(verts[5].position, [160.0, 310.0]);
    }

    #[test]
    fn test_rotated_sprite_quarter_turn() {
        let verts = rotated_sprite(Vec2::ZERO, Vec2::new(2.0, 2.0), PI / 2.0, [1.0; 4]);
        // Top-left corner (-1,-1) turns to (1,-1) on a y-down screen
        assert!((verts[0].position[0] - 1.0).abs() < 1e-5);
        assert!((verts[0].position[1] - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::new(5.0, 5.0), 4.0, [1.0; 4], 12);
        assert_eq!(verts.len(), 36);
        assert!(verts.iter().all(|v| v.uv == [0.5, 0.5]));
    }
}
