//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list. Shapes that take a `rotation`
//! are built around the origin, rotated, then translated to `center`.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Rotate `local` by `rotation` radians and translate it to `origin`
#[inline]
fn place(local: Vec2, origin: Vec2, rotation: f32) -> Vec2 {
    origin + Vec2::from_angle(rotation).rotate(local)
}

/// Rotate and translate an already built shape
pub fn transformed(mut vertices: Vec<Vertex>, origin: Vec2, rotation: f32) -> Vec<Vertex> {
    for v in &mut vertices {
        let p = place(Vec2::from(v.position), origin, rotation);
        v.position = p.into();
    }
    vertices
}

/// Single triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Filled rectangle with half extents `half`, rotated about its center
pub fn rect(center: Vec2, half: Vec2, rotation: f32, color: [f32; 4]) -> Vec<Vertex> {
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| place(c, center, rotation));

    let mut vertices = triangle(corners[0], corners[1], corners[2], color);
    vertices.extend(triangle(corners[0], corners[2], corners[3], color));
    vertices
}

/// Rectangle border of the given thickness, drawn inside the half extents
pub fn rect_outline(
    center: Vec2,
    half: Vec2,
    thickness: f32,
    rotation: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let t = thickness.min(half.x).min(half.y);
    let bars = [
        // top, bottom, left, right
        (Vec2::new(0.0, -half.y + t / 2.0), Vec2::new(half.x, t / 2.0)),
        (Vec2::new(0.0, half.y - t / 2.0), Vec2::new(half.x, t / 2.0)),
        (Vec2::new(-half.x + t / 2.0, 0.0), Vec2::new(t / 2.0, half.y - t)),
        (Vec2::new(half.x - t / 2.0, 0.0), Vec2::new(t / 2.0, half.y - t)),
    ];

    let mut vertices = Vec::with_capacity(24);
    for (offset, bar_half) in bars {
        vertices.extend(rect(place(offset, center, rotation), bar_half, rotation, color));
    }
    vertices
}

/// Filled axis-aligned ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    let at = |r: f32, theta: f32| center + Vec2::new(r * theta.cos(), r * theta.sin());

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let inner1 = at(inner_radius, theta1);
        let outer1 = at(outer_radius, theta1);
        let inner2 = at(inner_radius, theta2);
        let outer2 = at(outer_radius, theta2);

        // Two triangles per segment
        vertices.extend(triangle(inner1, outer1, inner2, color));
        vertices.extend(triangle(inner2, outer1, outer2, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        vertices.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec2::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    #[test]
    fn test_rect_axis_aligned() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 2.0), 0.0, RED);
        assert_eq!(verts.len(), 6);
        let (lo, hi) = bounds(&verts);
        assert!(lo.abs_diff_eq(Vec2::new(5.0, 18.0), 1e-5));
        assert!(hi.abs_diff_eq(Vec2::new(15.0, 22.0), 1e-5));
    }

    #[test]
    fn test_rect_quarter_turn_swaps_extents() {
        let verts = rect(Vec2::ZERO, Vec2::new(5.0, 2.0), PI / 2.0, RED);
        let (lo, hi) = bounds(&verts);
        assert!(lo.abs_diff_eq(Vec2::new(-2.0, -5.0), 1e-4));
        assert!(hi.abs_diff_eq(Vec2::new(2.0, 5.0), 1e-4));
    }

    #[test]
    fn test_outline_stays_inside() {
        let verts = rect_outline(Vec2::new(50.0, 50.0), Vec2::splat(10.0), 2.0, 0.0, RED);
        assert_eq!(verts.len(), 24);
        let (lo, hi) = bounds(&verts);
        assert!(lo.abs_diff_eq(Vec2::splat(40.0), 1e-4));
        assert!(hi.abs_diff_eq(Vec2::splat(60.0), 1e-4));
    }

    #[test]
    fn test_circle_radius() {
        let center = Vec2::new(3.0, 4.0);
        let verts = circle(center, 7.0, RED, 12);
        assert_eq!(verts.len(), 36);
        for v in &verts {
            assert!(Vec2::from(v.position).distance(center) <= 7.0 + 1e-4);
        }
    }

    #[test]
    fn test_transformed_moves_origin() {
        let verts = transformed(triangle(Vec2::ZERO, Vec2::X, Vec2::Y, RED), Vec2::new(5.0, 5.0), PI);
        assert!(Vec2::from(verts[0].position).abs_diff_eq(Vec2::new(5.0, 5.0), 1e-5));
        assert!(Vec2::from(verts[1].position).abs_diff_eq(Vec2::new(4.0, 5.0), 1e-5));
    }
}
