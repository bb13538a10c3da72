//! Shape tessellation for 2D primitives (triangle lists)

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use super::vertex::Vertex;

/// Filled circle as a fan of `segments` triangles
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Disk shaded with a linear gradient from `from` to `to`, the gradient axis
/// turned by `angle` radians (so the disk visibly spins)
pub fn gradient_disk(
    center: Vec2,
    radius: f32,
    from: [f32; 4],
    to: [f32; 4],
    angle: f32,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    // Gradient runs along the 45° diagonal, rotated with the button
    let axis = Vec2::from_angle(angle + PI / 4.0);
    let shade = |offset: Vec2| {
        let t = ((offset.dot(axis) / radius.max(f32::EPSILON)) + 1.0) * 0.5;
        lerp_color(from, to, t.clamp(0.0, 1.0))
    };

    let mid = lerp_color(from, to, 0.5);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let p1 = Vec2::new(radius * theta1.cos(), radius * theta1.sin());
        let p2 = Vec2::new(radius * theta2.cos(), radius * theta2.sin());

        vertices.push(Vertex::new(center.x, center.y, mid));
        vertices.push(Vertex::new(center.x + p1.x, center.y + p1.y, shade(p1)));
        vertices.push(Vertex::new(center.x + p2.x, center.y + p2.y, shade(p2)));
    }
    vertices
}

/// Ring (hollow circle); the outer edge fades to `outer_alpha`
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    outer_alpha: f32,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let outer_color = [color[0], color[1], color[2], outer_alpha];
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, outer_color));
        vertices.push(Vertex::new(outer2.x, outer2.y, outer_color));
    }

    vertices
}

/// Star with `points` tips; `rotation` in radians
pub fn star(
    center: Vec2,
    outer_radius: f32,
    inner_radius: f32,
    points: u32,
    rotation: f32,
    color: [f32; 4],
) -> Vec<Vertex> {
    let points = points.max(2);
    let corners = points * 2;
    let corner = |i: u32| {
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        // Tip 0 points up (y down in viewport space)
        let theta = rotation - PI / 2.0 + (i as f32 / corners as f32) * TAU;
        center + Vec2::new(r * theta.cos(), r * theta.sin())
    };

    let mut vertices = Vec::with_capacity((corners * 3) as usize);
    for i in 0..corners {
        let a = corner(i);
        let b = corner((i + 1) % corners);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Thick line segment whose width and color taper from `start` to `end`
pub fn tapered_line(
    start: Vec2,
    end: Vec2,
    start_width: f32,
    end_width: f32,
    start_color: [f32; 4],
    end_color: [f32; 4],
) -> Vec<Vertex> {
    let dir = (end - start).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x);

    let s1 = start + perp * (start_width / 2.0);
    let s2 = start - perp * (start_width / 2.0);
    let e1 = end + perp * (end_width / 2.0);
    let e2 = end - perp * (end_width / 2.0);

    vec![
        Vertex::new(s1.x, s1.y, start_color),
        Vertex::new(s2.x, s2.y, start_color),
        Vertex::new(e1.x, e1.y, end_color),
        Vertex::new(e1.x, e1.y, end_color),
        Vertex::new(s2.x, s2.y, start_color),
        Vertex::new(e2.x, e2.y, end_color),
    ]
}

/// Polyline of uniform width through `points`
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    points
        .windows(2)
        .flat_map(|pair| tapered_line(pair[0], pair[1], width, width, color, color))
        .collect()
}

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_circle_vertices_on_radius() {
        let center = Vec2::new(10.0, 20.0);
        let vertices = circle(center, 5.0, WHITE, 8);
        assert_eq!(vertices.len(), 24);
        for tri in vertices.chunks(3) {
            assert_eq!(tri[0].position, [10.0, 20.0]);
            let rim = Vec2::from(tri[1].position);
            assert!((rim.distance(center) - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_star_tips() {
        let vertices = star(Vec2::ZERO, 10.0, 4.0, 5, 0.0, WHITE);
        assert_eq!(vertices.len(), 30);
        // First tip points straight up
        let tip = vertices[1].position;
        assert!(tip[0].abs() < 1e-4);
        assert!((tip[1] + 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_gradient_disk_spans_colors() {
        let red = [1.0, 0.0, 0.0, 1.0];
        let blue = [0.0, 0.0, 1.0, 1.0];
        let vertices = gradient_disk(Vec2::ZERO, 10.0, red, blue, 0.0, 32);
        let reds: Vec<f32> = vertices.iter().map(|v| v.color[0]).collect();
        let max = reds.iter().cloned().fold(f32::MIN, f32::max);
        let min = reds.iter().cloned().fold(f32::MAX, f32::min);
        assert!(max > 0.9 && min < 0.1);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        assert!(tapered_line(Vec2::ONE, Vec2::ONE, 2.0, 2.0, WHITE, WHITE).is_empty());
        assert_eq!(
            polyline(&[Vec2::ZERO, Vec2::X, Vec2::new(1.0, 1.0)], 1.0, WHITE).len(),
            12
        );
    }
}
