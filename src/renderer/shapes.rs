//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Transform;

/// Axis-aligned rectangle from two corners
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Number of vertices `rounded_rect` emits for a given corner resolution
pub const fn rounded_rect_len(segments: u32) -> usize {
    (4 * (segments as usize + 1)) * 3
}

/// Rectangle with circular corners, as a fan around its centre
pub fn rounded_rect(
    center: Vec2,
    half_size: Vec2,
    radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let r = radius.clamp(0.0, half_size.x.min(half_size.y));
    let inner = half_size - Vec2::splat(r);
    let corners = [
        Vec2::new(inner.x, inner.y),
        Vec2::new(-inner.x, inner.y),
        Vec2::new(-inner.x, -inner.y),
        Vec2::new(inner.x, -inner.y),
    ];

    let mut outline = Vec::with_capacity(4 * (segments as usize + 1));
    for (quadrant, corner) in corners.iter().enumerate() {
        let start = quadrant as f32 * FRAC_PI_2;
        for i in 0..=segments {
            let theta = start + (i as f32 / segments.max(1) as f32) * FRAC_PI_2;
            outline.push(center + *corner + Vec2::new(theta.cos(), theta.sin()) * r);
        }
    }

    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

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

/// Pip layout for a die face on a [-1, 1] grid
pub fn die_pips(face: u8) -> &'static [(f32, f32)] {
    match face {
        1 => &[(0.0, 0.0)],
        2 => &[(-1.0, -1.0), (1.0, 1.0)],
        3 => &[(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)],
        4 => &[(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)],
        5 => &[(-1.0, -1.0), (1.0, -1.0), (0.0, 0.0), (-1.0, 1.0), (1.0, 1.0)],
        6 => &[
            (-1.0, -1.0),
            (1.0, -1.0),
            (-1.0, 0.0),
            (1.0, 0.0),
            (-1.0, 1.0),
            (1.0, 1.0),
        ],
        _ => &[],
    }
}

/// Scale and rotate vertices built around the origin, then move them to `center`
pub fn place(vertices: &mut [Vertex], center: Vec2, transform: &Transform) {
    let (sin, cos) = transform.rotation.sin_cos();
    let origin = center + transform.offset;
    for v in vertices {
        let p = Vec2::from(v.position) * transform.scale;
        let rotated = Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos);
        v.position = (origin + rotated).into();
    }
}
