//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in arena coordinates
//! (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::palette::Rgba;
use crate::sim::Rect;

/// Filled axis-aligned rectangle
pub fn rect(r: &Rect, color: Rgba) -> Vec<Vertex> {
    let (x0, y0, x1, y1) = (r.x, r.y, r.x + r.w, r.y + r.h);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Rectangle border of the given thickness, drawn inside `r`
pub fn rect_outline(r: &Rect, thickness: f32, color: Rgba) -> Vec<Vertex> {
    let t = thickness.min(r.w / 2.0).min(r.h / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(&Rect::new(r.x, r.y, r.w, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.y + r.h - t, r.w, t), color));
    vertices.extend(rect(&Rect::new(r.x, r.y + t, t, r.h - 2.0 * t), color));
    vertices.extend(rect(&Rect::new(r.x + r.w - t, r.y + t, t, r.h - 2.0 * t), color));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
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
