//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in world units (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    rect_gradient(min, max, color, color)
}

/// Rectangle with a vertical gradient from `top` to `bottom`
pub fn rect_gradient(min: Vec2, max: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), 0.0, color, segments)
}

/// Filled ellipse with the given half-axes, rotated by `angle` radians
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    angle: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(3);
    let rot = Vec2::from_angle(angle);
    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        center + rot.rotate(Vec2::new(radii.x * theta.cos(), radii.y * theta.sin()))
    };

    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let p1 = point(i);
        let p2 = point(i + 1);

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Two triangles over four corners given clockwise from the top-left, each
/// with its own texture coordinate
fn quad(corners: [Vec2; 4], uvs: [[f32; 2]; 4], tint: [f32; 4]) -> Vec<Vertex> {
    let v = |i: usize| Vertex::textured(corners[i].x, corners[i].y, uvs[i], tint);
    vec![v(0), v(1), v(3), v(3), v(1), v(2)]
}

/// Whole image stretched over an axis-aligned rectangle. With `flip_v` the
/// image's top row lands on `max.y`.
pub fn image_rect(min: Vec2, max: Vec2, flip_v: bool, tint: [f32; 4]) -> Vec<Vertex> {
    let (top, bottom) = if flip_v { (1.0, 0.0) } else { (0.0, 1.0) };
    quad(
        [
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ],
        [[0.0, top], [1.0, top], [1.0, bottom], [0.0, bottom]],
        tint,
    )
}

/// Whole image centered on `center`, `half` extents, rotated by `angle` radians
pub fn image_rotated(center: Vec2, half: Vec2, angle: f32, tint: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x * half.x, y * half.y));
    quad(
        [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ],
        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        tint,
    )
}

/// Seven-segment masks for 0-9; bit order a b c d e f g (top, clockwise, middle)
const DIGIT_SEGMENTS: [u8; 10] = [63, 6, 91, 79, 102, 109, 125, 7, 127, 111];

/// Width of one digit relative to its height
const DIGIT_ASPECT: f32 = 0.55;
/// Space between digits relative to height
const DIGIT_SPACING: f32 = 0.2;

/// A non-negative number in seven-segment digits, centered on `center`
pub fn number(value: u32, center: Vec2, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let digits = value.to_string();
    let count = digits.len() as f32;
    let width = height * DIGIT_ASPECT;
    let spacing = height * DIGIT_SPACING;
    let total = count * width + (count - 1.0) * spacing;

    let mut vertices = Vec::new();
    let mut x = center.x - total / 2.0;
    let y = center.y - height / 2.0;
    for digit in digits.bytes().map(|b| (b - b'0') as usize) {
        vertices.extend(seven_segment(
            DIGIT_SEGMENTS[digit],
            Vec2::new(x, y),
            width,
            height,
            color,
        ));
        x += width + spacing;
    }
    vertices
}

fn seven_segment(mask: u8, top_left: Vec2, w: f32, h: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = h * 0.14;
    let (x, y) = (top_left.x, top_left.y);
    let mid = y + h / 2.0;
    let segments = [
        (Vec2::new(x, y), Vec2::new(x + w, y + t)),
        (Vec2::new(x + w - t, y), Vec2::new(x + w, mid)),
        (Vec2::new(x + w - t, mid), Vec2::new(x + w, y + h)),
        (Vec2::new(x, y + h - t), Vec2::new(x + w, y + h)),
        (Vec2::new(x, mid), Vec2::new(x + t, y + h)),
        (Vec2::new(x, y), Vec2::new(x + t, mid)),
        (Vec2::new(x, mid - t / 2.0), Vec2::new(x + w, mid + t / 2.0)),
    ];

    segments
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .flat_map(|(_, (min, max))| rect(*min, *max, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    #[test]
    fn test_rect_covers_corners() {
        let verts = rect(Vec2::new(1.0, 2.0), Vec2::new(3.0, 5.0), WHITE);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().any(|v| v.position == [1.0, 2.0]));
        assert!(verts.iter().any(|v| v.position == [3.0, 5.0]));
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 10.0, WHITE, 24).len(), 72);
    }

    #[test]
    fn test_rotated_ellipse_stays_within_major_axis() {
        let verts = ellipse(Vec2::new(5.0, 5.0), Vec2::new(8.0, 3.0), 0.9, WHITE, 32);
        for v in verts {
            let d = Vec2::from(v.position).distance(Vec2::new(5.0, 5.0));
            assert!(d <= 8.0 + 1e-3);
        }
    }

    #[test]
    fn test_image_rect_flip() {
        let min = Vec2::new(0.0, 10.0);
        let max = Vec2::new(20.0, 50.0);
        let v_at = |verts: &[Vertex], y: f32| {
            verts
                .iter()
                .filter(|v| v.position[1] == y)
                .map(|v| v.uv[1])
                .collect::<Vec<_>>()
        };

        let upright = image_rect(min, max, false, WHITE);
        assert!(v_at(&upright, 10.0).iter().all(|v| *v == 0.0));
        assert!(v_at(&upright, 50.0).iter().all(|v| *v == 1.0));

        let flipped = image_rect(min, max, true, WHITE);
        assert_eq!(flipped.len(), 6);
        assert!(v_at(&flipped, 10.0).iter().all(|v| *v == 1.0));
        assert!(v_at(&flipped, 50.0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_image_rotated_quarter_turn() {
        let verts = image_rotated(Vec2::ZERO, Vec2::new(4.0, 2.0), PI / 2.0, WHITE);
        // Image top-left corner (uv 0,0) starts at (-4,-2) and turns to (2,-4)
        let top_left = verts.iter().find(|v| v.uv == [0.0, 0.0]).unwrap();
        assert!((Vec2::from(top_left.position) - Vec2::new(2.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_number_segments() {
        // 8 lights all seven segments, 1 lights two
        assert_eq!(number(8, Vec2::ZERO, 40.0, WHITE).len(), 7 * 6);
        assert_eq!(number(1, Vec2::ZERO, 40.0, WHITE).len(), 2 * 6);
        assert_eq!(number(10, Vec2::ZERO, 40.0, WHITE).len(), (2 + 6) * 6);
    }

    #[test]
    fn test_number_is_centered() {
        let verts = number(42, Vec2::new(100.0, 60.0), 40.0, WHITE);
        let min_x = verts.iter().map(|v| v.position[0]).fold(f32::MAX, f32::min);
        let max_x = verts.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        assert!(((min_x + max_x) / 2.0 - 100.0).abs() < 1e-3);
    }
}
