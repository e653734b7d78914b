use glam::{Mat4, Vec2, Vec3, Vec4};

/// A flat polygon placed in the world.
///
/// Vertices are stored in world space as homogeneous points, in outline order.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec4>,
    pos: Vec4,
}

impl Polygon {
    /// Places `local` vertices (relative to the polygon origin) at `pos`.
    pub fn new(local: &[[f32; 4]], pos: [f32; 4]) -> Self {
        let pos = Vec4::from_array(pos);
        let vertices = local
            .iter()
            .map(|&v| {
                let v = Vec4::from_array(v);
                (v.truncate() + pos.truncate()).extend(v.w)
            })
            .collect();
        Self { vertices, pos }
    }

    pub fn pos(&self) -> Vec4 {
        self.pos
    }

    /// Rotates every vertex by `angle` radians (counter-clockwise) around `about`.
    pub fn rotate(&mut self, angle: f32, about: Vec4) {
        let pivot = about.truncate();
        let m = Mat4::from_translation(pivot)
            * Mat4::from_rotation_z(angle)
            * Mat4::from_translation(-pivot);
        for v in &mut self.vertices {
            *v = m * *v;
        }
    }

    /// World-space vertices, ready for upload.
    pub fn vertices(&self) -> Vec<[f32; 4]> {
        self.vertices.iter().map(|v| v.to_array()).collect()
    }

    /// Area centroid of the outline in the xy plane.
    pub fn centroid(&self) -> Vec2 {
        let n = self.vertices.len();
        let (mut area2, mut c) = (0.0f32, Vec2::ZERO);
        for i in 0..n {
            let a = self.vertices[i].truncate().truncate();
            let b = self.vertices[(i + 1) % n].truncate().truncate();
            let cross = a.perp_dot(b);
            area2 += cross;
            c += (a + b) * cross;
        }
        if area2.abs() <= f32::EPSILON {
            // Degenerate outline: fall back to the vertex mean.
            let sum: Vec3 = self.vertices.iter().map(|v| v.truncate()).sum();
            return sum.truncate() / n.max(1) as f32;
        }
        c / (3.0 * area2)
    }
}
