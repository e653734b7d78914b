/// Below this, three points are treated as collinear.
const EPS: f32 = 1e-6;

/// Triangulates a simple polygon (convex or concave, either winding) by ear clipping.
///
/// Returns indices into `points`, three per triangle, each triangle wound
/// counter-clockwise. Fewer than three points yield no triangles.
pub fn triangulate(points: &[[f32; 2]]) -> Vec<u32> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut ring: Vec<usize> = (0..n).collect();
    if signed_area(points) < 0.0 {
        ring.reverse();
    }

    let mut out = Vec::with_capacity((n - 2) * 3);

    while ring.len() > 3 {
        let m = ring.len();
        let mut clipped = false;

        for i in 0..m {
            let (a, b, c) = (ring[(i + m - 1) % m], ring[i], ring[(i + 1) % m]);
            let turn = cross(points[a], points[b], points[c]);

            if turn.abs() <= EPS {
                // Collinear: drop the middle vertex, it adds no area.
                ring.remove(i);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }

            let blocked = ring
                .iter()
                .filter(|&&p| p != a && p != b && p != c)
                .any(|&p| in_triangle(points[p], points[a], points[b], points[c]));
            if blocked {
                continue;
            }

            out.extend([a as u32, b as u32, c as u32]);
            ring.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            // Self-intersecting input has no ear; clip anyway so we terminate.
            log::warn!("polygon is not simple; triangulation may overlap");
            out.extend([ring[m - 1] as u32, ring[0] as u32, ring[1] as u32]);
            ring.remove(0);
        }
    }

    if cross(points[ring[0]], points[ring[1]], points[ring[2]]).abs() > EPS {
        out.extend([ring[0] as u32, ring[1] as u32, ring[2] as u32]);
    }

    out
}

/// Twice the signed area; positive for counter-clockwise winding.
fn signed_area(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let [x0, y0] = points[i];
            let [x1, y1] = points[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum()
}

fn cross(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(points: &[[f32; 2]], indices: &[u32]) -> f32 {
        indices
            .chunks(3)
            .map(|t| {
                let tri = [
                    points[t[0] as usize],
                    points[t[1] as usize],
                    points[t[2] as usize],
                ];
                signed_area(&tri) / 2.0
            })
            .sum()
    }

    fn assert_ccw(points: &[[f32; 2]], indices: &[u32]) {
        for t in indices.chunks(3) {
            let c = cross(
                points[t[0] as usize],
                points[t[1] as usize],
                points[t[2] as usize],
            );
            assert!(c > 0.0, "triangle {t:?} is not counter-clockwise");
        }
    }

    const STAR: [[f32; 2]; 8] = [
        [0.0, 0.0],
        [8.0, 32.0],
        [0.0, 64.0],
        [32.0, 56.0],
        [64.0, 64.0],
        [56.0, 32.0],
        [64.0, 0.0],
        [32.0, 8.0],
    ];

    #[test]
    fn square_becomes_two_triangles() {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let idx = triangulate(&square);
        assert_eq!(idx.len(), 6);
        assert!((area_of(&square, &idx) - 1.0).abs() < 1e-6);
        assert_ccw(&square, &idx);
    }

    #[test]
    fn concave_star_is_covered_exactly() {
        let idx = triangulate(&STAR);
        assert_eq!(idx.len(), (STAR.len() - 2) * 3);

        let expected = (signed_area(&STAR) / 2.0).abs();
        assert!((area_of(&STAR, &idx) - expected).abs() < 1e-3);
        assert_ccw(&STAR, &idx);
    }

    #[test]
    fn winding_does_not_matter() {
        let mut reversed = STAR;
        reversed.reverse();
        let idx = triangulate(&reversed);
        let expected = (signed_area(&STAR) / 2.0).abs();
        assert!((area_of(&reversed, &idx) - expected).abs() < 1e-3);
    }

    #[test]
    fn collinear_vertices_produce_no_slivers() {
        let pts = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        let idx = triangulate(&pts);
        assert!((area_of(&pts, &idx) - 4.0).abs() < 1e-5);
        assert_ccw(&pts, &idx);
    }

    #[test]
    fn degenerate_input_yields_nothing() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0]]).is_empty());
        assert!(triangulate(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]).is_empty());
    }
}
