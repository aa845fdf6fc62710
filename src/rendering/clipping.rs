/// View-space frustum clipping
/// Triangles are clipped as convex polygons against six half-spaces before
/// projection, so everything downstream divides by a strictly positive depth
use glam::{Vec2, Vec3};

/// Working-buffer capacity while clipping. A triangle gains at most one
/// vertex per plane cut, so 3 + 6 planes needs 9; one spare keeps the
/// buffer power-of-two-ish and covers duplicated boundary vertices.
pub const MAX_POLYGON_VERTS: usize = 10;

/// A fan over MAX_POLYGON_VERTS vertices yields at most this many triangles.
pub const MAX_CLIPPED_TRIANGLES: usize = MAX_POLYGON_VERTS - 2;

/// Half-space boundary. Points with `signed_distance >= 0` are inside.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    #[inline]
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p - self.point)
    }
}

/// The six view-space clipping planes, in clip order:
/// NEAR, FAR, LEFT, RIGHT, TOP, BOTTOM.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Build the planes from both field-of-view axes.
    ///
    /// View space is +Z forward. The side planes pass through the camera
    /// origin with normals from the half-angle sine/cosine of the matching
    /// FOV axis; near and far sit on the z axis with opposing normals.
    pub fn from_fov_axes(fov_x: f32, fov_y: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && near < far, "invalid near/far: {near} {far}");
        debug_assert!(
            fov_x > 0.0 && fov_x < std::f32::consts::PI,
            "invalid horizontal fov: {fov_x}"
        );
        debug_assert!(
            fov_y > 0.0 && fov_y < std::f32::consts::PI,
            "invalid vertical fov: {fov_y}"
        );

        let origin = Vec3::ZERO;

        let (sin_half_x, cos_half_x) = (fov_x * 0.5).sin_cos();
        let (sin_half_y, cos_half_y) = (fov_y * 0.5).sin_cos();

        Self {
            planes: [
                // NEAR
                Plane::new(Vec3::new(0.0, 0.0, near), Vec3::new(0.0, 0.0, 1.0)),
                // FAR
                Plane::new(Vec3::new(0.0, 0.0, far), Vec3::new(0.0, 0.0, -1.0)),
                // LEFT
                Plane::new(origin, Vec3::new(cos_half_x, 0.0, sin_half_x)),
                // RIGHT
                Plane::new(origin, Vec3::new(-cos_half_x, 0.0, sin_half_x)),
                // TOP
                Plane::new(origin, Vec3::new(0.0, -cos_half_y, sin_half_y)),
                // BOTTOM
                Plane::new(origin, Vec3::new(0.0, cos_half_y, sin_half_y)),
            ],
        }
    }

    /// Build the planes from a vertical FOV and aspect ratio, deriving the
    /// horizontal FOV the same way the projection matrix does.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(aspect > 0.0, "invalid aspect ratio: {aspect}");
        let fov_x = 2.0 * ((fov_y * 0.5).tan() * aspect).atan();
        Self::from_fov_axes(fov_x, fov_y, near, far)
    }
}

/// One vertex of the polygon being clipped. Positions are view space;
/// UV and intensity ride along so plane cuts interpolate every attribute.
#[derive(Debug, Clone, Copy)]
pub struct ClipVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub intensity: f32,
}

impl ClipVertex {
    #[inline]
    pub fn new(position: Vec3, uv: Vec2, intensity: f32) -> Self {
        Self {
            position,
            uv,
            intensity,
        }
    }

    /// Linear interpolation of position and all attributes.
    #[inline]
    fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            position: self.position.lerp(other.position, t),
            uv: self.uv.lerp(other.uv, t),
            intensity: self.intensity + (other.intensity - self.intensity) * t,
        }
    }
}

/// Clip one triangle against all six frustum planes.
/// Returns (triangle_count, triangles); the count is 0 when the triangle is
/// entirely outside the frustum or degenerates below 3 vertices.
pub fn clip_triangle(
    frustum: &Frustum,
    tri: &[ClipVertex; 3],
) -> (usize, [[ClipVertex; 3]; MAX_CLIPPED_TRIANGLES]) {
    let mut tris = [[tri[0]; 3]; MAX_CLIPPED_TRIANGLES];

    let mut verts = [tri[0]; MAX_POLYGON_VERTS];
    verts[..3].copy_from_slice(tri);
    let mut len = 3usize;

    // Sutherland-Hodgman: each plane's output polygon feeds the next plane.
    for plane in frustum.planes.iter() {
        let mut inside = [verts[0]; MAX_POLYGON_VERTS];
        let mut inside_len = 0usize;

        for i in 0..len {
            let current = verts[i];
            let next = verts[(i + 1) % len];

            let current_distance = plane.signed_distance(current.position);
            let next_distance = plane.signed_distance(next.position);

            // Boundary-inclusive: a vertex exactly on the plane stays.
            if current_distance >= 0.0 {
                inside[inside_len] = current;
                inside_len += 1;
            }

            // Edge crosses the plane: emit the intersection vertex.
            if current_distance * next_distance < 0.0 {
                let t = current_distance / (current_distance - next_distance);
                inside[inside_len] = current.lerp(&next, t);
                inside_len += 1;
            }
        }

        if inside_len == 0 {
            return (0, tris);
        }

        verts[..inside_len].copy_from_slice(&inside[..inside_len]);
        len = inside_len;
    }

    if len < 3 {
        return (0, tris);
    }

    // Fan triangulation from vertex 0.
    let tri_count = len - 2;
    for i in 0..tri_count {
        tris[i] = [verts[0], verts[i + 1], verts[i + 2]];
    }

    (tri_count, tris)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frustum() -> Frustum {
        Frustum::perspective(60f32.to_radians(), 4.0 / 3.0, 0.2, 110.0)
    }

    fn vertex(x: f32, y: f32, z: f32) -> ClipVertex {
        ClipVertex::new(Vec3::new(x, y, z), Vec2::new(x, y), 1.0)
    }

    #[test]
    fn plane_signed_distance_sign() {
        let near = Plane::new(Vec3::new(0.0, 0.0, 0.2), Vec3::new(0.0, 0.0, 1.0));
        assert!(near.signed_distance(Vec3::new(0.0, 0.0, 1.0)) > 0.0);
        assert!(near.signed_distance(Vec3::new(0.0, 0.0, 0.1)) < 0.0);
        assert_eq!(near.signed_distance(Vec3::new(5.0, -3.0, 0.2)), 0.0);
    }

    #[test]
    fn triangle_inside_is_returned_unchanged() {
        let frustum = test_frustum();
        let tri = [
            vertex(-0.5, -0.5, 5.0),
            vertex(0.5, -0.5, 5.0),
            vertex(0.0, 0.5, 5.0),
        ];

        let (count, tris) = clip_triangle(&frustum, &tri);
        assert_eq!(count, 1);
        for i in 0..3 {
            assert!((tris[0][i].position - tri[i].position).length() < 1e-6);
            assert!((tris[0][i].uv - tri[i].uv).length() < 1e-6);
        }
    }

    #[test]
    fn triangle_beyond_far_is_clipped_away() {
        let frustum = test_frustum();
        let tri = [
            vertex(-1.0, 0.0, 150.0),
            vertex(1.0, 0.0, 150.0),
            vertex(0.0, 1.0, 200.0),
        ];

        let (count, _) = clip_triangle(&frustum, &tri);
        assert_eq!(count, 0);
    }

    #[test]
    fn triangle_behind_near_is_clipped_away() {
        let frustum = test_frustum();
        let tri = [
            vertex(-1.0, 0.0, 0.05),
            vertex(1.0, 0.0, 0.05),
            vertex(0.0, 1.0, 0.1),
        ];

        let (count, _) = clip_triangle(&frustum, &tri);
        assert_eq!(count, 0);
    }

    #[test]
    fn near_straddle_one_vertex_inside() {
        let frustum = test_frustum();
        // One vertex in front of the near plane, two behind it: the cut
        // produces a single triangle, all vertices at z >= near.
        let tri = [
            vertex(0.0, 0.05, 0.3),
            vertex(-0.02, -0.02, 0.1),
            vertex(0.02, -0.02, 0.1),
        ];

        let (count, tris) = clip_triangle(&frustum, &tri);
        assert_eq!(count, 1);
        for v in &tris[0] {
            assert!(v.position.z >= 0.2 - 1e-5);
        }
    }

    #[test]
    fn near_straddle_two_vertices_inside() {
        let frustum = test_frustum();
        // Two vertices in front, one behind: the surviving quad fans into
        // two triangles.
        let tri = [
            vertex(0.0, 0.02, 0.1),
            vertex(-0.02, -0.02, 0.3),
            vertex(0.02, -0.02, 0.3),
        ];

        let (count, tris) = clip_triangle(&frustum, &tri);
        assert_eq!(count, 2);
        for tri in tris.iter().take(count) {
            for v in tri {
                assert!(v.position.z >= 0.2 - 1e-5);
            }
        }
    }

    #[test]
    fn crossing_vertices_interpolate_attributes() {
        let frustum = Frustum::from_fov_axes(
            90f32.to_radians(),
            90f32.to_radians(),
            1.0,
            100.0,
        );
        // Edge from z=0.5 to z=1.5 crosses the near plane at its midpoint.
        let a = ClipVertex::new(Vec3::new(0.0, 0.0, 0.5), Vec2::new(0.0, 0.0), 0.0);
        let b = ClipVertex::new(Vec3::new(0.0, 0.2, 1.5), Vec2::new(1.0, 0.0), 1.0);
        let c = ClipVertex::new(Vec3::new(0.2, 0.0, 1.5), Vec2::new(0.0, 1.0), 1.0);

        let (count, tris) = clip_triangle(&frustum, &[a, b, c]);
        assert_eq!(count, 2);

        // Every emitted vertex on the near plane must carry midpoint attributes.
        let mut found_cut = false;
        for tri in tris.iter().take(count) {
            for v in tri {
                if (v.position.z - 1.0).abs() < 1e-6 && v.uv.x > 0.0 && v.uv.x < 1.0 {
                    found_cut = true;
                    assert!((v.uv.x - 0.5).abs() < 1e-6);
                    assert!((v.intensity - 0.5).abs() < 1e-6);
                }
            }
        }
        assert!(found_cut);
    }

    #[test]
    fn output_stays_within_capacity() {
        let frustum = test_frustum();
        // A huge triangle cutting across the whole frustum touches many
        // planes; the fan must stay within the fixed buffers.
        let tri = [
            vertex(-500.0, -400.0, 60.0),
            vertex(500.0, -400.0, 60.0),
            vertex(0.0, 800.0, 60.0),
        ];

        let (count, tris) = clip_triangle(&frustum, &tri);
        assert!(count >= 1 && count <= MAX_CLIPPED_TRIANGLES);

        // All surviving vertices satisfy every plane, boundary-inclusive.
        for tri in tris.iter().take(count) {
            for v in tri {
                for plane in &frustum.planes {
                    assert!(plane.signed_distance(v.position) >= -1e-3);
                }
            }
        }
    }
}
