/// Triangle mesh with indexed attributes and a model transform.
use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

/// Per-corner indices into the mesh attribute arrays. All three index
/// sets are required; the OBJ loader rejects faces without them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
    pub uvs: [usize; 3],
    pub normals: [usize; 3],
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub faces: Vec<Face>,

    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<Vec2>, faces: Vec<Face>) -> Self {
        Self {
            positions,
            normals,
            uvs,
            faces,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
        }
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn add_rotation(&mut self, delta: Vec3) {
        self.rotation += delta;
    }

    /// Model-to-world matrix from the current scale, rotation and
    /// translation.
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }

    /// Axis-aligned cube spanning -1..1 on each axis. Faces wind so that
    /// the cross product of their edges points outward, each quad split
    /// into two triangles sharing the diagonal.
    pub fn cube() -> Self {
        let positions = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, 1.0),
        ];
        let normals = vec![
            Vec3::NEG_Z,
            Vec3::X,
            Vec3::Z,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
        ];
        let uvs = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ];

        // Each side lists its corners bottom-near, top-near, top-far,
        // bottom-far so both triangles reuse the same UV pattern.
        let quads: [([usize; 4], usize); 6] = [
            ([0, 1, 2, 3], 0), // front  (-Z)
            ([3, 2, 4, 5], 1), // right  (+X)
            ([5, 4, 6, 7], 2), // back   (+Z)
            ([7, 6, 1, 0], 3), // left   (-X)
            ([1, 6, 4, 2], 4), // top    (+Y)
            ([5, 7, 0, 3], 5), // bottom (-Y)
        ];

        let mut faces = Vec::with_capacity(12);
        for (corners, normal) in quads {
            faces.push(Face {
                vertices: [corners[0], corners[1], corners[2]],
                uvs: [0, 1, 2],
                normals: [normal; 3],
            });
            faces.push(Face {
                vertices: [corners[0], corners[2], corners[3]],
                uvs: [0, 2, 3],
                normals: [normal; 3],
            });
        }

        Self::new(positions, normals, uvs, faces)
    }
}
