use crate::vertex::Vertex;
use bevy_math::Vec3;

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// A cube seen from the inside: normals point at the center.
///
/// Each face gets its own four vertices so normals and texture coordinates stay per-face.
pub fn skybox_cube(half_extent: f32) -> Mesh {
    // (outward face normal, u axis, v axis)
    let faces = [
        (Vec3::X, Vec3::Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
    ];
    let corners = [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)];

    let mut vertices = Vec::with_capacity(faces.len() * corners.len());
    let mut indices = Vec::with_capacity(faces.len() * 6);
    for (normal, u, v) in faces {
        let base = vertices.len() as u16;
        for (su, sv) in corners {
            let position = (normal + u * su + v * sv) * half_extent;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: (-normal).to_array(),
                tangent: u.to_array(),
                tex_coord: [(su + 1.0) * 0.5, (1.0 - sv) * 0.5],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}
