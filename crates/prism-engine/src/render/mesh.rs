//! Unit cube mesh: 24 vertices (4 per face, so every face has flat normals and
//! its own texture coordinates) and 36 indices.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, normal, texture coordinate (32 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex: [f32; 2],
}

/// Shader locations of the three vertex attributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeLocations {
    pub position: u32,
    pub normal: u32,
    pub tex: u32,
}

impl CubeVertex {
    pub const STRIDE: u64 = std::mem::size_of::<CubeVertex>() as u64;

    /// Attribute descriptions for the interleaved layout at the given locations.
    pub fn attributes(locations: AttributeLocations) -> [wgpu::VertexAttribute; 3] {
        [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: std::mem::offset_of!(CubeVertex, position) as u64,
                shader_location: locations.position,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: std::mem::offset_of!(CubeVertex, normal) as u64,
                shader_location: locations.normal,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: std::mem::offset_of!(CubeVertex, tex) as u64,
                shader_location: locations.tex,
            },
        ]
    }

    pub fn layout(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

const fn v(position: [f32; 3], normal: [f32; 3], tex: [f32; 2]) -> CubeVertex {
    CubeVertex { position, normal, tex }
}

pub const CUBE_VERTICES: [CubeVertex; 24] = [
    // front
    v([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
    v([1.0, -1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
    v([1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
    v([-1.0, 1.0, 1.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    // back
    v([-1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0]),
    v([-1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 0.0]),
    v([1.0, 1.0, -1.0], [0.0, 0.0, -1.0], [1.0, 1.0]),
    v([1.0, -1.0, -1.0], [0.0, 0.0, -1.0], [0.0, 1.0]),
    // top
    v([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
    v([-1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
    v([1.0, 1.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0]),
    v([1.0, 1.0, -1.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
    // bottom
    v([-1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [0.0, 0.0]),
    v([1.0, -1.0, -1.0], [0.0, -1.0, 0.0], [1.0, 0.0]),
    v([1.0, -1.0, 1.0], [0.0, -1.0, 0.0], [1.0, 1.0]),
    v([-1.0, -1.0, 1.0], [0.0, -1.0, 0.0], [0.0, 1.0]),
    // right
    v([1.0, -1.0, -1.0], [1.0, 0.0, 0.0], [0.0, 0.0]),
    v([1.0, 1.0, -1.0], [1.0, 0.0, 0.0], [1.0, 0.0]),
    v([1.0, 1.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0]),
    v([1.0, -1.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0]),
    // left
    v([-1.0, -1.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 0.0]),
    v([-1.0, -1.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 0.0]),
    v([-1.0, 1.0, 1.0], [-1.0, 0.0, 0.0], [1.0, 1.0]),
    v([-1.0, 1.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0]),
];

/// Two counter-clockwise triangles per face, in face order.
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3, // front
    4, 5, 6, 4, 6, 7, // back
    8, 9, 10, 8, 10, 11, // top
    12, 13, 14, 12, 14, 15, // bottom
    16, 17, 18, 16, 18, 19, // right
    20, 21, 22, 20, 22, 23, // left
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn pos(i: u16) -> Vec3 {
        Vec3::from(CUBE_VERTICES[i as usize].position)
    }

    #[test]
    fn interleaved_layout_is_32_bytes() {
        assert_eq!(CubeVertex::STRIDE, 32);
        let attrs = CubeVertex::attributes(AttributeLocations {
            position: 0,
            normal: 1,
            tex: 2,
        });
        let offsets: Vec<u64> = attrs.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 24]);
        assert_eq!(CubeVertex::layout(&attrs).array_stride, 32);
    }

    #[test]
    fn indices_cover_every_vertex() {
        assert_eq!(CUBE_INDICES.len(), 36);
        let mut seen = [false; 24];
        for &i in &CUBE_INDICES {
            seen[i as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn triangles_wind_outward_and_match_normals() {
        for tri in CUBE_INDICES.chunks_exact(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let face_normal = (b - a).cross(c - a).normalize();
            let centroid = (a + b + c) / 3.0;

            // Cube is centered on the origin: outward means away from it.
            assert!(face_normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");

            for &i in tri {
                let stored = Vec3::from(CUBE_VERTICES[i as usize].normal);
                assert!(
                    stored.abs_diff_eq(face_normal, 1e-6),
                    "vertex {i} normal {stored} disagrees with winding {face_normal}"
                );
            }
        }
    }

    #[test]
    fn six_distinct_faces() {
        let mut normals: Vec<[i32; 3]> = CUBE_INDICES
            .chunks_exact(6)
            .map(|face| {
                let n = CUBE_VERTICES[face[0] as usize].normal;
                [n[0] as i32, n[1] as i32, n[2] as i32]
            })
            .collect();
        normals.sort_unstable();
        normals.dedup();
        assert_eq!(normals.len(), 6);
    }

    #[test]
    fn vertices_lie_on_unit_cube_faces() {
        for vert in &CUBE_VERTICES {
            let p = Vec3::from(vert.position);
            let n = Vec3::from(vert.normal);
            // The coordinate along the normal is on the face plane.
            assert_eq!(p.dot(n), 1.0);
            assert!(vert.tex.iter().all(|t| (0.0..=1.0).contains(t)));
        }
    }
}
