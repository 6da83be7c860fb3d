// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary STL exporter

use crate::builder::Solid;
use crate::error::PlateError;
use crate::utils::math::calculate_triangle_normal;

/// Encode the solid as binary STL: 80-byte header, little-endian triangle
/// count, then one record of face normal + three vertices + attribute word
/// per triangle. STL carries no color or material.
pub fn export(solid: &Solid) -> Result<Vec<u8>, PlateError> {
    let mesh = &solid.mesh;

    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles
        .iter()
        .map(|tri| {
            let p0 = &mesh.vertices[tri.indices[0]].position;
            let p1 = &mesh.vertices[tri.indices[1]].position;
            let p2 = &mesh.vertices[tri.indices[2]].position;
            let normal = calculate_triangle_normal(p0, p1, p2);

            stl_io::Triangle {
                normal: stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    let mut bytes = Vec::new();
    stl_io::write_stl(&mut bytes, triangles.iter()).map_err(PlateError::export)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;
    use std::io::Cursor;

    fn solid(mesh: crate::geometry::Mesh) -> Solid {
        Solid {
            mesh,
            material: None,
        }
    }

    #[test]
    fn test_stl_record_layout() {
        let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0)).to_mesh();
        let triangle_count = mesh.triangle_count();
        let bytes = export(&solid(mesh)).unwrap();

        // header + count + 50 bytes per triangle
        assert_eq!(bytes.len(), 80 + 4 + 50 * triangle_count);
        let count = u32::from_le_bytes(bytes[80..84].try_into().unwrap());
        assert_eq!(count as usize, triangle_count);
    }

    #[test]
    fn test_stl_parses_back() {
        let mesh = Primitive::tapered_cylinder(10.0, 5.0, 3.0, 16).to_mesh();
        let triangle_count = mesh.triangle_count();
        let bytes = export(&solid(mesh)).unwrap();

        let parsed = stl_io::read_stl(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed.faces.len(), triangle_count);
    }
}
