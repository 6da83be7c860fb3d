// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! ASCII OBJ exporter

use crate::builder::Solid;
use crate::error::PlateError;
use crate::geometry::Mesh;
use std::fmt::Write;

/// Encode the solid as ASCII OBJ: vertex positions, vertex normals and
/// triangulated faces with 1-based `v//vn` references. Coordinates are
/// quantized to f32 like the binary formats.
pub fn export(solid: &Solid) -> Result<Vec<u8>, PlateError> {
    let text = write_obj(&solid.mesh).map_err(PlateError::export)?;
    Ok(text.into_bytes())
}

fn write_obj(mesh: &Mesh) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    for vertex in &mesh.vertices {
        writeln!(
            out,
            "v {} {} {}",
            vertex.position.x as f32, vertex.position.y as f32, vertex.position.z as f32
        )?;
    }
    for vertex in &mesh.vertices {
        writeln!(
            out,
            "vn {} {} {}",
            vertex.normal.x as f32, vertex.normal.y as f32, vertex.normal.z as f32
        )?;
    }
    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices;
        writeln!(
            out,
            "f {}//{} {}//{} {}//{}",
            a + 1,
            a + 1,
            b + 1,
            b + 1,
            c + 1,
            c + 1
        )?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;

    #[test]
    fn test_obj_line_counts() {
        let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0)).to_mesh();
        let solid = Solid {
            mesh,
            material: None,
        };
        let bytes = export(&solid).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let v = text.lines().filter(|l| l.starts_with("v ")).count();
        let vn = text.lines().filter(|l| l.starts_with("vn ")).count();
        let f = text.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(v, solid.mesh.vertex_count());
        assert_eq!(vn, solid.mesh.vertex_count());
        assert_eq!(f, solid.mesh.triangle_count());
    }

    #[test]
    fn test_obj_faces_are_one_based() {
        let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0)).to_mesh();
        let solid = Solid {
            mesh,
            material: None,
        };
        let text = String::from_utf8(export(&solid).unwrap()).unwrap();

        for line in text.lines().filter(|l| l.starts_with("f ")) {
            for reference in line.split_whitespace().skip(1) {
                let index: usize = reference.split("//").next().unwrap().parse().unwrap();
                assert!(index >= 1 && index <= solid.mesh.vertex_count());
            }
        }
    }
}
