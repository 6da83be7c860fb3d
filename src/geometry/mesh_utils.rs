// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh connectivity validation used by the test suite

use super::Mesh;
use std::collections::HashMap;

/// Edge representation for connectivity checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    fn new(v0: usize, v1: usize) -> Self {
        // Always store edges with smaller index first for consistent hashing
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

fn edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    let mut counts: HashMap<Edge, u32> = HashMap::new();
    for triangle in &mesh.triangles {
        let edges = [
            Edge::new(triangle.indices[0], triangle.indices[1]),
            Edge::new(triangle.indices[1], triangle.indices[2]),
            Edge::new(triangle.indices[2], triangle.indices[0]),
        ];
        for edge in edges {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }
    counts
}

/// Check if mesh is manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count == 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use nalgebra::Vector3;

    #[test]
    fn test_cuboid_is_manifold() {
        // Cuboid faces carry their own vertices for sharp normals, so the
        // mesh is manifold by index but not index-closed.
        let mesh = Primitive::cuboid(Vector3::new(10.0, 10.0, 10.0)).to_mesh();
        assert!(is_manifold(&mesh));
    }

    #[test]
    fn test_cylinder_is_closed() {
        let mesh = Primitive::tapered_cylinder(10.0, 5.0, 5.0, 32).to_mesh();
        assert!(is_manifold(&mesh));
        assert!(is_closed(&mesh));
    }
}
