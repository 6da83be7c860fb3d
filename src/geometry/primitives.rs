// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator
//!
//! All primitives are centered at the origin. The rounded cuboid serves both
//! as the treated base plate (fillet/chamfer differ only in radius and arc
//! segment count) and as the slot cutter; the tapered cylinder is the hole
//! cutter.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    Cuboid {
        size: Vector3<f64>,
    },
    RoundedCuboid {
        size: Vector3<f64>,
        radius: f64,
        segments: u32,
    },
    TaperedCylinder {
        height: f64,
        bottom_radius: f64,
        top_radius: f64,
        segments: u32,
    },
}

impl Primitive {
    pub fn cuboid(size: Vector3<f64>) -> Self {
        Self::Cuboid { size }
    }

    pub fn rounded_cuboid(size: Vector3<f64>, radius: f64, segments: u32) -> Self {
        let segments = if segments > 0 { segments } else { 4 };
        Self::RoundedCuboid {
            size,
            radius,
            segments,
        }
    }

    pub fn tapered_cylinder(
        height: f64,
        bottom_radius: f64,
        top_radius: f64,
        segments: u32,
    ) -> Self {
        let segments = if segments > 0 { segments } else { 32 };
        Self::TaperedCylinder {
            height,
            bottom_radius,
            top_radius,
            segments,
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cuboid { size } => generate_cuboid_mesh(*size),
            Self::RoundedCuboid {
                size,
                radius,
                segments,
            } => generate_rounded_cuboid_mesh(*size, *radius, *segments),
            Self::TaperedCylinder {
                height,
                bottom_radius,
                top_radius,
                segments,
            } => generate_tapered_cylinder_mesh(*height, *bottom_radius, *top_radius, *segments),
        }
    }
}

fn generate_cuboid_mesh(size: Vector3<f64>) -> Mesh {
    let mut mesh = Mesh::new();

    let (min_x, max_x) = (-size.x / 2.0, size.x / 2.0);
    let (min_y, max_y) = (-size.y / 2.0, size.y / 2.0);
    let (min_z, max_z) = (-size.z / 2.0, size.z / 2.0);

    // 8 vertices of the cuboid
    let positions = [
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, min_y, min_z),
        Point3::new(max_x, max_y, min_z),
        Point3::new(min_x, max_y, min_z),
        Point3::new(min_x, min_y, max_z),
        Point3::new(max_x, min_y, max_z),
        Point3::new(max_x, max_y, max_z),
        Point3::new(min_x, max_y, max_z),
    ];

    // 6 faces, each with its normal
    let faces = [
        // Front (z+)
        ([4, 5, 6], Vector3::new(0.0, 0.0, 1.0)),
        ([4, 6, 7], Vector3::new(0.0, 0.0, 1.0)),
        // Back (z-)
        ([1, 0, 3], Vector3::new(0.0, 0.0, -1.0)),
        ([1, 3, 2], Vector3::new(0.0, 0.0, -1.0)),
        // Right (x+)
        ([5, 1, 2], Vector3::new(1.0, 0.0, 0.0)),
        ([5, 2, 6], Vector3::new(1.0, 0.0, 0.0)),
        // Left (x-)
        ([0, 4, 7], Vector3::new(-1.0, 0.0, 0.0)),
        ([0, 7, 3], Vector3::new(-1.0, 0.0, 0.0)),
        // Top (y+)
        ([7, 6, 2], Vector3::new(0.0, 1.0, 0.0)),
        ([7, 2, 3], Vector3::new(0.0, 1.0, 0.0)),
        // Bottom (y-)
        ([0, 1, 5], Vector3::new(0.0, -1.0, 0.0)),
        ([0, 5, 4], Vector3::new(0.0, -1.0, 0.0)),
    ];

    for (indices, normal) in faces {
        let v0 = mesh.add_vertex(Vertex::new(positions[indices[0]], normal));
        let v1 = mesh.add_vertex(Vertex::new(positions[indices[1]], normal));
        let v2 = mesh.add_vertex(Vertex::new(positions[indices[2]], normal));
        mesh.add_triangle(Triangle::new([v0, v1, v2]));
    }

    mesh
}

/// Grid coordinates along one axis of a rounded cuboid face: an arc band of
/// `segments` divisions at each border, one flat span between the tangent
/// lines. Adjacent faces use the same knots for their shared axis, so seam
/// vertices coincide and the surface has no T-junctions.
fn band_knots(half: f64, radius: f64, segments: u32) -> Vec<f64> {
    let mut knots = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        knots.push(-half + radius * i as f64 / segments as f64);
    }
    for i in 0..=segments {
        knots.push(half - radius + radius * i as f64 / segments as f64);
    }
    knots
}

fn generate_rounded_cuboid_mesh(size: Vector3<f64>, radius: f64, segments: u32) -> Mesh {
    if radius <= 0.0 {
        return generate_cuboid_mesh(size);
    }

    let half = size / 2.0;
    let inner = Vector3::new(half.x - radius, half.y - radius, half.z - radius);

    // (normal axis, sign, u axis, v axis) with u x v = outward normal.
    let faces: [(usize, f64, usize, usize); 6] = [
        (2, 1.0, 0, 1),
        (2, -1.0, 1, 0),
        (0, 1.0, 1, 2),
        (0, -1.0, 2, 1),
        (1, 1.0, 2, 0),
        (1, -1.0, 0, 2),
    ];

    let mut mesh = Mesh::new();

    for (n_axis, sign, u_axis, v_axis) in faces {
        let knots_u = band_knots(half[u_axis], radius, segments);
        let knots_v = band_knots(half[v_axis], radius, segments);
        let nu = knots_u.len();
        let nv = knots_v.len();

        let base = mesh.vertex_count();
        for &ku in &knots_u {
            for &kv in &knots_v {
                let mut p = Point3::origin();
                p[n_axis] = sign * half[n_axis];
                p[u_axis] = ku;
                p[v_axis] = kv;

                // Project the cuboid surface point onto the rounded surface:
                // offset from the shrunken inner box, pushed out by the radius.
                let q = Point3::new(
                    p.x.clamp(-inner.x, inner.x),
                    p.y.clamp(-inner.y, inner.y),
                    p.z.clamp(-inner.z, inner.z),
                );
                let normal = (p - q).normalize();
                mesh.add_vertex(Vertex::new(q + radius * normal, normal));
            }
        }

        for i in 0..nu - 1 {
            for j in 0..nv - 1 {
                let v00 = base + i * nv + j;
                let v10 = base + (i + 1) * nv + j;
                let v11 = base + (i + 1) * nv + j + 1;
                let v01 = base + i * nv + j + 1;
                mesh.add_triangle(Triangle::new([v00, v10, v11]));
                mesh.add_triangle(Triangle::new([v00, v11, v01]));
            }
        }
    }

    mesh
}

fn generate_tapered_cylinder_mesh(
    height: f64,
    bottom_radius: f64,
    top_radius: f64,
    segments: u32,
) -> Mesh {
    let mut mesh = Mesh::new();
    let (bottom_z, top_z) = (-height / 2.0, height / 2.0);

    let bottom_center_idx = mesh.add_vertex(Vertex::new(
        Point3::new(0.0, 0.0, bottom_z),
        Vector3::new(0.0, 0.0, -1.0),
    ));
    let top_center_idx = mesh.add_vertex(Vertex::new(
        Point3::new(0.0, 0.0, top_z),
        Vector3::new(0.0, 0.0, 1.0),
    ));

    let mut bottom_indices = Vec::new();
    let mut top_indices = Vec::new();

    for i in 0..segments {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        let cos = angle.cos();
        let sin = angle.sin();
        let side_normal = Vector3::new(cos, sin, 0.0);

        let bottom_pos = Point3::new(bottom_radius * cos, bottom_radius * sin, bottom_z);
        bottom_indices.push(mesh.add_vertex(Vertex::new(bottom_pos, side_normal)));

        let top_pos = Point3::new(top_radius * cos, top_radius * sin, top_z);
        top_indices.push(mesh.add_vertex(Vertex::new(top_pos, side_normal)));
    }

    // Bottom cap
    for i in 0..segments as usize {
        let next = (i + 1) % segments as usize;
        mesh.add_triangle(Triangle::new([
            bottom_center_idx,
            bottom_indices[next],
            bottom_indices[i],
        ]));
    }

    // Top cap
    for i in 0..segments as usize {
        let next = (i + 1) % segments as usize;
        mesh.add_triangle(Triangle::new([
            top_center_idx,
            top_indices[i],
            top_indices[next],
        ]));
    }

    // Sides reuse the rim vertices so the surface stays closed
    for i in 0..segments as usize {
        let next = (i + 1) % segments as usize;
        let bi = bottom_indices[i];
        let ti = top_indices[i];
        let bn = bottom_indices[next];
        let tn = top_indices[next];

        mesh.add_triangle(Triangle::new([bi, ti, bn]));
        mesh.add_triangle(Triangle::new([ti, tn, bn]));
    }

    // Average cap/side normals at the shared rim vertices
    mesh.recompute_normals();
    mesh
}
