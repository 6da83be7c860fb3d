// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG (Constructive Solid Geometry) operations using BSP tree
//!
//! Boolean difference between closed triangle meshes. Input triangles become
//! BSP polygons, spanning polygons are split with interpolated vertices, and
//! the clipped halves are recombined into an output mesh.

use super::{Mesh, Triangle, Vertex};
use crate::error::PlateError;
use crate::utils::math::lerp;
use nalgebra::{Point3, Vector3};

const EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    /// Newell's method over all vertices; stable for split fragments whose
    /// leading vertices are nearly collinear.
    fn from_vertices(vertices: &[Vertex]) -> Option<Self> {
        let mut normal: Vector3<f64> = Vector3::zeros();
        for (i, v) in vertices.iter().enumerate() {
            let a = v.position;
            let b = vertices[(i + 1) % vertices.len()].position;
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
        }
        let len = normal.norm();
        if len < 1e-12 {
            return None;
        }
        let normal = normal / len;
        Some(Self {
            normal,
            w: normal.dot(&vertices[0].position.coords),
        })
    }

    fn classify_point(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Split `polygon` by this plane into the four classification buckets.
    fn split_polygon(
        &self,
        polygon: &Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(polygon.vertices.len());

        for vertex in &polygon.vertices {
            let dist = self.classify_point(&vertex.position);
            let t = if dist < -EPSILON {
                BACK
            } else if dist > EPSILON {
                FRONT
            } else {
                COPLANAR
            };
            polygon_type |= t;
            types.push(t);
        }

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut f = Vec::new();
                let mut b = Vec::new();
                let n = polygon.vertices.len();
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let denom = self.normal.dot(&(vj.position - vi.position));
                        let t = (self.w - self.normal.dot(&vi.position.coords)) / denom;
                        let v = interpolate_vertex(&vi, &vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }
                if let Some(p) = Polygon::new(f) {
                    front.push(p);
                }
                if let Some(p) = Polygon::new(b) {
                    back.push(p);
                }
            }
        }
    }
}

fn interpolate_vertex(a: &Vertex, b: &Vertex, t: f64) -> Vertex {
    let position = Point3::new(
        lerp(a.position.x, b.position.x, t),
        lerp(a.position.y, b.position.y, t),
        lerp(a.position.z, b.position.z, t),
    );
    let normal = a.normal + (b.normal - a.normal) * t;
    let normal = if normal.norm() > 1e-12 {
        normal.normalize()
    } else {
        a.normal
    };
    Vertex::new(position, normal)
}

#[derive(Clone)]
struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane,
}

impl Polygon {
    fn new(vertices: Vec<Vertex>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_vertices(&vertices)?;
        Some(Self { vertices, plane })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.normal = -v.normal;
        }
        self.plane.flip();
    }
}

/// BSP tree node for CSG operations
struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<Polygon>,
}

impl BspNode {
    fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        };
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Insert polygons, extending the existing tree where planes are set.
    fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }

        let plane = *self.plane.get_or_insert(polygons[0].plane);

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in &polygons {
            plane.split_polygon(
                poly,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front_polys,
                &mut back_polys,
            );
        }
        self.polygons.append(&mut coplanar_front);
        self.polygons.append(&mut coplanar_back);

        if !front_polys.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::new(Vec::new())))
                .build(front_polys);
        }
        if !back_polys.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::new(Vec::new())))
                .build(back_polys);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(ref front) = self.front {
            result.extend(front.all_polygons());
        }
        if let Some(ref back) = self.back {
            result.extend(back.all_polygons());
        }
        result
    }

    /// Remove every polygon in this tree that is inside `bsp`.
    fn clip_to(&mut self, bsp: &BspNode) {
        self.polygons = bsp.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(ref mut front) = self.front {
            front.clip_to(bsp);
        }
        if let Some(ref mut back) = self.back {
            back.clip_to(bsp);
        }
    }

    /// Return the subset of `polygons` outside this tree's solid.
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let plane = match self.plane {
            Some(plane) => plane,
            None => return polygons,
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for poly in &polygons {
            plane.split_polygon(
                poly,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            );
        }
        front.append(&mut coplanar_front);
        back.append(&mut coplanar_back);

        let front = if let Some(ref front_node) = self.front {
            front_node.clip_polygons(front)
        } else {
            front
        };
        let back = if let Some(ref back_node) = self.back {
            back_node.clip_polygons(back)
        } else {
            // No subtree behind the plane: that half-space is solid interior.
            Vec::new()
        };

        let mut result = front;
        result.extend(back);
        result
    }

    /// Convert solid space to empty space and vice versa.
    fn invert(&mut self) {
        for poly in &mut self.polygons {
            poly.flip();
        }
        if let Some(ref mut plane) = self.plane {
            plane.flip();
        }
        std::mem::swap(&mut self.front, &mut self.back);
        if let Some(ref mut front) = self.front {
            front.invert();
        }
        if let Some(ref mut back) = self.back {
            back.invert();
        }
    }
}

/// Convert mesh triangles to BSP polygons
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .filter_map(|tri| {
            Polygon::new(vec![
                mesh.vertices[tri.indices[0]],
                mesh.vertices[tri.indices[1]],
                mesh.vertices[tri.indices[2]],
            ])
        })
        .collect()
}

/// Convert polygons back to a triangle mesh (convex fan triangulation)
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::new();

    for poly in polygons {
        let v0 = poly.vertices[0];
        for i in 1..poly.vertices.len() - 1 {
            let a = poly.vertices[i];
            let b = poly.vertices[i + 1];

            // Drop slivers produced by near-coincident split points
            let area = (a.position - v0.position)
                .cross(&(b.position - v0.position))
                .norm();
            if area < 1e-10 {
                continue;
            }

            let anchor = mesh.add_vertex(v0);
            let va = mesh.add_vertex(a);
            let vb = mesh.add_vertex(b);
            mesh.add_triangle(Triangle::new([anchor, va, vb]));
        }
    }

    mesh
}

/// Boolean difference `a − b` using BSP trees.
pub fn csg_difference(a: &Mesh, b: &Mesh) -> Result<Mesh, PlateError> {
    if a.triangles.is_empty() {
        return Err(PlateError::GeometryConstruction(
            "cannot subtract from an empty mesh".into(),
        ));
    }
    if b.triangles.is_empty() {
        return Ok(a.clone());
    }

    let mut tree_a = BspNode::new(mesh_to_polygons(a));
    let mut tree_b = BspNode::new(mesh_to_polygons(b));

    // a − b == ~(~a ∪ b)
    tree_a.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons());
    tree_a.invert();

    Ok(polygons_to_mesh(&tree_a.all_polygons()))
}
