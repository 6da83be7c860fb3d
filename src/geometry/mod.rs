// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod bbox;
mod csg;
mod mesh;
pub mod mesh_utils;
mod primitives;

pub use bbox::BoundingBox;
pub use csg::csg_difference;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
