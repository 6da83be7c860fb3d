// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyplate
//!
//! Parametric mounting-plate generator. Turns a plate configuration
//! (dimensions, hole layout, optional slot, edge treatment) into a
//! watertight triangulated solid via boolean construction, and serializes
//! it to STL, OBJ or GLB byte buffers.

pub mod builder;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod placement;
pub mod utils;

pub use builder::Solid;
pub use config::{
    normalize, Dimensions, EdgeStyle, HoleParams, HoleSpec, PlateConfig, PlateParams, SlotSpec,
};
pub use error::PlateError;
pub use geometry::{BoundingBox, Mesh};
pub use io::{export, export_glb, export_obj, export_stl, Artifact, ExportFormat};
pub use placement::plan;

/// Main entry point: run the full normalize → plan → build pipeline.
///
/// Pure function of the configuration; every call returns a freshly built
/// solid and no state is retained between calls. The caller re-invokes it
/// whenever a parameter changes; concurrent calls with different configs
/// need no coordination.
pub fn generate(config: &PlateConfig) -> Result<Solid, PlateError> {
    let params = config::normalize(config)?;
    let anchors = placement::plan(
        params.dims.width,
        params.dims.height,
        params.holes.edge_offset,
        params.holes.count,
        params.holes.corners_first,
        params.holes.top_first,
    );
    builder::build(&params, &anchors)
}
