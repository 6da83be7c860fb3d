// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solid construction
//!
//! Assembles the plate as an explicit boolean program (one base primitive
//! plus an ordered list of subtraction cuts) and evaluates it with the BSP
//! engine. Subtraction order never changes the result, only the work done
//! per step; the builder subtracts holes in anchor order, then the slot.

use crate::config::{EdgeStyle, PlateParams};
use crate::error::PlateError;
use crate::geometry::{csg_difference, Mesh, Primitive};
use nalgebra::{Point2, Vector3};

/// Hole cutter height as a multiple of plate thickness. The overshoot
/// guarantees the cut pierces both faces even where edge treatment has
/// pulled local geometry away from the nominal planes.
const HOLE_CUT_FACTOR: f64 = 1.5;

/// Slot cutter height as a multiple of plate thickness.
const SLOT_CUT_FACTOR: f64 = 2.0;

/// Slot corner radius as a fraction of the edge radius.
const SLOT_CORNER_FACTOR: f64 = 0.5;

/// Chamfer uses a reduced radius and a single bevel facet per face border.
const CHAMFER_RADIUS_FACTOR: f64 = 0.7;
const CHAMFER_SEGMENTS: u32 = 1;
const FILLET_SEGMENTS: u32 = 4;

const HOLE_SEGMENTS: u32 = 16;

/// Final triangulated boundary solid plus the opaque material reference the
/// exporter threads into artifact metadata.
#[derive(Debug, Clone)]
pub struct Solid {
    pub mesh: Mesh,
    pub material: Option<String>,
}

/// One subtraction step of the boolean program.
struct Cut {
    shape: Primitive,
    offset: Vector3<f64>,
}

/// Explicit boolean program: base primitive minus ordered cuts.
struct BooleanProgram {
    base: Primitive,
    cuts: Vec<Cut>,
}

/// Build the final solid for a canonical config and planned anchors.
/// Pure and synchronous; may be computation-heavy.
pub fn build(params: &PlateParams, anchors: &[Point2<f64>]) -> Result<Solid, PlateError> {
    let program = assemble(params, anchors)?;
    let mesh = evaluate(&program)?;

    let material = match params.material_key.as_str() {
        "" => None,
        key => Some(key.to_string()),
    };
    Ok(Solid { mesh, material })
}

fn assemble(params: &PlateParams, anchors: &[Point2<f64>]) -> Result<BooleanProgram, PlateError> {
    let dims = params.dims;
    let size = Vector3::new(dims.width, dims.height, dims.thickness);

    let base = match params.edge_style {
        EdgeStyle::None => Primitive::cuboid(size),
        EdgeStyle::Fillet => {
            check_edge_radius(params.edge_radius, &size)?;
            Primitive::rounded_cuboid(size, params.edge_radius, FILLET_SEGMENTS)
        }
        EdgeStyle::Chamfer => {
            let radius = params.edge_radius * CHAMFER_RADIUS_FACTOR;
            check_edge_radius(radius, &size)?;
            Primitive::rounded_cuboid(size, radius, CHAMFER_SEGMENTS)
        }
    };

    let mut cuts = Vec::new();

    // Tapered hole cutters. The profile is fixed at the plate faces
    // (top/bottom diameters) and extrapolated linearly to the overshooting
    // cutter ends.
    let cutter_height = dims.thickness * HOLE_CUT_FACTOR;
    let top_radius = params.holes.top_diameter / 2.0;
    let bottom_radius = params.holes.bottom_diameter / 2.0;
    let slope = (top_radius - bottom_radius) / dims.thickness;
    let mid_radius = (top_radius + bottom_radius) / 2.0;
    let cutter_top = mid_radius + slope * cutter_height / 2.0;
    let cutter_bottom = mid_radius - slope * cutter_height / 2.0;
    if cutter_top <= 0.0 || cutter_bottom <= 0.0 {
        return Err(PlateError::GeometryConstruction(format!(
            "hole taper too extreme: cutter radii {cutter_bottom:.3}/{cutter_top:.3} \
             must stay positive across the safety margin"
        )));
    }
    for anchor in anchors {
        cuts.push(Cut {
            shape: Primitive::tapered_cylinder(
                cutter_height,
                cutter_bottom,
                cutter_top,
                HOLE_SEGMENTS,
            ),
            offset: Vector3::new(anchor.x, anchor.y, 0.0),
        });
    }

    if params.slot.enabled {
        let corner_radius = match params.edge_style {
            EdgeStyle::None => 0.0,
            _ => params.edge_radius * SLOT_CORNER_FACTOR,
        };
        if corner_radius >= dims.thickness {
            return Err(PlateError::GeometryConstruction(format!(
                "slot corner radius {corner_radius:.3} does not fit a plate of thickness {:.3}",
                dims.thickness
            )));
        }
        let segments = match params.edge_style {
            EdgeStyle::Chamfer => CHAMFER_SEGMENTS,
            _ => FILLET_SEGMENTS,
        };
        // Footprint grows by the rounding so the nominal slot size survives.
        let slot_size = Vector3::new(
            params.slot.length + 2.0 * corner_radius,
            params.slot.width + 2.0 * corner_radius,
            dims.thickness * SLOT_CUT_FACTOR,
        );
        cuts.push(Cut {
            shape: Primitive::rounded_cuboid(slot_size, corner_radius, segments),
            offset: Vector3::zeros(),
        });
    }

    Ok(BooleanProgram { base, cuts })
}

fn check_edge_radius(radius: f64, size: &Vector3<f64>) -> Result<(), PlateError> {
    let min_dim = size.x.min(size.y).min(size.z);
    if 2.0 * radius >= min_dim {
        return Err(PlateError::GeometryConstruction(format!(
            "edge radius {radius:.3} does not fit the smallest plate dimension {min_dim:.3}"
        )));
    }
    Ok(())
}

fn evaluate(program: &BooleanProgram) -> Result<Mesh, PlateError> {
    let mut mesh = program.base.to_mesh();

    for cut in &program.cuts {
        let mut tool = cut.shape.to_mesh();
        tool.translate(cut.offset);
        mesh = csg_difference(&mesh, &tool)?;
    }

    if mesh.triangle_count() == 0 {
        return Err(PlateError::GeometryConstruction(
            "boolean evaluation produced an empty solid".into(),
        ));
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{normalize, PlateConfig};
    use crate::placement::plan;

    fn params_and_anchors(config: &PlateConfig) -> (PlateParams, Vec<Point2<f64>>) {
        let params = normalize(config).unwrap();
        let anchors = plan(
            params.dims.width,
            params.dims.height,
            params.holes.edge_offset,
            params.holes.count,
            params.holes.corners_first,
            params.holes.top_first,
        );
        (params, anchors)
    }

    #[test]
    fn test_build_default_plate() {
        let (params, anchors) = params_and_anchors(&PlateConfig::default());
        let solid = build(&params, &anchors).unwrap();

        assert!(solid.mesh.triangle_count() > 0);
        assert_eq!(solid.material.as_deref(), Some("steel"));

        // Cuts never grow the outer bounds
        let bbox = solid.mesh.bounding_box();
        assert!(bbox.max.x <= 100.0 + 1e-6);
        assert!(bbox.min.y >= -75.0 - 1e-6);
        assert!(bbox.max.z <= 5.0 + 1e-6);
    }

    #[test]
    fn test_build_is_idempotent() {
        let (params, anchors) = params_and_anchors(&PlateConfig::default());
        let first = build(&params, &anchors).unwrap();
        let second = build(&params, &anchors).unwrap();

        assert_eq!(
            first.mesh.triangle_count(),
            second.mesh.triangle_count()
        );
        assert!(first
            .mesh
            .bounding_box()
            .approx_eq(&second.mesh.bounding_box(), 1e-12));
    }

    #[test]
    fn test_slot_adds_geometry() {
        let mut config = PlateConfig::default();
        config.edge_style = EdgeStyle::None;

        config.slot.enabled = false;
        let (params, anchors) = params_and_anchors(&config);
        let without = build(&params, &anchors).unwrap();

        config.slot.enabled = true;
        let (params, anchors) = params_and_anchors(&config);
        let with = build(&params, &anchors).unwrap();

        assert_ne!(
            without.mesh.triangle_count(),
            with.mesh.triangle_count()
        );
    }

    #[test]
    fn test_extreme_taper_rejected() {
        let mut config = PlateConfig::default();
        // Bottom radius extrapolates negative across the cutter overshoot.
        config.holes.top_diameter = 0.05;
        config.holes.bottom_diameter = 0.002;
        let (params, anchors) = params_and_anchors(&config);

        let err = build(&params, &anchors).unwrap_err();
        assert!(matches!(err, PlateError::GeometryConstruction(_)));
    }

    #[test]
    fn test_oversized_edge_radius_rejected() {
        let mut config = PlateConfig::default();
        config.edge_radius = 0.006; // 12 mm diameter rounding on a 10 mm plate
        let (params, anchors) = params_and_anchors(&config);

        let err = build(&params, &anchors).unwrap_err();
        assert!(matches!(err, PlateError::GeometryConstruction(_)));
    }

    #[test]
    fn test_empty_material_key_not_threaded() {
        let mut config = PlateConfig::default();
        config.material_key = String::new();
        config.holes.count = 2;
        config.slot.enabled = false;
        let (params, anchors) = params_and_anchors(&config);

        let solid = build(&params, &anchors).unwrap();
        assert!(solid.material.is_none());
    }
}
