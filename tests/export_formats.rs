// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export format tests

use anyhow::Result;
use polyplate::{export_glb, export_obj, export_stl, generate, ExportFormat, PlateConfig, Solid};
use std::io::Cursor;

fn default_solid() -> Solid {
    generate(&PlateConfig::default()).expect("default config should build")
}

fn stl_bounds(bytes: &[u8]) -> ([f32; 3], [f32; 3]) {
    let parsed = stl_io::read_stl(&mut Cursor::new(bytes)).expect("valid STL");
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for vertex in &parsed.vertices {
        let coords: [f32; 3] = (*vertex).into();
        for axis in 0..3 {
            min[axis] = min[axis].min(coords[axis]);
            max[axis] = max[axis].max(coords[axis]);
        }
    }
    (min, max)
}

fn obj_bounds(bytes: &[u8]) -> ([f32; 3], [f32; 3]) {
    let text = std::str::from_utf8(bytes).expect("OBJ is UTF-8");
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for line in text.lines().filter(|l| l.starts_with("v ")) {
        let coords: Vec<f32> = line
            .split_whitespace()
            .skip(1)
            .map(|c| c.parse().expect("numeric coordinate"))
            .collect();
        for axis in 0..3 {
            min[axis] = min[axis].min(coords[axis]);
            max[axis] = max[axis].max(coords[axis]);
        }
    }
    (min, max)
}

#[test]
fn test_stl_triangle_count_matches_solid() -> Result<()> {
    let solid = default_solid();
    let bytes = export_stl(&solid)?;

    let parsed = stl_io::read_stl(&mut Cursor::new(bytes))?;
    assert_eq!(parsed.faces.len(), solid.mesh.triangle_count());

    Ok(())
}

#[test]
fn test_cross_format_bounding_boxes_agree() -> Result<()> {
    let solid = default_solid();

    let (stl_min, stl_max) = stl_bounds(&export_stl(&solid)?);
    let (obj_min, obj_max) = obj_bounds(&export_obj(&solid)?);

    println!("STL bounds: {stl_min:?} .. {stl_max:?}");
    println!("OBJ bounds: {obj_min:?} .. {obj_max:?}");

    for axis in 0..3 {
        assert!(
            (stl_min[axis] - obj_min[axis]).abs() < 1e-5,
            "min axis {axis} differs"
        );
        assert!(
            (stl_max[axis] - obj_max[axis]).abs() < 1e-5,
            "max axis {axis} differs"
        );
    }

    Ok(())
}

#[test]
fn test_exports_preserve_internal_units() -> Result<()> {
    // No unit conversion on export: the 200-unit plate width survives as-is.
    let solid = default_solid();
    let (min, max) = stl_bounds(&export_stl(&solid)?);

    assert!((max[0] - 100.0).abs() < 1e-4);
    assert!((min[0] + 100.0).abs() < 1e-4);
    Ok(())
}

#[tokio::test]
async fn test_glb_export() -> Result<()> {
    let solid = default_solid();
    let bytes = export_glb(&solid).await?;

    assert_eq!(&bytes[0..4], b"glTF");
    assert_eq!(bytes.len() % 4, 0);

    let json_len = u32::from_le_bytes(bytes[12..16].try_into()?) as usize;
    let json: serde_json::Value = serde_json::from_slice(&bytes[20..20 + json_len])?;
    assert_eq!(json["asset"]["version"], "2.0");
    assert_eq!(json["materials"][0]["name"], "steel");

    println!("GLB size: {} bytes", bytes.len());
    Ok(())
}

#[tokio::test]
async fn test_unified_export_dispatch() -> Result<()> {
    let solid = default_solid();

    for (format, mime) in [
        (ExportFormat::Stl, "model/stl"),
        (ExportFormat::Obj, "text/plain"),
        (ExportFormat::Glb, "model/gltf-binary"),
    ] {
        let artifact = polyplate::export(&solid, format, "bracket-plate").await?;
        assert!(!artifact.bytes.is_empty());
        assert_eq!(artifact.mime_type, mime);
        assert_eq!(
            artifact.filename,
            format!("bracket-plate.{}", format.extension())
        );
    }

    Ok(())
}

#[test]
fn test_unknown_format_rejected_before_encode() {
    let err = "xyz".parse::<ExportFormat>().unwrap_err();
    assert!(matches!(err, polyplate::PlateError::UnsupportedFormat(_)));
}
