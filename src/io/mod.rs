// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - export formats and dispatch

mod export_glb;
mod export_obj;
mod export_stl;

pub use export_glb::export as export_glb;
pub use export_obj::export as export_obj;
pub use export_stl::export as export_stl;

use crate::builder::Solid;
use crate::error::PlateError;
use std::fmt;
use std::str::FromStr;

/// Supported interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Binary surface format (triangle soup, no material).
    Stl,
    /// ASCII mesh format.
    Obj,
    /// Binary scene container (asynchronous encode).
    Glb,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::Obj => "obj",
            ExportFormat::Glb => "glb",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Stl => "model/stl",
            ExportFormat::Obj => "text/plain",
            ExportFormat::Glb => "model/gltf-binary",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PlateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stl" => Ok(ExportFormat::Stl),
            "obj" => Ok(ExportFormat::Obj),
            "glb" => Ok(ExportFormat::Glb),
            _ => Err(PlateError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Export result handed back to the delivery layer: the encoded bytes plus
/// the suggested filename and MIME type. Delivering the bytes (download,
/// file write) is not this crate's concern.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Encode `solid` in the requested format. STL and OBJ encode inline; GLB
/// awaits the asynchronous encoder. Export failures never invalidate the
/// solid — the caller may retry or pick another format.
pub async fn export(
    solid: &Solid,
    format: ExportFormat,
    filename: &str,
) -> Result<Artifact, PlateError> {
    let bytes = match format {
        ExportFormat::Stl => export_stl(solid)?,
        ExportFormat::Obj => export_obj(solid)?,
        ExportFormat::Glb => export_glb(solid).await?,
    };

    Ok(Artifact {
        bytes,
        filename: with_extension(filename, format),
        mime_type: format.mime_type(),
    })
}

fn with_extension(filename: &str, format: ExportFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if filename.to_ascii_lowercase().ends_with(&suffix) {
        filename.to_string()
    } else {
        format!("{filename}{suffix}")
    }
}
