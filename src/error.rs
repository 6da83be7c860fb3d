// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error taxonomy for the plate pipeline

use thiserror::Error;

/// Errors returned by configuration, construction and export.
#[derive(Error, Debug)]
pub enum PlateError {
    /// The raw configuration was rejected before any geometry work.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Boolean construction failed despite normalization. Fatal to the
    /// current generation attempt only; no partial solid is returned.
    #[error("geometry construction failed: {0}")]
    GeometryConstruction(String),

    /// The requested export format is not one of stl/obj/glb. Raised
    /// before any encoding is attempted.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// An encoder failed; carries the underlying cause.
    #[error("export failed: {source}")]
    ExportFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl PlateError {
    pub(crate) fn export(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ExportFailed {
            source: Box::new(source),
        }
    }
}
