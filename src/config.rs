// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Plate configuration: raw display-unit parameters and their canonical form
//!
//! Raw configs arrive in meters from the configuration layer. `normalize`
//! converts them to internal working units (1 unit = 1 mm), applies the
//! untaper request and the slot auto-clamp, and rejects anything the
//! pipeline cannot build from.

use crate::error::PlateError;
use serde::{Deserialize, Serialize};

/// Fixed scale factor from display units (meters) to internal units.
pub const UNITS_PER_METER: f64 = 1000.0;

/// Clearance kept between the slot and the plate boundary, internal units.
pub const SLOT_CLEARANCE: f64 = 10.0;

/// Clamp floors for the slot, internal units.
const MIN_SLOT_LENGTH: f64 = 10.0;
const MIN_SLOT_WIDTH: f64 = 2.0;

/// Edge treatment applied to the base prism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    None,
    Chamfer,
    Fillet,
}

/// Plate dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
}

/// Hole count, profile and placement policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleSpec {
    pub count: u32,
    pub top_diameter: f64,
    pub bottom_diameter: f64,
    /// Distance of hole centers from the nearest edge.
    pub edge_offset: f64,
    pub corners_first: bool,
    pub top_first: bool,
    /// Canonicalize both diameters to the smaller of the two.
    #[serde(default)]
    pub untaper: bool,
}

/// Optional through-slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SlotSpec {
    pub enabled: bool,
    pub length: f64,
    pub width: f64,
}

/// Complete raw configuration, display units (meters).
///
/// Immutable snapshot: a changed parameter produces a new config value and a
/// fresh pipeline run, never an in-place mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    pub dims: Dimensions,
    pub holes: HoleSpec,
    pub slot: SlotSpec,
    pub edge_style: EdgeStyle,
    pub edge_radius: f64,
    pub material_key: String,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            dims: Dimensions {
                width: 0.2,
                height: 0.15,
                thickness: 0.01,
            },
            holes: HoleSpec {
                count: 4,
                top_diameter: 0.008,
                bottom_diameter: 0.008,
                edge_offset: 0.015,
                corners_first: true,
                top_first: true,
                untaper: false,
            },
            slot: SlotSpec {
                enabled: true,
                length: 0.06,
                width: 0.01,
            },
            edge_style: EdgeStyle::Fillet,
            edge_radius: 0.003,
            material_key: "steel".into(),
        }
    }
}

/// Canonical configuration, internal units, ready for planning and building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateParams {
    pub dims: Dimensions,
    pub holes: HoleParams,
    pub slot: SlotSpec,
    pub edge_style: EdgeStyle,
    pub edge_radius: f64,
    pub material_key: String,
}

/// Canonical hole parameters (untaper already applied).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleParams {
    pub count: u32,
    pub top_diameter: f64,
    pub bottom_diameter: f64,
    pub edge_offset: f64,
    pub corners_first: bool,
    pub top_first: bool,
}

/// Validate and canonicalize a raw config. Pure; no I/O.
pub fn normalize(config: &PlateConfig) -> Result<PlateParams, PlateError> {
    let c = config;

    if !(2..=8).contains(&c.holes.count) {
        return Err(PlateError::InvalidConfig(format!(
            "hole count must be in [2, 8], got {}",
            c.holes.count
        )));
    }

    let positive = [
        ("width", c.dims.width),
        ("height", c.dims.height),
        ("thickness", c.dims.thickness),
        ("hole top diameter", c.holes.top_diameter),
        ("hole bottom diameter", c.holes.bottom_diameter),
        ("edge offset", c.holes.edge_offset),
    ];
    for (name, value) in positive {
        if value <= 0.0 {
            return Err(PlateError::InvalidConfig(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }

    if c.slot.enabled && (c.slot.length <= 0.0 || c.slot.width <= 0.0) {
        return Err(PlateError::InvalidConfig(format!(
            "slot dimensions must be positive, got {} x {}",
            c.slot.length, c.slot.width
        )));
    }

    if c.edge_radius < 0.0 {
        return Err(PlateError::InvalidConfig(format!(
            "edge radius must be non-negative, got {}",
            c.edge_radius
        )));
    }
    if c.edge_style != EdgeStyle::None && c.edge_radius == 0.0 {
        return Err(PlateError::InvalidConfig(
            "edge radius must be positive when an edge treatment is selected".into(),
        ));
    }

    let scale = |v: f64| v * UNITS_PER_METER;

    let dims = Dimensions {
        width: scale(c.dims.width),
        height: scale(c.dims.height),
        thickness: scale(c.dims.thickness),
    };

    let (mut top, mut bottom) = (scale(c.holes.top_diameter), scale(c.holes.bottom_diameter));
    if c.holes.untaper {
        let smaller = top.min(bottom);
        top = smaller;
        bottom = smaller;
    }

    let mut slot = SlotSpec {
        enabled: c.slot.enabled,
        length: scale(c.slot.length),
        width: scale(c.slot.width),
    };
    // Reactive clamp rule: the slot shrinks to keep a fixed clearance from
    // the plate boundary, floored at the minimum usable slot size.
    if slot.length > dims.width - SLOT_CLEARANCE {
        slot.length = (dims.width - SLOT_CLEARANCE).max(MIN_SLOT_LENGTH);
    }
    if slot.width > dims.height - SLOT_CLEARANCE {
        slot.width = (dims.height - SLOT_CLEARANCE).max(MIN_SLOT_WIDTH);
    }

    Ok(PlateParams {
        dims,
        holes: HoleParams {
            count: c.holes.count,
            top_diameter: top,
            bottom_diameter: bottom,
            edge_offset: scale(c.holes.edge_offset),
            corners_first: c.holes.corners_first,
            top_first: c.holes.top_first,
        },
        slot,
        edge_style: c.edge_style,
        edge_radius: scale(c.edge_radius),
        material_key: c.material_key.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_scales_to_internal_units() {
        let params = normalize(&PlateConfig::default()).unwrap();
        assert_relative_eq!(params.dims.width, 200.0, epsilon = 1e-9);
        assert_relative_eq!(params.dims.height, 150.0, epsilon = 1e-9);
        assert_relative_eq!(params.dims.thickness, 10.0, epsilon = 1e-9);
        assert_relative_eq!(params.holes.edge_offset, 15.0, epsilon = 1e-9);
        assert_relative_eq!(params.edge_radius, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_count_out_of_range_rejected() {
        for count in [0, 1, 9] {
            let mut config = PlateConfig::default();
            config.holes.count = count;
            let err = normalize(&config).unwrap_err();
            assert!(matches!(err, PlateError::InvalidConfig(_)), "count {count}");
        }
    }

    #[test]
    fn test_non_positive_dimension_rejected() {
        let mut config = PlateConfig::default();
        config.dims.width = 0.0;
        assert!(matches!(
            normalize(&config),
            Err(PlateError::InvalidConfig(_))
        ));

        let mut config = PlateConfig::default();
        config.holes.top_diameter = -0.001;
        assert!(matches!(
            normalize(&config),
            Err(PlateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_untaper_uses_smaller_diameter() {
        let mut config = PlateConfig::default();
        config.holes.top_diameter = 0.012;
        config.holes.bottom_diameter = 0.006;
        config.holes.untaper = true;

        let params = normalize(&config).unwrap();
        assert_relative_eq!(params.holes.top_diameter, 6.0, epsilon = 1e-9);
        assert_relative_eq!(params.holes.bottom_diameter, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slot_length_clamped_to_clearance() {
        // 50-unit-wide plate with 10-unit clearance caps the slot at 40.
        let mut config = PlateConfig::default();
        config.dims.width = 0.05;
        config.slot.length = 0.045;
        let params = normalize(&config).unwrap();
        assert_relative_eq!(params.slot.length, 40.0, epsilon = 1e-9);

        config.slot.length = 0.035;
        let params = normalize(&config).unwrap();
        assert_relative_eq!(params.slot.length, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slot_width_clamped_against_height() {
        let mut config = PlateConfig::default();
        config.dims.height = 0.03;
        config.slot.width = 0.025;
        let params = normalize(&config).unwrap();
        assert_relative_eq!(params.slot.width, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slot_clamp_floor() {
        // Clearance larger than the plate bottoms out at the floor values.
        let mut config = PlateConfig::default();
        config.dims.width = 0.012;
        config.slot.length = 0.011;
        let params = normalize(&config).unwrap();
        assert_relative_eq!(params.slot.length, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_edge_radius_requires_plain_edges() {
        let mut config = PlateConfig::default();
        config.edge_radius = 0.0;
        assert!(matches!(
            normalize(&config),
            Err(PlateError::InvalidConfig(_))
        ));

        config.edge_style = EdgeStyle::None;
        assert!(normalize(&config).is_ok());
    }
}
