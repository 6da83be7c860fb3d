// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Deterministic hole placement
//!
//! Anchors are drawn from a fixed 8-slot sequence (4 corners, 4 edge
//! midpoints) whose order depends only on the placement flags. Growing the
//! hole count appends anchors without relocating earlier ones, so parameter
//! sweeps keep existing holes in place.

use nalgebra::Point2;

/// Compute the ordered hole anchor positions. Pure; internal units.
///
/// Corner anchors sit at `(±(width/2 − edge_offset), ±(height/2 − edge_offset))`,
/// midpoint anchors on the axes at the same inset. `top_first` selects the
/// clockwise corner walk from top-left (else the reverse) and the
/// top/bottom-before-left/right midpoint order (else left/right first);
/// `corners_first` puts corners ahead of midpoints. The first `count`
/// entries of the resulting 8-anchor sequence are returned.
pub fn plan(
    width: f64,
    height: f64,
    edge_offset: f64,
    count: u32,
    corners_first: bool,
    top_first: bool,
) -> Vec<Point2<f64>> {
    let dx = width / 2.0 - edge_offset;
    let dy = height / 2.0 - edge_offset;

    // Clockwise from top-left: TL, TR, BR, BL.
    let mut corners = vec![
        Point2::new(-dx, dy),
        Point2::new(dx, dy),
        Point2::new(dx, -dy),
        Point2::new(-dx, -dy),
    ];
    if !top_first {
        corners.reverse();
    }

    let top_middle = Point2::new(0.0, dy);
    let bottom_middle = Point2::new(0.0, -dy);
    let left_middle = Point2::new(-dx, 0.0);
    let right_middle = Point2::new(dx, 0.0);
    let midpoints = if top_first {
        vec![top_middle, bottom_middle, left_middle, right_middle]
    } else {
        vec![left_middle, right_middle, top_middle, bottom_middle]
    };

    let mut sequence = if corners_first {
        let mut s = corners;
        s.extend(midpoints);
        s
    } else {
        let mut s = midpoints;
        s.extend(corners);
        s
    };
    sequence.truncate(count as usize);
    sequence
}
