//! Force against shaft travel, sampled at uniform travel fractions.

use serde::Serialize;

use super::layout::AssemblyLayout;
use crate::error::{CoiloverError, CoiloverResult};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const DEFAULT_CURVE_SAMPLES: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForcePoint {
    /// Shaft travel from full extension in mm.
    pub travel: f64,
    /// Axial force in N.
    pub force: f64,
}

/// `samples` points from full extension (`f = 0`) to full travel (`f = 1`).
pub fn force_curve(layout: &AssemblyLayout, samples: usize) -> CoiloverResult<Vec<ForcePoint>> {
    if samples < 2 {
        return Err(CoiloverError::invalid(
            "curve.samples",
            format!("a force curve needs at least 2 samples, got {samples}"),
        ));
    }
    let points = sample_curve(layout, samples);
    log::debug!("force curve: {samples} samples, peak {:.1} N", points.last().map_or(0.0, |p| p.force));
    Ok(points)
}

fn sample(layout: &AssemblyLayout, index: usize, samples: usize) -> ForcePoint {
    let fraction = index as f64 / (samples - 1) as f64;
    let state = layout.travel_state(fraction);
    ForcePoint {
        travel: state.travel,
        force: state.solution.force,
    }
}

#[cfg(feature = "parallel")]
fn sample_curve(layout: &AssemblyLayout, samples: usize) -> Vec<ForcePoint> {
    (0..samples)
        .into_par_iter()
        .map(|index| sample(layout, index, samples))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn sample_curve(layout: &AssemblyLayout, samples: usize) -> Vec<ForcePoint> {
    (0..samples).map(|index| sample(layout, index, samples)).collect()
}
