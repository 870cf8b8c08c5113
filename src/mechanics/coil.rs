//! Closed-form inversion of helical torsion-spring rate formulas.
//!
//! Round wire: `k = G·d⁴ / (8·n·D³)` with mean diameter `D = ID + d`.
//! Rectangular wire: `k = G·J / (n·D_m³)` with `J ≈ w·h³/3` and
//! `D_m = (ID + OD)/2`. The torsion approximation only holds while `w ≥ h`.

use serde::Serialize;

/// Shear modulus of spring steel in N/mm².
pub const STEEL_SHEAR_MODULUS: f64 = 80_000.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoilError {
    #[error("{name} must be finite and > 0, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("outer diameter {outer} must be larger than inner diameter {inner}")]
    OuterNotAboveInner { inner: f64, outer: f64 },
    #[error("wire height {height:.3} exceeds wire width {width:.3}; flat-wire torsion approximation needs width >= height")]
    SectionTooTall { width: f64, height: f64 },
}

fn positive(name: &'static str, value: f64) -> Result<f64, CoilError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoilError::NonPositive { name, value })
    }
}

/// Coil count and wire section recovered for a flat-wire spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectangularCoil {
    pub active_coils: f64,
    /// Radial extent of the wire.
    pub width: f64,
    /// Axial extent of the wire.
    pub height: f64,
    pub mean_diameter: f64,
}

/// Active coils of a round-wire spring: `n = G·d⁴ / (8·k·D³)`.
pub fn active_coils_round(rate: f64, wire_diameter: f64, inner_diameter: f64, shear_modulus: f64) -> Result<f64, CoilError> {
    let k = positive("spring rate", rate)?;
    let d = positive("wire diameter", wire_diameter)?;
    let id = positive("inner diameter", inner_diameter)?;
    let g = positive("shear modulus", shear_modulus)?;

    let mean = id + d;
    Ok(g * d.powi(4) / (8.0 * k * mean.powi(3)))
}

/// Rate of a round-wire spring with `coils` active coils.
pub fn rate_round(coils: f64, wire_diameter: f64, inner_diameter: f64, shear_modulus: f64) -> Result<f64, CoilError> {
    let n = positive("active coils", coils)?;
    let d = positive("wire diameter", wire_diameter)?;
    let id = positive("inner diameter", inner_diameter)?;
    let g = positive("shear modulus", shear_modulus)?;

    let mean = id + d;
    Ok(g * d.powi(4) / (8.0 * n * mean.powi(3)))
}

/// Coil count and wire height of a flat-wire spring.
///
/// With a solid height `H_s` both unknowns follow from `H_s = n·h`:
/// `n = (G·w·H_s³ / (3·k·D_m³))^(1/4)` and `h = H_s / n`. Without one the
/// height is the radial gap `(OD − ID)/2` and `n = G·J / (k·D_m³)`.
pub fn active_coils_rectangular(
    rate: f64,
    inner_diameter: f64,
    outer_diameter: f64,
    shear_modulus: f64,
    wire_width: f64,
    solid_height: Option<f64>,
) -> Result<RectangularCoil, CoilError> {
    let k = positive("spring rate", rate)?;
    let id = positive("inner diameter", inner_diameter)?;
    let od = positive("outer diameter", outer_diameter)?;
    let g = positive("shear modulus", shear_modulus)?;
    let width = positive("wire width", wire_width)?;
    if od <= id {
        return Err(CoilError::OuterNotAboveInner { inner: id, outer: od });
    }

    let mean_diameter = (id + od) * 0.5;
    let mean_cubed = mean_diameter.powi(3);

    let (active_coils, height) = match solid_height {
        Some(solid) => {
            let solid = positive("solid height", solid)?;
            let n = (g * width * solid.powi(3) / (3.0 * k * mean_cubed)).powf(0.25);
            (n, solid / n)
        }
        None => {
            let height = (od - id) * 0.5;
            let torsion = width * height.powi(3) / 3.0;
            (g * torsion / (k * mean_cubed), height)
        }
    };

    if height > width {
        return Err(CoilError::SectionTooTall { width, height });
    }

    Ok(RectangularCoil {
        active_coils,
        width,
        height,
        mean_diameter,
    })
}

/// Active coils of a flat-wire spring whose section is given outright.
pub fn active_coils_rectangular_section(
    rate: f64,
    mean_diameter: f64,
    shear_modulus: f64,
    wire_width: f64,
    wire_height: f64,
) -> Result<f64, CoilError> {
    let k = positive("spring rate", rate)?;
    let mean = positive("mean diameter", mean_diameter)?;
    let g = positive("shear modulus", shear_modulus)?;
    let width = positive("wire width", wire_width)?;
    let height = positive("wire height", wire_height)?;
    if height > width {
        return Err(CoilError::SectionTooTall { width, height });
    }

    let torsion = width * height.powi(3) / 3.0;
    Ok(g * torsion / (k * mean.powi(3)))
}

/// Rate of a flat-wire spring; inverse of the two solvers above.
pub fn rate_rectangular(coils: f64, mean_diameter: f64, shear_modulus: f64, wire_width: f64, wire_height: f64) -> Result<f64, CoilError> {
    let n = positive("active coils", coils)?;
    let mean = positive("mean diameter", mean_diameter)?;
    let g = positive("shear modulus", shear_modulus)?;
    let width = positive("wire width", wire_width)?;
    let height = positive("wire height", wire_height)?;

    let torsion = width * height.powi(3) / 3.0;
    Ok(g * torsion / (n * mean.powi(3)))
}
