//! Tube sweeps for spring wire.
//!
//! - `sweep_round*`: circular wire section carried by parallel-transport frames
//! - `sweep_rectangular*`: flat wire section kept upright, width along the
//!   coil radius and height along the strut axis
//!
//! Ring `i` is joined to ring `i + 1` with two triangles per side; optional
//! caps close the ends with center fans so the wire is a closed solid.
//!
//! The `*_with_tolerance` variants use one tolerance for both the weld and the
//! zero-length segment test, so a segment short enough to be welded away also
//! reuses the previous tangent.

use std::f64::consts::TAU;

use super::diagnostics::GeomMeshDiagnostics;
use super::frame::{FrameError, frame_field_with_tolerance};
use super::mesh::{GeomMesh, finalize_mesh};
use super::{Point3, Tolerance, Vec3};

/// Configuration for cap generation on swept wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepCaps {
    pub start: bool,
    pub end: bool,
}

impl SweepCaps {
    pub const NONE: Self = Self { start: false, end: false };
    pub const BOTH: Self = Self { start: true, end: true };
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SweepError {
    #[error("round sweep requires at least 3 sides, got {0}")]
    NotEnoughSides(usize),
    #[error("wire radius must be finite and > 0")]
    InvalidRadius,
    #[error("wire section must be finite and > 0, got {width} x {height}")]
    InvalidSection { width: f64, height: f64 },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

pub fn sweep_round(
    path: &[Point3],
    wire_radius: f64,
    sides: usize,
    caps: SweepCaps,
) -> Result<(GeomMesh, GeomMeshDiagnostics), SweepError> {
    sweep_round_with_tolerance(path, wire_radius, sides, caps, Tolerance::default_geom())
}

pub fn sweep_round_with_tolerance(
    path: &[Point3],
    wire_radius: f64,
    sides: usize,
    caps: SweepCaps,
    tol: Tolerance,
) -> Result<(GeomMesh, GeomMeshDiagnostics), SweepError> {
    if sides < 3 {
        return Err(SweepError::NotEnoughSides(sides));
    }
    if !wire_radius.is_finite() || wire_radius <= tol.eps {
        return Err(SweepError::InvalidRadius);
    }

    let field = frame_field_with_tolerance(path, tol)?;

    let mut vertices: Vec<Point3> = Vec::with_capacity(field.len() * sides + 2);
    for frame in field.iter() {
        for side in 0..sides {
            let angle = TAU * side as f64 / sides as f64;
            vertices.push(frame.local_to_world(wire_radius * angle.cos(), wire_radius * angle.sin()));
        }
    }

    let (mesh, mut diagnostics) = stitch_rings(vertices, path, sides, caps, tol);
    diagnostics.warnings.extend(field.warnings);
    Ok((mesh, diagnostics))
}

pub fn sweep_rectangular(
    path: &[Point3],
    width: f64,
    height: f64,
    caps: SweepCaps,
) -> Result<(GeomMesh, GeomMeshDiagnostics), SweepError> {
    sweep_rectangular_with_tolerance(path, width, height, caps, Tolerance::default_geom())
}

/// The section is not transported: at every sample the radial axis is
/// `normalize(Z × t)` and the vertical axis `t × radial`, so flat wire never
/// rolls around the coil.
pub fn sweep_rectangular_with_tolerance(
    path: &[Point3],
    width: f64,
    height: f64,
    caps: SweepCaps,
    tol: Tolerance,
) -> Result<(GeomMesh, GeomMeshDiagnostics), SweepError> {
    let valid = |v: f64| v.is_finite() && v > tol.eps;
    if !valid(width) || !valid(height) {
        return Err(SweepError::InvalidSection { width, height });
    }

    // Only the tangents and the degeneracy checks of the frame field are used.
    let field = frame_field_with_tolerance(path, tol)?;

    let (hw, hh) = (width * 0.5, height * 0.5);
    let corners = [(hw, -hh), (hw, hh), (-hw, hh), (-hw, -hh)];

    let mut vertices: Vec<Point3> = Vec::with_capacity(field.len() * corners.len() + 2);
    for frame in field.iter() {
        let (radial, vertical) = upright_axes(frame.tangent);
        for &(r, v) in &corners {
            vertices.push(frame.position + radial * r + vertical * v);
        }
    }

    let (mesh, mut diagnostics) = stitch_rings(vertices, path, corners.len(), caps, tol);
    diagnostics.warnings.extend(field.warnings);
    Ok((mesh, diagnostics))
}

/// Radial and vertical axes of an upright section for tangent `t`.
#[must_use]
pub fn upright_axes(tangent: Vec3) -> (Vec3, Vec3) {
    let radial = Vec3::Z
        .cross(tangent)
        .normalized_with(Tolerance::LOOSE)
        .or_else(|| Vec3::X.reject_from(tangent).normalized_with(Tolerance::LOOSE))
        .unwrap_or(Vec3::Y);
    let vertical = tangent.cross(radial);
    (radial, vertical)
}

/// Side triangles between consecutive rings plus optional center-fan caps.
fn stitch_rings(
    mut vertices: Vec<Point3>,
    path: &[Point3],
    ring_size: usize,
    caps: SweepCaps,
    tol: Tolerance,
) -> (GeomMesh, GeomMeshDiagnostics) {
    let ring_count = path.len();
    let mut indices: Vec<u32> = Vec::with_capacity((ring_count - 1) * ring_size * 6 + ring_size * 6);

    for r in 0..ring_count - 1 {
        let r_next = r + 1;
        for seg in 0..ring_size {
            let seg_next = (seg + 1) % ring_size;

            let i0 = (r * ring_size + seg) as u32;
            let i1 = (r * ring_size + seg_next) as u32;
            let i2 = (r_next * ring_size + seg_next) as u32;
            let i3 = (r_next * ring_size + seg) as u32;

            indices.extend_from_slice(&[i0, i1, i2]);
            indices.extend_from_slice(&[i0, i2, i3]);
        }
    }

    if caps.start {
        add_cap_fan(&mut vertices, &mut indices, path[0], 0, ring_size, true);
    }
    if caps.end {
        let last = ring_count - 1;
        add_cap_fan(&mut vertices, &mut indices, path[last], last * ring_size, ring_size, false);
    }

    finalize_mesh(vertices, indices, tol)
}

fn add_cap_fan(
    vertices: &mut Vec<Point3>,
    indices: &mut Vec<u32>,
    center: Point3,
    ring_start: usize,
    ring_size: usize,
    is_start: bool,
) {
    let center_idx = vertices.len() as u32;
    vertices.push(center);

    for seg in 0..ring_size {
        let a = (ring_start + seg) as u32;
        let b = (ring_start + (seg + 1) % ring_size) as u32;

        if is_start {
            // Outward normal at start points along -tangent.
            indices.extend_from_slice(&[center_idx, b, a]);
        } else {
            // Outward normal at end points along +tangent.
            indices.extend_from_slice(&[center_idx, a, b]);
        }
    }
}
