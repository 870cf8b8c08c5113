//! Closed Z-aligned primitives for the rigid coilover parts.
//!
//! - `cylinder`: damper body, shaft and upper perch plate
//! - `annulus`: lower perch and the two rings of the helper perch
//! - `cone`: the upper perch taper
//!
//! All meshes go through `finalize_mesh`, so they come back outward-facing
//! with smooth normals and topology diagnostics.

use std::f64::consts::TAU;

use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{GeomMesh, finalize_mesh};
use super::{Point3, Tolerance};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PrimitiveError {
    #[error("primitive requires at least 3 sectors, got {0}")]
    NotEnoughSectors(usize),
    #[error("{name} must be finite and > 0, got {value}")]
    InvalidExtent { name: &'static str, value: f64 },
    #[error("annulus inner radius {inner} must be smaller than outer radius {outer}")]
    InnerNotInsideOuter { inner: f64, outer: f64 },
}

fn check_extent(name: &'static str, value: f64) -> Result<(), PrimitiveError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PrimitiveError::InvalidExtent { name, value })
    }
}

fn check_sectors(sectors: usize) -> Result<(), PrimitiveError> {
    if sectors < 3 {
        return Err(PrimitiveError::NotEnoughSectors(sectors));
    }
    Ok(())
}

fn push_ring(points: &mut Vec<Point3>, radius: f64, z: f64, sectors: usize) -> u32 {
    let start = points.len() as u32;
    for i in 0..sectors {
        let angle = TAU * i as f64 / sectors as f64;
        points.push(Point3::new(radius * angle.cos(), radius * angle.sin(), z));
    }
    start
}

/// Joins two rings of equal size with two triangles per sector. The winding
/// faces outward when `lower` sits below `upper` on a counter-clockwise ring.
fn bridge_rings(indices: &mut Vec<u32>, lower: u32, upper: u32, sectors: usize, inward: bool) {
    for i in 0..sectors as u32 {
        let next = (i + 1) % sectors as u32;
        let (i0, i1, i2, i3) = (lower + i, lower + next, upper + next, upper + i);
        if inward {
            indices.extend_from_slice(&[i0, i2, i1, i0, i3, i2]);
        } else {
            indices.extend_from_slice(&[i0, i1, i2, i0, i2, i3]);
        }
    }
}

/// Fans a ring around a center vertex; `upward` picks the +Z facing winding.
fn fan_ring(indices: &mut Vec<u32>, center: u32, ring: u32, sectors: usize, upward: bool) {
    for i in 0..sectors as u32 {
        let a = ring + i;
        let b = ring + (i + 1) % sectors as u32;
        if upward {
            indices.extend_from_slice(&[center, a, b]);
        } else {
            indices.extend_from_slice(&[center, b, a]);
        }
    }
}

/// Z-aligned cylinder centered on the origin, capped with center fans.
pub fn cylinder(radius: f64, length: f64, sectors: usize) -> Result<(GeomMesh, GeomMeshDiagnostics), PrimitiveError> {
    check_sectors(sectors)?;
    check_extent("radius", radius)?;
    check_extent("length", length)?;

    let half = length * 0.5;
    let mut points = Vec::with_capacity(2 * sectors + 2);
    let bottom = push_ring(&mut points, radius, -half, sectors);
    let top = push_ring(&mut points, radius, half, sectors);
    let bottom_center = points.len() as u32;
    points.push(Point3::new(0.0, 0.0, -half));
    let top_center = points.len() as u32;
    points.push(Point3::new(0.0, 0.0, half));

    let mut indices = Vec::with_capacity(12 * sectors);
    bridge_rings(&mut indices, bottom, top, sectors, false);
    fan_ring(&mut indices, bottom_center, bottom, sectors, false);
    fan_ring(&mut indices, top_center, top, sectors, true);

    Ok(finalize_mesh(points, indices, Tolerance::default_geom()))
}

/// Flat ring of thickness `height` centered on z=0. The inner wall faces the
/// axis.
pub fn annulus(
    outer_radius: f64,
    inner_radius: f64,
    height: f64,
    sectors: usize,
) -> Result<(GeomMesh, GeomMeshDiagnostics), PrimitiveError> {
    check_sectors(sectors)?;
    check_extent("outer radius", outer_radius)?;
    check_extent("inner radius", inner_radius)?;
    check_extent("height", height)?;
    if inner_radius >= outer_radius {
        return Err(PrimitiveError::InnerNotInsideOuter {
            inner: inner_radius,
            outer: outer_radius,
        });
    }

    let half = height * 0.5;
    let mut points = Vec::with_capacity(4 * sectors);
    let bottom_outer = push_ring(&mut points, outer_radius, -half, sectors);
    let top_outer = push_ring(&mut points, outer_radius, half, sectors);
    let bottom_inner = push_ring(&mut points, inner_radius, -half, sectors);
    let top_inner = push_ring(&mut points, inner_radius, half, sectors);

    let mut indices = Vec::with_capacity(24 * sectors);
    bridge_rings(&mut indices, bottom_outer, top_outer, sectors, false);
    bridge_rings(&mut indices, bottom_inner, top_inner, sectors, true);

    for i in 0..sectors as u32 {
        let next = (i + 1) % sectors as u32;

        let (ti, to, to_next, ti_next) = (top_inner + i, top_outer + i, top_outer + next, top_inner + next);
        indices.extend_from_slice(&[ti, to, to_next, ti, to_next, ti_next]);

        let (bi, bo, bo_next, bi_next) = (bottom_inner + i, bottom_outer + i, bottom_outer + next, bottom_inner + next);
        indices.extend_from_slice(&[bi, bo_next, bo, bi, bi_next, bo_next]);
    }

    Ok(finalize_mesh(points, indices, Tolerance::default_geom()))
}

/// Closed cone: base disk at z=0, apex at z=`height`.
pub fn cone(radius: f64, height: f64, sectors: usize) -> Result<(GeomMesh, GeomMeshDiagnostics), PrimitiveError> {
    check_sectors(sectors)?;
    check_extent("radius", radius)?;
    check_extent("height", height)?;

    let mut points = Vec::with_capacity(sectors + 2);
    let base = push_ring(&mut points, radius, 0.0, sectors);
    let center = points.len() as u32;
    points.push(Point3::ORIGIN);
    let apex = points.len() as u32;
    points.push(Point3::new(0.0, 0.0, height));

    let mut indices = Vec::with_capacity(6 * sectors);
    fan_ring(&mut indices, center, base, sectors, false);
    fan_ring(&mut indices, apex, base, sectors, true);

    Ok(finalize_mesh(points, indices, Tolerance::default_geom()))
}
