//! Parallel-transport frames along a sampled path.
//!
//! Each sample gets an orthonormal `(tangent, normal, binormal)` triple. The
//! first normal is seeded from `t0 × Z` (world X when the path starts
//! vertically) and every following normal is the previous one projected onto
//! the plane perpendicular to the new tangent, so the cross-section does not
//! twist around the path.

use super::{Point3, Tolerance, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFrame {
    pub position: Point3,
    /// Unit vector pointing along the path.
    pub tangent: Vec3,
    pub normal: Vec3,
    /// `tangent × normal`.
    pub binormal: Vec3,
}

impl PathFrame {
    /// Maps a point of the local cross-section plane into world space.
    #[must_use]
    pub fn local_to_world(&self, along_normal: f64, along_binormal: f64) -> Point3 {
        self.position
            .add_vec(self.normal.mul_scalar(along_normal))
            .add_vec(self.binormal.mul_scalar(along_binormal))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("path requires at least 2 points")]
    PathTooShort,
    #[error("path must have finite points")]
    NonFinitePath,
    #[error("path starts with a zero-length segment")]
    DegenerateFirstSegment,
}

/// Frames for every path sample plus recovery warnings.
#[derive(Debug, Clone, Default)]
pub struct FrameField {
    pub frames: Vec<PathFrame>,
    pub warnings: Vec<String>,
}

impl FrameField {
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathFrame> {
        self.frames.iter()
    }
}

pub fn frame_field(path: &[Point3]) -> Result<FrameField, FrameError> {
    frame_field_with_tolerance(path, Tolerance::ZERO_LENGTH)
}

/// `tol` decides when a segment counts as zero-length.
pub fn frame_field_with_tolerance(path: &[Point3], tol: Tolerance) -> Result<FrameField, FrameError> {
    if path.len() < 2 {
        return Err(FrameError::PathTooShort);
    }
    if path.iter().any(|p| !p.is_finite()) {
        return Err(FrameError::NonFinitePath);
    }

    let mut warnings = Vec::new();
    let tangents = path_tangents(path, tol, &mut warnings)?;

    let mut frames = Vec::with_capacity(path.len());
    let mut reseeded = 0usize;
    let mut prev_normal: Option<Vec3> = None;

    for (&position, &tangent) in path.iter().zip(tangents.iter()) {
        let normal = match prev_normal {
            None => seed_normal(tangent),
            Some(prev) => match prev.reject_from(tangent).normalized_with(Tolerance::LOOSE) {
                Some(n) => n,
                None => {
                    reseeded += 1;
                    seed_normal(tangent)
                }
            },
        };
        let binormal = tangent.cross(normal);

        frames.push(PathFrame {
            position,
            tangent,
            normal,
            binormal,
        });
        prev_normal = Some(normal);
    }

    if reseeded > 0 {
        warnings.push(format!(
            "transported normal vanished {reseeded} time(s); reseeded from world axes"
        ));
    }

    Ok(FrameField { frames, warnings })
}

/// Forward-difference tangents. The last sample repeats the previous tangent.
fn path_tangents(path: &[Point3], tol: Tolerance, warnings: &mut Vec<String>) -> Result<Vec<Vec3>, FrameError> {
    let mut tangents: Vec<Vec3> = Vec::with_capacity(path.len());
    let mut degenerate = 0usize;

    for pair in path.windows(2) {
        let t = match (pair[1] - pair[0]).normalized_with(tol) {
            Some(t) => t,
            None => match tangents.last().copied() {
                Some(prev) => {
                    degenerate += 1;
                    prev
                }
                None => return Err(FrameError::DegenerateFirstSegment),
            },
        };
        tangents.push(t);
    }

    if let Some(&last) = tangents.last() {
        tangents.push(last);
    }

    if degenerate > 0 {
        warnings.push(format!(
            "path has {degenerate} degenerate segment(s); reusing previous tangent"
        ));
    }

    Ok(tangents)
}

/// `normalize(t × Z)`, or world X made orthogonal to `t` when `t ∥ Z`.
#[must_use]
pub fn seed_normal(tangent: Vec3) -> Vec3 {
    tangent
        .cross(Vec3::Z)
        .normalized_with(Tolerance::LOOSE)
        .or_else(|| Vec3::X.reject_from(tangent).normalized_with(Tolerance::LOOSE))
        .or_else(|| Vec3::Y.reject_from(tangent).normalized())
        .unwrap_or(Vec3::X)
}
