//! Part meshes for a coilover snapshot.
//!
//! Rigid parts (body, shaft, perches, cone) are meshed once at the origin when
//! the dimensions change and only translated per travel sample. Springs change
//! shape with travel, so they are re-swept along a fresh helix every time.

use serde::Serialize;

use super::dimensions::WireSection;
use super::layout::{Anchors, AssemblyLayout, SpringGeometry};
use crate::error::CoiloverResult;
use crate::geom::{GeomMesh, GeomMeshDiagnostics, SweepCaps, annulus, cone, cylinder, sweep_rectangular, sweep_round};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    DamperBody,
    Shaft,
    LowerPerch,
    MainSpring,
    HelperPerch,
    HelperSpring,
    UpperPerch,
    UpperCone,
}

impl PartKind {
    pub const ALL: [PartKind; 8] = [
        PartKind::DamperBody,
        PartKind::Shaft,
        PartKind::LowerPerch,
        PartKind::MainSpring,
        PartKind::HelperPerch,
        PartKind::HelperSpring,
        PartKind::UpperPerch,
        PartKind::UpperCone,
    ];

    /// Stable identifier used by the front end and for exported file names.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::DamperBody => "damper_body",
            Self::Shaft => "shaft",
            Self::LowerPerch => "lower_perch",
            Self::MainSpring => "main_spring",
            Self::HelperPerch => "helper_perch",
            Self::HelperSpring => "helper_spring",
            Self::UpperPerch => "upper_perch",
            Self::UpperCone => "upper_cone",
        }
    }

    /// Render color as linear RGB in `[0, 1]`.
    #[must_use]
    pub const fn color(self) -> [f64; 3] {
        match self {
            Self::DamperBody => [0.4, 0.4, 0.4],
            Self::Shaft => [0.8, 0.1, 0.1],
            Self::LowerPerch => [0.0, 0.7, 1.0],
            Self::MainSpring => [0.1, 0.1, 0.8],
            Self::HelperPerch => [1.0, 0.0, 0.8],
            Self::HelperSpring => [0.1, 0.6, 0.3],
            Self::UpperPerch | Self::UpperCone => [1.0, 0.5, 0.0],
        }
    }

    #[must_use]
    pub const fn is_spring(self) -> bool {
        matches!(self, Self::MainSpring | Self::HelperSpring)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartMesh {
    pub kind: PartKind,
    pub color: [f64; 3],
    pub mesh: GeomMesh,
    pub diagnostics: GeomMeshDiagnostics,
}

impl PartMesh {
    fn new(kind: PartKind, (mesh, diagnostics): (GeomMesh, GeomMeshDiagnostics)) -> Self {
        report_diagnostics(kind, &diagnostics);
        Self {
            kind,
            color: kind.color(),
            mesh,
            diagnostics,
        }
    }

    fn placed(&self, z: f64) -> Self {
        Self {
            kind: self.kind,
            color: self.color,
            mesh: self.mesh.translated_z(z),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

fn report_diagnostics(kind: PartKind, diagnostics: &GeomMeshDiagnostics) {
    if !diagnostics.is_valid_solid() {
        log::warn!("{} is not a closed solid: {}", kind.id(), diagnostics.summary());
    }
    for warning in &diagnostics.warnings {
        log::warn!("{}: {warning}", kind.id());
    }
}

/// Rigid parts meshed at the origin. Cylinders and annuli are centered on
/// z = 0; the cone has its base on z = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidParts {
    body: PartMesh,
    shaft: PartMesh,
    lower_perch: PartMesh,
    helper_perch: Option<PartMesh>,
    upper_perch: PartMesh,
    upper_cone: PartMesh,
}

impl RigidParts {
    pub fn build(layout: &AssemblyLayout) -> CoiloverResult<Self> {
        let dims = layout.dimensions();
        let geometry = layout.geometry();
        let mesh = &dims.mesh;
        let damper = &dims.damper;

        let body = PartMesh::new(
            PartKind::DamperBody,
            cylinder(damper.body_diameter * 0.5, damper.body_length, mesh.body_sectors)?,
        );
        let shaft = PartMesh::new(
            PartKind::Shaft,
            cylinder(damper.shaft_diameter * 0.5, geometry.shaft_length, mesh.body_sectors)?,
        );
        let lower_perch = PartMesh::new(
            PartKind::LowerPerch,
            annulus(
                geometry.lower_perch_diameter * 0.5,
                damper.body_diameter * 0.5,
                dims.lower_perch.thickness,
                mesh.perch_sectors,
            )?,
        );

        let upper_radius = geometry.upper_perch_diameter * 0.5;
        let upper_perch = PartMesh::new(
            PartKind::UpperPerch,
            cylinder(upper_radius, dims.upper_perch.thickness, mesh.perch_sectors)?,
        );
        let upper_cone = PartMesh::new(
            PartKind::UpperCone,
            cone(upper_radius, dims.upper_perch.cone_height, mesh.perch_sectors)?,
        );

        let helper_perch = match &dims.helper {
            None => None,
            Some(helper) => {
                let perch = &helper.perch;
                let sectors = mesh.helper_perch_sectors;
                let (mut merged, mut diagnostics) = annulus(
                    perch.outer_diameter * 0.5,
                    perch.inner_diameter * 0.5,
                    perch.thickness,
                    sectors,
                )?;
                let (sleeve, sleeve_diagnostics) = annulus(
                    perch.inner_diameter * 0.5,
                    perch.hole_diameter() * 0.5,
                    perch.sleeve_height,
                    sectors,
                )?;
                merged.append(&sleeve);
                diagnostics.merge(&sleeve_diagnostics);
                Some(PartMesh::new(PartKind::HelperPerch, (merged, diagnostics)))
            }
        };

        Ok(Self {
            body,
            shaft,
            lower_perch,
            helper_perch,
            upper_perch,
            upper_cone,
        })
    }

    /// Rigid parts translated to their anchors.
    #[must_use]
    pub fn place(&self, anchors: &Anchors) -> Vec<PartMesh> {
        let mut parts = vec![
            self.body.placed(anchors.body_center),
            self.shaft.placed(anchors.shaft_center),
            self.lower_perch.placed(anchors.lower_perch_center),
            self.upper_perch.placed(anchors.upper_perch_center),
            self.upper_cone.placed(anchors.cone_base),
        ];
        if let (Some(perch), Some(z)) = (&self.helper_perch, anchors.helper_perch_center) {
            parts.push(perch.placed(z));
        }
        parts
    }
}

/// Sweeps one spring between its seats.
pub fn spring_mesh(
    kind: PartKind,
    spring: &SpringGeometry,
    bottom: f64,
    top: f64,
    samples: usize,
    wire_sides: usize,
) -> CoiloverResult<PartMesh> {
    let path = spring.helix(bottom, top)?.sample(samples)?;

    let swept = match spring.wire {
        WireSection::Round { diameter } => sweep_round(&path, diameter * 0.5, wire_sides, SweepCaps::BOTH)?,
        WireSection::Rectangular { width, height } => sweep_rectangular(&path, width, height, SweepCaps::BOTH)?,
    };
    Ok(PartMesh::new(kind, swept))
}

/// Main spring and, when present, helper spring for one set of anchors.
pub fn spring_meshes(layout: &AssemblyLayout, anchors: &Anchors) -> CoiloverResult<Vec<PartMesh>> {
    let geometry = layout.geometry();
    let settings = &layout.dimensions().mesh;

    let mut springs = vec![spring_mesh(
        PartKind::MainSpring,
        &geometry.main,
        anchors.main_bottom,
        anchors.main_top,
        settings.helix_samples,
        settings.wire_sides,
    )?];

    if let (Some(helper), Some(bottom), Some(top)) = (&geometry.helper, anchors.helper_bottom, anchors.helper_top) {
        springs.push(spring_mesh(
            PartKind::HelperSpring,
            helper,
            bottom,
            top,
            settings.helix_samples,
            settings.wire_sides,
        )?);
    }
    Ok(springs)
}
