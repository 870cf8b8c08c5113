//! Coilover assembly: dimensions, layout, part meshes and force curve.

pub mod curve;
pub mod dimensions;
pub mod layout;
pub mod parts;

pub use curve::{DEFAULT_CURVE_SAMPLES, ForcePoint, force_curve};
pub use dimensions::{
    DamperSpec, DimensionSet, HelperPerchSpec, HelperPlacement, HelperSpringSpec, MaterialSpec, MeshSettings,
    PerchSpec, SetupSpec, SpringSpec, UpperPerchSpec, WireSection,
};
pub use layout::{Anchors, AssemblyGeometry, AssemblyLayout, SpringGeometry, TravelState};
pub use parts::{PartKind, PartMesh, RigidParts, spring_mesh, spring_meshes};

use crate::error::CoiloverResult;

/// Geometry, travel state and placed part meshes for one travel sample.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblySnapshot {
    pub geometry: AssemblyGeometry,
    pub travel: TravelState,
    /// Ordered by [`PartKind`].
    pub parts: Vec<PartMesh>,
}

impl AssemblySnapshot {
    #[must_use]
    pub fn part(&self, kind: PartKind) -> Option<&PartMesh> {
        self.parts.iter().find(|part| part.kind == kind)
    }
}

/// A validated dimension set together with its rigid part meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    layout: AssemblyLayout,
    rigid: RigidParts,
}

impl Assembly {
    pub fn new(dims: &DimensionSet) -> CoiloverResult<Self> {
        let layout = AssemblyLayout::new(dims)?;
        let rigid = RigidParts::build(&layout)?;
        Ok(Self { layout, rigid })
    }

    #[must_use]
    pub fn layout(&self) -> &AssemblyLayout {
        &self.layout
    }

    #[must_use]
    pub fn travel_state(&self, fraction: f64) -> TravelState {
        self.layout.travel_state(fraction)
    }

    pub fn snapshot(&self, fraction: f64) -> CoiloverResult<AssemblySnapshot> {
        let travel = self.layout.travel_state(fraction);
        let mut parts = self.rigid.place(&travel.anchors);
        parts.extend(spring_meshes(&self.layout, &travel.anchors)?);
        parts.sort_by_key(|part| part.kind);

        log::debug!(
            "snapshot at {:.1}%: {} ({:.1} N), {} parts",
            travel.fraction * 100.0,
            travel.solution.state.label(),
            travel.solution.force,
            parts.len()
        );

        Ok(AssemblySnapshot {
            geometry: *self.layout.geometry(),
            travel,
            parts,
        })
    }

    pub fn force_curve(&self, samples: usize) -> CoiloverResult<Vec<ForcePoint>> {
        force_curve(&self.layout, samples)
    }
}
