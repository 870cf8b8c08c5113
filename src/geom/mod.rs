mod core;
mod diagnostics;
mod frame;
mod helix;
mod mesh;
mod primitive;
mod sweep;

pub use core::{BBox, Point3, Tolerance, Vec3};
pub use diagnostics::GeomMeshDiagnostics;
pub use frame::{FrameError, FrameField, PathFrame, frame_field, frame_field_with_tolerance, seed_normal};
pub use helix::{Helix, HelixError};
pub use mesh::{GeomMesh, mesh_volume};
pub use primitive::{PrimitiveError, annulus, cone, cylinder};
pub use sweep::{
    SweepCaps, SweepError, sweep_rectangular, sweep_rectangular_with_tolerance, sweep_round,
    sweep_round_with_tolerance, upright_axes,
};

#[cfg(test)]
mod tests;
