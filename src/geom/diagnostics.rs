//! Mesh diagnostics for part meshes.
//!
//! Every mesher in `geom` returns a [`GeomMeshDiagnostics`] alongside the mesh.
//! The part builder uses it to check that each coilover part is a closed solid
//! and to surface frame or repair warnings in the log.
//!
//! ```ignore
//! let (mesh, diag) = cylinder(25.0, 200.0, 32)?;
//! assert!(diag.is_valid_solid());
//! assert_eq!(diag.euler_characteristic(), 2);
//! ```

use std::fmt;

/// Topology counts and repair statistics for one mesh.
///
/// - `open_edge_count`: edges with only one adjacent triangle (holes)
/// - `non_manifold_edge_count`: edges shared by more than two triangles
/// - `edge_count`: distinct undirected edges, used for the Euler characteristic
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub edge_count: usize,

    /// Vertices merged during tolerance-based welding.
    pub welded_vertex_count: usize,

    /// Triangles whose winding order was corrected for consistency.
    pub flipped_triangle_count: usize,

    /// Zero-area triangles removed before topology counting.
    pub degenerate_triangle_count: usize,

    pub open_edge_count: usize,
    pub non_manifold_edge_count: usize,

    /// Human-readable warnings, e.g. "mesh has open edges" or
    /// "path has degenerate segment; reusing previous tangent".
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Watertight and manifold; the minimum for a part that encloses volume.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    /// `V - E + F`. A closed sphere-like solid gives 2, a ring (torus-like) gives 0.
    #[must_use]
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count as i64 - self.edge_count as i64 + self.triangle_count as i64
    }

    /// Sums counts and appends warnings, matching an append without welding
    /// (the helper perch joins its flange and sleeve this way).
    pub fn merge(&mut self, other: &GeomMeshDiagnostics) {
        self.vertex_count += other.vertex_count;
        self.triangle_count += other.triangle_count;
        self.edge_count += other.edge_count;
        self.welded_vertex_count += other.welded_vertex_count;
        self.flipped_triangle_count += other.flipped_triangle_count;
        self.degenerate_triangle_count += other.degenerate_triangle_count;
        self.open_edge_count += other.open_edge_count;
        self.non_manifold_edge_count += other.non_manifold_edge_count;
        self.warnings.extend(other.warnings.iter().cloned());
    }

    /// One-line form for log output, e.g. `V:130 T:256 open:2`.
    #[must_use]
    pub fn summary(&self) -> String {
        let counted = [
            ("welded", self.welded_vertex_count),
            ("flipped", self.flipped_triangle_count),
            ("degenerate", self.degenerate_triangle_count),
            ("open", self.open_edge_count),
            ("non-manifold", self.non_manifold_edge_count),
        ];

        let mut out = format!("V:{} T:{}", self.vertex_count, self.triangle_count);
        for (label, count) in counted.into_iter().filter(|&(_, count)| count > 0) {
            out.push_str(&format!(" {label}:{count}"));
        }
        out
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chi:{}", self.summary(), self.euler_characteristic())?;
        for warning in &self.warnings {
            write!(f, "; {warning}")?;
        }
        Ok(())
    }
}
