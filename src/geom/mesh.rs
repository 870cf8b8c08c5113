use std::collections::HashMap;

use super::diagnostics::GeomMeshDiagnostics;
use super::{BBox, Point3, Tolerance, Vec3};

/// Triangle mesh handed to the renderer as opaque vertex/index buffers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    /// Per-vertex smooth normals; filled in by `finalize_mesh`.
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self
            .normals
            .as_ref()
            .is_some_and(|normals| normals.len() != self.positions.len())
        {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(self.positions.iter().copied().map(Point3::from))
    }

    /// Rigid placement along the strut axis. Normals are unchanged.
    #[must_use]
    pub fn translated_z(&self, z: f64) -> Self {
        Self {
            positions: self.positions.iter().map(|&[x, y, pz]| [x, y, pz + z]).collect(),
            indices: self.indices.clone(),
            normals: self.normals.clone(),
        }
    }

    /// Appends `other` without welding. Normals are kept only when both
    /// meshes carry them.
    pub fn append(&mut self, other: &GeomMesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|&i| i + base));

        self.normals = match (self.normals.take(), other.normals.as_ref()) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };
    }
}

/// Shared tail of every mesher: weld, drop degenerates, make winding
/// consistent and outward, count topology, compute smooth normals.
pub(crate) fn finalize_mesh(
    points: Vec<Point3>,
    indices: Vec<u32>,
    tol: Tolerance,
) -> (GeomMesh, GeomMeshDiagnostics) {
    let (repaired_points, repaired_indices, welded_vertex_count) =
        weld_mesh_vertices(points, indices, tol);

    let (mut repaired_indices, degenerate_triangle_count) =
        cull_degenerate_triangles(&repaired_points, &repaired_indices, tol);

    let flipped_triangle_count = fix_triangle_winding_consistency(&mut repaired_indices);
    let topology = count_edge_topology(&repaired_indices);

    let mut warnings = Vec::new();
    if topology.open_edges == 0 && topology.non_manifold_edges == 0 {
        let volume = signed_volume(&repaired_points, &repaired_indices);
        if volume.is_finite() && volume < 0.0 {
            flip_all_triangles(&mut repaired_indices);
            warnings.push("mesh orientation flipped (outward)".to_string());
        }
    }
    if topology.open_edges > 0 {
        warnings.push("mesh has open edges".to_string());
    }
    if topology.non_manifold_edges > 0 {
        warnings.push("mesh has non-manifold edges".to_string());
    }

    let normals = compute_smooth_normals(&repaired_points, &repaired_indices);

    let mesh = GeomMesh {
        positions: repaired_points.into_iter().map(Point3::to_array).collect(),
        indices: repaired_indices,
        normals: Some(normals),
    };

    let diagnostics = GeomMeshDiagnostics {
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        edge_count: topology.edges,
        welded_vertex_count,
        flipped_triangle_count,
        degenerate_triangle_count,
        open_edge_count: topology.open_edges,
        non_manifold_edge_count: topology.non_manifold_edges,
        warnings,
    };

    (mesh, diagnostics)
}

pub(crate) fn weld_mesh_vertices(
    points: Vec<Point3>,
    indices: Vec<u32>,
    tol: Tolerance,
) -> (Vec<Point3>, Vec<u32>, usize) {
    if !tol.eps.is_finite() || tol.eps <= 0.0 {
        return (points, indices, 0);
    }

    let inv = 1.0 / tol.eps;

    /// Quantize a coordinate value to a grid cell index.
    /// Returns None for non-finite values (NaN/Inf) to prevent incorrect welding.
    fn quantize(value: f64, inv: f64) -> Option<i64> {
        if !value.is_finite() {
            return None;
        }
        let q = (value * inv).floor();
        Some(q.clamp(i64::MIN as f64, i64::MAX as f64) as i64)
    }

    let mut buckets: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    let mut remap: Vec<u32> = Vec::with_capacity(points.len());
    let mut out_points: Vec<Point3> = Vec::with_capacity(points.len());

    for p in points.iter().copied() {
        let key = match (quantize(p.x, inv), quantize(p.y, inv), quantize(p.z, inv)) {
            (Some(kx), Some(ky), Some(kz)) => Some((kx, ky, kz)),
            _ => None,
        };

        let found = key.and_then(|key| {
            neighbour_cells(key).find_map(|cell| {
                buckets.get(&cell).and_then(|candidates| {
                    candidates
                        .iter()
                        .copied()
                        .find(|&cand| tol.approx_eq_point3(out_points[cand as usize], p))
                })
            })
        });

        let out_idx = match found {
            Some(existing) => existing,
            None => {
                let new_idx = out_points.len() as u32;
                out_points.push(p);
                // Non-finite points get their own vertex and never join a bucket.
                if let Some(key) = key {
                    buckets.entry(key).or_default().push(new_idx);
                }
                new_idx
            }
        };

        remap.push(out_idx);
    }

    let out_indices = indices
        .into_iter()
        .map(|idx| remap.get(idx as usize).copied().unwrap_or(idx))
        .collect();

    let welded = points.len().saturating_sub(out_points.len());
    (out_points, out_indices, welded)
}

fn neighbour_cells(key: (i64, i64, i64)) -> impl Iterator<Item = (i64, i64, i64)> {
    (-1i64..=1).flat_map(move |dx| {
        (-1i64..=1).flat_map(move |dy| (-1i64..=1).map(move |dz| (key.0 + dx, key.1 + dy, key.2 + dz)))
    })
}

fn cull_degenerate_triangles(points: &[Point3], indices: &[u32], tol: Tolerance) -> (Vec<u32>, usize) {
    let mut out = Vec::with_capacity(indices.len());
    let mut removed = 0usize;

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);

        if i0 == i1 || i1 == i2 || i0 == i2 {
            removed += 1;
            continue;
        }

        let (Some(a), Some(b), Some(c)) = (
            points.get(i0 as usize).copied(),
            points.get(i1 as usize).copied(),
            points.get(i2 as usize).copied(),
        ) else {
            removed += 1;
            continue;
        };

        let area2 = b.sub_point(a).cross(c.sub_point(a)).length_squared();
        if !area2.is_finite() || area2 <= tol.eps_squared() * tol.eps_squared() {
            removed += 1;
            continue;
        }

        out.extend_from_slice(&[i0, i1, i2]);
    }

    (out, removed)
}

/// Flood-fills across manifold edges so neighbouring triangles traverse their
/// shared edge in opposite directions. Returns the number of flipped triangles.
pub(crate) fn fix_triangle_winding_consistency(indices: &mut [u32]) -> usize {
    let tri_count = indices.len() / 3;
    if tri_count == 0 {
        return 0;
    }

    let mut edges: HashMap<(u32, u32), Vec<(usize, bool)>> = HashMap::with_capacity(tri_count * 3);
    for t in 0..tri_count {
        for (a, b) in triangle_edges(indices, t) {
            let (lo, hi, dir) = if a <= b { (a, b, true) } else { (b, a, false) };
            edges.entry((lo, hi)).or_default().push((t, dir));
        }
    }

    let mut visited = vec![false; tri_count];
    let mut flipped = vec![false; tri_count];

    for seed in 0..tri_count {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut stack = vec![seed];

        while let Some(t) = stack.pop() {
            for (a, b) in triangle_edges(indices, t) {
                let (lo, hi, dir_t) = if a <= b { (a, b, true) } else { (b, a, false) };
                let Some(adj) = edges.get(&(lo, hi)) else {
                    continue;
                };
                if adj.len() != 2 {
                    continue;
                }

                let (other, dir_other) = match (adj[0], adj[1]) {
                    ((t0, _), (t1, d1)) if t0 == t => (t1, d1),
                    ((t0, d0), (t1, _)) if t1 == t => (t0, d0),
                    _ => continue,
                };

                if !visited[other] {
                    visited[other] = true;
                    flipped[other] = flipped[t] ^ dir_t ^ dir_other ^ true;
                    stack.push(other);
                }
            }
        }
    }

    let mut flipped_count = 0usize;
    for (t, &flip) in flipped.iter().enumerate() {
        if flip {
            indices.swap(t * 3 + 1, t * 3 + 2);
            flipped_count += 1;
        }
    }

    flipped_count
}

fn triangle_edges(indices: &[u32], t: usize) -> [(u32, u32); 3] {
    let i0 = indices[t * 3];
    let i1 = indices[t * 3 + 1];
    let i2 = indices[t * 3 + 2];
    [(i0, i1), (i1, i2), (i2, i0)]
}

struct EdgeTopology {
    edges: usize,
    open_edges: usize,
    non_manifold_edges: usize,
}

fn count_edge_topology(indices: &[u32]) -> EdgeTopology {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        if i0 == i1 || i1 == i2 || i0 == i2 {
            continue;
        }

        for (ea, eb) in [(i0, i1), (i1, i2), (i2, i0)] {
            let key = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut topology = EdgeTopology {
        edges: edge_counts.len(),
        open_edges: 0,
        non_manifold_edges: 0,
    };
    for count in edge_counts.into_values() {
        if count == 1 {
            topology.open_edges += 1;
        } else if count > 2 {
            topology.non_manifold_edges += 1;
        }
    }

    topology
}

fn flip_all_triangles(indices: &mut [u32]) {
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
}

pub(crate) fn signed_volume(points: &[Point3], indices: &[u32]) -> f64 {
    let mut volume = 0.0;
    for tri in indices.chunks_exact(3) {
        let (Some(a), Some(b), Some(c)) = (
            points.get(tri[0] as usize),
            points.get(tri[1] as usize),
            points.get(tri[2] as usize),
        ) else {
            continue;
        };

        let av = Vec3::new(a.x, a.y, a.z);
        let bv = Vec3::new(b.x, b.y, b.z);
        let cv = Vec3::new(c.x, c.y, c.z);
        volume += av.dot(bv.cross(cv));
    }

    volume / 6.0
}

/// Signed volume of a finished mesh; positive for outward winding.
#[must_use]
pub fn mesh_volume(mesh: &GeomMesh) -> f64 {
    let points: Vec<Point3> = mesh.positions.iter().copied().map(Point3::from).collect();
    signed_volume(&points, &mesh.indices)
}

fn compute_smooth_normals(points: &[Point3], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut normals = vec![Vec3::ZERO; points.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let (Some(&a), Some(&b), Some(&c)) = (points.get(i0), points.get(i1), points.get(i2)) else {
            continue;
        };

        // Area-weighted face normal.
        let n = b.sub_point(a).cross(c.sub_point(a));
        normals[i0] = normals[i0] + n;
        normals[i1] = normals[i1] + n;
        normals[i2] = normals[i2] + n;
    }

    normals
        .into_iter()
        .map(|n| n.normalized().unwrap_or(Vec3::Z).to_array())
        .collect()
}
