//! Mesh health report.
//!
//! None of these findings block analysis; they explain why an extraction or
//! a pick may behave unexpectedly (open scans, stray fragments, slivers).

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::MeshModel;

/// Structural summary of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub vertex_count: usize,
    pub face_count: usize,

    /// Distinct undirected edges.
    pub edge_count: usize,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: (Point3<f64>, Point3<f64>),

    /// Extent along (x, y, z).
    pub dimensions: (f64, f64, f64),

    /// Edges with exactly one adjacent face.
    pub boundary_edge_count: usize,

    /// Edges with more than two adjacent faces.
    pub non_manifold_edge_count: usize,

    /// Zero-area faces; their normals are undefined.
    pub degenerate_face_count: usize,

    /// Connected components of the vertex graph, isolated vertices included.
    pub component_count: usize,
}

impl MeshReport {
    /// No boundary edges.
    pub fn is_watertight(&self) -> bool {
        self.boundary_edge_count == 0
    }

    /// No edge shared by more than two faces.
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Every vertex reachable from every other along mesh edges.
    pub fn is_connected(&self) -> bool {
        self.component_count == 1
    }

    /// Skeleton extraction will run without a component policy fallback.
    pub fn supports_skeleton(&self) -> bool {
        self.is_connected()
    }
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let yes_no = |ok: bool| if ok { "yes" } else { "NO" };
        let (min, max) = self.bounds;
        let (dx, dy, dz) = self.dimensions;

        writeln!(f, "Mesh Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Edges: {}", self.edge_count)?;
        writeln!(
            f,
            "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
            min.x, min.y, min.z, max.x, max.y, max.z
        )?;
        writeln!(f, "  Dimensions: {:.3} x {:.3} x {:.3}", dx, dy, dz)?;
        writeln!(
            f,
            "  Watertight: {} (boundary edges: {})",
            yes_no(self.is_watertight()),
            self.boundary_edge_count
        )?;
        writeln!(
            f,
            "  Manifold: {} (non-manifold edges: {})",
            yes_no(self.is_manifold()),
            self.non_manifold_edge_count
        )?;
        writeln!(
            f,
            "  Connected: {} (components: {})",
            yes_no(self.is_connected()),
            self.component_count
        )?;
        write!(f, "  Degenerate faces: {}", self.degenerate_face_count)
    }
}

/// Inspect a model and log a warning for each problem found.
///
/// Uses the model's cached adjacency, normals and vertex graph, so later
/// queries on the same model reuse the work.
pub fn validate_mesh(model: &MeshModel) -> MeshReport {
    let adjacency = model.adjacency();
    let (_, component_count) = model.vertex_graph().connected_components();

    let bounds = model.bounds();
    let extent = bounds.1 - bounds.0;

    let report = MeshReport {
        vertex_count: model.vertex_count(),
        face_count: model.face_count(),
        edge_count: adjacency.edge_count(),
        bounds,
        dimensions: (extent.x, extent.y, extent.z),
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        degenerate_face_count: model.face_normals().iter().filter(|n| n.is_none()).count(),
        component_count,
    };

    if !report.is_watertight() {
        warn!(
            "Mesh is not watertight: {} boundary edges",
            report.boundary_edge_count
        );
    }
    if !report.is_manifold() {
        warn!(
            "Mesh is not manifold: {} non-manifold edges",
            report.non_manifold_edge_count
        );
    }
    if !report.is_connected() {
        warn!(
            "Mesh has {} disconnected components; skeleton extraction needs a component policy",
            report.component_count
        );
    }
    if report.degenerate_face_count > 0 {
        warn!(
            "Mesh has {} zero-area faces with undefined normals",
            report.degenerate_face_count
        );
    }

    debug!("{}", report);

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> MeshModel {
        MeshModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.5, 1.0, 0.0],
                [0.5, 0.5, 1.0],
            ],
            &[[0, 1, 2], [0, 3, 1], [1, 3, 2], [2, 3, 0]],
        )
        .expect("valid tetrahedron")
    }

    #[test]
    fn test_closed_mesh() {
        let report = validate_mesh(&tetrahedron());

        assert!(report.is_watertight());
        assert!(report.is_manifold());
        assert!(report.is_connected());
        assert_eq!(report.edge_count, 6);
        assert_eq!(report.degenerate_face_count, 0);
        assert_eq!(report.dimensions, (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_open_disconnected_mesh_with_sliver() {
        let model = MeshModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [5.0, 0.0, 0.0],
                [6.0, 0.0, 0.0],
                [7.0, 0.0, 0.0],
            ],
            &[[0, 1, 2], [3, 4, 5]],
        )
        .expect("valid mesh");
        let report = validate_mesh(&model);

        assert!(!report.is_watertight());
        assert_eq!(report.boundary_edge_count, 6);
        assert!(report.is_manifold());
        assert_eq!(report.component_count, 2);
        assert!(!report.supports_skeleton());
        assert_eq!(report.degenerate_face_count, 1);
    }

    #[test]
    fn test_report_display() {
        let output = validate_mesh(&tetrahedron()).to_string();

        assert!(output.contains("Vertices: 4"));
        assert!(output.contains("Faces: 4"));
        assert!(output.contains("Watertight: yes"));
        assert!(output.contains("Connected: yes (components: 1)"));
    }
}
