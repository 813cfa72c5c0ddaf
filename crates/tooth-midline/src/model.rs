//! Validated mesh with lazily cached derived data.

use std::cell::OnceCell;
use std::io::BufRead;
use std::path::Path;

use nalgebra::{Point3, Unit, Vector3};
use tracing::debug;

use crate::adjacency::MeshAdjacency;
use crate::error::{AnalysisError, AnalysisResult};
use crate::graph::VertexGraph;
use crate::io;
use crate::spatial::SpatialIndex;
use crate::{Mesh, Triangle, Vertex};

/// A non-empty, index-checked triangle mesh and its query caches.
///
/// Face normals, the vertex graph, face adjacency and the spatial index are
/// built on first use and kept for the lifetime of the model. The mesh itself
/// is immutable; to analyze different geometry, build a new `MeshModel`,
/// which starts with empty caches.
pub struct MeshModel {
    mesh: Mesh,
    normals: OnceCell<Vec<Option<Unit<Vector3<f64>>>>>,
    graph: OnceCell<VertexGraph>,
    adjacency: OnceCell<MeshAdjacency>,
    spatial: OnceCell<SpatialIndex>,
}

impl MeshModel {
    /// Wrap a mesh after checking it has vertices, faces and in-range indices.
    pub fn new(mesh: Mesh) -> AnalysisResult<Self> {
        validate_indices(&mesh)?;
        debug!(
            "Mesh model: {} vertices, {} faces",
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(Self {
            mesh,
            normals: OnceCell::new(),
            graph: OnceCell::new(),
            adjacency: OnceCell::new(),
            spatial: OnceCell::new(),
        })
    }

    /// Build a model from already-parsed vertex positions and face index triples.
    pub fn from_arrays(positions: &[[f64; 3]], faces: &[[u32; 3]]) -> AnalysisResult<Self> {
        let mut mesh = Mesh::with_capacity(positions.len(), faces.len());
        mesh.vertices
            .extend(positions.iter().map(|&[x, y, z]| Vertex::from_coords(x, y, z)));
        mesh.faces.extend_from_slice(faces);
        Self::new(mesh)
    }

    /// Parse an OBJ buffer into a model.
    pub fn load<R: BufRead>(reader: &mut R) -> AnalysisResult<Self> {
        Self::new(io::read_obj(reader, "<buffer>")?)
    }

    /// Load a mesh file (`.obj` or `.stl`) into a model.
    pub fn load_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        Self::new(io::load_mesh(path.as_ref())?)
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Take back the underlying mesh, dropping all caches.
    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of faces.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vertex] {
        &self.mesh.vertices
    }

    /// Face index triples.
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces
    }

    /// Position of a vertex.
    pub fn position(&self, vertex: u32) -> Option<Point3<f64>> {
        self.mesh.vertices.get(vertex as usize).map(|v| v.position)
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        // Non-empty by construction.
        self.mesh
            .bounds()
            .unwrap_or((Point3::origin(), Point3::origin()))
    }

    /// Arithmetic mean of all vertex positions.
    pub fn centroid(&self) -> Point3<f64> {
        self.mesh.centroid().unwrap_or_else(Point3::origin)
    }

    /// Check that a face index is in range.
    pub fn check_face(&self, face: u32) -> AnalysisResult<()> {
        if (face as usize) < self.face_count() {
            Ok(())
        } else {
            Err(AnalysisError::FaceOutOfRange {
                face,
                face_count: self.face_count(),
            })
        }
    }

    /// Triangle of a face.
    pub fn triangle(&self, face: u32) -> AnalysisResult<Triangle> {
        self.mesh
            .triangle(face as usize)
            .ok_or(AnalysisError::FaceOutOfRange {
                face,
                face_count: self.face_count(),
            })
    }

    /// Outward unit normal of a face (right-hand rule on its winding).
    ///
    /// Zero-area faces report [`AnalysisError::DegenerateFace`].
    pub fn face_normal(&self, face: u32) -> AnalysisResult<Unit<Vector3<f64>>> {
        self.check_face(face)?;
        self.face_normals()[face as usize].ok_or(AnalysisError::DegenerateFace { face })
    }

    /// Cached per-face unit normals; `None` marks a degenerate face.
    pub fn face_normals(&self) -> &[Option<Unit<Vector3<f64>>>] {
        self.normals
            .get_or_init(|| self.mesh.triangles().map(|t| t.normal()).collect())
    }

    /// Weighted vertex graph (edge weight = Euclidean edge length).
    pub fn vertex_graph(&self) -> &VertexGraph {
        self.graph.get_or_init(|| {
            let graph = VertexGraph::from_mesh(&self.mesh);
            debug!(
                "Built vertex graph: {} nodes, {} edges",
                graph.vertex_count(),
                graph.edge_count()
            );
            graph
        })
    }

    /// Face, edge and vertex incidence tables.
    pub fn adjacency(&self) -> &MeshAdjacency {
        self.adjacency
            .get_or_init(|| MeshAdjacency::build(self.vertex_count(), &self.mesh.faces))
    }

    /// Faces sharing at least one edge with `face`, ascending.
    pub fn face_adjacency(&self, face: u32) -> AnalysisResult<Vec<u32>> {
        self.check_face(face)?;
        Ok(self.adjacency().face_neighbors(face).to_vec())
    }

    /// All unordered pairs of edge-sharing faces, `(a, b)` with `a < b`.
    pub fn face_adjacency_pairs(&self) -> Vec<(u32, u32)> {
        self.adjacency().face_pairs()
    }

    /// Faces using a vertex, ascending.
    pub fn faces_for_vertex(&self, vertex: u32) -> &[u32] {
        self.adjacency().faces_for_vertex(vertex)
    }

    /// Nearest-vertex index over all vertex positions.
    pub fn spatial_index(&self) -> &SpatialIndex {
        self.spatial.get_or_init(|| SpatialIndex::build(&self.mesh))
    }

    /// Vertex closest to an arbitrary point.
    pub fn nearest_vertex(&self, point: &Point3<f64>) -> u32 {
        // The index is never empty for a validated model.
        self.spatial_index()
            .nearest_vertex(point)
            .map_or(0, |(vertex, _)| vertex)
    }
}

impl std::fmt::Debug for MeshModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshModel")
            .field("vertex_count", &self.vertex_count())
            .field("face_count", &self.face_count())
            .finish_non_exhaustive()
    }
}

impl TryFrom<Mesh> for MeshModel {
    type Error = AnalysisError;

    fn try_from(mesh: Mesh) -> AnalysisResult<Self> {
        Self::new(mesh)
    }
}

fn validate_indices(mesh: &Mesh) -> AnalysisResult<()> {
    if mesh.vertices.is_empty() || mesh.faces.is_empty() {
        return Err(AnalysisError::EmptyMesh {
            details: format!(
                "{} vertices, {} faces",
                mesh.vertex_count(),
                mesh.face_count()
            ),
        });
    }

    let vertex_count = mesh.vertex_count();
    if let Some((face, index)) = mesh.faces.iter().enumerate().find_map(|(f, tri)| {
        tri.iter()
            .find(|&&i| i as usize >= vertex_count)
            .map(|&i| (f, i))
    }) {
        return Err(AnalysisError::ParseError {
            origin: "mesh arrays".to_string(),
            details: format!(
                "face {} references vertex {} but mesh has {} vertices",
                face, index, vertex_count
            ),
        });
    }

    if let Some(i) = mesh
        .vertices
        .iter()
        .position(|v| !v.position.coords.iter().all(|c| c.is_finite()))
    {
        return Err(AnalysisError::ParseError {
            origin: "mesh arrays".to_string(),
            details: format!("vertex {} has a non-finite coordinate", i),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tetrahedron() -> MeshModel {
        MeshModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
        .expect("valid tetrahedron")
    }

    #[test]
    fn test_rejects_empty_mesh() {
        let err = MeshModel::new(Mesh::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyMesh { .. }));

        let err = MeshModel::from_arrays(&[[0.0, 0.0, 0.0]], &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyMesh { .. }));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = MeshModel::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 3]],
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError { .. }));
        assert!(err.to_string().contains("vertex 3"));
    }

    #[test]
    fn test_rejects_non_finite_coordinates() {
        let err = MeshModel::from_arrays(
            &[[0.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::ParseError { .. }));
    }

    #[test]
    fn test_outward_face_normals() {
        let model = tetrahedron();
        let bottom = model.face_normal(0).expect("non-degenerate");
        assert_relative_eq!(bottom.into_inner(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);

        let slanted = model.face_normal(3).expect("non-degenerate");
        let expected = Vector3::new(1.0, 1.0, 1.0).normalize();
        assert_relative_eq!(slanted.into_inner(), expected, epsilon = 1e-12);

        // Every normal points away from the centroid.
        let c = model.centroid();
        for face in 0..4u32 {
            let n = model.face_normal(face).expect("non-degenerate");
            let tri = model.triangle(face).expect("in range");
            assert!(n.dot(&(tri.centroid() - c)) > 0.0, "face {} points inward", face);
        }
    }

    #[test]
    fn test_degenerate_face_normal_is_reported() {
        let model = MeshModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            &[[0, 1, 2], [0, 1, 3]],
        )
        .expect("indices valid");

        let err = model.face_normal(0).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateFace { face: 0 }));
        assert!(model.face_normal(1).is_ok());
        assert!(matches!(
            model.face_normal(2),
            Err(AnalysisError::FaceOutOfRange { face: 2, face_count: 2 })
        ));
    }

    #[test]
    fn test_face_adjacency() {
        let model = tetrahedron();
        assert_eq!(model.face_adjacency(0).expect("in range"), vec![1, 2, 3]);
        assert_eq!(model.face_adjacency_pairs().len(), 6);
        assert!(model.face_adjacency(4).is_err());
    }

    #[test]
    fn test_centroid_and_bounds() {
        let model = tetrahedron();
        assert_relative_eq!(model.centroid(), Point3::new(0.25, 0.25, 0.25), epsilon = 1e-12);
        let (min, max) = model.bounds();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_caches_are_stable() {
        let model = tetrahedron();
        let g1 = model.vertex_graph() as *const VertexGraph;
        let g2 = model.vertex_graph() as *const VertexGraph;
        assert_eq!(g1, g2);
        assert_eq!(model.vertex_graph().edge_count(), 6);
        assert_eq!(model.nearest_vertex(&Point3::new(0.9, 0.1, 0.0)), 1);
    }

    #[test]
    fn test_counts_round_trip() {
        let model = tetrahedron();
        assert_eq!(model.vertex_count(), 4);
        assert_eq!(model.face_count(), 4);
        let mesh = model.into_mesh();
        assert_eq!(mesh.faces[3], [1, 2, 3]);
    }
}
