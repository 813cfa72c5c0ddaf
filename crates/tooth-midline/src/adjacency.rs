//! Face and edge topology queries.

use hashbrown::HashMap;

/// Incidence tables for a triangle list: vertex to faces, edge to faces and
/// face to edge-sharing faces. Every stored face list is ascending.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    /// Indexed by vertex id.
    vertex_to_faces: Vec<Vec<u32>>,

    /// Keyed by `(low, high)` vertex ids.
    edge_to_faces: HashMap<(u32, u32), Vec<u32>>,

    /// Indexed by face id; excludes the face itself.
    face_neighbors: Vec<Vec<u32>>,
}

impl MeshAdjacency {
    /// Index `faces`. Every corner must be below `vertex_count`.
    ///
    /// Collapsed edges (both ends the same vertex) are not recorded.
    pub fn build(vertex_count: usize, faces: &[[u32; 3]]) -> Self {
        let mut vertex_to_faces: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        let mut edge_to_faces: HashMap<(u32, u32), Vec<u32>> = HashMap::new();

        for (fid, face) in faces.iter().enumerate() {
            let fid = fid as u32;

            for &v in face {
                let incident = &mut vertex_to_faces[v as usize];
                if incident.last() != Some(&fid) {
                    incident.push(fid);
                }
            }

            for (a, b) in face_edges(face) {
                if a == b {
                    continue;
                }
                let shared = edge_to_faces.entry(canonical(a, b)).or_default();
                if shared.last() != Some(&fid) {
                    shared.push(fid);
                }
            }
        }

        let face_neighbors = faces
            .iter()
            .enumerate()
            .map(|(fid, face)| {
                let fid = fid as u32;
                let mut ring: Vec<u32> = face_edges(face)
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .filter_map(|(a, b)| edge_to_faces.get(&canonical(a, b)))
                    .flatten()
                    .copied()
                    .filter(|&other| other != fid)
                    .collect();
                ring.sort_unstable();
                ring.dedup();
                ring
            })
            .collect();

        Self {
            vertex_to_faces,
            edge_to_faces,
            face_neighbors,
        }
    }

    /// Edges owned by a single face.
    pub fn boundary_edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, owners)| owners.len() == 1)
            .map(|(&edge, _)| edge)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.boundary_edges().count()
    }

    /// Edges shared by three or more faces.
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|owners| owners.len() > 2)
            .count()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// No edge is shared by more than two faces.
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|owners| owners.len() <= 2)
    }

    /// Every edge has a face on both sides.
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|owners| owners.len() >= 2)
    }

    /// Faces using a vertex, ascending. Empty for unreferenced or unknown vertices.
    pub fn faces_for_vertex(&self, vertex: u32) -> &[u32] {
        self.vertex_to_faces
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// One-ring of a face: faces sharing at least one edge with it, ascending.
    pub fn face_neighbors(&self, fid: u32) -> &[u32] {
        self.face_neighbors
            .get(fid as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Every unordered pair of faces sharing an edge, as `(a, b)` with `a < b`, sorted.
    pub fn face_pairs(&self) -> Vec<(u32, u32)> {
        let mut pairs: Vec<(u32, u32)> = self
            .face_neighbors
            .iter()
            .enumerate()
            .flat_map(|(a, ring)| {
                let a = a as u32;
                ring.iter().filter(move |&&b| a < b).map(move |&b| (a, b))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

#[inline]
fn canonical(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

#[inline]
fn face_edges(&[v0, v1, v2]: &[u32; 3]) -> [(u32, u32); 3] {
    [(v0, v1), (v1, v2), (v2, v0)]
}
