//! Nearest-vertex lookup.

use hashbrown::HashMap;
use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point3, Rotation3};

use crate::Mesh;

/// Relative slack on the squared distance when gathering tie candidates.
const TIE_TOLERANCE: f64 = 1e-9;

/// K-d tree over the distinct vertex positions of a mesh.
///
/// Built once per mesh and never modified; a replaced mesh gets a new index.
///
/// kiddo cannot split a bucket whose points all share the coordinate on the
/// split axis. Flat cut bases and stacked duplicates produce exactly that, so
/// coincident vertices share one tree entry and the tree stores positions in
/// a fixed oblique frame where planar patches no longer line up with an axis.
/// Distances are always measured on the original positions.
pub struct SpatialIndex {
    tree: KdTree<f64, 3>,
    frame: Rotation3<f64>,
    /// One entry per distinct position: the lowest vertex id found there.
    slots: Vec<(u32, Point3<f64>)>,
}

impl SpatialIndex {
    /// Build the index from all vertices of a mesh.
    pub fn build(mesh: &Mesh) -> Self {
        let frame = Rotation3::from_euler_angles(0.613_728, 0.958_271, 0.281_093);
        let mut tree: KdTree<f64, 3> = KdTree::new();
        let mut seen: HashMap<[u64; 3], usize> = HashMap::new();
        let mut slots = Vec::new();

        for (id, vertex) in mesh.vertices.iter().enumerate() {
            let p = vertex.position;
            // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
            let key = [p.x, p.y, p.z].map(|c| (c + 0.0).to_bits());
            seen.entry(key).or_insert_with(|| {
                let slot = slots.len();
                let oblique: [f64; 3] = (frame * p).coords.into();
                tree.add(&oblique, slot as u64);
                slots.push((id as u32, p));
                slot
            });
        }

        Self { tree, frame, slots }
    }

    /// True if no vertices are indexed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Vertex closest to `point`, with its squared distance.
    ///
    /// Vertices at the same distance resolve to the lowest id. The query
    /// point may lie anywhere, including far outside the mesh.
    pub fn nearest_vertex(&self, point: &Point3<f64>) -> Option<(u32, f64)> {
        if self.is_empty() {
            return None;
        }

        let query: [f64; 3] = (self.frame * point).coords.into();
        let nearest = self.tree.nearest_one::<SquaredEuclidean>(&query);
        let slack = TIE_TOLERANCE * (1.0 + nearest.distance + point.coords.norm_squared());

        self.tree
            .within::<SquaredEuclidean>(&query, nearest.distance + slack)
            .into_iter()
            .chain(std::iter::once(nearest))
            .map(|candidate| {
                let (id, position) = self.slots[candidate.item as usize];
                (id, (position - point).norm_squared())
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("distinct_positions", &self.slots.len())
            .finish_non_exhaustive()
    }
}
