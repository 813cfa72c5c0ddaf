//! Resolving user picks to faces and their neighborhoods.

use nalgebra::Point3;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};
use crate::MeshModel;

/// Default enlargement of the highlighted triangle.
pub const DEFAULT_HIGHLIGHT_SCALE: f64 = 20.0;

/// What the user picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickTarget {
    /// A face by index.
    Face(u32),
    /// An arbitrary point in space, usually on or near the surface.
    Point(Point3<f64>),
}

/// A face triangle scaled about its own centroid, for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpandedFace {
    pub vertices: [Point3<f64>; 3],
    pub scale: f64,
}

impl ExpandedFace {
    /// Centroid, which scaling leaves in place.
    pub fn centroid(&self) -> Point3<f64> {
        let [a, b, c] = self.vertices;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }
}

/// A resolved pick.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected face.
    pub face: u32,
    /// Faces sharing an edge with `face`, ascending. May be empty.
    pub neighbors: Vec<u32>,
    /// Enlarged copy of the face triangle.
    pub highlight: ExpandedFace,
    /// Nearest vertex, when the pick was a point.
    pub picked_vertex: Option<u32>,
}

/// Turns face ids and picked points into [`Selection`]s for one mesh.
#[derive(Debug, Clone, Copy)]
pub struct SelectionResolver<'a> {
    model: &'a MeshModel,
    highlight_scale: f64,
}

impl<'a> SelectionResolver<'a> {
    /// Resolver using [`DEFAULT_HIGHLIGHT_SCALE`].
    pub fn new(model: &'a MeshModel) -> Self {
        Self {
            model,
            highlight_scale: DEFAULT_HIGHLIGHT_SCALE,
        }
    }

    /// Resolver with a custom highlight scale; must be finite and positive.
    pub fn with_scale(model: &'a MeshModel, highlight_scale: f64) -> AnalysisResult<Self> {
        check_scale(highlight_scale)?;
        Ok(Self {
            model,
            highlight_scale,
        })
    }

    /// Highlight scale applied to selections.
    pub fn highlight_scale(&self) -> f64 {
        self.highlight_scale
    }

    /// Resolve either kind of pick.
    pub fn resolve(&self, target: PickTarget) -> AnalysisResult<Selection> {
        match target {
            PickTarget::Face(face) => self.resolve_by_face(face),
            PickTarget::Point(point) => self.resolve_by_point(&point),
        }
    }

    /// Select a face by index.
    pub fn resolve_by_face(&self, face: u32) -> AnalysisResult<Selection> {
        let neighbors = self.model.face_adjacency(face)?;
        let highlight = self.expanded_geometry(face, self.highlight_scale)?;

        debug!("Selected face {} with {} neighbors", face, neighbors.len());

        Ok(Selection {
            face,
            neighbors,
            highlight,
            picked_vertex: None,
        })
    }

    /// Select the face nearest a point.
    ///
    /// Finds the nearest vertex, then the incident face whose triangle lies
    /// closest to `point`. Equal distances go to the lowest face id.
    pub fn resolve_by_point(&self, point: &Point3<f64>) -> AnalysisResult<Selection> {
        let vertex = self.model.nearest_vertex(point);

        let mut best: Option<(u32, f64)> = None;
        for &face in self.model.faces_for_vertex(vertex) {
            let distance = self.model.triangle(face)?.distance_squared(point);
            // Faces arrive in ascending order, so strict `<` keeps the lowest id.
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((face, distance));
            }
        }
        let (face, _) = best.ok_or(AnalysisError::NoIncidentFace { vertex })?;

        debug!(
            "Point ({:.3}, {:.3}, {:.3}) resolved to vertex {}, face {}",
            point.x, point.y, point.z, vertex, face
        );

        let mut selection = self.resolve_by_face(face)?;
        selection.picked_vertex = Some(vertex);
        Ok(selection)
    }

    /// Face triangle scaled by `scale` about its centroid.
    pub fn expanded_geometry(&self, face: u32, scale: f64) -> AnalysisResult<ExpandedFace> {
        check_scale(scale)?;
        let tri = self.model.triangle(face)?.scaled_about_centroid(scale);
        Ok(ExpandedFace {
            vertices: [tri.v0, tri.v1, tri.v2],
            scale,
        })
    }
}

fn check_scale(scale: f64) -> AnalysisResult<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidConfig {
            details: format!("highlight scale must be finite and positive, got {}", scale),
        })
    }
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

    /// `n` triangles around a center vertex in the XY plane.
    fn fan(n: u32) -> MeshModel {
        let mut positions = vec![[0.0, 0.0, 0.0]];
        for i in 0..n {
            let t = std::f64::consts::TAU * f64::from(i) / f64::from(n);
            positions.push([t.cos(), t.sin(), 0.0]);
        }
        let faces: Vec<[u32; 3]> = (0..n).map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        MeshModel::from_arrays(&positions, &faces).expect("valid fan")
    }

    #[test]
    fn test_resolve_by_face() {
        let model = tetrahedron();
        let resolver = SelectionResolver::new(&model);
        let selection = resolver.resolve_by_face(2).expect("in range");

        assert_eq!(selection.face, 2);
        assert_eq!(selection.neighbors, vec![0, 1, 3]);
        assert_eq!(selection.picked_vertex, None);
        assert_relative_eq!(selection.highlight.scale, DEFAULT_HIGHLIGHT_SCALE);
    }

    #[test]
    fn test_face_out_of_range() {
        let model = tetrahedron();
        let resolver = SelectionResolver::new(&model);
        assert!(matches!(
            resolver.resolve_by_face(4),
            Err(AnalysisError::FaceOutOfRange { face: 4, face_count: 4 })
        ));
    }

    #[test]
    fn test_centroid_pick_resolves_to_face() {
        let model = fan(6);
        let resolver = SelectionResolver::new(&model);
        for face in 0..model.face_count() as u32 {
            let centroid = model.triangle(face).expect("in range").centroid();
            let selection = resolver.resolve_by_point(&centroid).expect("resolves");
            assert_eq!(selection.face, face);
            assert!(selection.picked_vertex.is_some());
        }
    }

    #[test]
    fn test_far_point_resolves() {
        let model = tetrahedron();
        let resolver = SelectionResolver::new(&model);
        let selection = resolver
            .resolve_by_point(&Point3::new(100.0, -40.0, 7.0))
            .expect("any point resolves");
        assert_eq!(selection.picked_vertex, Some(1));
        assert!(model.faces_for_vertex(1).contains(&selection.face));
    }

    #[test]
    fn test_isolated_vertex_has_no_face() {
        let model = MeshModel::from_arrays(
            &[
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [10.0, 10.0, 10.0],
            ],
            &[[0, 1, 2]],
        )
        .expect("valid mesh");
        let resolver = SelectionResolver::new(&model);
        assert!(matches!(
            resolver.resolve_by_point(&Point3::new(10.0, 10.0, 9.0)),
            Err(AnalysisError::NoIncidentFace { vertex: 3 })
        ));
    }

    #[test]
    fn test_expanded_geometry() {
        let model = MeshModel::from_arrays(
            &[[0.0, 0.0, 0.0], [3.0, 0.0, 0.0], [0.0, 3.0, 0.0]],
            &[[0, 1, 2]],
        )
        .expect("valid triangle");
        let resolver = SelectionResolver::new(&model);

        let expanded = resolver.expanded_geometry(0, 2.0).expect("valid scale");
        assert_relative_eq!(expanded.centroid(), Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(expanded.vertices[0], Point3::new(-1.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(expanded.vertices[1], Point3::new(5.0, -1.0, 0.0), epsilon = 1e-12);

        assert!(resolver.expanded_geometry(0, 0.0).is_err());
        assert!(resolver.expanded_geometry(0, f64::NAN).is_err());
        assert!(SelectionResolver::with_scale(&model, -1.0).is_err());
    }
}
