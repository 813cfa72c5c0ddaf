//! Curved axis from the approximate diameter of the vertex graph.

use tracing::{debug, warn};

use super::{Axis, AxisMode, ComponentPolicy};
use crate::error::{AnalysisError, AnalysisResult};
use crate::MeshModel;

/// Vertex the first sweep starts from.
pub const SKELETON_SOURCE: u32 = 0;

/// Fewest vertices a skeleton path may visit.
const MIN_PATH_VERTICES: usize = 3;

/// Double-sweep diameter heuristic over the edge graph.
///
/// Dijkstra from [`SKELETON_SOURCE`] finds the farthest vertex `A`; a second
/// Dijkstra from `A` finds the farthest vertex `B`. The axis is the shortest
/// path `A → B`. Both endpoints are mesh vertices.
pub fn skeleton_axis(model: &MeshModel, policy: ComponentPolicy) -> AnalysisResult<Axis> {
    let graph = model.vertex_graph();

    let first = graph.shortest_paths(SKELETON_SOURCE);
    let unreachable = first.unreachable_count();
    if unreachable > 0 {
        let reachable = first.reachable_count();
        match policy {
            ComponentPolicy::Reject => {
                return Err(AnalysisError::DisconnectedMesh {
                    reachable,
                    unreachable,
                });
            }
            ComponentPolicy::SourceComponent => {
                warn!(
                    "Vertex graph is disconnected; ignoring {} of {} vertices outside the component of vertex {}",
                    unreachable,
                    graph.vertex_count(),
                    SKELETON_SOURCE
                );
            }
        }
    }

    let (a, _) = first.farthest().ok_or_else(|| AnalysisError::DegenerateMesh {
        details: format!("source vertex {} is not in the graph", SKELETON_SOURCE),
    })?;

    let second = graph.shortest_paths(a);
    let (b, diameter) = second.farthest().ok_or_else(|| AnalysisError::DegenerateMesh {
        details: format!("no vertex reachable from {}", second.source()),
    })?;

    debug!(
        "Double sweep: A = {} ({:.3} from {}), B = {} ({:.3} from A)",
        a,
        first.distance(a),
        first.source(),
        b,
        diameter
    );

    let path = second
        .path_to(b)
        .ok_or_else(|| AnalysisError::DegenerateMesh {
            details: format!("vertex {} unreachable from {}", b, second.source()),
        })?;

    if path.len() < MIN_PATH_VERTICES {
        return Err(AnalysisError::DegenerateMesh {
            details: format!(
                "longest shortest-path visits {} vertices, at least {} needed",
                path.len(),
                MIN_PATH_VERTICES
            ),
        });
    }

    let mut axis = Axis::from_vertex_path(model, path)?;
    axis.mode = Some(AxisMode::Skeleton);
    Ok(axis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Ribbon of `len` columns along X, two vertices per column.
    fn strip_positions_and_faces(len: u32) -> (Vec<[f64; 3]>, Vec<[u32; 3]>) {
        let mut positions = Vec::new();
        let mut faces = Vec::new();
        for i in 0..len {
            positions.push([f64::from(i), 0.0, 0.0]);
            positions.push([f64::from(i), 1.0, 0.0]);
        }
        for i in 0..len - 1 {
            let (a, b, c, d) = (2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3);
            faces.push([a, c, b]);
            faces.push([b, c, d]);
        }
        (positions, faces)
    }

    #[test]
    fn test_strip_spans_end_to_end() {
        let (positions, faces) = strip_positions_and_faces(5);
        let model = MeshModel::from_arrays(&positions, &faces).expect("valid strip");
        let axis = skeleton_axis(&model, ComponentPolicy::Reject).expect("skeleton");

        // Farthest from vertex 0 is the top-right corner; farthest from there is 0.
        assert_eq!(axis.path_vertices().first(), Some(&9));
        assert_eq!(axis.path_vertices().last(), Some(&0));
        assert_eq!(axis.mode(), Some(AxisMode::Skeleton));
        assert_relative_eq!(axis.path_length(), 5.0, epsilon = 1e-12);
        assert_eq!(axis.path().len(), axis.path_vertices().len());
    }

    #[test]
    fn test_endpoints_are_mesh_vertices() {
        let (positions, faces) = strip_positions_and_faces(7);
        let model = MeshModel::from_arrays(&positions, &faces).expect("valid strip");
        let axis = skeleton_axis(&model, ComponentPolicy::Reject).expect("skeleton");

        for endpoint in [axis.start(), axis.end()] {
            assert!(model.vertices().iter().any(|v| v.position == endpoint));
        }
        for pair in axis.path_vertices().windows(2) {
            assert!(model
                .vertex_graph()
                .neighbors(pair[0])
                .iter()
                .any(|&(n, _)| n == pair[1]));
        }
    }

    #[test]
    fn test_single_triangle_is_degenerate() {
        let model = MeshModel::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        )
        .expect("valid triangle");
        assert!(matches!(
            skeleton_axis(&model, ComponentPolicy::Reject),
            Err(AnalysisError::DegenerateMesh { .. })
        ));
    }

    #[test]
    fn test_disconnected_policy() {
        let (mut positions, mut faces) = strip_positions_and_faces(5);
        positions.extend([[50.0, 0.0, 0.0], [51.0, 0.0, 0.0], [50.0, 1.0, 0.0]]);
        faces.push([10, 11, 12]);
        let model = MeshModel::from_arrays(&positions, &faces).expect("valid mesh");

        match skeleton_axis(&model, ComponentPolicy::Reject) {
            Err(AnalysisError::DisconnectedMesh {
                reachable,
                unreachable,
            }) => {
                assert_eq!(reachable, 10);
                assert_eq!(unreachable, 3);
            }
            other => panic!("expected DisconnectedMesh, got {:?}", other),
        }

        let axis = skeleton_axis(&model, ComponentPolicy::SourceComponent)
            .expect("source component is a valid strip");
        assert!(axis.path_vertices().iter().all(|&v| v < 10));
    }

    #[test]
    fn test_repeatable() {
        let (positions, faces) = strip_positions_and_faces(6);
        let model = MeshModel::from_arrays(&positions, &faces).expect("valid strip");
        let a = skeleton_axis(&model, ComponentPolicy::Reject).expect("skeleton");
        let b = skeleton_axis(&model, ComponentPolicy::Reject).expect("skeleton");
        assert_eq!(a, b);
    }
}
