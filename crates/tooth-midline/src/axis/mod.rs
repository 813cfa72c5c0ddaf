//! Midline axis extraction.
//!
//! Two interchangeable strategies produce an [`Axis`] from a [`MeshModel`]:
//!
//! - [`AxisMode::Pca`] fits a straight segment along the direction of
//!   greatest vertex spread. Fast and stable, but ignores curvature.
//! - [`AxisMode::Skeleton`] follows the approximate longest shortest-path
//!   through the vertex graph (double-sweep Dijkstra). The result is a
//!   polyline over mesh vertices; it is a heuristic, not the exact graph
//!   diameter.

mod pca;
mod skeleton;

pub use pca::{pca_axis, principal_axes, PrincipalAxes};
pub use skeleton::{skeleton_axis, SKELETON_SOURCE};

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Unit, Vector3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, AnalysisResult};
use crate::MeshModel;

/// Axis extraction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AxisMode {
    /// Straight segment along the principal component.
    #[default]
    Pca,
    /// Shortest path between the two ends of the approximate graph diameter.
    Skeleton,
}

impl fmt::Display for AxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AxisMode::Pca => "pca",
            AxisMode::Skeleton => "skeleton",
        })
    }
}

impl FromStr for AxisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pca" | "linear" => Ok(AxisMode::Pca),
            "skeleton" | "graph" => Ok(AxisMode::Skeleton),
            other => Err(format!(
                "unknown axis mode '{}', expected 'pca' or 'skeleton'",
                other
            )),
        }
    }
}

/// What skeleton extraction does when the vertex graph is disconnected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentPolicy {
    /// Fail with [`AnalysisError::DisconnectedMesh`].
    #[default]
    Reject,
    /// Use only the component containing the source vertex and log a warning.
    SourceComponent,
}

impl fmt::Display for ComponentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComponentPolicy::Reject => "reject",
            ComponentPolicy::SourceComponent => "source-component",
        })
    }
}

impl FromStr for ComponentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(ComponentPolicy::Reject),
            "source-component" | "source_component" => Ok(ComponentPolicy::SourceComponent),
            other => Err(format!(
                "unknown component policy '{}', expected 'reject' or 'source-component'",
                other
            )),
        }
    }
}

/// A directed midline from `start` to `end`.
///
/// `start` and `end` are always distinct. `path` is the full polyline the
/// axis was derived from: just the two endpoints for a straight axis, or the
/// vertex positions along the skeleton path (whose ids are in
/// `path_vertices`).
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    start: Point3<f64>,
    end: Point3<f64>,
    path: Vec<Point3<f64>>,
    path_vertices: Vec<u32>,
    mode: Option<AxisMode>,
}

impl Axis {
    /// Straight axis between two points.
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> AnalysisResult<Self> {
        if (end - start).norm_squared() <= f64::EPSILON * f64::EPSILON {
            return Err(AnalysisError::DegenerateAxis);
        }
        Ok(Self {
            start,
            end,
            path: vec![start, end],
            path_vertices: Vec::new(),
            mode: None,
        })
    }

    /// Axis following a vertex path; endpoints are the first and last vertices.
    pub(crate) fn from_vertex_path(model: &MeshModel, vertices: Vec<u32>) -> AnalysisResult<Self> {
        let path: Vec<Point3<f64>> = vertices
            .iter()
            .filter_map(|&v| model.position(v))
            .collect();
        let (Some(&start), Some(&end)) = (path.first(), path.last()) else {
            return Err(AnalysisError::DegenerateAxis);
        };
        let mut axis = Self::new(start, end)?;
        axis.path = path;
        axis.path_vertices = vertices;
        Ok(axis)
    }

    /// Strategy that produced the axis; `None` for hand-built axes.
    pub fn mode(&self) -> Option<AxisMode> {
        self.mode
    }

    /// Start point.
    pub fn start(&self) -> Point3<f64> {
        self.start
    }

    /// End point.
    pub fn end(&self) -> Point3<f64> {
        self.end
    }

    /// Midpoint of the two endpoints.
    pub fn midpoint(&self) -> Point3<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    /// Straight-line distance between the endpoints.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from `start` to `end`.
    pub fn direction(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.end - self.start)
    }

    /// Polyline the axis was derived from, `start` first and `end` last.
    pub fn path(&self) -> &[Point3<f64>] {
        &self.path
    }

    /// Mesh vertex ids along the path; empty for axes not built from vertices.
    pub fn path_vertices(&self) -> &[u32] {
        &self.path_vertices
    }

    /// Summed segment lengths of the path.
    pub fn path_length(&self) -> f64 {
        self.path.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// The same axis pointing the other way.
    pub fn reversed(&self) -> Self {
        let mut path = self.path.clone();
        path.reverse();
        let mut path_vertices = self.path_vertices.clone();
        path_vertices.reverse();
        Self {
            start: self.end,
            end: self.start,
            path,
            path_vertices,
            mode: self.mode,
        }
    }
}

/// Extract a midline axis from a mesh.
///
/// `policy` only affects [`AxisMode::Skeleton`].
pub fn extract_axis(
    model: &MeshModel,
    mode: AxisMode,
    policy: ComponentPolicy,
) -> AnalysisResult<Axis> {
    let axis = match mode {
        AxisMode::Pca => pca_axis(model)?,
        AxisMode::Skeleton => skeleton_axis(model, policy)?,
    };

    info!(
        "Extracted {} axis: length {:.3}, {} path points",
        mode,
        axis.length(),
        axis.path().len()
    );

    Ok(axis)
}
