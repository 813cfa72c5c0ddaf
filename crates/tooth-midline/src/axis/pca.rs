//! Straight axis from principal component analysis of vertex positions.

use std::cmp::Ordering;

use nalgebra::{Matrix3, Point3, SymmetricEigen, Unit, Vector3};
use tracing::debug;

use super::{Axis, AxisMode};
use crate::error::{AnalysisError, AnalysisResult};
use crate::MeshModel;

/// Eigenvalues closer than this fraction of the largest one count as equal.
const EIGEN_TIE_TOLERANCE: f64 = 1e-9;

/// Principal axes of a vertex cloud.
#[derive(Debug, Clone)]
pub struct PrincipalAxes {
    /// Mean vertex position.
    pub centroid: Point3<f64>,
    /// Unit eigenvectors, ordered by descending eigenvalue.
    pub axes: [Unit<Vector3<f64>>; 3],
    /// Covariance eigenvalues in descending order.
    pub eigenvalues: [f64; 3],
}

impl PrincipalAxes {
    /// Direction of greatest spread.
    pub fn primary(&self) -> Unit<Vector3<f64>> {
        self.axes[0]
    }
}

/// Eigen-decompose the vertex covariance.
///
/// Every eigenvector is sign-canonicalized so its largest-magnitude component
/// is positive. When several eigenvalues tie for the maximum, the
/// lexicographically greatest canonical vector is taken as primary, which
/// makes the result independent of the solver's ordering.
pub fn principal_axes(model: &MeshModel) -> AnalysisResult<PrincipalAxes> {
    let centroid = model.centroid();
    let n = model.vertex_count() as f64;

    let mut covariance = Matrix3::<f64>::zeros();
    for v in model.vertices() {
        let d = v.position - centroid;
        covariance += d * d.transpose();
    }
    covariance /= n;

    let eigen = SymmetricEigen::new(covariance);
    let mut pairs: Vec<(f64, Vector3<f64>)> = (0..3)
        .map(|i| {
            let column: Vector3<f64> = eigen.eigenvectors.column(i).into_owned();
            (eigen.eigenvalues[i], canonical_sign(column))
        })
        .collect();

    let largest = pairs
        .iter()
        .map(|(value, _)| *value)
        .fold(f64::NEG_INFINITY, f64::max);
    if largest.is_nan() || largest <= 0.0 {
        return Err(AnalysisError::DegenerateMesh {
            details: "all vertices coincide, no direction of spread".to_string(),
        });
    }

    pairs.sort_by(|a, b| b.0.total_cmp(&a.0));

    let tolerance = EIGEN_TIE_TOLERANCE * largest;
    let primary = pairs
        .iter()
        .enumerate()
        .take_while(|(_, (value, _))| largest - value <= tolerance)
        .max_by(|(_, a), (_, b)| lexicographic(&a.1, &b.1))
        .map_or(0, |(i, _)| i);
    let chosen = pairs.remove(primary);
    pairs.insert(0, chosen);

    debug!(
        "PCA eigenvalues: [{:.6}, {:.6}, {:.6}]",
        pairs[0].0, pairs[1].0, pairs[2].0
    );

    Ok(PrincipalAxes {
        centroid,
        axes: [
            Unit::new_normalize(pairs[0].1),
            Unit::new_normalize(pairs[1].1),
            Unit::new_normalize(pairs[2].1),
        ],
        eigenvalues: [pairs[0].0, pairs[1].0, pairs[2].0],
    })
}

/// Straight axis along the primary component, spanning the vertex extent.
///
/// Endpoints are `centroid ∓ half_len·direction`, where `half_len` is half
/// the spread of vertex projections onto the direction. The segment is
/// centred on the centroid even when the projections are not.
pub fn pca_axis(model: &MeshModel) -> AnalysisResult<Axis> {
    let principal = principal_axes(model)?;
    let direction = principal.primary().into_inner();

    let (min, max) = model
        .vertices()
        .iter()
        .map(|v| (v.position - principal.centroid).dot(&direction))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
    let half_len = (max - min) / 2.0;

    if !half_len.is_finite() || half_len <= 0.0 {
        return Err(AnalysisError::DegenerateMesh {
            details: "vertices have no extent along the principal direction".to_string(),
        });
    }

    let offset = direction * half_len;
    let mut axis = Axis::new(principal.centroid - offset, principal.centroid + offset)?;
    axis.mode = Some(AxisMode::Pca);

    debug!(
        "PCA axis through ({:.3}, {:.3}, {:.3}), half length {:.3}",
        principal.centroid.x, principal.centroid.y, principal.centroid.z, half_len
    );

    Ok(axis)
}

/// Flip `v` so its largest-magnitude component is positive.
/// Ties between components go to the lowest index.
fn canonical_sign(v: Vector3<f64>) -> Vector3<f64> {
    let mut dominant = 0;
    for i in 1..3 {
        if v[i].abs() > v[dominant].abs() {
            dominant = i;
        }
    }
    if v[dominant] < 0.0 {
        -v
    } else {
        v
    }
}

fn lexicographic(a: &Vector3<f64>, b: &Vector3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then_with(|| a.y.total_cmp(&b.y))
        .then_with(|| a.z.total_cmp(&b.z))
}
