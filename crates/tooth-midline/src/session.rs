//! One mesh, its current axis, and the picks made against them.

use std::io::BufRead;
use std::path::Path;

use nalgebra::{Unit, Vector3};
use tracing::info;

use crate::angle::{angle_between, AngleConvention};
use crate::axis::{extract_axis, Axis, AxisMode};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::selection::{PickTarget, Selection, SelectionResolver};
use crate::validate::{validate_mesh, MeshReport};
use crate::MeshModel;

/// A picked face measured against the current axis.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceAnalysis {
    pub selection: Selection,
    /// Outward unit normal of the selected face.
    pub normal: Unit<Vector3<f64>>,
    /// Angle between normal and axis direction, degrees in `[0, 180]`.
    pub normal_to_axis: f64,
    /// Angle between face plane and axis line, degrees in `[0, 90]`.
    pub plane_to_axis: f64,
    /// Convention used by [`FaceAnalysis::angle`].
    pub convention: AngleConvention,
}

impl FaceAnalysis {
    /// The angle in the session's configured convention.
    pub fn angle(&self) -> f64 {
        match self.convention {
            AngleConvention::NormalToAxis => self.normal_to_axis,
            AngleConvention::PlaneToAxis => self.plane_to_axis,
        }
    }
}

/// Analysis state for a single mesh.
///
/// The axis is an explicit piece of state: angles can only be computed after
/// [`extract_axis`](Self::extract_axis) has succeeded, and swapping the mesh
/// discards it.
#[derive(Debug)]
pub struct AnalysisSession {
    model: MeshModel,
    config: AnalysisConfig,
    axis: Option<Axis>,
}

impl AnalysisSession {
    pub fn new(model: MeshModel, config: AnalysisConfig) -> AnalysisResult<Self> {
        config.validate()?;
        Ok(Self {
            model,
            config,
            axis: None,
        })
    }

    /// Load a mesh file (OBJ or STL) into a new session.
    pub fn open(path: impl AsRef<Path>, config: AnalysisConfig) -> AnalysisResult<Self> {
        Self::new(MeshModel::load_path(path)?, config)
    }

    /// Parse an OBJ buffer into a new session.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R, config: AnalysisConfig) -> AnalysisResult<Self> {
        Self::new(MeshModel::load(reader)?, config)
    }

    pub fn model(&self) -> &MeshModel {
        &self.model
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current axis, if one has been extracted for this mesh.
    pub fn axis(&self) -> Option<&Axis> {
        self.axis.as_ref()
    }

    /// Swap in a new mesh. The old axis no longer applies and is dropped.
    pub fn replace_mesh(&mut self, model: MeshModel) -> MeshModel {
        self.axis = None;
        info!(
            "Replaced mesh: now {} vertices, {} faces",
            model.vertex_count(),
            model.face_count()
        );
        std::mem::replace(&mut self.model, model)
    }

    /// Extract the axis with the configured mode.
    pub fn extract_axis(&mut self) -> AnalysisResult<&Axis> {
        self.extract_axis_with(self.config.axis_mode)
    }

    /// Extract the axis with an explicit mode.
    ///
    /// On failure the previously extracted axis, if any, is kept.
    pub fn extract_axis_with(&mut self, mode: AxisMode) -> AnalysisResult<&Axis> {
        let axis = extract_axis(&self.model, mode, self.config.component_policy)?;
        Ok(&*self.axis.insert(axis))
    }

    /// Resolve a pick to a face and its one-ring.
    pub fn select(&self, target: PickTarget) -> AnalysisResult<Selection> {
        SelectionResolver::with_scale(&self.model, self.config.highlight_scale)?.resolve(target)
    }

    /// Resolve a pick and measure its face against the current axis.
    pub fn analyze(&self, target: PickTarget) -> AnalysisResult<FaceAnalysis> {
        let axis = self.axis.as_ref().ok_or(AnalysisError::AxisNotExtracted)?;
        let selection = self.select(target)?;
        let normal = self.model.face_normal(selection.face)?;

        let normal_to_axis = angle_between(&normal, axis);
        let plane_to_axis = AngleConvention::PlaneToAxis.apply(normal_to_axis);

        info!(
            "Face {}: {:.2}° normal-to-axis, {:.2}° plane-to-axis",
            selection.face, normal_to_axis, plane_to_axis
        );

        Ok(FaceAnalysis {
            selection,
            normal,
            normal_to_axis,
            plane_to_axis,
            convention: self.config.angle_convention,
        })
    }

    /// Structural health report for the current mesh.
    pub fn report(&self) -> MeshReport {
        validate_mesh(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use std::io::Cursor;

    /// Closed 1 x 1 x 4 box, faces wound outward.
    const TALL_BOX_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 4
v 1 0 4
v 1 1 4
v 0 1 4
f 1 3 2
f 1 4 3
f 5 6 7
f 5 7 8
f 1 2 6
f 1 6 5
f 2 3 7
f 2 7 6
f 3 4 8
f 3 8 7
f 4 1 5
f 4 5 8
";

    fn session() -> AnalysisSession {
        AnalysisSession::from_obj_reader(&mut Cursor::new(TALL_BOX_OBJ), AnalysisConfig::default())
            .expect("valid box")
    }

    #[test]
    fn test_analyze_requires_axis() {
        let session = session();
        assert!(session.axis().is_none());
        assert!(matches!(
            session.analyze(PickTarget::Face(0)),
            Err(AnalysisError::AxisNotExtracted)
        ));
        // Selection alone does not need an axis.
        assert!(session.select(PickTarget::Face(0)).is_ok());
    }

    #[test]
    fn test_side_and_cap_angles() {
        let mut session = session();
        let axis = session.extract_axis().expect("pca axis");
        assert_relative_eq!(axis.direction().into_inner(), Vector3::z(), epsilon = 1e-9);

        // Face 0 is on the bottom cap, normal -Z.
        let bottom = session.analyze(PickTarget::Face(0)).expect("analysis");
        assert_relative_eq!(bottom.normal_to_axis, 180.0, epsilon = 1e-6);
        assert_relative_eq!(bottom.plane_to_axis, 90.0, epsilon = 1e-6);
        assert_relative_eq!(bottom.angle(), bottom.normal_to_axis);

        // Face 4 is on the y = 0 side wall.
        let side = session.analyze(PickTarget::Face(4)).expect("analysis");
        assert_relative_eq!(side.normal_to_axis, 90.0, epsilon = 1e-6);
        assert_relative_eq!(side.plane_to_axis, 0.0, epsilon = 1e-6);
        assert_eq!(side.selection.neighbors.len(), 3);
    }

    #[test]
    fn test_point_pick_analysis() {
        let mut session = session();
        session.extract_axis().expect("pca axis");
        let result = session
            .analyze(PickTarget::Point(Point3::new(0.5, 0.5, 4.2)))
            .expect("analysis");
        // Top cap faces point along +Z.
        assert!(result.selection.face == 2 || result.selection.face == 3);
        assert_relative_eq!(result.normal_to_axis, 0.0, epsilon = 1e-6);
        assert!(result.selection.picked_vertex.is_some());
    }

    #[test]
    fn test_replace_mesh_drops_axis() {
        let mut session = session();
        session.extract_axis().expect("pca axis");
        assert!(session.axis().is_some());

        let triangle = MeshModel::from_arrays(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            &[[0, 1, 2]],
        )
        .expect("valid triangle");
        let old = session.replace_mesh(triangle);
        assert_eq!(old.face_count(), 12);
        assert!(session.axis().is_none());
        assert_eq!(session.model().face_count(), 1);

        // Skeleton fails on a lone triangle; nothing is stored.
        assert!(session.extract_axis_with(AxisMode::Skeleton).is_err());
        assert!(session.axis().is_none());
        assert!(session.extract_axis_with(AxisMode::Pca).is_ok());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig {
            highlight_scale: 0.0,
            ..Default::default()
        };
        let err = AnalysisSession::from_obj_reader(&mut Cursor::new(TALL_BOX_OBJ), config)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig { .. }));
    }

    #[test]
    fn test_report() {
        let report = session().report();
        assert!(report.is_watertight());
        assert!(report.is_connected());
        assert_eq!(report.face_count, 12);
    }
}
