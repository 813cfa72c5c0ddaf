//! Angle between a face normal and the midline axis.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::axis::Axis;

/// How the face/axis angle is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AngleConvention {
    /// Angle between the normal and the axis direction, in `[0, 180]`.
    #[default]
    NormalToAxis,
    /// Angle between the face plane and the axis line, in `[0, 90]`.
    PlaneToAxis,
}

impl AngleConvention {
    /// Express a normal-to-axis angle in this convention.
    pub fn apply(self, degrees: f64) -> f64 {
        match self {
            AngleConvention::NormalToAxis => degrees,
            AngleConvention::PlaneToAxis => (90.0 - degrees).abs(),
        }
    }
}

impl fmt::Display for AngleConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AngleConvention::NormalToAxis => "normal-to-axis",
            AngleConvention::PlaneToAxis => "plane-to-axis",
        })
    }
}

impl FromStr for AngleConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "normal-to-axis" | "normal" => Ok(AngleConvention::NormalToAxis),
            "plane-to-axis" | "plane" => Ok(AngleConvention::PlaneToAxis),
            other => Err(format!(
                "unknown angle convention '{}', expected 'normal-to-axis' or 'plane-to-axis'",
                other
            )),
        }
    }
}

/// Angle in degrees between a unit normal and the axis direction, in `[0, 180]`.
///
/// The dot product is clamped before `acos` so rounding never produces NaN.
pub fn angle_between(normal: &Unit<Vector3<f64>>, axis: &Axis) -> f64 {
    let cos = normal.dot(&axis.direction().into_inner()).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// [`angle_between`] reported in the given convention.
pub fn angle(normal: &Unit<Vector3<f64>>, axis: &Axis, convention: AngleConvention) -> f64 {
    convention.apply(angle_between(normal, axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn z_axis() -> Axis {
        Axis::new(Point3::origin(), Point3::new(0.0, 0.0, 1.0)).expect("valid axis")
    }

    #[test]
    fn test_known_angles() {
        let axis = z_axis();
        assert_relative_eq!(angle_between(&Vector3::z_axis(), &axis), 0.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between(&Vector3::x_axis(), &axis), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle_between(&-Vector3::z_axis(), &axis), 180.0, epsilon = 1e-9);

        let diagonal = Unit::new_normalize(Vector3::new(1.0, 0.0, 1.0));
        assert_relative_eq!(angle_between(&diagonal, &axis), 45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_axis_is_supplementary() {
        let axis = Axis::new(Point3::new(1.0, -2.0, 0.5), Point3::new(3.0, 4.0, -1.0))
            .expect("valid axis");
        let normal = Unit::new_normalize(Vector3::new(0.3, -0.7, 0.2));

        let forward = angle_between(&normal, &axis);
        let backward = angle_between(&normal, &axis.reversed());
        assert_relative_eq!(forward + backward, 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scaling_endpoints_keeps_angle() {
        let axis = Axis::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 2.0))
            .expect("valid axis");
        let longer = Axis::new(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 10.0, 10.0))
            .expect("valid axis");
        let normal = Unit::new_normalize(Vector3::new(-1.0, 0.5, 2.0));

        assert_relative_eq!(
            angle_between(&normal, &axis),
            angle_between(&normal, &longer),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_parallel_unit_vectors_do_not_nan() {
        // Nearly-unit inputs can push the dot product just past 1.
        let axis = Axis::new(Point3::origin(), Point3::new(1e-3, 1e-3, 1e-3)).expect("valid axis");
        let normal = Unit::new_normalize(Vector3::new(1.0, 1.0, 1.0));
        let theta = angle_between(&normal, &axis);
        assert!(theta.is_finite());
        assert!(theta < 1e-5);
    }

    #[test]
    fn test_plane_convention() {
        let axis = z_axis();
        let side = Vector3::x_axis();
        assert_relative_eq!(angle(&side, &axis, AngleConvention::PlaneToAxis), 0.0, epsilon = 1e-9);
        assert_relative_eq!(angle(&Vector3::z_axis(), &axis, AngleConvention::PlaneToAxis), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle(&-Vector3::z_axis(), &axis, AngleConvention::PlaneToAxis), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle(&side, &axis, AngleConvention::NormalToAxis), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_convention_parsing() {
        assert_eq!(
            "plane_to_axis".parse::<AngleConvention>(),
            Ok(AngleConvention::PlaneToAxis)
        );
        assert_eq!(
            AngleConvention::NormalToAxis.to_string().parse::<AngleConvention>(),
            Ok(AngleConvention::NormalToAxis)
        );
        assert!("tilt".parse::<AngleConvention>().is_err());
    }
}
