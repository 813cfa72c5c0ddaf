//! `midline pick`: select a face and measure it against the midline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use nalgebra::Point3;
use serde::Serialize;

use tooth_midline::{AngleConvention, AxisMode, FaceAnalysis, PickTarget};

use super::axis::AxisOutput;
use crate::output;
use crate::GlobalOpts;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["face", "point"])))]
pub struct PickArgs {
    /// Mesh file (.obj or .stl)
    pub mesh: PathBuf,

    /// Face index to select
    #[arg(long)]
    pub face: Option<u32>,

    /// Point to select the nearest face to, as "x,y,z"
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub point: Option<Point3<f64>>,

    /// Axis extraction strategy: pca or skeleton (overrides config)
    #[arg(short, long)]
    pub mode: Option<AxisMode>,

    /// Highlight triangle scale factor (overrides config)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Reported angle: normal-to-axis or plane-to-axis (overrides config)
    #[arg(long)]
    pub convention: Option<AngleConvention>,
}

#[derive(Debug, Serialize)]
struct PickOutput {
    face: u32,
    picked_vertex: Option<u32>,
    neighbors: Vec<u32>,
    normal: [f64; 3],
    convention: AngleConvention,
    angle_deg: f64,
    normal_to_axis_deg: f64,
    plane_to_axis_deg: f64,
    highlight: [[f64; 3]; 3],
    highlight_scale: f64,
    axis: AxisOutput,
}

impl PickOutput {
    fn new(result: &FaceAnalysis, axis: AxisOutput) -> Self {
        let highlight = &result.selection.highlight;
        Self {
            face: result.selection.face,
            picked_vertex: result.selection.picked_vertex,
            neighbors: result.selection.neighbors.clone(),
            normal: output::vector(&result.normal),
            convention: result.convention,
            angle_deg: result.angle(),
            normal_to_axis_deg: result.normal_to_axis,
            plane_to_axis_deg: result.plane_to_axis,
            highlight: highlight.vertices.map(|p| output::point(&p)),
            highlight_scale: highlight.scale,
            axis,
        }
    }
}

/// Parse "x,y,z" into a point.
fn parse_point(s: &str) -> Result<Point3<f64>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "point must have exactly 3 coordinates as x,y,z, got '{}'",
            s
        ));
    }

    let mut coords = [0.0; 3];
    for (coord, (part, name)) in coords.iter_mut().zip(parts.iter().zip(["x", "y", "z"])) {
        *coord = part
            .trim()
            .parse()
            .map_err(|e| format!("invalid {} coordinate '{}': {}", name, part.trim(), e))?;
    }
    Ok(Point3::from(coords))
}

pub fn run(args: PickArgs, opts: &GlobalOpts) -> Result<()> {
    let mut config = opts.config.clone();
    if let Some(mode) = args.mode {
        config.axis_mode = mode;
    }
    if let Some(scale) = args.scale {
        config.highlight_scale = scale;
    }
    if let Some(convention) = args.convention {
        config.angle_convention = convention;
    }

    let target = match (args.face, args.point) {
        (Some(face), _) => PickTarget::Face(face),
        (None, Some(point)) => PickTarget::Point(point),
        (None, None) => anyhow::bail!("Either --face or --point must be given"),
    };

    let mut session = super::open_session(&args.mesh, config)?;
    let axis = super::extract(&mut session)?;
    let result = session
        .analyze(target)
        .with_context(|| format!("Failed to analyze pick {:?}", target))?;

    output::print(
        &PickOutput::new(&result, AxisOutput::new(&axis, false)),
        opts.format,
        opts.quiet,
    );

    let selection = &result.selection;
    output::success(
        &format!(
            "Face {}: {:.2}° ({})",
            selection.face,
            result.angle(),
            result.convention
        ),
        opts.format,
        opts.quiet,
    );
    if let Some(vertex) = selection.picked_vertex {
        output::info(&format!("  Nearest vertex: {}", vertex), opts.format, opts.quiet);
    }
    output::info(
        &format!(
            "  Normal: {}\n  Normal to axis: {:.2}°\n  Plane to axis: {:.2}°\n  Neighbors: {:?}",
            output::fmt_point(&Point3::from(result.normal.into_inner())),
            result.normal_to_axis,
            result.plane_to_axis,
            selection.neighbors
        ),
        opts.format,
        opts.quiet,
    );
    if selection.neighbors.is_empty() {
        output::warning(
            "Selected face shares no edge with any other face",
            opts.format,
            opts.quiet,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1,2,3"), Ok(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(
            parse_point(" -0.5, 2e1 ,3 "),
            Ok(Point3::new(-0.5, 20.0, 3.0))
        );
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("1,two,3").unwrap_err().contains("y coordinate"));
    }
}
