//! `midline info`: mesh structure report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tooth_midline::{MeshModel, MeshReport};

use crate::output;
use crate::GlobalOpts;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Mesh file (.obj or .stl)
    pub mesh: PathBuf,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    path: String,
    vertex_count: usize,
    face_count: usize,
    edge_count: usize,
    bounds_min: [f64; 3],
    bounds_max: [f64; 3],
    dimensions: [f64; 3],
    boundary_edges: usize,
    non_manifold_edges: usize,
    degenerate_faces: usize,
    components: usize,
    is_watertight: bool,
    is_manifold: bool,
    is_connected: bool,
}

impl InfoOutput {
    fn new(path: &Path, report: &MeshReport) -> Self {
        let (dx, dy, dz) = report.dimensions;
        Self {
            path: path.display().to_string(),
            vertex_count: report.vertex_count,
            face_count: report.face_count,
            edge_count: report.edge_count,
            bounds_min: output::point(&report.bounds.0),
            bounds_max: output::point(&report.bounds.1),
            dimensions: [dx, dy, dz],
            boundary_edges: report.boundary_edge_count,
            non_manifold_edges: report.non_manifold_edge_count,
            degenerate_faces: report.degenerate_face_count,
            components: report.component_count,
            is_watertight: report.is_watertight(),
            is_manifold: report.is_manifold(),
            is_connected: report.is_connected(),
        }
    }
}

pub fn run(args: InfoArgs, opts: &GlobalOpts) -> Result<()> {
    let model = MeshModel::load_path(&args.mesh)
        .with_context(|| format!("Failed to load mesh from {}", args.mesh.display()))?;
    let report = tooth_midline::validate_mesh(&model);

    output::print(&InfoOutput::new(&args.mesh, &report), opts.format, opts.quiet);
    output::info(&report.to_string(), opts.format, opts.quiet);

    if !report.supports_skeleton() {
        output::warning(
            "Mesh is disconnected; skeleton mode needs --component-policy source-component",
            opts.format,
            opts.quiet,
        );
    }
    if report.degenerate_face_count > 0 {
        output::warning(
            &format!(
                "{} zero-area faces cannot be measured",
                report.degenerate_face_count
            ),
            opts.format,
            opts.quiet,
        );
    }

    Ok(())
}
