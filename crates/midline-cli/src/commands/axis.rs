//! `midline axis`: extract and print the midline.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tooth_midline::{Axis, AxisMode, ComponentPolicy};

use crate::output;
use crate::GlobalOpts;

#[derive(Args, Debug)]
pub struct AxisArgs {
    /// Mesh file (.obj or .stl)
    pub mesh: PathBuf,

    /// Extraction strategy: pca or skeleton (overrides config)
    #[arg(short, long)]
    pub mode: Option<AxisMode>,

    /// Disconnected meshes in skeleton mode: reject or source-component
    #[arg(long)]
    pub component_policy: Option<ComponentPolicy>,

    /// Include every path point in the output
    #[arg(long)]
    pub full_path: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AxisOutput {
    mode: Option<AxisMode>,
    start: [f64; 3],
    end: [f64; 3],
    direction: [f64; 3],
    length: f64,
    path_length: f64,
    path_point_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    path_vertices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<[f64; 3]>>,
}

impl AxisOutput {
    pub(crate) fn new(axis: &Axis, full_path: bool) -> Self {
        Self {
            mode: axis.mode(),
            start: output::point(&axis.start()),
            end: output::point(&axis.end()),
            direction: output::vector(&axis.direction()),
            length: axis.length(),
            path_length: axis.path_length(),
            path_point_count: axis.path().len(),
            path_vertices: if full_path {
                axis.path_vertices().to_vec()
            } else {
                Vec::new()
            },
            path: full_path.then(|| axis.path().iter().map(output::point).collect()),
        }
    }
}

pub fn run(args: AxisArgs, opts: &GlobalOpts) -> Result<()> {
    let mut config = opts.config.clone();
    if let Some(mode) = args.mode {
        config.axis_mode = mode;
    }
    if let Some(policy) = args.component_policy {
        config.component_policy = policy;
    }

    let mut session = super::open_session(&args.mesh, config)?;
    let axis = super::extract(&mut session)?;

    output::print(&AxisOutput::new(&axis, args.full_path), opts.format, opts.quiet);

    output::success(
        &format!(
            "Extracted {} axis",
            axis.mode().unwrap_or(session.config().axis_mode)
        ),
        opts.format,
        opts.quiet,
    );
    output::info(
        &format!(
            "  Start: {}\n  End: {}\n  Length: {:.3}",
            output::fmt_point(&axis.start()),
            output::fmt_point(&axis.end()),
            axis.length()
        ),
        opts.format,
        opts.quiet,
    );
    if axis.path().len() > 2 {
        output::info(
            &format!(
                "  Path: {} vertices, {:.3} long",
                axis.path().len(),
                axis.path_length()
            ),
            opts.format,
            opts.quiet,
        );
    }
    if args.full_path {
        for (i, p) in axis.path().iter().enumerate() {
            output::info(&format!("    {:>4}: {}", i, output::fmt_point(p)), opts.format, opts.quiet);
        }
    }

    Ok(())
}
