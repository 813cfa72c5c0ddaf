//! CLI command implementations.

pub mod axis;
pub mod info;
pub mod pick;

use std::path::Path;

use anyhow::{Context, Result};
use tooth_midline::{AnalysisConfig, AnalysisSession, Axis};

/// Load a mesh into a session, with the path in any error.
fn open_session(mesh: &Path, config: AnalysisConfig) -> Result<AnalysisSession> {
    AnalysisSession::open(mesh, config)
        .with_context(|| format!("Failed to load mesh from {}", mesh.display()))
}

/// Extract the configured axis, naming the mode on failure.
fn extract(session: &mut AnalysisSession) -> Result<Axis> {
    let mode = session.config().axis_mode;
    session
        .extract_axis()
        .cloned()
        .with_context(|| format!("Failed to extract {} axis", mode))
}
