//! Midline axis and face-angle analysis for tooth scan meshes.
//!
//! This crate loads a triangle mesh, extracts a midline axis through it and
//! measures how individual faces are oriented relative to that axis:
//!
//! - **Loading**: OBJ and STL, indices preserved, non-triangles rejected
//! - **Axis extraction**: straight PCA axis or curved graph skeleton
//! - **Selection**: pick a face by id or by a point in space, with its one-ring
//! - **Angles**: face normal against axis direction, in degrees
//!
//! # Example
//!
//! ```no_run
//! use tooth_midline::{AnalysisConfig, AnalysisSession, PickTarget};
//!
//! let mut session = AnalysisSession::open("molar.obj", AnalysisConfig::default())?;
//! session.extract_axis()?;
//!
//! let result = session.analyze(PickTarget::Face(42))?;
//! println!("face 42 is at {:.1}° to the midline", result.angle());
//! # Ok::<(), tooth_midline::AnalysisError>(())
//! ```

mod error;
mod types;

pub mod adjacency;
pub mod angle;
pub mod axis;
pub mod config;
pub mod graph;
pub mod io;
pub mod model;
pub mod selection;
pub mod session;
pub mod spatial;
pub mod validate;

// Re-export core types at crate root
pub use error::{AnalysisError, AnalysisResult};
pub use types::{Mesh, Triangle, Vertex};

pub use adjacency::MeshAdjacency;
pub use angle::{angle, angle_between, AngleConvention};
pub use axis::{extract_axis, Axis, AxisMode, ComponentPolicy};
pub use config::AnalysisConfig;
pub use graph::{ShortestPaths, VertexGraph};
pub use io::{load_mesh, MeshFormat};
pub use model::MeshModel;
pub use selection::{ExpandedFace, PickTarget, Selection, SelectionResolver};
pub use session::{AnalysisSession, FaceAnalysis};
pub use spatial::SpatialIndex;
pub use validate::{validate_mesh, MeshReport};
