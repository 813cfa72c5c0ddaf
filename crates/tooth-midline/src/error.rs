//! Error types for midline analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur while loading, measuring or querying a mesh.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Error reading from a file.
    #[error("failed to read mesh from {path}: {source}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed mesh input.
    #[error("failed to parse mesh from {origin}: {details}")]
    ParseError { origin: String, details: String },

    /// Unsupported file format.
    #[error("unsupported mesh format: {extension:?}")]
    UnsupportedFormat { extension: Option<String> },

    /// Empty mesh (no vertices or faces).
    #[error("mesh is empty: {details}")]
    EmptyMesh { details: String },

    /// The mesh cannot support the requested axis extraction.
    #[error("mesh is degenerate for axis extraction: {details}")]
    DegenerateMesh { details: String },

    /// Skeleton extraction on a vertex graph with more than one component.
    #[error(
        "mesh is disconnected: {unreachable} vertices unreachable from vertex 0 \
         ({reachable} reachable)"
    )]
    DisconnectedMesh { reachable: usize, unreachable: usize },

    /// Face index outside the face list.
    #[error("face {face} out of range (mesh has {face_count} faces)")]
    FaceOutOfRange { face: u32, face_count: usize },

    /// Vertex that no face references.
    #[error("vertex {vertex} is not used by any face")]
    NoIncidentFace { vertex: u32 },

    /// Zero-area triangle; its normal has no direction.
    #[error("face {face} is degenerate (zero area), normal is undefined")]
    DegenerateFace { face: u32 },

    /// Axis endpoints coincide.
    #[error("axis endpoints coincide, direction is undefined")]
    DegenerateAxis,

    /// An angle was requested before any axis was extracted.
    #[error("no midline axis has been extracted for this mesh")]
    AxisNotExtracted,

    /// Configuration values out of range.
    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// Configuration file could not be decoded.
    #[error("failed to parse configuration: {details}")]
    ConfigParse { details: String },
}
