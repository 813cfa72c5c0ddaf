//! Mesh loading for OBJ and STL inputs.
//!
//! Loading never welds vertices and never drops faces: what the file indexes
//! is what the model sees. Faces with more than three corners are rejected
//! rather than triangulated.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{AnalysisError, AnalysisResult};
use crate::{Mesh, Vertex};

/// Input formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Pick a format from the extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("obj") {
            Some(MeshFormat::Obj)
        } else if ext.eq_ignore_ascii_case("stl") {
            Some(MeshFormat::Stl)
        } else {
            None
        }
    }
}

/// Read an `.obj` or `.stl` file into a raw [`Mesh`].
pub fn load_mesh(path: &Path) -> AnalysisResult<Mesh> {
    let Some(format) = MeshFormat::from_path(path) else {
        return Err(AnalysisError::UnsupportedFormat {
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned()),
        });
    };
    info!(path = %path.display(), ?format, "reading mesh");

    let mut reader = File::open(path)
        .map(BufReader::new)
        .map_err(|source| AnalysisError::IoRead {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    let mesh = match format {
        MeshFormat::Obj => read_obj(&mut reader, &origin)?,
        MeshFormat::Stl => read_stl(&mut reader, &origin)?,
    };
    log_extent(&mesh);
    Ok(mesh)
}

fn log_extent(mesh: &Mesh) {
    let Some((lo, hi)) = mesh.bounds() else {
        return;
    };
    let size = hi - lo;
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "mesh read"
    );
    debug!(
        "extent [{:.3} {:.3} {:.3}]..[{:.3} {:.3} {:.3}]",
        lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
    );
    // Tooth scans are millimeter scale; a sub-0.1 extent usually means meters.
    if size.max() < 0.1 {
        warn!("largest mesh extent is only {:.6}, check the file units", size.max());
    }
}

/// Parse Wavefront OBJ text into a mesh.
///
/// Vertex ids follow the file's `v` lines exactly, whether or not a face uses
/// them, and `o`/`g` groups all index the same vertex list. Face ids follow
/// the `f` lines in file order. `origin` names the source in error messages.
pub fn read_obj<R: BufRead>(reader: &mut R, origin: &str) -> AnalysisResult<Mesh> {
    let parse_error = |details: String| AnalysisError::ParseError {
        origin: origin.to_string(),
        details,
    };

    let data = obj::ObjData::load_buf(reader).map_err(|e| parse_error(e.to_string()))?;

    let vertex_count = data.position.len();
    let mut mesh = Mesh {
        vertices: data
            .position
            .iter()
            .map(|&[x, y, z]| Vertex::from_coords(x.into(), y.into(), z.into()))
            .collect(),
        faces: Vec::new(),
    };

    for group in data.objects.iter().flat_map(|object| &object.groups) {
        debug!("OBJ group '{}': {} faces", group.name, group.polys.len());

        for poly in &group.polys {
            let corners = &poly.0;
            if corners.len() != 3 {
                return Err(parse_error(format!(
                    "face {} in group '{}' has {} vertices, only triangles are supported",
                    mesh.faces.len(),
                    group.name,
                    corners.len()
                )));
            }

            let mut face = [0u32; 3];
            for (slot, corner) in face.iter_mut().zip(corners) {
                let index = corner.0;
                if index >= vertex_count {
                    return Err(parse_error(format!(
                        "face {} references vertex {} but the file defines {}",
                        mesh.faces.len() + 1,
                        index + 1,
                        vertex_count
                    )));
                }
                *slot = index as u32;
            }
            mesh.faces.push(face);
        }
    }

    if mesh.is_empty() {
        return Err(AnalysisError::EmptyMesh {
            details: format!("{} contains no triangles", origin),
        });
    }

    debug!(
        "OBJ loaded: {} vertices, {} faces",
        mesh.vertex_count(),
        mesh.face_count()
    );

    Ok(mesh)
}

/// Parse binary or ASCII STL into a mesh.
///
/// STL stores unindexed triangles; shared corners are indexed by `stl_io`.
pub fn read_stl<R: Read + Seek>(reader: &mut R, origin: &str) -> AnalysisResult<Mesh> {
    let stl = stl_io::read_stl(reader).map_err(|e| AnalysisError::ParseError {
        origin: origin.to_string(),
        details: e.to_string(),
    })?;

    debug!(
        "{}: {} indexed STL corners over {} facets",
        origin,
        stl.vertices.len(),
        stl.faces.len()
    );

    let mesh = Mesh {
        vertices: stl
            .vertices
            .iter()
            .map(|v| Vertex::from_coords(v.0[0].into(), v.0[1].into(), v.0[2].into()))
            .collect(),
        faces: stl
            .faces
            .iter()
            .map(|f| f.vertices.map(|i| i as u32))
            .collect(),
    };

    if mesh.is_empty() {
        return Err(AnalysisError::EmptyMesh {
            details: format!("{} contains no triangles", origin),
        });
    }

    Ok(mesh)
}
