//! MeshError: unified error type for neatmesh public APIs
//!
//! Every fallible operation in the crate (reading, ingestion, connectivity
//! construction) reports through this type. Loading is fail-fast: no partially
//! built mesh is ever returned alongside an error.

use thiserror::Error;

/// Unified error type for neatmesh operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The mesh could not be read, or contains nothing volumetric.
    #[error("{0}")]
    InvalidMesh(String),
    /// A cell block's type is neither a recognized 1D, 2D nor 3D element.
    #[error("neatmesh does not support element type: {0}")]
    NonSupportedElement(String),
    /// A mesh reader could not decode its input.
    #[error("Mesh I/O parse error: {0}")]
    MeshIoParse(String),
    /// Underlying I/O failure while reading a mesh.
    #[error("I/O error: {0}")]
    Io(String),
    /// A face identity was met by a third cell while non-manifold faces are rejected.
    #[error(
        "non-manifold face {face_id}: already shared by cells {owner} and {neighbor}, met again by cell {cell}"
    )]
    NonManifoldFace {
        face_id: usize,
        owner: usize,
        neighbor: usize,
        cell: usize,
    },
    /// Connectivity construction was cancelled through a [`CancelToken`](crate::algs::connectivity::CancelToken).
    #[error("connectivity build cancelled after {cells_processed} cells")]
    Cancelled { cells_processed: usize },
    /// An internal consistency check failed.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        MeshError::Io(err.to_string())
    }
}

impl MeshError {
    /// True for errors produced by a mesh reader (as opposed to ingestion).
    pub fn is_read_error(&self) -> bool {
        matches!(self, MeshError::MeshIoParse(_) | MeshError::Io(_))
    }
}
