#![cfg_attr(docsrs, feature(doc_cfg))]
//! # neatmesh
//!
//! neatmesh derives the face-level topology of volumetric meshes: the set of
//! distinct faces implied by the cells and, for every face, its owner cell and
//! its neighbor cell (or boundary). This is the connectivity that per-face and
//! per-cell-pair quality metrics (orthogonality, skewness, aspect ratio) are
//! computed on.
//!
//! ## Pipeline
//! 1. [`io`] decodes Gmsh (`.msh` v2.2) or legacy VTK files into points and
//!    typed cell blocks.
//! 2. [`algs::ingest`] canonicalizes element type names, keeps the volumetric
//!    blocks (hexahedron, tetra, wedge, pyramid), skips 1D/2D blocks and rejects
//!    anything else.
//! 3. [`algs::faces`] maps each cell to its reference faces.
//! 4. [`algs::connectivity`] deduplicates faces by their vertex set and records
//!    owner/neighbor cell ids.
//!
//! [`mesh::VolumeMesh`] runs the whole pipeline.
//!
//! ## Determinism
//!
//! Cell ids follow block order then row order; face ids follow first encounter.
//! The same input always yields identical face lists, indices and records.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! neatmesh = "0.3"
//! ```
//!
//! ```rust,no_run
//! use neatmesh::prelude::*;
//!
//! # fn main() -> Result<(), MeshError> {
//! let mesh = VolumeMesh::open("cavity.msh")?;
//! for face_id in mesh.connectivity().interior_faces() {
//!     let [owner, neighbor] = mesh.faceid_to_cellid()[face_id];
//!     println!("face {face_id}: {owner} -> {neighbor}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod io;
pub mod mesh;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::connectivity::{
        BOUNDARY, CancelToken, ConnectivityBuilder, ConnectivityOptions, ConnectivitySummary,
        FaceConnectivity, NonManifoldHandling, build_connectivity,
    };
    pub use crate::algs::faces::faces_of;
    pub use crate::algs::ingest::{AcceptedBlocks, VolumeBlock, classify_blocks};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{CellBlock, MeshReader, RawMesh, read_mesh};
    pub use crate::mesh::{LoadOptions, VolumeMesh};
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::cell_type::{CellType, VolumeType};
    pub use crate::topology::face::{Face, FaceKey, NO_POINT};
}
