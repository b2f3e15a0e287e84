//! Face deduplication and owner/neighbor assignment.
//!
//! Cells are visited in block order, then row order; each visit assigns the
//! next dense cell id. For every face a cell produces, the face's
//! [`FaceKey`] is looked up in the registry:
//!
//! * unseen: the face gets the next dense face id, is stored in the
//!   orientation of the current cell, and is recorded as `[cell, -1]`;
//! * seen: the neighbor slot of its record is overwritten with the current cell.
//!
//! A face therefore moves through *unseen → boundary → interior* and never
//! back. Under manifold input every face ends with one or two cells. A third
//! encounter is handled according to [`NonManifoldHandling`]; by default the
//! neighbor slot is silently overwritten, so the last cell wins.
//!
//! # Example
//! ```rust
//! use neatmesh::algs::connectivity::{ConnectivityBuilder, ConnectivityOptions};
//! use neatmesh::topology::cell_type::VolumeType;
//!
//! let mut builder = ConnectivityBuilder::new(ConnectivityOptions::default());
//! builder.add_cell(VolumeType::Tetra, &[0, 1, 2, 3])?;
//! builder.add_cell(VolumeType::Tetra, &[1, 2, 3, 4])?;
//! let conn = builder.finish();
//!
//! assert_eq!(conn.n_faces(), 7);
//! assert_eq!(conn.n_interior_faces(), 1);
//! let shared = conn.face_id(&[3, 2, 1]).unwrap();
//! assert_eq!(conn.faceid_to_cellid()[shared], [0, 1]);
//! # Ok::<(), neatmesh::mesh_error::MeshError>(())
//! ```

use crate::algs::faces::{CellFaces, faces_of};
use crate::algs::ingest::VolumeBlock;
use crate::debug_invariants::{DebugInvariants, ensure};
use crate::mesh_error::MeshError;
use crate::topology::cell_type::VolumeType;
use crate::topology::face::{Face, FaceKey};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Neighbor value of a face touched by a single cell.
pub const BOUNDARY: i64 = -1;

/// How often (in cells) the cancellation flag is polled.
const CANCEL_CHECK_INTERVAL: usize = 1024;

/// Behavior when a face is met by a third cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonManifoldHandling {
    /// Overwrite the neighbor slot without notice.
    #[default]
    Ignore,
    /// Overwrite the neighbor slot and log a warning.
    Warn,
    /// Abort with [`MeshError::NonManifoldFace`].
    Error,
}

/// Cooperative cancellation flag shared with the thread driving a build.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for connectivity construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityOptions {
    /// What to do when a face is met by more than two cells.
    pub non_manifold: NonManifoldHandling,
    /// Optional cancellation flag, polled every 1024 cells and at block start.
    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

/// Face list, identity index and owner/neighbor records for a mesh.
///
/// Built once by [`ConnectivityBuilder`] and read-only afterwards. Face ids
/// index both [`faces`](Self::faces) and
/// [`faceid_to_cellid`](Self::faceid_to_cellid).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceConnectivity {
    faces: Vec<Face>,
    face_to_faceid: HashMap<FaceKey, usize>,
    faceid_to_cellid: Vec<[i64; 2]>,
    n_cells: usize,
    non_manifold_faces: Vec<usize>,
}

/// Face counts of a [`FaceConnectivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySummary {
    pub n_cells: usize,
    pub n_faces: usize,
    pub n_boundary_faces: usize,
    pub n_interior_faces: usize,
    pub n_triangular_faces: usize,
    pub n_quad_faces: usize,
    pub n_non_manifold_faces: usize,
}

impl FaceConnectivity {
    /// Faces indexed by face id, in the orientation of their owner cell.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, face_id: usize) -> Option<&Face> {
        self.faces.get(face_id)
    }

    /// Face identity → face id.
    pub fn face_to_faceid(&self) -> &HashMap<FaceKey, usize> {
        &self.face_to_faceid
    }

    /// `[owner, neighbor]` per face id; neighbor is [`BOUNDARY`] for boundary faces.
    pub fn faceid_to_cellid(&self) -> &[[i64; 2]] {
        &self.faceid_to_cellid
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of cells visited while building.
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn owner(&self, face_id: usize) -> Option<usize> {
        self.faceid_to_cellid.get(face_id).map(|r| r[0] as usize)
    }

    /// Neighbor cell of a face; `None` for boundary faces or unknown ids.
    pub fn neighbor(&self, face_id: usize) -> Option<usize> {
        self.faceid_to_cellid
            .get(face_id)
            .and_then(|r| (r[1] != BOUNDARY).then_some(r[1] as usize))
    }

    pub fn is_boundary(&self, face_id: usize) -> bool {
        self.faceid_to_cellid
            .get(face_id)
            .is_some_and(|r| r[1] == BOUNDARY)
    }

    /// Ids of faces touched by exactly one cell, ascending.
    pub fn boundary_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.faceid_to_cellid
            .iter()
            .enumerate()
            .filter(|(_, r)| r[1] == BOUNDARY)
            .map(|(id, _)| id)
    }

    /// Ids of faces shared by two cells, ascending.
    pub fn interior_faces(&self) -> impl Iterator<Item = usize> + '_ {
        self.faceid_to_cellid
            .iter()
            .enumerate()
            .filter(|(_, r)| r[1] != BOUNDARY)
            .map(|(id, _)| id)
    }

    pub fn n_boundary_faces(&self) -> usize {
        self.boundary_faces().count()
    }

    pub fn n_interior_faces(&self) -> usize {
        self.n_faces() - self.n_boundary_faces()
    }

    /// Face id for any arrangement of a face's point indices.
    pub fn face_id(&self, points: &[i64]) -> Option<usize> {
        let key = FaceKey::from_points(points)?;
        self.face_to_faceid.get(&key).copied()
    }

    /// Faces as one flat `[p0, p1, p2, p3, ...]` slice, four slots per face.
    pub fn faces_flat(&self) -> &[i64] {
        bytemuck::cast_slice(&self.faces)
    }

    /// Records as one flat `[owner, neighbor, ...]` slice.
    pub fn cells_flat(&self) -> &[i64] {
        bytemuck::cast_slice(&self.faceid_to_cellid)
    }

    /// Faces whose neighbor slot was overwritten by a third cell, in the
    /// order the overwrites happened. Repeated overwrites repeat the id.
    pub fn non_manifold_faces(&self) -> &[usize] {
        &self.non_manifold_faces
    }

    pub fn summary(&self) -> ConnectivitySummary {
        let n_boundary_faces = self.n_boundary_faces();
        let n_triangular_faces = self.faces.iter().filter(|f| f.is_triangle()).count();
        ConnectivitySummary {
            n_cells: self.n_cells,
            n_faces: self.n_faces(),
            n_boundary_faces,
            n_interior_faces: self.n_faces() - n_boundary_faces,
            n_triangular_faces,
            n_quad_faces: self.faces.iter().filter(|f| f.is_quad()).count(),
            n_non_manifold_faces: self.non_manifold_faces.len(),
        }
    }
}

impl DebugInvariants for FaceConnectivity {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "FaceConnectivity");
    }

    fn validate_invariants(&self) -> Result<(), MeshError> {
        let n = self.faces.len();
        ensure(self.faceid_to_cellid.len() == n, || {
            format!(
                "{} connectivity records for {n} faces",
                self.faceid_to_cellid.len()
            )
        })?;
        ensure(self.face_to_faceid.len() == n, || {
            format!("{} face identities for {n} faces", self.face_to_faceid.len())
        })?;
        for (id, face) in self.faces.iter().enumerate() {
            let mapped = self.face_to_faceid.get(&face.key()).copied();
            ensure(mapped == Some(id), || {
                format!("face {id} {face:?} maps back to {mapped:?}")
            })?;
            let [owner, neighbor] = self.faceid_to_cellid[id];
            ensure(owner >= 0 && (owner as usize) < self.n_cells, || {
                format!("face {id} owner {owner} out of range 0..{}", self.n_cells)
            })?;
            ensure(
                neighbor == BOUNDARY || (neighbor >= 0 && (neighbor as usize) < self.n_cells),
                || format!("face {id} neighbor {neighbor} out of range"),
            )?;
        }
        Ok(())
    }
}

/// Single-pass builder for [`FaceConnectivity`].
#[derive(Debug, Default)]
pub struct ConnectivityBuilder {
    conn: FaceConnectivity,
    options: ConnectivityOptions,
    #[cfg(test)]
    cancel_after: Option<usize>,
}

impl ConnectivityBuilder {
    pub fn new(options: ConnectivityOptions) -> Self {
        Self {
            conn: FaceConnectivity::default(),
            options,
            #[cfg(test)]
            cancel_after: None,
        }
    }

    /// Pre-size the face registry for roughly `n_cells` cells.
    pub fn with_capacity(n_cells: usize, options: ConnectivityOptions) -> Self {
        // a hex-dominant mesh has about three distinct faces per cell
        let faces = n_cells.saturating_mul(3);
        let mut builder = Self::new(options);
        builder.conn.faces.reserve(faces);
        builder.conn.faceid_to_cellid.reserve(faces);
        builder.conn.face_to_faceid.reserve(faces);
        builder
    }

    /// Id the next added cell will receive.
    pub fn next_cell_id(&self) -> usize {
        self.conn.n_cells
    }

    /// Register every face of one cell and return the cell's id.
    ///
    /// On error the builder is left exactly as it was before the call.
    pub fn add_cell(&mut self, volume_type: VolumeType, cell: &[i64]) -> Result<usize, MeshError> {
        if cell.len() < volume_type.corner_count() {
            return Err(MeshError::InvalidMesh(format!(
                "{volume_type} cell has {} nodes, needs at least {}",
                cell.len(),
                volume_type.corner_count()
            )));
        }
        let cell_id = self.conn.n_cells;
        let faces = faces_of(volume_type, cell);
        if self.options.non_manifold == NonManifoldHandling::Error {
            self.screen_non_manifold(&faces, cell_id)?;
        }
        for face in &faces {
            self.register_face(*face, cell_id);
        }
        self.conn.n_cells += 1;
        #[cfg(test)]
        if self.cancel_after == Some(self.conn.n_cells) {
            if let Some(token) = &self.options.cancel {
                token.cancel();
            }
        }
        Ok(cell_id)
    }

    /// Add every cell of an accepted block, in row order.
    pub fn add_block(&mut self, block: &VolumeBlock) -> Result<(), MeshError> {
        self.check_cancelled()?;
        let volume_type = block.volume_type();
        for (row, cell) in block.cells().enumerate() {
            if row > 0 && row % CANCEL_CHECK_INTERVAL == 0 {
                self.check_cancelled()?;
            }
            self.add_cell(volume_type, cell)?;
        }
        Ok(())
    }

    pub fn finish(self) -> FaceConnectivity {
        let conn = self.conn;
        conn.debug_assert_invariants();
        conn
    }

    /// Reject the cell if any of its faces would reach a third cell.
    fn screen_non_manifold(&self, faces: &CellFaces, cell_id: usize) -> Result<(), MeshError> {
        for (i, face) in faces.iter().enumerate() {
            let key = face.key();
            // a degenerate cell may list the same face twice
            let repeats = faces[..i].iter().filter(|f| f.key() == key).count();
            let (face_id, seen) = match self.conn.face_to_faceid.get(&key) {
                Some(&id) => {
                    let [_, neighbor] = self.conn.faceid_to_cellid[id];
                    (id, if neighbor == BOUNDARY { 1 } else { 2 })
                }
                None => (self.conn.faces.len(), 0),
            };
            if seen + repeats >= 2 {
                let [owner, neighbor] = self
                    .conn
                    .faceid_to_cellid
                    .get(face_id)
                    .copied()
                    .unwrap_or([cell_id as i64; 2]);
                let neighbor = if neighbor == BOUNDARY { cell_id as i64 } else { neighbor };
                return Err(MeshError::NonManifoldFace {
                    face_id,
                    owner: owner as usize,
                    neighbor: neighbor as usize,
                    cell: cell_id,
                });
            }
        }
        Ok(())
    }

    fn register_face(&mut self, face: Face, cell_id: usize) {
        let conn = &mut self.conn;
        let next_id = conn.faces.len();
        let face_id = *conn.face_to_faceid.entry(face.key()).or_insert(next_id);
        if face_id == next_id {
            conn.faces.push(face);
            conn.faceid_to_cellid.push([cell_id as i64, BOUNDARY]);
            return;
        }

        let record = &mut conn.faceid_to_cellid[face_id];
        if record[1] != BOUNDARY {
            let (owner, neighbor) = (record[0], record[1]);
            // Error mode never gets here: the cell was screened first
            if self.options.non_manifold == NonManifoldHandling::Warn {
                log::warn!(
                    "face {face_id} shared by cells {owner} and {neighbor} is met again by cell {cell_id}; keeping {cell_id} as neighbor"
                );
            }
            conn.non_manifold_faces.push(face_id);
        }
        record[1] = cell_id as i64;
    }

    fn check_cancelled(&self) -> Result<(), MeshError> {
        match &self.options.cancel {
            Some(token) if token.is_cancelled() => Err(MeshError::Cancelled {
                cells_processed: self.conn.n_cells,
            }),
            _ => Ok(()),
        }
    }
}

/// Build connectivity for accepted blocks in one pass.
pub fn build_connectivity(
    blocks: &[VolumeBlock],
    options: &ConnectivityOptions,
) -> Result<FaceConnectivity, MeshError> {
    let n_cells = blocks.iter().map(VolumeBlock::len).sum();
    let mut builder = ConnectivityBuilder::with_capacity(n_cells, options.clone());
    for block in blocks {
        builder.add_block(block)?;
    }
    let conn = builder.finish();
    log::debug!(
        "connectivity: {} cells, {} faces ({} boundary)",
        conn.n_cells(),
        conn.n_faces(),
        conn.n_boundary_faces()
    );
    Ok(conn)
}
