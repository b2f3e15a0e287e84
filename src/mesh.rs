//! `VolumeMesh`: a loaded volumetric mesh with its face connectivity.
//!
//! Loading runs the whole pipeline in one blocking pass: read (optional),
//! classify cell blocks, then build face connectivity. Any failure aborts the
//! load; nothing partially built is returned.
//!
//! # Example
//! ```rust
//! # fn try_main() -> Result<(), neatmesh::mesh_error::MeshError> {
//! use neatmesh::io::{CellBlock, RawMesh};
//! use neatmesh::mesh::VolumeMesh;
//!
//! let points = vec![
//!     [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0],
//!     [0.0, 0.0, 1.0], [1.0, 1.0, 1.0],
//! ];
//! let tets = CellBlock::from_rows("tetra", &[[0i64, 1, 2, 3], [1, 2, 3, 4]])?;
//! let mesh = VolumeMesh::from_raw(RawMesh::new(points, vec![tets]))?;
//!
//! assert_eq!(mesh.n_cells(), 2);
//! assert_eq!(mesh.faces().len(), 7);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

use crate::algs::connectivity::{ConnectivityOptions, FaceConnectivity, build_connectivity};
use crate::algs::ingest::{VolumeBlock, classify_blocks};
use crate::io::{MeshFormat, RawMesh, read_mesh};
use crate::mesh_error::MeshError;
use crate::topology::face::{Face, FaceKey};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for loading a mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Reject accepted cells whose point indices fall outside the point array.
    pub check_point_indices: bool,
    /// Options forwarded to the connectivity builder.
    pub connectivity: ConnectivityOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            check_point_indices: true,
            connectivity: ConnectivityOptions::default(),
        }
    }
}

/// Points, accepted volumetric cell blocks and face connectivity.
#[derive(Debug, Clone)]
pub struct VolumeMesh {
    points: Vec<[f64; 3]>,
    cell_blocks: Vec<VolumeBlock>,
    n_cells: usize,
    connectivity: FaceConnectivity,
}

impl VolumeMesh {
    /// Read and process the mesh file at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        Self::open_with_options(path, &LoadOptions::default())
    }

    /// Read and process the mesh file at `path`.
    ///
    /// Reader failures surface as [`MeshError::InvalidMesh`] carrying the
    /// reader's message.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let raw = read_mesh(path).map_err(|err| {
            let reader = MeshFormat::from_path(path).map_or("mesh", MeshFormat::name);
            MeshError::InvalidMesh(format!(
                "Could not read mesh file ({reader} reader error).\n{err}"
            ))
        })?;
        let mesh = Self::from_raw_with_options(raw, options)?;
        log::info!(
            "loaded {}: {} points, {} cells, {} faces",
            path.display(),
            mesh.n_points(),
            mesh.n_cells(),
            mesh.connectivity.n_faces()
        );
        Ok(mesh)
    }

    /// Process already-decoded mesh data with default options.
    pub fn from_raw(raw: RawMesh) -> Result<Self, MeshError> {
        Self::from_raw_with_options(raw, &LoadOptions::default())
    }

    /// Process already-decoded mesh data.
    pub fn from_raw_with_options(raw: RawMesh, options: &LoadOptions) -> Result<Self, MeshError> {
        let RawMesh {
            points,
            cell_blocks,
        } = raw;
        let n_points = options.check_point_indices.then_some(points.len());
        let accepted = classify_blocks(cell_blocks, n_points)?;
        let connectivity = build_connectivity(&accepted.blocks, &options.connectivity)?;
        Ok(Self {
            points,
            cell_blocks: accepted.blocks,
            n_cells: accepted.n_cells,
            connectivity,
        })
    }

    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Accepted volumetric blocks, in input order.
    pub fn cell_blocks(&self) -> &[VolumeBlock] {
        &self.cell_blocks
    }

    /// Total number of accepted volumetric cells.
    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    pub fn faces(&self) -> &[Face] {
        self.connectivity.faces()
    }

    pub fn face_to_faceid(&self) -> &HashMap<FaceKey, usize> {
        self.connectivity.face_to_faceid()
    }

    pub fn faceid_to_cellid(&self) -> &[[i64; 2]] {
        self.connectivity.faceid_to_cellid()
    }

    pub fn connectivity(&self) -> &FaceConnectivity {
        &self.connectivity
    }

    /// Vertex rows of every accepted cell, in cell id order.
    pub fn cells(&self) -> impl Iterator<Item = &[i64]> + '_ {
        self.cell_blocks.iter().flat_map(VolumeBlock::cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CellBlock;

    fn cube_points() -> Vec<[f64; 3]> {
        let mut pts = Vec::new();
        for z in [0.0, 1.0] {
            pts.extend([[0.0, 0.0, z], [1.0, 0.0, z], [1.0, 1.0, z], [0.0, 1.0, z]]);
        }
        pts
    }

    #[test]
    fn counts_and_pass_through() {
        let hex = CellBlock::from_rows("hexahedron", &[[0i64, 1, 2, 3, 4, 5, 6, 7]]).unwrap();
        let quad = CellBlock::from_rows("quad", &[[0i64, 1, 2, 3]]).unwrap();
        let mesh = VolumeMesh::from_raw(RawMesh::new(cube_points(), vec![quad, hex])).unwrap();
        assert_eq!(mesh.n_points(), 8);
        assert_eq!(mesh.n_cells(), 1);
        assert_eq!(mesh.cell_blocks().len(), 1);
        assert_eq!(mesh.faces().len(), 6);
        assert_eq!(mesh.cells().count(), 1);
    }

    #[test]
    fn index_check_can_be_disabled() {
        let tet = CellBlock::from_rows("tetra", &[[0i64, 1, 2, 30]]).unwrap();
        let raw = RawMesh::new(cube_points(), vec![tet]);
        assert!(matches!(
            VolumeMesh::from_raw(raw.clone()),
            Err(MeshError::InvalidMesh(_))
        ));
        let lenient = LoadOptions {
            check_point_indices: false,
            ..Default::default()
        };
        assert_eq!(
            VolumeMesh::from_raw_with_options(raw, &lenient)
                .unwrap()
                .faces()
                .len(),
            4
        );
    }

    #[test]
    fn missing_file_is_invalid_mesh() {
        let err = VolumeMesh::open("/nonexistent/dir/mesh.msh").unwrap_err();
        match err {
            MeshError::InvalidMesh(msg) => assert!(msg.starts_with("Could not read mesh file")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
