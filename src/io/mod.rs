//! Mesh readers producing raw points and typed cell blocks.
//!
//! Readers decode a file into a [`RawMesh`]: the point coordinates and the
//! ordered list of [`CellBlock`]s exactly as the file lists them. No element
//! filtering happens here; classification is the job of
//! [`crate::algs::ingest`].

pub mod gmsh;
pub mod vtk;

use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A homogeneous block of cells sharing one element type.
///
/// Connectivity is stored row-major: row `i` is
/// `data[i * nodes_per_cell..(i + 1) * nodes_per_cell]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBlock {
    cell_type: String,
    nodes_per_cell: usize,
    data: Vec<i64>,
}

impl CellBlock {
    /// Create a block from flat row-major connectivity.
    pub fn new(
        cell_type: impl Into<String>,
        nodes_per_cell: usize,
        data: Vec<i64>,
    ) -> Result<Self, MeshError> {
        let cell_type = cell_type.into();
        if nodes_per_cell == 0 {
            return Err(MeshError::InvalidMesh(format!(
                "cell block `{cell_type}` has zero nodes per cell"
            )));
        }
        if data.len() % nodes_per_cell != 0 {
            return Err(MeshError::InvalidMesh(format!(
                "cell block `{cell_type}`: {} indices is not a multiple of {nodes_per_cell} nodes per cell",
                data.len()
            )));
        }
        Ok(Self {
            cell_type,
            nodes_per_cell,
            data,
        })
    }

    /// Create a block from individual rows, which must all have the same width.
    pub fn from_rows<R: AsRef<[i64]>>(
        cell_type: impl Into<String>,
        rows: &[R],
    ) -> Result<Self, MeshError> {
        let cell_type = cell_type.into();
        let width = rows.first().map_or(1, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(width * rows.len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MeshError::InvalidMesh(format!(
                    "cell block `{cell_type}`: row {i} has {} nodes, expected {width}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Self::new(cell_type, width, data)
    }

    /// Raw element type name as given by the file.
    pub fn cell_type(&self) -> &str {
        &self.cell_type
    }

    pub fn nodes_per_cell(&self) -> usize {
        self.nodes_per_cell
    }

    /// Number of cells (rows).
    pub fn len(&self) -> usize {
        self.data.len() / self.nodes_per_cell
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major connectivity.
    pub fn data(&self) -> &[i64] {
        &self.data
    }

    /// Iterate the cells' point-index rows in order.
    pub fn cells(&self) -> std::slice::ChunksExact<'_, i64> {
        self.data.chunks_exact(self.nodes_per_cell)
    }
}

/// Points and cell blocks as decoded from a mesh file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    pub points: Vec<[f64; 3]>,
    pub cell_blocks: Vec<CellBlock>,
}

impl RawMesh {
    pub fn new(points: Vec<[f64; 3]>, cell_blocks: Vec<CellBlock>) -> Self {
        Self {
            points,
            cell_blocks,
        }
    }
}

/// Trait for readers decoding one mesh file format into a [`RawMesh`].
pub trait MeshReader {
    /// Short format name used in diagnostics.
    fn format_name(&self) -> &'static str;

    /// Parse mesh data from a reader.
    fn read<R: Read>(&self, reader: R) -> Result<RawMesh, MeshError>;

    /// Open and parse the file at `path`.
    fn read_path(&self, path: &Path) -> Result<RawMesh, MeshError> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }
}

/// Supported on-disk formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    /// Gmsh `.msh` (ASCII v2.2).
    Gmsh,
    /// Legacy VTK `.vtk` (ASCII, unstructured grid).
    Vtk,
}

impl MeshFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "msh" => Some(MeshFormat::Gmsh),
            "vtk" => Some(MeshFormat::Vtk),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MeshFormat::Gmsh => gmsh::GmshReader.format_name(),
            MeshFormat::Vtk => vtk::VtkReader.format_name(),
        }
    }
}

/// Read the mesh at `path`, choosing the reader from its extension.
pub fn read_mesh(path: impl AsRef<Path>) -> Result<RawMesh, MeshError> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path).ok_or_else(|| {
        MeshError::MeshIoParse(format!(
            "cannot deduce mesh format from file name `{}`",
            path.display()
        ))
    })?;
    log::debug!("reading {} as {}", path.display(), format.name());
    match format {
        MeshFormat::Gmsh => gmsh::GmshReader.read_path(path),
        MeshFormat::Vtk => vtk::VtkReader.read_path(path),
    }
}
