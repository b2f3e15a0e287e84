//! Classify raw cell blocks and keep the volumetric ones.
//!
//! Each block's type name is canonicalized through
//! [`CellType::from_name`]. Non-empty 3D blocks are accepted in input order
//! and recognized 1D/2D blocks are skipped. Anything else, including an empty
//! 3D block, aborts ingestion with [`MeshError::NonSupportedElement`]. A mesh without any accepted 3D
//! block is rejected with [`MeshError::InvalidMesh`].

use crate::io::CellBlock;
use crate::mesh_error::MeshError;
use crate::topology::cell_type::{CellType, VolumeType};

/// A cell block accepted for face connectivity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeBlock {
    volume_type: VolumeType,
    block: CellBlock,
}

impl VolumeBlock {
    /// Wrap a block whose rows are wide enough for `volume_type`.
    pub fn new(volume_type: VolumeType, block: CellBlock) -> Result<Self, MeshError> {
        if block.nodes_per_cell() < volume_type.corner_count() {
            return Err(MeshError::InvalidMesh(format!(
                "cell block `{}` has {} nodes per cell, {volume_type} needs at least {}",
                block.cell_type(),
                block.nodes_per_cell(),
                volume_type.corner_count()
            )));
        }
        Ok(Self { volume_type, block })
    }

    pub fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    /// The underlying block, with its raw type name.
    pub fn block(&self) -> &CellBlock {
        &self.block
    }

    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    pub fn cells(&self) -> std::slice::ChunksExact<'_, i64> {
        self.block.cells()
    }
}

/// Result of ingestion: accepted blocks in input order and their cell total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptedBlocks {
    pub blocks: Vec<VolumeBlock>,
    pub n_cells: usize,
}

/// Classify `blocks`, keeping non-empty volumetric ones.
///
/// When `n_points` is given, every index of an accepted block must lie in
/// `0..n_points`.
pub fn classify_blocks(
    blocks: Vec<CellBlock>,
    n_points: Option<usize>,
) -> Result<AcceptedBlocks, MeshError> {
    let mut accepted = AcceptedBlocks::default();

    for block in blocks {
        let cell_type = CellType::from_name(block.cell_type())
            .ok_or_else(|| MeshError::NonSupportedElement(block.cell_type().to_string()))?;

        let Some(volume_type) = cell_type.as_volume() else {
            log::debug!(
                "skipping {}D block `{}` ({} cells)",
                cell_type.dimension(),
                block.cell_type(),
                block.len()
            );
            continue;
        };
        // an empty solid block is neither accepted nor a lower-dimensional skip
        if block.is_empty() {
            return Err(MeshError::NonSupportedElement(block.cell_type().to_string()));
        }
        if let Some(n_points) = n_points {
            check_point_range(&block, n_points)?;
        }

        accepted.n_cells += block.len();
        accepted.blocks.push(VolumeBlock::new(volume_type, block)?);
    }

    if accepted.blocks.is_empty() {
        return Err(MeshError::InvalidMesh(
            "No 3D elements were found in mesh".into(),
        ));
    }
    log::debug!(
        "accepted {} volumetric blocks, {} cells",
        accepted.blocks.len(),
        accepted.n_cells
    );
    Ok(accepted)
}

fn check_point_range(block: &CellBlock, n_points: usize) -> Result<(), MeshError> {
    let bad = block
        .data()
        .iter()
        .position(|&p| p < 0 || p as u64 >= n_points as u64);
    match bad {
        None => Ok(()),
        Some(pos) => Err(MeshError::InvalidMesh(format!(
            "cell {} of block `{}` references point {} but the mesh has {n_points} points",
            pos / block.nodes_per_cell(),
            block.cell_type(),
            block.data()[pos]
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(name: &str, rows: &[&[i64]]) -> CellBlock {
        CellBlock::from_rows(name, rows).unwrap()
    }

    #[test]
    fn keeps_volume_blocks_in_order() {
        let blocks = vec![
            block("triangle", &[&[0, 1, 2]]),
            block("tetra", &[&[0, 1, 2, 3], &[1, 2, 3, 4]]),
            block("line", &[&[0, 1]]),
            block("pyramid", &[&[0, 1, 2, 3, 4]]),
        ];
        let accepted = classify_blocks(blocks, None).unwrap();
        assert_eq!(accepted.n_cells, 3);
        let kinds: Vec<_> = accepted.blocks.iter().map(|b| b.volume_type()).collect();
        assert_eq!(kinds, vec![VolumeType::Tetra, VolumeType::Pyramid]);
    }

    #[test]
    fn unknown_type_is_named_in_error() {
        let blocks = vec![
            block("tetra", &[&[0, 1, 2, 3]]),
            block("polyhedron12", &[&[0, 1, 2, 3]]),
        ];
        assert_eq!(
            classify_blocks(blocks, None),
            Err(MeshError::NonSupportedElement("polyhedron12".into()))
        );
    }

    #[test]
    fn surface_only_mesh_is_invalid() {
        let blocks = vec![block("triangle", &[&[0, 1, 2]]), block("quad", &[&[0, 1, 2, 3]])];
        assert!(matches!(
            classify_blocks(blocks, None),
            Err(MeshError::InvalidMesh(_))
        ));
    }

    #[test]
    fn empty_volume_block_is_unsupported() {
        let empty = CellBlock::new("hexahedron", 8, Vec::new()).unwrap();
        let blocks = vec![empty, block("tetra", &[&[0, 1, 2, 3]])];
        assert_eq!(
            classify_blocks(blocks, None),
            Err(MeshError::NonSupportedElement("hexahedron".into()))
        );
    }

    #[test]
    fn empty_surface_block_is_still_skipped() {
        let empty = CellBlock::new("triangle", 3, Vec::new()).unwrap();
        let blocks = vec![empty, block("tetra", &[&[0, 1, 2, 3]])];
        assert_eq!(classify_blocks(blocks, None).unwrap().n_cells, 1);
    }

    #[test]
    fn narrow_rows_and_bad_indices_rejected() {
        let narrow = vec![block("hexahedron", &[&[0, 1, 2, 3]])];
        assert!(matches!(
            classify_blocks(narrow, None),
            Err(MeshError::InvalidMesh(_))
        ));
        let out_of_range = vec![block("tetra", &[&[0, 1, 2, 9]])];
        assert!(classify_blocks(out_of_range.clone(), None).is_ok());
        assert!(matches!(
            classify_blocks(out_of_range, Some(4)),
            Err(MeshError::InvalidMesh(_))
        ));
    }
}
