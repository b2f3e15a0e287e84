//! Per-element face extraction.
//!
//! Each volumetric element type has a fixed reference face table. The tables
//! index into the cell's own vertex list, and the order within each face fixes
//! its outward-normal orientation, so they must match the node ordering
//! convention the mesh was written with (meshio / VTK ordering):
//!
//! | Element    | Faces                                                            |
//! |------------|------------------------------------------------------------------|
//! | hexahedron | (1,2,6,5) (0,4,7,3) (3,7,6,2) (0,1,5,4) (4,5,6,7) (0,3,2,1)      |
//! | wedge      | (0,2,1) (3,4,5) (3,0,1,4) (0,3,5,2) (1,2,5,4)                    |
//! | tetra      | (0,2,1) (1,2,3) (0,1,3) (0,3,2)                                  |
//! | pyramid    | (2,1,0,3) (2,3,4) (1,4,0) (3,0,4)                                |
//!
//! Triangular faces are padded with [`NO_POINT`](crate::topology::face::NO_POINT).
//! Higher-order cells list their corner nodes first, so only the leading
//! corner nodes are read.
//!
//! # Example
//! ```rust
//! use neatmesh::algs::faces::faces_of;
//! use neatmesh::topology::cell_type::VolumeType;
//! use neatmesh::topology::face::Face;
//!
//! let faces = faces_of(VolumeType::Tetra, &[10, 11, 12, 13]);
//! assert_eq!(faces.len(), 4);
//! assert_eq!(faces[0], Face::tri(10, 12, 11));
//! ```

use crate::topology::cell_type::VolumeType;
use crate::topology::face::{Face, NO_POINT};
use std::ops::Deref;

/// Largest face count of any supported element (hexahedron).
pub const MAX_CELL_FACES: usize = 6;

/// The faces of one cell, stored inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellFaces {
    faces: [Face; MAX_CELL_FACES],
    len: usize,
}

impl CellFaces {
    fn from_faces<const N: usize>(faces: [Face; N]) -> Self {
        let mut out = [Face([NO_POINT; 4]); MAX_CELL_FACES];
        out[..N].copy_from_slice(&faces);
        CellFaces { faces: out, len: N }
    }
}

impl Deref for CellFaces {
    type Target = [Face];

    fn deref(&self) -> &[Face] {
        &self.faces[..self.len]
    }
}

impl<'a> IntoIterator for &'a CellFaces {
    type Item = &'a Face;
    type IntoIter = std::slice::Iter<'a, Face>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Faces of `cell`, dispatched on its element type.
///
/// # Panics
/// Panics if `cell` holds fewer than `volume_type.corner_count()` indices.
/// Cell blocks accepted by [`crate::algs::ingest`] always satisfy this.
#[inline]
pub fn faces_of(volume_type: VolumeType, cell: &[i64]) -> CellFaces {
    match volume_type {
        VolumeType::Hexahedron => hexahedron_faces(cell),
        VolumeType::Wedge => wedge_faces(cell),
        VolumeType::Tetra => tetra_faces(cell),
        VolumeType::Pyramid => pyramid_faces(cell),
    }
}

pub fn hexahedron_faces(c: &[i64]) -> CellFaces {
    CellFaces::from_faces([
        Face::quad(c[1], c[2], c[6], c[5]),
        Face::quad(c[0], c[4], c[7], c[3]),
        Face::quad(c[3], c[7], c[6], c[2]),
        Face::quad(c[0], c[1], c[5], c[4]),
        Face::quad(c[4], c[5], c[6], c[7]),
        Face::quad(c[0], c[3], c[2], c[1]),
    ])
}

pub fn wedge_faces(c: &[i64]) -> CellFaces {
    CellFaces::from_faces([
        Face::tri(c[0], c[2], c[1]),
        Face::tri(c[3], c[4], c[5]),
        Face::quad(c[3], c[0], c[1], c[4]),
        Face::quad(c[0], c[3], c[5], c[2]),
        Face::quad(c[1], c[2], c[5], c[4]),
    ])
}

pub fn tetra_faces(c: &[i64]) -> CellFaces {
    CellFaces::from_faces([
        Face::tri(c[0], c[2], c[1]),
        Face::tri(c[1], c[2], c[3]),
        Face::tri(c[0], c[1], c[3]),
        Face::tri(c[0], c[3], c[2]),
    ])
}

pub fn pyramid_faces(c: &[i64]) -> CellFaces {
    CellFaces::from_faces([
        Face::quad(c[2], c[1], c[0], c[3]),
        Face::tri(c[2], c[3], c[4]),
        Face::tri(c[1], c[4], c[0]),
        Face::tri(c[3], c[0], c[4]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(n: i64) -> Vec<i64> {
        (0..n).collect()
    }

    #[test]
    fn face_counts_match_element_metadata() {
        for vt in VolumeType::ALL {
            let cell = identity(vt.corner_count() as i64);
            assert_eq!(faces_of(vt, &cell).len(), vt.face_count(), "{vt}");
        }
    }

    #[test]
    fn hexahedron_table_is_exact() {
        let f = hexahedron_faces(&identity(8));
        let expect = [
            [1, 2, 6, 5],
            [0, 4, 7, 3],
            [3, 7, 6, 2],
            [0, 1, 5, 4],
            [4, 5, 6, 7],
            [0, 3, 2, 1],
        ];
        for (face, want) in f.iter().zip(expect) {
            assert_eq!(face.0, want);
        }
    }

    #[test]
    fn wedge_table_is_exact() {
        let f = wedge_faces(&identity(6));
        let expect = [
            [0, 2, 1, -1],
            [3, 4, 5, -1],
            [3, 0, 1, 4],
            [0, 3, 5, 2],
            [1, 2, 5, 4],
        ];
        assert_eq!(f.iter().map(|f| f.0).collect::<Vec<_>>(), expect.to_vec());
    }

    #[test]
    fn tetra_and_pyramid_tables_are_exact() {
        let t = tetra_faces(&identity(4));
        assert_eq!(
            t.iter().map(|f| f.0).collect::<Vec<_>>(),
            vec![[0, 2, 1, -1], [1, 2, 3, -1], [0, 1, 3, -1], [0, 3, 2, -1]]
        );
        let p = pyramid_faces(&identity(5));
        assert_eq!(
            p.iter().map(|f| f.0).collect::<Vec<_>>(),
            vec![[2, 1, 0, 3], [2, 3, 4, -1], [1, 4, 0, -1], [3, 0, 4, -1]]
        );
    }

    #[test]
    fn indices_are_mapped_through_cell() {
        let cell = [100, 101, 102, 103, 104, 105, 106, 107];
        let f = faces_of(VolumeType::Hexahedron, &cell);
        assert_eq!(f[4], Face::quad(104, 105, 106, 107));
    }

    #[test]
    fn higher_order_cells_use_corner_nodes() {
        // tetra10: four corners followed by six edge nodes
        let cell = [0, 1, 2, 3, 40, 41, 42, 43, 44, 45];
        let f = faces_of(VolumeType::Tetra, &cell);
        assert!(f.iter().flat_map(|f| f.points()).all(|p| p < 4));
    }
}
