//! Legacy VTK (`.vtk`) reader for unstructured grids.
//!
//! Targets ASCII legacy files with an `UNSTRUCTURED_GRID` dataset using the
//! classic `CELLS n size` layout (one count-prefixed row per cell). VTK cell
//! type codes are mapped to meshio-style names; unknown codes (including
//! `VTK_POLYHEDRON`) become blocks named `vtk:<code>`. Data sections after
//! `CELL_TYPES` are ignored.

use crate::io::{CellBlock, MeshReader, RawMesh};
use crate::mesh_error::MeshError;
use itertools::Itertools;
use std::io::Read;

#[derive(Debug, Default, Clone, Copy)]
pub struct VtkReader;

impl VtkReader {
    /// meshio type name for a VTK cell type code.
    pub fn cell_type_name(code: i32) -> Option<&'static str> {
        match code {
            1 => Some("vertex"),
            3 => Some("line"),
            5 => Some("triangle"),
            7 => Some("polygon"),
            9 => Some("quad"),
            10 => Some("tetra"),
            12 => Some("hexahedron"),
            13 => Some("wedge"),
            14 => Some("pyramid"),
            21 => Some("line3"),
            22 => Some("triangle6"),
            23 => Some("quad8"),
            24 => Some("tetra10"),
            25 => Some("hexahedron20"),
            26 => Some("wedge15"),
            27 => Some("pyramid13"),
            28 => Some("quad9"),
            29 => Some("hexahedron27"),
            _ => None,
        }
    }

    fn next_token<'a>(
        tokens: &mut impl Iterator<Item = &'a str>,
        what: &str,
    ) -> Result<&'a str, MeshError> {
        tokens
            .next()
            .ok_or_else(|| MeshError::MeshIoParse(format!("missing {what}")))
    }

    fn parse_token<'a, T: std::str::FromStr>(
        tokens: &mut impl Iterator<Item = &'a str>,
        what: &str,
    ) -> Result<T, MeshError> {
        let raw = Self::next_token(tokens, what)?;
        raw.parse::<T>()
            .map_err(|_| MeshError::MeshIoParse(format!("invalid {what}: {raw}")))
    }

    fn expect_keyword<'a>(
        tokens: &mut impl Iterator<Item = &'a str>,
        keyword: &str,
    ) -> Result<(), MeshError> {
        let token = Self::next_token(tokens, keyword)?;
        if token != keyword {
            return Err(MeshError::MeshIoParse(format!(
                "expected {keyword} section, found `{token}`"
            )));
        }
        Ok(())
    }
}

impl MeshReader for VtkReader {
    fn format_name(&self) -> &'static str {
        "vtk"
    }

    fn read<R: Read>(&self, mut reader: R) -> Result<RawMesh, MeshError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        let mut lines = input.lines();
        let version = lines
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("empty VTK file".into()))?;
        if !version.starts_with("# vtk DataFile") {
            return Err(MeshError::MeshIoParse("missing VTK header".into()));
        }
        let _title = lines.next();
        let format = lines
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing ASCII line".into()))?;
        if format.trim() != "ASCII" {
            return Err(MeshError::MeshIoParse("VTK ASCII format required".into()));
        }
        let dataset = lines
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing DATASET line".into()))?;
        if !dataset.trim().ends_with("UNSTRUCTURED_GRID") {
            return Err(MeshError::MeshIoParse(
                "VTK UNSTRUCTURED_GRID required".into(),
            ));
        }

        let mut tokens = lines.flat_map(str::split_whitespace);

        Self::expect_keyword(&mut tokens, "POINTS")?;
        let num_points: usize = Self::parse_token(&mut tokens, "point count")?;
        let _point_type = Self::next_token(&mut tokens, "point type")?;
        let mut points: Vec<[f64; 3]> = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            let x = Self::parse_token(&mut tokens, "point value")?;
            let y = Self::parse_token(&mut tokens, "point value")?;
            let z = Self::parse_token(&mut tokens, "point value")?;
            points.push([x, y, z]);
        }

        Self::expect_keyword(&mut tokens, "CELLS")?;
        let num_cells: usize = Self::parse_token(&mut tokens, "cell count")?;
        let _total_size: usize = Self::parse_token(&mut tokens, "cell size")?;
        let mut connectivity = Vec::with_capacity(num_cells);
        for _ in 0..num_cells {
            let count: usize = Self::parse_token(&mut tokens, "cell size")?;
            let mut cell_conn = Vec::with_capacity(count);
            for _ in 0..count {
                let idx: i64 = Self::parse_token(&mut tokens, "cell index")?;
                if idx < 0 || idx as usize >= num_points {
                    return Err(MeshError::MeshIoParse(format!(
                        "point index {idx} out of range"
                    )));
                }
                cell_conn.push(idx);
            }
            connectivity.push(cell_conn);
        }

        Self::expect_keyword(&mut tokens, "CELL_TYPES")?;
        let cell_types_count: usize = Self::parse_token(&mut tokens, "cell types count")?;
        if cell_types_count != num_cells {
            return Err(MeshError::MeshIoParse(format!(
                "CELL_TYPES lists {cell_types_count} entries for {num_cells} cells"
            )));
        }
        let mut names = Vec::with_capacity(num_cells);
        for _ in 0..cell_types_count {
            let code: i32 = Self::parse_token(&mut tokens, "cell type")?;
            names.push(
                Self::cell_type_name(code)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("vtk:{code}")),
            );
        }

        let mut cell_blocks = Vec::new();
        let runs = names
            .into_iter()
            .zip(connectivity)
            .chunk_by(|(name, conn)| (name.clone(), conn.len()));
        for ((name, width), run) in &runs {
            let data: Vec<i64> = run.flat_map(|(_, conn)| conn).collect();
            if width == 0 {
                return Err(MeshError::MeshIoParse(format!(
                    "cell of type {name} has no points"
                )));
            }
            cell_blocks.push(CellBlock::new(name, width, data)?);
        }

        log::debug!(
            "vtk: {} points, {} cell blocks",
            points.len(),
            cell_blocks.len()
        );
        Ok(RawMesh {
            points,
            cell_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEDGE_AND_QUAD: &str = "# vtk DataFile Version 3.0
wedge
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 6 double
0 0 0 1 0 0 0 1 0
0 0 1 1 0 1 0 1 1
CELLS 2 12
6 0 1 2 3 4 5
4 0 1 4 3
CELL_TYPES 2
13
9
CELL_DATA 2
SCALARS id int 1
LOOKUP_TABLE default
0 1
";

    #[test]
    fn reads_classic_layout() {
        let mesh = VtkReader.read(WEDGE_AND_QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.points.len(), 6);
        assert_eq!(mesh.points[3], [0.0, 0.0, 1.0]);
        let kinds: Vec<_> = mesh.cell_blocks.iter().map(|b| b.cell_type()).collect();
        assert_eq!(kinds, vec!["wedge", "quad"]);
        assert_eq!(mesh.cell_blocks[0].data(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn polyhedron_code_is_left_for_ingestion() {
        let src = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\nPOINTS 1 float\n0 0 0\nCELLS 1 2\n1 0\nCELL_TYPES 1\n42\n";
        let mesh = VtkReader.read(src.as_bytes()).unwrap();
        assert_eq!(mesh.cell_blocks[0].cell_type(), "vtk:42");
    }

    #[test]
    fn binary_and_structured_rejected() {
        let binary = "# vtk DataFile Version 3.0\nt\nBINARY\nDATASET UNSTRUCTURED_GRID\n";
        assert!(VtkReader.read(binary.as_bytes()).is_err());
        let grid = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET STRUCTURED_POINTS\n";
        assert!(VtkReader.read(grid.as_bytes()).is_err());
    }

    #[test]
    fn out_of_range_index_rejected() {
        let src = "# vtk DataFile Version 3.0\nt\nASCII\nDATASET UNSTRUCTURED_GRID\nPOINTS 1 float\n0 0 0\nCELLS 1 2\n1 3\nCELL_TYPES 1\n1\n";
        assert!(matches!(
            VtkReader.read(src.as_bytes()),
            Err(MeshError::MeshIoParse(_))
        ));
    }
}
