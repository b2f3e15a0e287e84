//! Gmsh `.msh` reader.
//!
//! # Supported format
//! - ASCII `.msh` version **2.2**.
//! - All element types are read. Codes 1–19 are mapped to meshio-style type
//!   names (`line`, `triangle`, `tetra`, `hexahedron20`, ...); any other code
//!   becomes a block named `gmsh:<code>`, left for the ingestor to reject.
//! - Node tags may be sparse; they are renumbered to dense 0-based point
//!   indices in the order the `$Nodes` section lists them.
//! - Consecutive elements of the same type form one cell block.
//!
//! # Limitations
//! - Binary files are not supported.
//! - `.msh` v4.x (block-based) is not supported.
//! - Element tags (physical groups, entities) are ignored.

use crate::io::{CellBlock, MeshReader, RawMesh};
use crate::mesh_error::MeshError;
use hashbrown::HashMap;
use itertools::Itertools;
use std::io::Read;

/// Gmsh `.msh` reader for ASCII v2.2 meshes.
#[derive(Debug, Default, Clone, Copy)]
pub struct GmshReader;

impl GmshReader {
    fn parse_version(line: &str) -> Result<&str, MeshError> {
        let mut parts = line.split_whitespace();
        let version = parts
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing mesh format version".into()))?;
        let file_type = parts
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing mesh format type".into()))?;
        if file_type != "0" {
            return Err(MeshError::MeshIoParse(
                "binary .msh files are not supported".into(),
            ));
        }
        Ok(version)
    }

    /// meshio type name and node count for a Gmsh element code.
    pub fn element_type(code: u32) -> Option<(&'static str, usize)> {
        match code {
            1 => Some(("line", 2)),
            2 => Some(("triangle", 3)),
            3 => Some(("quad", 4)),
            4 => Some(("tetra", 4)),
            5 => Some(("hexahedron", 8)),
            6 => Some(("wedge", 6)),
            7 => Some(("pyramid", 5)),
            8 => Some(("line3", 3)),
            9 => Some(("triangle6", 6)),
            10 => Some(("quad9", 9)),
            11 => Some(("tetra10", 10)),
            12 => Some(("hexahedron27", 27)),
            13 => Some(("wedge18", 18)),
            14 => Some(("pyramid14", 14)),
            15 => Some(("vertex", 1)),
            16 => Some(("quad8", 8)),
            17 => Some(("hexahedron20", 20)),
            18 => Some(("wedge15", 15)),
            19 => Some(("pyramid13", 13)),
            _ => None,
        }
    }

    fn parse_count(line: Option<&str>, what: &str) -> Result<usize, MeshError> {
        let line = line.ok_or_else(|| MeshError::MeshIoParse(format!("missing {what}")))?;
        line.trim()
            .parse::<usize>()
            .map_err(|_| MeshError::MeshIoParse(format!("invalid {what}: {line}")))
    }

    fn parse_coord(raw: Option<&str>, axis: char) -> Result<f64, MeshError> {
        let raw = raw.ok_or_else(|| MeshError::MeshIoParse(format!("missing {axis} coordinate")))?;
        raw.parse::<f64>()
            .map_err(|_| MeshError::MeshIoParse(format!("invalid coordinate: {raw}")))
    }

    fn expect_end<'a>(
        lines: &mut impl Iterator<Item = &'a str>,
        marker: &str,
    ) -> Result<(), MeshError> {
        match lines.next() {
            Some(line) if line.trim() == marker => Ok(()),
            _ => Err(MeshError::MeshIoParse(format!("missing {marker}"))),
        }
    }
}

/// One parsed element: block name and its point indices.
struct Element {
    block: String,
    nodes: Vec<i64>,
}

impl MeshReader for GmshReader {
    fn format_name(&self) -> &'static str {
        "gmsh"
    }

    fn read<R: Read>(&self, mut reader: R) -> Result<RawMesh, MeshError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        let mut lines = contents.lines();

        let mut version: Option<String> = None;
        let mut points: Vec<[f64; 3]> = Vec::new();
        let mut node_index: HashMap<u64, i64> = HashMap::new();
        let mut elements: Vec<Element> = Vec::new();

        while let Some(line) = lines.next() {
            match line.trim() {
                "$MeshFormat" => {
                    let format_line = lines
                        .next()
                        .ok_or_else(|| MeshError::MeshIoParse("missing MeshFormat".into()))?;
                    version = Some(Self::parse_version(format_line)?.to_string());
                    Self::expect_end(&mut lines, "$EndMeshFormat")?;
                }
                "$Nodes" => {
                    let node_count = Self::parse_count(lines.next(), "node count")?;
                    points.reserve(node_count);
                    for _ in 0..node_count {
                        let node_line = lines.next().ok_or_else(|| {
                            MeshError::MeshIoParse("unexpected end of node list".into())
                        })?;
                        let mut parts = node_line.split_whitespace();
                        let tag_str = parts
                            .next()
                            .ok_or_else(|| MeshError::MeshIoParse("missing node id".into()))?;
                        let tag = tag_str.parse::<u64>().map_err(|_| {
                            MeshError::MeshIoParse(format!("invalid node id: {tag_str}"))
                        })?;
                        let x = Self::parse_coord(parts.next(), 'x')?;
                        let y = Self::parse_coord(parts.next(), 'y')?;
                        let z = Self::parse_coord(parts.next(), 'z')?;
                        if node_index.insert(tag, points.len() as i64).is_some() {
                            return Err(MeshError::MeshIoParse(format!(
                                "duplicate node id: {tag}"
                            )));
                        }
                        points.push([x, y, z]);
                    }
                    Self::expect_end(&mut lines, "$EndNodes")?;
                }
                "$Elements" => {
                    let elem_count = Self::parse_count(lines.next(), "element count")?;
                    elements.reserve(elem_count);
                    for _ in 0..elem_count {
                        let elem_line = lines.next().ok_or_else(|| {
                            MeshError::MeshIoParse("unexpected end of element list".into())
                        })?;
                        elements.push(Self::parse_element(elem_line, &node_index)?);
                    }
                    Self::expect_end(&mut lines, "$EndElements")?;
                }
                _ => {
                    // ignore other sections
                }
            }
        }

        let version = version.unwrap_or_else(|| "2.2".to_string());
        if version != "2.2" {
            return Err(MeshError::MeshIoParse(format!(
                "unsupported gmsh version: {version}"
            )));
        }

        let mut cell_blocks = Vec::new();
        let runs = elements
            .into_iter()
            .chunk_by(|e| (e.block.clone(), e.nodes.len()));
        for ((block, width), run) in &runs {
            let data: Vec<i64> = run.flat_map(|e| e.nodes).collect();
            cell_blocks.push(CellBlock::new(block, width, data)?);
        }

        log::debug!(
            "gmsh: {} nodes, {} cell blocks",
            points.len(),
            cell_blocks.len()
        );
        Ok(RawMesh {
            points,
            cell_blocks,
        })
    }
}

impl GmshReader {
    fn parse_element(line: &str, node_index: &HashMap<u64, i64>) -> Result<Element, MeshError> {
        let mut parts = line.split_whitespace();
        parts
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing element id".into()))?;
        let code = parts
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing element type".into()))?
            .parse::<u32>()
            .map_err(|_| MeshError::MeshIoParse("invalid element type".into()))?;
        let num_tags = parts
            .next()
            .ok_or_else(|| MeshError::MeshIoParse("missing element tag count".into()))?
            .parse::<usize>()
            .map_err(|_| MeshError::MeshIoParse("invalid element tag count".into()))?;
        for _ in 0..num_tags {
            parts
                .next()
                .ok_or_else(|| MeshError::MeshIoParse("missing element tag".into()))?;
        }

        let mut nodes = Vec::new();
        for raw in parts {
            let tag = raw
                .parse::<u64>()
                .map_err(|_| MeshError::MeshIoParse(format!("invalid element node id: {raw}")))?;
            let idx = node_index.get(&tag).ok_or_else(|| {
                MeshError::MeshIoParse(format!("element references unknown node {tag}"))
            })?;
            nodes.push(*idx);
        }

        let block = match Self::element_type(code) {
            Some((name, expected)) => {
                if nodes.len() != expected {
                    return Err(MeshError::MeshIoParse(format!(
                        "element type {code} ({name}) expects {expected} nodes, got {}",
                        nodes.len()
                    )));
                }
                name.to_string()
            }
            None => format!("gmsh:{code}"),
        };
        if nodes.is_empty() {
            return Err(MeshError::MeshIoParse("missing element node id".into()));
        }
        Ok(Element { block, nodes })
    }
}
