//! Element type metadata and type-name canonicalization.
//!
//! Mesh files name their element types in many ways (`tetra`, `tet4`,
//! `tetra10`, `prism`, ...). Every name is mapped once, through a static
//! alias table, onto a canonical [`CellType`]. Only the four volumetric types
//! in [`VolumeType`] take part in face connectivity; recognized 1D/2D types are
//! tolerated and skipped.

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical element types recognized by the ingestor.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    /// 0D point element.
    Vertex,
    /// 1D segment.
    Line,
    /// 2D triangle.
    Triangle,
    /// 2D quadrilateral.
    Quad,
    /// 2D polygon with an arbitrary vertex count.
    Polygon,
    /// 3D tetrahedron.
    Tetra,
    /// 3D hexahedron.
    Hexahedron,
    /// 3D wedge (triangular prism).
    Wedge,
    /// 3D square-based pyramid.
    Pyramid,
}

/// The closed set of element types that contribute faces.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Hexahedron,
    Tetra,
    Wedge,
    Pyramid,
}

static CELL_TYPE_ALIASES: Lazy<HashMap<&'static str, CellType>> = Lazy::new(|| {
    use CellType::*;
    let table: &[(&str, CellType)] = &[
        ("vertex", Vertex),
        ("point", Vertex),
        ("line", Line),
        ("line2", Line),
        ("line3", Line),
        ("line4", Line),
        ("triangle", Triangle),
        ("tri", Triangle),
        ("tri3", Triangle),
        ("triangle6", Triangle),
        ("triangle7", Triangle),
        ("quad", Quad),
        ("quad4", Quad),
        ("quad8", Quad),
        ("quad9", Quad),
        ("polygon", Polygon),
        ("tetra", Tetra),
        ("tet", Tetra),
        ("tet4", Tetra),
        ("tetra4", Tetra),
        ("tetra10", Tetra),
        ("hexahedron", Hexahedron),
        ("hex", Hexahedron),
        ("hex8", Hexahedron),
        ("hexahedron8", Hexahedron),
        ("hexahedron20", Hexahedron),
        ("hexahedron24", Hexahedron),
        ("hexahedron27", Hexahedron),
        ("wedge", Wedge),
        ("wedge6", Wedge),
        ("prism", Wedge),
        ("prism6", Wedge),
        ("wedge12", Wedge),
        ("wedge15", Wedge),
        ("wedge18", Wedge),
        ("pyramid", Pyramid),
        ("pyramid5", Pyramid),
        ("pyramid13", Pyramid),
        ("pyramid14", Pyramid),
    ];
    table.iter().copied().collect()
});

impl CellType {
    /// Canonicalize a raw element type name. Matching ignores ASCII case.
    ///
    /// Returns `None` for names outside the alias table.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Some(ct) = CELL_TYPE_ALIASES.get(name) {
            return Some(*ct);
        }
        CELL_TYPE_ALIASES
            .get(name.to_ascii_lowercase().as_str())
            .copied()
    }

    /// Canonical name of the element type.
    pub fn name(self) -> &'static str {
        match self {
            CellType::Vertex => "vertex",
            CellType::Line => "line",
            CellType::Triangle => "triangle",
            CellType::Quad => "quad",
            CellType::Polygon => "polygon",
            CellType::Tetra => "tetra",
            CellType::Hexahedron => "hexahedron",
            CellType::Wedge => "wedge",
            CellType::Pyramid => "pyramid",
        }
    }

    /// Topological dimension of the element.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Vertex => 0,
            CellType::Line => 1,
            CellType::Triangle | CellType::Quad | CellType::Polygon => 2,
            CellType::Tetra | CellType::Hexahedron | CellType::Wedge | CellType::Pyramid => 3,
        }
    }

    /// The volumetric counterpart, if this type takes part in face connectivity.
    pub fn as_volume(self) -> Option<VolumeType> {
        match self {
            CellType::Hexahedron => Some(VolumeType::Hexahedron),
            CellType::Tetra => Some(VolumeType::Tetra),
            CellType::Wedge => Some(VolumeType::Wedge),
            CellType::Pyramid => Some(VolumeType::Pyramid),
            _ => None,
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl VolumeType {
    pub const ALL: [VolumeType; 4] = [
        VolumeType::Hexahedron,
        VolumeType::Tetra,
        VolumeType::Wedge,
        VolumeType::Pyramid,
    ];

    /// Number of corner nodes; higher-order variants list these first.
    pub fn corner_count(self) -> usize {
        match self {
            VolumeType::Hexahedron => 8,
            VolumeType::Tetra => 4,
            VolumeType::Wedge => 6,
            VolumeType::Pyramid => 5,
        }
    }

    /// Number of faces produced per cell.
    pub fn face_count(self) -> usize {
        match self {
            VolumeType::Hexahedron => 6,
            VolumeType::Tetra => 4,
            VolumeType::Wedge => 5,
            VolumeType::Pyramid => 4,
        }
    }

    pub fn name(self) -> &'static str {
        CellType::from(self).name()
    }
}

impl From<VolumeType> for CellType {
    fn from(v: VolumeType) -> Self {
        match v {
            VolumeType::Hexahedron => CellType::Hexahedron,
            VolumeType::Tetra => CellType::Tetra,
            VolumeType::Wedge => CellType::Wedge,
            VolumeType::Pyramid => CellType::Pyramid,
        }
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
