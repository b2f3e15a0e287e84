mod util;

use neatmesh::io::MeshReader;
use neatmesh::io::gmsh::GmshReader;
use neatmesh::prelude::*;

// unit cube split into a lower hex and an upper pyramid, with surface
// triangles and a line mixed in
const HEX_PYRAMID_MSH: &str = r#"$MeshFormat
2.2 0 8
$EndMeshFormat
$PhysicalNames
1
3 1 "volume"
$EndPhysicalNames
$Nodes
9
1 0 0 0
2 1 0 0
3 1 1 0
4 0 1 0
5 0 0 1
6 1 0 1
7 1 1 1
8 0 1 1
9 0.5 0.5 1.5
$EndNodes
$Elements
5
1 1 2 1 1 1 2
2 2 2 1 1 1 2 3
3 5 2 1 1 1 2 3 4 5 6 7 8
4 7 2 1 1 5 6 7 8 9
5 2 2 1 1 5 6 9
$EndElements
"#;

const TWO_WEDGES_VTK: &str = "# vtk DataFile Version 4.2
two wedges sharing a quad
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 8 float
0 0 0  1 0 0  0 1 0  0 0 1
1 0 1  0 1 1  1 1 0  1 1 1
CELLS 2 14
6 0 1 2 3 4 5
6 1 6 2 4 7 5
CELL_TYPES 2
13
13
";

#[test]
fn gmsh_mixed_mesh_loads() {
    let path = util::temp_mesh_file("hex_pyramid.msh", HEX_PYRAMID_MSH);
    let mesh = VolumeMesh::open(&path).expect("load gmsh mesh");
    assert_eq!(mesh.n_points(), 9);
    assert_eq!(mesh.n_cells(), 2);
    let kinds: Vec<_> = mesh.cell_blocks().iter().map(|b| b.volume_type()).collect();
    assert_eq!(kinds, vec![VolumeType::Hexahedron, VolumeType::Pyramid]);

    let conn = mesh.connectivity();
    // 6 hex faces + 4 pyramid faces, the top quad shared
    assert_eq!(conn.n_faces(), 9);
    let top = conn.face_id(&[4, 5, 6, 7]).unwrap();
    assert_eq!(mesh.faceid_to_cellid()[top], [0, 1]);
    assert_eq!(conn.faces()[top], Face::quad(4, 5, 6, 7));
}

#[test]
fn gmsh_blocks_follow_element_runs() {
    let raw = GmshReader.read(HEX_PYRAMID_MSH.as_bytes()).unwrap();
    let names: Vec<_> = raw.cell_blocks.iter().map(|b| b.cell_type()).collect();
    assert_eq!(names, vec!["line", "triangle", "hexahedron", "pyramid", "triangle"]);
}

#[test]
fn vtk_wedges_share_quad() {
    let path = util::temp_mesh_file("two_wedges.vtk", TWO_WEDGES_VTK);
    let mesh = VolumeMesh::open(&path).expect("load vtk mesh");
    assert_eq!(mesh.n_cells(), 2);
    let conn = mesh.connectivity();
    assert_eq!(conn.n_faces(), 9);
    let shared: Vec<_> = conn.interior_faces().collect();
    assert_eq!(shared.len(), 1);
    let face = conn.faces()[shared[0]];
    assert!(face.is_quad());
    assert_eq!(conn.face_id(&[1, 2, 4, 5]), Some(shared[0]));
    assert_eq!(mesh.faceid_to_cellid()[shared[0]], [0, 1]);
}

#[test]
fn read_mesh_dispatches_on_extension() {
    let path = util::temp_mesh_file("dispatch.vtk", TWO_WEDGES_VTK);
    let raw = read_mesh(&path).unwrap();
    assert_eq!(raw.points.len(), 8);
    assert_eq!(raw.cell_blocks.len(), 1);
    assert_eq!(raw.cell_blocks[0].len(), 2);
}
