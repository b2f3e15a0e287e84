#![allow(dead_code)]
use neatmesh::io::{CellBlock, RawMesh};

/// Structured grid points, x fastest.
pub fn grid_points(nx: usize, ny: usize, nz: usize) -> Vec<[f64; 3]> {
    let mut pts = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        for j in 0..=ny {
            for i in 0..=nx {
                pts.push([i as f64, j as f64, k as f64]);
            }
        }
    }
    pts
}

fn node(nx: usize, ny: usize, i: usize, j: usize, k: usize) -> i64 {
    (i + (nx + 1) * (j + (ny + 1) * k)) as i64
}

/// The eight corners of grid cell `(i, j, k)` in hexahedron node order.
pub fn hex_nodes(nx: usize, ny: usize, i: usize, j: usize, k: usize) -> [i64; 8] {
    let n = |di, dj, dk| node(nx, ny, i + di, j + dj, k + dk);
    [
        n(0, 0, 0),
        n(1, 0, 0),
        n(1, 1, 0),
        n(0, 1, 0),
        n(0, 0, 1),
        n(1, 0, 1),
        n(1, 1, 1),
        n(0, 1, 1),
    ]
}

/// One hexahedron block covering an `nx * ny * nz` grid.
pub fn hex_grid(nx: usize, ny: usize, nz: usize) -> RawMesh {
    let mut rows = Vec::with_capacity(nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                rows.push(hex_nodes(nx, ny, i, j, k));
            }
        }
    }
    let block = CellBlock::from_rows("hexahedron", &rows).unwrap();
    RawMesh::new(grid_points(nx, ny, nz), vec![block])
}

/// Conforming six-tetrahedra (Freudenthal) split of every grid cell.
pub fn tet_grid(nx: usize, ny: usize, nz: usize) -> RawMesh {
    const PATHS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    let mut rows = Vec::new();
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                for path in PATHS {
                    let mut at = [i, j, k];
                    let mut tet = [node(nx, ny, i, j, k); 4];
                    for (step, axis) in path.into_iter().enumerate() {
                        at[axis] += 1;
                        tet[step + 1] = node(nx, ny, at[0], at[1], at[2]);
                    }
                    rows.push(tet);
                }
            }
        }
    }
    let block = CellBlock::from_rows("tetra", &rows).unwrap();
    RawMesh::new(grid_points(nx, ny, nz), vec![block])
}

/// Distinct faces of an `nx * ny * nz` hexahedral grid.
pub fn hex_grid_face_count(nx: usize, ny: usize, nz: usize) -> usize {
    (nx + 1) * ny * nz + nx * (ny + 1) * nz + nx * ny * (nz + 1)
}

/// Faces shared by two cells in an `nx * ny * nz` hexahedral grid.
pub fn hex_grid_interior_count(nx: usize, ny: usize, nz: usize) -> usize {
    (nx - 1) * ny * nz + nx * (ny - 1) * nz + nx * ny * (nz - 1)
}

/// Write `contents` to a fresh file under the system temp dir.
pub fn temp_mesh_file(name: &str, contents: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("neatmesh-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
