use std::path::PathBuf;

use rand::Rng;
use subsurface_core::containers::{AttributeColumn, AttributeTable, Cells, StructuredData, UnstructuredData};
use subsurface_core::ndarray::{Array2, Array3};

/// Returns a path in the temp directory that is unique to this test run
pub fn scratch_path(file_name: &str) -> PathBuf {
    let run_id: u64 = rand::thread_rng().gen();
    std::env::temp_dir().join(format!("subsurface-io-{:016x}-{}", run_id, file_name))
}

/// A single well path with `n_vertices` vertices, two cell attributes and one vertex attribute
pub fn random_line_set(n_vertices: usize) -> UnstructuredData {
    let mut rng = rand::thread_rng();
    // Values are drawn from a grid of 1/8 steps so that they survive the 32-bit float payload exactly
    let vertex = Array2::from_shape_fn((n_vertices, 3), |_| rng.gen_range(-800..800) as f64 / 8.0);
    let n_cells = n_vertices - 1;
    let cell_attrs = AttributeTable::from_columns(vec![
        ("well_id", AttributeColumn::Int(vec![0; n_cells])),
        (
            "lith_code",
            AttributeColumn::Int((0..n_cells).map(|idx| (idx % 3) as i64 + 1).collect()),
        ),
    ])
    .unwrap();
    let vertex_attrs =
        AttributeTable::from_columns(vec![("well_id", AttributeColumn::Int(vec![0; n_vertices]))]).unwrap();
    UnstructuredData::from_arrays(vertex, Cells::Lines, Some(cell_attrs), Some(vertex_attrs)).unwrap()
}

pub fn grid(nx: usize, ny: usize, nz: usize) -> StructuredData {
    let values = Array3::from_shape_fn((nx, ny, nz), |(i, j, k)| (i * 100 + j * 10 + k) as f64).into_dyn();
    StructuredData::from_array(values, Some("vp")).unwrap()
}
