//! File-level round trips through the text and binary adapters.

use rstest::rstest;
use std::fs;
use subgraph_feature_index::{
    features::FeatureMatrix,
    npy,
    parser::{read_graphs, write_graphs_file},
    Error, Graph,
};
use tempfile::tempdir;

#[rstest]
#[case(0, 0)]
#[case(0, 5)]
#[case(3, 0)]
#[case(2, 50)]
fn npy_file_round_trip(#[case] rows: usize, #[case] cols: usize) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.npy");
    let data: Vec<u8> = (0..rows * cols).map(|k| (k % 3 == 0) as u8).collect();
    let matrix = FeatureMatrix::from_raw(rows, cols, data).unwrap();

    npy::write_file(&path, &matrix).unwrap();
    let read = npy::read_file(&path).unwrap();
    assert_eq!(read, matrix);
    assert_eq!((read.rows(), read.cols()), (rows, cols));
}

#[test]
fn graph_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graphs.txt");
    let mut square = Graph::new(1);
    for v in [4, 1, 9, 2] {
        square.add_vertex(v, v as i64 % 2);
    }
    square.add_edge(1, 2, 0);
    square.add_edge(2, 4, 1);
    square.add_edge(4, 9, 0);
    square.add_edge(9, 1, 1);
    let graphs = vec![Graph::single_edge(0, 3, 2, 1), square];

    write_graphs_file(&path, &graphs).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#\nv 0 3\nv 1 1\ne 0 1 2\n#\nv 1 1\nv 2 0\nv 4 0\nv 9 1\n"));
    assert_eq!(read_graphs(&path).unwrap(), graphs);
}

#[test]
fn missing_files_report_their_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    match read_graphs(&path) {
        Err(Error::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
    assert!(matches!(npy::read_file(&path), Err(Error::Io { .. })));
}
