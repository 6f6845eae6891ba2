//! Binary fragment features and the query-side candidate filter.

use crate::isomorphism::is_subgraph;
use crate::{Error, Graph, Result};
use itertools::Itertools;
use rayon::prelude::*;
use std::io::{self, Write};
use tracing::{debug, warn};

/// Dense row-major 0/1 grid: one row per graph, one column per fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl FeatureMatrix {
    /// Wraps row-major bytes, checking the length and that every value is 0 or 1
    pub fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::Npy(format!(
                "{} values cannot fill a {rows}x{cols} matrix",
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|&v| v > 1) {
            return Err(Error::NonBinaryValue {
                row: pos / cols,
                col: pos % cols,
                value: i64::from(data[pos]),
            });
        }
        Ok(FeatureMatrix { rows, cols, data })
    }

    /// `feature[i][j] = 1` iff fragment `j` is a subgraph of graph `i`
    pub fn build(graphs: &[Graph], fragments: &[Graph]) -> Self {
        let data: Vec<u8> = graphs
            .par_iter()
            .flat_map_iter(|g| fragments.iter().map(move |f| u8::from(is_subgraph(f, g))))
            .collect();
        let matrix = FeatureMatrix {
            rows: graphs.len(),
            cols: fragments.len(),
            data,
        };
        debug!(
            rows = matrix.rows,
            cols = matrix.cols,
            ones = matrix.count_ones(),
            "built feature matrix"
        );
        matrix
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[u8] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.data[i * self.cols + j] != 0
    }

    /// Row-major bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Whether every feature set in `query` is also set in `graph`
pub fn is_candidate(graph: &[u8], query: &[u8]) -> bool {
    query.iter().zip(graph).all(|(&q, &g)| q == 0 || g != 0)
}

/// 0-based rows of `database` whose features are a superset of `query`
pub fn candidates_for(database: &FeatureMatrix, query: &[u8]) -> Vec<usize> {
    (0..database.rows())
        .filter(|&i| is_candidate(database.row(i), query))
        .collect()
}

/// Candidate rows for every query row
pub fn filter_candidates(database: &FeatureMatrix, queries: &FeatureMatrix) -> Result<Vec<Vec<usize>>> {
    if queries.rows() > 0 && queries.cols() != database.cols() {
        return Err(Error::DimensionMismatch {
            expected: database.cols(),
            found: queries.cols(),
        });
    }

    let candidates: Vec<Vec<usize>> = (0..queries.rows())
        .map(|q| candidates_for(database, queries.row(q)))
        .collect();

    if !candidates.is_empty()
        && database.rows() > 0
        && candidates.iter().all(|c| c.len() == database.rows())
    {
        warn!("every query returns the entire database; fragments are not discriminative");
    }
    Ok(candidates)
}

/// Writes `q # <i>` / `c # <j> ...` pairs, both 1-based
pub fn write_candidates<W: Write>(writer: &mut W, candidates: &[Vec<usize>]) -> io::Result<()> {
    for (q, rows) in candidates.iter().enumerate() {
        writeln!(writer, "q # {}", q + 1)?;
        writeln!(writer, "c # {}", rows.iter().map(|r| r + 1).join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[u8]]) -> FeatureMatrix {
        let cols = rows.first().map_or(0, |r| r.len());
        FeatureMatrix::from_raw(rows.len(), cols, rows.concat()).unwrap()
    }

    #[test]
    fn build_marks_contained_fragments() {
        let graphs = vec![Graph::single_edge(0, 1, 0, 2), Graph::single_edge(1, 1, 0, 3)];
        let fragments = vec![
            Graph::single_edge(0, 2, 0, 1),
            Graph::single_edge(1, 1, 0, 3),
            Graph::new(2),
        ];
        let m = FeatureMatrix::build(&graphs, &fragments);
        assert_eq!(m, matrix(&[&[1, 0, 1], &[0, 1, 1]]));
        assert_eq!(m.count_ones(), 4);
        assert!(m.get(1, 2) && !m.get(1, 0));
    }

    #[test]
    fn all_zero_query_matches_everything() {
        let db = matrix(&[&[1, 0], &[0, 1], &[0, 0]]);
        assert_eq!(candidates_for(&db, &[0, 0]), vec![0, 1, 2]);
    }

    #[test]
    fn query_features_must_be_subset() {
        let db = matrix(&[&[1, 1, 0], &[1, 0, 0], &[1, 1, 1]]);
        let queries = matrix(&[&[1, 1, 0], &[0, 0, 1]]);
        let candidates = filter_candidates(&db, &queries).unwrap();
        assert_eq!(candidates, vec![vec![0, 2], vec![2]]);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let db = matrix(&[&[1, 1]]);
        let queries = matrix(&[&[1, 1, 0]]);
        assert!(matches!(
            filter_candidates(&db, &queries),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn from_raw_rejects_bad_input() {
        assert!(FeatureMatrix::from_raw(2, 2, vec![0, 1, 1]).is_err());
        assert!(matches!(
            FeatureMatrix::from_raw(usize::MAX / 2 + 1, 2, vec![]),
            Err(Error::Npy(_))
        ));
        assert!(matches!(
            FeatureMatrix::from_raw(2, 2, vec![0, 1, 2, 0]),
            Err(Error::NonBinaryValue { row: 1, col: 0, value: 2 })
        ));
    }

    #[test]
    fn candidate_output_is_one_based() {
        let mut out = Vec::new();
        write_candidates(&mut out, &[vec![0, 2], vec![]]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "q # 1\nc # 1 3\nq # 2\nc # \n");
    }
}
