//! Two-path count tables.
//!
//! For each ordered node pair (i, j) the samplers need the number of
//! intermediate nodes k forming a two-path of a given directional pattern.
//! Small graphs use a dense n x n matrix; large graphs use a hash table
//! keyed by the pair, since two-path counts are sparse in sparse graphs.
//! Both representations have identical observable behaviour.

use fnv::FnvHashMap;

/// Node count above which the sparse representation is chosen.
///
/// A dense table is n^2 u32 entries, so 5000 nodes is 100 MB per table
/// (a directed graph carries three tables).
pub const DENSE_NODE_LIMIT: usize = 5000;

#[inline]
fn pair_key(i: u32, j: u32) -> u64 {
    ((i as u64) << 32) | j as u64
}

/// Counts of two-paths for ordered node pairs.
#[derive(Debug, Clone)]
pub enum TwoPathTable {
    /// Row-major n x n matrix: `counts[i * n + j]`
    Dense { n: usize, counts: Vec<u32> },
    /// Hash table holding only the nonzero entries
    Sparse { counts: FnvHashMap<u64, u32> },
}

impl TwoPathTable {
    /// Pick dense or sparse by node count.
    pub fn new(num_nodes: usize) -> Self {
        if num_nodes <= DENSE_NODE_LIMIT {
            TwoPathTable::dense(num_nodes)
        } else {
            TwoPathTable::sparse()
        }
    }

    pub fn dense(num_nodes: usize) -> Self {
        TwoPathTable::Dense {
            n: num_nodes,
            counts: vec![0; num_nodes * num_nodes],
        }
    }

    pub fn sparse() -> Self {
        TwoPathTable::Sparse {
            counts: FnvHashMap::default(),
        }
    }

    /// Two-path count for the ordered pair (i, j).
    #[inline]
    pub fn get(&self, i: u32, j: u32) -> u32 {
        match self {
            TwoPathTable::Dense { n, counts } => counts[i as usize * n + j as usize],
            TwoPathTable::Sparse { counts } => {
                counts.get(&pair_key(i, j)).copied().unwrap_or(0)
            }
        }
    }

    /// Add `delta` (+1 or -1) to the count for (i, j).
    ///
    /// Decrementing a zero count is a logic error in the caller's
    /// incremental update and panics in debug builds.
    #[inline]
    pub fn add(&mut self, i: u32, j: u32, delta: i32) {
        match self {
            TwoPathTable::Dense { n, counts } => {
                let cell = &mut counts[i as usize * *n + j as usize];
                debug_assert!(delta > 0 || *cell > 0);
                *cell = cell.wrapping_add_signed(delta);
            }
            TwoPathTable::Sparse { counts } => {
                let key = pair_key(i, j);
                if delta > 0 {
                    *counts.entry(key).or_insert(0) += delta as u32;
                } else {
                    let cell = counts
                        .get_mut(&key)
                        .expect("decrement of absent two-path entry");
                    debug_assert!(*cell as i64 + delta as i64 >= 0);
                    *cell = cell.wrapping_add_signed(delta);
                    if *cell == 0 {
                        // keep the table proportional to the nonzero support
                        counts.remove(&key);
                    }
                }
            }
        }
    }

    /// Number of nonzero entries (dense scans; used by tests and summaries).
    pub fn nonzero_entries(&self) -> usize {
        match self {
            TwoPathTable::Dense { counts, .. } => counts.iter().filter(|&&c| c > 0).count(),
            TwoPathTable::Sparse { counts } => counts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_and_sparse_agree() {
        let mut dense = TwoPathTable::dense(10);
        let mut sparse = TwoPathTable::sparse();

        let ops: [(u32, u32, i32); 7] = [
            (0, 1, 1),
            (0, 1, 1),
            (1, 0, 1),
            (0, 1, -1),
            (9, 9, 1),
            (3, 7, 1),
            (3, 7, -1),
        ];
        for &(i, j, d) in &ops {
            dense.add(i, j, d);
            sparse.add(i, j, d);
        }

        for i in 0..10 {
            for j in 0..10 {
                assert_eq!(dense.get(i, j), sparse.get(i, j), "entry ({}, {})", i, j);
            }
        }
        assert_eq!(dense.nonzero_entries(), sparse.nonzero_entries());
    }

    #[test]
    fn test_sparse_drops_zero_entries() {
        let mut t = TwoPathTable::sparse();
        t.add(2, 5, 1);
        t.add(2, 5, -1);
        assert_eq!(t.get(2, 5), 0);
        assert_eq!(t.nonzero_entries(), 0);
    }
}
