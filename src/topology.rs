//! Grid adjacency for a population laid out in row-major order.
//!
//! Member `index` sits at `row = index / row_width`, `column = index % row_width`. The last row
//! may be partial, so the population size need not be a multiple of the row width. Two members
//! are neighbors when their cells touch, including diagonally (Moore adjacency). The grid does not
//! wrap around and never reaches past the end of the population.

/// Row/column offsets of the eight cells surrounding a cell.
const MOORE_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Returns the neighbors of `index` in ascending order.
///
/// Cells that would cross a row boundary (column 0 has no left neighbors, the last column has
/// no right neighbors) and cells at or beyond `total` are excluded. An `index` outside
/// `[0, total)` or a `row_width` of zero yields no neighbors.
#[must_use]
pub fn neighbors(index: usize, total: usize, row_width: usize) -> Vec<usize> {
    if row_width == 0 || index >= total {
        return Vec::new();
    }
    let row = (index / row_width) as isize;
    let column = (index % row_width) as isize;
    let width = row_width as isize;

    // The offsets are ordered by row then column, so the result is already sorted.
    MOORE_OFFSETS
        .iter()
        .filter_map(|&(row_offset, column_offset)| {
            let neighbor_row = row + row_offset;
            let neighbor_column = column + column_offset;
            if neighbor_row < 0 || neighbor_column < 0 || neighbor_column >= width {
                return None;
            }
            let neighbor = (neighbor_row * width + neighbor_column) as usize;
            (neighbor < total).then_some(neighbor)
        })
        .collect()
}

/// The adjacency of a fixed `(total, row_width)` layout, computed once.
///
/// The layout never changes during a simulation, so the engine asks this table instead of
/// recomputing neighbor sets on every tick.
#[derive(Debug, Clone)]
pub struct GridTopology {
    total: usize,
    row_width: usize,
    adjacency: Vec<Vec<usize>>,
}

impl GridTopology {
    #[must_use]
    pub fn new(total: usize, row_width: usize) -> Self {
        let adjacency = (0..total)
            .map(|index| neighbors(index, total, row_width))
            .collect();
        GridTopology {
            total,
            row_width,
            adjacency,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// Number of rows, counting a trailing partial row.
    #[must_use]
    pub fn rows(&self) -> usize {
        if self.row_width == 0 {
            0
        } else {
            self.total.div_ceil(self.row_width)
        }
    }

    /// `(row, column)` of `index`, or `None` if it is not a member of the grid.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.total && self.row_width > 0)
            .then(|| (index / self.row_width, index % self.row_width))
    }

    /// Neighbors of `index` in ascending order; empty when `index` is out of range.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> &[usize] {
        match self.adjacency.get(index) {
            Some(adjacent) => adjacent,
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        // 0 1 2
        // 3 4 5
        // 6 7 8
        assert_eq!(neighbors(4, 9, 3), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn corners_and_edges() {
        assert_eq!(neighbors(0, 9, 3), vec![1, 3, 4]);
        assert_eq!(neighbors(2, 9, 3), vec![1, 4, 5]);
        assert_eq!(neighbors(3, 9, 3), vec![0, 1, 4, 6, 7]);
        assert_eq!(neighbors(8, 9, 3), vec![4, 5, 7]);
    }

    #[test]
    fn partial_last_row_has_no_phantom_neighbors() {
        // 0 1 2
        // 3 4 5
        // 6
        assert_eq!(neighbors(5, 7, 3), vec![1, 2, 4]);
        assert_eq!(neighbors(4, 7, 3), vec![0, 1, 2, 3, 5, 6]);
        assert_eq!(neighbors(3, 7, 3), vec![0, 1, 4, 6]);
        assert_eq!(neighbors(6, 7, 3), vec![3, 4]);
    }

    #[test]
    fn single_row() {
        assert_eq!(neighbors(0, 6, 6), vec![1]);
        assert_eq!(neighbors(3, 6, 6), vec![2, 4]);
        assert_eq!(neighbors(5, 6, 6), vec![4]);
    }

    #[test]
    fn single_column_is_vertical_only() {
        assert_eq!(neighbors(0, 4, 1), vec![1]);
        assert_eq!(neighbors(2, 4, 1), vec![1, 3]);
        assert_eq!(neighbors(3, 4, 1), vec![2]);
    }

    #[test]
    fn degenerate_inputs_are_empty() {
        assert!(neighbors(0, 0, 3).is_empty());
        assert!(neighbors(7, 7, 3).is_empty());
        assert!(neighbors(0, 5, 0).is_empty());
        assert!(neighbors(0, 1, 1).is_empty());
    }

    #[test]
    fn grid_topology_matches_free_function() {
        let topology = GridTopology::new(7, 3);
        assert_eq!(topology.rows(), 3);
        assert_eq!(topology.position(5), Some((1, 2)));
        assert_eq!(topology.position(7), None);
        for index in 0..7 {
            assert_eq!(topology.neighbors(index), neighbors(index, 7, 3).as_slice());
        }
        assert!(topology.neighbors(7).is_empty());
    }

    #[test]
    fn empty_grid_topology() {
        let topology = GridTopology::new(0, 4);
        assert_eq!(topology.rows(), 0);
        assert!(topology.neighbors(0).is_empty());
    }

    proptest! {
        #[test]
        fn adjacency_is_symmetric_and_irreflexive(total in 0usize..60, row_width in 1usize..9) {
            let topology = GridTopology::new(total, row_width);
            for a in 0..total {
                let adjacent = topology.neighbors(a);
                prop_assert!(!adjacent.contains(&a));
                prop_assert!(adjacent.len() <= 8);
                prop_assert!(adjacent.windows(2).all(|pair| pair[0] < pair[1]));
                for &b in adjacent {
                    prop_assert!(b < total);
                    prop_assert!(topology.neighbors(b).contains(&a));
                }
            }
        }

        #[test]
        fn neighbors_are_within_one_row_and_column(total in 1usize..60, row_width in 1usize..9) {
            for a in 0..total {
                let (row, column) = (a / row_width, a % row_width);
                for b in neighbors(a, total, row_width) {
                    let (other_row, other_column) = (b / row_width, b % row_width);
                    prop_assert!(row.abs_diff(other_row) <= 1);
                    prop_assert!(column.abs_diff(other_column) <= 1);
                }
            }
        }
    }
}
