//! Compressed item×aisle matrix: for each item, the aisles that stock it,
//! sorted ascending by quantity. Built once by transposing the aisle catalog.

/// CSR-style row layout: `row_ptr[item]..row_ptr[item+1]` indexes into `col`/`qty`.
#[derive(Debug, Clone)]
pub struct SparseMatrix {
    row_ptr: Vec<usize>,
    col: Vec<usize>,
    qty: Vec<i64>,
}

impl SparseMatrix {
    /// `aisles[a]` is a list of `(item, qty)` pairs stocked by aisle `a`.
    pub fn from_aisles(n_items: usize, aisles: &[Vec<(usize, i64)>]) -> Self {
        let mut row_len = vec![0usize; n_items];
        for aisle in aisles {
            for &(item, _) in aisle {
                row_len[item] += 1;
            }
        }

        let mut row_ptr = vec![0usize; n_items + 1];
        for i in 0..n_items {
            row_ptr[i + 1] = row_ptr[i] + row_len[i];
        }

        let nnz = row_ptr[n_items];
        let mut col = vec![0usize; nnz];
        let mut qty = vec![0i64; nnz];
        let mut cursor = row_ptr.clone();

        for (aisle_idx, aisle) in aisles.iter().enumerate() {
            for &(item, q) in aisle {
                let pos = cursor[item];
                col[pos] = aisle_idx;
                qty[pos] = q;
                cursor[item] += 1;
            }
        }

        let mut matrix = SparseMatrix { row_ptr, col, qty };
        matrix.sort_rows_by_qty();
        matrix
    }

    fn sort_rows_by_qty(&mut self) {
        for item in 0..self.row_ptr.len() - 1 {
            let start = self.row_ptr[item];
            let end = self.row_ptr[item + 1];
            let mut pairs: Vec<(i64, usize)> = self.col[start..end]
                .iter()
                .zip(self.qty[start..end].iter())
                .map(|(&c, &q)| (q, c))
                .collect();
            pairs.sort_unstable_by_key(|&(q, _)| q);
            for (offset, (q, c)) in pairs.into_iter().enumerate() {
                self.qty[start + offset] = q;
                self.col[start + offset] = c;
            }
        }
    }

    pub fn n_items(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    /// The `(aisle, qty)` entries of row `item`, ascending by quantity.
    pub fn row(&self, item: usize) -> impl DoubleEndedIterator<Item = (usize, i64)> + '_ {
        let start = self.row_ptr[item];
        let end = self.row_ptr[item + 1];
        self.col[start..end]
            .iter()
            .zip(self.qty[start..end].iter())
            .map(|(&c, &q)| (c, q))
    }

    /// Traverse row `item` (forward if `!descending`, reverse otherwise),
    /// skipping aisles absent from `eligible`, accumulating aisles into the
    /// result and subtracting their quantity from `demand` until it drops to
    /// zero or below. Returns `None` if the row is exhausted first.
    pub fn cover_row(
        &self,
        item: usize,
        eligible: &dyn Fn(usize) -> bool,
        mut demand: i64,
        descending: bool,
    ) -> Option<Vec<usize>> {
        let mut picked = Vec::new();
        let entries: Box<dyn Iterator<Item = (usize, i64)>> = if descending {
            Box::new(self.row(item).rev())
        } else {
            Box::new(self.row(item))
        };

        for (aisle, q) in entries {
            if demand <= 0 {
                break;
            }
            if !eligible(aisle) {
                continue;
            }
            picked.push(aisle);
            demand -= q;
        }

        if demand <= 0 {
            Some(picked)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix {
        // item 0: aisle0=5, aisle1=3, aisle2=9
        // item 1: aisle0=2
        let aisles = vec![
            vec![(0, 5), (1, 2)],
            vec![(0, 3)],
            vec![(0, 9)],
        ];
        SparseMatrix::from_aisles(2, &aisles)
    }

    #[test]
    fn rows_are_sorted_ascending_by_qty() {
        let m = sample();
        let row0: Vec<_> = m.row(0).collect();
        assert_eq!(row0, vec![(1, 3), (0, 5), (2, 9)]);
    }

    #[test]
    fn round_trip_every_input_entry_appears_once() {
        let aisles = vec![vec![(0, 5), (1, 2)], vec![(0, 3)], vec![(0, 9)]];
        let m = SparseMatrix::from_aisles(2, &aisles);
        for (a, row) in aisles.iter().enumerate() {
            for &(item, qty) in row {
                let found = m.row(item).filter(|&(c, q)| c == a && q == qty).count();
                assert_eq!(found, 1);
            }
        }
    }

    #[test]
    fn cover_row_descending_prefers_largest_quantity_first() {
        let m = sample();
        let covered = m.cover_row(0, &|_| true, 8, true).unwrap();
        assert_eq!(covered[0], 2); // aisle 2 has qty 9, largest
        assert!(covered.iter().map(|&a| m.row(0).find(|&(c, _)| c == a).unwrap().1).sum::<i64>() >= 8);
    }

    #[test]
    fn cover_row_returns_none_when_uncoverable() {
        let m = sample();
        let covered = m.cover_row(1, &|_| true, 100, false);
        assert!(covered.is_none());
    }

    #[test]
    fn cover_row_respects_eligibility() {
        let m = sample();
        let covered = m.cover_row(0, &|a| a != 2, 8, true).unwrap();
        assert!(!covered.contains(&2));
    }
}
