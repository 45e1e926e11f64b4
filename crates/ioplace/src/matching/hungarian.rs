//! Minimum-cost rectangular assignment (Hungarian method with potentials).

use ioplace_common::{Dbu, InternalError, IoplaceResult};

const INF: Dbu = Dbu::MAX / 4;

/// Dense row-major cost matrix with no more rows than columns.
#[derive(Clone, Debug)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Dbu>,
}

impl CostMatrix {
    /// Builds a `rows x cols` matrix by evaluating `cost(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut cost: impl FnMut(usize, usize) -> Dbu) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(cost(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Dbu {
        self.data[row * self.cols + col]
    }
}

/// An optimal assignment together with the dual potentials that prove it.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Column assigned to each row.
    pub row_to_col: Vec<usize>,
    /// Sum of the assigned entries.
    pub total_cost: Dbu,
    row_potential: Vec<Dbu>,
    col_potential: Vec<Dbu>,
}

impl Solution {
    /// Entry minus both potentials. Never negative; zero on every assigned cell.
    pub fn reduced_cost(&self, matrix: &CostMatrix, row: usize, col: usize) -> Dbu {
        matrix.get(row, col) - self.row_potential[row] - self.col_potential[col]
    }

    /// Returns one flag per column, set when some row reaches it at zero reduced cost.
    pub fn tight_columns(&self, matrix: &CostMatrix) -> Vec<bool> {
        (0..matrix.cols())
            .map(|c| (0..matrix.rows()).any(|r| self.reduced_cost(matrix, r, c) == 0))
            .collect()
    }
}

/// Solves the assignment problem, giving every row a distinct column.
///
/// Runs in `O(rows^2 * cols)`. Ties resolve to the lowest column index.
pub fn solve(matrix: &CostMatrix) -> IoplaceResult<Solution> {
    let (n, m) = (matrix.rows, matrix.cols);
    if n > m {
        return Err(InternalError::new(format!(
            "assignment matrix has {n} rows but only {m} columns"
        )));
    }

    // 1-based: index 0 of `p` and `way` is the virtual source column.
    let mut u = vec![0 as Dbu; n + 1];
    let mut v = vec![0 as Dbu; m + 1];
    let mut p = vec![0usize; m + 1];
    let mut way = vec![0usize; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; m + 1];
        let mut used = vec![false; m + 1];
        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let cur = matrix.get(i0 - 1, j - 1) - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            if j1 == 0 {
                return Err(InternalError::new("no augmenting column found"));
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![0usize; n];
    for j in 1..=m {
        if p[j] != 0 {
            row_to_col[p[j] - 1] = j - 1;
        }
    }
    let total_cost = row_to_col
        .iter()
        .enumerate()
        .map(|(r, &c)| matrix.get(r, c))
        .sum();

    Ok(Solution {
        row_to_col,
        total_cost,
        row_potential: u[1..].to_vec(),
        col_potential: v[1..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[Dbu]]) -> CostMatrix {
        CostMatrix::from_fn(rows.len(), rows[0].len(), |r, c| rows[r][c])
    }

    fn brute_force(m: &CostMatrix) -> Dbu {
        fn go(m: &CostMatrix, row: usize, used: &mut Vec<bool>) -> Dbu {
            if row == m.rows() {
                return 0;
            }
            let mut best = Dbu::MAX;
            for c in 0..m.cols() {
                if !used[c] {
                    used[c] = true;
                    best = best.min(m.get(row, c) + go(m, row + 1, used));
                    used[c] = false;
                }
            }
            best
        }
        go(m, 0, &mut vec![false; m.cols()])
    }

    #[test]
    fn square_classic() {
        let m = matrix(&[&[4, 1, 3], &[2, 0, 5], &[3, 2, 2]]);
        let s = solve(&m).unwrap();
        assert_eq!(s.total_cost, 5);
        assert_eq!(s.row_to_col, vec![1, 0, 2]);
    }

    #[test]
    fn rectangular_picks_best_columns() {
        let m = matrix(&[&[9, 9, 1, 9, 9], &[9, 9, 9, 9, 2]]);
        let s = solve(&m).unwrap();
        assert_eq!(s.row_to_col, vec![2, 4]);
        assert_eq!(s.total_cost, 3);
    }

    #[test]
    fn matches_brute_force() {
        let m = CostMatrix::from_fn(4, 6, |r, c| {
            ((r * 7 + c * 13) % 11) as Dbu * 10 + (r ^ c) as Dbu
        });
        let s = solve(&m).unwrap();
        assert_eq!(s.total_cost, brute_force(&m));
        let mut cols = s.row_to_col.clone();
        cols.sort_unstable();
        cols.dedup();
        assert_eq!(cols.len(), 4);
    }

    #[test]
    fn assigned_cells_are_tight() {
        let m = CostMatrix::from_fn(3, 5, |r, c| ((r as Dbu) - (c as Dbu)).abs() * 100);
        let s = solve(&m).unwrap();
        let tight = s.tight_columns(&m);
        for (r, &c) in s.row_to_col.iter().enumerate() {
            assert_eq!(s.reduced_cost(&m, r, c), 0);
            assert!(tight[c]);
        }
        for r in 0..3 {
            for c in 0..5 {
                assert!(s.reduced_cost(&m, r, c) >= 0);
            }
        }
    }

    #[test]
    fn equal_costs_take_lowest_columns() {
        let m = CostMatrix::from_fn(2, 4, |_, _| 7);
        let s = solve(&m).unwrap();
        let mut cols = s.row_to_col.clone();
        cols.sort_unstable();
        assert_eq!(cols, vec![0, 1]);
        assert_eq!(s.total_cost, 14);
    }

    #[test]
    fn more_rows_than_columns_is_an_error() {
        let m = CostMatrix::from_fn(3, 2, |_, _| 0);
        assert!(solve(&m).is_err());
    }

    #[test]
    fn empty_matrix() {
        let m = CostMatrix::from_fn(0, 3, |_, _| 0);
        let s = solve(&m).unwrap();
        assert!(s.row_to_col.is_empty());
        assert_eq!(s.total_cost, 0);
    }
}
