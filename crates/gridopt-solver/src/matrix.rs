//! The solver-facing matrix bundle.

use gridopt_expr::{ComparisonSense, ConLabel, VarLabel};

/// Optimization sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "min",
            Sense::Maximize => "max",
        }
    }
}

/// A deterministic, solver-agnostic view of an assembled model.
///
/// Columns (`vars`) and rows (`cons`) list the live labels in allocation
/// order; `lower`/`upper`/`integer` align with `vars`, `rhs`/`senses` with
/// `cons`, and `objective` holds one coefficient per column. `entries` is
/// a triplet list sorted by ascending (row, col) with duplicates summed
/// and exact zeros dropped. Sentinel labels never appear.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixView {
    pub vars: Vec<VarLabel>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub integer: Vec<bool>,
    pub cons: Vec<ConLabel>,
    pub rhs: Vec<f64>,
    pub senses: Vec<ComparisonSense>,
    pub entries: Vec<(ConLabel, VarLabel, f64)>,
    pub objective: Vec<f64>,
    pub sense: Sense,
}

impl MatrixView {
    pub fn num_variables(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.cons.len()
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Column position of a variable label; labels are ascending.
    pub fn column_position(&self, var: VarLabel) -> Option<usize> {
        self.vars.binary_search(&var).ok()
    }

    /// Row position of a constraint label; labels are ascending.
    pub fn row_position(&self, con: ConLabel) -> Option<usize> {
        self.cons.binary_search(&con).ok()
    }

    /// Materialize the dense coefficient matrix, rows by columns.
    pub fn dense_matrix(&self) -> Vec<Vec<f64>> {
        let mut dense = vec![vec![0.0; self.vars.len()]; self.cons.len()];
        for (con, var, value) in &self.entries {
            if let (Some(row), Some(col)) = (self.row_position(*con), self.column_position(*var)) {
                dense[row][col] += value;
            }
        }
        dense
    }

    /// Evaluate `A * x` for a column-aligned vector `x`.
    pub fn matrix_vector_product(&self, x: &[f64]) -> Vec<f64> {
        let mut product = vec![0.0; self.cons.len()];
        for (con, var, value) in &self.entries {
            if let (Some(row), Some(col)) = (self.row_position(*con), self.column_position(*var)) {
                product[row] += value * x[col];
            }
        }
        product
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use gridopt_expr::{ComparisonSense, ConLabel, VarLabel};

    use super::{MatrixView, Sense};

    fn two_by_two() -> MatrixView {
        MatrixView {
            vars: vec![VarLabel::new(0), VarLabel::new(1)],
            lower: vec![0.0, 0.0],
            upper: vec![f64::INFINITY, f64::INFINITY],
            integer: vec![false, false],
            cons: vec![ConLabel::new(0), ConLabel::new(1)],
            rhs: vec![10.0, 3.0],
            senses: vec![
                ComparisonSense::GreaterEqual,
                ComparisonSense::GreaterEqual,
            ],
            entries: vec![
                (ConLabel::new(0), VarLabel::new(0), 3.0),
                (ConLabel::new(0), VarLabel::new(1), 7.0),
                (ConLabel::new(1), VarLabel::new(0), 5.0),
                (ConLabel::new(1), VarLabel::new(1), 2.0),
            ],
            objective: vec![1.0, 2.0],
            sense: Sense::Minimize,
        }
    }

    #[test]
    fn sense_as_str() {
        assert_eq!(Sense::Minimize.as_str(), "min");
        assert_eq!(Sense::Maximize.as_str(), "max");
    }

    #[test]
    fn positions_use_label_order() {
        let view = two_by_two();
        assert_eq!(view.column_position(VarLabel::new(1)), Some(1));
        assert_eq!(view.column_position(VarLabel::new(9)), None);
        assert_eq!(view.row_position(ConLabel::new(0)), Some(0));
    }

    #[test]
    fn dense_matrix_lays_out_rows() {
        let view = two_by_two();
        assert_eq!(view.dense_matrix(), vec![vec![3.0, 7.0], vec![5.0, 2.0]]);
    }

    #[test]
    fn matrix_vector_product_matches_dense() {
        let view = two_by_two();
        let x = vec![2.0, -1.0];
        assert_eq!(view.matrix_vector_product(&x), vec![-1.0, 8.0]);
    }
}
