//! Deterministic matrix-view export.

use std::collections::BTreeMap;

use gridopt_expr::{ConLabel, VarLabel, SENTINEL};
use gridopt_solver::{MatrixView, Sense};

use crate::model::error::ModelError;
use crate::model::Model;

impl Model {
    /// Export the solver-facing bundle.
    ///
    /// Columns and rows follow allocation order (ascending labels);
    /// duplicate (row, col) contributions are summed in label order and
    /// exact zeros dropped. Sentinel labels never appear in the view.
    pub fn to_matrix_view(&self) -> Result<MatrixView, ModelError> {
        let mut vars = Vec::new();
        let mut lower = Vec::new();
        let mut upper = Vec::new();
        let mut integer = Vec::new();
        for family in self.variables.values() {
            let labels = family.labels.ravel();
            let lower_values = family.lower.ravel();
            let upper_values = family.upper.ravel();
            for ((label, lo), hi) in labels.iter().zip(lower_values).zip(upper_values) {
                if *label == SENTINEL {
                    continue;
                }
                vars.push(VarLabel::new(*label));
                lower.push(lo);
                upper.push(hi);
                integer.push(family.integer);
            }
        }

        let mut cons = Vec::new();
        let mut rhs = Vec::new();
        let mut senses = Vec::new();
        let mut accumulated: BTreeMap<(i64, i64), f64> = BTreeMap::new();
        for family in self.constraints.values() {
            let labels = family.labels.ravel();
            let rhs_values = family.rhs.ravel();
            let coeff_values = family.lhs.coeffs().ravel();
            let var_values = family.lhs.vars().ravel();
            let n_terms = family.lhs.n_terms();
            for (position, (row, rhs_value)) in labels.iter().zip(rhs_values).enumerate() {
                if *row == SENTINEL {
                    continue;
                }
                cons.push(ConLabel::new(*row));
                rhs.push(rhs_value);
                senses.push(family.sense);
                for term in 0..n_terms {
                    let column = var_values[position * n_terms + term];
                    if column == SENTINEL {
                        continue;
                    }
                    self.ensure_label_known(column)?;
                    *accumulated.entry((*row, column)).or_insert(0.0) +=
                        coeff_values[position * n_terms + term];
                }
            }
        }
        let entries: Vec<(ConLabel, VarLabel, f64)> = accumulated
            .into_iter()
            .filter(|(_, value)| *value != 0.0)
            .map(|((row, column), value)| (ConLabel::new(row), VarLabel::new(column), value))
            .collect();

        let mut objective = vec![0.0; vars.len()];
        let sense = match self.objective {
            Some(ref objective) => objective.sense,
            None => Sense::Minimize,
        };
        if let Some(ref obj) = self.objective {
            let mut by_label: BTreeMap<i64, f64> = BTreeMap::new();
            for (label, coeff) in obj
                .expr
                .vars()
                .ravel()
                .into_iter()
                .zip(obj.expr.coeffs().ravel())
            {
                if label == SENTINEL {
                    continue;
                }
                self.ensure_label_known(label)?;
                *by_label.entry(label).or_insert(0.0) += coeff;
            }
            for (label, coeff) in by_label {
                if let Ok(position) = vars.binary_search(&VarLabel::new(label)) {
                    objective[position] = coeff;
                }
            }
        }

        tracing::debug!(
            component = "model",
            operation = "to_matrix_view",
            status = "success",
            variables = vars.len(),
            constraints = cons.len(),
            nnz = entries.len(),
            "Exported matrix view"
        );

        Ok(MatrixView {
            vars,
            lower,
            upper,
            integer,
            cons,
            rhs,
            senses,
            entries,
            objective,
            sense,
        })
    }
}
