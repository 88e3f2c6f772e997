//! Adapter invocation and solution write-back.

use gridopt_array::LabeledArray;
use gridopt_expr::{Variable, SENTINEL};
use gridopt_solver::{SolverAdapter, SolverConfig, SolverError, SolverStatus};

use crate::model::error::ModelError;
use crate::model::Model;

impl Model {
    /// Export the matrix view, invoke the adapter, and write primal
    /// values back as one labeled array per variable family.
    ///
    /// Write-back happens only for solution-bearing statuses; an
    /// infeasible or unbounded outcome clears any previous solution.
    /// Masked positions read as NaN in the solution arrays. Constraint
    /// duals are kept when the adapter reports them.
    pub fn solve(
        &mut self,
        adapter: &mut dyn SolverAdapter,
        config: &SolverConfig,
    ) -> Result<SolverStatus, ModelError> {
        if self.objective.is_none() {
            return Err(SolverError::NoObjective.into());
        }
        let view = self.to_matrix_view()?;
        if view.vars.is_empty() {
            return Err(SolverError::EmptyModel.into());
        }

        tracing::debug!(
            component = "model",
            operation = "solve",
            status = "started",
            adapter = adapter.id(),
            variables = view.num_variables(),
            constraints = view.num_constraints(),
            nnz = view.num_entries(),
            options = config.len(),
            "Invoking solver adapter"
        );
        let outcome = adapter.solve(&view, config).map_err(ModelError::Solver)?;

        self.solution.clear();
        self.duals.clear();
        self.objective_value = None;
        if outcome.status.has_solution() {
            if outcome.primals.len() != view.vars.len() {
                return Err(SolverError::ResultMismatch {
                    expected: view.vars.len(),
                    got: outcome.primals.len(),
                }
                .into());
            }
            if let Some(ref duals) = outcome.duals {
                if duals.len() != view.cons.len() {
                    return Err(SolverError::ResultMismatch {
                        expected: view.cons.len(),
                        got: duals.len(),
                    }
                    .into());
                }
            }

            let mut primal_by_label = vec![f64::NAN; self.allocator.var_watermark() as usize];
            for (position, var) in view.vars.iter().enumerate() {
                primal_by_label[var.inner() as usize] = outcome.primals[position];
            }
            for (family, entry) in &self.variables {
                let values = entry.labels.map(|&label| {
                    if label == SENTINEL {
                        f64::NAN
                    } else {
                        primal_by_label[label as usize]
                    }
                });
                self.solution.insert(*family, values);
            }

            if let Some(ref duals) = outcome.duals {
                let mut dual_by_label = vec![f64::NAN; self.allocator.con_watermark() as usize];
                for (position, con) in view.cons.iter().enumerate() {
                    dual_by_label[con.inner() as usize] = duals[position];
                }
                for (family, entry) in &self.constraints {
                    let values = entry.labels.map(|&label| {
                        if label == SENTINEL {
                            f64::NAN
                        } else {
                            dual_by_label[label as usize]
                        }
                    });
                    self.duals.insert(*family, values);
                }
            }
            self.objective_value = Some(outcome.objective_value);
        }

        self.status = Some(outcome.status);
        tracing::debug!(
            component = "model",
            operation = "solve",
            status = "success",
            solver_status = outcome.status.as_str(),
            objective = outcome.objective_value,
            "Solve finished"
        );
        Ok(outcome.status)
    }

    /// Status of the last solve, if any.
    pub fn status(&self) -> Option<SolverStatus> {
        self.status
    }

    /// Objective value of the last solve, if any.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Solution array of a named variable family.
    pub fn solution(&self, name: &str) -> Option<&LabeledArray<f64>> {
        let family = self.variable_names.get(name)?;
        self.solution.get(family)
    }

    /// Solution array of the family behind a Variable.
    pub fn solution_for(&self, variable: &Variable) -> Option<&LabeledArray<f64>> {
        self.solution.get(&variable.family())
    }

    /// Dual array of a named constraint family, when reported.
    pub fn constraint_dual(&self, name: &str) -> Option<&LabeledArray<f64>> {
        let family = self.constraint_names.get(name)?;
        self.duals.get(family)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use gridopt_array::{DimIndex, LabeledArray};
    use gridopt_solver::{
        MatrixView, Sense, SolverAdapter, SolverConfig, SolverError, SolverOutcome, SolverStatus,
    };

    use crate::model::{Model, VariableSpec};

    /// Adapter returning a canned outcome.
    struct FixtureAdapter {
        status: SolverStatus,
        primals: Vec<f64>,
        duals: Option<Vec<f64>>,
    }

    impl SolverAdapter for FixtureAdapter {
        fn id(&self) -> &str {
            "fixture"
        }

        fn solve(
            &mut self,
            view: &MatrixView,
            _config: &SolverConfig,
        ) -> Result<SolverOutcome, SolverError> {
            let objective_value = self
                .primals
                .iter()
                .zip(&view.objective)
                .map(|(x, c)| x * c)
                .sum();
            Ok(SolverOutcome {
                status: self.status,
                objective_value,
                primals: self.primals.clone(),
                duals: self.duals.clone(),
            })
        }
    }

    #[test]
    fn solve_requires_objective() {
        let mut model = Model::new();
        model.add_variables(VariableSpec::new().lower(0.0)).unwrap();
        let mut adapter = FixtureAdapter {
            status: SolverStatus::Optimal,
            primals: vec![0.0],
            duals: None,
        };
        let err = model.solve(&mut adapter, &SolverConfig::new()).unwrap_err();
        assert_eq!(err.code(), "MODEL_SOLVER");
        assert!(err.to_string().contains("no objective"));
    }

    #[test]
    fn solve_writes_back_per_family_arrays() {
        let mut model = Model::new();
        let time = DimIndex::range("time", 2);
        let mask = LabeledArray::from_vec(time.clone(), vec![true, false]).unwrap();
        let x = model
            .add_variables(
                VariableSpec::new()
                    .lower(0.0)
                    .coords([time])
                    .name("x")
                    .mask(mask.clone()),
            )
            .unwrap();
        model
            .add_constraints(x.ge_scalar(1.0), Some("floor"), Some(&mask))
            .unwrap();
        model.add_objective(x.sum(), Sense::Minimize).unwrap();

        let mut adapter = FixtureAdapter {
            status: SolverStatus::Optimal,
            primals: vec![1.5],
            duals: Some(vec![0.25]),
        };
        let status = model.solve(&mut adapter, &SolverConfig::new()).unwrap();
        assert!(status.is_optimal());
        assert_eq!(model.objective_value(), Some(1.5));

        let solution = model.solution("x").unwrap();
        assert_eq!(solution.shape(), &[2]);
        let values = solution.ravel();
        assert_eq!(values[0], 1.5);
        assert!(values[1].is_nan());
        let via_handle = model.solution_for(&x).unwrap().ravel();
        assert_eq!(via_handle[0], 1.5);
        assert!(via_handle[1].is_nan());

        let dual = model.constraint_dual("floor").unwrap();
        let dual_values = dual.ravel();
        assert_eq!(dual_values[0], 0.25);
        assert!(dual_values[1].is_nan());
    }

    #[test]
    fn mismatched_result_length_is_rejected() {
        let mut model = Model::new();
        let x = model.add_variables(VariableSpec::new().lower(0.0)).unwrap();
        model.add_objective(x.sum(), Sense::Minimize).unwrap();
        let mut adapter = FixtureAdapter {
            status: SolverStatus::Optimal,
            primals: vec![1.0, 2.0],
            duals: None,
        };
        let err = model.solve(&mut adapter, &SolverConfig::new()).unwrap_err();
        assert!(err.to_string().contains("expected 1"));
    }

    #[test]
    fn infeasible_outcome_clears_the_solution() {
        let mut model = Model::new();
        let x = model
            .add_variables(VariableSpec::new().lower(0.0).name("x"))
            .unwrap();
        model.add_constraints(x.ge_scalar(1.0), None, None).unwrap();
        model.add_objective(x.sum(), Sense::Minimize).unwrap();

        let mut optimal = FixtureAdapter {
            status: SolverStatus::Optimal,
            primals: vec![1.0],
            duals: None,
        };
        model.solve(&mut optimal, &SolverConfig::new()).unwrap();
        assert!(model.solution("x").is_some());

        // An infeasible rerun reports no primals at all.
        let mut infeasible = FixtureAdapter {
            status: SolverStatus::Infeasible,
            primals: vec![],
            duals: None,
        };
        let status = model.solve(&mut infeasible, &SolverConfig::new()).unwrap();
        assert!(!status.has_solution());
        assert_eq!(model.status(), Some(SolverStatus::Infeasible));
        assert!(model.solution("x").is_none());
        assert_eq!(model.objective_value(), None);
    }
}
