//! Adapter trait for solver back-ends.

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::matrix::MatrixView;
use crate::status::SolverStatus;

/// Result of one adapter invocation.
///
/// `primals` aligns with `view.vars`; `duals`, when reported, aligns with
/// `view.cons`.
#[derive(Debug, Clone)]
pub struct SolverOutcome {
    pub status: SolverStatus,
    pub objective_value: f64,
    pub primals: Vec<f64>,
    pub duals: Option<Vec<f64>>,
}

/// Trait that all solver back-ends must implement.
///
/// The model hands the adapter a [`MatrixView`] and an option map; the
/// adapter reports status, objective value, and label-aligned solution
/// vectors.
pub trait SolverAdapter {
    /// Identifier used in logs and error messages.
    fn id(&self) -> &str;

    /// Solve the exported view under the given configuration.
    fn solve(
        &mut self,
        view: &MatrixView,
        config: &SolverConfig,
    ) -> Result<SolverOutcome, SolverError>;
}
