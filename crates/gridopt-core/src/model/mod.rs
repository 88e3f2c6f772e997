//! Model container for building labeled optimization problems.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives
//! - [`rule`]: Parallel and rule-based expression builders
//! - [`matrix`]: Deterministic matrix-view export
//! - [`solve`]: Adapter invocation and solution write-back
//! - [`storage`]: Read access to families, bounds, and counters
//! - [`metadata`]: Per-family metadata values

mod allocator;
mod builder;
mod matrix;
mod metadata;
mod rule;
mod solve;
mod storage;

mod error;

use std::collections::BTreeMap;

use gridopt_array::LabeledArray;
use gridopt_expr::{ComparisonSense, ConFamilyId, LinearExpression, VarFamilyId};
use gridopt_solver::{Sense, SolverStatus};

use allocator::LabelAllocator;

pub use builder::VariableSpec;
pub use error::ModelError;

/// One registered `add_variables` call: labels shaped by the coords plus
/// broadcast bounds and integrality.
#[derive(Debug, Clone)]
pub(crate) struct VariableFamily {
    pub(crate) name: Option<String>,
    pub(crate) labels: LabeledArray<i64>,
    pub(crate) lower: LabeledArray<f64>,
    pub(crate) upper: LabeledArray<f64>,
    pub(crate) integer: bool,
}

/// One registered constraint family: the comparison triple plus the
/// labels assigned at registration.
#[derive(Debug, Clone)]
pub(crate) struct ConstraintFamily {
    pub(crate) name: String,
    pub(crate) labels: LabeledArray<i64>,
    pub(crate) lhs: LinearExpression,
    pub(crate) sense: ComparisonSense,
    pub(crate) rhs: LabeledArray<f64>,
}

#[derive(Debug, Clone)]
pub(crate) struct Objective {
    pub(crate) expr: LinearExpression,
    pub(crate) sense: Sense,
}

/// Container owning the label allocator, the variable and constraint
/// registries, the objective, and (after solving) the solution.
///
/// Variables and constraints handed out by the model are lightweight
/// views holding label arrays and a family id; they stay valid for the
/// lifetime of the model that issued them.
#[derive(Debug, Clone, Default)]
pub struct Model {
    force_dim_names: bool,
    pub(crate) allocator: LabelAllocator,
    pub(crate) next_var_family: u32,
    pub(crate) next_con_family: u32,
    pub(crate) variables: BTreeMap<VarFamilyId, VariableFamily>,
    pub(crate) constraints: BTreeMap<ConFamilyId, ConstraintFamily>,
    pub(crate) variable_names: BTreeMap<String, VarFamilyId>,
    pub(crate) constraint_names: BTreeMap<String, ConFamilyId>,
    pub(crate) objective: Option<Objective>,
    pub(crate) status: Option<SolverStatus>,
    pub(crate) objective_value: Option<f64>,
    pub(crate) solution: BTreeMap<VarFamilyId, LabeledArray<f64>>,
    pub(crate) duals: BTreeMap<ConFamilyId, LabeledArray<f64>>,
    // Lazy-allocated metadata storage
    pub(crate) variable_metadata: Option<BTreeMap<VarFamilyId, serde_json::Value>>,
    pub(crate) constraint_metadata: Option<BTreeMap<ConFamilyId, serde_json::Value>>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model that rejects anonymously named dimensions.
    pub fn with_force_dim_names() -> Self {
        Self {
            force_dim_names: true,
            ..Self::default()
        }
    }

    /// Whether anonymously named dimensions are rejected.
    pub fn force_dim_names(&self) -> bool {
        self.force_dim_names
    }

    pub(crate) fn ensure_label_known(&self, label: i64) -> Result<(), ModelError> {
        if label >= 0 && label < self.allocator.var_watermark() {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable { label })
        }
    }

    /// Validate every non-sentinel label of an expression against the
    /// issued label range.
    pub(crate) fn ensure_expr_known(&self, expr: &LinearExpression) -> Result<(), ModelError> {
        for &label in expr.vars().values() {
            if label != gridopt_expr::SENTINEL {
                self.ensure_label_known(label)?;
            }
        }
        Ok(())
    }
}
