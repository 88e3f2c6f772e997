//! Model container for labeled array-shaped optimization problems.
//!
//! Variables are declared per family with named coordinate dims, composed
//! into linear expressions by broadcasting arithmetic, compared into
//! constraints, and exported as a deterministic matrix view for a solver
//! adapter.

pub mod input;
pub mod model;

pub use input::{ConstantLike, CoordInput};
pub use model::{Model, ModelError, VariableSpec};

pub use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};
pub use gridopt_expr::{
    AnonymousConstraint, ComparisonSense, ConFamilyId, ConLabel, Constraint, LinearExpression,
    ScalarConstraint, ScalarExpression, ScalarVariable, VarFamilyId, VarLabel, Variable, SENTINEL,
    TERM_DIM,
};
pub use gridopt_solver::{
    MatrixView, OptionValue, Sense, SolverAdapter, SolverConfig, SolverError, SolverOutcome,
    SolverStatus,
};
