//! Expression types for labeled optimization modeling.
//!
//! - `ids`      — family handles and integer label spaces
//! - `variable` — Variable: a labeled array of variable labels
//! - `expr`     — LinearExpression, comparisons, constraints, scalar forms

pub mod expr;
pub mod ids;
pub mod variable;

pub use expr::{
    AnonymousConstraint, ComparisonSense, Constraint, LinearExpression, ScalarConstraint,
    ScalarExpression, TERM_DIM,
};
pub use ids::{ConFamilyId, ConLabel, VarFamilyId, VarLabel, SENTINEL};
pub use variable::{ScalarVariable, Variable};
