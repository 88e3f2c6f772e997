//! Linear expressions over labeled arrays.
//!
//! - `core`       — LinearExpression: aligned coefficient and label arrays
//! - `constraint` — comparison senses, anonymous and bound constraints
//! - `scalar`     — flat per-coordinate forms for the rule evaluator

pub mod constraint;
pub mod core;
pub mod scalar;

pub use constraint::{AnonymousConstraint, ComparisonSense, Constraint};
pub use core::{LinearExpression, TERM_DIM};
pub use scalar::{ScalarConstraint, ScalarExpression};
