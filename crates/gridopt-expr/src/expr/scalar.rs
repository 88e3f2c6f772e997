//! Flat per-coordinate expression forms.
//!
//! The rule evaluator calls a user function once per coordinate of a
//! product index; each call returns one of these flat forms, which the
//! model then pads and assembles into full labeled arrays.

use crate::expr::constraint::ComparisonSense;
use crate::ids::SENTINEL;

/// A linear expression at a single coordinate: parallel coefficient and
/// label lists plus a constant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarExpression {
    coeffs: Vec<f64>,
    vars: Vec<i64>,
    constant: f64,
}

impl ScalarExpression {
    /// Empty expression (no terms, zero constant).
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Single term: coeff * label.
    pub fn term(label: i64, coeff: f64) -> Self {
        Self {
            coeffs: vec![coeff],
            vars: vec![label],
            constant: 0.0,
        }
    }

    /// Just a constant, no variable terms.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            constant,
            ..Self::default()
        }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn vars(&self) -> &[i64] {
        &self.vars
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn n_terms(&self) -> usize {
        self.vars.len()
    }

    /// Scale all terms and the constant.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c * by).collect(),
            vars: self.vars.clone(),
            constant: self.constant * by,
        }
    }

    /// Concatenate the terms of another expression.
    pub fn add(&self, other: &Self) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + other.coeffs.len());
        coeffs.extend_from_slice(&self.coeffs);
        coeffs.extend_from_slice(&other.coeffs);
        let mut vars = Vec::with_capacity(self.vars.len() + other.vars.len());
        vars.extend_from_slice(&self.vars);
        vars.extend_from_slice(&other.vars);
        Self {
            coeffs,
            vars,
            constant: self.constant + other.constant,
        }
    }

    /// Add a constant offset.
    pub fn add_constant(&self, value: f64) -> Self {
        Self {
            coeffs: self.coeffs.clone(),
            vars: self.vars.clone(),
            constant: self.constant + value,
        }
    }

    /// Pad with sentinel zero-coefficient terms up to `n_terms`.
    pub fn padded(&self, n_terms: usize) -> Self {
        let mut coeffs = self.coeffs.clone();
        let mut vars = self.vars.clone();
        coeffs.resize(n_terms, 0.0);
        vars.resize(n_terms, SENTINEL);
        Self {
            coeffs,
            vars,
            constant: self.constant,
        }
    }

    fn compare(&self, sense: ComparisonSense, rhs: f64) -> ScalarConstraint {
        ScalarConstraint {
            lhs: Self {
                coeffs: self.coeffs.clone(),
                vars: self.vars.clone(),
                constant: 0.0,
            },
            sense,
            rhs: rhs - self.constant,
        }
    }

    pub fn le(&self, rhs: f64) -> ScalarConstraint {
        self.compare(ComparisonSense::LessEqual, rhs)
    }

    pub fn ge(&self, rhs: f64) -> ScalarConstraint {
        self.compare(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn eq(&self, rhs: f64) -> ScalarConstraint {
        self.compare(ComparisonSense::Equal, rhs)
    }
}

impl std::ops::Add for ScalarExpression {
    type Output = ScalarExpression;

    fn add(self, rhs: ScalarExpression) -> Self::Output {
        ScalarExpression::add(&self, &rhs)
    }
}

impl std::ops::Sub for ScalarExpression {
    type Output = ScalarExpression;

    fn sub(self, rhs: ScalarExpression) -> Self::Output {
        ScalarExpression::add(&self, &rhs.scale(-1.0))
    }
}

impl std::ops::Mul<f64> for ScalarExpression {
    type Output = ScalarExpression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for ScalarExpression {
    type Output = ScalarExpression;

    fn neg(self) -> Self::Output {
        self.scale(-1.0)
    }
}

/// A constraint at a single coordinate: flat lhs, sense, scalar rhs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarConstraint {
    lhs: ScalarExpression,
    sense: ComparisonSense,
    rhs: f64,
}

impl ScalarConstraint {
    pub fn lhs(&self) -> &ScalarExpression {
        &self.lhs
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (ScalarExpression, ComparisonSense, f64) {
        (self.lhs, self.sense, self.rhs)
    }
}
