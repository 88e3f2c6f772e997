//! Core expression type: aligned coefficient and label arrays plus a
//! per-coordinate constant.
//!
//! A `LinearExpression` carries two arrays of identical shape over the
//! user's outer dimensions plus an inner term axis: `coeffs` (f64) and
//! `vars` (i64 labels). At each outer coordinate the expression reads
//! `sum_k coeffs[.., k] * x(vars[.., k]) + constant[..]`. The sentinel
//! label marks absent terms; it contributes nothing regardless of its
//! coefficient, which keeps shapes rectangular across uneven term counts.

use gridopt_array::array::union_dims;
use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};

use crate::expr::constraint::{AnonymousConstraint, ComparisonSense};
use crate::ids::SENTINEL;
use crate::variable::Variable;

/// Reserved name of the inner term axis.
pub const TERM_DIM: &str = "_term";

pub(crate) fn known<T>(result: Result<T, AxisError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => unreachable!("internal shape invariant violated: {err}"),
    }
}

fn reject_term_dim(dims: &[DimIndex]) -> Result<(), AxisError> {
    if dims.iter().any(|d| d.name() == TERM_DIM) {
        return Err(AxisError::ReservedDimension {
            dim: TERM_DIM.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearExpression {
    coeffs: LabeledArray<f64>,
    vars: LabeledArray<i64>,
    constant: LabeledArray<f64>,
}

impl LinearExpression {
    /// Build an expression from aligned parts.
    ///
    /// `coeffs` and `vars` must share dims, with the term axis last;
    /// `constant` must carry exactly the outer dims.
    pub fn new(
        coeffs: LabeledArray<f64>,
        vars: LabeledArray<i64>,
        constant: LabeledArray<f64>,
    ) -> Result<Self, AxisError> {
        if coeffs.dims() != vars.dims() {
            return Err(AxisError::ShapeMismatch {
                expected: coeffs.shape().to_vec(),
                got: vars.shape().to_vec(),
            });
        }
        match coeffs.dims().last() {
            Some(last) if last.name() == TERM_DIM => {}
            _ => {
                return Err(AxisError::UnknownDimension {
                    dim: TERM_DIM.to_string(),
                })
            }
        }
        let outer = &coeffs.dims()[..coeffs.ndim() - 1];
        if constant.dims() != outer {
            return Err(AxisError::ShapeMismatch {
                expected: outer.iter().map(DimIndex::len).collect(),
                got: constant.shape().to_vec(),
            });
        }
        Ok(Self {
            coeffs,
            vars,
            constant,
        })
    }

    /// Single-term expression `coefficient * variable`.
    pub fn from_variable(variable: &Variable, coefficient: f64) -> Self {
        let vars = known(LabeledArray::stack(&[variable.labels()], TERM_DIM));
        let coeffs = known(LabeledArray::from_elem(vars.dims().to_vec(), coefficient));
        let constant = known(LabeledArray::from_elem(
            variable.labels().dims().to_vec(),
            0.0,
        ));
        Self {
            coeffs,
            vars,
            constant,
        }
    }

    /// Single-term expression with an array coefficient; dims combine as
    /// the union of the coefficient's and the variable's dims.
    pub fn from_coefficient_array(
        variable: &Variable,
        coefficient: &LabeledArray<f64>,
    ) -> Result<Self, AxisError> {
        reject_term_dim(coefficient.dims())?;
        let outer = union_dims(coefficient.dims(), variable.labels().dims())?;
        let labels = variable.labels().expand(&outer)?;
        let coeff = coefficient.expand(&outer)?;
        let vars = LabeledArray::stack(&[&labels], TERM_DIM)?;
        let coeffs = LabeledArray::stack(&[&coeff], TERM_DIM)?;
        let constant = LabeledArray::from_elem(outer, 0.0)?;
        Ok(Self {
            coeffs,
            vars,
            constant,
        })
    }

    // ── Accessors ───────────────────────────────────────────

    pub fn coeffs(&self) -> &LabeledArray<f64> {
        &self.coeffs
    }

    pub fn vars(&self) -> &LabeledArray<i64> {
        &self.vars
    }

    pub fn constant(&self) -> &LabeledArray<f64> {
        &self.constant
    }

    /// Length of the inner term axis.
    pub fn n_terms(&self) -> usize {
        self.coeffs.shape()[self.coeffs.ndim() - 1]
    }

    pub fn outer_dims(&self) -> &[DimIndex] {
        &self.coeffs.dims()[..self.coeffs.ndim() - 1]
    }

    pub fn outer_shape(&self) -> &[usize] {
        &self.coeffs.shape()[..self.coeffs.ndim() - 1]
    }

    /// Number of outer coordinates.
    pub fn outer_len(&self) -> usize {
        self.outer_shape().iter().product()
    }

    fn term_index(&self) -> &DimIndex {
        &self.coeffs.dims()[self.coeffs.ndim() - 1]
    }

    fn with_zero_constant(self) -> Self {
        let constant = self.constant.map(|_| 0.0);
        Self { constant, ..self }
    }

    fn expand_outer(&self, outer: &[DimIndex]) -> Result<Self, AxisError> {
        let mut target = outer.to_vec();
        target.push(self.term_index().clone());
        Ok(Self {
            coeffs: self.coeffs.expand(&target)?,
            vars: self.vars.expand(&target)?,
            constant: self.constant.expand(outer)?,
        })
    }

    // ── Operations ──────────────────────────────────────────

    /// Add another expression; outer dims broadcast, term axes concatenate.
    pub fn add(&self, other: &Self) -> Result<Self, AxisError> {
        let outer = union_dims(self.outer_dims(), other.outer_dims())?;
        let left = self.expand_outer(&outer)?;
        let right = other.expand_outer(&outer)?;
        let coeffs = LabeledArray::concat(&[&left.coeffs, &right.coeffs], TERM_DIM)?;
        let vars = LabeledArray::concat(&[&left.vars, &right.vars], TERM_DIM)?;
        let constant = left.constant.add(&right.constant)?;
        Ok(Self {
            coeffs,
            vars,
            constant,
        })
    }

    /// Subtract another expression.
    pub fn sub(&self, other: &Self) -> Result<Self, AxisError> {
        self.add(&other.neg())
    }

    /// Negate coefficients and constant.
    pub fn neg(&self) -> Self {
        self.scale(-1.0)
    }

    /// Scale coefficients and constant by a factor.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            coeffs: self.coeffs.scale(by),
            vars: self.vars.clone(),
            constant: self.constant.scale(by),
        }
    }

    /// Divide coefficients and constant by a scalar.
    pub fn div_scalar(&self, by: f64) -> Self {
        self.scale(1.0 / by)
    }

    /// Add a scalar to the constant.
    pub fn add_scalar(&self, value: f64) -> Self {
        Self {
            coeffs: self.coeffs.clone(),
            vars: self.vars.clone(),
            constant: self.constant.map(|c| c + value),
        }
    }

    /// Add a labeled array to the constant; dims combine as the union.
    pub fn add_array(&self, values: &LabeledArray<f64>) -> Result<Self, AxisError> {
        reject_term_dim(values.dims())?;
        let outer = union_dims(self.outer_dims(), values.dims())?;
        let expanded = self.expand_outer(&outer)?;
        let constant = expanded.constant.add(&values.expand(&outer)?)?;
        Ok(Self {
            coeffs: expanded.coeffs,
            vars: expanded.vars,
            constant,
        })
    }

    /// Multiply coefficients and constant by a labeled array; dims combine
    /// as the union.
    pub fn mul_array(&self, values: &LabeledArray<f64>) -> Result<Self, AxisError> {
        reject_term_dim(values.dims())?;
        let outer = union_dims(self.outer_dims(), values.dims())?;
        let expanded = self.expand_outer(&outer)?;
        let factor = values.expand(&outer)?;
        let coeffs = expanded.coeffs.mul(&factor.expand(expanded.coeffs.dims())?)?;
        let constant = expanded.constant.mul(&factor)?;
        Ok(Self {
            coeffs,
            vars: expanded.vars,
            constant,
        })
    }

    /// Fold an outer dimension into the term axis.
    ///
    /// The outer shape loses the dimension; the term axis grows by its
    /// length. Folding the term axis itself is rejected.
    pub fn sum_dim(&self, dim: &str) -> Result<Self, AxisError> {
        if dim == TERM_DIM {
            return Err(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            });
        }
        if self.coeffs.dim_position(dim).is_none() {
            return Err(AxisError::UnknownDimension {
                dim: dim.to_string(),
            });
        }
        let fold = |array: &LabeledArray<f64>| -> Result<LabeledArray<f64>, AxisError> {
            let moved = array.move_to_back(dim)?;
            moved.fold_trailing(moved.ndim() - 2, TERM_DIM)
        };
        let coeffs = fold(&self.coeffs)?;
        let vars = {
            let moved = self.vars.move_to_back(dim)?;
            moved.fold_trailing(moved.ndim() - 2, TERM_DIM)?
        };
        let constant = self.constant.sum_dim(dim)?;
        Ok(Self {
            coeffs,
            vars,
            constant,
        })
    }

    /// Fold every outer dimension into the term axis, leaving a
    /// zero-dimensional outer shape.
    pub fn sum(&self) -> Self {
        let coeffs = known(self.coeffs.fold_trailing(0, TERM_DIM));
        let vars = known(self.vars.fold_trailing(0, TERM_DIM));
        let constant = LabeledArray::scalar(self.constant.data().sum());
        Self {
            coeffs,
            vars,
            constant,
        }
    }

    /// Shift along an outer dimension; vacated positions become sentinel
    /// terms with zero coefficient and zero constant.
    pub fn shift(&self, dim: &str, offset: isize) -> Result<Self, AxisError> {
        if dim == TERM_DIM {
            return Err(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            });
        }
        Ok(Self {
            coeffs: self.coeffs.shift(dim, offset, 0.0)?,
            vars: self.vars.shift(dim, offset, SENTINEL)?,
            constant: self.constant.shift(dim, offset, 0.0)?,
        })
    }

    /// Select outer coordinates by key; the term axis is untouched.
    pub fn sel(&self, dim: &str, keys: &[Key]) -> Result<Self, AxisError> {
        if dim == TERM_DIM {
            return Err(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            });
        }
        Ok(Self {
            coeffs: self.coeffs.sel(dim, keys)?,
            vars: self.vars.sel(dim, keys)?,
            constant: self.constant.sel(dim, keys)?,
        })
    }

    /// Select outer coordinates by position; the term axis is untouched.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self, AxisError> {
        if dim == TERM_DIM {
            return Err(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            });
        }
        Ok(Self {
            coeffs: self.coeffs.isel(dim, positions)?,
            vars: self.vars.isel(dim, positions)?,
            constant: self.constant.isel(dim, positions)?,
        })
    }

    // ── Comparison methods (produce AnonymousConstraint) ────

    /// Compare against a scalar; the constant folds into the rhs.
    pub fn compare_scalar(
        &self,
        sense: ComparisonSense,
        rhs: f64,
    ) -> AnonymousConstraint {
        let rhs_values = self.constant.map(|c| rhs - c);
        known(AnonymousConstraint::new(
            self.clone().with_zero_constant(),
            sense,
            rhs_values,
        ))
    }

    /// Compare against a labeled array; outer dims broadcast.
    pub fn compare_array(
        &self,
        sense: ComparisonSense,
        rhs: &LabeledArray<f64>,
    ) -> Result<AnonymousConstraint, AxisError> {
        reject_term_dim(rhs.dims())?;
        let outer = union_dims(self.outer_dims(), rhs.dims())?;
        let expanded = self.expand_outer(&outer)?;
        let rhs_values = rhs.expand(&outer)?.sub(&expanded.constant)?;
        AnonymousConstraint::new(expanded.with_zero_constant(), sense, rhs_values)
    }

    /// Compare against another expression; its terms move to the lhs.
    pub fn compare_expr(
        &self,
        sense: ComparisonSense,
        rhs: &Self,
    ) -> Result<AnonymousConstraint, AxisError> {
        let combined = self.sub(rhs)?;
        let rhs_values = combined.constant.scale(-1.0);
        AnonymousConstraint::new(combined.with_zero_constant(), sense, rhs_values)
    }

    pub fn le_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.compare_scalar(ComparisonSense::LessEqual, rhs)
    }

    pub fn ge_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.compare_scalar(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn eq_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.compare_scalar(ComparisonSense::Equal, rhs)
    }

    pub fn le_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.compare_array(ComparisonSense::LessEqual, rhs)
    }

    pub fn ge_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.compare_array(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn eq_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.compare_array(ComparisonSense::Equal, rhs)
    }

    pub fn le_expr(&self, rhs: &Self) -> Result<AnonymousConstraint, AxisError> {
        self.compare_expr(ComparisonSense::LessEqual, rhs)
    }

    pub fn ge_expr(&self, rhs: &Self) -> Result<AnonymousConstraint, AxisError> {
        self.compare_expr(ComparisonSense::GreaterEqual, rhs)
    }

    pub fn eq_expr(&self, rhs: &Self) -> Result<AnonymousConstraint, AxisError> {
        self.compare_expr(ComparisonSense::Equal, rhs)
    }
}

impl std::fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dims: Vec<&str> = self.outer_dims().iter().map(DimIndex::name).collect();
        write!(
            f,
            "LinearExpression with {} term(s) over ({})",
            self.n_terms(),
            dims.join(", ")
        )
    }
}

// ── Operator overloads ──────────────────────────────────────
//
// Thin wrappers over the checked methods; they panic when operands cannot
// be aligned, matching ndarray's arithmetic on mismatched shapes.

impl std::ops::Add for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: LinearExpression) -> Self::Output {
        match LinearExpression::add(&self, &rhs) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Sub for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: LinearExpression) -> Self::Output {
        match LinearExpression::sub(&self, &rhs) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Mul<f64> for LinearExpression {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Mul<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: LinearExpression) -> Self::Output {
        rhs.scale(self)
    }
}

impl std::ops::Div<f64> for LinearExpression {
    type Output = LinearExpression;

    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl std::ops::Add<f64> for LinearExpression {
    type Output = LinearExpression;

    fn add(self, rhs: f64) -> Self::Output {
        self.add_scalar(rhs)
    }
}

impl std::ops::Sub<f64> for LinearExpression {
    type Output = LinearExpression;

    fn sub(self, rhs: f64) -> Self::Output {
        self.add_scalar(-rhs)
    }
}

impl std::ops::Neg for LinearExpression {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        LinearExpression::neg(&self)
    }
}
