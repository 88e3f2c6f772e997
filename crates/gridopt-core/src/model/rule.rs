//! Parallel and rule-based expression builders.

use itertools::Itertools;

use gridopt_array::array::union_dims;
use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};
use gridopt_expr::{
    AnonymousConstraint, Constraint, LinearExpression, ScalarConstraint, ScalarExpression,
    Variable, TERM_DIM,
};

use crate::input::{check_dims, resolve_coords, ConstantLike, CoordInput};
use crate::model::error::ModelError;
use crate::model::Model;

fn coordinate_product(dims: &[DimIndex]) -> Vec<Vec<Key>> {
    if dims.is_empty() {
        // A zero-dimensional product has exactly one (empty) point.
        return vec![Vec::new()];
    }
    dims.iter()
        .map(|dim| dim.keys().to_vec().into_iter())
        .multi_cartesian_product()
        .collect()
}

impl Model {
    /// Build `c1*v1 + c2*v2 + ...` in one pass.
    ///
    /// All coefficient and label arrays are aligned to the common
    /// broadcast shape and stacked along a fresh term axis, so the result
    /// has exactly one term per pair.
    pub fn linexpr(
        &self,
        terms: &[(ConstantLike, &Variable)],
    ) -> Result<LinearExpression, ModelError> {
        if terms.is_empty() {
            return Err(ModelError::Axis(AxisError::LengthMismatch {
                expected: 1,
                got: 0,
            }));
        }

        let mut dims: Vec<DimIndex> = Vec::new();
        let mut coefficients = Vec::with_capacity(terms.len());
        for (coefficient, variable) in terms {
            let coefficient = coefficient.normalize(None, self.force_dim_names())?;
            dims = union_dims(&dims, coefficient.dims())?;
            dims = union_dims(&dims, variable.labels().dims())?;
            coefficients.push(coefficient);
        }

        let coefficients: Vec<LabeledArray<f64>> = coefficients
            .iter()
            .map(|c| c.expand(&dims))
            .collect::<Result<_, _>>()?;
        let labels: Vec<LabeledArray<i64>> = terms
            .iter()
            .map(|(_, variable)| variable.labels().expand(&dims))
            .collect::<Result<_, _>>()?;

        let coeffs = LabeledArray::stack(&coefficients.iter().collect::<Vec<_>>(), TERM_DIM)?;
        let vars = LabeledArray::stack(&labels.iter().collect::<Vec<_>>(), TERM_DIM)?;
        let constant = LabeledArray::from_elem(dims, 0.0)?;
        LinearExpression::new(coeffs, vars, constant).map_err(Into::into)
    }

    /// Build an expression by evaluating `rule` at every point of the
    /// coordinate product, in row-major order.
    ///
    /// Per-point term counts are padded with sentinel terms up to the
    /// longest return value.
    pub fn linexpr_rule<F>(
        &self,
        coords: &[CoordInput],
        rule: F,
    ) -> Result<LinearExpression, ModelError>
    where
        F: Fn(&Model, &[Key]) -> ScalarExpression,
    {
        let dims = resolve_coords(coords)?;
        check_dims(&dims, self.force_dim_names())?;
        let points = coordinate_product(&dims);
        let exprs: Vec<ScalarExpression> =
            points.iter().map(|point| rule(self, point)).collect();

        let n_terms = exprs.iter().map(ScalarExpression::n_terms).max().unwrap_or(1).max(1);
        let mut coeffs_flat = Vec::with_capacity(exprs.len() * n_terms);
        let mut vars_flat = Vec::with_capacity(exprs.len() * n_terms);
        let mut constant_flat = Vec::with_capacity(exprs.len());
        for expr in &exprs {
            let padded = expr.padded(n_terms);
            coeffs_flat.extend_from_slice(padded.coeffs());
            vars_flat.extend_from_slice(padded.vars());
            constant_flat.push(expr.constant());
        }

        let mut term_dims = dims.clone();
        term_dims.push(DimIndex::range(TERM_DIM, n_terms));
        let coeffs = LabeledArray::from_parts(term_dims.clone(), coeffs_flat)?;
        let vars = LabeledArray::from_parts(term_dims, vars_flat)?;
        let constant = LabeledArray::from_parts(dims, constant_flat)?;
        LinearExpression::new(coeffs, vars, constant).map_err(Into::into)
    }

    /// Build and register a constraint family by evaluating `rule` at
    /// every point of the coordinate product.
    ///
    /// All points must agree on the comparison sense.
    pub fn add_constraints_rule<F>(
        &mut self,
        coords: &[CoordInput],
        rule: F,
        name: Option<&str>,
    ) -> Result<Constraint, ModelError>
    where
        F: Fn(&Model, &[Key]) -> ScalarConstraint,
    {
        let dims = resolve_coords(coords)?;
        check_dims(&dims, self.force_dim_names())?;
        let points = coordinate_product(&dims);
        let constraints: Vec<ScalarConstraint> =
            points.iter().map(|point| rule(self, point)).collect();

        let sense = match constraints.first() {
            Some(first) => first.sense(),
            None => {
                return Err(ModelError::Axis(AxisError::LengthMismatch {
                    expected: 1,
                    got: 0,
                }))
            }
        };
        if constraints.iter().any(|c| c.sense() != sense) {
            return Err(ModelError::MixedSenses);
        }

        let n_terms = constraints
            .iter()
            .map(|c| c.lhs().n_terms())
            .max()
            .unwrap_or(1)
            .max(1);
        let mut coeffs_flat = Vec::with_capacity(constraints.len() * n_terms);
        let mut vars_flat = Vec::with_capacity(constraints.len() * n_terms);
        let mut rhs_flat = Vec::with_capacity(constraints.len());
        for constraint in &constraints {
            let padded = constraint.lhs().padded(n_terms);
            coeffs_flat.extend_from_slice(padded.coeffs());
            vars_flat.extend_from_slice(padded.vars());
            rhs_flat.push(constraint.rhs());
        }

        let mut term_dims = dims.clone();
        term_dims.push(DimIndex::range(TERM_DIM, n_terms));
        let coeffs = LabeledArray::from_parts(term_dims.clone(), coeffs_flat)?;
        let vars = LabeledArray::from_parts(term_dims, vars_flat)?;
        let constant = LabeledArray::from_elem(dims.clone(), 0.0)?;
        let rhs = LabeledArray::from_parts(dims, rhs_flat)?;

        let lhs = LinearExpression::new(coeffs, vars, constant)?;
        let anonymous = AnonymousConstraint::new(lhs, sense, rhs)?;
        self.add_constraints(anonymous, name, None)
    }
}
