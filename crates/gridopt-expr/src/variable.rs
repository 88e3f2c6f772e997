//! Decision variables as labeled arrays of integer labels.

use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};

use crate::expr::constraint::AnonymousConstraint;
use crate::expr::core::{LinearExpression, TERM_DIM};
use crate::expr::scalar::ScalarExpression;
use crate::ids::{VarFamilyId, SENTINEL};

/// A labeled array of variable labels, tied to one registered family.
///
/// Variables are lightweight views: selection and shifting return new
/// Variables sharing the family id, never mutating label state. All
/// arithmetic promotes to [`LinearExpression`].
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    labels: LabeledArray<i64>,
    family: VarFamilyId,
}

impl Variable {
    /// Wrap a label array; the reserved term dim may not appear.
    pub fn new(family: VarFamilyId, labels: LabeledArray<i64>) -> Result<Self, AxisError> {
        if labels.dim_position(TERM_DIM).is_some() {
            return Err(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            });
        }
        Ok(Self { labels, family })
    }

    pub fn labels(&self) -> &LabeledArray<i64> {
        &self.labels
    }

    pub fn family(&self) -> VarFamilyId {
        self.family
    }

    pub fn dims(&self) -> &[DimIndex] {
        self.labels.dims()
    }

    pub fn dim_names(&self) -> Vec<&str> {
        self.labels.dim_names()
    }

    pub fn shape(&self) -> &[usize] {
        self.labels.shape()
    }

    pub fn ndim(&self) -> usize {
        self.labels.ndim()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Scalar handle at one coordinate key per dimension.
    pub fn at(&self, keys: &[Key]) -> Result<ScalarVariable, AxisError> {
        let label = self.labels.get(keys)?;
        Ok(ScalarVariable { label: *label })
    }

    /// Select coordinates along a dim by key.
    pub fn sel(&self, dim: &str, keys: &[Key]) -> Result<Self, AxisError> {
        Ok(Self {
            labels: self.labels.sel(dim, keys)?,
            family: self.family,
        })
    }

    /// Select positions along a dim.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self, AxisError> {
        Ok(Self {
            labels: self.labels.isel(dim, positions)?,
            family: self.family,
        })
    }

    /// Shift along a dim; vacated positions become sentinel.
    pub fn shift(&self, dim: &str, offset: isize) -> Result<Self, AxisError> {
        Ok(Self {
            labels: self.labels.shift(dim, offset, SENTINEL)?,
            family: self.family,
        })
    }

    /// Keep labels where the mask holds; sentinel elsewhere.
    pub fn where_mask(&self, mask: &LabeledArray<bool>) -> Result<Self, AxisError> {
        let labels = self
            .labels
            .zip_with(mask, |label, keep| if *keep { *label } else { SENTINEL })?;
        Ok(Self {
            labels,
            family: self.family,
        })
    }

    /// Promote to a one-term expression `coefficient * self`.
    pub fn to_linexpr(&self, coefficient: f64) -> LinearExpression {
        LinearExpression::from_variable(self, coefficient)
    }

    /// Promote with an array coefficient; dims combine as the union.
    pub fn mul_array(&self, coefficient: &LabeledArray<f64>) -> Result<LinearExpression, AxisError> {
        LinearExpression::from_coefficient_array(self, coefficient)
    }

    /// Sum over every dimension.
    pub fn sum(&self) -> LinearExpression {
        self.to_linexpr(1.0).sum()
    }

    /// Sum over one dimension.
    pub fn sum_dim(&self, dim: &str) -> Result<LinearExpression, AxisError> {
        self.to_linexpr(1.0).sum_dim(dim)
    }

    pub fn le_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.to_linexpr(1.0).le_scalar(rhs)
    }

    pub fn ge_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.to_linexpr(1.0).ge_scalar(rhs)
    }

    pub fn eq_scalar(&self, rhs: f64) -> AnonymousConstraint {
        self.to_linexpr(1.0).eq_scalar(rhs)
    }

    pub fn le_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).le_array(rhs)
    }

    pub fn ge_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).ge_array(rhs)
    }

    pub fn eq_array(&self, rhs: &LabeledArray<f64>) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).eq_array(rhs)
    }

    pub fn le_expr(&self, rhs: &LinearExpression) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).le_expr(rhs)
    }

    pub fn ge_expr(&self, rhs: &LinearExpression) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).ge_expr(rhs)
    }

    pub fn eq_expr(&self, rhs: &LinearExpression) -> Result<AnonymousConstraint, AxisError> {
        self.to_linexpr(1.0).eq_expr(rhs)
    }
}

/// A handle to a single scalar variable, identified by its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalarVariable {
    label: i64,
}

impl ScalarVariable {
    pub fn new(label: i64) -> Self {
        Self { label }
    }

    pub fn label(self) -> i64 {
        self.label
    }

    pub fn is_sentinel(self) -> bool {
        self.label == SENTINEL
    }

    /// Promote to a flat one-term expression.
    pub fn to_expr(self, coefficient: f64) -> ScalarExpression {
        ScalarExpression::term(self.label, coefficient)
    }
}

// ── Operator overloads ──────────────────────────────────────
//
// Thin wrappers over the promotion methods; alignment failures panic as
// in ndarray arithmetic.

impl std::ops::Mul<f64> for &Variable {
    type Output = LinearExpression;

    fn mul(self, rhs: f64) -> Self::Output {
        self.to_linexpr(rhs)
    }
}

impl std::ops::Mul<&Variable> for f64 {
    type Output = LinearExpression;

    fn mul(self, rhs: &Variable) -> Self::Output {
        rhs.to_linexpr(self)
    }
}

impl std::ops::Div<f64> for &Variable {
    type Output = LinearExpression;

    fn div(self, rhs: f64) -> Self::Output {
        self.to_linexpr(1.0 / rhs)
    }
}

impl std::ops::Neg for &Variable {
    type Output = LinearExpression;

    fn neg(self) -> Self::Output {
        self.to_linexpr(-1.0)
    }
}

impl std::ops::Add<&Variable> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: &Variable) -> Self::Output {
        match LinearExpression::add(&self.to_linexpr(1.0), &rhs.to_linexpr(1.0)) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Sub<&Variable> for &Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: &Variable) -> Self::Output {
        match LinearExpression::sub(&self.to_linexpr(1.0), &rhs.to_linexpr(1.0)) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Add<LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn add(self, rhs: LinearExpression) -> Self::Output {
        match LinearExpression::add(&self.to_linexpr(1.0), &rhs) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Sub<LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn sub(self, rhs: LinearExpression) -> Self::Output {
        match LinearExpression::sub(&self.to_linexpr(1.0), &rhs) {
            Ok(expr) => expr,
            Err(err) => panic!("{err}"),
        }
    }
}

impl std::ops::Mul<ScalarVariable> for f64 {
    type Output = ScalarExpression;

    fn mul(self, rhs: ScalarVariable) -> Self::Output {
        rhs.to_expr(self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};

    use crate::ids::{VarFamilyId, SENTINEL};

    use super::Variable;

    fn time() -> DimIndex {
        DimIndex::range("time", 4)
    }

    fn x() -> Variable {
        Variable::new(
            VarFamilyId::new(0),
            LabeledArray::from_vec(time(), vec![0, 1, 2, 3]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn term_dim_name_is_reserved() {
        let labels = LabeledArray::from_vec(DimIndex::range("_term", 2), vec![0, 1]).unwrap();
        let result = Variable::new(VarFamilyId::new(0), labels);
        assert!(matches!(result, Err(AxisError::ReservedDimension { .. })));
    }

    #[test]
    fn at_returns_scalar_handle() {
        let handle = x().at(&[Key::Int(2)]).unwrap();
        assert_eq!(handle.label(), 2);
        assert!(!handle.is_sentinel());
    }

    #[test]
    fn sel_shares_family() {
        let picked = x().sel("time", &[Key::Int(1), Key::Int(3)]).unwrap();
        assert_eq!(picked.family(), x().family());
        assert_eq!(picked.labels().ravel(), vec![1, 3]);
    }

    #[test]
    fn shift_fills_with_sentinel() {
        let shifted = x().shift("time", 1).unwrap();
        assert_eq!(shifted.labels().ravel(), vec![SENTINEL, 0, 1, 2]);
    }

    #[test]
    fn where_mask_blanks_positions() {
        let mask =
            LabeledArray::from_vec(time(), vec![true, false, true, false]).unwrap();
        let masked = x().where_mask(&mask).unwrap();
        assert_eq!(masked.labels().ravel(), vec![0, SENTINEL, 2, SENTINEL]);
    }

    #[test]
    fn operator_promotion() {
        let var = x();
        let expr = 3.0 * &var;
        assert_eq!(expr.n_terms(), 1);
        assert_eq!(expr.coeffs().ravel(), vec![3.0; 4]);

        let negated = -&var;
        assert_eq!(negated.coeffs().ravel(), vec![-1.0; 4]);
    }

    #[test]
    fn variable_difference() {
        let var = x();
        let diff = &var - &var.shift("time", 1).unwrap();
        assert_eq!(diff.n_terms(), 2);
        assert_eq!(
            diff.vars().ravel(),
            vec![0, SENTINEL, 1, 0, 2, 1, 3, 2]
        );
    }

    #[test]
    fn mul_array_broadcasts_new_dims() {
        let var = x();
        let region =
            DimIndex::new("region", vec![Key::from("a"), Key::from("b")]).unwrap();
        let factor = LabeledArray::from_vec(region, vec![1.0, 2.0]).unwrap();
        let expr = var.mul_array(&factor).unwrap();
        assert_eq!(expr.outer_shape(), &[2, 4]);
        assert_eq!(
            expr.outer_dims().iter().map(|d| d.name()).collect::<Vec<_>>(),
            vec!["region", "time"]
        );
    }
}
