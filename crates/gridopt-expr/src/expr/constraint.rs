//! Constraints: a linear lhs, a comparison sense, and a labeled rhs.

use gridopt_array::{AxisError, DimIndex, LabeledArray};

use crate::expr::core::LinearExpression;
use crate::ids::ConFamilyId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }
}

impl std::fmt::Display for ComparisonSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A constraint not yet registered with a model.
///
/// The triple is immutable: fields are private and only readable, so the
/// lhs, sense, and rhs recorded at comparison time cannot drift before
/// registration. The lhs constant is always zero; comparison folds it
/// into the rhs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousConstraint {
    lhs: LinearExpression,
    sense: ComparisonSense,
    rhs: LabeledArray<f64>,
}

impl AnonymousConstraint {
    /// Build from aligned parts; the rhs must carry exactly the lhs outer
    /// dims.
    pub fn new(
        lhs: LinearExpression,
        sense: ComparisonSense,
        rhs: LabeledArray<f64>,
    ) -> Result<Self, AxisError> {
        if rhs.dims() != lhs.outer_dims() {
            return Err(AxisError::ShapeMismatch {
                expected: lhs.outer_shape().to_vec(),
                got: rhs.shape().to_vec(),
            });
        }
        Ok(Self { lhs, sense, rhs })
    }

    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> &LabeledArray<f64> {
        &self.rhs
    }

    pub fn dims(&self) -> &[DimIndex] {
        self.lhs.outer_dims()
    }

    pub fn shape(&self) -> &[usize] {
        self.lhs.outer_shape()
    }

    pub fn into_parts(self) -> (LinearExpression, ComparisonSense, LabeledArray<f64>) {
        (self.lhs, self.sense, self.rhs)
    }
}

/// A constraint registered with a model: the anonymous triple plus the
/// constraint labels the model assigned.
#[derive(Debug, Clone)]
pub struct Constraint {
    anonymous: AnonymousConstraint,
    labels: LabeledArray<i64>,
    family: ConFamilyId,
    name: String,
}

impl Constraint {
    /// Bind an anonymous constraint to model-assigned labels.
    ///
    /// The label array must match the constraint shape.
    pub fn new(
        anonymous: AnonymousConstraint,
        labels: LabeledArray<i64>,
        family: ConFamilyId,
        name: impl Into<String>,
    ) -> Result<Self, AxisError> {
        if labels.dims() != anonymous.dims() {
            return Err(AxisError::ShapeMismatch {
                expected: anonymous.shape().to_vec(),
                got: labels.shape().to_vec(),
            });
        }
        Ok(Self {
            anonymous,
            labels,
            family,
            name: name.into(),
        })
    }

    pub fn lhs(&self) -> &LinearExpression {
        self.anonymous.lhs()
    }

    pub fn sense(&self) -> ComparisonSense {
        self.anonymous.sense()
    }

    pub fn rhs(&self) -> &LabeledArray<f64> {
        self.anonymous.rhs()
    }

    pub fn labels(&self) -> &LabeledArray<i64> {
        &self.labels
    }

    pub fn family(&self) -> ConFamilyId {
        self.family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dims(&self) -> &[DimIndex] {
        self.anonymous.dims()
    }

    pub fn shape(&self) -> &[usize] {
        self.anonymous.shape()
    }

    pub fn anonymous(&self) -> &AnonymousConstraint {
        &self.anonymous
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use gridopt_array::LabeledArray;

    use crate::expr::core::LinearExpression;
    use crate::ids::{ConFamilyId, VarFamilyId};
    use crate::variable::Variable;

    use super::{AnonymousConstraint, ComparisonSense, Constraint};

    fn scalar_expr() -> LinearExpression {
        let x = Variable::new(VarFamilyId::new(0), LabeledArray::scalar(0)).unwrap();
        LinearExpression::from_variable(&x, 1.0)
    }

    #[test]
    fn sense_as_str() {
        assert_eq!(ComparisonSense::LessEqual.as_str(), "le");
        assert_eq!(ComparisonSense::GreaterEqual.as_str(), "ge");
        assert_eq!(ComparisonSense::Equal.as_str(), "eq");
    }

    #[test]
    fn anonymous_constraint_exposes_parts() {
        let con = AnonymousConstraint::new(
            scalar_expr(),
            ComparisonSense::LessEqual,
            LabeledArray::scalar(10.0),
        )
        .unwrap();
        assert_eq!(con.sense(), ComparisonSense::LessEqual);
        assert_eq!(con.rhs().item(), Some(&10.0));

        let (lhs, sense, rhs) = con.into_parts();
        assert_eq!(sense, ComparisonSense::LessEqual);
        assert_eq!(rhs.item(), Some(&10.0));
        assert_eq!(lhs.n_terms(), 1);
    }

    #[test]
    fn rhs_shape_must_match() {
        let rhs = LabeledArray::from_vec(gridopt_array::DimIndex::range("time", 2), vec![1.0, 2.0])
            .unwrap();
        let result = AnonymousConstraint::new(scalar_expr(), ComparisonSense::Equal, rhs);
        assert!(result.is_err());
    }

    #[test]
    fn bound_constraint_checks_label_shape() {
        let anon = AnonymousConstraint::new(
            scalar_expr(),
            ComparisonSense::Equal,
            LabeledArray::scalar(0.0),
        )
        .unwrap();
        let bound = Constraint::new(
            anon.clone(),
            LabeledArray::scalar(0),
            ConFamilyId::new(0),
            "balance",
        )
        .unwrap();
        assert_eq!(bound.name(), "balance");
        assert_eq!(bound.labels().item(), Some(&0));

        let wrong =
            LabeledArray::from_vec(gridopt_array::DimIndex::range("time", 2), vec![0, 1]).unwrap();
        assert!(Constraint::new(anon, wrong, ConFamilyId::new(0), "bad").is_err());
    }
}
