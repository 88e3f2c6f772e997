//! Model builder methods for adding variables, constraints, and objectives.

use gridopt_array::array::aligned;
use gridopt_array::{DimIndex, LabeledArray};
use gridopt_expr::{
    AnonymousConstraint, ConFamilyId, Constraint, LinearExpression, VarFamilyId, Variable,
    SENTINEL,
};
use gridopt_solver::Sense;

use crate::input::{check_dims, resolve_coords, ConstantLike, CoordInput};
use crate::model::error::ModelError;
use crate::model::{ConstraintFamily, Model, Objective, VariableFamily};

/// Declaration of one variable family.
///
/// Bounds default to free (`-inf..inf`); `binary` overrides them to
/// `[0, 1]` with integrality.
#[derive(Debug, Clone, Default)]
pub struct VariableSpec {
    lower: Option<ConstantLike>,
    upper: Option<ConstantLike>,
    coords: Option<Vec<CoordInput>>,
    dims: Option<Vec<String>>,
    name: Option<String>,
    mask: Option<LabeledArray<bool>>,
    integer: bool,
    binary: bool,
}

impl VariableSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound (scalar, dense, or labeled).
    pub fn lower(mut self, value: impl Into<ConstantLike>) -> Self {
        self.lower = Some(value.into());
        self
    }

    /// Set the upper bound (scalar, dense, or labeled).
    pub fn upper(mut self, value: impl Into<ConstantLike>) -> Self {
        self.upper = Some(value.into());
        self
    }

    /// Set the coordinate indexes spanning the family shape.
    pub fn coords<I>(mut self, coords: impl IntoIterator<Item = I>) -> Self
    where
        I: Into<CoordInput>,
    {
        self.coords = Some(coords.into_iter().map(Into::into).collect());
        self
    }

    /// Override the resulting dimension names positionally.
    pub fn dims<S>(mut self, names: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.dims = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Register the family under a unique name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Exclude coordinates where the mask is false.
    pub fn mask(mut self, mask: LabeledArray<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Require integral values.
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Binary variable: integral with bounds `[0, 1]`.
    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }
}

impl Model {
    /// Register a variable family and return its Variable.
    ///
    /// Labels come from one contiguous allocation shaped by the resolved
    /// coords; masked-out coordinates receive the sentinel. Validation
    /// happens before any label is issued, so a failed call leaves the
    /// model untouched.
    pub fn add_variables(&mut self, spec: VariableSpec) -> Result<Variable, ModelError> {
        let VariableSpec {
            lower,
            upper,
            coords,
            dims,
            name,
            mask,
            integer,
            binary,
        } = spec;

        let (lower, upper, integer) = if binary {
            (
                ConstantLike::Scalar(0.0),
                ConstantLike::Scalar(1.0),
                true,
            )
        } else {
            (
                lower.unwrap_or(ConstantLike::Scalar(f64::NEG_INFINITY)),
                upper.unwrap_or(ConstantLike::Scalar(f64::INFINITY)),
                integer,
            )
        };

        let coord_dims = match &coords {
            Some(inputs) => Some(resolve_coords(inputs)?),
            None => None,
        };
        let lower = lower.normalize(coord_dims.as_deref(), false)?;
        let upper = upper.normalize(coord_dims.as_deref(), false)?;
        let (mut lower, mut upper) = aligned(&lower, &upper)?;

        if let Some(names) = dims {
            if names.len() != lower.ndim() {
                return Err(ModelError::Axis(gridopt_array::AxisError::LengthMismatch {
                    expected: lower.ndim(),
                    got: names.len(),
                }));
            }
            let renamed: Vec<DimIndex> = lower
                .dims()
                .iter()
                .zip(&names)
                .map(|(dim, name)| dim.renamed(name))
                .collect();
            lower = lower.with_dims(renamed.clone())?;
            upper = upper.with_dims(renamed)?;
        }
        check_dims(lower.dims(), self.force_dim_names())?;

        for (lo, hi) in lower.values().zip(upper.values()) {
            if lo > hi {
                return Err(ModelError::BoundsInvalid {
                    lower: *lo,
                    upper: *hi,
                });
            }
        }

        let mask = match mask {
            Some(mask) => Some(mask.expand(lower.dims())?),
            None => None,
        };
        if let Some(ref name) = name {
            if self.variable_names.contains_key(name) {
                return Err(ModelError::DuplicateName { name: name.clone() });
            }
        }

        let range = self.allocator.allocate_vars(lower.len());
        let mut labels = LabeledArray::from_parts(lower.dims().to_vec(), range.collect())?;
        if let Some(ref mask) = mask {
            labels = labels.zip_with(mask, |label, keep| if *keep { *label } else { SENTINEL })?;
        }

        let family = VarFamilyId::new(self.next_var_family);
        self.next_var_family += 1;

        tracing::debug!(
            component = "model",
            operation = "add_variables",
            status = "success",
            family = family.inner(),
            name = name.as_deref().unwrap_or(""),
            size = labels.len(),
            integer,
            "Added variable family"
        );

        if let Some(ref name) = name {
            self.variable_names.insert(name.clone(), family);
        }
        self.variables.insert(
            family,
            VariableFamily {
                name,
                labels: labels.clone(),
                lower,
                upper,
                integer,
            },
        );

        Variable::new(family, labels).map_err(Into::into)
    }

    /// Register an anonymous constraint, assigning constraint labels.
    ///
    /// Every referenced variable label must have been issued by this
    /// model. The family name defaults to `con{k}`; masked-out positions
    /// receive the sentinel and are excluded from export.
    pub fn add_constraints(
        &mut self,
        constraint: AnonymousConstraint,
        name: Option<&str>,
        mask: Option<&LabeledArray<bool>>,
    ) -> Result<Constraint, ModelError> {
        self.ensure_expr_known(constraint.lhs())?;
        check_dims(constraint.dims(), self.force_dim_names())?;

        let name = match name {
            Some(name) => name.to_string(),
            None => format!("con{}", self.next_con_family),
        };
        if self.constraint_names.contains_key(&name) {
            return Err(ModelError::DuplicateName { name });
        }
        let mask = match mask {
            Some(mask) => Some(mask.expand(constraint.dims())?),
            None => None,
        };

        let range = self.allocator.allocate_cons(constraint.rhs().len());
        let mut labels = LabeledArray::from_parts(constraint.dims().to_vec(), range.collect())?;
        if let Some(ref mask) = mask {
            labels = labels.zip_with(mask, |label, keep| if *keep { *label } else { SENTINEL })?;
        }

        let family = ConFamilyId::new(self.next_con_family);
        self.next_con_family += 1;

        tracing::debug!(
            component = "model",
            operation = "add_constraints",
            status = "success",
            family = family.inner(),
            name = name.as_str(),
            size = labels.len(),
            sense = constraint.sense().as_str(),
            "Added constraint family"
        );

        self.constraints.insert(
            family,
            ConstraintFamily {
                name: name.clone(),
                labels: labels.clone(),
                lhs: constraint.lhs().clone(),
                sense: constraint.sense(),
                rhs: constraint.rhs().clone(),
            },
        );
        self.constraint_names.insert(name.clone(), family);

        Constraint::new(constraint, labels, family, name).map_err(Into::into)
    }

    /// Register a constraint from its parts: lhs expression, sense, rhs.
    pub fn add_constraints_from_parts(
        &mut self,
        lhs: &LinearExpression,
        sense: gridopt_expr::ComparisonSense,
        rhs: impl Into<ConstantLike>,
        name: Option<&str>,
    ) -> Result<Constraint, ModelError> {
        let constraint = match rhs.into() {
            ConstantLike::Scalar(value) => lhs.compare_scalar(sense, value),
            other => {
                let rhs = other.normalize(None, self.force_dim_names())?;
                lhs.compare_array(sense, &rhs)?
            }
        };
        self.add_constraints(constraint, name, None)
    }

    /// Set the objective; fails if one is already set.
    ///
    /// The expression must be zero-dimensional at the outer level; sum
    /// residual dims explicitly before passing it in.
    pub fn add_objective(&mut self, expr: LinearExpression, sense: Sense) -> Result<(), ModelError> {
        if self.objective.is_some() {
            return Err(ModelError::ObjectiveExists);
        }
        self.set_objective_inner(expr, sense)
    }

    /// Set the objective, replacing any existing one.
    pub fn replace_objective(
        &mut self,
        expr: LinearExpression,
        sense: Sense,
    ) -> Result<(), ModelError> {
        self.set_objective_inner(expr, sense)
    }

    fn set_objective_inner(&mut self, expr: LinearExpression, sense: Sense) -> Result<(), ModelError> {
        if !expr.outer_dims().is_empty() {
            return Err(ModelError::ObjectiveNotScalar {
                dims: expr
                    .outer_dims()
                    .iter()
                    .map(|dim| dim.name().to_string())
                    .collect(),
            });
        }
        self.ensure_expr_known(&expr)?;
        tracing::debug!(
            component = "model",
            operation = "add_objective",
            status = "success",
            sense = sense.as_str(),
            terms = expr.n_terms(),
            "Set objective"
        );
        self.objective = Some(Objective { expr, sense });
        Ok(())
    }

    /// Remove a constraint family by name. Its labels are not reused.
    pub fn remove_constraints(&mut self, name: &str) -> Result<(), ModelError> {
        let family = self
            .constraint_names
            .remove(name)
            .ok_or_else(|| ModelError::UnknownConstraint {
                name: name.to_string(),
            })?;
        self.constraints.remove(&family);
        tracing::debug!(
            component = "model",
            operation = "remove_constraints",
            status = "success",
            family = family.inner(),
            name,
            "Removed constraint family"
        );
        Ok(())
    }
}
