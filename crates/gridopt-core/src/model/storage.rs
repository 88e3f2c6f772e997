//! Read access to families, bounds, and counters.

use gridopt_array::LabeledArray;
use gridopt_expr::{ConFamilyId, Constraint, VarFamilyId, Variable, SENTINEL};

use crate::model::error::ModelError;
use crate::model::{ConstraintFamily, Model, VariableFamily};

impl Model {
    pub(crate) fn variable_family(
        &self,
        family: VarFamilyId,
    ) -> Result<&VariableFamily, ModelError> {
        self.variables
            .get(&family)
            .ok_or_else(|| ModelError::UnknownFamily {
                name: format!("#{}", family.inner()),
            })
    }

    pub(crate) fn constraint_family(
        &self,
        family: ConFamilyId,
    ) -> Result<&ConstraintFamily, ModelError> {
        self.constraints
            .get(&family)
            .ok_or_else(|| ModelError::UnknownConstraint {
                name: format!("#{}", family.inner()),
            })
    }

    /// Number of live (non-masked) variables.
    pub fn num_variables(&self) -> usize {
        self.variables
            .values()
            .map(|family| family.labels.values().filter(|&&l| l != SENTINEL).count())
            .sum()
    }

    /// Number of live (non-masked) constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints
            .values()
            .map(|family| family.labels.values().filter(|&&l| l != SENTINEL).count())
            .sum()
    }

    pub fn num_variable_families(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraint_families(&self) -> usize {
        self.constraints.len()
    }

    /// Lower bounds of a family, broadcast to its shape.
    pub fn lower_bounds(&self, variable: &Variable) -> Result<&LabeledArray<f64>, ModelError> {
        Ok(&self.variable_family(variable.family())?.lower)
    }

    /// Upper bounds of a family, broadcast to its shape.
    pub fn upper_bounds(&self, variable: &Variable) -> Result<&LabeledArray<f64>, ModelError> {
        Ok(&self.variable_family(variable.family())?.upper)
    }

    /// Whether the family is integer-constrained.
    pub fn is_integer(&self, variable: &Variable) -> Result<bool, ModelError> {
        Ok(self.variable_family(variable.family())?.integer)
    }

    /// Look up a registered variable family by name.
    pub fn variable_family_by_name(&self, name: &str) -> Option<Variable> {
        let family = *self.variable_names.get(name)?;
        let entry = self.variables.get(&family)?;
        Variable::new(family, entry.labels.clone()).ok()
    }

    /// Look up a registered constraint family by name.
    pub fn constraint_by_name(&self, name: &str) -> Option<Constraint> {
        let family = *self.constraint_names.get(name)?;
        let entry = self.constraints.get(&family)?;
        let anonymous = gridopt_expr::AnonymousConstraint::new(
            entry.lhs.clone(),
            entry.sense,
            entry.rhs.clone(),
        )
        .ok()?;
        Constraint::new(anonymous, entry.labels.clone(), family, entry.name.clone()).ok()
    }

    /// The family holding a variable label, if any.
    pub fn family_of_label(&self, label: i64) -> Option<VarFamilyId> {
        if label < 0 {
            return None;
        }
        self.variables
            .iter()
            .find(|(_, family)| family.labels.values().any(|&l| l == label))
            .map(|(id, _)| *id)
    }

    /// Name of a variable family, when one was supplied.
    pub fn variable_family_name(&self, family: VarFamilyId) -> Option<&str> {
        self.variables.get(&family)?.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use gridopt_array::DimIndex;

    use crate::model::{Model, VariableSpec};

    #[test]
    fn counters_skip_masked_positions() {
        let mut model = Model::new();
        let dim = DimIndex::range("time", 4);
        let mask = gridopt_array::LabeledArray::from_vec(
            dim.clone(),
            vec![true, true, false, false],
        )
        .unwrap();
        model
            .add_variables(VariableSpec::new().lower(0.0).coords([dim]).mask(mask))
            .unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_variable_families(), 1);
    }

    #[test]
    fn family_lookup_by_name_and_label() {
        let mut model = Model::new();
        let x = model
            .add_variables(
                VariableSpec::new()
                    .lower(0.0)
                    .coords([DimIndex::range("time", 3)])
                    .name("dispatch"),
            )
            .unwrap();
        let fetched = model.variable_family_by_name("dispatch").unwrap();
        assert_eq!(fetched.labels(), x.labels());

        let family = model.family_of_label(1).unwrap();
        assert_eq!(family, x.family());
        assert_eq!(model.variable_family_name(family), Some("dispatch"));
        assert!(model.family_of_label(99).is_none());
        assert!(model.family_of_label(-1).is_none());
    }

    #[test]
    fn constraint_lookup_by_name() {
        let mut model = Model::new();
        let x = model.add_variables(VariableSpec::new().lower(0.0)).unwrap();
        model
            .add_constraints(x.ge_scalar(1.0), Some("floor"), None)
            .unwrap();
        let fetched = model.constraint_by_name("floor").unwrap();
        assert_eq!(fetched.name(), "floor");
        assert!(model.constraint_by_name("ceiling").is_none());
    }
}
