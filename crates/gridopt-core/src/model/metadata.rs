//! Per-family metadata values.

use std::collections::BTreeMap;

use gridopt_expr::{ConFamilyId, VarFamilyId};

use crate::model::error::ModelError;
use crate::model::Model;

impl Model {
    /// Attach metadata to a variable family.
    pub fn set_variable_metadata(
        &mut self,
        family: VarFamilyId,
        metadata: serde_json::Value,
    ) -> Result<(), ModelError> {
        self.variable_family(family)?;
        self.variable_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(family, metadata);
        Ok(())
    }

    /// Get metadata for a variable family.
    pub fn get_variable_metadata(&self, family: VarFamilyId) -> Option<&serde_json::Value> {
        self.variable_metadata
            .as_ref()
            .and_then(|meta| meta.get(&family))
    }

    /// Attach metadata to a constraint family.
    pub fn set_constraint_metadata(
        &mut self,
        family: ConFamilyId,
        metadata: serde_json::Value,
    ) -> Result<(), ModelError> {
        self.constraint_family(family)?;
        self.constraint_metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(family, metadata);
        Ok(())
    }

    /// Get metadata for a constraint family.
    pub fn get_constraint_metadata(&self, family: ConFamilyId) -> Option<&serde_json::Value> {
        self.constraint_metadata
            .as_ref()
            .and_then(|meta| meta.get(&family))
    }
}
