//! Options passed through to solver adapters.

use std::collections::BTreeMap;

/// A single option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Flag(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Real(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// An ordered option map handed to the adapter at solve time.
///
/// The core does not interpret the entries; each adapter reads the keys
/// it understands and ignores the rest. `time_limit` gets a typed
/// accessor because it is the one option most back-ends share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    options: BTreeMap<String, OptionValue>,
}

impl SolverConfig {
    /// Empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any previous value under the key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Read an option by key.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// The `time_limit` option in seconds, when set to a numeric value.
    pub fn time_limit(&self) -> Option<f64> {
        match self.options.get("time_limit") {
            Some(OptionValue::Real(seconds)) => Some(*seconds),
            Some(OptionValue::Int(seconds)) => Some(*seconds as f64),
            _ => None,
        }
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.options.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{OptionValue, SolverConfig};

    #[test]
    fn new_config_is_empty() {
        let config = SolverConfig::new();
        assert!(config.is_empty());
        assert_eq!(config.len(), 0);
    }

    #[test]
    fn set_and_get_by_key() {
        let config = SolverConfig::new()
            .set("presolve", true)
            .set("threads", 4i64)
            .set("method", "dual");
        assert_eq!(config.get("presolve"), Some(&OptionValue::Flag(true)));
        assert_eq!(config.get("threads"), Some(&OptionValue::Int(4)));
        assert_eq!(
            config.get("method"),
            Some(&OptionValue::Text("dual".to_string()))
        );
        assert_eq!(config.get("gap"), None);
    }

    #[test]
    fn set_replaces_previous_value() {
        let config = SolverConfig::new().set("threads", 1i64).set("threads", 8i64);
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("threads"), Some(&OptionValue::Int(8)));
    }

    #[test]
    fn time_limit_accessor_accepts_numeric_kinds() {
        assert_eq!(
            SolverConfig::new().set("time_limit", 30.0).time_limit(),
            Some(30.0)
        );
        assert_eq!(
            SolverConfig::new().set("time_limit", 30i64).time_limit(),
            Some(30.0)
        );
        assert_eq!(
            SolverConfig::new().set("time_limit", "soon").time_limit(),
            None
        );
        assert_eq!(SolverConfig::new().time_limit(), None);
    }

    #[test]
    fn iteration_follows_key_order() {
        let config = SolverConfig::new().set("b", 1i64).set("a", 2i64);
        let keys: Vec<&str> = config.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
