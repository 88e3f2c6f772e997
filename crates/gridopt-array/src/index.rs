//! Named dimensions with ordered coordinate indexes.

use std::collections::BTreeMap;

use crate::error::AxisError;
use crate::key::Key;

/// A named dimension: an ordered, duplicate-free index of coordinate keys.
///
/// Equality of two `DimIndex` values requires the same name and the same
/// keys in the same order; alignment of labeled arrays is defined in terms
/// of this equality.
#[derive(Debug, Clone)]
pub struct DimIndex {
    name: String,
    keys: Vec<Key>,
    positions: BTreeMap<Key, usize>,
}

impl DimIndex {
    /// Create a dimension from a name and coordinate keys.
    ///
    /// Keys must be unique within the dimension.
    pub fn new(name: impl Into<String>, keys: Vec<Key>) -> Result<Self, AxisError> {
        let name = name.into();
        let mut positions = BTreeMap::new();
        for (position, key) in keys.iter().enumerate() {
            if positions.insert(key.clone(), position).is_some() {
                return Err(AxisError::DuplicateKey {
                    dim: name,
                    key: key.to_string(),
                });
            }
        }
        Ok(Self {
            name,
            keys,
            positions,
        })
    }

    /// Dimension indexed by the integers `0..len`.
    pub fn range(name: impl Into<String>, len: usize) -> Self {
        let keys = (0..len as i64).map(Key::Int).collect();
        // Integer ranges cannot contain duplicates.
        Self::new(name, keys).unwrap_or_else(|_| unreachable!())
    }

    /// Anonymous placeholder dimension `dim_{ordinal}` indexed by `0..len`.
    pub fn anonymous(ordinal: usize, len: usize) -> Self {
        Self::range(format!("dim_{ordinal}"), len)
    }

    /// Whether the name matches the anonymous `dim_{i}` pattern.
    pub fn is_anonymous(&self) -> bool {
        self.name
            .strip_prefix("dim_")
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Position of a key within the index.
    pub fn position(&self, key: &Key) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Copy of this index under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: self.keys.clone(),
            positions: self.positions.clone(),
        }
    }

    /// Sub-index retaining `keys` in the order given.
    pub fn subset(&self, keys: &[Key]) -> Result<(Self, Vec<usize>), AxisError> {
        let mut picked = Vec::with_capacity(keys.len());
        for key in keys {
            match self.position(key) {
                Some(position) => picked.push(position),
                None => {
                    return Err(AxisError::UnknownKey {
                        dim: self.name.clone(),
                        key: key.to_string(),
                    })
                }
            }
        }
        let index = Self::new(self.name.clone(), keys.to_vec())?;
        Ok((index, picked))
    }
}

impl PartialEq for DimIndex {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.keys == other.keys
    }
}

impl Eq for DimIndex {}

#[cfg(test)]
mod tests {
    use super::DimIndex;
    use crate::error::AxisError;
    use crate::key::Key;

    #[test]
    fn range_index_positions() {
        let dim = DimIndex::range("time", 4);
        assert_eq!(dim.len(), 4);
        assert_eq!(dim.position(&Key::Int(2)), Some(2));
        assert_eq!(dim.position(&Key::Int(4)), None);
    }

    #[test]
    fn duplicate_keys_rejected() {
        let result = DimIndex::new("region", vec![Key::from("a"), Key::from("a")]);
        assert!(matches!(result, Err(AxisError::DuplicateKey { .. })));
    }

    #[test]
    fn anonymous_detection() {
        assert!(DimIndex::anonymous(0, 3).is_anonymous());
        assert!(DimIndex::anonymous(12, 3).is_anonymous());
        assert!(!DimIndex::range("time", 3).is_anonymous());
        assert!(!DimIndex::range("dim_", 3).is_anonymous());
        assert!(!DimIndex::range("dim_x", 3).is_anonymous());
    }

    #[test]
    fn subset_preserves_request_order() {
        let dim = DimIndex::range("time", 5);
        let (sub, positions) = dim.subset(&[Key::Int(3), Key::Int(1)]).unwrap();
        assert_eq!(positions, vec![3, 1]);
        assert_eq!(sub.keys(), &[Key::Int(3), Key::Int(1)]);
    }

    #[test]
    fn subset_unknown_key_names_dim() {
        let dim = DimIndex::range("time", 2);
        let err = dim.subset(&[Key::Int(9)]).unwrap_err();
        assert_eq!(err.code(), "AXIS_UNKNOWN_KEY");
        assert!(err.to_string().contains("time"));
    }

    #[test]
    fn equality_requires_name_and_keys() {
        let a = DimIndex::range("time", 3);
        let b = DimIndex::range("time", 3);
        let c = DimIndex::range("step", 3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
