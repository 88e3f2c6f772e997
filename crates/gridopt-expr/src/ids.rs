//! Family handles and label spaces.
//!
//! Families are registry entries (one per `add_variables` /
//! `add_constraints` call); labels name one scalar variable or constraint
//! in the solver's matrix. Label arrays store raw `i64` with [`SENTINEL`]
//! marking absent positions; the newtypes wrap live labels at the solver
//! boundary.

/// Sentinel label marking an absent or masked term/position.
pub const SENTINEL: i64 = -1;

macro_rules! define_family_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

macro_rules! define_label_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Get the inner i64 value.
            pub fn inner(self) -> i64 {
                self.0
            }

            /// Create a label from an i64 value.
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Whether this is the absent-position sentinel.
            pub fn is_sentinel(self) -> bool {
                self.0 == SENTINEL
            }
        }
    };
}

define_family_id!(VarFamilyId);
define_family_id!(ConFamilyId);

define_label_type!(VarLabel);
define_label_type!(ConLabel);

#[cfg(test)]
mod tests {
    use super::{ConLabel, VarFamilyId, VarLabel, SENTINEL};

    #[test]
    fn family_id_roundtrip() {
        let id = VarFamilyId::new(7);
        assert_eq!(id.inner(), 7);
    }

    #[test]
    fn label_roundtrip() {
        let label = VarLabel::new(11);
        assert_eq!(label.inner(), 11);
        assert!(!label.is_sentinel());
    }

    #[test]
    fn sentinel_detection() {
        assert!(VarLabel::new(SENTINEL).is_sentinel());
        assert!(ConLabel::new(-1).is_sentinel());
    }
}
