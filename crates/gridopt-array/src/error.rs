//! Alignment and selection errors.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisError {
    /// Two arrays share a dimension name but carry different coordinates.
    DimensionMismatch { dim: String },
    /// A named dimension does not exist on the array.
    UnknownDimension { dim: String },
    /// A coordinate index contains the same key twice.
    DuplicateKey { dim: String, key: String },
    /// A selection key is not present in the coordinate index.
    UnknownKey { dim: String, key: String },
    /// Dense data does not match the shape implied by the dims.
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    /// The dimension name is reserved for internal use.
    ReservedDimension { dim: String },
    /// Arrays passed to a joint operation have incompatible lengths.
    LengthMismatch { expected: usize, got: usize },
}

impl AxisError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            AxisError::DimensionMismatch { .. } => "AXIS_DIMENSION_MISMATCH",
            AxisError::UnknownDimension { .. } => "AXIS_UNKNOWN_DIMENSION",
            AxisError::DuplicateKey { .. } => "AXIS_DUPLICATE_KEY",
            AxisError::UnknownKey { .. } => "AXIS_UNKNOWN_KEY",
            AxisError::ShapeMismatch { .. } => "AXIS_SHAPE_MISMATCH",
            AxisError::ReservedDimension { .. } => "AXIS_RESERVED_DIMENSION",
            AxisError::LengthMismatch { .. } => "AXIS_LENGTH_MISMATCH",
        }
    }
}

impl std::fmt::Display for AxisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisError::DimensionMismatch { dim } => write!(
                f,
                "[{}] Dimension '{}' carries conflicting coordinates",
                self.code(),
                dim
            ),
            AxisError::UnknownDimension { dim } => {
                write!(f, "[{}] Dimension '{}' does not exist", self.code(), dim)
            }
            AxisError::DuplicateKey { dim, key } => write!(
                f,
                "[{}] Coordinate '{}' appears twice in dimension '{}'",
                self.code(),
                key,
                dim
            ),
            AxisError::UnknownKey { dim, key } => write!(
                f,
                "[{}] Coordinate '{}' not found in dimension '{}'",
                self.code(),
                key,
                dim
            ),
            AxisError::ShapeMismatch { expected, got } => write!(
                f,
                "[{}] Data shape {:?} does not match dims shape {:?}",
                self.code(),
                got,
                expected
            ),
            AxisError::ReservedDimension { dim } => write!(
                f,
                "[{}] Dimension name '{}' is reserved",
                self.code(),
                dim
            ),
            AxisError::LengthMismatch { expected, got } => write!(
                f,
                "[{}] Expected {} elements, got {}",
                self.code(),
                expected,
                got
            ),
        }
    }
}

impl std::error::Error for AxisError {}
