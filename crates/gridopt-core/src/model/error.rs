//! Model error types.

use gridopt_array::AxisError;
use gridopt_solver::SolverError;

/// Errors that can occur during model operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Unlabeled dense input without coordinates.
    MissingCoordinates,
    /// Anonymous dimension under `force_dim_names`.
    UnnamedDimension { dim: String },
    /// Name collision in the variable or constraint registry.
    DuplicateName { name: String },
    /// Lower bound exceeds upper bound after broadcast.
    BoundsInvalid { lower: f64, upper: f64 },
    /// Expression references a label not issued by this model.
    UnknownVariable { label: i64 },
    /// No constraint family registered under the name.
    UnknownConstraint { name: String },
    /// No variable family registered under the name.
    UnknownFamily { name: String },
    /// Objective already set and overwrite not requested.
    ObjectiveExists,
    /// Objective expression still carries outer dimensions.
    ObjectiveNotScalar { dims: Vec<String> },
    /// A constraint rule returned differing comparison senses.
    MixedSenses,
    /// Alignment or selection failure in the underlying arrays.
    Axis(AxisError),
    /// Failure reported by the solver adapter.
    Solver(SolverError),
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::MissingCoordinates => "MODEL_MISSING_COORDINATES",
            ModelError::UnnamedDimension { .. } => "MODEL_UNNAMED_DIMENSION",
            ModelError::DuplicateName { .. } => "MODEL_DUPLICATE_NAME",
            ModelError::BoundsInvalid { .. } => "MODEL_BOUNDS_INVALID",
            ModelError::UnknownVariable { .. } => "MODEL_UNKNOWN_VARIABLE",
            ModelError::UnknownConstraint { .. } => "MODEL_UNKNOWN_CONSTRAINT",
            ModelError::UnknownFamily { .. } => "MODEL_UNKNOWN_FAMILY",
            ModelError::ObjectiveExists => "MODEL_OBJECTIVE_EXISTS",
            ModelError::ObjectiveNotScalar { .. } => "MODEL_OBJECTIVE_NOT_SCALAR",
            ModelError::MixedSenses => "MODEL_MIXED_SENSES",
            ModelError::Axis(_) => "MODEL_AXIS",
            ModelError::Solver(_) => "MODEL_SOLVER",
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::MissingCoordinates => write!(
                f,
                "[{}] Unlabeled array input requires coordinates",
                self.code()
            ),
            ModelError::UnnamedDimension { dim } => write!(
                f,
                "[{}] Anonymous dimension '{}' rejected; the model requires named dims",
                self.code(),
                dim
            ),
            ModelError::DuplicateName { name } => {
                write!(f, "[{}] Name '{}' is already registered", self.code(), name)
            }
            ModelError::BoundsInvalid { lower, upper } => write!(
                f,
                "[{}] Bounds invalid: lower ({}) > upper ({})",
                self.code(),
                lower,
                upper
            ),
            ModelError::UnknownVariable { label } => write!(
                f,
                "[{}] Variable label {} was not issued by this model",
                self.code(),
                label
            ),
            ModelError::UnknownConstraint { name } => write!(
                f,
                "[{}] No constraint family named '{}'",
                self.code(),
                name
            ),
            ModelError::UnknownFamily { name } => {
                write!(f, "[{}] No variable family named '{}'", self.code(), name)
            }
            ModelError::ObjectiveExists => write!(
                f,
                "[{}] Model already has an objective; use replace_objective",
                self.code()
            ),
            ModelError::ObjectiveNotScalar { dims } => write!(
                f,
                "[{}] Objective still carries outer dims ({}); sum them first",
                self.code(),
                dims.join(", ")
            ),
            ModelError::MixedSenses => write!(
                f,
                "[{}] Constraint rule returned differing comparison senses",
                self.code()
            ),
            ModelError::Axis(err) => write!(f, "[{}] {}", self.code(), err),
            ModelError::Solver(err) => write!(f, "[{}] {}", self.code(), err),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Axis(err) => Some(err),
            ModelError::Solver(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AxisError> for ModelError {
    fn from(err: AxisError) -> Self {
        ModelError::Axis(err)
    }
}

impl From<SolverError> for ModelError {
    fn from(err: SolverError) -> Self {
        ModelError::Solver(err)
    }
}
