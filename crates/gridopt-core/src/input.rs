//! Normalization of user-facing numeric inputs.
//!
//! Bounds, coefficients, and right-hand sides may arrive as scalars,
//! unlabeled dense arrays, or labeled arrays. Everything funnels through
//! [`ConstantLike::normalize`], so downstream code only ever sees
//! [`LabeledArray`] values.

use gridopt_array::{AxisError, DimIndex, Key, LabeledArray};
use gridopt_expr::TERM_DIM;
use ndarray::ArrayD;

use crate::model::ModelError;

/// A coordinate index supplied by the caller: either a named index or a
/// bare key list that receives an anonymous `dim_{i}` name by position.
#[derive(Debug, Clone)]
pub enum CoordInput {
    Index(DimIndex),
    Keys(Vec<Key>),
}

impl From<DimIndex> for CoordInput {
    fn from(index: DimIndex) -> Self {
        CoordInput::Index(index)
    }
}

impl From<Vec<Key>> for CoordInput {
    fn from(keys: Vec<Key>) -> Self {
        CoordInput::Keys(keys)
    }
}

/// Resolve coordinate inputs to dims, naming bare key lists `dim_{i}`.
pub fn resolve_coords(coords: &[CoordInput]) -> Result<Vec<DimIndex>, ModelError> {
    let mut dims = Vec::with_capacity(coords.len());
    for (ordinal, coord) in coords.iter().enumerate() {
        let dim = match coord {
            CoordInput::Index(index) => index.clone(),
            CoordInput::Keys(keys) => DimIndex::new(format!("dim_{ordinal}"), keys.clone())?,
        };
        dims.push(dim);
    }
    Ok(dims)
}

/// A numeric input in one of three shapes.
#[derive(Debug, Clone)]
pub enum ConstantLike {
    Scalar(f64),
    Dense(ArrayD<f64>),
    Labeled(LabeledArray<f64>),
}

impl From<f64> for ConstantLike {
    fn from(value: f64) -> Self {
        ConstantLike::Scalar(value)
    }
}

impl From<i32> for ConstantLike {
    fn from(value: i32) -> Self {
        ConstantLike::Scalar(f64::from(value))
    }
}

impl From<ArrayD<f64>> for ConstantLike {
    fn from(data: ArrayD<f64>) -> Self {
        ConstantLike::Dense(data)
    }
}

impl From<Vec<f64>> for ConstantLike {
    fn from(values: Vec<f64>) -> Self {
        let len = values.len();
        match ArrayD::from_shape_vec(ndarray::IxDyn(&[len]), values) {
            Ok(data) => ConstantLike::Dense(data),
            Err(_) => unreachable!("a Vec always matches its own length"),
        }
    }
}

impl From<LabeledArray<f64>> for ConstantLike {
    fn from(array: LabeledArray<f64>) -> Self {
        ConstantLike::Labeled(array)
    }
}

impl ConstantLike {
    /// Normalize to a labeled array.
    ///
    /// Scalars take the shape of `coords` when given, else stay
    /// zero-dimensional. Dense data requires `coords` unless it is itself
    /// zero-dimensional. Labeled arrays keep their dims, or take `coords`
    /// as an override of equal shape. Anonymous dims are rejected under
    /// `force_dim_names`; the reserved term dim is always rejected.
    pub fn normalize(
        &self,
        coords: Option<&[DimIndex]>,
        force_dim_names: bool,
    ) -> Result<LabeledArray<f64>, ModelError> {
        let array = match self {
            ConstantLike::Scalar(value) => match coords {
                Some(dims) => LabeledArray::from_elem(dims.to_vec(), *value)?,
                None => LabeledArray::scalar(*value),
            },
            ConstantLike::Dense(data) => {
                if data.ndim() == 0 {
                    let value = data.iter().next().copied().unwrap_or(0.0);
                    match coords {
                        Some(dims) => LabeledArray::from_elem(dims.to_vec(), value)?,
                        None => LabeledArray::scalar(value),
                    }
                } else {
                    let dims = coords.ok_or(ModelError::MissingCoordinates)?;
                    LabeledArray::from_data(dims.to_vec(), data.clone())?
                }
            }
            ConstantLike::Labeled(array) => match coords {
                Some(dims) => array.clone().with_dims(dims.to_vec())?,
                None => array.clone(),
            },
        };
        check_dims(array.dims(), force_dim_names)?;
        Ok(array)
    }
}

/// Reject the reserved term dim, and anonymous dims under
/// `force_dim_names`.
pub(crate) fn check_dims(dims: &[DimIndex], force_dim_names: bool) -> Result<(), ModelError> {
    for dim in dims {
        if dim.name() == TERM_DIM {
            return Err(ModelError::Axis(AxisError::ReservedDimension {
                dim: TERM_DIM.to_string(),
            }));
        }
        if force_dim_names && dim.is_anonymous() {
            return Err(ModelError::UnnamedDimension {
                dim: dim.name().to_string(),
            });
        }
    }
    Ok(())
}
