//! Dense N-dimensional data with named, indexed dimensions.

use ndarray::{Axis, IxDyn, Slice};

use crate::error::AxisError;
use crate::index::DimIndex;
use crate::key::Key;

pub type DenseData<T> = ndarray::ArrayD<T>;

/// An N-dimensional array of `T` with an ordered list of named dimensions.
///
/// The data shape always matches the dims. Zero-dimensional arrays hold a
/// single element and broadcast against anything. Arrays align when their
/// shared-name dimensions carry equal coordinate indexes; broadcasting over
/// disjoint dimensions takes the outer product, with the combined dimension
/// order given by first appearance (left operand first).
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray<T> {
    dims: Vec<DimIndex>,
    data: DenseData<T>,
}

fn check_unique_names(dims: &[DimIndex]) -> Result<(), AxisError> {
    for (i, dim) in dims.iter().enumerate() {
        if dims[..i].iter().any(|d| d.name() == dim.name()) {
            return Err(AxisError::DimensionMismatch {
                dim: dim.name().to_string(),
            });
        }
    }
    Ok(())
}

fn dims_shape(dims: &[DimIndex]) -> Vec<usize> {
    dims.iter().map(DimIndex::len).collect()
}

/// Union of two dim lists, ordered by first appearance.
///
/// Shared names must carry identical coordinate indexes.
pub fn union_dims(a: &[DimIndex], b: &[DimIndex]) -> Result<Vec<DimIndex>, AxisError> {
    let mut union: Vec<DimIndex> = a.to_vec();
    for dim in b {
        match union.iter().find(|d| d.name() == dim.name()) {
            Some(existing) => {
                if existing != dim {
                    return Err(AxisError::DimensionMismatch {
                        dim: dim.name().to_string(),
                    });
                }
            }
            None => union.push(dim.clone()),
        }
    }
    Ok(union)
}

/// Broadcast two arrays to their common dims.
pub fn aligned<T: Clone, U: Clone>(
    a: &LabeledArray<T>,
    b: &LabeledArray<U>,
) -> Result<(LabeledArray<T>, LabeledArray<U>), AxisError> {
    let dims = union_dims(a.dims(), b.dims())?;
    Ok((a.expand(&dims)?, b.expand(&dims)?))
}

impl<T> LabeledArray<T> {
    /// Zero-dimensional array holding a single value.
    pub fn scalar(value: T) -> Self {
        Self {
            dims: Vec::new(),
            data: DenseData::from_shape_vec(IxDyn(&[]), vec![value])
                .unwrap_or_else(|_| unreachable!("scalar shape always holds one element")),
        }
    }

    /// Wrap dense data in named dims; the shape must match.
    pub fn from_data(dims: Vec<DimIndex>, data: DenseData<T>) -> Result<Self, AxisError> {
        check_unique_names(&dims)?;
        let expected = dims_shape(&dims);
        if data.shape() != expected.as_slice() {
            return Err(AxisError::ShapeMismatch {
                expected,
                got: data.shape().to_vec(),
            });
        }
        Ok(Self { dims, data })
    }

    /// One-dimensional array over a single dim.
    pub fn from_vec(dim: DimIndex, values: Vec<T>) -> Result<Self, AxisError> {
        if values.len() != dim.len() {
            return Err(AxisError::LengthMismatch {
                expected: dim.len(),
                got: values.len(),
            });
        }
        let data = DenseData::from_shape_vec(IxDyn(&[dim.len()]), values).map_err(|_| {
            AxisError::ShapeMismatch {
                expected: vec![dim.len()],
                got: Vec::new(),
            }
        })?;
        Ok(Self {
            dims: vec![dim],
            data,
        })
    }

    /// Build from dims and a row-major flat value list.
    pub fn from_parts(dims: Vec<DimIndex>, values: Vec<T>) -> Result<Self, AxisError> {
        check_unique_names(&dims)?;
        let shape = dims_shape(&dims);
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(AxisError::LengthMismatch {
                expected,
                got: values.len(),
            });
        }
        let data = DenseData::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            AxisError::ShapeMismatch {
                expected: shape.clone(),
                got: Vec::new(),
            }
        })?;
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> &[DimIndex] {
        &self.dims
    }

    pub fn dim_names(&self) -> Vec<&str> {
        self.dims.iter().map(DimIndex::name).collect()
    }

    pub fn dim_position(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d.name() == name)
    }

    pub fn dim(&self, name: &str) -> Result<&DimIndex, AxisError> {
        self.dim_position(name)
            .map(|k| &self.dims[k])
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: name.to_string(),
            })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.data.ndim() == 0
    }

    pub fn data(&self) -> &DenseData<T> {
        &self.data
    }

    /// The single element of a zero-dimensional array.
    pub fn item(&self) -> Option<&T> {
        if self.data.ndim() == 0 {
            self.data.iter().next()
        } else {
            None
        }
    }

    /// Elements in row-major order of the dims.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Element at one coordinate key per dimension, in dim order.
    pub fn get(&self, keys: &[Key]) -> Result<&T, AxisError> {
        if keys.len() != self.dims.len() {
            return Err(AxisError::LengthMismatch {
                expected: self.dims.len(),
                got: keys.len(),
            });
        }
        let mut position = Vec::with_capacity(keys.len());
        for (dim, key) in self.dims.iter().zip(keys) {
            match dim.position(key) {
                Some(p) => position.push(p),
                None => {
                    return Err(AxisError::UnknownKey {
                        dim: dim.name().to_string(),
                        key: key.to_string(),
                    })
                }
            }
        }
        self.data
            .get(IxDyn(&position))
            .ok_or_else(|| AxisError::ShapeMismatch {
                expected: self.shape().to_vec(),
                got: position,
            })
    }

    /// Replace the dims, keeping the data; the shape must match.
    pub fn with_dims(self, dims: Vec<DimIndex>) -> Result<Self, AxisError> {
        Self::from_data(dims, self.data)
    }
}

impl<T: Clone> LabeledArray<T> {
    /// Constant array over the given dims.
    pub fn from_elem(dims: Vec<DimIndex>, value: T) -> Result<Self, AxisError> {
        check_unique_names(&dims)?;
        let shape = dims_shape(&dims);
        Ok(Self {
            data: DenseData::from_elem(IxDyn(&shape), value),
            dims,
        })
    }

    /// Elements in row-major order, cloned.
    pub fn ravel(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }

    /// Broadcast to a superset of the dims.
    ///
    /// Every existing dim must appear in `dims` with equal coordinates;
    /// novel dims are tiled over.
    pub fn expand(&self, dims: &[DimIndex]) -> Result<Self, AxisError> {
        check_unique_names(dims)?;
        for dim in &self.dims {
            match dims.iter().find(|d| d.name() == dim.name()) {
                Some(target) if target == dim => {}
                _ => {
                    return Err(AxisError::DimensionMismatch {
                        dim: dim.name().to_string(),
                    })
                }
            }
        }
        if dims == self.dims.as_slice() {
            return Ok(self.clone());
        }

        // Append singleton axes for the novel dims, then permute into the
        // target order and broadcast up to the target shape.
        let mut view = self.data.view();
        for _ in self.dims.len()..dims.len() {
            let axis = view.ndim();
            view = view.insert_axis(Axis(axis));
        }
        let mut appended = self.dims.len();
        let mut perm = Vec::with_capacity(dims.len());
        for dim in dims {
            match self.dim_position(dim.name()) {
                Some(p) => perm.push(p),
                None => {
                    perm.push(appended);
                    appended += 1;
                }
            }
        }
        let shape = dims_shape(dims);
        let permuted = view.permuted_axes(IxDyn(&perm));
        let broadcast = permuted
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| AxisError::ShapeMismatch {
                expected: shape.clone(),
                got: self.shape().to_vec(),
            })?;
        Ok(Self {
            dims: dims.to_vec(),
            data: broadcast.to_owned(),
        })
    }

    /// Broadcast to the dims of another array.
    pub fn broadcast_like<U>(&self, other: &LabeledArray<U>) -> Result<Self, AxisError> {
        self.expand(other.dims())
    }

    /// Apply `f` elementwise.
    pub fn map<V, F: FnMut(&T) -> V>(&self, f: F) -> LabeledArray<V> {
        LabeledArray {
            dims: self.dims.clone(),
            data: self.data.map(f),
        }
    }

    /// Align with `other` and combine elementwise.
    pub fn zip_with<U: Clone, V, F>(
        &self,
        other: &LabeledArray<U>,
        f: F,
    ) -> Result<LabeledArray<V>, AxisError>
    where
        F: Fn(&T, &U) -> V,
    {
        let (a, b) = aligned(self, other)?;
        let values: Vec<V> = a
            .data
            .iter()
            .zip(b.data.iter())
            .map(|(x, y)| f(x, y))
            .collect();
        LabeledArray::from_parts(a.dims, values)
    }

    /// Concatenate along an existing named axis.
    ///
    /// All parts must agree on every other dimension; the concatenated axis
    /// is renumbered `0..n`.
    pub fn concat(parts: &[&Self], dim: &str) -> Result<Self, AxisError> {
        let first = parts.first().ok_or_else(|| AxisError::UnknownDimension {
            dim: dim.to_string(),
        })?;
        let k = first
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        for part in &parts[1..] {
            if part.ndim() != first.ndim() || part.dim_position(dim) != Some(k) {
                return Err(AxisError::DimensionMismatch {
                    dim: dim.to_string(),
                });
            }
            for (i, target) in first.dims.iter().enumerate() {
                if i != k && part.dims[i] != *target {
                    return Err(AxisError::DimensionMismatch {
                        dim: target.name().to_string(),
                    });
                }
            }
        }

        let views: Vec<_> = parts.iter().map(|p| p.data.view()).collect();
        let data = ndarray::concatenate(Axis(k), &views).map_err(|_| AxisError::ShapeMismatch {
            expected: first.shape().to_vec(),
            got: Vec::new(),
        })?;
        let mut dims = first.dims.clone();
        dims[k] = DimIndex::range(dim, data.len_of(Axis(k)));
        Ok(Self { dims, data })
    }

    /// Stack along a fresh trailing axis named `dim`, indexed `0..n`.
    pub fn stack(parts: &[&Self], dim: &str) -> Result<Self, AxisError> {
        let first = parts.first().ok_or_else(|| AxisError::UnknownDimension {
            dim: dim.to_string(),
        })?;
        if first.dim_position(dim).is_some() {
            return Err(AxisError::DimensionMismatch {
                dim: dim.to_string(),
            });
        }
        for part in &parts[1..] {
            if part.dims != first.dims {
                let name = part
                    .dims
                    .iter()
                    .find(|d| !first.dims.contains(d))
                    .map_or(dim, |d| d.name());
                return Err(AxisError::DimensionMismatch {
                    dim: name.to_string(),
                });
            }
        }

        let views: Vec<_> = parts.iter().map(|p| p.data.view()).collect();
        let data =
            ndarray::stack(Axis(first.ndim()), &views).map_err(|_| AxisError::ShapeMismatch {
                expected: first.shape().to_vec(),
                got: Vec::new(),
            })?;
        let mut dims = first.dims.clone();
        dims.push(DimIndex::range(dim, parts.len()));
        Ok(Self { dims, data })
    }

    /// Shift along a dim; vacated slots take `fill`.
    ///
    /// A positive offset moves values toward higher coordinates.
    pub fn shift(&self, dim: &str, offset: isize, fill: T) -> Result<Self, AxisError> {
        let k = self
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        let n = self.data.len_of(Axis(k));
        let mut data = DenseData::from_elem(self.data.raw_dim(), fill);
        let magnitude = offset.unsigned_abs();
        if magnitude < n {
            let keep = n - magnitude;
            let (src, dst) = if offset >= 0 {
                (0..keep, magnitude..n)
            } else {
                (magnitude..n, 0..keep)
            };
            let source = self.data.slice_each_axis(|ax| {
                if ax.axis.index() == k {
                    Slice::from(src.clone())
                } else {
                    Slice::from(..)
                }
            });
            let mut target = data.slice_each_axis_mut(|ax| {
                if ax.axis.index() == k {
                    Slice::from(dst.clone())
                } else {
                    Slice::from(..)
                }
            });
            target.assign(&source);
        }
        Ok(Self {
            dims: self.dims.clone(),
            data,
        })
    }

    /// Collapse trailing axes `from..` into a single renumbered axis `dim`.
    ///
    /// Used for folding outer dimensions into an inner term axis.
    pub fn fold_trailing(&self, from: usize, dim: &str) -> Result<Self, AxisError> {
        if from > self.ndim() {
            return Err(AxisError::UnknownDimension {
                dim: dim.to_string(),
            });
        }
        let mut shape: Vec<usize> = self.shape()[..from].to_vec();
        let folded: usize = self.shape()[from..].iter().product();
        shape.push(folded);
        let standard = self.data.as_standard_layout().into_owned();
        let data = standard
            .into_shape(IxDyn(&shape))
            .map_err(|_| AxisError::ShapeMismatch {
                expected: shape.clone(),
                got: self.shape().to_vec(),
            })?;
        let mut dims: Vec<DimIndex> = self.dims[..from].to_vec();
        dims.push(DimIndex::range(dim, folded));
        Self::from_data(dims, data)
    }

    /// Move the dim named `dim` to the last axis position.
    pub fn move_to_back(&self, dim: &str) -> Result<Self, AxisError> {
        let k = self
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        if k == self.ndim() - 1 {
            return Ok(self.clone());
        }
        let mut order: Vec<usize> = (0..self.ndim()).filter(|&i| i != k).collect();
        order.push(k);
        let dims: Vec<DimIndex> = order.iter().map(|&i| self.dims[i].clone()).collect();
        let data = self
            .data
            .view()
            .permuted_axes(IxDyn(&order))
            .as_standard_layout()
            .into_owned();
        Self::from_data(dims, data)
    }
}

impl<T: Copy> LabeledArray<T> {
    /// Select coordinates along a dim by key, in the order given.
    pub fn sel(&self, dim: &str, keys: &[Key]) -> Result<Self, AxisError> {
        let k = self
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        let (index, positions) = self.dims[k].subset(keys)?;
        let data = self.data.select(Axis(k), &positions);
        let mut dims = self.dims.clone();
        dims[k] = index;
        Ok(Self { dims, data })
    }

    /// Select positions along a dim, in the order given.
    pub fn isel(&self, dim: &str, positions: &[usize]) -> Result<Self, AxisError> {
        let k = self
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        let index = &self.dims[k];
        let mut keys = Vec::with_capacity(positions.len());
        for &p in positions {
            match index.keys().get(p) {
                Some(key) => keys.push(key.clone()),
                None => {
                    return Err(AxisError::UnknownKey {
                        dim: dim.to_string(),
                        key: p.to_string(),
                    })
                }
            }
        }
        let mut dims = self.dims.clone();
        dims[k] = DimIndex::new(dim, keys)?;
        let data = self.data.select(Axis(k), positions);
        Ok(Self { dims, data })
    }
}

impl LabeledArray<f64> {
    /// Sum out a named dimension.
    pub fn sum_dim(&self, dim: &str) -> Result<Self, AxisError> {
        let k = self
            .dim_position(dim)
            .ok_or_else(|| AxisError::UnknownDimension {
                dim: dim.to_string(),
            })?;
        let data = self.data.sum_axis(Axis(k));
        let mut dims = self.dims.clone();
        dims.remove(k);
        Ok(Self { dims, data })
    }

    /// Align with `other` and add elementwise.
    pub fn add(&self, other: &Self) -> Result<Self, AxisError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Align with `other` and subtract elementwise.
    pub fn sub(&self, other: &Self) -> Result<Self, AxisError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Align with `other` and multiply elementwise.
    pub fn mul(&self, other: &Self) -> Result<Self, AxisError> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Scale every element.
    pub fn scale(&self, by: f64) -> Self {
        self.map(|v| v * by)
    }
}
