//! N-dimensional labelled fields.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use ndarray::{ArrayD, Axis as NdAxis, IxDyn};

use crate::axis::{Axis, AxisRole, AxisValues};
use crate::error::{FieldError, FieldResult};
use crate::grid::GridKind;
use crate::time::TimeConvention;

/// A non-dimension coordinate, e.g. the 2-D geographic arrays of a curvilinear grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxCoord {
    /// Axis names this coordinate spans, in array order.
    pub dims: Vec<String>,
    pub values: ArrayD<f64>,
}

/// A gridded variable: named axes, an `f32` array (NaN is missing), metadata.
///
/// Every numeric or time axis is strictly monotonic and the array shape always
/// equals the axis lengths.
#[derive(Debug, Clone)]
pub struct GriddedField {
    /// Variable name.
    pub name: String,
    /// Horizontal grid the field lives on.
    pub kind: GridKind,
    /// Registration of the time axis.
    pub convention: TimeConvention,
    axes: Vec<Axis>,
    data: ArrayD<f32>,
    aux_coords: BTreeMap<String, AuxCoord>,
    attrs: BTreeMap<String, String>,
}

impl GriddedField {
    /// Create a field, checking shape and coordinate invariants.
    pub fn new(
        name: impl Into<String>,
        kind: GridKind,
        axes: Vec<Axis>,
        data: ArrayD<f32>,
    ) -> FieldResult<Self> {
        validate_axes(&axes, data.shape())?;
        Ok(Self {
            name: name.into(),
            kind,
            convention: TimeConvention::Ocean,
            axes,
            data,
            aux_coords: BTreeMap::new(),
            attrs: BTreeMap::new(),
        })
    }

    /// Create a field from row-major values.
    pub fn from_vec(
        name: impl Into<String>,
        kind: GridKind,
        axes: Vec<Axis>,
        values: Vec<f32>,
    ) -> FieldResult<Self> {
        let shape: Vec<usize> = axes.iter().map(Axis::len).collect();
        let len = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
            FieldError::InvalidShape {
                data: vec![len],
                axes: shape.clone(),
            }
        })?;
        Self::new(name, kind, axes, data)
    }

    pub fn with_convention(mut self, convention: TimeConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Attach a non-dimension coordinate. Its dims must name existing axes.
    pub fn with_aux_coord(mut self, name: impl Into<String>, coord: AuxCoord) -> FieldResult<Self> {
        let mut expected = Vec::with_capacity(coord.dims.len());
        for dim in &coord.dims {
            expected.push(self.axes[self.require_axis(dim)?].len());
        }
        if coord.values.shape() != expected.as_slice() {
            return Err(FieldError::InvalidShape {
                data: coord.values.shape().to_vec(),
                axes: expected,
            });
        }
        self.aux_coords.insert(name.into(), coord);
        Ok(self)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn aux_coords(&self) -> &BTreeMap<String, AuxCoord> {
        &self.aux_coords
    }

    /// Remove every non-dimension coordinate, returning how many were dropped.
    pub fn drop_aux_coords(&mut self) -> usize {
        let dropped = self.aux_coords.len();
        self.aux_coords.clear();
        dropped
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.iter().map(|a| a.name.as_str())
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f32> {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// Value at a full index, `None` when out of range.
    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.data.get(IxDyn(index)).copied()
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name == name)
    }

    pub fn axis_index(&self, name: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.name == name)
    }

    /// Position of a named axis or `MissingAxis`.
    pub fn require_axis(&self, name: &str) -> FieldResult<usize> {
        self.axis_index(name)
            .ok_or_else(|| FieldError::MissingAxis(name.to_string()))
    }

    /// First axis with the given role.
    pub fn axis_by_role(&self, role: AxisRole) -> Option<(usize, &Axis)> {
        self.axes.iter().enumerate().find(|(_, a)| a.role == role)
    }

    /// Timestamps of the time axis, if the field has one with decoded times.
    pub fn times(&self) -> Option<&[DateTime<Utc>]> {
        self.axis_by_role(AxisRole::Time)
            .and_then(|(_, axis)| axis.values.as_times())
    }

    /// Keep the entries at `indices` along axis position `axis`.
    pub fn select_indices(&self, axis: usize, indices: &[usize]) -> FieldResult<Self> {
        let target = self
            .axes
            .get(axis)
            .ok_or_else(|| FieldError::MissingAxis(format!("#{}", axis)))?;
        if let Some(&index) = indices.iter().find(|&&i| i >= target.len()) {
            return Err(FieldError::IndexOutOfRange {
                axis: target.name.clone(),
                index,
                len: target.len(),
            });
        }
        let new_axis = target.select(indices);
        new_axis.validate()?;

        let mut axes = self.axes.clone();
        axes[axis] = new_axis;

        let aux_coords = self
            .aux_coords
            .iter()
            .map(|(name, coord)| {
                let values = match coord.dims.iter().position(|d| *d == target.name) {
                    Some(pos) => coord.values.select(NdAxis(pos), indices),
                    None => coord.values.clone(),
                };
                let coord = AuxCoord {
                    dims: coord.dims.clone(),
                    values,
                };
                (name.clone(), coord)
            })
            .collect();

        Ok(Self {
            name: self.name.clone(),
            kind: self.kind,
            convention: self.convention,
            axes,
            data: self.data.select(NdAxis(axis), indices),
            aux_coords,
            attrs: self.attrs.clone(),
        })
    }

    /// The single time step at `index`, keeping a time axis of length 1.
    pub fn time_slice(&self, index: usize) -> FieldResult<Self> {
        let (pos, axis) = self
            .axis_by_role(AxisRole::Time)
            .ok_or_else(|| FieldError::MissingAxis(crate::grid::names::TIME.to_string()))?;
        if index >= axis.len() {
            return Err(FieldError::LengthMismatch {
                axis: axis.name.clone(),
                expected: index + 1,
                actual: axis.len(),
            });
        }
        self.select_indices(pos, &[index])
    }

    /// Keep the entries of a numeric axis whose coordinate lies in `[min, max]`.
    pub fn select_range(&self, name: &str, min: f64, max: f64) -> FieldResult<Self> {
        let pos = self.require_axis(name)?;
        let indices: Vec<usize> = self.axes[pos]
            .numeric()?
            .iter()
            .enumerate()
            .filter(|(_, &v)| v >= min && v <= max)
            .map(|(i, _)| i)
            .collect();
        self.select_indices(pos, &indices)
    }

    /// Map a numeric axis through `f`, then reorder the field ascending on it.
    ///
    /// The sort is stable, so an axis that is already ascending keeps its order.
    pub fn remap_axis(&self, name: &str, f: impl Fn(f64) -> f64) -> FieldResult<Self> {
        let pos = self.require_axis(name)?;
        let mapped: Vec<f64> = self.axes[pos].numeric()?.iter().map(|&v| f(v)).collect();

        let mut order: Vec<usize> = (0..mapped.len()).collect();
        order.sort_by(|&a, &b| mapped[a].total_cmp(&mapped[b]));

        let mut remapped = self.clone();
        remapped.axes[pos] = self.axes[pos].with_numeric(mapped);
        remapped.select_indices(pos, &order)
    }

    /// Reorder the field ascending along a numeric axis.
    pub fn sort_by_axis(&self, name: &str) -> FieldResult<Self> {
        self.remap_axis(name, |v| v)
    }

    /// Add `delta` to every timestamp of the time axis.
    pub fn shift_times(&self, delta: Duration) -> FieldResult<Self> {
        let (pos, axis) = self
            .axis_by_role(AxisRole::Time)
            .ok_or_else(|| FieldError::MissingAxis(crate::grid::names::TIME.to_string()))?;
        let shifted: Vec<DateTime<Utc>> = axis.times()?.iter().map(|t| *t + delta).collect();

        let mut field = self.clone();
        field.axes[pos].values = AxisValues::Times(shifted);
        Ok(field)
    }

    /// Replace an axis (values and name) keeping the data untouched.
    pub fn replace_axis(&self, name: &str, replacement: Axis) -> FieldResult<Self> {
        let pos = self.require_axis(name)?;
        let current = &self.axes[pos];
        if replacement.len() != current.len() {
            return Err(FieldError::LengthMismatch {
                axis: name.to_string(),
                expected: current.len(),
                actual: replacement.len(),
            });
        }
        if replacement.name != name && self.axis_index(&replacement.name).is_some() {
            return Err(FieldError::DuplicateAxis(replacement.name));
        }
        replacement.validate()?;

        let mut field = self.clone();
        for coord in field.aux_coords.values_mut() {
            for dim in coord.dims.iter_mut().filter(|d| d.as_str() == name) {
                *dim = replacement.name.clone();
            }
        }
        field.axes[pos] = replacement;
        Ok(field)
    }

    /// Strip the coordinate values of an axis, leaving it index-only.
    pub fn clear_coordinate(&mut self, name: &str) -> FieldResult<()> {
        let pos = self.require_axis(name)?;
        let len = self.axes[pos].len();
        self.axes[pos].values = AxisValues::Index(len);
        Ok(())
    }

    /// Reorder axes to `order`, which must name every axis exactly once.
    pub fn transpose_to(&self, order: &[&str]) -> FieldResult<Self> {
        if order.len() != self.axes.len() {
            return Err(FieldError::InvalidShape {
                data: self.shape().to_vec(),
                axes: vec![order.len()],
            });
        }
        let perm = order
            .iter()
            .map(|name| self.require_axis(name))
            .collect::<FieldResult<Vec<usize>>>()?;
        let unique: HashSet<usize> = perm.iter().copied().collect();
        if unique.len() != perm.len() {
            return Err(FieldError::DuplicateAxis(order.join(",")));
        }

        let data = self
            .data
            .clone()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();
        let axes = perm.iter().map(|&i| self.axes[i].clone()).collect();

        Ok(Self {
            name: self.name.clone(),
            kind: self.kind,
            convention: self.convention,
            axes,
            data,
            aux_coords: self.aux_coords.clone(),
            attrs: self.attrs.clone(),
        })
    }
}

fn validate_axes(axes: &[Axis], shape: &[usize]) -> FieldResult<()> {
    let lens: Vec<usize> = axes.iter().map(Axis::len).collect();
    if lens.as_slice() != shape {
        return Err(FieldError::InvalidShape {
            data: shape.to_vec(),
            axes: lens,
        });
    }

    let mut seen = HashSet::with_capacity(axes.len());
    for axis in axes {
        if !seen.insert(axis.name.as_str()) {
            return Err(FieldError::DuplicateAxis(axis.name.clone()));
        }
        axis.validate()?;
    }
    Ok(())
}
