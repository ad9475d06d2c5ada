//! Labelled axes for gridded fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, FieldResult};

/// What an axis measures, independent of the name it carries in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisRole {
    Time,
    Depth,
    Y,
    X,
    Model,
    Other,
}

/// Coordinate values attached to an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValues {
    /// Geographic degrees (latitude or longitude).
    Degrees(Vec<f64>),
    /// Model vertical levels.
    Levels(Vec<f64>),
    /// Timestamps.
    Times(Vec<DateTime<Utc>>),
    /// Categorical labels, e.g. model names.
    Labels(Vec<String>),
    /// Index-only axis of the given length, no coordinate values.
    Index(usize),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Degrees(v) | Self::Levels(v) => v.len(),
            Self::Times(v) => v.len(),
            Self::Labels(v) => v.len(),
            Self::Index(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric coordinates (degrees or levels).
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Degrees(v) | Self::Levels(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_times(&self) -> Option<&[DateTime<Utc>]> {
        match self {
            Self::Times(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            Self::Labels(v) => Some(v),
            _ => None,
        }
    }

    /// Pick the coordinates at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> AxisValues {
        match self {
            Self::Degrees(v) => Self::Degrees(indices.iter().map(|&i| v[i]).collect()),
            Self::Levels(v) => Self::Levels(indices.iter().map(|&i| v[i]).collect()),
            Self::Times(v) => Self::Times(indices.iter().map(|&i| v[i]).collect()),
            Self::Labels(v) => Self::Labels(indices.iter().map(|&i| v[i].clone()).collect()),
            Self::Index(_) => Self::Index(indices.len()),
        }
    }

    /// Same variant kind with new numeric contents.
    fn with_numeric(&self, values: Vec<f64>) -> AxisValues {
        match self {
            Self::Levels(_) => Self::Levels(values),
            _ => Self::Degrees(values),
        }
    }

    fn is_strictly_monotonic(&self) -> bool {
        match self {
            Self::Degrees(v) | Self::Levels(v) => {
                if v.iter().any(|x| !x.is_finite()) {
                    return false;
                }
                v.windows(2).all(|w| w[0] < w[1]) || v.windows(2).all(|w| w[0] > w[1])
            }
            Self::Times(v) => {
                v.windows(2).all(|w| w[0] < w[1]) || v.windows(2).all(|w| w[0] > w[1])
            }
            Self::Labels(v) => {
                let mut seen = std::collections::HashSet::with_capacity(v.len());
                v.iter().all(|label| seen.insert(label.as_str()))
            }
            Self::Index(_) => true,
        }
    }
}

/// A named, role-tagged axis of a gridded field.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub role: AxisRole,
    pub values: AxisValues,
}

impl Axis {
    pub fn new(name: impl Into<String>, role: AxisRole, values: AxisValues) -> Self {
        Self {
            name: name.into(),
            role,
            values,
        }
    }

    /// Time axis under the conventional name `time`.
    pub fn time(values: Vec<DateTime<Utc>>) -> Self {
        Self::new(crate::grid::names::TIME, AxisRole::Time, AxisValues::Times(values))
    }

    pub fn degrees(name: impl Into<String>, role: AxisRole, values: Vec<f64>) -> Self {
        Self::new(name, role, AxisValues::Degrees(values))
    }

    pub fn levels(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, AxisRole::Depth, AxisValues::Levels(values))
    }

    pub fn labels(name: impl Into<String>, role: AxisRole, values: Vec<String>) -> Self {
        Self::new(name, role, AxisValues::Labels(values))
    }

    pub fn index(name: impl Into<String>, role: AxisRole, len: usize) -> Self {
        Self::new(name, role, AxisValues::Index(len))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric coordinates or a typed error naming this axis.
    pub fn numeric(&self) -> FieldResult<&[f64]> {
        self.values.as_numeric().ok_or_else(|| FieldError::WrongAxisType {
            axis: self.name.clone(),
            expected: "numeric",
        })
    }

    pub fn times(&self) -> FieldResult<&[DateTime<Utc>]> {
        self.values.as_times().ok_or_else(|| FieldError::WrongAxisType {
            axis: self.name.clone(),
            expected: "time",
        })
    }

    /// Check the monotonic/unique coordinate invariant.
    pub fn validate(&self) -> FieldResult<()> {
        if self.values.is_strictly_monotonic() {
            Ok(())
        } else {
            Err(FieldError::NonMonotonic(self.name.clone()))
        }
    }

    pub(crate) fn select(&self, indices: &[usize]) -> Axis {
        Axis {
            name: self.name.clone(),
            role: self.role,
            values: self.values.select(indices),
        }
    }

    pub(crate) fn with_numeric(&self, values: Vec<f64>) -> Axis {
        Axis {
            name: self.name.clone(),
            role: self.role,
            values: self.values.with_numeric(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_monotonic_numeric() {
        assert!(Axis::degrees("x", AxisRole::X, vec![0.0, 1.0, 2.0]).validate().is_ok());
        assert!(Axis::degrees("y", AxisRole::Y, vec![3.0, 2.0, 1.0]).validate().is_ok());
        assert!(Axis::degrees("x", AxisRole::X, vec![0.0, 0.0, 1.0]).validate().is_err());
        assert!(Axis::degrees("x", AxisRole::X, vec![0.0, f64::NAN]).validate().is_err());
    }

    #[test]
    fn test_monotonic_times_and_labels() {
        let t0 = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2010, 1, 2, 0, 0, 0).unwrap();
        assert!(Axis::time(vec![t0, t1]).validate().is_ok());
        assert!(Axis::time(vec![t1, t1]).validate().is_err());

        let models = vec!["GAM".to_string(), "GAM".to_string()];
        assert!(Axis::labels("model", AxisRole::Model, models).validate().is_err());
    }

    #[test]
    fn test_select_index_axis() {
        let axis = Axis::index("ni", AxisRole::X, 5);
        assert_eq!(axis.select(&[0, 2]).values, AxisValues::Index(2));
    }
}
