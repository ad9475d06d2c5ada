//! The gridded-source trait and request post-processing shared by backends.

use ndarray::{concatenate, Axis as NdAxis};
use ocean_common::{AxisRole, AxisValues, GriddedField};

use crate::error::{CatalogError, Result};
use crate::request::VariableRequest;

/// A catalog that supplies gridded variables by name, frequency and time window.
///
/// Calls block until the data is in memory. Implementations never retry: a
/// request with no matching data fails with [`CatalogError::NoData`].
pub trait GridSource: Send + Sync {
    fn fetch(&self, request: &VariableRequest) -> Result<GriddedField>;
}

/// Apply the window, limit and coordinate-decoding parts of a request.
///
/// Fields without a time axis pass through the window and limit untouched.
pub fn apply_request(field: GriddedField, request: &VariableRequest) -> Result<GriddedField> {
    let selection = match field.axis_by_role(AxisRole::Time) {
        Some((pos, axis)) => match &axis.values {
            AxisValues::Times(times) => {
                let mut keep: Vec<usize> = times
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| request.window.map_or(true, |w| w.contains(t)))
                    .map(|(i, _)| i)
                    .collect();
                if let Some(limit) = request.limit {
                    keep.truncate(limit);
                }
                Some((pos, keep, times.len()))
            }
            _ => None,
        },
        None => None,
    };

    let mut field = match selection {
        Some((_, keep, _)) if keep.is_empty() => return Err(CatalogError::no_data(request)),
        Some((pos, keep, total)) if keep.len() != total => field.select_indices(pos, &keep)?,
        _ => field,
    };

    if !request.decode_coords {
        field.drop_aux_coords();
    }

    Ok(field)
}

/// Join fields that differ only along time, ordered by their first timestamp.
pub fn concat_time(mut parts: Vec<GriddedField>) -> Result<GriddedField> {
    if parts.len() <= 1 {
        return parts
            .pop()
            .ok_or_else(|| CatalogError::InvalidRequest("nothing to concatenate".to_string()));
    }

    parts.sort_by_key(|f| f.times().and_then(|t| t.first().copied()));

    let first = &parts[0];
    let (pos, _) = first
        .axis_by_role(AxisRole::Time)
        .ok_or_else(|| CatalogError::InvalidRequest(format!("{} has no time axis", first.name)))?;

    let mut times = Vec::new();
    for part in &parts {
        if part.axis_names().ne(first.axis_names()) {
            return Err(CatalogError::Read(format!(
                "{} pieces have different axes",
                first.name
            )));
        }
        let part_times = part
            .times()
            .ok_or_else(|| CatalogError::Read(format!("{} time axis not decoded", part.name)))?;
        times.extend_from_slice(part_times);
    }

    let views: Vec<_> = parts.iter().map(|p| p.data().view()).collect();
    let data = concatenate(NdAxis(pos), &views)
        .map_err(|e| CatalogError::Read(format!("{}: {}", first.name, e)))?;

    let mut axes = first.axes().to_vec();
    axes[pos].values = AxisValues::Times(times);

    let mut joined = GriddedField::new(first.name.clone(), first.kind, axes, data)?
        .with_convention(first.convention);
    for (key, value) in first.attrs() {
        joined.set_attr(key.clone(), value.clone());
    }
    // Time-invariant auxiliary coordinates carry over from the first piece.
    let time_name = &first.axes()[pos].name;
    for (name, coord) in first.aux_coords() {
        if !coord.dims.contains(time_name) {
            joined = joined.with_aux_coord(name.clone(), coord.clone())?;
        }
    }
    Ok(joined)
}
