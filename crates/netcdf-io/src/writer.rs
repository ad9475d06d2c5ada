//! Writing [`GriddedField`]s as CF-style NetCDF files.

use std::path::Path;

use ocean_common::{AxisRole, AxisValues, GriddedField};
use tracing::debug;

use crate::error::NetCdfResult;
use crate::native::silence_hdf5_errors;
use crate::units::{TimeUnits, TIME_UNITS};

/// Fill value written in place of NaN (the netCDF default float fill).
pub const FILL_VALUE_F32: f32 = 9.969_21e36;

/// Write a field to a new NetCDF file, replacing any existing file at `path`.
///
/// Each axis becomes a dimension with a coordinate variable; label axes are
/// stored as a comma-separated global attribute `<axis>_labels`. Field
/// attributes are copied onto the data variable.
pub fn write_field<P: AsRef<Path>>(path: P, field: &GriddedField) -> NetCdfResult<()> {
    write_field_with(path, field, &[])
}

/// [`write_field`] plus extra global attributes, e.g. `("frequency", "1 daily")`.
pub fn write_field_with<P: AsRef<Path>>(
    path: P,
    field: &GriddedField,
    global_attrs: &[(&str, &str)],
) -> NetCdfResult<()> {
    silence_hdf5_errors();
    let path = path.as_ref();
    let mut file = netcdf::create(path)?;

    for axis in field.axes() {
        file.add_dimension(&axis.name, axis.len())?;
    }

    let time_units = TimeUnits::default_output();
    for axis in field.axes() {
        match &axis.values {
            AxisValues::Degrees(values) | AxisValues::Levels(values) => {
                let mut var = file.add_variable::<f64>(&axis.name, &[axis.name.as_str()])?;
                match axis.role {
                    AxisRole::Y => var.put_attribute("units", "degrees_north")?,
                    AxisRole::X => var.put_attribute("units", "degrees_east")?,
                    AxisRole::Depth => var.put_attribute("positive", "down")?,
                    _ => var.put_attribute("long_name", axis.name.as_str())?,
                };
                var.put_values(values.as_slice(), ..)?;
            }
            AxisValues::Times(times) => {
                let encoded: Vec<f64> = times.iter().map(|t| time_units.encode(t)).collect();
                let mut var = file.add_variable::<f64>(&axis.name, &[axis.name.as_str()])?;
                var.put_attribute("units", TIME_UNITS)?;
                var.put_attribute("calendar", "proleptic_gregorian")?;
                var.put_values(encoded.as_slice(), ..)?;
            }
            AxisValues::Labels(labels) => {
                file.add_attribute(&format!("{}_labels", axis.name), labels.join(",").as_str())?;
            }
            AxisValues::Index(_) => {}
        }
    }

    {
        let dims: Vec<&str> = field.axis_names().collect();
        let mut var = file.add_variable::<f32>(&field.name, &dims)?;
        var.put_attribute("_FillValue", FILL_VALUE_F32)?;
        for (key, value) in field.attrs() {
            var.put_attribute(key, value.as_str())?;
        }
        let values: Vec<f32> = field
            .data()
            .iter()
            .map(|v| if v.is_nan() { FILL_VALUE_F32 } else { *v })
            .collect();
        var.put_values(values.as_slice(), ..)?;
    }

    file.add_attribute("Conventions", "CF-1.8")?;
    for (key, value) in global_attrs {
        file.add_attribute(key, *value)?;
    }

    debug!(
        path = %path.display(),
        variable = %field.name,
        shape = ?field.shape(),
        "Wrote NetCDF field"
    );

    Ok(())
}
