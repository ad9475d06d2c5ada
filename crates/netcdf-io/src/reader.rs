//! Decoding NetCDF variables into [`GriddedField`]s.

use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use ocean_common::{
    names, AuxCoord, Axis, AxisRole, AxisValues, GridKind, GriddedField, TimeConvention,
};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{get_f32_attr, get_global_str_attr, get_str_attr, silence_hdf5_errors};
use crate::units::TimeUnits;

/// Variables and global metadata of a file, read from its header only.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub variables: Vec<String>,
    /// Global `frequency` attribute, e.g. "1 daily".
    pub frequency: Option<String>,
}

/// Read the variable list and frequency of a file.
pub fn inspect<P: AsRef<Path>>(path: P) -> NetCdfResult<FileSummary> {
    silence_hdf5_errors();
    let file = netcdf::open(path.as_ref())?;
    Ok(FileSummary {
        variables: file.variables().map(|v| v.name()).collect(),
        frequency: get_global_str_attr(&file, "frequency"),
    })
}

/// Role of a dimension given its name in ocean or sea-ice output.
pub fn role_for_dimension(name: &str) -> AxisRole {
    match name {
        names::TIME => AxisRole::Time,
        names::ST_OCEAN | "sw_ocean" | "depth" | "nc" => AxisRole::Depth,
        names::YT_OCEAN | names::YU_OCEAN | names::NJ | "lat" | "latitude" => AxisRole::Y,
        names::XT_OCEAN | names::XU_OCEAN | names::NI | "lon" | "longitude" => AxisRole::X,
        names::MODEL => AxisRole::Model,
        _ => AxisRole::Other,
    }
}

/// Read one variable of a file into a field.
///
/// Packed values are unpacked with `scale_factor`/`add_offset`, and
/// `_FillValue`/`missing_value` become NaN. When `decode_coords` is false the
/// variable's auxiliary coordinates (its `coordinates` attribute) are not read.
pub fn read_field<P: AsRef<Path>>(
    path: P,
    variable: &str,
    decode_coords: bool,
) -> NetCdfResult<GriddedField> {
    silence_hdf5_errors();
    let path = path.as_ref();
    let file = netcdf::open(path)?;
    let var = file
        .variable(variable)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", variable)))?;

    let dims: Vec<(String, usize)> = var
        .dimensions()
        .iter()
        .map(|d| (d.name(), d.len()))
        .collect();

    let mut axes = Vec::with_capacity(dims.len());
    for (name, len) in &dims {
        axes.push(read_axis(&file, name, *len)?);
    }

    let raw: Vec<f32> = var.get_values(..)?;
    let scale = get_f32_attr(&var, "scale_factor").unwrap_or(1.0);
    let offset = get_f32_attr(&var, "add_offset").unwrap_or(0.0);
    let fill = get_f32_attr(&var, "_FillValue");
    let missing = get_f32_attr(&var, "missing_value");

    let values: Vec<f32> = raw
        .into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing || v.is_nan() {
                f32::NAN
            } else {
                v * scale + offset
            }
        })
        .collect();

    let kind = GridKind::classify(variable, dims.iter().map(|(n, _)| n.as_str()));
    let convention = if kind == GridKind::IceNative {
        TimeConvention::Ice
    } else {
        TimeConvention::Ocean
    };

    let mut field = GriddedField::from_vec(variable, kind, axes, values)?.with_convention(convention);
    for key in ["units", "long_name", "standard_name"] {
        if let Some(value) = get_str_attr(&var, key) {
            field.set_attr(key, value);
        }
    }

    if decode_coords {
        if let Some(coords) = get_str_attr(&var, "coordinates") {
            for name in coords.split_whitespace() {
                if let Some(coord) = read_aux_coord(&file, name)? {
                    field = field.with_aux_coord(name, coord)?;
                }
            }
        }
    }

    debug!(
        path = %path.display(),
        variable = variable,
        shape = ?field.shape(),
        kind = %field.kind,
        "Read NetCDF variable"
    );

    Ok(field)
}

fn read_axis(file: &netcdf::File, name: &str, len: usize) -> NetCdfResult<Axis> {
    let role = role_for_dimension(name);
    let Some(coord) = file.variable(name) else {
        return Ok(Axis::index(name, role, len));
    };

    let raw: Vec<f64> = coord.get_values(..)?;
    let values = match role {
        AxisRole::Time => {
            let units = get_str_attr(&coord, "units")
                .ok_or_else(|| NetCdfError::MissingData(format!("units of {}", name)))?;
            let calendar = get_str_attr(&coord, "calendar");
            let units = TimeUnits::parse(&units, calendar.as_deref())?;
            AxisValues::Times(raw.iter().map(|&v| units.decode(v)).collect())
        }
        AxisRole::Depth => AxisValues::Levels(raw),
        _ => AxisValues::Degrees(raw),
    };

    Ok(Axis::new(name, role, values))
}

fn read_aux_coord(file: &netcdf::File, name: &str) -> NetCdfResult<Option<AuxCoord>> {
    let Some(var) = file.variable(name) else {
        return Ok(None);
    };
    let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let raw: Vec<f64> = var.get_values(..)?;
    let values = ArrayD::from_shape_vec(IxDyn(&shape), raw)
        .map_err(|e| NetCdfError::InvalidFormat(format!("{}: {}", name, e)))?;
    Ok(Some(AuxCoord { dims, values }))
}
