//! Grid staggering and coordinate conventions of the ocean and sea-ice models.

use serde::{Deserialize, Serialize};

/// Axis names used by the ocean and sea-ice model output.
pub mod names {
    /// Time axis (shared)
    pub const TIME: &str = "time";
    /// Ocean cell-centre latitude
    pub const YT_OCEAN: &str = "yt_ocean";
    /// Ocean cell-centre longitude
    pub const XT_OCEAN: &str = "xt_ocean";
    /// Ocean velocity-point latitude
    pub const YU_OCEAN: &str = "yu_ocean";
    /// Ocean velocity-point longitude
    pub const XU_OCEAN: &str = "xu_ocean";
    /// Ocean tracer depth levels
    pub const ST_OCEAN: &str = "st_ocean";
    /// Sea-ice native row index
    pub const NJ: &str = "nj";
    /// Sea-ice native column index
    pub const NI: &str = "ni";
    /// SDM model axis
    pub const MODEL: &str = "model";
}

/// Which horizontal grid a field lives on.
///
/// Assigned once when the field is ingested; downstream code asks the kind for
/// its axis names instead of inspecting variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridKind {
    /// Ocean tracer ("t") points.
    #[default]
    CellCenter,
    /// Ocean velocity ("u/v") points.
    UPoint,
    /// Sea-ice model native index grid.
    IceNative,
}

impl GridKind {
    /// Name of the latitude-like axis for this grid.
    pub fn y_axis(&self) -> &'static str {
        match self {
            Self::CellCenter => names::YT_OCEAN,
            Self::UPoint => names::YU_OCEAN,
            Self::IceNative => names::NJ,
        }
    }

    /// Name of the longitude-like axis for this grid.
    pub fn x_axis(&self) -> &'static str {
        match self {
            Self::CellCenter => names::XT_OCEAN,
            Self::UPoint => names::XU_OCEAN,
            Self::IceNative => names::NI,
        }
    }

    /// Classify a variable at ingestion from its name and axis names.
    pub fn classify<'a>(variable: &str, axis_names: impl IntoIterator<Item = &'a str>) -> Self {
        if matches!(variable, "u" | "v") {
            return Self::UPoint;
        }
        let mut kind = Self::CellCenter;
        for name in axis_names {
            match name {
                names::YU_OCEAN | names::XU_OCEAN => return Self::UPoint,
                names::NJ | names::NI => kind = Self::IceNative,
                _ => {}
            }
        }
        kind
    }
}

impl std::fmt::Display for GridKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CellCenter => write!(f, "t"),
            Self::UPoint => write!(f, "u/v"),
            Self::IceNative => write!(f, "ice"),
        }
    }
}

/// Longitude convention of an x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongitudeRange {
    /// [0, 360)
    ZeroTo360,
    /// [-180, 180)
    Signed180,
}

impl LongitudeRange {
    /// Whether a longitude lies inside this range.
    pub fn contains(&self, lon: f64) -> bool {
        match self {
            Self::ZeroTo360 => (0.0..360.0).contains(&lon),
            Self::Signed180 => (-180.0..180.0).contains(&lon),
        }
    }

    /// Detect the convention of a longitude vector.
    ///
    /// Vectors inside [0, 180) fit both conventions and report `Signed180`.
    /// Returns `None` if the values fit neither.
    pub fn detect(values: &[f64]) -> Option<Self> {
        if values.iter().all(|&v| Self::Signed180.contains(v)) {
            Some(Self::Signed180)
        } else if values.iter().all(|&v| Self::ZeroTo360.contains(v)) {
            Some(Self::ZeroTo360)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_axis_names() {
        assert_eq!(GridKind::CellCenter.y_axis(), "yt_ocean");
        assert_eq!(GridKind::UPoint.x_axis(), "xu_ocean");
        assert_eq!(GridKind::IceNative.x_axis(), "ni");
    }

    #[test]
    fn test_classify() {
        assert_eq!(GridKind::classify("u", ["time", "yu_ocean"]), GridKind::UPoint);
        assert_eq!(
            GridKind::classify("temp", ["time", "st_ocean", "yt_ocean", "xt_ocean"]),
            GridKind::CellCenter
        );
        assert_eq!(GridKind::classify("aice", ["time", "nj", "ni"]), GridKind::IceNative);
    }

    #[test]
    fn test_longitude_detect() {
        assert_eq!(LongitudeRange::detect(&[-179.5, 0.0, 179.5]), Some(LongitudeRange::Signed180));
        assert_eq!(LongitudeRange::detect(&[0.5, 200.0, 359.5]), Some(LongitudeRange::ZeroTo360));
        assert_eq!(LongitudeRange::detect(&[-10.0, 300.0]), None);
    }
}
