//! Rows of the tabular borehole sources. Readers produce the `Raw*` rows as they appear in the input; the borehole
//! pipeline normalizes them into [`SurveyRow`] and [`LithInterval`].

/// Surface location of a borehole. `z` is the altitude of the collar
#[derive(Debug, Clone, PartialEq)]
pub struct Collar {
    pub well_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Collar {
    pub fn new(well_id: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            well_id: well_id.into(),
            x,
            y,
            z,
        }
    }
}

/// A survey station as read from a survey table. Either `inc` or `dip` may be given; both angles may be missing
#[derive(Debug, Clone, PartialEq)]
pub struct RawSurveyRow {
    pub well_id: String,
    pub md: f64,
    pub inc: Option<f64>,
    pub azi: Option<f64>,
    pub dip: Option<f64>,
}

impl RawSurveyRow {
    /// Creates a survey row with inclination and azimuth
    pub fn new(well_id: impl Into<String>, md: f64, inc: f64, azi: f64) -> Self {
        Self {
            well_id: well_id.into(),
            md,
            inc: Some(inc),
            azi: Some(azi),
            dip: None,
        }
    }
}

/// A normalized survey station: `0 <= inc < 180` and `0 <= azi < 360`, both in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurveyRow {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
}

/// A lithology interval as read from a lithology table. `top` may be missing if `altitude` is given, in which case
/// it is derived from the base of the previous interval of the same well
#[derive(Debug, Clone, PartialEq)]
pub struct RawLithRow {
    pub well_id: String,
    pub top: Option<f64>,
    pub base: f64,
    pub altitude: Option<f64>,
    pub component_lith: String,
}

impl RawLithRow {
    pub fn new(well_id: impl Into<String>, top: f64, base: f64, component_lith: impl Into<String>) -> Self {
        Self {
            well_id: well_id.into(),
            top: Some(top),
            base,
            altitude: None,
            component_lith: component_lith.into(),
        }
    }
}

/// A normalized lithology interval. `top` and `base` are stored as non-positive depths (`base <= top <= 0`) so that
/// they combine with upward-positive elevations
#[derive(Debug, Clone, PartialEq)]
pub struct LithInterval {
    pub top: f64,
    pub base: f64,
    pub component_lith: String,
}

impl LithInterval {
    /// Whether the depth magnitude `depth` lies within `top <= |depth| < base` (in magnitudes)
    pub fn contains_depth(&self, depth: f64) -> bool {
        let depth = depth.abs();
        -self.top <= depth && depth < -self.base
    }
}

/// One sample of an assay table: a depth and one value per channel
#[derive(Debug, Clone, PartialEq)]
pub struct AssayRow {
    pub well_id: String,
    pub basis: f64,
    pub values: Vec<f64>,
}

/// Assay samples with named channels. Every row has one value per channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssayTable {
    pub channel_names: Vec<String>,
    pub rows: Vec<AssayRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lith_interval_contains_depth() {
        let interval = LithInterval {
            top: -50.0,
            base: -100.0,
            component_lith: "B".into(),
        };
        assert!(interval.contains_depth(50.0));
        assert!(interval.contains_depth(-60.0));
        assert!(!interval.contains_depth(100.0));
        assert!(!interval.contains_depth(30.0));
    }
}
