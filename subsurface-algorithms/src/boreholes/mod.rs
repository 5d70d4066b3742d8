//! Borehole assembly: collar, survey, lithology and assay tables in, one validated [`LineSet`] out.
//!
//! The pipeline runs per well: normalize the survey angles, reconstruct and resample the trajectory with the minimum
//! curvature method, rasterize the lithology intervals and interpolate the assays onto the resampled `md` grid. Wells
//! that fail any stage are reported in [`Boreholes::missed_wells`] and are not part of the output.
//!
//! [`LineSet`]: subsurface_core::elements::LineSet

mod normalize;
pub use self::normalize::*;

mod trajectory;
pub use self::trajectory::*;

mod lithology;
pub use self::lithology::*;

mod assays;
pub use self::assays::*;

mod assembler;
pub use self::assembler::*;

use subsurface_core::{Error, Result};

/// Resampling step of well trajectories if none is given
pub const DEFAULT_STEP: f64 = 30.0;
/// Tube radius hint if none is given
pub const DEFAULT_RADIUS_HINT: f64 = 10.0;

/// Configuration of the borehole assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoreholeConfig {
    step: f64,
    radius_hint: f64,
}

impl BoreholeConfig {
    /// Creates a new configuration. Fails if `step` or `radius_hint` is not a positive, finite number
    pub fn new(step: f64, radius_hint: f64) -> Result<Self> {
        for (name, value) in [("step", step), ("radius_hint", radius_hint)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::format(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        Ok(Self { step, radius_hint })
    }

    /// Resampling step of the trajectories along `md`
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Radius hint for rendering the wells as tubes
    pub fn radius_hint(&self) -> f64 {
        self.radius_hint
    }
}

impl Default for BoreholeConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            radius_hint: DEFAULT_RADIUS_HINT,
        }
    }
}

/// What to do if the collar and survey tables do not contain the same wells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Fail with a set mismatch error that lists the unmatched wells
    #[default]
    Raise,
    /// Drop the unmatched wells and report them as missed
    Intersect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use subsurface_core::ErrorKind;

    #[test]
    fn test_config_validation() {
        assert_eq!(BoreholeConfig::default().step(), 30.0);
        assert!(BoreholeConfig::new(15.0, 2.0).is_ok());
        for (step, radius) in [(0.0, 1.0), (-1.0, 1.0), (f64::NAN, 1.0), (1.0, 0.0), (1.0, f64::INFINITY)] {
            assert_eq!(BoreholeConfig::new(step, radius).unwrap_err().kind(), ErrorKind::Format);
        }
    }
}
