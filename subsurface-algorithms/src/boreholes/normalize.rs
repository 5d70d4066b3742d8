use log::warn;
use subsurface_core::tables::{RawSurveyRow, SurveyRow};
use subsurface_core::{Error, Result};

/// Offset applied to inclinations of exactly 180 degrees, which are singular for the trajectory computation
pub const INCLINATION_NUDGE: f64 = 1e-6;

/// Normalizes an inclination into `[0, 180)` degrees. Negative values are wrapped modulo 360, values within
/// `(180, 360]` are reflected and exactly 180 degrees is nudged down by [`INCLINATION_NUDGE`]. Values above 360 and
/// non-finite values fail with an angle range error
/// ```
/// # use subsurface_algorithms::boreholes::normalize_inclination;
/// assert_eq!(normalize_inclination(-90.0).unwrap(), 90.0);
/// assert_eq!(normalize_inclination(270.0).unwrap(), 90.0);
/// assert!(normalize_inclination(400.0).is_err());
/// ```
pub fn normalize_inclination(inc: f64) -> Result<f64> {
    if !inc.is_finite() {
        return Err(Error::AngleRange {
            value: inc,
            details: "inclination is not a finite number".into(),
        });
    }
    let wrapped = if inc < 0.0 { inc.rem_euclid(360.0) } else { inc };
    if wrapped > 360.0 {
        return Err(Error::AngleRange {
            value: inc,
            details: "inclination must be within 0..=360 degrees".into(),
        });
    }
    let reflected = if wrapped > 180.0 { 360.0 - wrapped } else { wrapped };
    if reflected >= 180.0 {
        Ok(180.0 - INCLINATION_NUDGE)
    } else {
        Ok(reflected)
    }
}

/// Reduces an azimuth modulo 360 into `[0, 360)` degrees
pub fn normalize_azimuth(azi: f64) -> Result<f64> {
    if !azi.is_finite() {
        return Err(Error::AngleRange {
            value: azi,
            details: "azimuth is not a finite number".into(),
        });
    }
    let reduced = azi.rem_euclid(360.0);
    // `rem_euclid` rounds tiny negative values up to exactly 360
    Ok(if reduced >= 360.0 { 0.0 } else { reduced })
}

/// Converts a dip (degrees from horizontal) into an inclination (degrees from vertical)
pub fn dip_to_inclination(dip: f64) -> f64 {
    90.0 - dip
}

/// Normalizes a single survey station. Returns the normalized station and whether one of its angles was missing and
/// defaulted to `0`
pub fn normalize_station(row: &RawSurveyRow) -> Result<(SurveyRow, bool)> {
    if !row.md.is_finite() {
        return Err(Error::format(format!(
            "well '{}' has a survey station with non-finite md",
            row.well_id
        )));
    }
    let inc = row.inc.or_else(|| row.dip.map(dip_to_inclination));
    let defaulted = inc.is_none() || row.azi.is_none();
    Ok((
        SurveyRow {
            md: row.md,
            inc: normalize_inclination(inc.unwrap_or(0.0))?,
            azi: normalize_azimuth(row.azi.unwrap_or(0.0))?,
        },
        defaulted,
    ))
}

/// Normalizes the survey stations of one well and sorts them by `md`. Stations with a duplicate `md` are collapsed
/// (the first one wins). Missing angles default to `0`, i.e. a vertical well, which is reported as a warning
pub fn normalize_survey<'a, I: IntoIterator<Item = &'a RawSurveyRow>>(
    well_id: &str,
    rows: I,
) -> Result<Vec<SurveyRow>> {
    let mut defaulted_any = false;
    let mut stations = rows
        .into_iter()
        .map(|row| {
            let (station, defaulted) = normalize_station(row)?;
            defaulted_any |= defaulted;
            Ok(station)
        })
        .collect::<Result<Vec<_>>>()?;
    if defaulted_any {
        warn!(
            "Well '{}' has survey stations without inclination or azimuth, assuming 0",
            well_id
        );
    }
    // Stable sort, so that the first of several stations at the same md is kept
    stations.sort_by(|a, b| a.md.total_cmp(&b.md));
    stations.dedup_by(|later, earlier| later.md == earlier.md);
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use subsurface_core::ErrorKind;

    #[test]
    fn test_inclination_rules() -> Result<()> {
        assert_eq!(normalize_inclination(0.0)?, 0.0);
        assert_eq!(normalize_inclination(45.0)?, 45.0);
        assert_eq!(normalize_inclination(-10.0)?, 10.0);
        assert_eq!(normalize_inclination(190.0)?, 170.0);
        assert_eq!(normalize_inclination(360.0)?, 0.0);
        assert_eq!(normalize_inclination(180.0)?, 180.0 - INCLINATION_NUDGE);
        assert_eq!(normalize_inclination(-180.0)?, 180.0 - INCLINATION_NUDGE);
        Ok(())
    }

    #[test]
    fn test_inclination_out_of_range() {
        assert_eq!(normalize_inclination(360.5).unwrap_err().kind(), ErrorKind::AngleRange);
        assert_eq!(normalize_inclination(f64::NAN).unwrap_err().kind(), ErrorKind::AngleRange);
    }

    #[test]
    fn test_azimuth_is_reduced() -> Result<()> {
        assert_eq!(normalize_azimuth(370.0)?, 10.0);
        assert_eq!(normalize_azimuth(-90.0)?, 270.0);
        assert_eq!(normalize_azimuth(360.0)?, 0.0);
        assert_eq!(normalize_azimuth(-1e-20)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_normalization_is_idempotent_and_bounded() -> Result<()> {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let inc = rng.gen_range(-720.0..360.0);
            let azi = rng.gen_range(-1000.0..1000.0);
            let once = (normalize_inclination(inc)?, normalize_azimuth(azi)?);
            let twice = (normalize_inclination(once.0)?, normalize_azimuth(once.1)?);
            assert_eq!(once, twice);
            assert!((0.0..180.0).contains(&once.0));
            assert!((0.0..360.0).contains(&once.1));
        }
        Ok(())
    }

    #[test]
    fn test_dip_and_missing_angles() -> Result<()> {
        let dip_row = RawSurveyRow {
            well_id: "W1".into(),
            md: 10.0,
            inc: None,
            azi: Some(45.0),
            dip: Some(60.0),
        };
        let (station, defaulted) = normalize_station(&dip_row)?;
        assert_eq!(station.inc, 30.0);
        assert!(!defaulted);

        let bare_row = RawSurveyRow {
            well_id: "W1".into(),
            md: 20.0,
            inc: None,
            azi: None,
            dip: None,
        };
        let (station, defaulted) = normalize_station(&bare_row)?;
        assert_eq!((station.inc, station.azi), (0.0, 0.0));
        assert!(defaulted);
        Ok(())
    }

    #[test]
    fn test_survey_is_sorted_and_deduplicated() -> Result<()> {
        let rows = vec![
            RawSurveyRow::new("W1", 50.0, 10.0, 0.0),
            RawSurveyRow::new("W1", 0.0, 0.0, 0.0),
            RawSurveyRow::new("W1", 50.0, 20.0, 0.0),
        ];
        let survey = normalize_survey("W1", &rows)?;
        assert_eq!(survey.iter().map(|s| s.md).collect::<Vec<_>>(), vec![0.0, 50.0]);
        assert_eq!(survey[1].inc, 10.0);
        Ok(())
    }
}
