use subsurface_core::nalgebra::{Point3, Vector3};
use subsurface_core::tables::{Collar, SurveyRow};
use subsurface_core::{Error, Result};

/// Doglegs below this angle (in radians) are treated as straight segments
const STRAIGHT_DOGLEG: f64 = 1e-9;

/// A point along a well path. `north`, `east` and `tvd` are offsets from the collar, `tvd` is positive downwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    pub md: f64,
    pub inc: f64,
    pub azi: f64,
    pub north: f64,
    pub east: f64,
    pub tvd: f64,
}

impl Station {
    /// Position of this station in world coordinates. `z` is the collar altitude minus the true vertical depth
    pub fn position(&self, collar: &Collar) -> Point3<f64> {
        Point3::new(collar.x + self.east, collar.y + self.north, collar.z - self.tvd)
    }
}

/// Unit tangent of a well path with the given inclination and azimuth (degrees) as `(north, east, down)`
pub fn direction(inc: f64, azi: f64) -> Vector3<f64> {
    let (inc, azi) = (inc.to_radians(), azi.to_radians());
    Vector3::new(inc.sin() * azi.cos(), inc.sin() * azi.sin(), inc.cos())
}

/// Inclination and azimuth (degrees) of a `(north, east, down)` tangent
fn angles(direction: &Vector3<f64>) -> (f64, f64) {
    let inc = direction.z.clamp(-1.0, 1.0).acos().to_degrees();
    let azi = direction.y.atan2(direction.x).to_degrees().rem_euclid(360.0);
    (inc, if azi >= 360.0 { 0.0 } else { azi })
}

/// Angle (radians) between two unit tangents
pub fn dogleg(from: &Vector3<f64>, to: &Vector3<f64>) -> f64 {
    from.dot(to).clamp(-1.0, 1.0).acos()
}

/// Ratio factor of the minimum curvature method for a dogleg of `beta` radians
pub fn ratio_factor(beta: f64) -> f64 {
    if beta > STRAIGHT_DOGLEG {
        2.0 / beta * (beta / 2.0).tan()
    } else {
        1.0
    }
}

/// Displacement `(north, east, down)` along a circular arc of the given `length` between two unit tangents
fn arc_displacement(length: f64, from: &Vector3<f64>, to: &Vector3<f64>) -> Vector3<f64> {
    (from + to) * (length / 2.0 * ratio_factor(dogleg(from, to)))
}

/// Tangent at fraction `t` of the arc between `from` and `to`
fn slerp(from: &Vector3<f64>, to: &Vector3<f64>, t: f64) -> Vector3<f64> {
    let beta = dogleg(from, to);
    let sin_beta = beta.sin();
    if beta <= STRAIGHT_DOGLEG || sin_beta.abs() <= STRAIGHT_DOGLEG {
        let lerp = from * (1.0 - t) + to * t;
        return lerp.try_normalize(STRAIGHT_DOGLEG).unwrap_or(*from);
    }
    (from * ((1.0 - t) * beta).sin() + to * (t * beta).sin()) / sin_beta
}

/// Computes the positions of all survey stations with the minimum curvature method. Positions are cumulated from the
/// first station, which sits at the collar. `survey` must be sorted by `md`
pub fn minimum_curvature(survey: &[SurveyRow]) -> Vec<Station> {
    let mut stations: Vec<Station> = Vec::with_capacity(survey.len());
    for row in survey {
        let (north, east, tvd) = match stations.last() {
            Some(previous) => {
                let delta = arc_displacement(
                    row.md - previous.md,
                    &direction(previous.inc, previous.azi),
                    &direction(row.inc, row.azi),
                );
                (previous.north + delta.x, previous.east + delta.y, previous.tvd + delta.z)
            }
            None => (0.0, 0.0, 0.0),
        };
        stations.push(Station {
            md: row.md,
            inc: row.inc,
            azi: row.azi,
            north,
            east,
            tvd,
        });
    }
    stations
}

/// Resamples the survey of a well onto the regular grid `0, step, 2 * step, ...` up to the last `md` of the survey.
/// Resampled stations lie on the minimum curvature arcs between the survey stations. A survey that does not start at
/// `md = 0` is extended with a station at `md = 0` with the angles of its first station.
///
/// Fails with a degenerate well error if the survey has fewer than two stations, or if the grid has a single station
pub fn resample(well_id: &str, survey: &[SurveyRow], step: f64) -> Result<Vec<Station>> {
    if survey.len() < 2 {
        return Err(Error::degenerate_well(
            well_id,
            format!("survey has {} station(s), at least 2 are required", survey.len()),
        ));
    }
    if survey[0].md < 0.0 {
        return Err(Error::format(format!(
            "well '{}' has a survey station at negative md {}",
            well_id, survey[0].md
        )));
    }

    let mut stations = vec![];
    if survey[0].md > 0.0 {
        stations.push(SurveyRow {
            md: 0.0,
            ..survey[0]
        });
    }
    stations.extend_from_slice(survey);
    let stations = minimum_curvature(&stations);

    let last_md = stations[stations.len() - 1].md;
    let n_steps = (last_md / step + 1e-9).floor() as usize;
    if n_steps == 0 {
        return Err(Error::degenerate_well(
            well_id,
            format!(
                "total md {} is shorter than the resampling step {}, the trajectory has a single station",
                last_md, step
            ),
        ));
    }

    let mut segment = 0;
    let resampled = (0..=n_steps)
        .map(|k| {
            let md = k as f64 * step;
            while segment + 2 < stations.len() && stations[segment + 1].md < md {
                segment += 1;
            }
            interpolate(&stations[segment], &stations[segment + 1], md)
        })
        .collect();
    Ok(resampled)
}

/// Station at `md` on the minimum curvature arc between `from` and `to`
fn interpolate(from: &Station, to: &Station, md: f64) -> Station {
    let length = to.md - from.md;
    let t = if length > 0.0 {
        ((md - from.md) / length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let start = direction(from.inc, from.azi);
    let tangent = slerp(&start, &direction(to.inc, to.azi), t);
    let delta = arc_displacement(md - from.md, &start, &tangent);
    let (inc, azi) = angles(&tangent);
    Station {
        md,
        inc,
        azi,
        north: from.north + delta.x,
        east: from.east + delta.y,
        tvd: from.tvd + delta.z,
    }
}
