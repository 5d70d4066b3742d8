use std::io::BufRead;

use itertools::Itertools;
use log::debug;
use subsurface_core::nalgebra::Vector3;
use subsurface_core::tables::{AssayRow, AssayTable, Collar, RawLithRow, RawSurveyRow};
use subsurface_core::{Error, Result};

use super::{DelimitedTable, DelimitedTableOptions};

const WELL_ID: &[&str] = &["well_id", "id", "hole_id", "name", "well"];
const X: &[&str] = &["x", "easting"];
const Y: &[&str] = &["y", "northing"];
const ALTITUDE: &[&str] = &["altitude", "z"];
const MD: &[&str] = &["md", "depth"];
const INC: &[&str] = &["inc", "inclination"];
const DIP: &[&str] = &["dip"];
const AZI: &[&str] = &["azi", "azimuth"];
const TOP: &[&str] = &["top", "from"];
const BASE: &[&str] = &["base", "to"];
const LITH: &[&str] = &["component_lith", "lith", "lithology"];
const BASIS: &[&str] = &["basis", "depth", "from"];

/// Reads a collar table with one row per well
pub fn read_collars<R: BufRead>(reader: R, options: DelimitedTableOptions) -> Result<Vec<Collar>> {
    let table = DelimitedTable::from_read(reader, options)?;
    let id = table.require_column(WELL_ID)?;
    let x = table.require_column(X)?;
    let y = table.require_column(Y)?;
    let z = table.require_column(ALTITUDE)?;
    table
        .rows()
        .map(|row| Ok(Collar::new(row.text(id), row.number(x)?, row.number(y)?, row.number(z)?)))
        .collect()
}

/// Reads a survey table. Stations are given either as `md` with `inc`/`dip` and `azi` (any of the angles may be
/// missing), or as `x, y, z` positions along the well. Positions are converted into stations: `md` is the distance
/// along the well (unless an `md` column is given), and the angles are taken from the segment that ends at a station
pub fn read_survey<R: BufRead>(reader: R, options: DelimitedTableOptions) -> Result<Vec<RawSurveyRow>> {
    let table = DelimitedTable::from_read(reader, options)?;
    let id = table.require_column(WELL_ID)?;
    let inc = table.find_column(INC);
    let dip = table.find_column(DIP);
    let azi = table.find_column(AZI);
    let positions = (table.find_column(X), table.find_column(Y), table.find_column(&["z"]));

    if let (None, None, None, (Some(x), Some(y), Some(z))) = (inc, dip, azi, positions) {
        debug!("Survey table has positions instead of angles, deriving stations");
        let md = table.find_column(MD);
        let rows = table
            .rows()
            .map(|row| {
                let md = md.map(|md| row.number(md)).transpose()?;
                let position = Vector3::new(row.number(x)?, row.number(y)?, row.number(z)?);
                Ok((row.text(id).to_owned(), md, position))
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok(stations_from_positions(rows));
    }

    let md = table.require_column(MD)?;
    table
        .rows()
        .map(|row| {
            Ok(RawSurveyRow {
                well_id: row.text(id).to_owned(),
                md: row.number(md)?,
                inc: inc.map(|c| row.optional_number(c)).transpose()?.flatten(),
                azi: azi.map(|c| row.optional_number(c)).transpose()?.flatten(),
                dip: dip.map(|c| row.optional_number(c)).transpose()?.flatten(),
            })
        })
        .collect()
}

/// Converts the positions of all wells into stations. Rows of one well keep their table order, even if the rows of
/// several wells are interleaved. Wells are emitted in order of first appearance
fn stations_from_positions(rows: Vec<(String, Option<f64>, Vector3<f64>)>) -> Vec<RawSurveyRow> {
    let well_order = rows
        .iter()
        .map(|(well_id, _, _)| well_id.clone())
        .unique()
        .collect::<Vec<_>>();
    let mut wells = rows
        .into_iter()
        .map(|(well_id, md, position)| (well_id, (md, position)))
        .into_group_map();

    let mut stations = vec![];
    for well_id in well_order {
        let well_rows = wells.remove(&well_id).unwrap_or_default();
        let mut md = 0.0;
        for (idx, (given_md, position)) in well_rows.iter().enumerate() {
            // The first station points along the first segment
            let segment = match (idx, well_rows.get(1)) {
                (0, Some((_, next))) => next - position,
                (0, None) => Vector3::new(0.0, 0.0, -1.0),
                _ => position - well_rows[idx - 1].1,
            };
            if idx > 0 {
                md += segment.norm();
            }
            let length = segment.norm();
            let (inc, azi) = if length > 0.0 {
                (
                    (-segment.z / length).clamp(-1.0, 1.0).acos().to_degrees(),
                    segment.x.atan2(segment.y).to_degrees(),
                )
            } else {
                (0.0, 0.0)
            };
            stations.push(RawSurveyRow {
                well_id: well_id.clone(),
                md: given_md.unwrap_or(md),
                inc: Some(inc),
                azi: Some(azi),
                dip: None,
            });
        }
    }
    stations
}

/// Reads a lithology table. If there is no `top` column, an `altitude` column is required so that tops can be derived
/// from the bases
pub fn read_lithology<R: BufRead>(reader: R, options: DelimitedTableOptions) -> Result<Vec<RawLithRow>> {
    let table = DelimitedTable::from_read(reader, options)?;
    let id = table.require_column(WELL_ID)?;
    let base = table.require_column(BASE)?;
    let lith = table.require_column(LITH)?;
    let top = table.find_column(TOP);
    let altitude = table.find_column(&["altitude"]);
    if top.is_none() && altitude.is_none() {
        return Err(Error::format(
            "lithology table needs either a 'top' or an 'altitude' column",
        ));
    }
    table
        .rows()
        .map(|row| {
            Ok(RawLithRow {
                well_id: row.text(id).to_owned(),
                top: top.map(|c| row.optional_number(c)).transpose()?.flatten(),
                base: row.number(base)?,
                altitude: altitude.map(|c| row.optional_number(c)).transpose()?.flatten(),
                component_lith: row.text(lith).to_owned(),
            })
        })
        .collect()
}

/// Reads an assay table. Every column other than the well id, the basis and an optional interval end (`to`) is a
/// channel. Empty fields are read as NaN
pub fn read_assays<R: BufRead>(reader: R, options: DelimitedTableOptions) -> Result<AssayTable> {
    let table = DelimitedTable::from_read(reader, options)?;
    let id = table.require_column(WELL_ID)?;
    let basis = table.require_column(BASIS)?;
    let interval_end = table.find_column(&["to"]);
    let channels = (0..table.headers().len())
        .filter(|column| *column != id && *column != basis && Some(*column) != interval_end)
        .collect::<Vec<_>>();
    if channels.is_empty() {
        return Err(Error::format("assay table has no channel columns"));
    }

    let rows = table
        .rows()
        .map(|row| {
            Ok(AssayRow {
                well_id: row.text(id).to_owned(),
                basis: row.number(basis)?,
                values: channels
                    .iter()
                    .map(|c| Ok(row.optional_number(*c)?.unwrap_or(f64::NAN)))
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AssayTable {
        channel_names: channels.iter().map(|c| table.headers()[*c].clone()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use subsurface_core::ErrorKind;

    #[test]
    fn test_read_collars_with_aliases() -> Result<()> {
        let collars = read_collars("HOLE_ID,X,Y,Altitude\nW1,10,20,100.5\n".as_bytes(), Default::default())?;
        assert_eq!(collars, vec![Collar::new("W1", 10.0, 20.0, 100.5)]);
        Ok(())
    }

    #[test]
    fn test_read_survey_with_missing_angles() -> Result<()> {
        let survey = read_survey("id,depth,dip,azimuth\nW1,0,90,\nW1,50,80,45\n".as_bytes(), Default::default())?;
        assert_eq!(survey.len(), 2);
        assert_eq!(survey[0].dip, Some(90.0));
        assert_eq!(survey[0].inc, None);
        assert_eq!(survey[0].azi, None);
        assert_eq!(survey[1].azi, Some(45.0));
        Ok(())
    }

    #[test]
    fn test_read_survey_from_positions() -> Result<()> {
        let text = "well_id,x,y,z\nW1,0,0,100\nW1,0,0,70\nW1,30,0,70\n";
        let survey = read_survey(text.as_bytes(), Default::default())?;
        assert_eq!(survey.len(), 3);
        assert_approx_eq!(survey[0].inc.unwrap(), 0.0);
        assert_approx_eq!(survey[1].md, 30.0);
        assert_approx_eq!(survey[2].md, 60.0);
        assert_approx_eq!(survey[2].inc.unwrap(), 90.0);
        assert_approx_eq!(survey[2].azi.unwrap(), 90.0);
        Ok(())
    }

    #[test]
    fn test_read_survey_from_interleaved_positions() -> Result<()> {
        let text = "well_id,x,y,z\nW1,0,0,100\nW2,5,5,50\nW1,0,0,70\nW2,5,5,40\n";
        let survey = read_survey(text.as_bytes(), Default::default())?;
        let wells = survey.iter().map(|row| (row.well_id.as_str(), row.md)).collect::<Vec<_>>();
        assert_eq!(wells, vec![("W1", 0.0), ("W1", 30.0), ("W2", 0.0), ("W2", 10.0)]);
        Ok(())
    }

    #[test]
    fn test_read_lithology_without_top() -> Result<()> {
        let rows = read_lithology(
            "well_id\tbase\taltitude\tlith\nW1\t50\t0\tsand\n".as_bytes(),
            DelimitedTableOptions { delimiter: '\t' },
        )?;
        assert_eq!(rows[0].top, None);
        assert_eq!(rows[0].altitude, Some(0.0));
        assert_eq!(rows[0].component_lith, "sand");

        let err = read_lithology("well_id,base,lith\nW1,50,sand\n".as_bytes(), Default::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        Ok(())
    }

    #[test]
    fn test_read_assays() -> Result<()> {
        let assays = read_assays("well_id,from,to,Cu,Au\nW1,0,10,0.5,\nW1,10,20,0.7,1.2\n".as_bytes(), Default::default())?;
        assert_eq!(assays.channel_names, vec!["Cu", "Au"]);
        assert_eq!(assays.rows.len(), 2);
        assert!(assays.rows[0].values[1].is_nan());
        assert_eq!(assays.rows[1].values, vec![0.7, 1.2]);
        Ok(())
    }
}
