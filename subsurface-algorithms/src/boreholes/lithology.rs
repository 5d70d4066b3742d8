use std::collections::HashMap;

use serde_json::{Map, Value};
use subsurface_core::tables::{LithInterval, RawLithRow};
use subsurface_core::{Error, Result};

/// Code of depths that are not within any lithology interval
pub const NO_LITHOLOGY: i64 = 0;

/// Sign convention of the depths in a lithology table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthSign {
    /// Depths are given as non-negative magnitudes
    Positive,
    /// Depths are already stored as non-positive values
    NonPositive,
}

/// Detects the sign convention of all `top` and `base` values of a lithology table. Zeros fit either convention. Fails
/// with a format error if the table mixes positive and negative depths
pub fn detect_depth_sign<'a, I: IntoIterator<Item = &'a RawLithRow>>(rows: I) -> Result<DepthSign> {
    let (mut positive, mut negative) = (false, false);
    for row in rows {
        for value in row.top.iter().chain(std::iter::once(&row.base)) {
            positive |= *value > 0.0;
            negative |= *value < 0.0;
        }
    }
    match (positive, negative) {
        (true, true) => Err(Error::format(
            "lithology table mixes positive and negative depths",
        )),
        (_, true) => Ok(DepthSign::NonPositive),
        _ => Ok(DepthSign::Positive),
    }
}

/// Converts the lithology rows of one well into intervals with non-positive depths. Rows without a `top` get one
/// derived from the previous row: `top_0 = 0` and `top_i = base_(i-1) + altitude_i`. Fails with a format error if a
/// `top` cannot be derived or if an interval does not have `top < base` in magnitude
pub fn normalize_well_lithology<'a, I: IntoIterator<Item = &'a RawLithRow>>(
    well_id: &str,
    rows: I,
    sign: DepthSign,
) -> Result<Vec<LithInterval>> {
    let mut previous_base: Option<f64> = None;
    let mut intervals = vec![];
    for row in rows {
        let top = match (row.top, row.altitude) {
            (Some(top), _) => top,
            (None, Some(altitude)) => previous_base.map_or(0.0, |base| base + altitude),
            (None, None) => {
                return Err(Error::format(format!(
                    "well '{}': lithology interval '{}' has neither top nor altitude",
                    well_id, row.component_lith
                )))
            }
        };
        previous_base = Some(row.base);

        let (top, base) = match sign {
            DepthSign::Positive => (-top, -row.base),
            DepthSign::NonPositive => (top, row.base),
        };
        // Stored depths are non-positive, so deeper means smaller
        if !(top.is_finite() && base.is_finite() && top > base) {
            return Err(Error::format(format!(
                "well '{}': lithology interval '{}' must have top above base, got top {} and base {}",
                well_id, row.component_lith, top, base
            )));
        }
        intervals.push(LithInterval {
            top,
            base,
            component_lith: row.component_lith.clone(),
        });
    }
    Ok(intervals)
}

/// Stable mapping from lithology names to small integer codes, in order of first appearance and starting at 1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LithCodes {
    names: Vec<String>,
    codes: HashMap<String, i64>,
}

impl LithCodes {
    pub fn from_names<S: AsRef<str>, I: IntoIterator<Item = S>>(names: I) -> Self {
        let mut lith_codes = Self::default();
        for name in names {
            lith_codes.insert(name.as_ref());
        }
        lith_codes
    }

    /// Returns the code of `name`, assigning the next free code if `name` is new
    pub fn insert(&mut self, name: &str) -> i64 {
        if let Some(code) = self.codes.get(name) {
            return *code;
        }
        self.names.push(name.to_owned());
        let code = self.names.len() as i64;
        self.codes.insert(name.to_owned(), code);
        code
    }

    /// Code of `name`, [`NO_LITHOLOGY`] for unknown names
    pub fn code(&self, name: &str) -> i64 {
        self.codes.get(name).copied().unwrap_or(NO_LITHOLOGY)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The mapping as a JSON object `{name: code}`
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.names
                .iter()
                .map(|name| (name.clone(), Value::from(self.code(name))))
                .collect::<Map<_, _>>(),
        )
    }
}

/// Samples the lithology of a well at the given depths. The value at depth `d` is the code of the first interval with
/// `top <= |d| < base` (in magnitudes), or [`NO_LITHOLOGY`] if no interval contains `d`
pub fn rasterize(intervals: &[LithInterval], codes: &LithCodes, basis: &[f64]) -> Vec<i64> {
    basis
        .iter()
        .map(|depth| {
            intervals
                .iter()
                .find(|interval| interval.contains_depth(*depth))
                .map_or(NO_LITHOLOGY, |interval| codes.code(&interval.component_lith))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use subsurface_core::ErrorKind;

    #[test]
    fn test_rasterize_two_intervals() -> Result<()> {
        let rows = vec![RawLithRow::new("W1", 0.0, 50.0, "A"), RawLithRow::new("W1", 50.0, 100.0, "B")];
        let sign = detect_depth_sign(&rows)?;
        assert_eq!(sign, DepthSign::Positive);
        let intervals = normalize_well_lithology("W1", &rows, sign)?;
        assert_eq!(intervals[1].top, -50.0);
        assert_eq!(intervals[1].base, -100.0);

        let codes = LithCodes::from_names(rows.iter().map(|r| &r.component_lith));
        assert_eq!((codes.code("A"), codes.code("B")), (1, 2));
        assert_eq!(rasterize(&intervals, &codes, &[0.0, 30.0, 60.0, 90.0]), vec![1, 1, 2, 2]);
        assert_eq!(rasterize(&intervals, &codes, &[100.0, 120.0]), vec![NO_LITHOLOGY, NO_LITHOLOGY]);
        Ok(())
    }

    #[test]
    fn test_non_positive_depths_are_kept() -> Result<()> {
        let rows = vec![RawLithRow::new("W1", 0.0, -20.0, "A"), RawLithRow::new("W1", -20.0, -30.0, "B")];
        let sign = detect_depth_sign(&rows)?;
        assert_eq!(sign, DepthSign::NonPositive);
        let intervals = normalize_well_lithology("W1", &rows, sign)?;
        assert_eq!(intervals[0].base, -20.0);
        Ok(())
    }

    #[test]
    fn test_mixed_signs_are_rejected() {
        let rows = vec![RawLithRow::new("W1", 0.0, 20.0, "A"), RawLithRow::new("W2", -20.0, -30.0, "B")];
        assert_eq!(detect_depth_sign(&rows).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn test_tops_from_altitude() -> Result<()> {
        let rows = [(10.0, "A"), (25.0, "B"), (40.0, "C")]
            .iter()
            .map(|(base, lith)| RawLithRow {
                well_id: "W1".into(),
                top: None,
                base: *base,
                altitude: Some(0.0),
                component_lith: lith.to_string(),
            })
            .collect::<Vec<_>>();
        let intervals = normalize_well_lithology("W1", &rows, DepthSign::Positive)?;
        let tops = intervals.iter().map(|i| i.top).collect::<Vec<_>>();
        assert_eq!(tops, vec![0.0, -10.0, -25.0]);
        Ok(())
    }

    #[test]
    fn test_inverted_interval_is_rejected() {
        let rows = vec![RawLithRow::new("W1", 50.0, 10.0, "A")];
        let err = normalize_well_lithology("W1", &rows, DepthSign::Positive).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_codes_follow_first_appearance() {
        let codes = LithCodes::from_names(["clay", "sand", "clay", "granite"]);
        assert_eq!(codes.names(), ["clay", "sand", "granite"]);
        assert_eq!(codes.code("granite"), 3);
        assert_eq!(codes.code("basalt"), NO_LITHOLOGY);
        assert_eq!(codes.to_json(), serde_json::json!({"clay": 1, "sand": 2, "granite": 3}));
    }
}
