use std::fmt::Display;

use thiserror::Error;

/// Label of an [`Error`], independent of the message it carries. Useful for matching on the category of a failure
/// without caring about the details, e.g. when collecting per-well failures during borehole assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Structure,
    ArityMismatch,
    AngleRange,
    SetMismatch,
    DegenerateWell,
    LegacyUpgrade,
    Format,
    Io,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::Structure => "STRUCTURE",
            ErrorKind::ArityMismatch => "ARITY-MISMATCH",
            ErrorKind::AngleRange => "ANGLE-RANGE",
            ErrorKind::SetMismatch => "SET-MISMATCH",
            ErrorKind::DegenerateWell => "DEGENERATE-WELL",
            ErrorKind::LegacyUpgrade => "LEGACY-UPGRADE",
            ErrorKind::Format => "FORMAT",
            ErrorKind::Io => "IO",
        };
        f.write_str(label)
    }
}

/// Errors raised by the containers, the borehole pipeline and the readers/writers
#[derive(Debug, Error)]
pub enum Error {
    /// A required named axis (or variable) is missing from a dataset
    #[error("missing required axis '{axis}': {details}")]
    Structure { axis: String, details: String },

    /// Cell arity is wrong, a cell index is out of range, or row counts disagree
    #[error("arity mismatch: {0}")]
    ArityMismatch(String),

    /// An inclination is outside of 0..=360 degrees after wrapping, or not a finite number
    #[error("angle {value} out of range: {details}")]
    AngleRange { value: f64, details: String },

    /// Collar and survey well-id sets differ. `missing` lists the symmetric difference
    #[error("collar and survey well ids differ, unmatched wells: {}", missing.join(", "))]
    SetMismatch { missing: Vec<String> },

    /// A well has fewer than two usable survey stations
    #[error("well '{well_id}' is degenerate: {details}")]
    DegenerateWell { well_id: String, details: String },

    /// A legacy dataset schema was detected but could not be remapped
    #[error("cannot upgrade legacy dataset: {0}")]
    LegacyUpgrade(String),

    /// Malformed or unsupported payload
    #[error("format error: {0}")]
    Format(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn structure(axis: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Structure {
            axis: axis.into(),
            details: details.into(),
        }
    }

    pub fn arity(details: impl Into<String>) -> Self {
        Self::ArityMismatch(details.into())
    }

    pub fn format(details: impl Into<String>) -> Self {
        Self::Format(details.into())
    }

    pub fn degenerate_well(well_id: impl Into<String>, details: impl Into<String>) -> Self {
        Self::DegenerateWell {
            well_id: well_id.into(),
            details: details.into(),
        }
    }

    /// Returns the label of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structure { .. } => ErrorKind::Structure,
            Error::ArityMismatch(_) => ErrorKind::ArityMismatch,
            Error::AngleRange { .. } => ErrorKind::AngleRange,
            Error::SetMismatch { .. } => ErrorKind::SetMismatch,
            Error::DegenerateWell { .. } => ErrorKind::DegenerateWell,
            Error::LegacyUpgrade(_) => ErrorKind::LegacyUpgrade,
            Error::Format(_) | Error::Json(_) => ErrorKind::Format,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_mismatch_message_names_wells() {
        let err = Error::SetMismatch {
            missing: vec!["W1".into(), "W3".into()],
        };
        assert_eq!(err.kind(), ErrorKind::SetMismatch);
        assert!(err.to_string().contains("W1, W3"));
    }

    #[test]
    fn test_json_errors_are_format_errors() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(ErrorKind::Format.to_string(), "FORMAT");
    }
}
