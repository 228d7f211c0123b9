use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    UnknownMarker { position: usize, marker: String },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownMarker { position, marker } => {
                write!(f, "unrecognised price marker {marker:?} at position {position}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Reasons a station page cannot be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    MissingName,
    MissingStreet,
    Decode {
        grade: String,
        block: usize,
        source: DecodeError,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingName => write!(f, "station name not found on page"),
            ExtractError::MissingStreet => write!(f, "station street address not found on page"),
            ExtractError::Decode { grade, block, .. } => {
                write!(f, "could not decode price block {block} of grade {grade}")
            }
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}
