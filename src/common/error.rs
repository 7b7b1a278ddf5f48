use std::fmt::{Display, Error, Formatter};

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum QRError {
    EmptyData,
    DataTooLong,
    InvalidVersion(usize),
    InvalidECLevel(String),
    InvalidMode(String),
    InvalidEncoding(String),
    IncompatibleMode { requested: Mode, detected: Mode },
    UnencodableContent,
    VersionTooSmall { requested: usize, needed: usize },
    CodewordMismatch { expected: usize, actual: usize },
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match self {
            Self::EmptyData => write!(f, "empty data"),
            Self::DataTooLong => write!(f, "data too long to fit any version up to 40"),
            Self::InvalidVersion(v) => write!(f, "invalid version {v}, must be between 1 and 40"),
            Self::InvalidECLevel(s) => write!(f, "invalid error correction level {s:?}"),
            Self::InvalidMode(s) => write!(f, "invalid mode {s:?}"),
            Self::InvalidEncoding(s) => write!(f, "invalid character encoding {s:?}"),
            Self::IncompatibleMode { requested, detected } => {
                write!(f, "content classified as {detected:?} cannot be encoded as {requested:?}")
            }
            Self::UnencodableContent => {
                write!(f, "content cannot be encoded with the resolved character encoding")
            }
            Self::VersionTooSmall { requested, needed } => {
                write!(
                    f,
                    "data does not fit version {requested} at this error correction level, \
                     needs at least version {needed}"
                )
            }
            Self::CodewordMismatch { expected, actual } => {
                write!(
                    f,
                    "block table expects {expected} data codewords but the assembled stream \
                     holds {actual}"
                )
            }
        }
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
