use super::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    NotEnoughData,

    #[error("Invalid minor-type value {0}")]
    InvalidMinorValue(u8),

    #[error("Indefinite-length {0} is not supported")]
    IndefiniteLength(MajorType),

    #[error("Length of {0} does not fit a 32-bit length field")]
    LengthOverflow(MajorType),

    #[error("Incorrect type, expecting {0}, found {1}")]
    IncorrectType(MajorType, MajorType),

    #[error("Unexpected simple value {0}")]
    UnexpectedSimpleValue(u8),

    #[error("Value out of range for the requested type")]
    OutOfRange,

    #[error("Declared length {0} exceeds the allocation limit of {1} bytes")]
    AllocationLimit(u64, usize),

    #[error("Maximum nesting depth exceeded")]
    MaxRecursion,

    #[error(transparent)]
    InvalidUtf8(#[from] core::str::Utf8Error),
}

impl Error {
    /// True for errors caused by malformed or unsupported wire encodings,
    /// as opposed to caller mistakes or resource limits.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMinorValue(_)
                | Self::IndefiniteLength(_)
                | Self::LengthOverflow(_)
                | Self::InvalidUtf8(_)
        )
    }
}
