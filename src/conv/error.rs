use crate::{error::HexConvError, parse::error::ParseError};

/// Errors returned by the whole-buffer entry points of [`Decode`](crate::conv::Decode)
#[derive(Debug)]
#[non_exhaustive]
pub enum DecodeError {
    Conv(HexConvError),
    Parse(ParseError),
}

impl DecodeError {
    /// Returns the underlying `ParseError`, if decoding got as far as parsing
    #[must_use]
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            DecodeError::Parse(err) => Some(err),
            DecodeError::Conv(_) => None,
        }
    }
}

impl From<HexConvError> for DecodeError {
    fn from(err: HexConvError) -> Self {
        Self::Conv(err)
    }
}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Conv(err) => {
                write!(f, "hex conversion encountered error: {}", err)
            }
            DecodeError::Parse(err) => {
                write!(f, "parser encountered error: {}", err)
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Conv(err) => Some(err),
            DecodeError::Parse(err) => Some(err),
        }
    }
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
