//! General error types
//!
//! This module contains the error types that are not tied to the low-level
//! parse hierarchy in [`crate::parse::error`]: hex conversion, encoding
//! failures, and malformed version strings.

use std::error::Error;
use std::fmt::{Debug, Display};

use crate::constant::DataType;

/// Error type representing all possible conditions for invalidity
/// encountered when attempting to parse a string-type as a series
/// of hex-encoded bytes.
#[derive(Clone, PartialEq, Eq, Ord, PartialOrd)]
pub enum HexConvError {
    /// Error case for odd-length strings
    OddParity(String),
    /// Error case for strings containing non-hex characters,
    /// i.e. anything not in `[0-9a-fA-F]`.
    NonHex(String),
}

impl Debug for HexConvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OddParity(invalid) => {
                write!(f, "non-even length-parity for string `{}`", invalid)
            }
            Self::NonHex(invalid) => write!(f, "non-hex character found in string `{}`", invalid),
        }
    }
}

impl Display for HexConvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OddParity(_) => {
                write!(f, "hex-conversion failed on odd-length string")
            }
            Self::NonHex(_) => {
                write!(f, "hex-conversion failed on non-hex character")
            }
        }
    }
}

impl Error for HexConvError {}

/// Enumerated error type for failures while serializing a value into
/// Flat.
///
/// Encoding is all-or-nothing: any of these aborts the entire call, and
/// whatever was written to the target up to that point should be discarded.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum EncodeError {
    /// A byte-granular write was attempted while the target was not on a
    /// byte boundary
    Unaligned { bits_pending: u8 },
    /// `push_bits` was asked to write more than eight bits at once
    BitsTooWide { requested: u8 },
    /// A constant payload disagrees with the type it is declared under
    TypeMismatch {
        expected: DataType,
        actual: DataType,
    },
    /// Terms or constant types nested deeper than the decoder accepts
    NestingTooDeep { limit: usize },
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Unaligned { bits_pending } => {
                write!(
                    f,
                    "cannot write a whole byte with {bits_pending} bits of the current byte already written"
                )
            }
            EncodeError::BitsTooWide { requested } => {
                write!(f, "cannot push {requested} bits at once (at most 8)")
            }
            EncodeError::TypeMismatch { expected, actual } => {
                write!(
                    f,
                    "constant of type {actual} found where {expected} was declared"
                )
            }
            EncodeError::NestingTooDeep { limit } => {
                write!(f, "nesting exceeds {limit} levels")
            }
        }
    }
}

impl Error for EncodeError {}

/// Type alias for Result with an error type of [`EncodeError`]
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

/// Error type for program versions that are not a `major.minor.patch`
/// triple of naturals.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum VersionError {
    /// Wrong number of dot-separated components
    Malformed(String),
    /// A component is not a base-10 natural that fits in 64 bits
    NonNumeric { component: String, input: String },
}

impl Display for VersionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::Malformed(input) => {
                write!(f, "version `{input}` is not of the form major.minor.patch")
            }
            VersionError::NonNumeric { component, input } => {
                write!(
                    f,
                    "component `{component}` of version `{input}` is not a natural number"
                )
            }
        }
    }
}

impl Error for VersionError {}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn errors_threadsafe() {
        dummy::<HexConvError>();
        dummy::<EncodeError>();
        dummy::<VersionError>();
    }

    #[test]
    fn mismatch_message_names_both_types() {
        let err = EncodeError::TypeMismatch {
            expected: DataType::Integer,
            actual: DataType::List(Box::new(DataType::Bool)),
        };
        assert_eq!(
            err.to_string(),
            "constant of type (list bool) found where integer was declared"
        );
    }
}
