//! Error types used to report failure in low-level parsing
//!
//! This module contains a hierarchy of types representing specific
//! classes of error that may arise as a result of calls to
//! [`Parser`](crate::parse::Parser) methods, or of the `Decode`
//! implementations built on top of them.
//!
//! # Layout
//!
//! This module defines the primary type `ParseError` and the alias
//! `ParseResult<T>`; it additionally defines various type-level refinements of
//! `ParseError`, grouped according to similar provenance or nature. Every
//! variant that originates from a location in the buffer records the
//! [`Position`] at which it was detected, so that a version mismatch between
//! producer and consumer can be diagnosed from the error alone.

use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::string::FromUtf8Error;

use crate::cbor::CborError;
use crate::internal::offset::Position;

/// Enumeration type over all errors that may be encountered when calling
/// methods on `Parser` types, or when decoding Flat terms.
#[derive(Debug)]
pub enum ParseError {
    /// Error class encountered when the cursor would leave the buffer or is
    /// not positioned where a primitive requires it to be.
    Window(WindowError),
    /// Error class encountered when internal invariants or preconditions are violated
    Internal(InternalError),
    /// Error class encountered when low-level parsing is successful but
    /// the resultant raw value cannot be converted into a legal value of
    /// a post-parse type
    External(ExternalError),
    /// Error class encountered when low-level parsing is unsuccessful due
    /// to a failure of expectation in terms of the binary-lexical contents
    /// of the buffer.
    ///
    /// This includes invalid term and type tags, malformed type
    /// applications, and builtin indices beyond the catalog.
    Token(TokenError),
}

impl ParseError {
    /// Returns `true` if the error was caused by running out of input
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            ParseError::Window(WindowError::ConsumeWouldExceedLimit { .. })
        )
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParseError::Window(err) => Display::fmt(err, f),
            ParseError::Internal(err) => Display::fmt(err, f),
            ParseError::External(err) => Display::fmt(err, f),
            ParseError::Token(err) => Display::fmt(err, f),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Window(err) => Some(err),
            ParseError::Internal(err) => Some(err),
            ParseError::External(err) => Some(err),
            ParseError::Token(err) => Some(err),
        }
    }
}

/// Type alias for Result with an error type of [`ParseError`]
///
/// Most `Parser` methods and all `Decode::parse` implementations
/// have a return type of `ParseResult<T>` for various `T`
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors related to the position of the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    /// Error case when a method that attempts to consume some number
    /// of bits from the buffer would run past its end. This is how
    /// truncated input is reported.
    ConsumeWouldExceedLimit {
        at: Position,
        requested_bits: usize,
        limit: usize,
    },
    /// Error case when a byte-granular read is attempted while the cursor
    /// is in the middle of a byte.
    Unaligned { at: Position },
    /// Error case when bytes remain after the final filler of a program
    Residue { at: Position, residual: usize },
}

impl From<WindowError> for ParseError {
    fn from(err: WindowError) -> Self {
        Self::Window(err)
    }
}

impl Display for WindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match *self {
            WindowError::ConsumeWouldExceedLimit {
                at,
                requested_bits,
                limit,
            } => {
                write!(
                    f,
                    "cannot consume {} bits at {} of a {}-byte buffer (input truncated)",
                    requested_bits, at, limit
                )
            }
            WindowError::Unaligned { at } => {
                write!(f, "byte-aligned read attempted at unaligned {}", at)
            }
            WindowError::Residue { at, residual } => {
                write!(
                    f,
                    "{} unconsumed bytes remain after program end at {}",
                    residual, at
                )
            }
        }
    }
}

impl Error for WindowError {}

/// Error representing invalid tag values
///
/// Records the offending value, the name of the grammar it was
/// supposed to belong to, and where in the buffer it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagError {
    actual: u8,
    for_type: &'static str,
    at: Position,
}

impl TagError {
    /// Constructs a `TagError` with the provided type-name `for_type`
    pub fn new(actual: u8, for_type: &'static str, at: Position) -> Self {
        Self {
            actual,
            for_type,
            at,
        }
    }

    /// Returns the tag value that was rejected
    #[must_use]
    pub fn actual(&self) -> u8 {
        self.actual
    }

    /// Returns the position of the first bit of the rejected tag
    #[must_use]
    pub fn position(&self) -> Position {
        self.at
    }
}

impl Display for TagError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "unexpected discriminant {:#04x} for {} at {}",
            self.actual, self.for_type, self.at
        )
    }
}

impl Error for TagError {}

/// Errors arising from unexpected tokens in the buffer
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenError {
    /// Four-bit term tag outside of `0..=9`
    InvalidTermTag(TagError),
    /// Four-bit type tag that names no supported constant type
    InvalidTypeTag(TagError),
    /// Type-tag list that does not describe exactly one type
    MalformedTypeApplication { tags: Vec<u8>, at: Position },
    /// Seven-bit builtin index at or beyond the length of the catalog
    BuiltinOutOfRange {
        index: u8,
        limit: usize,
        at: Position,
    },
    /// Terms or type applications nested deeper than `limit`
    NestingTooDeep { limit: usize, at: Position },
}

impl From<TokenError> for ParseError {
    fn from(tok_e: TokenError) -> Self {
        Self::Token(tok_e)
    }
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidTermTag(err) => {
                write!(f, "invalid term tag: {}", err)
            }
            Self::InvalidTypeTag(err) => {
                write!(f, "invalid type tag: {}", err)
            }
            Self::MalformedTypeApplication { tags, at } => {
                write!(f, "type tags {:?} at {} do not form a single type", tags, at)
            }
            Self::BuiltinOutOfRange { index, limit, at } => {
                write!(
                    f,
                    "builtin index {} at {} is outside of the {}-entry catalog",
                    index, at, limit
                )
            }
            Self::NestingTooDeep { limit, at } => {
                write!(f, "nesting exceeds {} levels at {}", limit, at)
            }
        }
    }
}

impl Error for TokenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenError::InvalidTermTag(err) => Some(err),
            TokenError::InvalidTypeTag(err) => Some(err),
            TokenError::MalformedTypeApplication { .. } => None,
            TokenError::BuiltinOutOfRange { .. } => None,
            TokenError::NestingTooDeep { .. } => None,
        }
    }
}

/// Implementation-internal errors
///
/// This error class represents violations of a precondition for calling
/// certain `Parser` methods, which signify a bug in the calling code
/// rather than in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalError {
    /// `pop_bits` was asked for more than eight bits
    PopTooWide { requested: u8 },
}

impl From<InternalError> for ParseError {
    fn from(err: InternalError) -> Self {
        Self::Internal(err)
    }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            InternalError::PopTooWide { requested } => {
                write!(f, "cannot pop {} bits at once (at most 8)", requested)
            }
        }
    }
}

impl Error for InternalError {}

/// Enumerated type representing contextually invalid results obtained from
/// otherwise successfully executed method calls to a Parser object.
#[derive(Debug)]
pub enum ExternalError {
    /// A string constant whose bytes are not valid UTF-8
    UncoercableString(FromUtf8Error),
    /// A natural that was required to fit in 64 bits did not
    NaturalOverflow { at: Position },
    /// A data constant whose bytes are not exactly one CBOR item
    InvalidData(CborError),
}

impl From<ExternalError> for ParseError {
    fn from(err: ExternalError) -> Self {
        Self::External(err)
    }
}

impl From<FromUtf8Error> for ParseError {
    fn from(err: FromUtf8Error) -> Self {
        Self::External(ExternalError::UncoercableString(err))
    }
}

impl From<CborError> for ParseError {
    fn from(err: CborError) -> Self {
        Self::External(ExternalError::InvalidData(err))
    }
}

impl Display for ExternalError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ExternalError::UncoercableString(err) => {
                write!(
                    f,
                    "parsed byte-array could not be coerced to String: {}",
                    err
                )
            }
            ExternalError::NaturalOverflow { at } => {
                write!(f, "natural starting at {} does not fit in 64 bits", at)
            }
            ExternalError::InvalidData(err) => {
                write!(f, "data constant is not a single CBOR item: {}", err)
            }
        }
    }
}

impl Error for ExternalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExternalError::UncoercableString(err) => Some(err),
            ExternalError::NaturalOverflow { .. } => None,
            ExternalError::InvalidData(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn parse_error_threadsafe() {
        dummy::<ParseError>()
    }

    #[test]
    fn tag_error_reports_location() {
        let err = TagError::new(0x0c, "term", Position { byte: 3, bit: 4 });
        assert_eq!(
            err.to_string(),
            "unexpected discriminant 0x0c for term at byte 3 bit 4"
        );
    }

    #[test]
    fn truncation_is_recognized() {
        let err: ParseError = WindowError::ConsumeWouldExceedLimit {
            at: Position::new(),
            requested_bits: 1,
            limit: 0,
        }
        .into();
        assert!(err.is_truncation());
        let err: ParseError = WindowError::Unaligned {
            at: Position { byte: 0, bit: 1 },
        }
        .into();
        assert!(!err.is_truncation());
    }
}
