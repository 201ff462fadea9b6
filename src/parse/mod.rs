//! Custom parsing model with bit-level precision
//!
//! This module, along with its submodules, provides the fundamental
//! definitions related to the abstract task of processing a Flat-encoded
//! byte buffer into the low-level fragments at the leaf nodes of a program.
//!
//! For type-aware parsing, in other words, parsing terms and constants
//! directly rather than as an unstructured sequence of bits, see the
//! [`Decode`](crate::conv::Decode) trait, which is a high-level interface
//! built almost entirely around the definitions contained within this module.
//!
//! # Layout
//!
//! The top-level of this module defines the [`Parser`] trait. The
//! sub-module `error` defines the hierarchy of error cases that can be
//! returned when something goes wrong, and `bitparser` packages the
//! buffer-backed implementation, [`BitParser`](bitparser::BitParser).

pub mod bitparser;
pub mod error;

pub use error::ParseResult;

use crate::internal::offset::Position;

/// # Parser
///
/// This trait is an abstraction over types representing a stateful
/// cursor over a Flat buffer.
///
/// ## Model
///
/// * The Parser-object is constructed over an immutable byte-buffer.
/// * All parsing is done in a non-backtracking, zero-lookahead fashion; a bit in the buffer
///   can only be viewed by consuming it, and only after all preceding bits in the buffer
///   have been consumed. Within a byte, bits are consumed from the most significant downward.
/// * Byte-granular reads ([`pop_byte`], [`take_bytes`]) are only legal on a byte boundary.
///   Reaching a byte boundary is never implicit; callers consume a filler or call
///   [`skip_byte`] to get there.
/// * A read that would run past the end of the buffer fails without moving the cursor.
///
/// [`pop_byte`]: Parser::pop_byte
/// [`take_bytes`]: Parser::take_bytes
/// [`skip_byte`]: Parser::skip_byte
pub trait Parser {
    /// Returns the current position of the cursor
    fn position(&self) -> Position;

    /// Returns the length of the underlying buffer, in bytes
    fn buffer_len(&self) -> usize;

    /// Returns the number of bits that have not yet been consumed
    fn remaining_bits(&self) -> usize;

    /// Consumes a single bit
    fn pop_bit(&mut self) -> ParseResult<bool>;

    /// Consumes the next `n` bits (`n <= 8`) and returns them as the low bits
    /// of a `u8`, the first bit consumed being the most significant.
    ///
    /// Either all `n` bits are consumed, or none are.
    fn pop_bits(&mut self, n: u8) -> ParseResult<u8>;

    /// Consumes one whole byte. The cursor must be byte-aligned.
    fn pop_byte(&mut self) -> ParseResult<u8>;

    /// Consumes `n` whole bytes and returns them as a slice. The cursor
    /// must be byte-aligned.
    fn take_bytes(&mut self, n: usize) -> ParseResult<&[u8]>;

    /// Discards the remainder of the current byte, or one full byte when
    /// the cursor is already aligned.
    fn skip_byte(&mut self) -> ParseResult<()>;

    /// Returns `true` if the cursor sits on a byte boundary
    #[inline]
    fn is_aligned(&self) -> bool {
        self.position().is_aligned()
    }

    /// Returns `true` if every bit of the buffer has been consumed
    #[inline]
    fn is_exhausted(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Consumes a Flat filler, i.e. any number of `0` bits followed by a
    /// single `1` bit, which always leaves the cursor byte-aligned in
    /// well-formed input.
    fn take_filler(&mut self) -> ParseResult<()> {
        while !self.pop_bit()? {}
        Ok(())
    }
}
