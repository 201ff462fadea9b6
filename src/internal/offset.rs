//! Bit-granular offset for buffer-based `Parser` types
//!
//! This module contains the [`Position`] value type, which is what errors
//! report, and the [`BitOffset`] tracker, which owns the mutable cursor of a
//! [`BitParser`](crate::parse::bitparser::BitParser) and refuses to move it
//! past the end of the buffer.

use std::fmt::Display;

/// A location inside a Flat buffer, as a byte index together with the
/// number of bits already consumed from that byte (`0..=7`, most significant
/// bit first).
///
/// Positions are totally ordered in stream order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Position {
    pub byte: usize,
    pub bit: u8,
}

impl Position {
    /// Constructs a `Position` pointing at the first bit of the buffer
    #[inline(always)]
    #[must_use]
    pub const fn new() -> Self {
        Self { byte: 0, bit: 0 }
    }

    /// Returns the absolute number of bits preceding this position
    #[inline]
    #[must_use]
    pub const fn bit_offset(self) -> usize {
        self.byte * 8 + self.bit as usize
    }

    /// Returns `true` if the position sits on a byte boundary
    #[inline]
    #[must_use]
    pub const fn is_aligned(self) -> bool {
        self.bit == 0
    }

    const fn from_bit_offset(bits: usize) -> Self {
        Self {
            byte: bits / 8,
            bit: (bits % 8) as u8,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "byte {} bit {}", self.byte, self.bit)
    }
}

/// Tracker of a monotonically increasing [`Position`] for non-backtracking
/// traversal of a byte buffer of fixed length.
///
/// The limit is the length of the buffer in bytes; the position is allowed to
/// reach the limit, but never to exceed it.
#[derive(Debug, Clone)]
pub struct BitOffset {
    limit: usize,
    cur: Position,
}

impl BitOffset {
    /// Constructs a tracker over a buffer of `limit` bytes, starting at
    /// the first bit.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            cur: Position::new(),
        }
    }

    /// Returns the current position
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cur
    }

    /// Returns the length of the underlying buffer in bytes
    #[inline(always)]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the number of bits that can still be consumed
    #[inline]
    #[must_use]
    pub const fn remaining_bits(&self) -> usize {
        self.limit * 8 - self.cur.bit_offset()
    }

    /// Attempt to advance the position by `n` bits.
    ///
    /// Returns the original position, along with a boolean value that is
    /// `true` if and only if the advance occurred. The position either stays
    /// unchanged or moves by exactly `n` bits; it never saturates.
    #[inline]
    pub fn advance_bits(&mut self, n: usize) -> (Position, bool) {
        let ret = self.cur;
        let is_valid = n <= self.remaining_bits();
        if is_valid {
            self.cur = Position::from_bit_offset(ret.bit_offset() + n);
        }
        (ret, is_valid)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn advance_within_limit() {
        let mut off = BitOffset::with_limit(2);
        assert_eq!(off.advance_bits(3), (Position::new(), true));
        assert_eq!(off.position(), Position { byte: 0, bit: 3 });
        assert!(off.advance_bits(5).1);
        assert!(off.position().is_aligned());
        assert_eq!(off.remaining_bits(), 8);
    }

    #[test]
    fn advance_past_limit_is_refused() {
        let mut off = BitOffset::with_limit(1);
        assert!(off.advance_bits(4).1);
        let (at, ok) = off.advance_bits(5);
        assert!(!ok);
        assert_eq!(at, Position { byte: 0, bit: 4 });
        assert_eq!(off.position(), at);
        assert!(off.advance_bits(4).1);
        assert_eq!(off.position(), Position { byte: 1, bit: 0 });
        assert!(off.advance_bits(0).1);
    }

    #[test]
    fn positions_order_in_stream_order() {
        assert!(Position { byte: 0, bit: 7 } < Position { byte: 1, bit: 0 });
        assert_eq!(Position { byte: 2, bit: 3 }.bit_offset(), 19);
    }
}
