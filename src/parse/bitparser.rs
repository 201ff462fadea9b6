//! Buffer-backed implementation of [`Parser`]

use crate::internal::offset::{BitOffset, Position};
use crate::parse::error::{InternalError, ParseError, ParseResult, WindowError};
use crate::parse::Parser;

/// `Parser` over a borrowed byte slice, tracking a bit-granular offset.
#[derive(Debug, Clone)]
pub struct BitParser<'a> {
    buf: &'a [u8],
    offset: BitOffset,
}

impl<'a> BitParser<'a> {
    /// Constructs a `BitParser` positioned at the first bit of `buf`
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: BitOffset::with_limit(buf.len()),
        }
    }

    /// Returns the bytes that have not been touched by the cursor yet,
    /// excluding any partially consumed byte.
    #[must_use]
    pub fn residue(&self) -> &'a [u8] {
        let pos = self.offset.position();
        let start = if pos.is_aligned() {
            pos.byte
        } else {
            pos.byte + 1
        };
        self.buf.get(start..).unwrap_or_default()
    }

    fn overrun(&self, at: Position, requested_bits: usize) -> ParseError {
        ParseError::Window(WindowError::ConsumeWouldExceedLimit {
            at,
            requested_bits,
            limit: self.buf.len(),
        })
    }

    fn require_aligned(&self) -> ParseResult<()> {
        let at = self.offset.position();
        if at.is_aligned() {
            Ok(())
        } else {
            Err(WindowError::Unaligned { at }.into())
        }
    }

    fn byte_at(&self, at: Position, requested_bits: usize) -> ParseResult<u8> {
        self.buf
            .get(at.byte)
            .copied()
            .ok_or_else(|| self.overrun(at, requested_bits))
    }
}

impl Parser for BitParser<'_> {
    #[inline]
    fn position(&self) -> Position {
        self.offset.position()
    }

    #[inline]
    fn buffer_len(&self) -> usize {
        self.offset.limit()
    }

    #[inline]
    fn remaining_bits(&self) -> usize {
        self.offset.remaining_bits()
    }

    fn pop_bit(&mut self) -> ParseResult<bool> {
        let (at, valid) = self.offset.advance_bits(1);
        if !valid {
            return Err(self.overrun(at, 1));
        }
        let byte = self.byte_at(at, 1)?;
        Ok(byte & (0x80 >> at.bit) != 0)
    }

    fn pop_bits(&mut self, n: u8) -> ParseResult<u8> {
        if n > 8 {
            return Err(InternalError::PopTooWide { requested: n }.into());
        }
        let at = self.offset.position();
        if (n as usize) > self.offset.remaining_bits() {
            return Err(self.overrun(at, n as usize));
        }
        let mut acc = 0u8;
        for _ in 0..n {
            acc = (acc << 1) | u8::from(self.pop_bit()?);
        }
        Ok(acc)
    }

    fn pop_byte(&mut self) -> ParseResult<u8> {
        self.require_aligned()?;
        let (at, valid) = self.offset.advance_bits(8);
        if !valid {
            return Err(self.overrun(at, 8));
        }
        self.byte_at(at, 8)
    }

    fn take_bytes(&mut self, n: usize) -> ParseResult<&[u8]> {
        self.require_aligned()?;
        let (at, valid) = self.offset.advance_bits(n * 8);
        if !valid {
            return Err(self.overrun(at, n * 8));
        }
        let buf: &[u8] = self.buf;
        buf.get(at.byte..at.byte + n)
            .ok_or_else(|| self.overrun(at, n * 8))
    }

    fn skip_byte(&mut self) -> ParseResult<()> {
        let at = self.offset.position();
        let width = 8 - at.bit as usize;
        let (_, valid) = self.offset.advance_bits(width);
        if valid {
            Ok(())
        } else {
            Err(self.overrun(at, width))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bits_are_read_msb_first() {
        let mut p = BitParser::new(&[0b1011_0010, 0xff]);
        assert!(p.pop_bit().unwrap());
        assert!(!p.pop_bit().unwrap());
        assert_eq!(p.pop_bits(3).unwrap(), 0b110);
        assert_eq!(p.pop_bits(6).unwrap(), 0b010_111);
        assert_eq!(p.position(), Position { byte: 1, bit: 3 });
        assert_eq!(p.remaining_bits(), 5);
    }

    #[test]
    fn pop_bits_is_all_or_nothing() {
        let mut p = BitParser::new(&[0xa5]);
        assert_eq!(p.pop_bits(5).unwrap(), 0b10100);
        let err = p.pop_bits(4).unwrap_err();
        assert!(err.is_truncation());
        assert_eq!(p.pop_bits(3).unwrap(), 0b101);
        assert!(p.is_exhausted());
    }

    #[test]
    fn pop_bits_rejects_wide_requests() {
        let mut p = BitParser::new(&[0x00, 0x00]);
        assert!(matches!(
            p.pop_bits(9),
            Err(ParseError::Internal(InternalError::PopTooWide { requested: 9 }))
        ));
    }

    #[test]
    fn byte_reads_require_alignment() {
        let mut p = BitParser::new(&[0x80, 0x2a, 0x01, 0x02]);
        assert!(p.pop_bit().unwrap());
        assert!(matches!(
            p.pop_byte(),
            Err(ParseError::Window(WindowError::Unaligned { .. }))
        ));
        assert!(matches!(
            p.take_bytes(1),
            Err(ParseError::Window(WindowError::Unaligned { .. }))
        ));
        p.skip_byte().unwrap();
        assert_eq!(p.pop_byte().unwrap(), 0x2a);
        assert_eq!(p.take_bytes(2).unwrap(), &[0x01, 0x02]);
        assert!(p.pop_byte().unwrap_err().is_truncation());
    }

    #[test]
    fn skip_byte_when_aligned_discards_a_whole_byte() {
        let mut p = BitParser::new(&[0x00, 0x07]);
        p.skip_byte().unwrap();
        assert_eq!(p.pop_byte().unwrap(), 0x07);
        assert!(p.skip_byte().unwrap_err().is_truncation());
    }

    #[test]
    fn filler_stops_after_first_set_bit() {
        let mut p = BitParser::new(&[0b0110_0001, 0x01, 0x99]);
        assert_eq!(p.pop_bits(4).unwrap(), 6);
        p.take_filler().unwrap();
        assert!(p.is_aligned());
        p.take_filler().unwrap();
        assert_eq!(p.residue(), &[0x99]);
    }

    #[test]
    fn filler_without_terminator_is_truncation() {
        let mut p = BitParser::new(&[0x00]);
        assert!(p.take_filler().unwrap_err().is_truncation());
    }

    #[test]
    fn take_bytes_past_end_reports_request() {
        let mut p = BitParser::new(&[0x01, 0x02]);
        match p.take_bytes(3) {
            Err(ParseError::Window(WindowError::ConsumeWouldExceedLimit {
                at,
                requested_bits,
                limit,
            })) => {
                assert_eq!(at, Position::new());
                assert_eq!(requested_bits, 24);
                assert_eq!(limit, 2);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
