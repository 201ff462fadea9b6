//! Builder type implemented over a `Vec<u8>` and a partial trailing byte
//!
//! Bits are packed most-significant first. Completed bytes are moved into
//! the vector as soon as their eighth bit is written.

use crate::conv::target::Target;
use crate::error::{EncodeError, EncodeResult};

/// Bit-packing `Builder` backing all Flat serialization
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct BitBuilder {
    buf: Vec<u8>,
    current: u8,
    used: u8,
}

impl BitBuilder {
    /// Constructs an empty `BitBuilder` with room for `cap` bytes
    #[must_use]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
            current: 0,
            used: 0,
        }
    }

    /// Returns the completed bytes written so far, excluding any
    /// incomplete trailing byte.
    #[must_use]
    pub fn completed(&self) -> &[u8] {
        &self.buf
    }

    fn flush_current(&mut self) {
        self.buf.push(self.current);
        self.current = 0;
        self.used = 0;
    }
}

impl Target for BitBuilder {
    fn create() -> Self {
        Self::default()
    }

    #[inline]
    fn anticipate(&mut self, extra_bytes: usize) {
        self.buf.reserve(extra_bytes)
    }

    #[inline]
    fn bits_pending(&self) -> u8 {
        self.used
    }

    fn push_bit(&mut self, bit: bool) -> usize {
        if bit {
            self.current |= 0x80 >> self.used;
        }
        self.used += 1;
        if self.used == 8 {
            self.flush_current();
        }
        1
    }

    fn push_byte(&mut self, b: u8) -> EncodeResult<usize> {
        if self.used != 0 {
            return Err(EncodeError::Unaligned {
                bits_pending: self.used,
            });
        }
        self.buf.push(b);
        Ok(8)
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> EncodeResult<usize> {
        if self.used != 0 {
            return Err(EncodeError::Unaligned {
                bits_pending: self.used,
            });
        }
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len() * 8)
    }

    fn pad(&mut self) -> usize {
        let n = 8 - self.used as usize;
        self.current |= 1;
        self.flush_current();
        n
    }
}

impl super::Builder for BitBuilder {
    type Final = Vec<u8>;

    fn finalize(mut self) -> Self::Final {
        if self.used != 0 {
            self.flush_current();
        }
        self.buf
    }

    fn len(&self) -> usize {
        self.buf.len() + usize::from(self.used != 0)
    }

    fn into_vec(self) -> Vec<u8> {
        self.finalize()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builder::Builder;

    #[test]
    fn bits_pack_msb_first() {
        let mut b = BitBuilder::create();
        b.push_bits(0b0100, 4).unwrap();
        b.push_bit(true);
        assert_eq!(b.bits_pending(), 5);
        assert_eq!(b.len(), 1);
        assert_eq!(b.into_vec(), vec![0b0100_1000]);
    }

    #[test]
    fn pad_completes_partial_byte() {
        let mut b = BitBuilder::create();
        b.push_bits(0b0110, 4).unwrap();
        assert_eq!(b.pad(), 4);
        assert!(b.is_aligned());
        assert_eq!(b.into_vec(), vec![0x61]);
    }

    #[test]
    fn pad_when_aligned_writes_full_byte() {
        let mut b = BitBuilder::create();
        b.push_byte(0xab).unwrap();
        assert_eq!(b.pad(), 8);
        assert_eq!(b.into_hex(), "ab01");
    }

    #[test]
    fn unaligned_byte_push_leaves_buffer_untouched() {
        let mut b = BitBuilder::create();
        b.push_bit(true);
        assert!(b.push_bytes(&[1, 2, 3]).is_err());
        assert!(b.completed().is_empty());
        assert_eq!(b.finalize(), vec![0x80]);
    }
}
