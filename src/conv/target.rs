//! Bit-oriented serialization sinks

use crate::error::{EncodeError, EncodeResult};

/// Marker trait for bit-oriented buffers with incremental append operations
///
/// `Target` is the dual of [`Parser`](crate::parse::Parser). The `push_XXX`
/// methods return the number of *bits* appended, which is used for summary
/// book-keeping on the caller side. Bit-granular pushes are infallible;
/// byte-granular pushes fail when the target is not on a byte boundary,
/// and nothing is appended in that case.
pub trait Target {
    /// Returns a fresh object of the `Self` type with an initially empty buffer.
    fn create() -> Self;

    /// Performs any necessary operations that amortize the cost incurred by
    /// writing a certain number of additional bytes, e.g. reserving capacity.
    ///
    /// May be called with only partial information; a no-op is always a
    /// valid implementation.
    fn anticipate(&mut self, extra_bytes: usize);

    /// Returns the number of bits already written into the current,
    /// incomplete byte (`0..=7`).
    fn bits_pending(&self) -> u8;

    /// Appends a single bit. The return value must be `1`.
    fn push_bit(&mut self, bit: bool) -> usize;

    /// Appends one byte at a byte boundary. The return value must be `8`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Unaligned`] if [`bits_pending`](Target::bits_pending)
    /// is non-zero.
    fn push_byte(&mut self, b: u8) -> EncodeResult<usize>;

    /// Completes the current byte with a Flat filler: zero or more `0` bits
    /// followed by a single `1` bit, such that the filler ends exactly on a
    /// byte boundary. When already aligned, a full `0x01` byte is written.
    ///
    /// Returns the number of bits appended, which is always in `1..=8`.
    fn pad(&mut self) -> usize;

    /// Returns `true` if the target sits on a byte boundary
    #[inline]
    fn is_aligned(&self) -> bool {
        self.bits_pending() == 0
    }

    /// Appends the low `n` bits of `value`, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BitsTooWide`] if `n > 8`.
    fn push_bits(&mut self, value: u8, n: u8) -> EncodeResult<usize> {
        if n > 8 {
            return Err(EncodeError::BitsTooWide { requested: n });
        }
        let mut written = 0;
        for i in (0..n).rev() {
            written += self.push_bit((value >> i) & 1 == 1);
        }
        Ok(written)
    }

    /// Appends every byte of `bytes` at a byte boundary.
    ///
    /// The operational semantics of this method should be indistinguishable
    /// from repeated calls to `push_byte` over every element of the slice,
    /// intercalated with addition.
    fn push_bytes(&mut self, bytes: &[u8]) -> EncodeResult<usize> {
        if !self.is_aligned() {
            return Err(EncodeError::Unaligned {
                bits_pending: self.bits_pending(),
            });
        }
        self.anticipate(bytes.len());
        let mut written = 0;
        for &b in bytes {
            written += self.push_byte(b)?;
        }
        Ok(written)
    }
}

/// Zero-allocation `Target` that only counts the number of bits that
/// would be required to serialize a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitCounter {
    bits: usize,
}

impl BitCounter {
    /// Returns the number of bits 'written' so far
    #[must_use]
    pub const fn bits(&self) -> usize {
        self.bits
    }
}

impl Target for BitCounter {
    #[inline]
    fn create() -> Self {
        Self::default()
    }

    #[inline(always)]
    fn anticipate(&mut self, _: usize) {}

    #[inline]
    fn bits_pending(&self) -> u8 {
        (self.bits % 8) as u8
    }

    #[inline(always)]
    fn push_bit(&mut self, _: bool) -> usize {
        self.bits += 1;
        1
    }

    fn push_byte(&mut self, _: u8) -> EncodeResult<usize> {
        if !self.is_aligned() {
            return Err(EncodeError::Unaligned {
                bits_pending: self.bits_pending(),
            });
        }
        self.bits += 8;
        Ok(8)
    }

    #[inline]
    fn push_bits(&mut self, _: u8, n: u8) -> EncodeResult<usize> {
        if n > 8 {
            return Err(EncodeError::BitsTooWide { requested: n });
        }
        self.bits += n as usize;
        Ok(n as usize)
    }

    fn pad(&mut self) -> usize {
        let n = 8 - self.bits_pending() as usize;
        self.bits += n;
        n
    }
}
