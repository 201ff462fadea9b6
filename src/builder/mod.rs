//! Materializing serialization targets
//!
//! A [`Builder`] is a [`Target`] that actually stores what is written to it,
//! and can be finalized into an owned byte buffer. The only implementation
//! shipped by this crate is [`BitBuilder`](bits::BitBuilder).

use crate::conv::target::Target;

pub mod bits;

/// Trait for `Target` types that accumulate a byte buffer
pub trait Builder: Target + Sized {
    /// The type produced once nothing more will be written
    type Final;

    /// Consumes the builder and returns its final form.
    ///
    /// Any incomplete trailing byte is flushed with its unwritten bits
    /// set to zero.
    fn finalize(self) -> Self::Final;

    /// Returns the number of bytes written so far, counting an incomplete
    /// trailing byte as a whole one.
    fn len(&self) -> usize;

    /// Returns `true` if nothing has been written
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the builder and returns its contents as a byte vector
    fn into_vec(self) -> Vec<u8>;

    /// Consumes the builder and returns its contents as a lowercase hex string
    fn into_hex(self) -> String {
        crate::hexstring::util::hex_of_bytes(&self.into_vec())
    }
}
