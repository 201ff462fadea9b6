//! Core of the binary-conversion API
//!
//! This module contains definitions for the high-level transcoding traits
//! `Encode` and `Decode`, which are motivationally equivalent to the
//! `Serialize` and `Deserialize` traits defined in `serde`.
//!
//! Every Flat-encodable value in this crate, from a lone natural number up
//! to a whole [`Program`](crate::term::Program), implements both. The
//! sub-module [`target`] offers the [`target::Target`] trait, the dual to
//! [`crate::parse::Parser`], which acts as the generic bound for
//! serialization in the [`Encode::write_to`] method.
//!
//! Flat is a bit-oriented format, so all lengths reported through this
//! module are counted in bits unless a method name says otherwise.

use num_integer::Integer;

use crate::builder::{bits::BitBuilder, Builder};
use crate::error::EncodeResult;
use crate::parse::{bitparser::BitParser, ParseResult, Parser};

use self::target::{BitCounter, Target};

pub mod error;
pub mod target;

pub use error::DecodeResult;

/// Trait for types that support serialization into Flat
///
/// Implementing [`Encode`] can be as simple as providing a definition of the
/// required method [`write_to`](Encode::write_to).
pub trait Encode {
    /// Appends the serialized bits of this value to a generic buffer,
    /// returning the exact number of bits written.
    ///
    /// The natural definition of this method is structurally inductive on the
    /// fields of the type in question.
    ///
    /// # Errors
    ///
    /// Fails if the value cannot be represented, e.g. a constant whose
    /// payload disagrees with its declared type. Whatever was already
    /// appended to `buf` must be discarded in that case.
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize>;

    /// Creates a new buffer and fills it with the serialized bits of this value.
    fn encode<U: Target>(&self) -> EncodeResult<U> {
        let mut buf: U = U::create();
        self.write_to::<U>(&mut buf)?;
        Ok(buf)
    }

    /// Creates a [`Vec<u8>`] and fills it with the serialized bits of this value.
    ///
    /// A trailing partial byte is completed with zero bits. Values that
    /// end in a filler of their own, such as programs, never have one.
    fn to_bytes(&self) -> EncodeResult<Vec<u8>> {
        Ok(self.encode::<BitBuilder>()?.into_vec())
    }
}

/// Extension trait for `Encode` that makes use of serialization-length oracles
pub trait EncodeLength: Encode {
    /// Computes, without allocation, the number of bits in the serialized
    /// form of `self`, by invoking [`Encode::write_to`] over the
    /// zero-allocation target [`BitCounter`].
    fn flat_bits(&self) -> EncodeResult<usize> {
        self.write_to(&mut BitCounter::create())
    }

    /// Computes, without allocation, the number of bytes produced by
    /// [`Encode::to_bytes`].
    fn flat_len(&self) -> EncodeResult<usize> {
        Ok(Integer::div_ceil(&self.flat_bits()?, &8))
    }

    /// Pre-determines the exact number of bytes required to serialize `self`,
    /// and returns a `Vec<u8>` initialized to that capacity, which contains
    /// the serialized bytes of `self`.
    fn to_bytes_full(&self) -> EncodeResult<Vec<u8>> {
        let mut buf = BitBuilder::with_capacity(self.flat_len()?);
        self.write_to(&mut buf)?;
        Ok(buf.into_vec())
    }
}

impl<T: Encode + ?Sized> EncodeLength for T {}

/// Trait providing methods for deserializing Flat data into values of a certain type
///
/// It is almost always expected that a type implementing `Decode` will also
/// implement [`Encode`].
///
/// Implementations are defined by one required method, [`parse`](Decode::parse),
/// which attempts to consume the contextually appropriate number of bits from
/// a [`Parser`], either returning a valid value of the implementing type that
/// was interpreted from the consumed sequence, or an error.
pub trait Decode {
    /// Attempt to consume and interpret a value of type `Self` from an existing
    /// `Parser` object over a binary buffer.
    ///
    /// # Errors
    ///
    /// In most cases, the errors returned by this method will be propagated from
    /// calls made to [`Parser`] methods in the implementation logic. Occasionally
    /// a raw value is read successfully but rejected, e.g. an unknown tag.
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self>
    where
        Self: Sized;

    /// Decodes a value of type `Self` from the start of a byte buffer.
    ///
    /// # Errors
    ///
    /// Propagates any error returned by [`parse`](Decode::parse).
    ///
    /// In addition, if the feature-flag `check_complete_parse` is enabled,
    /// any whole byte left unconsumed after parsing is reported as a
    /// [`WindowError::Residue`](crate::parse::error::WindowError::Residue).
    fn decode<U: AsRef<[u8]>>(input: U) -> DecodeResult<Self>
    where
        Self: Sized,
    {
        let mut p = BitParser::new(input.as_ref());
        let ret = Self::parse(&mut p)?;
        cfg_if::cfg_if! {
            if #[cfg(feature = "check_complete_parse")] {
                let residual = p.remaining_bits() / 8;
                if residual > 0 {
                    return Err(crate::parse::error::ParseError::from(
                        crate::parse::error::WindowError::Residue {
                            at: p.position(),
                            residual,
                        },
                    )
                    .into());
                }
            }
        }
        Ok(ret)
    }

    /// Decodes a value of type `Self` from a hex string.
    ///
    /// # Errors
    ///
    /// Fails with [`DecodeError::Conv`](error::DecodeError::Conv) on
    /// malformed hex, and otherwise as [`decode`](Decode::decode) does.
    fn decode_hex(hex: &str) -> DecodeResult<Self>
    where
        Self: Sized,
    {
        let bytes = crate::hexstring::util::bytes_of_hex(hex)?;
        Self::decode(bytes)
    }
}
