//! Variable-length naturals and zigzag integers
//!
//! Flat writes a natural number as groups of seven bits, least significant
//! group first. Each group is preceded by a single continuation bit, `1` if
//! more groups follow and `0` on the final group. Zero is a single group.
//!
//! Signed integers are mapped onto naturals with the zigzag bijection
//! (`0, -1, 1, -2, 2, ...` to `0, 1, 2, 3, 4, ...`) before being written.
//!
//! Constant integers are unbounded, so both types wrap `num-bigint` values.
//! Indices, tags and version components are bounded by `u64`, which gets
//! a dedicated `Encode`/`Decode` pair that rejects overflow.

use std::{convert::TryFrom, fmt::Display, ops::Deref};

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer as _;

use crate::conv::{target::Target, Decode, Encode};
use crate::error::EncodeResult;
use crate::parse::{error::ExternalError, ParseResult, Parser};

const GROUP_BITS: u8 = 7;
const GROUP_MASK: u8 = 0x7f;

/// Reads the seven-bit groups of a natural, least significant first
fn parse_groups<P: Parser>(p: &mut P) -> ParseResult<Vec<u8>> {
    let mut groups = Vec::new();
    loop {
        let more = p.pop_bit()?;
        groups.push(p.pop_bits(GROUP_BITS)?);
        if !more {
            return Ok(groups);
        }
    }
}

/// Writes seven-bit groups, least significant first, with continuation bits
fn write_groups<U: Target>(groups: &[u8], buf: &mut U) -> EncodeResult<usize> {
    let mut written = 0;
    let last = groups.len().saturating_sub(1);
    for (ix, &group) in groups.iter().enumerate() {
        written += buf.push_bit(ix != last);
        written += buf.push_bits(group & GROUP_MASK, GROUP_BITS)?;
    }
    Ok(written)
}

/// Arbitrary-precision natural number with Flat's variable-length encoding
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Default)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Natural(pub BigUint);

impl Natural {
    pub fn into_inner(self) -> BigUint {
        self.0
    }

    pub const fn as_inner(&self) -> &BigUint {
        &self.0
    }

    pub const fn new(nat: BigUint) -> Self {
        Self(nat)
    }

    fn groups(&self) -> Vec<u8> {
        if self.0.bits() == 0 {
            return vec![0];
        }
        self.0.to_radix_le(1 << GROUP_BITS)
    }
}

impl std::fmt::Debug for Natural {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, r#"ℕ({})"#, &self.0.to_string())
    }
}

impl Display for Natural {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        <BigUint as Display>::fmt(&self.0, f)
    }
}

impl From<Natural> for BigUint {
    fn from(val: Natural) -> Self {
        val.0
    }
}

impl From<BigUint> for Natural {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for Natural {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl TryFrom<Natural> for u64 {
    type Error = <u64 as TryFrom<BigUint>>::Error;

    fn try_from(val: Natural) -> Result<u64, Self::Error> {
        <u64 as TryFrom<BigUint>>::try_from(val.0)
    }
}

impl Deref for Natural {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Encode for Natural {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        write_groups(&self.groups(), buf)
    }
}

impl Decode for Natural {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let groups = parse_groups(p)?;
        // every group is below the radix, so conversion cannot fail
        let nat = BigUint::from_radix_le(&groups, 1 << GROUP_BITS).unwrap_or_default();
        Ok(Self(nat))
    }
}

/// Arbitrary-precision signed integer, zigzag-mapped onto [`Natural`]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Default)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Integer(pub BigInt);

impl Integer {
    pub fn into_inner(self) -> BigInt {
        self.0
    }

    pub const fn as_inner(&self) -> &BigInt {
        &self.0
    }

    pub const fn new(int: BigInt) -> Self {
        Self(int)
    }

    /// Maps `self` to its zigzag natural: `2n` for `n >= 0`, `-2n - 1` otherwise
    #[must_use]
    pub fn zigzag(&self) -> Natural {
        let doubled: BigUint = self.0.magnitude() << 1u8;
        match self.0.sign() {
            Sign::Minus => Natural(doubled - 1u8),
            _ => Natural(doubled),
        }
    }

    /// Inverse of [`zigzag`](Integer::zigzag)
    #[must_use]
    pub fn unzigzag(nat: &Natural) -> Self {
        let n = nat.as_inner();
        if n.is_even() {
            Self(BigInt::from_biguint(Sign::Plus, n >> 1u8))
        } else {
            Self(BigInt::from_biguint(Sign::Minus, (n + 1u8) >> 1u8))
        }
    }
}

impl std::fmt::Debug for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{2124}({})", &self.0.to_string())
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        <BigInt as Display>::fmt(&self.0, f)
    }
}

impl From<Integer> for BigInt {
    fn from(val: Integer) -> Self {
        val.0
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Self(value)
    }
}

macro_rules! impl_int_from {
    ($src:ty) => {
        impl From<$src> for Integer {
            fn from(value: $src) -> Self {
                Self(BigInt::from(value))
            }
        }
    };
}

impl_int_from!(i32);
impl_int_from!(i64);
impl_int_from!(i128);
impl_int_from!(u64);

impl Deref for Integer {
    type Target = BigInt;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Encode for Integer {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        self.zigzag().write_to(buf)
    }
}

impl Decode for Integer {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        Ok(Self::unzigzag(&Natural::parse(p)?))
    }
}

/// Bounded natural used for variable indices, constructor tags and
/// version components.
impl Encode for u64 {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        let mut groups = Vec::with_capacity(10);
        let mut n = *self;
        loop {
            groups.push((n & u64::from(GROUP_MASK)) as u8);
            n >>= GROUP_BITS;
            if n == 0 {
                break;
            }
        }
        write_groups(&groups, buf)
    }
}

impl Decode for u64 {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let at = p.position();
        let groups = parse_groups(p)?;
        let mut acc: u64 = 0;
        for (ix, &g) in groups.iter().enumerate() {
            let shift = ix as u32 * u32::from(GROUP_BITS);
            let group = u64::from(g);
            if g != 0 && (shift >= u64::BITS || group.leading_zeros() < shift) {
                return Err(ExternalError::NaturalOverflow { at }.into());
            }
            if g != 0 {
                acc |= group << shift;
            }
        }
        Ok(acc)
    }
}
