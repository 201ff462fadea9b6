//! Typed constants
//!
//! A constant is a value together with its [`DataType`]. Leaf types carry
//! their payload directly; `list` and `pair` constants record their element
//! types explicitly so that an empty list still knows what it is a list of.

use std::fmt::{Display, Formatter};

use num_bigint::BigInt;

use crate::cbor::{self, CborError};
use crate::error::EncodeError;

/// Type of a constant, as written in the Flat type-tag list
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Integer,
    ByteString,
    String,
    Unit,
    Bool,
    Data,
    List(Box<DataType>),
    Pair(Box<DataType>, Box<DataType>),
}

impl DataType {
    /// Convenience constructor for `list t`
    #[must_use]
    pub fn list(elem: DataType) -> Self {
        Self::List(Box::new(elem))
    }

    /// Convenience constructor for `pair a b`
    #[must_use]
    pub fn pair(fst: DataType, snd: DataType) -> Self {
        Self::Pair(Box::new(fst), Box::new(snd))
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Integer => f.write_str("integer"),
            DataType::ByteString => f.write_str("bytestring"),
            DataType::String => f.write_str("string"),
            DataType::Unit => f.write_str("unit"),
            DataType::Bool => f.write_str("bool"),
            DataType::Data => f.write_str("data"),
            DataType::List(elem) => write!(f, "(list {elem})"),
            DataType::Pair(fst, snd) => write!(f, "(pair {fst} {snd})"),
        }
    }
}

/// Opaque Plutus `Data` value, held as its CBOR encoding.
///
/// Construction through [`PlutusData::from_cbor`] guarantees the bytes are
/// exactly one well-formed CBOR item; the item itself is not interpreted.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct PlutusData(Vec<u8>);

impl PlutusData {
    /// Wraps CBOR bytes after checking they form exactly one item
    ///
    /// # Errors
    ///
    /// Fails if `bytes` is empty, malformed, or holds more than one item.
    pub fn from_cbor(bytes: Vec<u8>) -> Result<Self, CborError> {
        cbor::validate_item(&bytes)?;
        Ok(Self(bytes))
    }

    /// Parses hex-encoded CBOR
    ///
    /// # Errors
    ///
    /// Fails on malformed hex (reported as a generic error) or CBOR.
    pub fn from_cbor_hex(hex: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let bytes = crate::hexstring::util::bytes_of_hex(hex)?;
        Ok(Self::from_cbor(bytes)?)
    }

    #[must_use]
    pub fn as_cbor(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_cbor(self) -> Vec<u8> {
        self.0
    }
}

impl std::fmt::Debug for PlutusData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PlutusData({})",
            crate::hexstring::util::hex_of_bytes(&self.0)
        )
    }
}

/// Constant value tagged with its type
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub enum Constant {
    Integer(BigInt),
    ByteString(Vec<u8>),
    String(String),
    Unit,
    Bool(bool),
    Data(PlutusData),
    /// Homogeneous list with its element type
    ProtoList(DataType, Vec<Constant>),
    /// Pair with both component types
    ProtoPair(DataType, DataType, Box<Constant>, Box<Constant>),
}

impl Constant {
    /// Returns the type this constant declares for itself
    #[must_use]
    pub fn data_type(&self) -> DataType {
        match self {
            Constant::Integer(_) => DataType::Integer,
            Constant::ByteString(_) => DataType::ByteString,
            Constant::String(_) => DataType::String,
            Constant::Unit => DataType::Unit,
            Constant::Bool(_) => DataType::Bool,
            Constant::Data(_) => DataType::Data,
            Constant::ProtoList(elem, _) => DataType::list(elem.clone()),
            Constant::ProtoPair(fst, snd, _, _) => DataType::pair(fst.clone(), snd.clone()),
        }
    }

    /// Checks that every nested list element and pair component agrees with
    /// the type declared for it, and returns the type of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::TypeMismatch`] at the first disagreement found.
    pub fn type_check(&self) -> Result<DataType, EncodeError> {
        match self {
            Constant::ProtoList(elem, items) => {
                for item in items {
                    expect_type(elem, item)?;
                }
            }
            Constant::ProtoPair(fst_ty, snd_ty, fst, snd) => {
                expect_type(fst_ty, fst)?;
                expect_type(snd_ty, snd)?;
            }
            _ => {}
        }
        Ok(self.data_type())
    }
}

fn expect_type(expected: &DataType, value: &Constant) -> Result<(), EncodeError> {
    let actual = value.type_check()?;
    if &actual == expected {
        Ok(())
    } else {
        Err(EncodeError::TypeMismatch {
            expected: expected.clone(),
            actual,
        })
    }
}

macro_rules! impl_constant_from {
    ($src:ty, $variant:ident) => {
        impl From<$src> for Constant {
            fn from(value: $src) -> Self {
                Constant::$variant(value.into())
            }
        }
    };
}

impl_constant_from!(BigInt, Integer);
impl_constant_from!(i64, Integer);
impl_constant_from!(Vec<u8>, ByteString);
impl_constant_from!(String, String);
impl_constant_from!(&str, String);
impl_constant_from!(bool, Bool);
impl_constant_from!(PlutusData, Data);

impl From<()> for Constant {
    fn from(_: ()) -> Self {
        Constant::Unit
    }
}
