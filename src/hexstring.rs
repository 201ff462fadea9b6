//! Hex-string conversions
//!
//! Scripts and parameters travel as hex text, so conversion in both
//! directions is needed at every public entry point. The free functions
//! live in [`util`]; [`HexString`] is a validated owned byte buffer that
//! displays and parses as hex.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::error::HexConvError;

pub mod util {
    use crate::error::HexConvError;

    /// Renders a byte slice as a lowercase hex string
    #[must_use]
    pub fn hex_of_bytes(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn nibble(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }

    /// Parses a hex string of either case into bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HexConvError::OddParity`] for odd-length input and
    /// [`HexConvError::NonHex`] if any character is not a hex digit.
    pub fn bytes_of_hex(s: &str) -> Result<Vec<u8>, HexConvError> {
        let raw = s.as_bytes();
        if raw.len() % 2 != 0 {
            return Err(HexConvError::OddParity(s.to_owned()));
        }
        raw.chunks_exact(2)
            .map(|pair| match pair {
                [hi, lo] => match (nibble(*hi), nibble(*lo)) {
                    (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                    _ => Err(HexConvError::NonHex(s.to_owned())),
                },
                _ => Err(HexConvError::OddParity(s.to_owned())),
            })
            .collect()
    }
}

/// Byte buffer that is displayed and parsed as hex
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct HexString(Vec<u8>);

impl HexString {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl Debug for HexString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hex!(\"{}\")", util::hex_of_bytes(&self.0))
    }
}

impl Display for HexString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&util::hex_of_bytes(&self.0))
    }
}

impl FromStr for HexString {
    type Err = HexConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        util::bytes_of_hex(s).map(Self)
    }
}

impl From<Vec<u8>> for HexString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for HexString {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<HexString> for Vec<u8> {
    fn from(val: HexString) -> Self {
        val.0
    }
}

impl AsRef<[u8]> for HexString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Parses a string literal as a [`HexString`], panicking on invalid hex.
///
/// Intended for tests and constants whose validity is known statically.
#[macro_export]
macro_rules! hex {
    ($s:expr) => {
        <$crate::hexstring::HexString as ::std::str::FromStr>::from_str($s)
            .unwrap_or_else(|err| panic!("hex!({:?}): {}", $s, err))
    };
}
