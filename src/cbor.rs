//! CBOR helpers over `minicbor`
//!
//! Only what the script wrapper and `data` constants need: checking that a
//! buffer is exactly one well-formed item, reading and writing the byte
//! string envelope, and splitting a top-level array into its items. Item
//! contents are never interpreted beyond their structure.

use std::error::Error;
use std::fmt::{Display, Formatter};

use minicbor::data::Type;
use minicbor::{decode, Decoder, Encoder};

#[derive(Debug)]
pub enum CborError {
    /// Truncated or malformed input, as reported by the decoder
    Malformed(decode::Error),
    /// The item at `offset` does not have the expected type
    UnexpectedType {
        offset: usize,
        expected: &'static str,
        found: Type,
    },
    /// Bytes remain after the single expected item
    TrailingBytes { offset: usize, residual: usize },
}

impl Display for CborError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CborError::Malformed(err) => write!(f, "malformed CBOR: {err}"),
            CborError::UnexpectedType {
                offset,
                expected,
                found,
            } => write!(f, "expected CBOR {expected} at offset {offset}, found {found:?}"),
            CborError::TrailingBytes { offset, residual } => {
                write!(f, "{residual} bytes follow the CBOR item ending at offset {offset}")
            }
        }
    }
}

impl Error for CborError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CborError::Malformed(err) => Some(err),
            CborError::UnexpectedType { .. } | CborError::TrailingBytes { .. } => None,
        }
    }
}

impl From<decode::Error> for CborError {
    fn from(err: decode::Error) -> Self {
        Self::Malformed(err)
    }
}

fn check_consumed(d: &Decoder<'_>) -> Result<(), CborError> {
    let offset = d.position();
    let total = d.input().len();
    if offset == total {
        Ok(())
    } else {
        Err(CborError::TrailingBytes {
            offset,
            residual: total - offset,
        })
    }
}

/// Checks that `buf` holds exactly one well-formed CBOR item.
///
/// # Errors
///
/// Fails if `buf` is empty, malformed, or holds trailing bytes.
pub fn validate_item(buf: &[u8]) -> Result<(), CborError> {
    let mut d = Decoder::new(buf);
    d.skip()?;
    check_consumed(&d)
}

/// Reads the byte string at the start of `buf`, concatenating the chunks
/// of an indefinite-length string.
///
/// Returns the contents and the number of bytes consumed.
///
/// # Errors
///
/// Fails if the first item is not a well-formed byte string.
pub fn read_bytestring(buf: &[u8]) -> Result<(Vec<u8>, usize), CborError> {
    let mut d = Decoder::new(buf);
    match d.datatype()? {
        Type::Bytes | Type::BytesIndef => {}
        found => {
            return Err(CborError::UnexpectedType {
                offset: 0,
                expected: "byte string",
                found,
            })
        }
    }
    let mut out = Vec::new();
    for chunk in d.bytes_iter()? {
        out.extend_from_slice(chunk?);
    }
    Ok((out, d.position()))
}

/// Returns the contents of `buf` if it is exactly one CBOR byte string.
#[must_use]
pub fn exact_bytestring(buf: &[u8]) -> Option<Vec<u8>> {
    match read_bytestring(buf) {
        Ok((contents, used)) if used == buf.len() => Some(contents),
        _ => None,
    }
}

/// Wraps `bytes` in one definite-length CBOR byte string.
#[must_use]
pub fn wrap_bytestring(bytes: &[u8]) -> Vec<u8> {
    let mut enc = Encoder::new(Vec::with_capacity(bytes.len() + 9));
    // the Vec writer is infallible
    let _ = enc.bytes(bytes);
    enc.into_writer()
}

/// Splits a buffer holding exactly one CBOR array (definite or indefinite)
/// into the encoded bytes of each element.
///
/// # Errors
///
/// Fails if `buf` is not a single well-formed array.
pub fn array_items(buf: &[u8]) -> Result<Vec<&[u8]>, CborError> {
    let mut d = Decoder::new(buf);
    match d.datatype()? {
        Type::Array | Type::ArrayIndef => {}
        found => {
            return Err(CborError::UnexpectedType {
                offset: 0,
                expected: "array",
                found,
            })
        }
    }
    let mut items = Vec::new();
    let mut skip_item = |d: &mut Decoder<'_>| -> Result<(), CborError> {
        let start = d.position();
        d.skip()?;
        items.push(buf.get(start..d.position()).unwrap_or_default());
        Ok(())
    };
    match d.array()? {
        Some(len) => {
            for _ in 0..len {
                skip_item(&mut d)?;
            }
        }
        None => loop {
            if matches!(d.datatype()?, Type::Break) {
                d.set_position(d.position() + 1);
                break;
            }
            skip_item(&mut d)?;
        },
    }
    check_consumed(&d)?;
    Ok(items)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plutus_constr_is_one_item() {
        // 121([42, h'ab'])
        let data = [0xd8, 0x79, 0x9f, 0x18, 0x2a, 0x41, 0xab, 0xff];
        assert!(validate_item(&data).is_ok());
        assert!(validate_item(&[0xfb, 0, 0, 0, 0, 0, 0, 0, 0]).is_ok());
    }

    #[test]
    fn malformed_items() {
        assert!(matches!(validate_item(&[]), Err(CborError::Malformed(_))));
        assert!(matches!(validate_item(&[0x19, 0x01]), Err(CborError::Malformed(_))));
        assert!(matches!(validate_item(&[0x43, 0x01]), Err(CborError::Malformed(_))));
        assert!(matches!(validate_item(&[0x1c]), Err(CborError::Malformed(_))));
        assert!(matches!(validate_item(&[0xff]), Err(CborError::Malformed(_))));
        assert!(matches!(
            validate_item(&[0x01, 0x02]),
            Err(CborError::TrailingBytes {
                offset: 1,
                residual: 1
            })
        ));
    }

    #[test]
    fn bytestring_headers() {
        for (len, hdr) in [
            (0usize, vec![0x40]),
            (23, vec![0x57]),
            (24, vec![0x58, 0x18]),
            (255, vec![0x58, 0xff]),
            (256, vec![0x59, 0x01, 0x00]),
            (70000, vec![0x5a, 0x00, 0x01, 0x11, 0x70]),
        ] {
            let wrapped = wrap_bytestring(&vec![0u8; len]);
            assert_eq!(&wrapped[..hdr.len()], &hdr[..], "length {len}");
            assert_eq!(wrapped.len(), hdr.len() + len, "length {len}");
        }
    }

    #[test]
    fn bytestring_roundtrip() {
        let payload: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let wrapped = wrap_bytestring(&payload);
        assert_eq!(read_bytestring(&wrapped).unwrap(), (payload.clone(), wrapped.len()));
        assert_eq!(exact_bytestring(&wrapped), Some(payload));
    }

    #[test]
    fn indefinite_bytestring_is_concatenated() {
        let data = [0x5f, 0x42, 0x01, 0x02, 0x41, 0x03, 0xff];
        assert_eq!(exact_bytestring(&data), Some(vec![1, 2, 3]));
        // text chunk inside an indefinite byte string
        assert!(read_bytestring(&[0x5f, 0x61, 0x61, 0xff]).is_err());
    }

    #[test]
    fn exact_bytestring_rejects_others() {
        assert_eq!(exact_bytestring(&[0x01]), None);
        assert_eq!(exact_bytestring(&[0x41, 0x01, 0x00]), None);
        assert_eq!(exact_bytestring(&[0x01, 0x00, 0x00, 0x61]), None);
        assert_eq!(exact_bytestring(&[0x42, 0x01]), None);
    }

    #[test]
    fn array_items_split() {
        let data = [0x83, 0x18, 0x2a, 0x41, 0xab, 0x80];
        let items = array_items(&data).unwrap();
        assert_eq!(items, vec![&[0x18, 0x2a][..], &[0x41, 0xab][..], &[0x80][..]]);

        let indef = [0x9f, 0x01, 0x02, 0xff];
        assert_eq!(array_items(&indef).unwrap(), vec![&[0x01][..], &[0x02][..]]);

        assert!(matches!(
            array_items(&[0x41, 0x00]),
            Err(CborError::UnexpectedType {
                expected: "array",
                found: Type::Bytes,
                ..
            })
        ));
        assert!(matches!(
            array_items(&[0x81, 0x01, 0x02]),
            Err(CborError::TrailingBytes { .. })
        ));
        assert!(matches!(array_items(&[0x82, 0x01]), Err(CborError::Malformed(_))));
    }
}
