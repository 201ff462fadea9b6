//! Flat encodings of the primitive payload types
//!
//! * `()` occupies no bits at all.
//! * `bool` is a single bit.
//! * `Vec<u8>` is a byte string: a filler to reach a byte boundary, then
//!   chunks of at most 255 bytes each prefixed by their length byte, then a
//!   zero-length chunk as terminator.
//! * `String` is the byte string of its UTF-8 encoding.

use crate::conv::{target::Target, Decode, Encode};
use crate::error::EncodeResult;
use crate::parse::{ParseResult, Parser};

/// Largest chunk of a Flat byte string
pub const MAX_CHUNK_LEN: usize = 255;

impl Encode for () {
    fn write_to<U: Target>(&self, _: &mut U) -> EncodeResult<usize> {
        Ok(0)
    }
}

impl Decode for () {
    #[inline]
    fn parse<P: Parser>(_: &mut P) -> ParseResult<()> {
        Ok(())
    }
}

impl Encode for bool {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        Ok(buf.push_bit(*self))
    }
}

impl Decode for bool {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        p.pop_bit()
    }
}

/// Writes `bytes` as a Flat byte string
pub fn write_bytestring<U: Target>(bytes: &[u8], buf: &mut U) -> EncodeResult<usize> {
    let mut written = buf.pad();
    buf.anticipate(bytes.len() + bytes.len() / MAX_CHUNK_LEN + 2);
    for chunk in bytes.chunks(MAX_CHUNK_LEN) {
        written += buf.push_byte(chunk.len() as u8)?;
        written += buf.push_bytes(chunk)?;
    }
    written += buf.push_byte(0)?;
    Ok(written)
}

/// Reads a Flat byte string
pub fn parse_bytestring<P: Parser>(p: &mut P) -> ParseResult<Vec<u8>> {
    p.take_filler()?;
    let mut ret = Vec::new();
    loop {
        let len = p.pop_byte()?;
        if len == 0 {
            return Ok(ret);
        }
        ret.extend_from_slice(p.take_bytes(len as usize)?);
    }
}

impl Encode for Vec<u8> {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        write_bytestring(self, buf)
    }
}

impl Decode for Vec<u8> {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        parse_bytestring(p)
    }
}

impl Encode for String {
    fn write_to<W: Target>(&self, buf: &mut W) -> EncodeResult<usize> {
        write_bytestring(self.as_bytes(), buf)
    }
}

impl Decode for String {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        Ok(String::from_utf8(parse_bytestring(p)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{bits::BitBuilder, Builder};
    use crate::conv::EncodeLength;
    use crate::parse::bitparser::BitParser;
    use crate::parse::error::{ExternalError, ParseError};

    #[test]
    fn unit_test() {
        assert_eq!((), <()>::decode([0u8; 0]).unwrap());
        assert_eq!(().flat_bits().unwrap(), 0);
    }

    #[test]
    fn bool_is_one_bit() {
        assert_eq!(true.flat_bits().unwrap(), 1);
        assert!(bool::decode([0x80]).unwrap());
        assert!(!bool::decode([0x7f]).unwrap());
    }

    #[test]
    fn bytestring_after_partial_byte() {
        let mut b = BitBuilder::create();
        b.push_bits(0b010, 3).unwrap();
        write_bytestring(&[0xab], &mut b).unwrap();
        assert_eq!(b.into_vec(), vec![0b0100_0001, 0x01, 0xab, 0x00]);
    }

    #[test]
    fn empty_bytestring_when_aligned() {
        assert_eq!(Vec::<u8>::new().to_bytes().unwrap(), vec![0x01, 0x00]);
        assert_eq!(Vec::<u8>::decode([0x01, 0x00]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn chunking_at_255() {
        for len in [254usize, 255, 256, 510, 511] {
            let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let enc = bytes.to_bytes().unwrap();
            let chunks = (len + MAX_CHUNK_LEN - 1) / MAX_CHUNK_LEN;
            assert_eq!(enc.len(), 1 + len + chunks + 1, "length {len}");
            assert_eq!(enc.get(1).copied(), Some(len.min(MAX_CHUNK_LEN) as u8));
            assert_eq!(Vec::<u8>::decode(&enc).unwrap(), bytes);
        }
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let enc = vec![0xc3u8, 0x28].to_bytes().unwrap();
        let mut p = BitParser::new(&enc);
        assert!(matches!(
            String::parse(&mut p),
            Err(ParseError::External(ExternalError::UncoercableString(_)))
        ));
    }

    #[test]
    fn string_roundtrip() {
        let s = String::from("héllo");
        assert_eq!(String::decode(s.to_bytes().unwrap()).unwrap(), s);
    }

    #[test]
    fn truncated_chunk_is_reported() {
        let err = Vec::<u8>::decode([0x01, 0x05, 0xaa]).unwrap_err();
        assert!(err.as_parse_error().map_or(false, |e| e.is_truncation()));
    }
}
