//! Flat codec for programs
//!
//! The `Encode` and `Decode` impls for the program model live in the
//! `encode` and `decode` submodules; this module holds the wire constants
//! they share and the whole-buffer entry points.
//!
//! A program is its version (three naturals), its term, and a final filler
//! that brings the stream to a byte boundary.

use crate::conv::{error::DecodeResult, Decode, EncodeLength};
use crate::error::EncodeResult;
use crate::logging::debug;
use crate::script::{unwrap_cbor, ScriptError};
use crate::term::Program;

mod decode;
mod encode;

/// Width of a constant type tag on the wire
pub const TYPE_TAG_WIDTH: u8 = 4;

/// Deepest term nesting the codec reads or writes
pub const MAX_TERM_DEPTH: usize = 1000;

/// Deepest type application accepted in a constant's type tags
pub const MAX_TYPE_DEPTH: usize = 64;

pub(crate) const TYPE_LIST: u8 = 5;
pub(crate) const TYPE_PAIR: u8 = 6;
pub(crate) const TYPE_APPLY: u8 = 7;

/// Decodes a program from raw Flat bytes.
///
/// # Errors
///
/// Fails on truncated input, an unknown term or type tag, a builtin index
/// beyond the catalog, terms nested deeper than [`MAX_TERM_DEPTH`], or a
/// malformed constant payload. Every error records
/// the bit position at which it was detected.
pub fn decode_program(bytes: &[u8]) -> DecodeResult<Program> {
    debug!(bytes = bytes.len(), "decoding flat program");
    let ret = Program::decode(bytes);
    if let Err(ref _err) = ret {
        debug!(error = %_err, "flat decoding failed");
    }
    ret
}

/// Decodes a program from hex, which may be raw Flat or Flat wrapped in
/// one or two CBOR byte strings.
///
/// # Errors
///
/// Fails on malformed hex, on more than two CBOR layers, or as
/// [`decode_program`] does.
pub fn decode_from_hex(hex: &str) -> Result<Program, ScriptError> {
    let bytes = crate::hexstring::util::bytes_of_hex(hex)?;
    let flat = unwrap_cbor(&bytes)?;
    Ok(decode_program(&flat)?)
}

/// Encodes a program into Flat bytes, ending with the filler.
///
/// # Errors
///
/// Fails if any constant in the program disagrees with its declared type.
pub fn encode_program(program: &Program) -> EncodeResult<Vec<u8>> {
    let ret = program.to_bytes_full()?;
    debug!(
        version = %program.version,
        bytes = ret.len(),
        "encoded flat program"
    );
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builtin::BuiltinFunction;
    use crate::constant::{Constant, DataType};
    use crate::conv::error::DecodeError;
    use crate::error::EncodeError;
    use crate::internal::offset::Position;
    use crate::parse::error::{ParseError, TokenError};
    use crate::term::{DeBruijn, Term, Version};

    fn parse_err(hex: &str) -> ParseError {
        match Program::decode_hex(hex) {
            Err(DecodeError::Parse(err)) => err,
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn error_program() {
        let prog = decode_program(&[0x01, 0x00, 0x00, 0x61]).unwrap();
        assert_eq!(prog, Program::new(Version::V1_0_0, Term::Error));
        assert_eq!(encode_program(&prog).unwrap(), vec![0x01, 0x00, 0x00, 0x61]);
    }

    #[test]
    fn lambda_binder_is_depth() {
        // lam (lam (var 2))
        let prog = Program::new(
            Version::V1_0_0,
            Term::lambda(DeBruijn(7), Term::lambda(DeBruijn(7), Term::var(2u64))),
        );
        let back = decode_program(&encode_program(&prog).unwrap()).unwrap();
        assert_eq!(
            back.term,
            Term::lambda(DeBruijn(0), Term::lambda(DeBruijn(1), Term::var(2u64)))
        );
    }

    #[test]
    fn unknown_term_tag() {
        // version 1.0.0, tag 0b1010
        match parse_err("010000a1") {
            ParseError::Token(TokenError::InvalidTermTag(err)) => {
                assert_eq!(err.actual(), 10);
                assert_eq!(err.position(), Position { byte: 3, bit: 0 });
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn builtin_past_catalog() {
        match parse_err("0101007ae1") {
            ParseError::Token(TokenError::BuiltinOutOfRange { index, limit, at }) => {
                assert_eq!(index, 87);
                assert_eq!(limit, BuiltinFunction::count());
                assert_eq!(at, Position { byte: 3, bit: 4 });
            }
            other => panic!("unexpected error {other:?}"),
        }
        let last = Program::decode_hex("0101007ac1").unwrap();
        assert_eq!(last.term, Term::Builtin(BuiltinFunction::Ripemd_160));
    }

    #[test]
    fn bad_type_tags() {
        // con with type list [9]: 0100 1 1001 0 ...
        match parse_err("0100004ca1") {
            ParseError::Token(TokenError::InvalidTypeTag(err)) => assert_eq!(err.actual(), 9),
            other => panic!("unexpected error {other:?}"),
        }
        // con with type list [7]: 0100 1 0111 0 ...
        assert!(matches!(
            parse_err("0100004b81"),
            ParseError::Token(TokenError::MalformedTypeApplication { .. })
        ));
        // con with type list [0, 0]: 0100 1 0000 1 0000 0
        assert!(matches!(
            parse_err("010000484001"),
            ParseError::Token(TokenError::MalformedTypeApplication { .. })
        ));
    }

    #[test]
    fn truncation_is_reported() {
        for hex in ["", "01", "010000", "01000037", "0100003700"] {
            let err = parse_err(hex);
            assert!(err.is_truncation(), "{hex}: {err}");
        }
    }

    #[test]
    fn mismatched_constant_refuses_to_encode() {
        let prog = Program::new(
            Version::V1_0_0,
            Term::Constant(Constant::ProtoList(
                DataType::Integer,
                vec![Constant::ByteString(vec![])],
            )),
        );
        assert!(encode_program(&prog).is_err());
    }

    #[test]
    fn hex_with_cbor_layers() {
        let raw = decode_from_hex("01000061").unwrap();
        assert_eq!(decode_from_hex("4401000061").unwrap(), raw);
        assert_eq!(decode_from_hex("454401000061").unwrap(), raw);
        assert!(decode_from_hex("46454401000061").is_err());
        assert!(decode_from_hex("0100006").is_err());
    }

    fn nested_delays(pairs: usize) -> String {
        // each 0x11 is two delays; 0x61 is error followed by the filler
        format!("010000{}61", "11".repeat(pairs))
    }

    #[test]
    fn term_nesting_limit() {
        let ok = Program::decode_hex(&nested_delays((MAX_TERM_DEPTH - 1) / 2)).unwrap();
        assert!(matches!(ok.term, Term::Delay(_)));

        let pairs = MAX_TERM_DEPTH / 2;
        match parse_err(&nested_delays(pairs)) {
            ParseError::Token(TokenError::NestingTooDeep { limit, at }) => {
                assert_eq!(limit, MAX_TERM_DEPTH);
                assert_eq!(at, Position { byte: 3 + pairs, bit: 0 });
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn deep_terms_refuse_to_encode() {
        let deep = (0..MAX_TERM_DEPTH).fold(Term::Error, |acc, _| acc.delay());
        assert_eq!(
            encode_program(&Program::new(Version::V1_0_0, deep)),
            Err(EncodeError::NestingTooDeep {
                limit: MAX_TERM_DEPTH
            })
        );
    }

    #[test]
    fn type_nesting_limit() {
        let nested = |depth: usize| (0..depth).fold(DataType::Integer, |acc, _| DataType::list(acc));
        let empty_list = |ty: DataType| {
            Program::new(
                Version::V1_0_0,
                Term::Constant(Constant::ProtoList(ty, Vec::new())),
            )
        };
        let ok = empty_list(nested(MAX_TYPE_DEPTH - 2));
        assert_eq!(decode_program(&encode_program(&ok).unwrap()).unwrap(), ok);

        let too_deep = empty_list(nested(MAX_TYPE_DEPTH - 1));
        assert_eq!(
            encode_program(&too_deep),
            Err(EncodeError::NestingTooDeep {
                limit: MAX_TYPE_DEPTH
            })
        );

        // con with type list [7, 5] * 64, then [0]
        let mut tags = [TYPE_APPLY, TYPE_LIST].repeat(MAX_TYPE_DEPTH);
        tags.push(0);
        let mut bits = String::from("000000010000000000000000");
        bits.push_str("0100");
        for tag in &tags {
            bits.push_str(&format!("1{tag:04b}"));
        }
        bits.push('0');
        while bits.len() % 8 != 7 {
            bits.push('0');
        }
        bits.push('1');
        let bytes: Vec<u8> = bits
            .as_bytes()
            .chunks(8)
            .map(|byte| byte.iter().fold(0u8, |acc, b| (acc << 1) | (b - b'0')))
            .collect();
        match Program::decode(bytes) {
            Err(DecodeError::Parse(ParseError::Token(TokenError::NestingTooDeep {
                limit, ..
            }))) => assert_eq!(limit, MAX_TYPE_DEPTH),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
