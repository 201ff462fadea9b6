//! Flat codec and parameterization for Untyped Plutus Core programs
//!
//! # Overview
//!
//! Cardano smart contracts are shipped on chain as Untyped Plutus Core
//! (UPLC) programs, serialized in the bit-oriented *Flat* format and then
//! wrapped in a CBOR byte string. Tooling that builds transactions has to
//! take such a script apart, apply compile-time parameters to it, and put
//! it back together byte-for-byte the way the ledger expects.
//!
//! This crate provides the pieces for that round trip:
//!
//! - an in-memory model of programs and terms ([`term`], [`constant`],
//!   [`builtin`]);
//! - a Flat encoder and decoder for that model ([`flat`]), built on the
//!   bit-level [`Parser`] and [`Target`] abstractions and the [`Encode`] and
//!   [`Decode`] traits;
//! - the CBOR script envelope ([`script`]), which accepts zero, one or two
//!   byte-string layers and always emits exactly one;
//! - the parameterizer ([`params`]), which applies constants to a compiled
//!   validator.
//!
//! Evaluation, cost accounting and pretty-printing of programs are outside
//! the scope of this crate.
//!
//! # Example
//!
//! ```
//! use uplc_flat::{apply_params, decode_from_hex, Constant, PlutusData, Term};
//!
//! // lam x. x, wrapped once in CBOR
//! let script = "46010000200101";
//! let data = PlutusData::from_cbor(vec![0x18, 0x2a]).unwrap();
//! let applied = apply_params(script, &[Constant::Data(data)]).unwrap();
//! assert_eq!(applied, "4c010000320014c102182a0001");
//!
//! let program = decode_from_hex(&applied).unwrap();
//! assert!(matches!(program.term, Term::Apply { .. }));
//! ```

pub mod builder;
pub mod builtin;
pub mod cbor;
pub mod constant;
pub mod conv;
pub mod error;
pub mod flat;
pub mod hexstring;
mod internal;
mod logging;
pub mod natural;
pub mod params;
pub mod parse;
pub mod prim;
pub mod script;
pub mod seq;
pub mod term;

pub use crate::builder::{bits::BitBuilder, Builder};
pub use crate::builtin::BuiltinFunction;
pub use crate::constant::{Constant, DataType, PlutusData};
pub use crate::conv::{error::DecodeError, target::Target, Decode, Encode, EncodeLength};
pub use crate::error::EncodeError;
pub use crate::flat::{decode_from_hex, decode_program, encode_program};
pub use crate::hexstring::HexString;
pub use crate::internal::offset::Position;
pub use crate::natural::{Integer, Natural};
pub use crate::params::{apply_params, apply_params_cbor, apply_params_to_script, ParamSchema};
pub use crate::parse::{bitparser::BitParser, error::ParseError, ParseResult, Parser};
pub use crate::script::{cbor_to_script, Script, ScriptError, ScriptType};
pub use crate::term::{DeBruijn, Program, Term, Version};
