//! `Decode` implementations for the program model

use crate::builtin::{BuiltinFunction, BUILTIN_TAG_WIDTH};
use crate::constant::{Constant, DataType, PlutusData};
use crate::conv::Decode;
use crate::internal::offset::Position;
use crate::natural::Integer;
use crate::parse::error::{ParseError, TagError, TokenError};
use crate::parse::{ParseResult, Parser};
use crate::prim::parse_bytestring;
use crate::seq::parse_list;
use crate::term::{DeBruijn, Program, Term, TermTag, Version, TERM_TAG_WIDTH};

use super::{
    MAX_TERM_DEPTH, MAX_TYPE_DEPTH, TYPE_APPLY, TYPE_LIST, TYPE_PAIR, TYPE_TAG_WIDTH,
};

impl Decode for Version {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        Ok(Version::new(u64::parse(p)?, u64::parse(p)?, u64::parse(p)?))
    }
}

impl Decode for PlutusData {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        Ok(PlutusData::from_cbor(parse_bytestring(p)?)?)
    }
}

/// Reads one complete type off the front of `tags`, returning it with the
/// tags that follow it. `depth` counts the enclosing type applications.
fn type_from_tags<'a>(
    tags: &'a [u8],
    all: &[u8],
    at: Position,
    depth: usize,
) -> ParseResult<(DataType, &'a [u8])> {
    if depth >= MAX_TYPE_DEPTH {
        return Err(TokenError::NestingTooDeep {
            limit: MAX_TYPE_DEPTH,
            at,
        }
        .into());
    }
    let malformed = || -> ParseError {
        TokenError::MalformedTypeApplication {
            tags: all.to_vec(),
            at,
        }
        .into()
    };
    match tags {
        [TYPE_APPLY, TYPE_LIST, rest @ ..] => {
            let (elem, rest) = type_from_tags(rest, all, at, depth + 1)?;
            Ok((DataType::list(elem), rest))
        }
        [TYPE_APPLY, TYPE_APPLY, TYPE_PAIR, rest @ ..] => {
            let (fst, rest) = type_from_tags(rest, all, at, depth + 1)?;
            let (snd, rest) = type_from_tags(rest, all, at, depth + 1)?;
            Ok((DataType::pair(fst, snd), rest))
        }
        [TYPE_APPLY, ..] | [TYPE_LIST, ..] | [TYPE_PAIR, ..] | [] => Err(malformed()),
        [leaf, rest @ ..] => {
            let ty = match *leaf {
                0 => DataType::Integer,
                1 => DataType::ByteString,
                2 => DataType::String,
                3 => DataType::Unit,
                4 => DataType::Bool,
                8 => DataType::Data,
                other => {
                    return Err(
                        TokenError::InvalidTypeTag(TagError::new(other, "constant type", at))
                            .into(),
                    )
                }
            };
            Ok((ty, rest))
        }
    }
}

impl Decode for DataType {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let at = p.position();
        let tags = parse_list(p, |p| p.pop_bits(TYPE_TAG_WIDTH))?;
        let (ty, rest) = type_from_tags(&tags, &tags, at, 0)?;
        if !rest.is_empty() {
            return Err(TokenError::MalformedTypeApplication { tags, at }.into());
        }
        Ok(ty)
    }
}

/// Reads the payload of a constant whose type is already known
fn parse_value<P: Parser>(p: &mut P, ty: &DataType) -> ParseResult<Constant> {
    Ok(match ty {
        DataType::Integer => Constant::Integer(Integer::parse(p)?.into_inner()),
        DataType::ByteString => Constant::ByteString(parse_bytestring(p)?),
        DataType::String => Constant::String(String::parse(p)?),
        DataType::Unit => Constant::Unit,
        DataType::Bool => Constant::Bool(bool::parse(p)?),
        DataType::Data => Constant::Data(PlutusData::parse(p)?),
        DataType::List(elem) => {
            Constant::ProtoList((**elem).clone(), parse_list(p, |p| parse_value(p, elem))?)
        }
        DataType::Pair(fst, snd) => {
            let fst_val = parse_value(p, fst)?;
            let snd_val = parse_value(p, snd)?;
            Constant::ProtoPair(
                (**fst).clone(),
                (**snd).clone(),
                Box::new(fst_val),
                Box::new(snd_val),
            )
        }
    })
}

impl Decode for Constant {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let ty = DataType::parse(p)?;
        parse_value(p, &ty)
    }
}

impl Decode for BuiltinFunction {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let at = p.position();
        let index = p.pop_bits(BUILTIN_TAG_WIDTH)?;
        BuiltinFunction::from_index(index).ok_or_else(|| {
            TokenError::BuiltinOutOfRange {
                index,
                limit: BuiltinFunction::count(),
                at,
            }
            .into()
        })
    }
}

/// Reads a term nested under `binders` lambdas and `nesting` enclosing
/// terms of any kind.
fn parse_term<P: Parser>(p: &mut P, binders: u64, nesting: usize) -> ParseResult<Term> {
    let at = p.position();
    if nesting >= MAX_TERM_DEPTH {
        return Err(TokenError::NestingTooDeep {
            limit: MAX_TERM_DEPTH,
            at,
        }
        .into());
    }
    let inner = nesting + 1;
    let raw = p.pop_bits(TERM_TAG_WIDTH)?;
    let tag = TermTag::try_from(raw)
        .map_err(|raw| TokenError::InvalidTermTag(TagError::new(raw, "term", at)))?;
    Ok(match tag {
        TermTag::Var => Term::Var(DeBruijn(u64::parse(p)?)),
        TermTag::Delay => Term::Delay(Box::new(parse_term(p, binders, inner)?)),
        TermTag::Lambda => Term::Lambda {
            parameter_name: DeBruijn(binders),
            body: Box::new(parse_term(p, binders + 1, inner)?),
        },
        TermTag::Apply => {
            let function = parse_term(p, binders, inner)?;
            let argument = parse_term(p, binders, inner)?;
            function.apply(argument)
        }
        TermTag::Constant => Term::Constant(Constant::parse(p)?),
        TermTag::Force => Term::Force(Box::new(parse_term(p, binders, inner)?)),
        TermTag::Error => Term::Error,
        TermTag::Builtin => Term::Builtin(BuiltinFunction::parse(p)?),
        TermTag::Constr => {
            let ctor = u64::parse(p)?;
            let fields = parse_list(p, |p| parse_term(p, binders, inner))?;
            Term::constr(ctor, fields)
        }
        TermTag::Case => {
            let constr = parse_term(p, binders, inner)?;
            let branches = parse_list(p, |p| parse_term(p, binders, inner))?;
            Term::case(constr, branches)
        }
    })
}

impl Decode for Term {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        parse_term(p, 0, 0)
    }
}

impl Decode for Program {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let version = Version::parse(p)?;
        let term = Term::parse(p)?;
        p.take_filler()?;
        Ok(Program { version, term })
    }
}
