//! `Encode` implementations for the program model

use crate::builtin::{BuiltinFunction, BUILTIN_TAG_WIDTH};
use crate::constant::{Constant, DataType, PlutusData};
use crate::conv::{target::Target, Encode};
use crate::error::{EncodeError, EncodeResult};
use crate::natural::Integer;
use crate::prim::write_bytestring;
use crate::seq::write_list;
use crate::term::{Program, Term, Version, TERM_TAG_WIDTH};

use super::{
    MAX_TERM_DEPTH, MAX_TYPE_DEPTH, TYPE_APPLY, TYPE_LIST, TYPE_PAIR, TYPE_TAG_WIDTH,
};

impl Encode for Version {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        Ok(self.major.write_to(buf)? + self.minor.write_to(buf)? + self.patch.write_to(buf)?)
    }
}

impl Encode for PlutusData {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        write_bytestring(self.as_cbor(), buf)
    }
}

impl DataType {
    /// Appends the type tags of `self` in prefix order
    fn push_tags(&self, out: &mut Vec<u8>) {
        match self {
            DataType::Integer => out.push(0),
            DataType::ByteString => out.push(1),
            DataType::String => out.push(2),
            DataType::Unit => out.push(3),
            DataType::Bool => out.push(4),
            DataType::Data => out.push(8),
            DataType::List(elem) => {
                out.extend_from_slice(&[TYPE_APPLY, TYPE_LIST]);
                elem.push_tags(out);
            }
            DataType::Pair(fst, snd) => {
                out.extend_from_slice(&[TYPE_APPLY, TYPE_APPLY, TYPE_PAIR]);
                fst.push_tags(out);
                snd.push_tags(out);
            }
        }
    }

    /// Number of type applications enclosing the deepest leaf
    fn nesting(&self) -> usize {
        match self {
            DataType::List(elem) => 1 + elem.nesting(),
            DataType::Pair(fst, snd) => 1 + fst.nesting().max(snd.nesting()),
            _ => 0,
        }
    }

    /// Returns the Flat type-tag sequence of `self`
    #[must_use]
    pub fn type_tags(&self) -> Vec<u8> {
        let mut tags = Vec::new();
        self.push_tags(&mut tags);
        tags
    }
}

impl Encode for DataType {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        if self.nesting() >= MAX_TYPE_DEPTH {
            return Err(EncodeError::NestingTooDeep {
                limit: MAX_TYPE_DEPTH,
            });
        }
        write_list(&self.type_tags(), buf, |tag, buf| {
            buf.push_bits(*tag, TYPE_TAG_WIDTH)
        })
    }
}

/// Writes the payload of a constant that has already been type-checked
fn write_value<U: Target>(value: &Constant, buf: &mut U) -> EncodeResult<usize> {
    match value {
        Constant::Integer(int) => Integer::new(int.clone()).write_to(buf),
        Constant::ByteString(bytes) => write_bytestring(bytes, buf),
        Constant::String(s) => write_bytestring(s.as_bytes(), buf),
        Constant::Unit => Ok(0),
        Constant::Bool(b) => b.write_to(buf),
        Constant::Data(data) => data.write_to(buf),
        Constant::ProtoList(_, items) => write_list(items, buf, |v, buf| write_value(v, buf)),
        Constant::ProtoPair(_, _, fst, snd) => {
            Ok(write_value(fst, buf)? + write_value(snd, buf)?)
        }
    }
}

impl Encode for Constant {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        let ty = self.type_check()?;
        Ok(ty.write_to(buf)? + write_value(self, buf)?)
    }
}

impl Encode for BuiltinFunction {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        buf.push_bits(self.index(), BUILTIN_TAG_WIDTH)
    }
}

/// Writes a term that sits under `nesting` enclosing terms
fn write_term<U: Target>(term: &Term, buf: &mut U, nesting: usize) -> EncodeResult<usize> {
    if nesting >= MAX_TERM_DEPTH {
        return Err(EncodeError::NestingTooDeep {
            limit: MAX_TERM_DEPTH,
        });
    }
    let inner = nesting + 1;
    let tag_bits = buf.push_bits(term.tag() as u8, TERM_TAG_WIDTH)?;
    let body = match term {
        Term::Var(name) => name.0.write_to(buf)?,
        Term::Delay(t) | Term::Force(t) => write_term(t, buf, inner)?,
        Term::Lambda { body, .. } => write_term(body, buf, inner)?,
        Term::Apply { function, argument } => {
            write_term(function, buf, inner)? + write_term(argument, buf, inner)?
        }
        Term::Constant(c) => c.write_to(buf)?,
        Term::Error => 0,
        Term::Builtin(fun) => fun.write_to(buf)?,
        Term::Constr { tag, fields } => {
            tag.write_to(buf)? + write_list(fields, buf, |t, buf| write_term(t, buf, inner))?
        }
        Term::Case { constr, branches } => {
            write_term(constr, buf, inner)?
                + write_list(branches, buf, |t, buf| write_term(t, buf, inner))?
        }
    };
    Ok(tag_bits + body)
}

impl Encode for Term {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        write_term(self, buf, 0)
    }
}

impl Encode for Program {
    fn write_to<U: Target>(&self, buf: &mut U) -> EncodeResult<usize> {
        Ok(self.version.write_to(buf)? + self.term.write_to(buf)? + buf.pad())
    }
}
