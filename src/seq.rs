//! Flat list framing
//!
//! A Flat list is written as `1 item 1 item ... 0`: every element is
//! preceded by a `1` bit, and the list is closed by a single `0` bit.
//! Lists of terms, type tags and constant values all share this framing,
//! so it is exposed as a pair of higher-order helpers rather than an
//! `Encode`/`Decode` impl on a wrapper type.

use crate::conv::target::Target;
use crate::error::EncodeResult;
use crate::parse::{ParseResult, Parser};

/// Writes `items` as a Flat list, serializing each element with `f`
pub fn write_list<'a, T, U, F, I>(items: I, buf: &mut U, mut f: F) -> EncodeResult<usize>
where
    T: 'a,
    U: Target,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T, &mut U) -> EncodeResult<usize>,
{
    let mut written = 0;
    for item in items {
        written += buf.push_bit(true);
        written += f(item, buf)?;
    }
    written += buf.push_bit(false);
    Ok(written)
}

/// Reads a Flat list, parsing each element with `f`
pub fn parse_list<T, P, F>(p: &mut P, mut f: F) -> ParseResult<Vec<T>>
where
    P: Parser,
    F: FnMut(&mut P) -> ParseResult<T>,
{
    let mut ret = Vec::new();
    while p.pop_bit()? {
        ret.push(f(p)?);
    }
    Ok(ret)
}
