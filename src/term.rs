//! Program and term model
//!
//! Terms are generic over the binder representation and the builtin
//! catalog, but the Flat codec is only defined for the default
//! instantiation, `Term<DeBruijn, BuiltinFunction>`.

use std::convert::TryFrom;
use std::fmt::Display;
use std::str::FromStr;

use crate::builtin::BuiltinFunction;
use crate::constant::Constant;
use crate::error::VersionError;

/// Width of a term tag on the wire
pub const TERM_TAG_WIDTH: u8 = 4;

/// De Bruijn index of a variable, or the level of a lambda binder.
///
/// Variable indices count enclosing lambdas outward starting at 1. Flat does
/// not transmit binder names, so a decoded lambda is labelled with its depth,
/// the number of lambdas enclosing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct DeBruijn(pub u64);

impl From<u64> for DeBruijn {
    fn from(ix: u64) -> Self {
        Self(ix)
    }
}

impl Display for DeBruijn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.0)
    }
}

/// Untyped Plutus Core term
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub enum Term<Name = DeBruijn, Fun = BuiltinFunction> {
    Var(Name),
    Delay(Box<Term<Name, Fun>>),
    Lambda {
        parameter_name: Name,
        body: Box<Term<Name, Fun>>,
    },
    Apply {
        function: Box<Term<Name, Fun>>,
        argument: Box<Term<Name, Fun>>,
    },
    Constant(Constant),
    Force(Box<Term<Name, Fun>>),
    Error,
    Builtin(Fun),
    Constr {
        tag: u64,
        fields: Vec<Term<Name, Fun>>,
    },
    Case {
        constr: Box<Term<Name, Fun>>,
        branches: Vec<Term<Name, Fun>>,
    },
}

impl<Name, Fun> Term<Name, Fun> {
    #[must_use]
    pub fn var(name: impl Into<Name>) -> Self {
        Term::Var(name.into())
    }

    #[must_use]
    pub fn delay(self) -> Self {
        Term::Delay(Box::new(self))
    }

    #[must_use]
    pub fn force(self) -> Self {
        Term::Force(Box::new(self))
    }

    #[must_use]
    pub fn lambda(parameter_name: Name, body: Self) -> Self {
        Term::Lambda {
            parameter_name,
            body: Box::new(body),
        }
    }

    /// Applies `self` to `argument`
    #[must_use]
    pub fn apply(self, argument: Self) -> Self {
        Term::Apply {
            function: Box::new(self),
            argument: Box::new(argument),
        }
    }

    #[must_use]
    pub fn constant(value: impl Into<Constant>) -> Self {
        Term::Constant(value.into())
    }

    #[must_use]
    pub fn builtin(fun: Fun) -> Self {
        Term::Builtin(fun)
    }

    #[must_use]
    pub fn constr(tag: u64, fields: Vec<Self>) -> Self {
        Term::Constr { tag, fields }
    }

    #[must_use]
    pub fn case(constr: Self, branches: Vec<Self>) -> Self {
        Term::Case {
            constr: Box::new(constr),
            branches,
        }
    }

    /// Returns the wire tag of the outermost node
    #[must_use]
    pub fn tag(&self) -> TermTag {
        match self {
            Term::Var(_) => TermTag::Var,
            Term::Delay(_) => TermTag::Delay,
            Term::Lambda { .. } => TermTag::Lambda,
            Term::Apply { .. } => TermTag::Apply,
            Term::Constant(_) => TermTag::Constant,
            Term::Force(_) => TermTag::Force,
            Term::Error => TermTag::Error,
            Term::Builtin(_) => TermTag::Builtin,
            Term::Constr { .. } => TermTag::Constr,
            Term::Case { .. } => TermTag::Case,
        }
    }
}

/// Four-bit discriminant of a term on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TermTag {
    Var = 0,
    Delay = 1,
    Lambda = 2,
    Apply = 3,
    Constant = 4,
    Force = 5,
    Error = 6,
    Builtin = 7,
    Constr = 8,
    Case = 9,
}

impl TryFrom<u8> for TermTag {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        Ok(match raw {
            0 => TermTag::Var,
            1 => TermTag::Delay,
            2 => TermTag::Lambda,
            3 => TermTag::Apply,
            4 => TermTag::Constant,
            5 => TermTag::Force,
            6 => TermTag::Error,
            7 => TermTag::Builtin,
            8 => TermTag::Constr,
            9 => TermTag::Case,
            other => return Err(other),
        })
    }
}

/// Plutus Core language version, `major.minor.patch`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Version of programs without `constr`/`case`
    pub const V1_0_0: Version = Version::new(1, 0, 0);
    /// Version that introduced `constr` and `case`
    pub const V1_1_0: Version = Version::new(1, 1, 0);

    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        let component = |part: &str| {
            part.parse::<u64>().map_err(|_| VersionError::NonNumeric {
                component: part.to_owned(),
                input: s.to_owned(),
            })
        };
        match parts.as_slice() {
            [major, minor, patch] => Ok(Version::new(
                component(major)?,
                component(minor)?,
                component(patch)?,
            )),
            _ => Err(VersionError::Malformed(s.to_owned())),
        }
    }
}

/// A versioned term
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub struct Program<Name = DeBruijn, Fun = BuiltinFunction> {
    pub version: Version,
    pub term: Term<Name, Fun>,
}

impl<Name, Fun> Program<Name, Fun> {
    #[must_use]
    pub fn new(version: Version, term: Term<Name, Fun>) -> Self {
        Self { version, term }
    }
}
