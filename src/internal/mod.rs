//! Low-level logic used throughout this crate
//!
//! This module serves as a general heading for definitions that are designed
//! primarily for library-internal use, and do not have an immediately obvious
//! alternate module to live under.
//!
//! The `offset` submodule contains the bit-granular cursor that backs
//! [`BitParser`](crate::parse::bitparser::BitParser).

pub(crate) mod offset;
