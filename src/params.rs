//! Script parameterization
//!
//! A parameterized validator is a program whose body is a function still
//! waiting for its compile-time parameters. Applying parameters wraps the
//! body in one `Apply` node per parameter, leftmost parameter innermost:
//!
//! ```text
//! body  =>  [[[body p1] p2] p3]
//! ```
//!
//! The version is unchanged. Nothing here checks that the parameters match
//! what the body expects; a wrong parameter only shows up at evaluation.

use crate::cbor::{self, CborError};
use crate::constant::{Constant, PlutusData};
use crate::flat::{decode_from_hex, encode_program};
use crate::logging::debug;
use crate::script::ScriptError;
use crate::term::{Program, Term};

impl<Name: Clone, Fun: Clone> Program<Name, Fun> {
    /// Returns a new program whose body applies the current body to each
    /// of `params` in order.
    #[must_use]
    pub fn apply_params<I>(&self, params: I) -> Self
    where
        I: IntoIterator<Item = Constant>,
    {
        let term = params
            .into_iter()
            .fold(self.term.clone(), |acc, param| acc.apply(Term::Constant(param)));
        Program::new(self.version, term)
    }

    /// Applies `Data` parameters, the common case for validators
    #[must_use]
    pub fn apply_data(&self, params: &[PlutusData]) -> Self {
        self.apply_params(params.iter().cloned().map(Constant::Data))
    }
}

/// Applies `params` to the script in `script_hex` and returns the result
/// as hex of the Flat bytes wrapped in exactly one CBOR byte string.
///
/// `script_hex` may be raw Flat or wrapped in one or two byte strings.
///
/// # Errors
///
/// Fails if the script cannot be unwrapped or decoded, or if a parameter
/// constant is inconsistent with its declared type.
pub fn apply_params(script_hex: &str, params: &[Constant]) -> Result<String, ScriptError> {
    let program = decode_from_hex(script_hex)?;
    let applied = program.apply_params(params.iter().cloned());
    debug!(count = params.len(), "applied script parameters");
    let flat = encode_program(&applied)?;
    Ok(crate::hexstring::util::hex_of_bytes(&cbor::wrap_bytestring(&flat)))
}

/// Serializer that turns typed parameter values into the constants to
/// apply, driven by a parameter schema supplied by the caller.
pub trait ParamSchema {
    /// Caller-side representation of the full parameter list
    type Value: ?Sized;
    /// Serialization failure
    type Error: std::error::Error + Send + Sync + 'static;

    /// Produces the constants to apply, in application order
    ///
    /// # Errors
    ///
    /// Fails if `value` does not conform to the schema.
    fn to_constants(&self, value: &Self::Value) -> Result<Vec<Constant>, Self::Error>;
}

/// Serializes `value` with `schema`, then proceeds as [`apply_params`].
///
/// # Errors
///
/// Returns [`ScriptError::Params`] if the schema rejects `value`, and
/// otherwise fails as [`apply_params`] does.
pub fn apply_params_to_script<S: ParamSchema>(
    script_hex: &str,
    schema: &S,
    value: &S::Value,
) -> Result<String, ScriptError> {
    let params = schema
        .to_constants(value)
        .map_err(|err| ScriptError::Params(Box::new(err)))?;
    apply_params(script_hex, &params)
}

/// Applies parameters given as one CBOR array of Plutus data, each item
/// becoming a `Data` constant.
///
/// # Errors
///
/// Fails if `params_cbor` is not exactly one well-formed CBOR array, and
/// otherwise as [`apply_params`] does.
pub fn apply_params_cbor(script_hex: &str, params_cbor: &[u8]) -> Result<String, ScriptError> {
    let params = cbor::array_items(params_cbor)?
        .into_iter()
        .map(|item| PlutusData::from_cbor(item.to_vec()).map(Constant::Data))
        .collect::<Result<Vec<_>, CborError>>()?;
    apply_params(script_hex, &params)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constant::DataType;
    use crate::term::{DeBruijn, Version};

    fn identity() -> Program {
        Program::new(
            Version::V1_0_0,
            Term::lambda(DeBruijn(0), Term::var(1u64)),
        )
    }

    #[test]
    fn zero_params_is_identity() {
        let prog = identity();
        assert_eq!(prog.apply_params(Vec::new()), prog);
    }

    #[test]
    fn params_nest_leftmost_innermost() {
        let prog = identity().apply_params(vec![Constant::from(1i64), Constant::from(2i64)]);
        let expected = identity()
            .term
            .apply(Term::constant(1i64))
            .apply(Term::constant(2i64));
        assert_eq!(prog.term, expected);
        assert_eq!(prog.version, Version::V1_0_0);
    }

    #[test]
    fn apply_data_param_to_hex() {
        let data = PlutusData::from_cbor(vec![0x18, 0x2a]).unwrap();
        let out = apply_params("010000200101", &[Constant::Data(data)]).unwrap();
        assert_eq!(out, "4c010000320014c102182a0001");
    }

    #[test]
    fn cbor_param_list() {
        let out = apply_params_cbor("46010000200101", &[0x81, 0x18, 0x2a]).unwrap();
        assert_eq!(out, "4c010000320014c102182a0001");
        assert!(matches!(
            apply_params_cbor("010000200101", &[0x18, 0x2a]),
            Err(ScriptError::Cbor(_))
        ));
    }

    #[test]
    fn ill_typed_param_is_rejected() {
        let bad = Constant::ProtoList(DataType::Bool, vec![Constant::Unit]);
        assert!(matches!(
            apply_params("010000200101", &[bad]),
            Err(ScriptError::Encode(_))
        ));
    }

    struct IntegerList;

    #[derive(Debug)]
    struct Negative(i64);

    impl std::fmt::Display for Negative {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "negative parameter {}", self.0)
        }
    }

    impl std::error::Error for Negative {}

    impl ParamSchema for IntegerList {
        type Value = [i64];
        type Error = Negative;

        fn to_constants(&self, value: &[i64]) -> Result<Vec<Constant>, Negative> {
            value
                .iter()
                .map(|&n| if n < 0 { Err(Negative(n)) } else { Ok(Constant::from(n)) })
                .collect()
        }
    }

    #[test]
    fn schema_driven_params() {
        let hex = apply_params_to_script("010000200101", &IntegerList, &[3]).unwrap();
        let back = decode_from_hex(&hex).unwrap();
        assert_eq!(back, identity().apply_params(vec![Constant::from(3i64)]));
        assert!(matches!(
            apply_params_to_script("010000200101", &IntegerList, &[-1]),
            Err(ScriptError::Params(_))
        ));
    }
}
