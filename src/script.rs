//! CBOR script envelope
//!
//! On chain, and in most tooling, a Plutus script is its Flat bytes wrapped
//! in a CBOR byte string. Some producers wrap it twice. Inputs are accepted
//! with zero, one or two layers; outputs always carry exactly one.
//!
//! Native scripts are already CBOR structures and are never unwrapped.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::cbor::{self, CborError};
use crate::conv::error::DecodeError;
use crate::error::{EncodeError, HexConvError};
use crate::flat::decode_program;
use crate::hexstring::util::{bytes_of_hex, hex_of_bytes};
use crate::logging::{debug, trace};
use crate::term::Program;

/// Deepest CBOR byte-string nesting accepted around Flat bytes
pub const MAX_WRAPPER_LAYERS: usize = 2;

/// Script language tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub enum ScriptType {
    Native,
    PlutusV1,
    PlutusV2,
    PlutusV3,
}

impl ScriptType {
    #[must_use]
    pub const fn is_plutus(self) -> bool {
        !matches!(self, ScriptType::Native)
    }

    const fn label(self) -> &'static str {
        match self {
            ScriptType::Native => "Native",
            ScriptType::PlutusV1 => "PlutusV1",
            ScriptType::PlutusV2 => "PlutusV2",
            ScriptType::PlutusV3 => "PlutusV3",
        }
    }
}

impl Display for ScriptType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ScriptType {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Native" => Ok(ScriptType::Native),
            "PlutusV1" => Ok(ScriptType::PlutusV1),
            "PlutusV2" => Ok(ScriptType::PlutusV2),
            "PlutusV3" => Ok(ScriptType::PlutusV3),
            other => Err(ScriptError::UnsupportedScriptType(other.to_owned())),
        }
    }
}

/// Errors raised while moving scripts between hex, CBOR and Flat
#[derive(Debug)]
pub enum ScriptError {
    Hex(HexConvError),
    Cbor(CborError),
    /// More than [`MAX_WRAPPER_LAYERS`] byte-string layers around the payload
    TooManyLayers,
    UnsupportedScriptType(String),
    /// A Flat program was requested from a native script
    NotPlutus(ScriptType),
    Decode(DecodeError),
    Encode(EncodeError),
    /// Failure of an external parameter serializer
    Params(Box<dyn Error + Send + Sync>),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Hex(err) => write!(f, "invalid script hex: {err}"),
            ScriptError::Cbor(err) => write!(f, "invalid script CBOR: {err}"),
            ScriptError::TooManyLayers => write!(
                f,
                "script is wrapped in more than {MAX_WRAPPER_LAYERS} CBOR byte strings"
            ),
            ScriptError::UnsupportedScriptType(label) => {
                write!(f, "unsupported script type `{label}`")
            }
            ScriptError::NotPlutus(ty) => write!(f, "{ty} script has no Flat program"),
            ScriptError::Decode(err) => write!(f, "cannot decode script: {err}"),
            ScriptError::Encode(err) => write!(f, "cannot encode script: {err}"),
            ScriptError::Params(err) => write!(f, "cannot serialize parameters: {err}"),
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScriptError::Hex(err) => Some(err),
            ScriptError::Cbor(err) => Some(err),
            ScriptError::Decode(err) => Some(err),
            ScriptError::Encode(err) => Some(err),
            ScriptError::Params(err) => Some(err.as_ref()),
            ScriptError::TooManyLayers
            | ScriptError::UnsupportedScriptType(_)
            | ScriptError::NotPlutus(_) => None,
        }
    }
}

impl From<HexConvError> for ScriptError {
    fn from(err: HexConvError) -> Self {
        Self::Hex(err)
    }
}

impl From<CborError> for ScriptError {
    fn from(err: CborError) -> Self {
        Self::Cbor(err)
    }
}

impl From<DecodeError> for ScriptError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(err)
    }
}

impl From<EncodeError> for ScriptError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

/// Strips up to [`MAX_WRAPPER_LAYERS`] CBOR byte-string layers from `bytes`.
///
/// Input that is not a CBOR byte string spanning the whole buffer is
/// returned unchanged, so raw Flat passes through.
///
/// # Errors
///
/// Returns [`ScriptError::TooManyLayers`] if a third layer is present.
pub fn unwrap_cbor(bytes: &[u8]) -> Result<Vec<u8>, ScriptError> {
    let mut payload = bytes.to_vec();
    for _layer in 0..MAX_WRAPPER_LAYERS {
        match cbor::exact_bytestring(&payload) {
            Some(inner) => {
                trace!(layer = _layer + 1, bytes = inner.len(), "stripped CBOR byte string");
                payload = inner;
            }
            None => return Ok(payload),
        }
    }
    if cbor::exact_bytestring(&payload).is_some() {
        debug!("refusing third CBOR wrapper layer");
        return Err(ScriptError::TooManyLayers);
    }
    Ok(payload)
}

/// A script body tagged with its language
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    script_type: ScriptType,
    bytes: Vec<u8>,
}

impl Script {
    /// Constructs a script from its unwrapped body: raw Flat for Plutus
    /// scripts, native CBOR for native ones.
    #[must_use]
    pub fn new(script_type: ScriptType, bytes: Vec<u8>) -> Self {
        Self { script_type, bytes }
    }

    #[must_use]
    pub fn script_type(&self) -> ScriptType {
        self.script_type
    }

    /// Returns the unwrapped script body
    #[must_use]
    pub fn flat_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the on-chain CBOR form: one byte-string layer around Flat
    /// for Plutus scripts, the native CBOR itself otherwise.
    #[must_use]
    pub fn to_cbor(&self) -> Vec<u8> {
        if self.script_type.is_plutus() {
            cbor::wrap_bytestring(&self.bytes)
        } else {
            self.bytes.clone()
        }
    }

    #[must_use]
    pub fn to_cbor_hex(&self) -> String {
        hex_of_bytes(&self.to_cbor())
    }

    /// Decodes the Flat program of a Plutus script
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::NotPlutus`] for native scripts, or the
    /// decoding failure.
    pub fn program(&self) -> Result<Program, ScriptError> {
        if !self.script_type.is_plutus() {
            return Err(ScriptError::NotPlutus(self.script_type));
        }
        Ok(decode_program(&self.bytes)?)
    }
}

/// Parses hex-encoded script CBOR into a [`Script`] of the given type.
///
/// # Errors
///
/// Fails on malformed hex, and for Plutus scripts on more than
/// [`MAX_WRAPPER_LAYERS`] wrapper layers. Native scripts must be a single
/// well-formed CBOR item.
pub fn cbor_to_script(hex: &str, script_type: ScriptType) -> Result<Script, ScriptError> {
    let bytes = bytes_of_hex(hex)?;
    let body = if script_type.is_plutus() {
        unwrap_cbor(&bytes)?
    } else {
        cbor::validate_item(&bytes)?;
        bytes
    };
    debug!(%script_type, bytes = body.len(), "parsed script");
    Ok(Script::new(script_type, body))
}
