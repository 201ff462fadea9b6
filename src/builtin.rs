//! Catalog of builtin functions
//!
//! On the wire a builtin is a seven-bit index into this catalog. The order
//! is fixed by the ledger: entries are only ever appended, and any
//! reordering silently changes the meaning of every deployed script.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use lazy_static::lazy_static;

/// Width of a builtin index on the wire
pub const BUILTIN_TAG_WIDTH: u8 = 7;

macro_rules! builtins {
    ( $( $variant:ident => $name:literal ),* $(,)? ) => {
        /// Builtin function, in catalog order
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
        #[repr(u8)]
        #[allow(non_camel_case_types)]
        pub enum BuiltinFunction {
            $( $variant ),*
        }

        impl BuiltinFunction {
            /// Every builtin, indexed by its wire index
            pub const ALL: &'static [BuiltinFunction] = &[ $( BuiltinFunction::$variant ),* ];

            /// Returns the textual Plutus Core name of the builtin
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( BuiltinFunction::$variant => $name ),*
                }
            }
        }
    };
}

builtins! {
    AddInteger => "addInteger",
    SubtractInteger => "subtractInteger",
    MultiplyInteger => "multiplyInteger",
    DivideInteger => "divideInteger",
    QuotientInteger => "quotientInteger",
    RemainderInteger => "remainderInteger",
    ModInteger => "modInteger",
    EqualsInteger => "equalsInteger",
    LessThanInteger => "lessThanInteger",
    LessThanEqualsInteger => "lessThanEqualsInteger",
    AppendByteString => "appendByteString",
    ConsByteString => "consByteString",
    SliceByteString => "sliceByteString",
    LengthOfByteString => "lengthOfByteString",
    IndexByteString => "indexByteString",
    EqualsByteString => "equalsByteString",
    LessThanByteString => "lessThanByteString",
    LessThanEqualsByteString => "lessThanEqualsByteString",
    Sha2_256 => "sha2_256",
    Sha3_256 => "sha3_256",
    Blake2b_256 => "blake2b_256",
    VerifyEd25519Signature => "verifyEd25519Signature",
    AppendString => "appendString",
    EqualsString => "equalsString",
    EncodeUtf8 => "encodeUtf8",
    DecodeUtf8 => "decodeUtf8",
    IfThenElse => "ifThenElse",
    ChooseUnit => "chooseUnit",
    Trace => "trace",
    FstPair => "fstPair",
    SndPair => "sndPair",
    ChooseList => "chooseList",
    MkCons => "mkCons",
    HeadList => "headList",
    TailList => "tailList",
    NullList => "nullList",
    ChooseData => "chooseData",
    ConstrData => "constrData",
    MapData => "mapData",
    ListData => "listData",
    IData => "iData",
    BData => "bData",
    UnConstrData => "unConstrData",
    UnMapData => "unMapData",
    UnListData => "unListData",
    UnIData => "unIData",
    UnBData => "unBData",
    EqualsData => "equalsData",
    MkPairData => "mkPairData",
    MkNilData => "mkNilData",
    MkNilPairData => "mkNilPairData",
    SerialiseData => "serialiseData",
    VerifyEcdsaSecp256k1Signature => "verifyEcdsaSecp256k1Signature",
    VerifySchnorrSecp256k1Signature => "verifySchnorrSecp256k1Signature",
    Bls12_381_G1_Add => "bls12_381_G1_add",
    Bls12_381_G1_Neg => "bls12_381_G1_neg",
    Bls12_381_G1_ScalarMul => "bls12_381_G1_scalarMul",
    Bls12_381_G1_Equal => "bls12_381_G1_equal",
    Bls12_381_G1_Compress => "bls12_381_G1_compress",
    Bls12_381_G1_Uncompress => "bls12_381_G1_uncompress",
    Bls12_381_G1_HashToGroup => "bls12_381_G1_hashToGroup",
    Bls12_381_G2_Add => "bls12_381_G2_add",
    Bls12_381_G2_Neg => "bls12_381_G2_neg",
    Bls12_381_G2_ScalarMul => "bls12_381_G2_scalarMul",
    Bls12_381_G2_Equal => "bls12_381_G2_equal",
    Bls12_381_G2_Compress => "bls12_381_G2_compress",
    Bls12_381_G2_Uncompress => "bls12_381_G2_uncompress",
    Bls12_381_G2_HashToGroup => "bls12_381_G2_hashToGroup",
    Bls12_381_MillerLoop => "bls12_381_millerLoop",
    Bls12_381_MulMlResult => "bls12_381_mulMlResult",
    Bls12_381_FinalVerify => "bls12_381_finalVerify",
    Keccak_256 => "keccak_256",
    Blake2b_224 => "blake2b_224",
    IntegerToByteString => "integerToByteString",
    ByteStringToInteger => "byteStringToInteger",
    AndByteString => "andByteString",
    OrByteString => "orByteString",
    XorByteString => "xorByteString",
    ComplementByteString => "complementByteString",
    ReadBit => "readBit",
    WriteBits => "writeBits",
    ReplicateByte => "replicateByte",
    ShiftByteString => "shiftByteString",
    RotateByteString => "rotateByteString",
    CountSetBits => "countSetBits",
    FindFirstSetBit => "findFirstSetBit",
    Ripemd_160 => "ripemd_160",
}

lazy_static! {
    static ref BY_NAME: HashMap<&'static str, BuiltinFunction> = BuiltinFunction::ALL
        .iter()
        .map(|&f| (f.name(), f))
        .collect();
}

impl BuiltinFunction {
    /// Returns the wire index of the builtin
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a builtin by wire index, returning `None` past the end of
    /// the catalog.
    #[must_use]
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Number of entries in the catalog
    #[must_use]
    pub const fn count() -> usize {
        Self::ALL.len()
    }
}

impl Display for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for names absent from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBuiltin(pub String);

impl Display for UnknownBuiltin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown builtin function `{}`", self.0)
    }
}

impl std::error::Error for UnknownBuiltin {}

impl FromStr for BuiltinFunction {
    type Err = UnknownBuiltin;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_NAME
            .get(s)
            .copied()
            .ok_or_else(|| UnknownBuiltin(s.to_owned()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const CATALOG: [&str; 87] = [
        "addInteger",
        "subtractInteger",
        "multiplyInteger",
        "divideInteger",
        "quotientInteger",
        "remainderInteger",
        "modInteger",
        "equalsInteger",
        "lessThanInteger",
        "lessThanEqualsInteger",
        "appendByteString",
        "consByteString",
        "sliceByteString",
        "lengthOfByteString",
        "indexByteString",
        "equalsByteString",
        "lessThanByteString",
        "lessThanEqualsByteString",
        "sha2_256",
        "sha3_256",
        "blake2b_256",
        "verifyEd25519Signature",
        "appendString",
        "equalsString",
        "encodeUtf8",
        "decodeUtf8",
        "ifThenElse",
        "chooseUnit",
        "trace",
        "fstPair",
        "sndPair",
        "chooseList",
        "mkCons",
        "headList",
        "tailList",
        "nullList",
        "chooseData",
        "constrData",
        "mapData",
        "listData",
        "iData",
        "bData",
        "unConstrData",
        "unMapData",
        "unListData",
        "unIData",
        "unBData",
        "equalsData",
        "mkPairData",
        "mkNilData",
        "mkNilPairData",
        "serialiseData",
        "verifyEcdsaSecp256k1Signature",
        "verifySchnorrSecp256k1Signature",
        "bls12_381_G1_add",
        "bls12_381_G1_neg",
        "bls12_381_G1_scalarMul",
        "bls12_381_G1_equal",
        "bls12_381_G1_compress",
        "bls12_381_G1_uncompress",
        "bls12_381_G1_hashToGroup",
        "bls12_381_G2_add",
        "bls12_381_G2_neg",
        "bls12_381_G2_scalarMul",
        "bls12_381_G2_equal",
        "bls12_381_G2_compress",
        "bls12_381_G2_uncompress",
        "bls12_381_G2_hashToGroup",
        "bls12_381_millerLoop",
        "bls12_381_mulMlResult",
        "bls12_381_finalVerify",
        "keccak_256",
        "blake2b_224",
        "integerToByteString",
        "byteStringToInteger",
        "andByteString",
        "orByteString",
        "xorByteString",
        "complementByteString",
        "readBit",
        "writeBits",
        "replicateByte",
        "shiftByteString",
        "rotateByteString",
        "countSetBits",
        "findFirstSetBit",
        "ripemd_160",
    ];

    #[test]
    fn catalog_order_is_pinned() {
        assert_eq!(BuiltinFunction::count(), CATALOG.len());
        for (ix, (&f, &name)) in BuiltinFunction::ALL.iter().zip(CATALOG.iter()).enumerate() {
            assert_eq!(f.index() as usize, ix);
            assert_eq!(f.name(), name, "index {ix}");
        }
    }

    #[test]
    fn index_lookup() {
        assert_eq!(BuiltinFunction::from_index(0), Some(BuiltinFunction::AddInteger));
        assert_eq!(
            BuiltinFunction::from_index(14),
            Some(BuiltinFunction::IndexByteString)
        );
        assert_eq!(BuiltinFunction::from_index(86), Some(BuiltinFunction::Ripemd_160));
        assert_eq!(BuiltinFunction::from_index(87), None);
        assert_eq!(BuiltinFunction::from_index(127), None);
    }

    #[test]
    fn every_index_fits_the_tag() {
        let max = BuiltinFunction::ALL.iter().map(|f| f.index()).max();
        assert!(max.map_or(false, |m| m < 1 << BUILTIN_TAG_WIDTH));
    }

    #[test]
    fn names_parse_back() {
        for &f in BuiltinFunction::ALL {
            assert_eq!(f.name().parse::<BuiltinFunction>(), Ok(f));
        }
        assert_eq!(
            "addInt".parse::<BuiltinFunction>(),
            Err(UnknownBuiltin("addInt".to_owned()))
        );
    }
}
