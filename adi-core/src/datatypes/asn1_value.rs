//! Value model for ASN.1 primitives

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Container class holding a decoded ASN.1 primitive, or a value to encode
///
/// Integers are arbitrary precision; the wire format is two's complement
/// with no native word-size limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asn1Value {
    /// Null data (no content)
    Null,
    /// Boolean value
    Boolean(bool),
    /// Arbitrary-precision signed integer
    Integer(BigInt),
    /// Octet string
    OctetString(#[serde(with = "serde_bytes")] Vec<u8>),
}

/// Type enumeration for Asn1Value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asn1ValueKind {
    /// Null
    Null,
    /// Boolean
    Boolean,
    /// Integer
    Integer,
    /// Octet string
    OctetString,
}

impl Asn1Value {
    /// Get the kind of this value
    pub fn kind(&self) -> Asn1ValueKind {
        match self {
            Asn1Value::Null => Asn1ValueKind::Null,
            Asn1Value::Boolean(_) => Asn1ValueKind::Boolean,
            Asn1Value::Integer(_) => Asn1ValueKind::Integer,
            Asn1Value::OctetString(_) => Asn1ValueKind::OctetString,
        }
    }

    /// Constructs a null value
    pub fn new_null() -> Self {
        Asn1Value::Null
    }

    /// Constructs a boolean value
    pub fn new_bool(value: bool) -> Self {
        Asn1Value::Boolean(value)
    }

    /// Constructs an integer value
    pub fn new_integer(value: impl Into<BigInt>) -> Self {
        Asn1Value::Integer(value.into())
    }

    /// Constructs an octet string value
    pub fn new_octet_string(bytes: Vec<u8>) -> Self {
        Asn1Value::OctetString(bytes)
    }

    /// True when this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Asn1Value::Null)
    }

    /// The integer payload, if this value is an integer
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Asn1Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// The byte payload, if this value is an octet string
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Asn1Value::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The boolean payload, if this value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Asn1Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Asn1Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asn1Value::Null => write!(f, "NULL"),
            Asn1Value::Boolean(b) => write!(f, "{}", b),
            Asn1Value::Integer(n) => write!(f, "{}", n),
            Asn1Value::OctetString(bytes) => {
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

impl From<()> for Asn1Value {
    fn from(_: ()) -> Self {
        Asn1Value::Null
    }
}

impl From<bool> for Asn1Value {
    fn from(value: bool) -> Self {
        Asn1Value::Boolean(value)
    }
}

impl From<BigInt> for Asn1Value {
    fn from(value: BigInt) -> Self {
        Asn1Value::Integer(value)
    }
}

impl From<i32> for Asn1Value {
    fn from(value: i32) -> Self {
        Asn1Value::Integer(BigInt::from(value))
    }
}

impl From<i64> for Asn1Value {
    fn from(value: i64) -> Self {
        Asn1Value::Integer(BigInt::from(value))
    }
}

impl From<i128> for Asn1Value {
    fn from(value: i128) -> Self {
        Asn1Value::Integer(BigInt::from(value))
    }
}

impl From<u64> for Asn1Value {
    fn from(value: u64) -> Self {
        Asn1Value::Integer(BigInt::from(value))
    }
}

impl From<Vec<u8>> for Asn1Value {
    fn from(bytes: Vec<u8>) -> Self {
        Asn1Value::OctetString(bytes)
    }
}

impl From<&[u8]> for Asn1Value {
    fn from(bytes: &[u8]) -> Self {
        Asn1Value::OctetString(bytes.to_vec())
    }
}

impl From<&str> for Asn1Value {
    fn from(text: &str) -> Self {
        Asn1Value::OctetString(text.as_bytes().to_vec())
    }
}
