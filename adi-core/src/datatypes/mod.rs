//! Data types used by the ASN.1 layer of the directory stack

pub mod asn1_value;

pub use asn1_value::{Asn1Value, Asn1ValueKind};
