//! ASN.1 processing for the ADI directory integration stack
//!
//! This crate provides the BER (Basic Encoding Rules) subset needed to talk
//! the LDAP and Kerberos wire protocols: boolean, integer, octet string,
//! null, enumerated, sequence and set, and tagged values in all four tag
//! classes, with multi-byte tag numbers and long-form lengths.

pub mod ber;

pub use ber::{BerDecoder, BerEncoder, BerLength, BerTag, TagClass, UniversalTag};
