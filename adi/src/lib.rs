//! ADI - directory integration building blocks for Rust
//!
//! This library currently covers the ASN.1 BER codec shared by the LDAP
//! and Kerberos wire layers of the stack.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `adi-core`: Core types, error handling, and the ASN.1 value model
//! - `adi-asn1`: BER encoding/decoding
//!
//! Higher layers (directory client, Kerberos glue, NSS shim) feed values
//! into the encoder and consume values from the decoder; they never look
//! inside the byte buffers themselves.
//!
//! # Usage
//!
//! ```
//! use adi::asn1::{BerDecoder, BerEncoder, UniversalTag};
//! use adi::Asn1Value;
//!
//! let mut encoder = BerEncoder::new();
//! encoder.start();
//! encoder.enter(UniversalTag::Sequence)?;
//! encoder.write(128i64)?;
//! encoder.leave()?;
//! let bytes = encoder.output()?;
//!
//! let mut decoder = BerDecoder::new();
//! decoder.start(&bytes);
//! decoder.enter()?;
//! assert_eq!(decoder.read()?, Asn1Value::new_integer(128));
//! decoder.leave()?;
//! # Ok::<(), adi::CodecError>(())
//! ```

// Re-export core types
pub use adi_core::{Asn1Value, Asn1ValueKind, CodecError, CodecResult};

// Re-export the ASN.1 codec API
pub mod asn1 {
    pub use adi_asn1::*;
}
