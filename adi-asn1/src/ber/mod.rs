//! BER (Basic Encoding Rules) encoder and decoder for ASN.1
//!
//! Every ASN.1 value is framed as a TLV (Tag-Length-Value) triplet:
//!
//! ```text
//! [Tag] [Length] [Value]
//! ```
//!
//! ## Tag encoding
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       C C P T T T T T
//! ```
//!
//! - CC = class (00=Universal, 01=Application, 10=Context, 11=Private)
//! - P = primitive (0) or constructed (1)
//! - TTTTT = tag number 0-30, or 11111 to announce a multi-byte tag number
//!   carried in the following bytes as a base-128 big-endian varint with the
//!   continuation bit set on every byte except the last
//!
//! ## Length encoding
//!
//! - Short form (1 byte, bit 8 clear): lengths 0-127
//! - Long form: leader byte `0x80 | k`, then `k` big-endian length bytes.
//!   The indefinite form (`k == 0`) is not supported; definite lengths only.
//!
//! ## Value encoding
//!
//! Primitive values carry raw content bytes; constructed values carry a
//! concatenation of child TLVs. Integers are minimal two's complement:
//! a redundant leading `0x00` or `0xFF` sign byte is rejected on decode.
//!
//! The [`BerEncoder`] composes a buffer from `write` calls bracketed by
//! `enter`/`leave`; the [`BerDecoder`] walks an input slice via
//! `peek`/`read`/`enter`/`leave`. Both keep an explicit stack of open
//! containers so container lengths can be computed or validated once the
//! body is known.

pub mod decoder;
pub mod encoder;
pub mod types;

pub use decoder::BerDecoder;
pub use encoder::BerEncoder;
pub use types::{BerLength, BerTag, TagClass, UniversalTag};

/// Maximum container nesting accepted by both builders
pub const MAX_DEPTH: usize = 128;
