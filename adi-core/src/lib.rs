//! Core types and utilities for the ADI directory integration stack
//!
//! This crate provides the fundamental types, error handling, and value
//! model used throughout the directory integration implementation.

pub mod datatypes;
pub mod error;

pub use datatypes::{Asn1Value, Asn1ValueKind};
pub use error::{CodecError, CodecResult};
