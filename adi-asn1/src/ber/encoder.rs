//! BER encoder

use adi_core::{Asn1Value, CodecError, CodecResult};
use bytes::{Bytes, BytesMut};
use num_bigint::{BigInt, Sign};

use crate::ber::MAX_DEPTH;
use crate::ber::types::{BerLength, BerTag, TagClass, UniversalTag};

/// An open constructed container: its tag and the buffer offset at which
/// its body begins.
#[derive(Debug)]
struct Frame {
    tag: BerTag,
    body_start: usize,
}

/// Streaming BER encoder
///
/// Composes a byte buffer from a series of `write` calls bracketed by
/// `enter`/`leave`. Children are appended first; closing a container with
/// `leave` wraps the accumulated body with the container's tag and length,
/// so lengths never have to be known up front.
///
/// A session runs from `start` to `output`. Every `enter` must be matched
/// by a `leave` before `output` succeeds.
///
/// # Usage Example
///
/// ```
/// use adi_asn1::{BerEncoder, UniversalTag};
///
/// let mut encoder = BerEncoder::new();
/// encoder.start();
/// encoder.enter(UniversalTag::Sequence)?;
/// encoder.write(1i64)?;
/// encoder.write("foo")?;
/// encoder.leave()?;
/// let bytes = encoder.output()?;
/// # Ok::<(), adi_core::CodecError>(())
/// ```
pub struct BerEncoder {
    buffer: BytesMut,
    stack: Vec<Frame>,
    started: bool,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            stack: Vec::new(),
            started: false,
        }
    }

    /// Create a new BER encoder with initial buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            stack: Vec::new(),
            started: false,
        }
    }

    /// Begin a new encoding session, discarding any previous state
    ///
    /// May be called at any time, including after an error.
    pub fn start(&mut self) {
        self.buffer.clear();
        self.stack.clear();
        self.started = true;
    }

    /// Nesting depth of currently open containers
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Write one primitive TLV, inferring the tag from the value
    ///
    /// Boolean maps to BOOLEAN, integer to INTEGER, byte string to
    /// OCTET STRING, and the unit value to NULL. The TLV is appended to the
    /// innermost open container, or to the top level if none is open.
    ///
    /// # Errors
    /// Fails when no session is active.
    pub fn write<V: Into<Asn1Value>>(&mut self, value: V) -> CodecResult<()> {
        let value = value.into();
        let tag = match &value {
            Asn1Value::Null => UniversalTag::Null,
            Asn1Value::Boolean(_) => UniversalTag::Boolean,
            Asn1Value::Integer(_) => UniversalTag::Integer,
            Asn1Value::OctetString(_) => UniversalTag::OctetString,
        };
        self.write_value(tag, &value)
    }

    /// Write one primitive TLV under an explicit universal tag
    ///
    /// The tag picks the content rules: under [`UniversalTag::Enumerated`]
    /// an integer is encoded with integer content rules and tag 10; under
    /// [`UniversalTag::Boolean`] the content octet is `0xFF` for true and
    /// `0x00` for false.
    ///
    /// # Errors
    /// Fails when no session is active or when the value cannot be encoded
    /// under the requested tag.
    pub fn write_tagged<V: Into<Asn1Value>>(
        &mut self,
        value: V,
        tag: UniversalTag,
    ) -> CodecResult<()> {
        let value = value.into();
        self.write_value(tag, &value)
    }

    /// Open a Universal-class constructed container
    ///
    /// Pass [`UniversalTag::Sequence`], [`UniversalTag::Set`], or a raw tag
    /// number.
    ///
    /// # Errors
    /// Fails when no session is active or nesting exceeds [`MAX_DEPTH`].
    pub fn enter(&mut self, number: impl Into<u32>) -> CodecResult<()> {
        self.enter_class(number, TagClass::Universal)
    }

    /// Open a constructed container with an explicit tag class
    ///
    /// # Errors
    /// Fails when no session is active or nesting exceeds [`MAX_DEPTH`].
    pub fn enter_class(&mut self, number: impl Into<u32>, class: TagClass) -> CodecResult<()> {
        self.check_started()?;
        if self.stack.len() >= MAX_DEPTH {
            return Err(CodecError::new("container nesting deeper than supported"));
        }
        let tag = BerTag::new(class, true, number.into());
        log::trace!("open container {:?}", tag);
        self.stack.push(Frame {
            tag,
            body_start: self.buffer.len(),
        });
        Ok(())
    }

    /// Close the innermost container
    ///
    /// Splits the body accumulated since the matching `enter` off the
    /// buffer and re-appends it behind the container's tag and length.
    ///
    /// # Errors
    /// Fails when no session is active or no container is open.
    pub fn leave(&mut self) -> CodecResult<()> {
        self.check_started()?;
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| CodecError::new("leave without a matching enter"))?;
        let body = self.buffer.split_off(frame.body_start);
        log::trace!("close container {:?}, body {} bytes", frame.tag, body.len());
        self.buffer.extend_from_slice(&frame.tag.encode());
        self.buffer
            .extend_from_slice(&BerLength::new(body.len()).encode());
        self.buffer.extend_from_slice(&body);
        Ok(())
    }

    /// Finish the session and return the encoded buffer
    ///
    /// # Errors
    /// Fails when no session is active, a container is still open, or
    /// nothing was written.
    pub fn output(&mut self) -> CodecResult<Bytes> {
        self.check_started()?;
        if !self.stack.is_empty() {
            return Err(CodecError::new("output with containers still open"));
        }
        if self.buffer.is_empty() {
            return Err(CodecError::new("output before anything was written"));
        }
        self.started = false;
        Ok(self.buffer.split().freeze())
    }

    fn check_started(&self) -> CodecResult<()> {
        if self.started {
            Ok(())
        } else {
            Err(CodecError::new("encoder used before start"))
        }
    }

    fn write_value(&mut self, tag: UniversalTag, value: &Asn1Value) -> CodecResult<()> {
        self.check_started()?;
        let content = encode_content(tag, value)?;
        self.buffer
            .extend_from_slice(&BerTag::universal(false, tag.number()).encode());
        self.buffer
            .extend_from_slice(&BerLength::new(content.len()).encode());
        self.buffer.extend_from_slice(&content);
        Ok(())
    }
}

impl Default for BerEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode primitive content under the rules of the given universal tag
fn encode_content(tag: UniversalTag, value: &Asn1Value) -> CodecResult<Vec<u8>> {
    match tag {
        UniversalTag::Boolean => {
            let truthy = match value {
                Asn1Value::Boolean(b) => *b,
                Asn1Value::Integer(n) => n.sign() != Sign::NoSign,
                _ => return Err(CodecError::new("boolean tag needs a boolean value")),
            };
            Ok(vec![if truthy { 0xff } else { 0x00 }])
        }
        UniversalTag::Integer | UniversalTag::Enumerated => {
            let content = match value {
                Asn1Value::Integer(n) => n.to_signed_bytes_be(),
                Asn1Value::Boolean(b) => BigInt::from(*b as u8).to_signed_bytes_be(),
                _ => return Err(CodecError::new("integer tag needs an integer value")),
            };
            Ok(content)
        }
        UniversalTag::OctetString => match value {
            Asn1Value::OctetString(bytes) => Ok(bytes.clone()),
            _ => Err(CodecError::new("octet string tag needs a byte string value")),
        },
        UniversalTag::Null => match value {
            Asn1Value::Null => Ok(Vec::new()),
            _ => Err(CodecError::new("null tag carries no value")),
        },
        UniversalTag::Sequence | UniversalTag::Set => Err(CodecError::new(
            "constructed tag passed to write, use enter",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(f: impl FnOnce(&mut BerEncoder) -> CodecResult<()>) -> Vec<u8> {
        let mut encoder = BerEncoder::new();
        encoder.start();
        f(&mut encoder).unwrap();
        encoder.output().unwrap().to_vec()
    }

    #[test]
    fn test_boolean() {
        let bytes = encoded(|enc| enc.write(true));
        assert_eq!(bytes, vec![0x01, 0x01, 0xff]);
        let bytes = encoded(|enc| enc.write(false));
        assert_eq!(bytes, vec![0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_integer() {
        let bytes = encoded(|enc| enc.write(1i64));
        assert_eq!(bytes, vec![0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_long_integer() {
        let n = BigInt::parse_bytes(b"0102030405060708090a0b0c0d0e0f", 16).unwrap();
        let bytes = encoded(|enc| enc.write(n.clone()));
        assert_eq!(
            bytes,
            vec![
                0x02, 0x0f, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b,
                0x0c, 0x0d, 0x0e, 0x0f
            ]
        );
    }

    #[test]
    fn test_negative_integer() {
        let bytes = encoded(|enc| enc.write(-1i64));
        assert_eq!(bytes, vec![0x02, 0x01, 0xff]);
    }

    #[test]
    fn test_long_negative_integer() {
        let n = -BigInt::parse_bytes(b"0102030405060708090a0b0c0d0e0f", 16).unwrap();
        let bytes = encoded(|enc| enc.write(n));
        assert_eq!(
            bytes,
            vec![
                0x02, 0x0f, 0xfe, 0xfd, 0xfc, 0xfb, 0xfa, 0xf9, 0xf8, 0xf7, 0xf6, 0xf5, 0xf4,
                0xf3, 0xf2, 0xf1, 0xf1
            ]
        );
    }

    #[test]
    fn test_twos_complement_boundaries() {
        assert_eq!(encoded(|enc| enc.write(0i64)), vec![0x02, 0x01, 0x00]);
        assert_eq!(encoded(|enc| enc.write(127i64)), vec![0x02, 0x01, 0x7f]);
        assert_eq!(
            encoded(|enc| enc.write(128i64)),
            vec![0x02, 0x02, 0x00, 0x80]
        );
        assert_eq!(encoded(|enc| enc.write(-128i64)), vec![0x02, 0x01, 0x80]);
        assert_eq!(
            encoded(|enc| enc.write(-129i64)),
            vec![0x02, 0x02, 0xff, 0x7f]
        );
    }

    #[test]
    fn test_octet_string() {
        let bytes = encoded(|enc| enc.write("foo"));
        assert_eq!(bytes, vec![0x04, 0x03, b'f', b'o', b'o']);
    }

    #[test]
    fn test_null() {
        let bytes = encoded(|enc| enc.write(()));
        assert_eq!(bytes, vec![0x05, 0x00]);
    }

    #[test]
    fn test_enumerated() {
        let bytes = encoded(|enc| enc.write_tagged(1i64, UniversalTag::Enumerated));
        assert_eq!(bytes, vec![0x0a, 0x01, 0x01]);
    }

    #[test]
    fn test_explicit_boolean_tag() {
        // A non-zero integer under the BOOLEAN tag still encodes as 0xff
        let bytes = encoded(|enc| enc.write_tagged(5i64, UniversalTag::Boolean));
        assert_eq!(bytes, vec![0x01, 0x01, 0xff]);
    }

    #[test]
    fn test_sequence() {
        let bytes = encoded(|enc| {
            enc.enter(UniversalTag::Sequence)?;
            enc.write(1i64)?;
            enc.write("foo")?;
            enc.leave()
        });
        assert_eq!(
            bytes,
            vec![0x30, 0x08, 0x02, 0x01, 0x01, 0x04, 0x03, b'f', b'o', b'o']
        );
    }

    #[test]
    fn test_sequence_of() {
        let bytes = encoded(|enc| {
            enc.enter(UniversalTag::Sequence)?;
            enc.write(1i64)?;
            enc.write(2i64)?;
            enc.leave()
        });
        assert_eq!(bytes, vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
    }

    #[test]
    fn test_set() {
        let bytes = encoded(|enc| {
            enc.enter(UniversalTag::Set)?;
            enc.write(1i64)?;
            enc.write("foo")?;
            enc.leave()
        });
        assert_eq!(
            bytes,
            vec![0x31, 0x08, 0x02, 0x01, 0x01, 0x04, 0x03, b'f', b'o', b'o']
        );
    }

    #[test]
    fn test_context_class() {
        let bytes = encoded(|enc| {
            enc.enter_class(1u32, TagClass::Context)?;
            enc.write(1i64)?;
            enc.leave()
        });
        assert_eq!(bytes, vec![0xa1, 0x03, 0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_application_class() {
        let bytes = encoded(|enc| {
            enc.enter_class(1u32, TagClass::Application)?;
            enc.write(1i64)?;
            enc.leave()
        });
        assert_eq!(bytes, vec![0x61, 0x03, 0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_private_class() {
        let bytes = encoded(|enc| {
            enc.enter_class(1u32, TagClass::Private)?;
            enc.write(1i64)?;
            enc.leave()
        });
        assert_eq!(bytes, vec![0xe1, 0x03, 0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_long_tag_number() {
        let bytes = encoded(|enc| {
            enc.enter(0xffffu32)?;
            enc.write(1i64)?;
            enc.leave()
        });
        assert_eq!(bytes, vec![0x3f, 0x83, 0xff, 0x7f, 0x03, 0x02, 0x01, 0x01]);
    }

    #[test]
    fn test_long_length() {
        let payload = vec![b'x'; 0xffff];
        let bytes = encoded(|enc| enc.write(payload.clone()));
        assert_eq!(&bytes[..4], &[0x04, 0x82, 0xff, 0xff]);
        assert_eq!(&bytes[4..], &payload[..]);
    }

    #[test]
    fn test_nested_containers() {
        let bytes = encoded(|enc| {
            enc.enter(UniversalTag::Sequence)?;
            enc.enter(UniversalTag::Set)?;
            enc.write(7i64)?;
            enc.leave()?;
            enc.write(())?;
            enc.leave()
        });
        assert_eq!(
            bytes,
            vec![0x30, 0x07, 0x31, 0x03, 0x02, 0x01, 0x07, 0x05, 0x00]
        );
    }

    #[test]
    fn test_error_before_start() {
        let mut enc = BerEncoder::new();
        assert!(enc.write(1i64).is_err());
        assert!(enc.enter(UniversalTag::Sequence).is_err());
        assert!(enc.leave().is_err());
        assert!(enc.output().is_err());
    }

    #[test]
    fn test_error_stack() {
        let mut enc = BerEncoder::new();
        enc.start();
        assert!(enc.leave().is_err());
        enc.enter(UniversalTag::Sequence).unwrap();
        enc.write(1i64).unwrap();
        assert!(enc.output().is_err());
        enc.leave().unwrap();
        enc.output().unwrap();
        assert!(enc.leave().is_err());
    }

    #[test]
    fn test_error_empty_output() {
        let mut enc = BerEncoder::new();
        enc.start();
        assert!(enc.output().is_err());
    }

    #[test]
    fn test_depth_limit() {
        let mut enc = BerEncoder::new();
        enc.start();
        for _ in 0..MAX_DEPTH {
            enc.enter(UniversalTag::Sequence).unwrap();
        }
        assert!(enc.enter(UniversalTag::Sequence).is_err());
    }

    #[test]
    fn test_start_resets_after_error() {
        let mut enc = BerEncoder::new();
        enc.start();
        enc.enter(UniversalTag::Sequence).unwrap();
        assert!(enc.output().is_err());
        enc.start();
        enc.write(1i64).unwrap();
        assert_eq!(enc.output().unwrap().to_vec(), vec![0x02, 0x01, 0x01]);
        assert_eq!(enc.depth(), 0);
    }
}
