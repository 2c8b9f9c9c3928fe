//! BER decoder

use adi_core::{Asn1Value, CodecError, CodecResult};
use num_bigint::{BigInt, Sign};

use crate::ber::MAX_DEPTH;
use crate::ber::types::{BerLength, BerTag, TagClass, UniversalTag};

/// Streaming BER decoder
///
/// Walks a borrowed input slice TLV-at-a-time: `peek` parses the tag at
/// the cursor without advancing, `read` decodes a primitive value, and
/// `enter`/`leave` descend into and climb out of constructed values. The
/// decoder keeps a stack of container end offsets so every header and
/// content read is bounds-checked against the innermost open container as
/// well as the input end.
///
/// The decoder never copies or mutates the input; `start` may be called at
/// any time to begin a new session, including after an error.
///
/// # Usage Example
///
/// ```
/// use adi_asn1::BerDecoder;
///
/// let data = [0x30, 0x03, 0x02, 0x01, 0x05];
/// let mut decoder = BerDecoder::new();
/// decoder.start(&data);
/// decoder.enter()?;
/// let value = decoder.read()?;
/// decoder.leave()?;
/// assert!(decoder.peek()?.is_none());
/// # Ok::<(), adi_core::CodecError>(())
/// ```
pub struct BerDecoder<'a> {
    input: Option<&'a [u8]>,
    cursor: usize,
    stack: Vec<usize>,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder with no input attached
    pub fn new() -> Self {
        Self {
            input: None,
            cursor: 0,
            stack: Vec::new(),
        }
    }

    /// Begin decoding the given buffer, discarding any previous state
    pub fn start(&mut self, input: &'a [u8]) {
        self.input = Some(input);
        self.cursor = 0;
        self.stack.clear();
    }

    /// Cursor offset into the input
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bytes left before the end of the innermost open container
    pub fn remaining(&self) -> usize {
        match self.input {
            Some(input) => self.frame_end(input).saturating_sub(self.cursor),
            None => 0,
        }
    }

    /// Nesting depth of currently open containers
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Parse the tag at the cursor without advancing
    ///
    /// Returns `None` when the cursor sits at the end of the innermost open
    /// container, or at the end of the input at top level. Repeated calls
    /// return the same result.
    ///
    /// # Errors
    /// Fails before `start` and on a truncated tag header.
    pub fn peek(&self) -> CodecResult<Option<BerTag>> {
        let input = self.checked_input()?;
        let end = self.frame_end(input);
        if self.cursor >= end {
            return Ok(None);
        }
        let (tag, _) = BerTag::decode(&input[self.cursor..end])?;
        Ok(Some(tag))
    }

    /// Decode the primitive TLV at the cursor and advance past it
    ///
    /// Content is interpreted by universal tag number: BOOLEAN decodes to
    /// the integer 1 or 0 (the convention the directory layers rely on),
    /// INTEGER and ENUMERATED to an arbitrary-precision integer,
    /// OCTET STRING to raw bytes, and NULL (empty content only) to the
    /// null value. Any other universal tag, and every non-universal class,
    /// is handed back as raw content bytes.
    ///
    /// # Errors
    /// Fails before `start`, at the end of a container, on a constructed
    /// TLV, on truncated input, and on non-minimal integer content.
    pub fn read(&mut self) -> CodecResult<Asn1Value> {
        let input = self.checked_input()?;
        let end = self.frame_end(input);
        let (tag, header_len, content_len) = self.parse_header(input, end)?;
        if tag.is_constructed() {
            return Err(CodecError::new("read on a constructed value, use enter"));
        }
        let content_start = self.cursor + header_len;
        let content = &input[content_start..content_start + content_len];
        let value = decode_primitive(&tag, content)?;
        self.cursor = content_start + content_len;
        Ok(value)
    }

    /// Descend into the constructed TLV at the cursor
    ///
    /// Pushes the container's content span and moves the cursor to its
    /// first child.
    ///
    /// # Errors
    /// Fails before `start`, at the end of a container, on a primitive
    /// TLV, when the container overruns its parent, and beyond
    /// [`MAX_DEPTH`].
    pub fn enter(&mut self) -> CodecResult<()> {
        let input = self.checked_input()?;
        let end = self.frame_end(input);
        let (tag, header_len, content_len) = self.parse_header(input, end)?;
        if !tag.is_constructed() {
            return Err(CodecError::new("enter on a primitive value, use read"));
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(CodecError::new("container nesting deeper than supported"));
        }
        let content_start = self.cursor + header_len;
        log::trace!(
            "enter container {:?}, content {} bytes",
            tag,
            content_len
        );
        self.stack.push(content_start + content_len);
        self.cursor = content_start;
        Ok(())
    }

    /// Climb out of the innermost container
    ///
    /// Requires every child to have been consumed: the cursor must sit
    /// exactly at the container's end.
    ///
    /// # Errors
    /// Fails before `start`, with no container open, and when children
    /// remain unread.
    pub fn leave(&mut self) -> CodecResult<()> {
        self.checked_input()?;
        let end = *self
            .stack
            .last()
            .ok_or_else(|| CodecError::new("leave without a matching enter"))?;
        if self.cursor != end {
            return Err(CodecError::new(
                "leave before the container was fully consumed",
            ));
        }
        self.stack.pop();
        log::trace!("leave container at offset {}", end);
        Ok(())
    }

    fn checked_input(&self) -> CodecResult<&'a [u8]> {
        self.input
            .ok_or_else(|| CodecError::new("decoder used before start"))
    }

    /// End offset of the innermost open container, or of the whole input
    fn frame_end(&self, input: &[u8]) -> usize {
        self.stack.last().copied().unwrap_or(input.len())
    }

    /// Parse the TLV header at the cursor, bounds-checking every field
    /// against both the input end and the innermost container end.
    ///
    /// Returns the tag, the header length, and the content length.
    fn parse_header(
        &self,
        input: &'a [u8],
        end: usize,
    ) -> CodecResult<(BerTag, usize, usize)> {
        if self.cursor >= end {
            return Err(CodecError::new("no value at the current position"));
        }
        let window = &input[self.cursor..end];
        let (tag, tag_len) = BerTag::decode(window)?;
        let (length, len_len) = BerLength::decode(&window[tag_len..])?;
        let header_len = tag_len + len_len;
        let content_len = length.value();
        if content_len > window.len() - header_len {
            let avail_input = input.len() - (self.cursor + header_len);
            return Err(if content_len > avail_input {
                CodecError::new("input ended inside value content")
            } else {
                CodecError::new("child value overruns its enclosing container")
            });
        }
        Ok((tag, header_len, content_len))
    }
}

impl Default for BerDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode primitive content according to the universal tag number
fn decode_primitive(tag: &BerTag, content: &[u8]) -> CodecResult<Asn1Value> {
    if tag.class() != TagClass::Universal {
        return Ok(Asn1Value::OctetString(content.to_vec()));
    }
    match UniversalTag::from_number(tag.number()) {
        Some(UniversalTag::Boolean) => {
            let n = decode_integer(content)?;
            let bit = if n.sign() == Sign::NoSign { 0u8 } else { 1u8 };
            Ok(Asn1Value::Integer(BigInt::from(bit)))
        }
        Some(UniversalTag::Integer) | Some(UniversalTag::Enumerated) => {
            Ok(Asn1Value::Integer(decode_integer(content)?))
        }
        Some(UniversalTag::OctetString) => Ok(Asn1Value::OctetString(content.to_vec())),
        Some(UniversalTag::Null) => {
            if !content.is_empty() {
                return Err(CodecError::new("null value with non-empty content"));
            }
            Ok(Asn1Value::Null)
        }
        // Unknown universal tags are handed back uninterpreted
        _ => Ok(Asn1Value::OctetString(content.to_vec())),
    }
}

/// Decode two's-complement integer content, rejecting redundant sign bytes
fn decode_integer(content: &[u8]) -> CodecResult<BigInt> {
    if content.is_empty() {
        return Err(CodecError::new("integer with empty content"));
    }
    if content.len() >= 2 {
        if content[0] == 0x00 && content[1] & 0x80 == 0 {
            return Err(CodecError::new(
                "non-minimal integer: redundant leading zero byte",
            ));
        }
        if content[0] == 0xff && content[1] & 0x80 != 0 {
            return Err(CodecError::new(
                "non-minimal integer: redundant leading sign byte",
            ));
        }
    }
    Ok(BigInt::from_signed_bytes_be(content))
}
