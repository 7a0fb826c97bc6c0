//! Bit packing of variable-width codes.
//!
//! Codes are written most significant bit first, back to back, with no
//! alignment between them. The last code is followed by an end marker, the
//! all-ones value at the width the next code would have had, and the final byte
//! is padded with zero bits. No dictionary code is ever all ones at its own
//! width (see [`LzwConfig::code_limit`]), so the marker cannot be mistaken for
//! data, and a stream cut anywhere loses at least part of it.
//!
//! The widths themselves are never stored. The writer takes them from the
//! encoder and the reader asks the decoder for the width of each next code
//! before reading it.

use crate::compression::config::LzwConfig;
use crate::compression::decoder::Decoder;
use crate::compression::encoder::{CodeSink, Encoder};
use crate::compression::{Code, Result, StreamingCompression};
use crate::error::Error;
use bitvec::prelude::*;

/// End-of-stream marker for a stream whose next code would be `width` bits.
pub fn end_code(width: u8) -> Code {
    (1 << width) - 1
}

/// Accumulates codes as packed bits.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits buffered and not yet taken
    pub fn pending_bits(&self) -> usize {
        self.bits.len()
    }

    /// Removes and returns every complete byte written so far.
    pub fn take_bytes(&mut self) -> Vec<u8> {
        let whole = self.bits.len() / 8;
        let bytes = self.bits.as_raw_slice()[..whole].to_vec();
        self.bits = self.bits[whole * 8..].to_bitvec();
        bytes
    }

    /// Writes the end marker at `width` bits, then pads and returns every
    /// buffered byte.
    pub fn close(&mut self, width: u8) -> Vec<u8> {
        self.put_code(end_code(width), width);
        self.finish()
    }

    /// Pads the last partial byte with zeros and returns all buffered bytes.
    pub fn finish(&mut self) -> Vec<u8> {
        let padded = self.bits.len().div_ceil(8) * 8;
        self.bits.resize(padded, false);
        let bytes = self.bits.as_raw_slice().to_vec();
        self.bits.clear();
        bytes
    }
}

impl CodeSink for BitWriter {
    fn put_code(&mut self, code: Code, width: u8) {
        let start = self.bits.len();
        self.bits.resize(start + usize::from(width), false);
        self.bits[start..].store_be(code);
    }
}

/// Reads codes back out of packed bytes fed in arbitrary chunks.
#[derive(Debug, Clone, Default)]
pub struct BitReader {
    bits: BitVec<u8, Msb0>,
    /// Read position within `bits`
    pos: usize,
    /// Bits already dropped from the front of `bits`
    dropped: usize,
}

impl BitReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends more packed bytes.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.bits.extend_from_raw_slice(bytes);
    }

    /// Reads one `width`-bit code, or `None` if not enough bits are buffered.
    pub fn read(&mut self, width: u8) -> Option<Code> {
        let width = usize::from(width);
        if self.remaining_bits() < width {
            return None;
        }
        let code = self.bits[self.pos..self.pos + width].load_be::<Code>();
        self.pos += width;
        Some(code)
    }

    /// Buffered bits not read yet
    pub fn remaining_bits(&self) -> usize {
        self.bits.len() - self.pos
    }

    /// Offset, in bytes from the start of the stream, of the next unread bit.
    pub fn byte_offset(&self) -> usize {
        (self.dropped + self.pos) / 8
    }

    /// True if every unread bit is zero
    pub fn rest_is_zero(&self) -> bool {
        self.bits[self.pos..].not_any()
    }

    /// Releases fully consumed bytes.
    pub fn compact(&mut self) {
        let whole = self.pos / 8 * 8;
        if whole > 0 {
            self.bits = self.bits[whole..].to_bitvec();
            self.pos -= whole;
            self.dropped += whole;
        }
    }

    /// Forgets all buffered input and the stream position.
    pub fn clear(&mut self) {
        self.bits.clear();
        self.pos = 0;
        self.dropped = 0;
    }
}

/// Streaming encoder producing packed bytes.
///
/// [`process`](StreamingCompression::process) returns the bytes completed by
/// each chunk; [`finish`](StreamingCompression::finish) flushes the pending
/// match, the end marker and the padded last byte. Never fails.
#[derive(Debug, Clone)]
pub struct PackedEncoder {
    encoder: Encoder,
    writer: BitWriter,
}

impl PackedEncoder {
    pub fn new(config: LzwConfig) -> Self {
        PackedEncoder {
            encoder: Encoder::new(config),
            writer: BitWriter::new(),
        }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }
}

impl StreamingCompression for PackedEncoder {
    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        self.encoder.push(chunk, &mut self.writer);
        Ok(self.writer.take_bytes())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        self.encoder.finish(&mut self.writer);
        Ok(self.writer.close(self.encoder.next_code_width()))
    }
}

/// Streaming decoder consuming packed bytes.
///
/// Errors report the byte offset of the offending code within the packed
/// stream.
#[derive(Debug, Clone)]
pub struct PackedDecoder {
    decoder: Decoder,
    reader: BitReader,
    /// End marker seen; anything after it must be padding
    ended: bool,
}

impl PackedDecoder {
    pub fn new(config: LzwConfig) -> Self {
        PackedDecoder {
            decoder: Decoder::new(config),
            reader: BitReader::new(),
            ended: false,
        }
    }

    /// True once the end marker has been read
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }
}

impl StreamingCompression for PackedDecoder {
    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        self.reader.feed(chunk);

        let mut out = Vec::new();
        while !self.ended {
            let offset = self.reader.byte_offset();
            let width = self.decoder.code_width();
            match self.reader.read(width) {
                Some(code) if code == end_code(width) => self.ended = true,
                Some(code) => self.decoder.decode_code_at(code, offset, &mut out)?,
                None => break,
            }
        }
        self.reader.compact();

        Ok(out)
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let byte_offset = self.reader.byte_offset();
        let ended = std::mem::replace(&mut self.ended, false);
        let leftover = self.reader.remaining_bits();
        let padding_ok = self.reader.rest_is_zero();
        self.reader.clear();
        self.decoder.finish();

        if !ended {
            return Err(Error::TruncatedStream { byte_offset });
        }
        if leftover >= 8 {
            return Err(Error::InvalidInput(format!(
                "{} trailing bytes after the end marker",
                leftover / 8
            )));
        }
        if !padding_ok {
            return Err(Error::InvalidInput(format!(
                "non-zero padding bits at byte {}",
                byte_offset
            )));
        }
        Ok(Vec::new())
    }
}

/// Compresses `input` into packed codes, without any header.
///
/// # Example
///
/// ```
/// use lzw_trie::compression::{pack_bytes, unpack_bytes, LzwConfig};
///
/// let config = LzwConfig::default();
/// let packed = pack_bytes(b"ABABABA", config);
/// // Four 9-bit codes and a 9-bit end marker, padded to whole bytes.
/// assert_eq!(packed.len(), 6);
/// assert_eq!(unpack_bytes(&packed, config).unwrap(), b"ABABABA");
/// ```
pub fn pack_bytes(input: &[u8], config: LzwConfig) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut encoder = Encoder::new(config);
    encoder.encode(input, &mut writer);
    writer.close(encoder.next_code_width())
}

/// Inverse of [`pack_bytes`].
pub fn unpack_bytes(packed: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut decoder = PackedDecoder::new(config);
    let out = decoder.process(packed)?;
    decoder.finish()?;
    Ok(out)
}
