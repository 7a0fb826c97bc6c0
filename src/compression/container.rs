//! Self-describing envelope around a packed code stream.
//!
//! Layout, multi-byte fields little endian:
//!
//! | bytes | field                                        |
//! |-------|----------------------------------------------|
//! | 4     | magic `LZWT`                                 |
//! | 1     | format version, currently 1                  |
//! | 1     | maximum code width                           |
//! | 1     | full-dictionary policy (0 freeze, 1 reset)   |
//! | 8     | length of the original data                  |
//! | 4     | CRC-32 of the original data                  |
//! | ...   | packed codes, see [`bitpack`]                |
//!
//! The header carries the configuration, so a decompressor needs no prior
//! agreement with the compressor.
//!
//! [`bitpack`]: crate::compression::bitpack

use crate::compression::bitpack::{BitWriter, PackedDecoder};
use crate::compression::config::{LzwConfig, OnFull};
use crate::compression::encoder::Encoder;
use crate::compression::{Compression, Result, StreamingCompression};
use crate::error::Error;
use log::{debug, warn};

const MAGIC: &[u8; 4] = b"LZWT";
const VERSION: u8 = 1;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 19;

/// Parsed container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub config: LzwConfig,
    pub original_len: u64,
    pub checksum: u32,
}

impl Header {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.push(self.config.max_code_width());
        out.push(self.config.on_full().to_byte());
        out.extend_from_slice(&self.original_len.to_le_bytes());
        out.extend_from_slice(&self.checksum.to_le_bytes());
    }

    /// Parses the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Header> {
        if data.len() < HEADER_LEN {
            return Err(Error::InvalidHeader(format!(
                "need {} header bytes, got {}",
                HEADER_LEN,
                data.len()
            )));
        }
        if &data[0..4] != MAGIC {
            return Err(Error::InvalidHeader("bad magic".to_string()));
        }
        if data[4] != VERSION {
            return Err(Error::InvalidHeader(format!(
                "unsupported version {}",
                data[4]
            )));
        }

        let on_full = OnFull::from_byte(data[6]).ok_or_else(|| {
            Error::InvalidHeader(format!("unknown full-dictionary policy {}", data[6]))
        })?;
        let config = LzwConfig::new(data[5], on_full)
            .map_err(|err| Error::InvalidHeader(err.to_string()))?;

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&data[7..15]);
        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&data[15..19]);

        Ok(Header {
            config,
            original_len: u64::from_le_bytes(len_bytes),
            checksum: u32::from_le_bytes(crc_bytes),
        })
    }
}

/// LZW compressor producing self-describing containers.
///
/// # Example
///
/// ```
/// use lzw_trie::compression::{Compression, Lzw};
///
/// let lzw = Lzw::default();
/// let packed = lzw.compress(b"TOBEORNOTTOBEORTOBEORNOT").unwrap();
/// assert_eq!(lzw.decompress(&packed).unwrap(), b"TOBEORNOTTOBEORTOBEORNOT");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lzw {
    config: LzwConfig,
}

impl Lzw {
    pub fn new(config: LzwConfig) -> Self {
        Lzw { config }
    }

    /// Configuration used when compressing. Decompression always follows
    /// the header instead.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}

impl Compression for Lzw {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let header = Header {
            config: self.config,
            original_len: data.len() as u64,
            checksum: crc32fast::hash(data),
        };

        let mut encoder = Encoder::new(self.config);
        let mut writer = BitWriter::new();
        encoder.encode(data, &mut writer);

        let mut output = Vec::with_capacity(HEADER_LEN + writer.pending_bits() / 8 + 1);
        header.write(&mut output);
        output.extend(writer.close(encoder.next_code_width()));

        let stats = encoder.stats();
        debug!(
            "compressed {} bytes into {} ({} codes, {} entries, {} resets)",
            data.len(),
            output.len(),
            stats.codes,
            stats.entries_added,
            stats.resets
        );

        Ok(output)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let header = Header::parse(data)?;
        if header.config != self.config {
            debug!(
                "container configured as {:?}, overriding {:?}",
                header.config, self.config
            );
        }

        let mut decoder = PackedDecoder::new(header.config);
        let output = decoder.process(&data[HEADER_LEN..]).map_err(|err| {
            warn!("corrupt code stream: {}", err);
            err
        })?;
        decoder.finish().map_err(|err| {
            warn!("bad end of code stream: {}", err);
            err
        })?;

        let actual = output.len() as u64;
        if actual != header.original_len {
            warn!(
                "length mismatch: header says {}, decoded {}",
                header.original_len, actual
            );
            return Err(Error::LengthMismatch {
                expected: header.original_len,
                actual,
            });
        }

        let checksum = crc32fast::hash(&output);
        if checksum != header.checksum {
            warn!("checksum mismatch on {} decoded bytes", actual);
            return Err(Error::ChecksumMismatch {
                expected: header.checksum,
                actual: checksum,
            });
        }

        debug!(
            "decompressed {} bytes into {}",
            data.len(),
            output.len()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_empty_input() {
        let lzw = Lzw::default();
        let packed = lzw.compress(b"").unwrap();
        // The payload is only the end marker.
        assert_eq!(packed.len(), HEADER_LEN + 2);
        assert!(lzw.decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn test_header_fields() {
        let config = LzwConfig::new(12, OnFull::Reset).unwrap();
        let packed = Lzw::new(config).compress(b"hello hello").unwrap();
        let header = Header::parse(&packed).unwrap();
        assert_eq!(header.config, config);
        assert_eq!(header.original_len, 11);
        assert_eq!(header.checksum, crc32fast::hash(b"hello hello"));
        assert_eq!(&packed[..4], b"LZWT");
    }

    #[test]
    fn test_round_trip_random() {
        let mut rng = StdRng::seed_from_u64(99);
        for config in [
            LzwConfig::default(),
            LzwConfig::new(9, OnFull::Freeze).unwrap(),
            LzwConfig::new(10, OnFull::Reset).unwrap(),
        ] {
            let lzw = Lzw::new(config);
            let input: Vec<u8> = (0..25_000).map(|_| rng.gen_range(0..40u8)).collect();
            let packed = lzw.compress(&input).unwrap();
            assert_eq!(lzw.decompress(&packed).unwrap(), input);
        }
    }

    #[test]
    fn test_header_config_wins() {
        let config = LzwConfig::new(10, OnFull::Reset).unwrap();
        let input = b"abababababababababababababababab".repeat(200);
        let packed = Lzw::new(config).compress(&input).unwrap();
        assert_eq!(Lzw::default().decompress(&packed).unwrap(), input);
    }

    #[test]
    fn test_compresses_repetitive_data() {
        let input = b"the rain in spain stays mainly in the plain. ".repeat(100);
        let packed = Lzw::default().compress(&input).unwrap();
        assert!(packed.len() < input.len() / 3);
    }

    #[test]
    fn test_truncated_payload() {
        let lzw = Lzw::default();
        let packed = lzw.compress(b"a payload that gets cut short").unwrap();
        assert!(matches!(
            lzw.decompress(&packed[..packed.len() - 1]),
            Err(Error::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_bad_magic() {
        let mut packed = Lzw::default().compress(b"data").unwrap();
        packed[0] = b'X';
        assert!(matches!(
            Lzw::default().decompress(&packed),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            Lzw::default().decompress(b"LZWT"),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_bad_width_in_header() {
        let mut packed = Lzw::default().compress(b"data").unwrap();
        packed[5] = 40;
        assert!(matches!(
            Lzw::default().decompress(&packed),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut packed = Lzw::default().compress(b"checksummed payload").unwrap();
        packed[15] ^= 0xff;
        assert!(matches!(
            Lzw::default().decompress(&packed),
            Err(Error::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let mut packed = Lzw::default().compress(b"length checked").unwrap();
        packed[7] = packed[7].wrapping_add(1);
        assert!(matches!(
            Lzw::default().decompress(&packed),
            Err(Error::LengthMismatch {
                expected: 15,
                actual: 14
            })
        ));
    }
}
