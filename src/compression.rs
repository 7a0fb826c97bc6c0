//! LZW compression over a trie-backed dictionary.
//!
//! The module is split the same way the algorithm is:
//! - [`dictionary`]: the trie mapping byte sequences to codes and back
//! - [`encoder`]: walks the dictionary over the input and emits codes
//! - [`decoder`]: rebuilds the dictionary from the codes alone
//! - [`width`]: the variable code width policy shared by both ends
//!
//! Everything past that is boundary plumbing: [`bitpack`] turns codes into
//! bytes, [`container`] wraps the packed stream in a small self-describing
//! envelope and [`batch`] runs independent sessions in parallel.
//!
//! # Examples
//!
//! ```rust
//! use lzw_trie::compression::{compress, decompress};
//!
//! let input = b"TOBEORNOTTOBEORTOBEORNOT";
//! let codes = compress(input);
//! assert!(codes.len() < input.len());
//! assert_eq!(decompress(&codes).unwrap(), input);
//! ```

use crate::error::Error;

/// Result type for compression operations
pub type Result<T> = std::result::Result<T, Error>;

/// A dictionary code. Codes double as indices into the dictionary arena.
pub type Code = u32;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Trait for streaming compression algorithms
pub trait StreamingCompression {
    /// Process a chunk of input data
    fn process(&mut self, chunk: &[u8]) -> Result<Vec<u8>>;

    /// Finish processing and return any remaining data
    fn finish(&mut self) -> Result<Vec<u8>>;
}

pub mod batch;
pub mod bitpack;
pub mod config;
pub mod container;
pub mod decoder;
pub mod dictionary;
pub mod encoder;
pub mod stats;
pub mod width;

pub use batch::{compress_all, compress_dir, decompress_all, decompress_dir};
pub use bitpack::{
    end_code, pack_bytes, unpack_bytes, BitReader, BitWriter, PackedDecoder, PackedEncoder,
};
pub use config::{LzwConfig, OnFull, DEFAULT_CODE_WIDTH, MAX_CODE_WIDTH, MIN_CODE_WIDTH};
pub use container::Lzw;
pub use decoder::{decompress, decompress_with, Decoder};
pub use dictionary::{Dictionary, Insert, Match, FIRST_CODE};
pub use encoder::{compress, compress_with, CodeSink, Encoder, SessionState};
pub use stats::SessionStats;
pub use width::CodeWidth;
