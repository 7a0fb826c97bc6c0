pub mod compression;
pub mod error;

pub use compression::{
    compress, compress_with, decompress, decompress_with, Code, Compression, Decoder, Dictionary,
    Encoder, Insert, LzwConfig, OnFull, StreamingCompression,
};
pub use error::{Error, Result};
