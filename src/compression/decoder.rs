//! LZW decoder.
//!
//! The decoder never sees raw input, only codes, and rebuilds the encoder's
//! dictionary from them: after resolving each code it inserts the previous
//! sequence extended by the first byte of the current one. That insertion is
//! the one the encoder made a step earlier, so the decoder always trails the
//! encoder by exactly one entry. A code equal to the decoder's own next code
//! therefore names the entry the encoder made in the step it just finished;
//! its sequence must be the previous sequence followed by its own first byte.

use crate::compression::config::{LzwConfig, OnFull};
use crate::compression::dictionary::{Dictionary, Insert, FIRST_CODE};
use crate::compression::encoder::SessionState;
use crate::compression::stats::SessionStats;
use crate::compression::width::CodeWidth;
use crate::compression::{Code, Result};
use crate::error::Error;

/// Stateful LZW decoder owning its dictionary.
#[derive(Debug, Clone)]
pub struct Decoder {
    config: LzwConfig,
    dict: Dictionary,
    width: CodeWidth,
    /// Code handled last, `None` at the start of a session and after a reset
    previous: Option<Code>,
    /// Number of codes handled so far, used as the default error offset
    position: usize,
    state: SessionState,
    stats: SessionStats,
}

impl Decoder {
    pub fn new(config: LzwConfig) -> Self {
        Decoder {
            config,
            dict: Dictionary::new(&config),
            width: CodeWidth::new(&config),
            previous: None,
            position: 0,
            state: SessionState::Scanning,
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &LzwConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Starts a new session.
    pub fn reset(&mut self) {
        self.dict.reset();
        self.previous = None;
        self.position = 0;
        self.state = SessionState::Scanning;
        self.stats = SessionStats::default();
    }

    /// True when the next code is read against a freshly reset dictionary.
    fn reset_pending(&self) -> bool {
        self.previous.is_some() && self.config.on_full() == OnFull::Reset && self.dict.is_full()
    }

    /// Width in bits of the next code in the stream.
    ///
    /// Mirrors the width the encoder used: the encoder's next code is one
    /// ahead of ours except at the first code of a (re)started session.
    pub fn code_width(&self) -> u8 {
        let fresh = self.state != SessionState::Scanning || self.previous.is_none();
        let encoder_next = if fresh || self.reset_pending() {
            FIRST_CODE
        } else {
            (self.dict.next_code() + 1).min(self.dict.limit())
        };
        self.width.for_next_code(encoder_next)
    }

    /// Decodes one code, appending its bytes to `out`.
    ///
    /// Errors carry the number of codes handled before this one as their offset.
    pub fn decode_code(&mut self, code: Code, out: &mut Vec<u8>) -> Result<()> {
        let offset = match self.state {
            SessionState::Done => 0,
            _ => self.position,
        };
        self.decode_code_at(code, offset, out)
    }

    /// Decodes one code, reporting `offset` on failure.
    ///
    /// Any error leaves the decoder in [`SessionState::Failed`]; later calls
    /// return [`Error::SessionAborted`] until [`reset`](Self::reset).
    pub fn decode_code_at(&mut self, code: Code, offset: usize, out: &mut Vec<u8>) -> Result<()> {
        match self.state {
            SessionState::Failed => return Err(Error::SessionAborted),
            SessionState::Done => self.reset(),
            SessionState::Scanning => {}
        }

        let width = self.code_width();
        match self.step(code, out) {
            Ok(()) => {
                self.position += 1;
                self.stats.codes += 1;
                self.stats.code_bits += u64::from(width);
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Failed;
                Err(err.at_offset(offset))
            }
        }
    }

    fn step(&mut self, code: Code, out: &mut Vec<u8>) -> Result<()> {
        if self.reset_pending() {
            self.dict.reset();
            self.previous = None;
            self.stats.resets += 1;
        }

        let start = out.len();
        match self.previous {
            // Only the seeds exist, so the encoder cannot have referenced
            // anything else yet.
            None => self.dict.resolve_into(code, out)?,
            Some(previous) => {
                if self.dict.contains(code) {
                    self.dict.resolve_into(code, out)?;
                } else if code == self.dict.next_code() && !self.dict.is_full() {
                    self.dict.resolve_into(previous, out)?;
                    let first = out[start];
                    out.push(first);
                } else {
                    return Err(Error::UnknownCode { code, offset: None });
                }

                match self.dict.insert(previous, out[start]) {
                    Insert::Added(_) => self.stats.entries_added += 1,
                    Insert::Full => self.stats.full_events += 1,
                }
            }
        }

        self.previous = Some(code);
        self.stats.bytes += (out.len() - start) as u64;
        Ok(())
    }

    /// Decodes a complete code sequence as one session.
    ///
    /// Errors report the index of the offending code.
    pub fn decode(&mut self, codes: &[Code]) -> Result<Vec<u8>> {
        self.reset();
        let mut out = Vec::new();
        for (index, &code) in codes.iter().enumerate() {
            self.decode_code_at(code, index, &mut out)?;
        }
        self.finish();
        Ok(out)
    }

    /// Marks the end of the code stream.
    pub fn finish(&mut self) {
        if self.state == SessionState::Scanning {
            self.state = SessionState::Done;
        }
    }
}

/// Decompresses a code sequence produced with the default configuration.
///
/// # Example
///
/// ```
/// use lzw_trie::compression::decompress;
///
/// assert_eq!(decompress(&[65, 66, 256, 258]).unwrap(), b"ABABABA");
/// assert!(decompress(&[]).unwrap().is_empty());
/// ```
pub fn decompress(codes: &[Code]) -> Result<Vec<u8>> {
    decompress_with(codes, LzwConfig::default())
}

/// Decompresses a code sequence produced with `config`.
pub fn decompress_with(codes: &[Code], config: LzwConfig) -> Result<Vec<u8>> {
    Decoder::new(config).decode(codes)
}
