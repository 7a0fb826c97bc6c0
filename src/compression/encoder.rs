//! LZW encoder.
//!
//! The encoder repeatedly finds the longest dictionary entry matching the
//! input at the cursor, emits its code and registers that entry extended by the
//! following byte. Ties always go to the just-matched entry, never to a shorter
//! prefix of it.
//!
//! Codes go to a [`CodeSink`] one at a time together with the width the
//! [`CodeWidth`] policy assigns them, so the whole code sequence never has to
//! be held in memory.

use crate::compression::config::{LzwConfig, OnFull};
use crate::compression::dictionary::{Dictionary, Insert, FIRST_CODE};
use crate::compression::stats::SessionStats;
use crate::compression::width::CodeWidth;
use crate::compression::Code;

/// Receives codes as the encoder produces them.
pub trait CodeSink {
    /// Accept one code that must be written using `width` bits.
    fn put_code(&mut self, code: Code, width: u8);
}

/// Collects bare codes, discarding widths.
impl CodeSink for Vec<Code> {
    fn put_code(&mut self, code: Code, _width: u8) {
        self.push(code);
    }
}

/// Phase of an encode or decode session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Input is still being consumed
    Scanning,
    /// End of input reached; everything has been emitted
    Done,
    /// The decoder hit a corrupt code and refuses further input
    Failed,
}

/// Stateful LZW encoder owning its dictionary.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: LzwConfig,
    dict: Dictionary,
    width: CodeWidth,
    /// Entry matched so far by [`push`](Self::push), waiting for a byte that
    /// does not extend it
    pending: Option<Code>,
    state: SessionState,
    stats: SessionStats,
}

impl Encoder {
    pub fn new(config: LzwConfig) -> Self {
        Encoder {
            config,
            dict: Dictionary::new(&config),
            width: CodeWidth::new(&config),
            pending: None,
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

    /// Starts a new session: reseeds the dictionary and forgets pending input.
    pub fn reset(&mut self) {
        self.dict.reset();
        self.pending = None;
        self.state = SessionState::Scanning;
        self.stats = SessionStats::default();
    }

    /// Encodes a complete input as one session.
    ///
    /// Any session in progress is discarded first.
    ///
    /// # Example
    ///
    /// ```
    /// use lzw_trie::compression::{Encoder, LzwConfig};
    ///
    /// let mut encoder = Encoder::new(LzwConfig::default());
    /// let mut codes = Vec::<u32>::new();
    /// encoder.encode(b"ABABABA", &mut codes);
    /// assert_eq!(codes, vec![65, 66, 256, 258]);
    /// ```
    pub fn encode<S: CodeSink + ?Sized>(&mut self, input: &[u8], sink: &mut S) {
        self.reset();
        self.stats.bytes = input.len() as u64;

        let mut cursor = 0;
        while let Some(m) = self.dict.lookup_longest_prefix(input, cursor) {
            self.emit(m.code, sink);
            if let Some(&next_byte) = input.get(m.end) {
                self.extend(m.code, next_byte);
            }
            cursor = m.end;
        }

        self.state = SessionState::Done;
    }

    /// Feeds the next chunk of a stream.
    ///
    /// The last matched entry is held back until a byte arrives that does not
    /// extend it, or until [`finish`](Self::finish). Calling `push` after
    /// `finish` starts a new session.
    pub fn push<S: CodeSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) {
        if self.state != SessionState::Scanning {
            self.reset();
        }
        self.stats.bytes += chunk.len() as u64;

        for &byte in chunk {
            self.pending = Some(match self.pending {
                None => Code::from(byte),
                Some(code) => match self.dict.child(code, byte) {
                    Some(longer) => longer,
                    None => {
                        self.emit(code, sink);
                        self.extend(code, byte);
                        Code::from(byte)
                    }
                },
            });
        }
    }

    /// Emits the held-back match and ends the session.
    pub fn finish<S: CodeSink + ?Sized>(&mut self, sink: &mut S) {
        if let Some(code) = self.pending.take() {
            self.emit(code, sink);
        }
        self.state = SessionState::Done;
    }

    /// Width the decoder expects for whatever follows the codes emitted so
    /// far, which is where packed streams put their end marker.
    ///
    /// The decoder reads each code one dictionary entry behind the encoder, so
    /// this is the width of the next code counting the entry the following
    /// step would add.
    pub fn next_code_width(&self) -> u8 {
        let restart = self.stats.codes == 0
            || (self.dict.is_full() && self.config.on_full() == OnFull::Reset);
        let next = if restart {
            FIRST_CODE
        } else {
            (self.dict.next_code() + 1).min(self.dict.limit())
        };
        self.width.for_next_code(next)
    }

    fn emit<S: CodeSink + ?Sized>(&mut self, code: Code, sink: &mut S) {
        let width = self.width.for_next_code(self.dict.next_code());
        sink.put_code(code, width);
        self.stats.codes += 1;
        self.stats.code_bits += u64::from(width);
    }

    /// Registers `code`'s sequence extended by `next_byte`, applying the
    /// full-dictionary policy when no codes are left.
    fn extend(&mut self, code: Code, next_byte: u8) {
        match self.dict.insert(code, next_byte) {
            Insert::Added(_) => self.stats.entries_added += 1,
            Insert::Full => {
                self.stats.full_events += 1;
                if self.config.on_full() == OnFull::Reset {
                    self.dict.reset();
                    self.stats.resets += 1;
                }
            }
        }
    }
}

/// Compresses `input` into a code sequence with the default configuration.
///
/// # Example
///
/// ```
/// use lzw_trie::compression::compress;
///
/// assert_eq!(compress(b"AAAA"), vec![65, 256, 65]);
/// assert!(compress(b"").is_empty());
/// ```
pub fn compress(input: &[u8]) -> Vec<Code> {
    compress_with(input, LzwConfig::default())
}

/// Compresses `input` into a code sequence with the given configuration.
pub fn compress_with(input: &[u8], config: LzwConfig) -> Vec<Code> {
    let mut codes = Vec::<Code>::new();
    Encoder::new(config).encode(input, &mut codes);
    codes
}
