//! Variable code width policy.
//!
//! Codes start at 9 bits and widen by one bit each time the next code to be
//! assigned no longer fits, until the configured maximum is reached. The width
//! is a pure function of the dictionary's next code, so an encoder and a
//! decoder holding equal dictionaries always agree on it.

use crate::compression::config::{LzwConfig, MIN_CODE_WIDTH};
use crate::compression::Code;

/// Width policy for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeWidth {
    max_width: u8,
}

impl CodeWidth {
    pub fn new(config: &LzwConfig) -> Self {
        CodeWidth {
            max_width: config.max_code_width(),
        }
    }

    /// Width in bits of a code emitted while `next_code` is the next code the
    /// dictionary would assign.
    ///
    /// # Example
    ///
    /// ```
    /// use lzw_trie::compression::{CodeWidth, LzwConfig};
    ///
    /// let width = CodeWidth::new(&LzwConfig::default());
    /// assert_eq!(width.for_next_code(256), 9);
    /// assert_eq!(width.for_next_code(511), 9);
    /// assert_eq!(width.for_next_code(512), 10);
    /// ```
    pub fn for_next_code(&self, next_code: Code) -> u8 {
        let bits = (Code::BITS - next_code.leading_zeros()) as u8;
        bits.clamp(MIN_CODE_WIDTH, self.max_width)
    }

    /// Widest code this policy will ever produce
    pub fn max_width(&self) -> u8 {
        self.max_width
    }
}
