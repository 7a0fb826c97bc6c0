//! Session configuration shared by the encoder and the decoder.
//!
//! Both ends of a session must be built from equal configurations; nothing in
//! the code stream itself carries these values (the [`container`] envelope
//! records them in its header).
//!
//! [`container`]: crate::compression::container

use crate::compression::{Code, Result};
use crate::error::Error;

/// Narrowest code width; enough for the 256 seeds plus the first new code.
pub const MIN_CODE_WIDTH: u8 = 9;
/// Widest code width this crate accepts.
pub const MAX_CODE_WIDTH: u8 = 24;
/// Code width used by [`LzwConfig::default`].
pub const DEFAULT_CODE_WIDTH: u8 = 16;

/// What happens once every code up to the maximum has been assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OnFull {
    /// Stop adding entries and keep coding with the static dictionary.
    #[default]
    Freeze,
    /// Drop back to the 256 seeds and start growing again.
    Reset,
}

impl OnFull {
    /// Single byte tag used by the container header.
    pub fn to_byte(self) -> u8 {
        match self {
            OnFull::Freeze => 0,
            OnFull::Reset => 1,
        }
    }

    /// Inverse of [`OnFull::to_byte`].
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(OnFull::Freeze),
            1 => Some(OnFull::Reset),
            _ => None,
        }
    }
}

/// Configuration of one compression session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LzwConfig {
    max_code_width: u8,
    on_full: OnFull,
}

impl LzwConfig {
    /// Creates a configuration, rejecting widths outside
    /// `MIN_CODE_WIDTH..=MAX_CODE_WIDTH`.
    pub fn new(max_code_width: u8, on_full: OnFull) -> Result<Self> {
        if !(MIN_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&max_code_width) {
            return Err(Error::InvalidConfig(format!(
                "max code width must be between {} and {} bits, got {}",
                MIN_CODE_WIDTH, MAX_CODE_WIDTH, max_code_width
            )));
        }

        Ok(LzwConfig {
            max_code_width,
            on_full,
        })
    }

    /// Maximum number of bits a single code may occupy
    pub fn max_code_width(&self) -> u8 {
        self.max_code_width
    }

    /// Behaviour once the dictionary is full
    pub fn on_full(&self) -> OnFull {
        self.on_full
    }

    /// First code value that can never be assigned.
    ///
    /// The all-ones value of the widest code is held back: packed streams use
    /// it as their end marker.
    pub fn code_limit(&self) -> Code {
        (1 << self.max_code_width) - 1
    }

    /// Largest code value that can be assigned.
    pub fn max_code(&self) -> Code {
        self.code_limit() - 1
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        LzwConfig {
            max_code_width: DEFAULT_CODE_WIDTH,
            on_full: OnFull::Freeze,
        }
    }
}
