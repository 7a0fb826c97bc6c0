//! Per-session counters.

/// What one encode or decode session did.
///
/// `full_events` counts insertions that were suppressed because the dictionary
/// had no codes left. Under [`OnFull::Freeze`] that is every step after
/// saturation; under [`OnFull::Reset`] each event is followed by a reset.
///
/// [`OnFull::Freeze`]: crate::compression::OnFull::Freeze
/// [`OnFull::Reset`]: crate::compression::OnFull::Reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Raw bytes consumed by an encoder or produced by a decoder
    pub bytes: u64,
    /// Codes emitted by an encoder or consumed by a decoder
    pub codes: u64,
    /// Total width in bits of those codes
    pub code_bits: u64,
    /// Dictionary entries created
    pub entries_added: u64,
    /// Insertions skipped because the dictionary was full
    pub full_events: u64,
    /// Dictionary resets
    pub resets: u64,
}

impl SessionStats {
    /// Packed size in bytes the codes would occupy
    pub fn packed_len(&self) -> u64 {
        self.code_bits.div_ceil(8)
    }

    /// Packed size over raw size, `None` for an empty session.
    pub fn ratio(&self) -> Option<f64> {
        if self.bytes == 0 {
            None
        } else {
            Some(self.packed_len() as f64 / self.bytes as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let stats = SessionStats {
            bytes: 100,
            code_bits: 401,
            ..Default::default()
        };
        assert_eq!(stats.packed_len(), 51);
        assert_eq!(stats.ratio(), Some(0.51));
        assert_eq!(SessionStats::default().ratio(), None);
    }
}
