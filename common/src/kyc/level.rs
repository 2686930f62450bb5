// KYC Level enumeration
// Ordinal verification tier stored as a single byte on-chain

use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

/// KYC verification level, ordered Basic < Standard < Enhanced < Institutional
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[repr(u8)]
pub enum KycLevel {
    /// Basic verification (email, phone)
    #[default]
    Basic = 0,

    /// Standard verification (ID document)
    Standard = 1,

    /// Enhanced verification (video call, address proof)
    Enhanced = 2,

    /// Institutional (corporate KYC/KYB)
    Institutional = 3,
}

impl KycLevel {
    pub const ALL: [KycLevel; 4] = [
        KycLevel::Basic,
        KycLevel::Standard,
        KycLevel::Enhanced,
        KycLevel::Institutional,
    ];

    /// Get human-readable level name
    pub fn as_str(&self) -> &'static str {
        match self {
            KycLevel::Basic => "Basic",
            KycLevel::Standard => "Standard",
            KycLevel::Enhanced => "Enhanced",
            KycLevel::Institutional => "Institutional",
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(KycLevel::Basic),
            1 => Some(KycLevel::Standard),
            2 => Some(KycLevel::Enhanced),
            3 => Some(KycLevel::Institutional),
            _ => None,
        }
    }

    /// Convert to u8 for serialization
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Check if this level satisfies a required minimum
    #[inline]
    pub fn meets(&self, minimum: KycLevel) -> bool {
        *self >= minimum
    }
}

impl std::fmt::Display for KycLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serializer for KycLevel {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let value = u8::read(reader)?;
        KycLevel::from_u8(value).ok_or(ReaderError::InvalidEnum {
            kind: "KycLevel",
            value,
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.to_u8().write(writer);
    }

    fn size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(KycLevel::Basic < KycLevel::Standard);
        assert!(KycLevel::Standard < KycLevel::Enhanced);
        assert!(KycLevel::Enhanced < KycLevel::Institutional);

        assert!(KycLevel::Enhanced.meets(KycLevel::Standard));
        assert!(KycLevel::Standard.meets(KycLevel::Standard));
        assert!(!KycLevel::Basic.meets(KycLevel::Standard));
    }

    #[test]
    fn test_u8_conversion() {
        for level in KycLevel::ALL {
            assert_eq!(KycLevel::from_u8(level.to_u8()), Some(level));
        }

        // Invalid values
        assert_eq!(KycLevel::from_u8(4), None);
        assert_eq!(KycLevel::from_u8(255), None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            KycLevel::from_bytes(&[4]),
            Err(ReaderError::InvalidEnum {
                kind: "KycLevel",
                value: 4
            })
        );
    }
}
