// KYC Jurisdiction enumeration
// Ordinal country/region code, gated through a bitmask by routing policies
//
// Bit mapping: 0=Japan, 1=Singapore, 2=HongKong, 3=Eu, 4=Usa, 5=Other

use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

/// Jurisdiction of a verified wallet or pool operator
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Jurisdiction {
    /// Japan (primary market)
    #[default]
    Japan = 0,

    Singapore = 1,

    HongKong = 2,

    /// European Union
    Eu = 3,

    /// United States (restricted for transfers)
    Usa = 4,

    Other = 5,
}

/// Bitmask allowing every jurisdiction
pub const ALL_JURISDICTIONS_BITMASK: u32 = 0b11_1111;

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 6] = [
        Jurisdiction::Japan,
        Jurisdiction::Singapore,
        Jurisdiction::HongKong,
        Jurisdiction::Eu,
        Jurisdiction::Usa,
        Jurisdiction::Other,
    ];

    /// Get human-readable jurisdiction name
    pub fn as_str(&self) -> &'static str {
        match self {
            Jurisdiction::Japan => "Japan",
            Jurisdiction::Singapore => "Singapore",
            Jurisdiction::HongKong => "Hong Kong",
            Jurisdiction::Eu => "EU",
            Jurisdiction::Usa => "USA",
            Jurisdiction::Other => "Other",
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Jurisdiction::Japan),
            1 => Some(Jurisdiction::Singapore),
            2 => Some(Jurisdiction::HongKong),
            3 => Some(Jurisdiction::Eu),
            4 => Some(Jurisdiction::Usa),
            5 => Some(Jurisdiction::Other),
            _ => None,
        }
    }

    /// Convert to u8 for serialization
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this jurisdiction
    #[inline]
    pub fn bit(self) -> u32 {
        1u32 << self.to_u8()
    }

    /// Check if this jurisdiction's bit is set in `bitmask`
    #[inline]
    pub fn is_in_bitmask(self, bitmask: u32) -> bool {
        bitmask & self.bit() != 0
    }

    /// Check if the jurisdiction is generally allowed for transfers
    /// USA is restricted regardless of policy
    #[inline]
    pub fn is_generally_allowed(self) -> bool {
        !matches!(self, Jurisdiction::Usa)
    }
}

impl std::fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serializer for Jurisdiction {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let value = u8::read(reader)?;
        Jurisdiction::from_u8(value).ok_or(ReaderError::InvalidEnum {
            kind: "Jurisdiction",
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
