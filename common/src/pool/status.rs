// Pool compliance status
// Only Active pools are eligible for routing

use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PoolStatus {
    /// Pool passed review and may receive routed trades
    #[default]
    Active = 0,

    /// Temporarily excluded pending review
    Suspended = 1,

    /// Permanently excluded by the registry authority
    Revoked = 2,
}

impl PoolStatus {
    /// Check if this status allows routing through the pool
    #[inline]
    pub fn allows_routing(&self) -> bool {
        matches!(self, PoolStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::Active => "Active",
            PoolStatus::Suspended => "Suspended",
            PoolStatus::Revoked => "Revoked",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PoolStatus::Active),
            1 => Some(PoolStatus::Suspended),
            2 => Some(PoolStatus::Revoked),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serializer for PoolStatus {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let value = u8::read(reader)?;
        PoolStatus::from_u8(value).ok_or(ReaderError::InvalidEnum {
            kind: "PoolStatus",
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
    fn test_allows_routing() {
        assert!(PoolStatus::Active.allows_routing());
        assert!(!PoolStatus::Suspended.allows_routing());
        assert!(!PoolStatus::Revoked.allows_routing());
    }

    #[test]
    fn test_u8_conversion() {
        for status in [PoolStatus::Active, PoolStatus::Suspended, PoolStatus::Revoked] {
            assert_eq!(PoolStatus::from_u8(status.to_u8()), Some(status));
        }
        assert_eq!(PoolStatus::from_u8(3), None);
    }
}
