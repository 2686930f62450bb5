// PoolComplianceEntry - one per (registry, AMM) pair, owned by the registry program

use crate::crypto::{Address, Hash};
use crate::kyc::{Jurisdiction, KycLevel};
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

use super::PoolStatus;

/// Longest DEX label accepted by the decoder
pub const MAX_DEX_LABEL_LEN: usize = 64;

/// Offset of the registry field inside the account data, discriminator included.
/// Used as the memcmp filter offset when listing a registry's entries.
pub const POOL_ENTRY_REGISTRY_OFFSET: usize = 8 + 32;

/// Compliance record for a trading pool
///
/// Fields after `dex_label` shift by the label's declared length.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolComplianceEntry {
    /// AMM pool address
    pub amm_key: Address,

    /// Registry this entry belongs to
    pub registry: Address,

    /// Pool operator
    pub operator: Address,

    /// DEX name, length-prefixed UTF-8 on-chain
    pub dex_label: String,

    pub status: PoolStatus,

    /// Operator jurisdiction
    pub jurisdiction: Jurisdiction,

    /// Operator KYC level
    pub kyc_level: KycLevel,

    /// Hash of the latest audit report
    pub audit_hash: Hash,

    /// Audit expiry (0 = no expiry)
    pub audit_expiry: i64,

    pub registered_at: i64,

    pub updated_at: i64,
}

impl PoolComplianceEntry {
    /// Size of everything except the label bytes
    pub const FIXED_SIZE: usize = 32 + 32 + 32 + 4 + 1 + 1 + 1 + 32 + 8 + 8 + 8;

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.allows_routing()
    }

    /// Check if the label fits the decoder's limit
    #[inline]
    pub fn has_valid_label(&self) -> bool {
        self.dex_label.len() <= MAX_DEX_LABEL_LEN
    }

    /// Check if the audit is still current at `current_time`
    pub fn is_audit_current(&self, current_time: i64) -> bool {
        self.audit_expiry == 0 || current_time <= self.audit_expiry
    }
}

impl Serializer for PoolComplianceEntry {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            amm_key: Address::read(reader)?,
            registry: Address::read(reader)?,
            operator: Address::read(reader)?,
            dex_label: reader.read_string_with_limit(MAX_DEX_LABEL_LEN)?,
            status: PoolStatus::read(reader)?,
            jurisdiction: Jurisdiction::read(reader)?,
            kyc_level: KycLevel::read(reader)?,
            audit_hash: Hash::read(reader)?,
            audit_expiry: i64::read(reader)?,
            registered_at: i64::read(reader)?,
            updated_at: i64::read(reader)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        debug_assert!(
            self.has_valid_label(),
            "dex_label of {} bytes exceeds {} bytes",
            self.dex_label.len(),
            MAX_DEX_LABEL_LEN
        );
        self.amm_key.write(writer);
        self.registry.write(writer);
        self.operator.write(writer);
        writer.write_string(&self.dex_label);
        self.status.write(writer);
        self.jurisdiction.write(writer);
        self.kyc_level.write(writer);
        self.audit_hash.write(writer);
        self.audit_expiry.write(writer);
        self.registered_at.write(writer);
        self.updated_at.write(writer);
    }

    fn size(&self) -> usize {
        Self::FIXED_SIZE + self.dex_label.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(label: &str) -> PoolComplianceEntry {
        PoolComplianceEntry {
            amm_key: Address::new([1u8; 32]),
            registry: Address::new([2u8; 32]),
            operator: Address::new([3u8; 32]),
            dex_label: label.to_string(),
            status: PoolStatus::Active,
            jurisdiction: Jurisdiction::Japan,
            kyc_level: KycLevel::Institutional,
            audit_hash: Hash::new([4u8; 32]),
            audit_expiry: 5_000,
            registered_at: 1_000,
            updated_at: 2_000,
        }
    }

    #[test]
    fn test_label_shifts_offsets() {
        let short = sample_entry("Orca").to_bytes();
        let long = sample_entry("Raydium CLMM").to_bytes();
        assert_eq!(long.len() - short.len(), "Raydium CLMM".len() - "Orca".len());

        // Status byte sits right after the label
        assert_eq!(short[96 + 4 + 4], PoolStatus::Active.to_u8());
        assert_eq!(long[96 + 4 + 12], PoolStatus::Active.to_u8());
    }

    #[test]
    fn test_label_past_end() {
        let mut bytes = sample_entry("Orca").to_bytes();
        // Declare a label longer than the remaining buffer
        bytes[96..100].copy_from_slice(&64u32.to_le_bytes());
        assert!(matches!(
            PoolComplianceEntry::from_bytes(&bytes),
            Err(ReaderError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_invalid_status() {
        let mut bytes = sample_entry("Orca").to_bytes();
        bytes[104] = 7;
        assert_eq!(
            PoolComplianceEntry::from_bytes(&bytes),
            Err(ReaderError::InvalidEnum {
                kind: "PoolStatus",
                value: 7
            })
        );
    }

    #[test]
    fn test_audit_current() {
        let mut entry = sample_entry("Orca");
        assert!(entry.is_audit_current(5_000));
        assert!(!entry.is_audit_current(5_001));
        entry.audit_expiry = 0;
        assert!(entry.is_audit_current(i64::MAX));
    }

    #[test]
    fn test_label_limit() {
        assert!(sample_entry(&"a".repeat(MAX_DEX_LABEL_LEN)).has_valid_label());
        assert!(!sample_entry(&"a".repeat(MAX_DEX_LABEL_LEN + 1)).has_valid_label());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "dex_label of 65 bytes")]
    fn test_oversized_label_not_encoded() {
        let _ = sample_entry(&"a".repeat(MAX_DEX_LABEL_LEN + 1)).to_bytes();
    }
}
