use serde::{Deserialize, Serialize};

use crate::kyc::{Jurisdiction, KycLevel};

/// Caller-supplied compliance policy, never persisted
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompliancePolicy {
    /// Minimum KYC level a wallet must hold
    pub min_kyc_level: KycLevel,

    /// Bit `j` set allows jurisdiction ordinal `j`
    pub allowed_jurisdiction_bitmask: u32,

    /// Reference time in unix seconds
    pub now: i64,
}

impl CompliancePolicy {
    pub fn new(min_kyc_level: KycLevel, allowed_jurisdiction_bitmask: u32, now: i64) -> Self {
        Self {
            min_kyc_level,
            allowed_jurisdiction_bitmask,
            now,
        }
    }

    /// Same thresholds evaluated at another reference time
    pub fn at(self, now: i64) -> Self {
        Self { now, ..self }
    }

    #[inline]
    pub fn allows_jurisdiction(&self, jurisdiction: Jurisdiction) -> bool {
        jurisdiction.is_in_bitmask(self.allowed_jurisdiction_bitmask)
    }
}
