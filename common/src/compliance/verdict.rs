use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kyc::{Jurisdiction, KycLevel, WhitelistEntry};

/// Why a wallet was denied. A denial is a normal outcome, not an error.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DenialReason {
    /// No whitelist entry exists (or it could not be decoded)
    NoRecord,

    /// Entry exists but is deactivated
    Inactive,

    /// Entry expired before the policy's reference time
    Expired,

    /// KYC level lower than the policy minimum
    BelowMinimumLevel {
        actual: KycLevel,
        required: KycLevel,
    },

    /// Jurisdiction bit not set in the policy bitmask
    JurisdictionNotAllowed(Jurisdiction),
}

impl DenialReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DenialReason::NoRecord => "no-record",
            DenialReason::Inactive => "inactive",
            DenialReason::Expired => "expired",
            DenialReason::BelowMinimumLevel { .. } => "below-minimum-level",
            DenialReason::JurisdictionNotAllowed(_) => "jurisdiction-not-allowed",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoRecord => write!(f, "No KYC record found"),
            DenialReason::Inactive => write!(f, "KYC record is inactive"),
            DenialReason::Expired => write!(f, "KYC verification has expired"),
            DenialReason::BelowMinimumLevel { actual, required } => {
                write!(f, "KYC level {} below minimum {}", actual, required)
            }
            DenialReason::JurisdictionNotAllowed(jurisdiction) => {
                write!(f, "Jurisdiction {} is not allowed", jurisdiction)
            }
        }
    }
}

/// Outcome of evaluating a whitelist entry against a policy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ComplianceVerdict {
    pub is_compliant: bool,

    /// Set exactly when `is_compliant` is false
    pub reason: Option<DenialReason>,

    /// The evaluated entry, absent for `NoRecord`
    pub entry: Option<WhitelistEntry>,
}

impl ComplianceVerdict {
    pub fn compliant(entry: WhitelistEntry) -> Self {
        Self {
            is_compliant: true,
            reason: None,
            entry: Some(entry),
        }
    }

    pub fn denied(reason: DenialReason, entry: Option<WhitelistEntry>) -> Self {
        Self {
            is_compliant: false,
            reason: Some(reason),
            entry,
        }
    }

    pub fn reason_code(&self) -> Option<&'static str> {
        self.reason.as_ref().map(DenialReason::code)
    }
}
