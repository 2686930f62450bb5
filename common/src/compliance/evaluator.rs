use crate::kyc::WhitelistEntry;

use super::{CompliancePolicy, ComplianceVerdict, DenialReason};

/// Evaluate a whitelist entry against a policy.
///
/// Checks run in a fixed order and the first failing one is reported:
/// missing record, inactive, expired, level below minimum, jurisdiction
/// not allowed. Pure and deterministic.
pub fn evaluate(entry: Option<&WhitelistEntry>, policy: &CompliancePolicy) -> ComplianceVerdict {
    let Some(entry) = entry else {
        return ComplianceVerdict::denied(DenialReason::NoRecord, None);
    };

    match first_denial(entry, policy) {
        Some(reason) => ComplianceVerdict::denied(reason, Some(entry.clone())),
        None => ComplianceVerdict::compliant(entry.clone()),
    }
}

/// Boolean form of [`evaluate`], the statement a compliance proof attests
#[inline]
pub fn is_compliant(entry: Option<&WhitelistEntry>, policy: &CompliancePolicy) -> bool {
    entry.is_some_and(|entry| first_denial(entry, policy).is_none())
}

fn first_denial(entry: &WhitelistEntry, policy: &CompliancePolicy) -> Option<DenialReason> {
    if !entry.is_active {
        return Some(DenialReason::Inactive);
    }

    if entry.is_expired(policy.now) {
        return Some(DenialReason::Expired);
    }

    if entry.kyc_level < policy.min_kyc_level {
        return Some(DenialReason::BelowMinimumLevel {
            actual: entry.kyc_level,
            required: policy.min_kyc_level,
        });
    }

    if !policy.allows_jurisdiction(entry.jurisdiction) {
        return Some(DenialReason::JurisdictionNotAllowed(entry.jurisdiction));
    }

    None
}
