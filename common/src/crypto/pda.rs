//! Program derived addresses.
//!
//! Accounts owned by the transfer-hook and registry programs live at
//! addresses derived from a list of seeds and the owning program id. The
//! derivation hashes the seeds with a bump byte and keeps the first digest
//! that is *not* a point on the ed25519 curve, so no private key exists for
//! the resulting address.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};

use super::{Address, CryptoError};

/// Maximum number of seeds, bump included
pub const MAX_SEEDS: usize = 16;
/// Maximum length of a single seed
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

// Seed prefixes shared with the on-chain programs
pub const KYC_REGISTRY_SEED: &[u8] = b"kyc_registry";
pub const WHITELIST_SEED: &[u8] = b"whitelist";
pub const EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"extra-account-metas";
pub const POOL_REGISTRY_SEED: &[u8] = b"pool_registry";
pub const POOL_ENTRY_SEED: &[u8] = b"pool_entry";
pub const COMPLIANCE_CONFIG_SEED: &[u8] = b"compliance_config";

/// Deterministic address derivation from seeds.
///
/// Identical seeds and program id always yield the identical `(address, bump)`.
pub trait AddressDeriver: Send + Sync {
    fn derive(&self, seeds: &[&[u8]], program_id: &Address)
        -> Result<(Address, u8), CryptoError>;
}

/// The ledger's native program address derivation
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgramAddressDeriver;

impl AddressDeriver for ProgramAddressDeriver {
    fn derive(
        &self,
        seeds: &[&[u8]],
        program_id: &Address,
    ) -> Result<(Address, u8), CryptoError> {
        find_program_address(seeds, program_id)
    }
}

fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hash `seeds` (bump already included) into an off-curve address.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Address, CryptoError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CryptoError::MaxSeedsExceeded {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(CryptoError::MaxSeedLengthExceeded {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let digest: [u8; 32] = hasher.finalize().into();
    if is_on_curve(&digest) {
        return Err(CryptoError::InvalidSeeds);
    }

    Ok(Address::new(digest))
}

/// Search bumps from 255 down to 0 and return the first viable address.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    // One slot is reserved for the bump
    if seeds.len() >= MAX_SEEDS {
        return Err(CryptoError::MaxSeedsExceeded {
            count: seeds.len() + 1,
            max: MAX_SEEDS,
        });
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut seeds_with_bump = seeds.to_vec();
        seeds_with_bump.push(&bump_seed);

        match create_program_address(&seeds_with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(CryptoError::InvalidSeeds) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(CryptoError::NoViableBump)
}

/// KycRegistry account for a mint
pub fn find_kyc_registry_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    mint: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[KYC_REGISTRY_SEED, mint.as_ref()], program_id)
}

/// WhitelistEntry account for a wallet
pub fn find_whitelist_entry_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    wallet: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[WHITELIST_SEED, wallet.as_ref()], program_id)
}

/// Transfer-hook extra account metas list for a mint
pub fn find_extra_account_meta_list_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    mint: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[EXTRA_ACCOUNT_METAS_SEED, mint.as_ref()], program_id)
}

/// Compliant pool registry for an authority
pub fn find_pool_registry_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    authority: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[POOL_REGISTRY_SEED, authority.as_ref()], program_id)
}

/// PoolComplianceEntry for an AMM within a registry
pub fn find_pool_entry_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    registry: &Address,
    amm: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[POOL_ENTRY_SEED, registry.as_ref(), amm.as_ref()], program_id)
}

/// Router compliance configuration for an authority
pub fn find_compliance_config_address<D: AddressDeriver + ?Sized>(
    deriver: &D,
    authority: &Address,
    program_id: &Address,
) -> Result<(Address, u8), CryptoError> {
    deriver.derive(&[COMPLIANCE_CONFIG_SEED, authority.as_ref()], program_id)
}
