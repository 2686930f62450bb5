//! Account record codec.
//!
//! Every account starts with an 8-byte discriminator identifying its layout,
//! followed by the positional fields of the record. Decoding only requires
//! the discriminator to be present; its value is not interpreted. Encoding
//! writes the `sha256("account:<Name>")[..8]` discriminator the programs use.

use sha2::{Digest, Sha256};

use crate::kyc::{KycRegistry, WhitelistEntry};
use crate::pool::PoolComplianceEntry;
use crate::serializer::{DecodeResult, Reader, Serializer, Writer};

pub const DISCRIMINATOR_SIZE: usize = 8;

/// Compute the layout discriminator for an account type name
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(b"account:");
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();

    let mut discriminator = [0u8; DISCRIMINATOR_SIZE];
    discriminator.copy_from_slice(&digest[..DISCRIMINATOR_SIZE]);
    discriminator
}

/// A record stored as a discriminator-prefixed ledger account
pub trait AccountRecord: Serializer {
    /// Type name the discriminator is derived from
    const ACCOUNT_NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_SIZE] {
        account_discriminator(Self::ACCOUNT_NAME)
    }

    /// Decode raw account data. Trailing bytes beyond the record are ignored.
    fn decode_account(data: &[u8]) -> DecodeResult<Self> {
        let mut reader = Reader::new(data);
        reader.skip(DISCRIMINATOR_SIZE)?;
        Self::read(&mut reader)
    }

    fn encode_account(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(DISCRIMINATOR_SIZE + self.size());
        writer.write_bytes(&Self::discriminator());
        self.write(&mut writer);
        writer.into_bytes()
    }
}

impl AccountRecord for WhitelistEntry {
    const ACCOUNT_NAME: &'static str = "WhitelistEntry";
}

impl AccountRecord for KycRegistry {
    const ACCOUNT_NAME: &'static str = "KycRegistry";
}

impl AccountRecord for PoolComplianceEntry {
    const ACCOUNT_NAME: &'static str = "PoolComplianceEntry";
}

pub fn decode_whitelist_entry(data: &[u8]) -> DecodeResult<WhitelistEntry> {
    WhitelistEntry::decode_account(data)
}

pub fn decode_kyc_registry(data: &[u8]) -> DecodeResult<KycRegistry> {
    KycRegistry::decode_account(data)
}

pub fn decode_pool_entry(data: &[u8]) -> DecodeResult<PoolComplianceEntry> {
    PoolComplianceEntry::decode_account(data)
}

pub fn encode_whitelist_entry(entry: &WhitelistEntry) -> Vec<u8> {
    entry.encode_account()
}

pub fn encode_kyc_registry(registry: &KycRegistry) -> Vec<u8> {
    registry.encode_account()
}

pub fn encode_pool_entry(entry: &PoolComplianceEntry) -> Vec<u8> {
    entry.encode_account()
}
