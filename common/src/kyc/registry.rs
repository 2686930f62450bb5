// KycRegistry - per-mint registry account owned by the transfer-hook program

use crate::crypto::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

/// KYC registry for a stablecoin mint
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct KycRegistry {
    /// Registry authority (compliance officer)
    pub authority: Address,

    /// Associated stablecoin mint
    pub mint: Address,

    /// Total whitelisted wallets
    pub whitelist_count: u64,

    /// Is registry active
    pub is_active: bool,

    /// Require KYC for all transfers
    pub require_kyc: bool,

    /// Allow transfers between verified wallets only
    pub verified_only: bool,

    pub created_at: i64,

    pub updated_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl KycRegistry {
    /// Serialized size without the discriminator
    pub const SIZE: usize = 32 + 32 + 8 + 1 + 1 + 1 + 8 + 8 + 1;
}

impl Serializer for KycRegistry {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            authority: Address::read(reader)?,
            mint: Address::read(reader)?,
            whitelist_count: u64::read(reader)?,
            is_active: bool::read(reader)?,
            require_kyc: bool::read(reader)?,
            verified_only: bool::read(reader)?,
            created_at: i64::read(reader)?,
            updated_at: i64::read(reader)?,
            bump: u8::read(reader)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.authority.write(writer);
        self.mint.write(writer);
        self.whitelist_count.write(writer);
        self.is_active.write(writer);
        self.require_kyc.write(writer);
        self.verified_only.write(writer);
        self.created_at.write(writer);
        self.updated_at.write(writer);
        self.bump.write(writer);
    }

    fn size(&self) -> usize {
        Self::SIZE
    }
}
