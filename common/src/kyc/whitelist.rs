// WhitelistEntry - per-wallet KYC record owned by the transfer-hook program
//
// Read-only snapshot: the program is the only writer of the account, this
// crate decodes it and answers questions about it without mutating it.

use crate::crypto::{Address, Hash};
use crate::kyc::{trade_limit_for_level, Jurisdiction, KycLevel, SECONDS_PER_DAY};
use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::{Deserialize, Serialize};

/// Whitelist entry for a verified wallet
///
/// Layout after the discriminator (156 bytes):
/// wallet (32), registry (32), kyc_level (1), jurisdiction (1), kyc_hash (32),
/// is_active (1), daily_limit (8), daily_volume (8), volume_reset_time (8),
/// verified_at (8), expiry_timestamp (8), last_activity (8), created_at (8), bump (1)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WhitelistEntry {
    /// Wallet address
    pub wallet: Address,

    /// Associated KYC registry
    pub registry: Address,

    /// KYC verification level
    pub kyc_level: KycLevel,

    /// User's jurisdiction
    pub jurisdiction: Jurisdiction,

    /// Encrypted KYC data hash
    pub kyc_hash: Hash,

    /// Is entry active
    pub is_active: bool,

    /// Daily transaction limit (0 = unlimited)
    pub daily_limit: u64,

    /// Accumulated daily volume
    pub daily_volume: u64,

    /// Last volume reset timestamp
    pub volume_reset_time: i64,

    /// Verification timestamp
    pub verified_at: i64,

    /// Expiry timestamp (0 = never expires)
    pub expiry_timestamp: i64,

    /// Last activity timestamp
    pub last_activity: i64,

    /// Creation timestamp
    pub created_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl WhitelistEntry {
    /// Serialized size without the discriminator
    pub const SIZE: usize = 32 + 32 + 1 + 1 + 32 + 1 + 8 + 8 + 8 + 8 + 8 + 8 + 8 + 1;

    /// Check if the expiry has passed at `current_time`
    /// `expiry_timestamp == 0` never expires; the expiry second itself is still valid
    #[inline]
    pub fn is_expired(&self, current_time: i64) -> bool {
        self.expiry_timestamp != 0 && current_time > self.expiry_timestamp
    }

    /// On-chain transfer rule: active and strictly before expiry
    pub fn is_valid(&self, current_time: i64) -> bool {
        self.is_active && (self.expiry_timestamp == 0 || current_time < self.expiry_timestamp)
    }

    /// Volume counted against today's limit
    /// Resets once a full day has passed since the last reset
    pub fn effective_daily_volume(&self, current_time: i64) -> u64 {
        if current_time.saturating_sub(self.volume_reset_time) >= SECONDS_PER_DAY {
            0
        } else {
            self.daily_volume
        }
    }

    /// Remaining allowance for today, `u64::MAX` when unlimited
    pub fn remaining_daily_allowance(&self, current_time: i64) -> u64 {
        if self.daily_limit == 0 {
            return u64::MAX;
        }
        self.daily_limit
            .saturating_sub(self.effective_daily_volume(current_time))
    }

    /// Check if a transfer of `amount` fits within the daily limit
    pub fn can_transfer(&self, amount: u64, current_time: i64) -> bool {
        if !self.is_valid(current_time) {
            return false;
        }
        if self.daily_limit == 0 {
            return true;
        }

        self.effective_daily_volume(current_time)
            .saturating_add(amount)
            <= self.daily_limit
    }

    /// Default per-transaction limit for this entry's level
    #[inline]
    pub fn per_trade_limit(&self) -> u64 {
        trade_limit_for_level(self.kyc_level)
    }
}

impl Serializer for WhitelistEntry {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            wallet: Address::read(reader)?,
            registry: Address::read(reader)?,
            kyc_level: KycLevel::read(reader)?,
            jurisdiction: Jurisdiction::read(reader)?,
            kyc_hash: Hash::read(reader)?,
            is_active: bool::read(reader)?,
            daily_limit: u64::read(reader)?,
            daily_volume: u64::read(reader)?,
            volume_reset_time: i64::read(reader)?,
            verified_at: i64::read(reader)?,
            expiry_timestamp: i64::read(reader)?,
            last_activity: i64::read(reader)?,
            created_at: i64::read(reader)?,
            bump: u8::read(reader)?,
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.wallet.write(writer);
        self.registry.write(writer);
        self.kyc_level.write(writer);
        self.jurisdiction.write(writer);
        self.kyc_hash.write(writer);
        self.is_active.write(writer);
        self.daily_limit.write(writer);
        self.daily_volume.write(writer);
        self.volume_reset_time.write(writer);
        self.verified_at.write(writer);
        self.expiry_timestamp.write(writer);
        self.last_activity.write(writer);
        self.created_at.write(writer);
        self.bump.write(writer);
    }

    fn size(&self) -> usize {
        Self::SIZE
    }
}
