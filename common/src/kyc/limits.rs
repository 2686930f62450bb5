// Trade limits by KYC level
// Amounts are in the stablecoin's smallest unit (6 decimals)

use super::KycLevel;

/// Length of the rolling daily volume window
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Default per-transaction trade limit for a KYC level
pub const fn trade_limit_for_level(level: KycLevel) -> u64 {
    match level {
        KycLevel::Basic => 100_000_000_000,            // 100,000 JPY
        KycLevel::Standard => 10_000_000_000_000,      // 10,000,000 JPY
        KycLevel::Enhanced => 100_000_000_000_000,     // 100,000,000 JPY
        KycLevel::Institutional => u64::MAX,           // No limit
    }
}
