// Time helpers for policy reference timestamps
//
// Ledger records store signed unix seconds. The wall clock is only used to
// fill in a policy's "now" when the caller does not supply one; evaluation
// itself always takes the reference time as an explicit input.

use std::time::{SystemTime, UNIX_EPOCH};

// Signed seconds timestamps, matching the on-chain i64 fields
pub type TimestampSeconds = i64;

// Return the current unix time in seconds
// A clock set before the epoch yields a negative value instead of panicking
pub fn get_current_time_in_seconds() -> TimestampSeconds {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as TimestampSeconds,
        Err(e) => -(e.duration().as_secs() as TimestampSeconds),
    }
}
