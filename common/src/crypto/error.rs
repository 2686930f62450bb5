use thiserror::Error;

/// Errors produced while parsing addresses or deriving program addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Address string is not valid base58
    #[error("Invalid base58 address: {0}")]
    InvalidAddress(String),

    /// Decoded address has the wrong number of bytes
    #[error("Invalid address length: {len} bytes, expected: {expected} bytes")]
    InvalidAddressLength { len: usize, expected: usize },

    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Hash has invalid length
    #[error("Invalid hash length: {len} bytes, expected: {expected} bytes")]
    InvalidHashLength { len: usize, expected: usize },

    /// More seeds than a program address accepts
    #[error("Too many seeds: {count}, maximum: {max}")]
    MaxSeedsExceeded { count: usize, max: usize },

    /// A single seed is longer than allowed
    #[error("Seed too long: {len} bytes, maximum: {max} bytes")]
    MaxSeedLengthExceeded { len: usize, max: usize },

    /// The seeds hash to a point on the ed25519 curve
    #[error("Provided seeds do not result in a valid program address")]
    InvalidSeeds,

    /// No bump in 0..=255 produced an off-curve address
    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,
}
