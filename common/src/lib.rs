// Allow some clippy lints shared with the on-chain layout code
#![allow(clippy::module_inception)]
#![allow(clippy::upper_case_acronyms)]

pub mod codec;
pub mod compliance;
pub mod config;
pub mod crypto;
pub mod kyc;
pub mod pool;
pub mod serializer;
pub mod time;
