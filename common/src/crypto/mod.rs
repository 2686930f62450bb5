mod address;
mod hash;

pub mod error;
pub mod pda;

pub use address::*;
pub use error::CryptoError;
pub use hash::*;
pub use pda::{AddressDeriver, ProgramAddressDeriver};
