// KYC records mirrored from the transfer-hook program
//
// - WhitelistEntry: one per wallet, asserts the wallet's KYC status
// - KycRegistry: one per mint
// - Level and jurisdiction enums are single-byte ordinals on-chain

mod jurisdiction;
mod level;
mod limits;
mod registry;
mod whitelist;

pub use jurisdiction::*;
pub use level::*;
pub use limits::*;
pub use registry::*;
pub use whitelist::*;
