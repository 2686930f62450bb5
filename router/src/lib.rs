pub mod cache;
pub mod checker;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logger;
pub mod pool_index;
pub mod proof;

pub use cache::{EntryCache, EntryLookup};
pub use checker::KycComplianceChecker;
pub use config::RouterConfig;
pub use error::{LedgerError, LedgerResult};
pub use ledger::{AccountFilter, KeyedAccount, LedgerReader, MemoryLedger};
pub use pool_index::{PoolSnapshot, PoolWhitelistIndex, RouteComplianceResult};
pub use proof::{
    ComplianceProof, ComplianceProofAdapter, ComplianceWitness, ProofBackend, ProofOutcome,
    VerificationFailure, VerificationResult,
};
