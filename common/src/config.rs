pub const VERSION: &str = env!("BUILD_VERSION");

// Circuit proving wallet compliance without revealing level or jurisdiction
pub const KYC_COMPLIANCE_CIRCUIT_ID: &str = "kyc_compliance";

// Size of the commitment placeholders when a backend returns fewer public inputs
pub const COMMITMENT_SIZE: usize = 32;
