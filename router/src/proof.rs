// Compliance Proof Adapter
// Marshals compliance data to and from an optional zero-knowledge proof backend

use std::sync::Arc;

use accredit_common::{
    compliance::CompliancePolicy,
    config::{COMMITMENT_SIZE, KYC_COMPLIANCE_CIRCUIT_ID},
    crypto::Hash,
    kyc::{Jurisdiction, KycLevel, WhitelistEntry},
};
use async_trait::async_trait;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RouterConfig;

/// Failure reported by a backend while generating a proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Prover error: {0}")]
pub struct ProverError(pub String);

/// Failure reported by a backend while verifying a proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Verifier error: {0}")]
pub struct VerifierError(pub String);

/// Value assigned to a circuit input
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum WitnessValue {
    Integer(i128),
    Bytes(Vec<u8>),
}

/// Circuit inputs by name, in declaration order
pub type WitnessMap = IndexMap<String, WitnessValue>;

/// Proof bytes and public inputs as produced by a backend
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GeneratedProof {
    pub proof: Vec<u8>,
    pub public_inputs: Vec<Vec<u8>>,
}

/// Zero-knowledge proving system
#[async_trait]
pub trait ProofBackend: Send + Sync {
    async fn generate_proof(
        &self,
        circuit_id: &str,
        witness: &WitnessMap,
    ) -> Result<GeneratedProof, ProverError>;

    async fn verify_proof(
        &self,
        proof: &[u8],
        public_inputs: &[Vec<u8>],
        circuit_id: &str,
    ) -> Result<bool, VerifierError>;
}

/// Private inputs of the compliance circuit: exactly what the
/// policy evaluator reads from an entry and a policy.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ComplianceWitness {
    pub kyc_level: KycLevel,
    pub jurisdiction: Jurisdiction,
    pub expiry_timestamp: i64,
    pub min_kyc_level: KycLevel,
    pub jurisdiction_bitmask: u32,
    pub current_timestamp: i64,
    pub kyc_hash: Hash,
}

impl ComplianceWitness {
    pub fn new(entry: &WhitelistEntry, policy: &CompliancePolicy) -> Self {
        Self {
            kyc_level: entry.kyc_level,
            jurisdiction: entry.jurisdiction,
            expiry_timestamp: entry.expiry_timestamp,
            min_kyc_level: policy.min_kyc_level,
            jurisdiction_bitmask: policy.allowed_jurisdiction_bitmask,
            current_timestamp: policy.now,
            kyc_hash: entry.kyc_hash,
        }
    }

    /// Statement the circuit attests: not expired, level high enough and
    /// jurisdiction allowed. The active flag is not part of the witness.
    pub fn statement_holds(&self) -> bool {
        let not_expired =
            self.expiry_timestamp == 0 || self.current_timestamp <= self.expiry_timestamp;
        not_expired
            && self.kyc_level >= self.min_kyc_level
            && self.jurisdiction.is_in_bitmask(self.jurisdiction_bitmask)
    }

    pub fn to_witness_map(&self) -> WitnessMap {
        let mut map = WitnessMap::with_capacity(7);
        map.insert(
            "kyc_level".to_string(),
            WitnessValue::Integer(self.kyc_level.to_u8().into()),
        );
        map.insert(
            "jurisdiction".to_string(),
            WitnessValue::Integer(self.jurisdiction.to_u8().into()),
        );
        map.insert(
            "expiry_timestamp".to_string(),
            WitnessValue::Integer(self.expiry_timestamp.into()),
        );
        map.insert(
            "min_kyc_level".to_string(),
            WitnessValue::Integer(self.min_kyc_level.to_u8().into()),
        );
        map.insert(
            "jurisdiction_bitmask".to_string(),
            WitnessValue::Integer(self.jurisdiction_bitmask.into()),
        );
        map.insert(
            "current_timestamp".to_string(),
            WitnessValue::Integer(self.current_timestamp.into()),
        );
        map.insert(
            "kyc_hash".to_string(),
            WitnessValue::Bytes(self.kyc_hash.as_bytes().to_vec()),
        );
        map
    }
}

/// Proof that a wallet satisfies a compliance policy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ComplianceProof {
    pub proof: Vec<u8>,
    pub public_inputs: Vec<Vec<u8>>,
    pub circuit_id: String,
    /// Public input 0
    pub kyc_level_commitment: Vec<u8>,
    /// Public input 1
    pub jurisdiction_commitment: Vec<u8>,
}

impl ComplianceProof {
    fn from_generated(generated: GeneratedProof, circuit_id: &str) -> Self {
        let commitment = |index: usize| {
            generated
                .public_inputs
                .get(index)
                .cloned()
                .unwrap_or_else(|| vec![0u8; COMMITMENT_SIZE])
        };
        let kyc_level_commitment = commitment(0);
        let jurisdiction_commitment = commitment(1);

        Self {
            proof: generated.proof,
            public_inputs: generated.public_inputs,
            circuit_id: circuit_id.to_string(),
            kyc_level_commitment,
            jurisdiction_commitment,
        }
    }
}

/// Result of asking for a compliance proof
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofOutcome {
    /// No backend is configured
    Unavailable,
    Proved(ComplianceProof),
    Failed(ProverError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    #[error("ZK verification not available")]
    Unavailable,
    #[error(transparent)]
    Backend(#[from] VerifierError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub valid: bool,
    pub failure: Option<VerificationFailure>,
}

impl VerificationResult {
    fn checked(valid: bool) -> Self {
        Self {
            valid,
            failure: None,
        }
    }

    fn failed(failure: VerificationFailure) -> Self {
        Self {
            valid: false,
            failure: Some(failure),
        }
    }

    /// True when no backend answered and the caller should evaluate directly
    pub fn is_unavailable(&self) -> bool {
        matches!(self.failure, Some(VerificationFailure::Unavailable))
    }
}

/// Bridges the compliance data model and an optional proof backend.
/// Never fails the caller: missing or failing backends are reported as values.
pub struct ComplianceProofAdapter {
    backend: Option<Arc<dyn ProofBackend>>,
    circuit_id: String,
}

impl ComplianceProofAdapter {
    pub fn new(backend: Option<Arc<dyn ProofBackend>>) -> Self {
        Self {
            backend,
            circuit_id: KYC_COMPLIANCE_CIRCUIT_ID.to_string(),
        }
    }

    pub fn with_backend(backend: Arc<dyn ProofBackend>) -> Self {
        Self::new(Some(backend))
    }

    /// Adapter without a backend: every request reports unavailability
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Adapter proving against the circuit named in `config`
    pub fn from_config(backend: Option<Arc<dyn ProofBackend>>, config: &RouterConfig) -> Self {
        Self::new(backend).with_circuit_id(config.circuit_id.clone())
    }

    /// Prove against another circuit than the default one
    pub fn with_circuit_id(mut self, circuit_id: impl Into<String>) -> Self {
        self.circuit_id = circuit_id.into();
        self
    }

    pub fn is_zk_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub fn circuit_id(&self) -> &str {
        &self.circuit_id
    }

    pub async fn prove_compliance(&self, witness: &ComplianceWitness) -> ProofOutcome {
        let Some(backend) = &self.backend else {
            return ProofOutcome::Unavailable;
        };

        debug!("generating {} proof", self.circuit_id);
        match backend
            .generate_proof(&self.circuit_id, &witness.to_witness_map())
            .await
        {
            Ok(generated) => {
                ProofOutcome::Proved(ComplianceProof::from_generated(generated, &self.circuit_id))
            }
            Err(e) => {
                warn!("{} proof generation failed: {}", self.circuit_id, e);
                ProofOutcome::Failed(e)
            }
        }
    }

    /// Verify a proof against the circuit it names
    pub async fn verify_proof(&self, proof: &ComplianceProof) -> VerificationResult {
        let Some(backend) = &self.backend else {
            return VerificationResult::failed(VerificationFailure::Unavailable);
        };

        match backend
            .verify_proof(&proof.proof, &proof.public_inputs, &proof.circuit_id)
            .await
        {
            Ok(valid) => VerificationResult::checked(valid),
            Err(e) => {
                warn!("{} proof verification failed: {}", proof.circuit_id, e);
                VerificationResult::failed(e.into())
            }
        }
    }
}

impl Default for ComplianceProofAdapter {
    fn default() -> Self {
        Self::disabled()
    }
}
