//! A generic, profile-independent Schnorr proof of knowledge, used for DKG
//! round-1 proofs of possession and for complaint proofs (spec §4.3, §4.3.1).
//!
//! This is deliberately independent of the ETH/BTC signing profiles: a DKG
//! session mixes participants who will later sign under either profile, so
//! its internal proofs use a plain domain-separated SHA-256 challenge rather
//! than either profile's message-signature challenge.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::{FrostError, FrostResult};
use crate::primitives::point::compress;
use crate::primitives::scalar::scalar_from_digest;

/// A non-interactive Schnorr proof of knowledge of the discrete log of a
/// public point, bound to an arbitrary `context` byte string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchnorrProof {
    pub nonce_commitment: ProjectivePoint,
    pub s: Scalar,
}

fn challenge(context: &[u8], nonce_commitment: &ProjectivePoint, public: &ProjectivePoint) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(context);
    hasher.update(compress(nonce_commitment));
    hasher.update(compress(public));
    let digest: [u8; 32] = hasher.finalize().into();
    scalar_from_digest(&digest)
}

impl SchnorrProof {
    /// Proves knowledge of `secret`, where `public = secret * G`.
    pub fn prove(
        context: &[u8],
        secret: &Scalar,
        public: &ProjectivePoint,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let nonce = Scalar::random(&mut *rng);
        let nonce_commitment = ProjectivePoint::GENERATOR * nonce;
        let e = challenge(context, &nonce_commitment, public);
        let s = nonce - e * secret;
        SchnorrProof {
            nonce_commitment,
            s,
        }
    }

    /// Verifies this proof against the claimed public point.
    pub fn verify(&self, context: &[u8], public: &ProjectivePoint) -> FrostResult<()> {
        let e = challenge(context, &self.nonce_commitment, public);
        let expected = ProjectivePoint::GENERATOR * self.s + *public * e;
        if expected == self.nonce_commitment {
            Ok(())
        } else {
            Err(FrostError::InvalidProof {
                participant: String::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn proof_round_trips() {
        let secret = Scalar::random(&mut OsRng);
        let public = ProjectivePoint::GENERATOR * secret;
        let proof = SchnorrProof::prove(b"ctx", &secret, &public, &mut OsRng);
        assert!(proof.verify(b"ctx", &public).is_ok());
    }

    #[test]
    fn wrong_context_fails() {
        let secret = Scalar::random(&mut OsRng);
        let public = ProjectivePoint::GENERATOR * secret;
        let proof = SchnorrProof::prove(b"ctx-a", &secret, &public, &mut OsRng);
        assert!(proof.verify(b"ctx-b", &public).is_err());
    }

    #[test]
    fn tampered_proof_fails() {
        let secret = Scalar::random(&mut OsRng);
        let public = ProjectivePoint::GENERATOR * secret;
        let mut proof = SchnorrProof::prove(b"ctx", &secret, &public, &mut OsRng);
        proof.s += Scalar::from(1u64);
        assert!(proof.verify(b"ctx", &public).is_err());
    }
}
