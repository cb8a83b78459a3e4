//! Complaint proofs: when a participant's round-3 Feldman check on an
//! encrypted share fails, they can publish a complaint that proves *which*
//! Diffie-Hellman key they used to decrypt, without revealing their DH
//! private key (spec §4.3.1).
//!
//! This is a Chaum-Pedersen equality-of-discrete-logs proof: the accuser
//! proves, in one shot, that their own DH public key and the pairwise DH
//! point they computed share the same private exponent.

use k256::elliptic_curve::group::{Group, GroupEncoding};
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;
use crate::primitives::point::compress;
use crate::primitives::scalar::scalar_from_digest;

/// Published by an accusing participant against the sender of a share that
/// failed its Feldman check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Complaint {
    pub accuser: ParticipantId,
    pub accused: ParticipantId,
    /// The accuser's DH public key, repeated here for convenience.
    pub accuser_dh_public: ProjectivePoint,
    /// The joint DH point `accuser_dh_private * accused_dh_public`, which
    /// every other participant can use to decrypt the disputed share
    /// themselves and confirm whether the complaint is justified.
    pub joint_point: ProjectivePoint,
    pub r1: ProjectivePoint,
    pub r2: ProjectivePoint,
    pub s: Scalar,
}

fn challenge(
    accuser: &ParticipantId,
    accused: &ParticipantId,
    accuser_dh_public: &ProjectivePoint,
    accused_dh_public: &ProjectivePoint,
    joint_point: &ProjectivePoint,
    r1: &ProjectivePoint,
    r2: &ProjectivePoint,
) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(b"frost-tss-complaint-v1");
    hasher.update(accuser.as_str().as_bytes());
    hasher.update(accused.as_str().as_bytes());
    hasher.update(compress(accuser_dh_public));
    hasher.update(compress(accused_dh_public));
    hasher.update(compress(joint_point));
    hasher.update(compress(r1));
    hasher.update(compress(r2));
    let digest: [u8; 32] = hasher.finalize().into();
    scalar_from_digest(&digest)
}

impl Complaint {
    /// Builds a complaint from `accuser` against `accused`, proving that
    /// `joint_point = accuser_dh_private * accused_dh_public` using the same
    /// exponent as `accuser_dh_public = accuser_dh_private * G`.
    pub fn new(
        accuser: ParticipantId,
        accused: ParticipantId,
        accuser_dh_private: &Scalar,
        accuser_dh_public: ProjectivePoint,
        accused_dh_public: ProjectivePoint,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let joint_point = accused_dh_public * accuser_dh_private;

        let nonce = Scalar::random(&mut *rng);
        let r1 = ProjectivePoint::GENERATOR * nonce;
        let r2 = accused_dh_public * nonce;

        let e = challenge(
            &accuser,
            &accused,
            &accuser_dh_public,
            &accused_dh_public,
            &joint_point,
            &r1,
            &r2,
        );
        let s = nonce + e * accuser_dh_private;

        Complaint {
            accuser,
            accused,
            accuser_dh_public,
            joint_point,
            r1,
            r2,
            s,
        }
    }

    /// Verifies the dual Chaum-Pedersen equations, given the accused's
    /// publicly known DH public key.
    pub fn verify(&self, accused_dh_public: &ProjectivePoint) -> FrostResult<()> {
        if self.accuser_dh_public.to_bytes() == ProjectivePoint::identity().to_bytes() {
            return Err(FrostError::PointNotOnCurve);
        }

        let e = challenge(
            &self.accuser,
            &self.accused,
            &self.accuser_dh_public,
            accused_dh_public,
            &self.joint_point,
            &self.r1,
            &self.r2,
        );

        let lhs1 = ProjectivePoint::GENERATOR * self.s;
        let rhs1 = self.r1 + self.accuser_dh_public * e;

        let lhs2 = *accused_dh_public * self.s;
        let rhs2 = self.r2 + self.joint_point * e;

        if lhs1 == rhs1 && lhs2 == rhs2 {
            Ok(())
        } else {
            Err(FrostError::InvalidProof {
                participant: self.accuser.to_string(),
            })
        }
    }
}
