//! The round-1 broadcast message: a participant's Feldman commitment, their
//! Diffie-Hellman public key, and proofs of possession of both secrets
//! (spec §4.3 round 1).

use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};

use crate::error::FrostResult;
use crate::id::ParticipantId;
use crate::polynomial::FeldmanCommitment;
use crate::primitives::schnorr::SchnorrProof;

/// Binds a proof of possession to the tag identifying which secret it's
/// over, the participant claiming it, and the DKG session it was made in, so
/// a PoP produced for one session can't be replayed into another.
fn pop_context(tag: &[u8], dkg_id: &str, participant: &ParticipantId) -> Vec<u8> {
    let mut ctx = Vec::with_capacity(tag.len() + dkg_id.len() + participant.as_str().len() + 2);
    ctx.extend_from_slice(tag);
    ctx.push(b':');
    ctx.extend_from_slice(dkg_id.as_bytes());
    ctx.push(b':');
    ctx.extend_from_slice(participant.as_str().as_bytes());
    ctx
}

/// What every participant broadcasts to every other participant at the start
/// of a DKG session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round1Broadcast {
    pub id: ParticipantId,
    pub dh_public_key: ProjectivePoint,
    pub commitment: FeldmanCommitment,
    pub proof_of_secret_key: SchnorrProof,
    pub proof_of_dh_key: SchnorrProof,
}

impl Round1Broadcast {
    /// Builds this participant's broadcast from their freshly generated
    /// secret polynomial and DH keypair. `dkg_id` identifies the DKG session
    /// these proofs of possession are scoped to.
    pub fn new(
        dkg_id: &str,
        id: ParticipantId,
        dh_private_key: &Scalar,
        dh_public_key: ProjectivePoint,
        commitment: FeldmanCommitment,
        secret_term: &Scalar,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let public_contribution = commitment.public_contribution();

        let proof_of_secret_key = SchnorrProof::prove(
            &pop_context(b"frost-tss-pop-secret", dkg_id, &id),
            secret_term,
            &public_contribution,
            rng,
        );
        let proof_of_dh_key = SchnorrProof::prove(
            &pop_context(b"frost-tss-pop-dh", dkg_id, &id),
            dh_private_key,
            &dh_public_key,
            rng,
        );

        Round1Broadcast {
            id,
            dh_public_key,
            commitment,
            proof_of_secret_key,
            proof_of_dh_key,
        }
    }

    /// Verifies both proofs of possession carried by this broadcast against
    /// the DKG session they were claimed to belong to.
    pub fn verify(&self, dkg_id: &str) -> FrostResult<()> {
        self.proof_of_secret_key.verify(
            &pop_context(b"frost-tss-pop-secret", dkg_id, &self.id),
            &self.commitment.public_contribution(),
        )?;
        self.proof_of_dh_key.verify(
            &pop_context(b"frost-tss-pop-dh", dkg_id, &self.id),
            &self.dh_public_key,
        )?;
        Ok(())
    }
}
