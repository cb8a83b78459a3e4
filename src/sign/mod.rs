//! Threshold Schnorr signing: turning a completed DKG [`crate::keys::KeyShare`]
//! and a batch of precomputed nonces into a signature share, and aggregating
//! `t` shares into a single group signature (spec §4.4, §4.5, §4.6).

pub mod binding;
pub mod precomputation;
pub mod profile;

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};

pub use binding::NonceCommitment;
pub use precomputation::{
    generate_commitment_share_lists, CommitmentShare, PublicCommitmentShareList,
    SecretCommitmentShareList,
};
pub use profile::{BtcProfile, EthProfile, Profile};

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;
use crate::keys::KeyShare;
use crate::polynomial::lagrange_coefficient;

/// A finished group Schnorr signature: `(R, s)` such that `s*G == R + c*P`
/// for the profile's challenge `c` over the profile-normalized key `P`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    pub r: ProjectivePoint,
    pub s: Scalar,
}

/// Computes this participant's signature share for `message`, given the
/// full set of signers' published nonce commitments for this session and
/// their identities (both including this participant).
pub fn sign_share<P: Profile>(
    profile: &P,
    id: &ParticipantId,
    message: &[u8],
    key_share: &KeyShare,
    nonce: &CommitmentShare,
    all_commitments: &[NonceCommitment],
    all_ids: &[ParticipantId],
) -> FrostResult<Scalar> {
    if all_ids.len() as u32 != key_share.params.t {
        return Err(FrostError::SubsetSizeMismatch {
            expected: key_share.params.t,
            actual: all_ids.len() as u32,
        });
    }

    let raw_nonce_point = binding::aggregate_nonce(message, all_commitments);
    let (r_for_challenge, nonce_sign) = profile.normalize_nonce(raw_nonce_point);
    let (key_for_challenge, key_sign, tweak) = profile.normalize_key(key_share.group_public_key);
    let c = profile.challenge(&r_for_challenge, &key_for_challenge, message);
    let lambda = lagrange_coefficient(id, all_ids)?;
    let rho = binding::binding_factor(id, message, all_commitments);

    let z = nonce_sign * (nonce.hiding.secret + rho * nonce.binding.secret)
        + lambda * c * (key_sign * *key_share.secret_share.value() + tweak);
    Ok(z)
}

/// Verifies a single signer's share against their publicly known
/// verification share, without needing their secret material.
#[allow(clippy::too_many_arguments)]
pub fn verify_share<P: Profile>(
    profile: &P,
    id: &ParticipantId,
    message: &[u8],
    share: &Scalar,
    verifying_share: &ProjectivePoint,
    group_public_key: &ProjectivePoint,
    all_commitments: &[NonceCommitment],
    all_ids: &[ParticipantId],
) -> FrostResult<()> {
    let my_commitment = all_commitments
        .iter()
        .find(|c| &c.id == id)
        .ok_or_else(|| FrostError::UnknownParticipant(id.to_string()))?;

    let raw_nonce_point = binding::aggregate_nonce(message, all_commitments);
    let (r_for_challenge, nonce_sign) = profile.normalize_nonce(raw_nonce_point);
    let (key_for_challenge, key_sign, tweak) = profile.normalize_key(*group_public_key);
    let c = profile.challenge(&r_for_challenge, &key_for_challenge, message);
    let lambda = lagrange_coefficient(id, all_ids)?;
    let rho = binding::binding_factor(id, message, all_commitments);

    let expected = (my_commitment.hiding + my_commitment.binding * rho) * nonce_sign
        + (*verifying_share * key_sign + ProjectivePoint::GENERATOR * tweak) * (lambda * c);

    if ProjectivePoint::GENERATOR * share == expected {
        Ok(())
    } else {
        Err(FrostError::SignatureShareInvalid {
            participant: id.to_string(),
        })
    }
}

/// Aggregates a `t`-sized set of signature shares into a group signature.
/// Does not itself verify the shares; callers should have already checked
/// each one with [`verify_share`], or be prepared to bisect a bad aggregate
/// with it after the fact.
pub fn aggregate<P: Profile>(
    profile: &P,
    message: &[u8],
    all_commitments: &[NonceCommitment],
    shares: &[Scalar],
) -> Signature {
    let raw_nonce_point = binding::aggregate_nonce(message, all_commitments);
    let (r, _sign) = profile.normalize_nonce(raw_nonce_point);
    let s = shares.iter().fold(Scalar::ZERO, |acc, z| acc + z);
    Signature { r, s }
}

/// Verifies a finished group signature against the group's public key.
pub fn verify_group_signature<P: Profile>(
    profile: &P,
    message: &[u8],
    group_public_key: &ProjectivePoint,
    signature: &Signature,
) -> FrostResult<()> {
    let (key_for_challenge, _key_sign, _tweak) = profile.normalize_key(*group_public_key);
    let c = profile.challenge(&signature.r, &key_for_challenge, message);
    let expected_r = ProjectivePoint::GENERATOR * signature.s - key_for_challenge * c;
    if expected_r == signature.r {
        Ok(())
    } else {
        Err(FrostError::SignatureShareInvalid {
            participant: "aggregate".to_string(),
        })
    }
}
