//! FROST's per-signer binding factor: binds every signer's nonce commitments
//! to the message and to each other, preventing a Drijvers-style forgery
//! that reuses leaked nonces across a signing session (spec §4.4).

use k256::elliptic_curve::group::Group;
use k256::{ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::id::ParticipantId;
use crate::primitives::point::compress;
use crate::primitives::scalar::scalar_from_digest;

/// One signer's published hiding/binding nonce commitments for this session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonceCommitment {
    pub id: ParticipantId,
    pub hiding: ProjectivePoint,
    pub binding: ProjectivePoint,
}

/// `h_L = SHA256(JSON(L))`: a single hash over the whole commitment list, in
/// the caller-supplied order. Every signer must agree on `L` byte-for-byte;
/// reordering it changes every binding factor.
fn commitment_list_digest(commitments: &[NonceCommitment]) -> [u8; 32] {
    let l: Vec<serde_json::Value> = commitments
        .iter()
        .map(|c| {
            serde_json::json!({
                "id": c.id.as_str(),
                "hiding": hex::encode(compress(&c.hiding)),
                "binding": hex::encode(compress(&c.binding)),
            })
        })
        .collect();
    let encoded = serde_json::to_vec(&l).expect("commitment list is always serializable");
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    hasher.finalize().into()
}

/// `rho_k = SHA256(be32(id_k) || message || h_L) mod n`, binding signer `id`'s
/// contribution to this exact message and commitment list.
pub fn binding_factor(
    id: &ParticipantId,
    message: &[u8],
    commitments: &[NonceCommitment],
) -> Scalar {
    let h_l = commitment_list_digest(commitments);
    let mut hasher = Sha256::new();
    hasher.update(id.scalar().to_bytes());
    hasher.update(message);
    hasher.update(h_l);
    let digest: [u8; 32] = hasher.finalize().into();
    scalar_from_digest(&digest)
}

/// The raw (not yet profile-normalized) aggregated nonce point
/// `sum_i (D_i + rho_i * E_i)`.
pub fn aggregate_nonce(message: &[u8], commitments: &[NonceCommitment]) -> ProjectivePoint {
    let mut total = ProjectivePoint::identity();
    for c in commitments {
        let rho = binding_factor(&c.id, message, commitments);
        total += c.hiding + c.binding * rho;
    }
    total
}
