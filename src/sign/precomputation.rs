//! Precomputation for one-round signing: each participant publishes a batch
//! of hiding/binding nonce commitments ahead of time, so that the signing
//! round itself needs no interaction beyond exchanging signature shares
//! (spec §4.4).

use k256::elliptic_curve::group::Group;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::id::ParticipantId;

/// A hiding/binding pair of secret nonces, `(d, e)` in the FROST paper.
struct NoncePair(Scalar, Scalar);

impl NoncePair {
    fn new(rng: &mut (impl RngCore + CryptoRng)) -> Self {
        NoncePair(Scalar::random(&mut *rng), Scalar::random(rng))
    }
}

impl Drop for NoncePair {
    fn drop(&mut self) {
        self.0.zeroize();
        self.1.zeroize();
    }
}

/// A secret nonce paired with its public commitment.
#[derive(Clone)]
pub(crate) struct Commitment {
    pub(crate) secret: Scalar,
    pub(crate) commit: ProjectivePoint,
}

impl Zeroize for Commitment {
    fn zeroize(&mut self) {
        self.secret.zeroize();
        self.commit = ProjectivePoint::identity();
    }
}

impl Drop for Commitment {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PartialEq for Commitment {
    fn eq(&self, other: &Self) -> bool {
        self.secret == other.secret && self.commit == other.commit
    }
}

/// A precomputed hiding/binding commitment share: `(d_ij, D_ij)` and `(e_ij,
/// E_ij)` in the FROST paper.
#[derive(Clone, PartialEq)]
pub struct CommitmentShare {
    pub(crate) hiding: Commitment,
    pub(crate) binding: Commitment,
}

impl From<NoncePair> for CommitmentShare {
    fn from(pair: NoncePair) -> Self {
        let hiding_commit = ProjectivePoint::GENERATOR * pair.0;
        let binding_commit = ProjectivePoint::GENERATOR * pair.1;
        CommitmentShare {
            hiding: Commitment {
                secret: pair.0,
                commit: hiding_commit,
            },
            binding: Commitment {
                secret: pair.1,
                commit: binding_commit,
            },
        }
    }
}

impl CommitmentShare {
    /// The public half of this commitment share, safe to publish.
    pub fn publish(&self) -> (ProjectivePoint, ProjectivePoint) {
        (self.hiding.commit, self.binding.commit)
    }
}

/// The secret commitment shares a participant holds, matched one-to-one with
/// the [`PublicCommitmentShareList`] they have published.
#[derive(Clone, PartialEq)]
pub struct SecretCommitmentShareList {
    pub commitments: Vec<CommitmentShare>,
}

/// The published, public half of a participant's precomputed commitments.
#[derive(Clone, PartialEq)]
pub struct PublicCommitmentShareList {
    pub id: ParticipantId,
    pub commitments: Vec<(ProjectivePoint, ProjectivePoint)>,
}

/// Precomputes `number_of_shares` hiding/binding commitment shares for
/// `id`, returning the public list to publish and the secret list to keep.
pub fn generate_commitment_share_lists(
    rng: &mut (impl RngCore + CryptoRng),
    id: ParticipantId,
    number_of_shares: usize,
) -> (PublicCommitmentShareList, SecretCommitmentShareList) {
    let commitments: Vec<CommitmentShare> = (0..number_of_shares)
        .map(|_| CommitmentShare::from(NoncePair::new(rng)))
        .collect();

    let published = commitments.iter().map(CommitmentShare::publish).collect();

    (
        PublicCommitmentShareList { id, commitments: published },
        SecretCommitmentShareList { commitments },
    )
}

impl SecretCommitmentShareList {
    /// Removes a used commitment share from the list so it cannot be reused
    /// for a second signature (spec §4.4 nonce-reuse invariant).
    pub fn drop_share(&mut self, share: &CommitmentShare) {
        if let Some(index) = self.commitments.iter().position(|s| s == share) {
            self.commitments.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn commitment_share_publishes_consistent_points() {
        let share = CommitmentShare::from(NoncePair::new(&mut OsRng));
        let (hiding_pub, binding_pub) = share.publish();
        assert_eq!(hiding_pub, ProjectivePoint::GENERATOR * share.hiding.secret);
        assert_eq!(binding_pub, ProjectivePoint::GENERATOR * share.binding.secret);
    }

    #[test]
    fn generate_and_drop_share() {
        let id = ParticipantId::new("3").unwrap();
        let (public_list, mut secret_list) = generate_commitment_share_lists(&mut OsRng, id, 8);
        assert_eq!(secret_list.commitments.len(), 8);
        assert_eq!(public_list.commitments.len(), 8);

        let used = secret_list.commitments[0].clone();
        secret_list.drop_share(&used);
        assert_eq!(secret_list.commitments.len(), 7);
    }
}
