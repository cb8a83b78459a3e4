//! Key material produced by a completed DKG session: a participant's secret
//! share, their public verification share, and the group's joint public key
//! (spec §4.3 round 3, §3 `ThresholdParameters`).

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::Field;
use k256::ProjectivePoint;
use serde::{Deserialize, Serialize};

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;
use crate::polynomial::FeldmanCommitment;
use crate::primitives::scalar::SecretScalar;

/// The `(n, t)` of a threshold signing group: `n` participants, any `t` of
/// whom can produce a valid group signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdParameters {
    pub n: u32,
    pub t: u32,
}

impl ThresholdParameters {
    pub fn new(n: u32, t: u32) -> FrostResult<Self> {
        if t < 2 || t > n {
            return Err(FrostError::SubsetSizeMismatch { expected: t, actual: n });
        }
        Ok(ThresholdParameters { n, t })
    }
}

/// The public verification share of a single participant: any other
/// participant can recompute this from the public round-1 commitments alone,
/// without learning the corresponding secret share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndividualVerifyingKey {
    pub id: ParticipantId,
    pub share: ProjectivePoint,
}

impl IndividualVerifyingKey {
    /// Recomputes participant `id`'s verification share as
    /// `sum_j f_j(id) * G`, from every dealer's Feldman commitment.
    pub fn generate_from_commitments(
        id: &ParticipantId,
        commitments: &[(ParticipantId, FeldmanCommitment)],
    ) -> Self {
        let x = id.scalar();
        let mut share = ProjectivePoint::identity();

        for (_, commitment) in commitments {
            let mut term = ProjectivePoint::identity();
            let mut power = k256::Scalar::ONE;
            for point in &commitment.0 {
                term += *point * power;
                power *= x;
            }
            share += term;
        }

        IndividualVerifyingKey { id: id.clone(), share }
    }

    /// Checks `self.share` against a freshly recomputed value, i.e. a
    /// tamper check after receiving this key from an untrusted source.
    pub fn verify(&self, commitments: &[(ParticipantId, FeldmanCommitment)]) -> FrostResult<()> {
        let recomputed = Self::generate_from_commitments(&self.id, commitments);
        if recomputed.share == self.share {
            Ok(())
        } else {
            Err(FrostError::InconsistentShare {
                sender: self.id.to_string(),
            })
        }
    }
}

/// A completed participant's long-lived signing key material, as produced by
/// [`crate::dkg::DkgSession::round3`].
#[derive(Clone)]
pub struct KeyShare {
    pub id: ParticipantId,
    pub params: ThresholdParameters,
    pub secret_share: SecretScalar,
    pub verifying_share: ProjectivePoint,
    pub group_public_key: ProjectivePoint,
}

impl KeyShare {
    pub fn to_public(&self) -> IndividualVerifyingKey {
        IndividualVerifyingKey {
            id: self.id.clone(),
            share: self.verifying_share,
        }
    }
}

impl core::fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyShare")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("secret_share", &"SecretScalar(..)")
            .field("verifying_share", &self.verifying_share)
            .field("group_public_key", &self.group_public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;
    use k256::Scalar;
    use rand::rngs::OsRng;

    #[test]
    fn threshold_parameters_reject_degenerate_configs() {
        assert!(ThresholdParameters::new(5, 1).is_err());
        assert!(ThresholdParameters::new(5, 6).is_err());
        assert!(ThresholdParameters::new(5, 3).is_ok());
    }

    #[test]
    fn verifying_key_matches_secret_share() {
        let id = ParticipantId::new("1").unwrap();
        let poly = Polynomial::generate(Scalar::from(99u64), 3, &mut OsRng);
        let commitment = poly.commitments();
        let share = poly.evaluate_for(&id);

        let commitments = vec![(ParticipantId::new("99").unwrap(), commitment)];
        let verifying = IndividualVerifyingKey::generate_from_commitments(&id, &commitments);

        assert_eq!(verifying.share, ProjectivePoint::GENERATOR * share);
        assert!(verifying.verify(&commitments).is_ok());
    }
}
