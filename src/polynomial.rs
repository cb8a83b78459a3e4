//! Shamir polynomials over the secp256k1 scalar field, Feldman verifiable
//! commitments, and Lagrange interpolation at arbitrary evaluation points
//! (spec §4.2).

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;

/// A degree `t - 1` polynomial over the scalar field, used to Shamir-share a
/// secret among `n` participants with threshold `t`.
#[derive(Clone)]
pub struct Polynomial {
    /// `coefficients[0]` is the secret itself; the rest are random.
    coefficients: Vec<Scalar>,
}

impl Polynomial {
    /// Builds a random polynomial of degree `threshold - 1` whose constant
    /// term is `secret`.
    pub fn generate(
        secret: Scalar,
        threshold: u32,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let mut coefficients = Vec::with_capacity(threshold as usize);
        coefficients.push(secret);
        for _ in 1..threshold {
            coefficients.push(Scalar::random(&mut *rng));
        }
        Polynomial { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn constant_term(&self) -> Scalar {
        self.coefficients[0]
    }

    /// Evaluates the polynomial at `x` via Horner's method.
    pub fn evaluate(&self, x: &Scalar) -> Scalar {
        let mut result = Scalar::ZERO;
        for coeff in self.coefficients.iter().rev() {
            result = result * x + coeff;
        }
        result
    }

    /// Evaluates the polynomial at a participant's identity scalar.
    pub fn evaluate_for(&self, id: &ParticipantId) -> Scalar {
        self.evaluate(&id.scalar())
    }

    /// Produces the Feldman verifiable-secret-sharing commitment: `G *
    /// coefficients[i]` for each coefficient, in ascending order.
    pub fn commitments(&self) -> FeldmanCommitment {
        FeldmanCommitment(
            self.coefficients
                .iter()
                .map(|c| ProjectivePoint::GENERATOR * c)
                .collect(),
        )
    }
}

impl Drop for Polynomial {
    fn drop(&mut self) {
        for c in self.coefficients.iter_mut() {
            c.zeroize();
        }
    }
}

/// The public commitment to a participant's secret polynomial: one point per
/// coefficient, broadcast in DKG round 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeldmanCommitment(pub Vec<ProjectivePoint>);

impl FeldmanCommitment {
    pub fn threshold(&self) -> usize {
        self.0.len()
    }

    /// The commitment to the constant term, i.e. the participant's
    /// contribution to the joint group public key.
    pub fn public_contribution(&self) -> ProjectivePoint {
        self.0[0]
    }

    /// Checks that `share_value * G == sum_k commitments[k] * x^k`, i.e. that
    /// a share a participant received is consistent with the broadcast
    /// commitment (spec §4.3 round 2 verification).
    pub fn verify_share(&self, x: &Scalar, share_value: &Scalar) -> FrostResult<()> {
        let mut expected = ProjectivePoint::identity();
        let mut power = Scalar::ONE;
        for point in &self.0 {
            expected += *point * power;
            power *= x;
        }
        let actual = ProjectivePoint::GENERATOR * share_value;
        if actual == expected {
            Ok(())
        } else {
            Err(FrostError::InconsistentShare {
                sender: String::new(),
            })
        }
    }
}

/// Computes the Lagrange coefficient for `my_id` within `all_ids`, i.e.
/// `prod_{j != i} x_j / (x_j - x_i)`, evaluated at `x = 0`.
pub fn lagrange_coefficient(
    my_id: &ParticipantId,
    all_ids: &[ParticipantId],
) -> FrostResult<Scalar> {
    let my_index = my_id.scalar();
    let mut numerator = Scalar::ONE;
    let mut denominator = Scalar::ONE;

    for other in all_ids {
        if other == my_id {
            continue;
        }
        let other_index = other.scalar();
        numerator *= other_index;
        denominator *= other_index - my_index;
    }

    if bool::from(denominator.is_zero()) {
        return Err(FrostError::DuplicateParticipant(my_id.to_string()));
    }

    Ok(numerator * denominator.invert().unwrap())
}

/// Reconstructs the shared secret from `t` (index, share) pairs via Lagrange
/// interpolation at `x = 0`. Exposed for testing and for any caller that
/// legitimately needs to recover the joint secret (e.g. disaster recovery);
/// not used on the normal signing path, which stays share-wise.
pub fn reconstruct_secret(shares: &[(ParticipantId, Scalar)]) -> FrostResult<Scalar> {
    let ids: Vec<ParticipantId> = shares.iter().map(|(id, _)| id.clone()).collect();
    let mut secret = Scalar::ZERO;
    for (id, share) in shares {
        let coeff = lagrange_coefficient(id, &ids)?;
        secret += coeff * share;
    }
    Ok(secret)
}
