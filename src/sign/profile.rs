//! Signing profiles: the two concrete Schnorr challenge conventions this
//! crate's FROST core can produce signatures for (spec §4.5, §4.6).
//!
//! Every profile boils down to three knobs on top of the same underlying
//! FROST arithmetic: how the challenge hash is computed, whether the
//! aggregated nonce point needs a sign flip before hashing, and whether the
//! group public key needs a sign flip and/or an additive tweak. A signer who
//! applies `normalize_key`'s `(sign, tweak)` to their own share and the same
//! `normalize_nonce` sign to their own nonce contribution produces a share
//! that aggregates correctly under the corresponding verification equation.

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};

use crate::primitives::{btc, eth};

/// A concrete Schnorr signing convention layered on top of FROST.
pub trait Profile {
    /// The Schnorr challenge `e` for this profile's hash convention.
    fn challenge(&self, nonce: &ProjectivePoint, group_key: &ProjectivePoint, message: &[u8]) -> Scalar;

    /// Returns `(R_for_challenge, sign)`: the nonce point actually hashed
    /// into the challenge, and the `+1`/`-1` every signer must multiply
    /// their own nonce contribution by before summing.
    fn normalize_nonce(&self, aggregated_nonce: ProjectivePoint) -> (ProjectivePoint, Scalar);

    /// Returns `(P_for_challenge, key_sign, tweak)`: the group key actually
    /// hashed into the challenge, the `+1`/`-1` every signer must multiply
    /// their own `lambda_i * secret_share` term by, and the public additive
    /// tweak every signer must add `lambda_i * tweak` of.
    fn normalize_key(&self, group_public_key: ProjectivePoint) -> (ProjectivePoint, Scalar, Scalar);
}

/// Ethereum: keccak256(address(R) ∥ message) challenge, no nonce
/// normalization, and the MINUS signing convention (`z = rho*e + d -
/// lambda*c*share`, verified as `z*G == R - lambda*c*Y`), matching the
/// reference `schnorr_sign`/`schnorr_verify` this profile is ported from.
#[derive(Clone, Copy, Debug, Default)]
pub struct EthProfile;

impl Profile for EthProfile {
    fn challenge(&self, nonce: &ProjectivePoint, _group_key: &ProjectivePoint, message: &[u8]) -> Scalar {
        eth::eth_challenge(nonce, message)
    }

    fn normalize_nonce(&self, aggregated_nonce: ProjectivePoint) -> (ProjectivePoint, Scalar) {
        (aggregated_nonce, Scalar::ONE)
    }

    fn normalize_key(&self, group_public_key: ProjectivePoint) -> (ProjectivePoint, Scalar, Scalar) {
        let key_sign = -Scalar::ONE;
        (group_public_key * key_sign, key_sign, Scalar::ZERO)
    }
}

/// Bitcoin Taproot: BIP340 tagged-hash challenge over x-only coordinates,
/// with BIP341 key-path tweaking and the even-y normalization BIP340
/// requires of both the nonce and the public key.
#[derive(Clone, Copy, Debug, Default)]
pub struct BtcProfile;

impl Profile for BtcProfile {
    fn challenge(&self, nonce: &ProjectivePoint, group_key: &ProjectivePoint, message: &[u8]) -> Scalar {
        btc::bip340_challenge(nonce, group_key, message)
    }

    fn normalize_nonce(&self, aggregated_nonce: ProjectivePoint) -> (ProjectivePoint, Scalar) {
        let sign = if btc::is_odd_y(&aggregated_nonce) {
            -Scalar::ONE
        } else {
            Scalar::ONE
        };
        (btc::make_even(aggregated_nonce), sign)
    }

    fn normalize_key(&self, group_public_key: ProjectivePoint) -> (ProjectivePoint, Scalar, Scalar) {
        let key_sign = if btc::is_odd_y(&group_public_key) {
            -Scalar::ONE
        } else {
            Scalar::ONE
        };
        let (tweaked, tweak) = btc::taproot_tweak(&group_public_key);
        (tweaked, key_sign, tweak)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn eth_profile_is_a_no_op_normalization() {
        let profile = EthProfile;
        let r = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        let (r2, sign) = profile.normalize_nonce(r);
        assert_eq!(r2, r);
        assert_eq!(sign, Scalar::ONE);
    }

    #[test]
    fn btc_profile_always_returns_even_nonce() {
        let profile = BtcProfile;
        let r = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        let (r_even, _sign) = profile.normalize_nonce(r);
        assert!(!btc::is_odd_y(&r_even));
    }

    #[test]
    fn eth_profile_uses_the_minus_convention() {
        let profile = EthProfile;
        let y = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        let (p_for_challenge, key_sign, tweak) = profile.normalize_key(y);
        assert_eq!(key_sign, -Scalar::ONE);
        assert_eq!(tweak, Scalar::ZERO);
        assert_eq!(p_for_challenge, -y);
    }
}
