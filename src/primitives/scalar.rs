//! Scalar-level helpers: modular inverse, reduction of arbitrary digests mod n,
//! and parsing of decimal participant identifiers into field elements.

use k256::elliptic_curve::bigint::U256;
use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::Field;
use k256::Scalar;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{FrostError, FrostResult};

/// The secp256k1 group order, for documentation/debugging purposes; all modular
/// reduction is delegated to `k256::Scalar`'s own arithmetic rather than a
/// hand-rolled bignum, per the teacher's use of the curve library's field type.
pub const ORDER_HEX: &str =
    "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

/// Draws a uniformly random nonzero scalar.
pub fn random_nonzero_scalar(rng: &mut (impl RngCore + CryptoRng)) -> Scalar {
    loop {
        let candidate = Scalar::random(&mut *rng);
        if bool::from(!candidate.is_zero()) {
            return candidate;
        }
    }
}

/// Reduces a 32-byte big-endian digest into a scalar mod n.
pub fn scalar_from_digest(digest: &[u8; 32]) -> Scalar {
    let as_uint = U256::from_be_slice(digest);
    Scalar::reduce(as_uint)
}

/// Computes the modular inverse of a scalar, failing on zero input.
pub fn mod_inverse(value: &Scalar) -> FrostResult<Scalar> {
    let inverse = value.invert();
    if bool::from(inverse.is_some()) {
        Ok(inverse.unwrap())
    } else {
        Err(FrostError::ScalarOutOfRange)
    }
}

/// Parses a base-10 decimal string into a scalar mod n, as used for
/// participant identifiers and DKG-internal polynomial evaluation points.
pub fn scalar_from_decimal(decimal: &str) -> FrostResult<Scalar> {
    if decimal.is_empty() || !decimal.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrostError::Encoding(format!(
            "identifier {decimal:?} is not a base-10 decimal integer"
        )));
    }
    let ten = Scalar::from(10u64);
    let mut acc = Scalar::ZERO;
    for digit in decimal.bytes() {
        let d = Scalar::from((digit - b'0') as u64);
        acc = acc * ten + d;
    }
    Ok(acc)
}

/// Renders a scalar as a fixed-width 64-hex-digit lowercase string, matching
/// the wire convention used for signature components.
pub fn scalar_to_hex(value: &Scalar) -> String {
    hex::encode(value.to_bytes())
}

/// A scalar wrapper that is guaranteed to be zeroed on drop. Used for any
/// long-lived secret: DKG polynomial coefficients, shares, nonce privates.
#[derive(Clone)]
pub struct SecretScalar(pub(crate) Scalar);

impl SecretScalar {
    pub fn new(value: Scalar) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Scalar {
        &self.0
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl core::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_round_trip() {
        let s = scalar_from_decimal("123456789").unwrap();
        let expected = Scalar::from(123456789u64);
        assert_eq!(s, expected);
    }

    #[test]
    fn rejects_non_decimal() {
        assert!(scalar_from_decimal("12a").is_err());
        assert!(scalar_from_decimal("").is_err());
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert!(mod_inverse(&Scalar::ZERO).is_err());
    }

    #[test]
    fn inverse_round_trips() {
        let s = Scalar::from(42u64);
        let inv = mod_inverse(&s).unwrap();
        assert_eq!(s * inv, Scalar::from(1u64));
    }
}
