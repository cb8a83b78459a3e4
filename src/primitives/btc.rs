//! Bitcoin Taproot (BIP340/BIP341) signing profile primitives: tagged
//! hashing, x-only serialization, taproot tweaking, and the BIP340 challenge.

use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar};
use sha2::{Digest, Sha256};

use crate::error::{FrostError, FrostResult};
use crate::primitives::scalar::scalar_from_digest;

/// BIP340 tagged hash: `SHA256(SHA256(tag) ∥ SHA256(tag) ∥ msg)`.
pub fn tagged_hash(tag: &str, chunks: &[&[u8]]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

/// The 32-byte x-only serialization of a point's affine x-coordinate, per
/// BIP340. Does not encode the y-parity.
pub fn x_only(point: &ProjectivePoint) -> [u8; 32] {
    let affine = point.to_affine();
    let x = affine.x();
    let mut out = [0u8; 32];
    out.copy_from_slice(x.as_slice());
    out
}

/// Negates a point if its affine y-coordinate is odd, returning (possibly
/// negated point, whether a negation occurred).
pub fn make_even(point: ProjectivePoint) -> ProjectivePoint {
    let affine = point.to_affine();
    if bool::from(affine.y_is_odd()) {
        -point
    } else {
        point
    }
}

pub fn is_odd_y(point: &ProjectivePoint) -> bool {
    bool::from(point.to_affine().y_is_odd())
}

/// Lifts a 32-byte x-only coordinate to the unique point with even y, per
/// BIP340's `lift_x`.
pub fn lift_x(x_only: &[u8; 32]) -> FrostResult<ProjectivePoint> {
    let mut sec1 = [0u8; 33];
    sec1[0] = 0x02;
    sec1[1..].copy_from_slice(x_only);
    let encoded = EncodedPoint::from_bytes(sec1)
        .map_err(|_| FrostError::Encoding("invalid x-only coordinate".into()))?;
    let affine = AffinePoint::from_encoded_point(&encoded);
    if bool::from(affine.is_some()) {
        Ok(ProjectivePoint::from(affine.unwrap()))
    } else {
        Err(FrostError::PointNotOnCurve)
    }
}

/// Applies the BIP341 key-path taproot tweak (no script tree / merkle root)
/// to an internal key, returning the tweaked output key with even y and the
/// tweak scalar itself (the caller needs the tweak to adjust the secret
/// share analogously).
pub fn taproot_tweak(internal_key: &ProjectivePoint) -> (ProjectivePoint, Scalar) {
    let internal_even = make_even(*internal_key);
    let digest = tagged_hash("TapTweak", &[&x_only(&internal_even)]);
    let t = scalar_from_digest(&digest);
    let tweaked = internal_even + ProjectivePoint::GENERATOR * t;
    (tweaked, t)
}

/// `e = int(tagged_hash("BIP0340/challenge", x(R) ∥ x(P') ∥ m)) mod n`.
pub fn bip340_challenge(r: &ProjectivePoint, tweaked_group_key: &ProjectivePoint, message: &[u8]) -> Scalar {
    let mut buf = Vec::with_capacity(64 + message.len());
    buf.extend_from_slice(&x_only(r));
    buf.extend_from_slice(&x_only(tweaked_group_key));
    buf.extend_from_slice(message);
    let digest = tagged_hash("BIP0340/challenge", &[&buf]);
    scalar_from_digest(&digest)
}
