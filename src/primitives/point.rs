//! SEC1 compressed point encoding/decoding and the big-endian integer "code"
//! form used throughout the wire protocol.

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};

use crate::error::{FrostError, FrostResult};

/// A SEC1 compressed public key: `0x02`/`0x03` prefix followed by the 32-byte
/// big-endian x-coordinate.
pub type Sec1Bytes = [u8; 33];

/// Compresses a point to its 33-byte SEC1 form. The identity element has no
/// valid SEC1 encoding and is rejected by callers before reaching this point.
pub fn compress(point: &ProjectivePoint) -> Sec1Bytes {
    let affine: AffinePoint = point.to_affine();
    let encoded = affine.to_encoded_point(true);
    let mut out = [0u8; 33];
    out.copy_from_slice(encoded.as_bytes());
    out
}

/// Decodes a 33-byte SEC1 compressed point, rejecting off-curve or malformed
/// input.
pub fn decompress(bytes: &[u8]) -> FrostResult<ProjectivePoint> {
    if bytes.len() != 33 {
        return Err(FrostError::Encoding(format!(
            "SEC1 point must be 33 bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != 0x02 && bytes[0] != 0x03 {
        return Err(FrostError::Encoding("invalid SEC1 parity prefix".into()));
    }
    let encoded = EncodedPoint::from_bytes(bytes)
        .map_err(|_| FrostError::Encoding("malformed SEC1 point".into()))?;
    let affine = AffinePoint::from_encoded_point(&encoded);
    if bool::from(affine.is_some()) {
        Ok(ProjectivePoint::from(affine.unwrap()))
    } else {
        Err(FrostError::PointNotOnCurve)
    }
}

/// Interprets a SEC1-compressed point as a big-endian 264-bit integer, the
/// canonical "code" form used on the wire (see spec §4.1).
pub fn point_to_code(point: &ProjectivePoint) -> String {
    hex::encode(compress(point))
}

/// Parses the big-endian integer "code" form back into a point.
pub fn code_to_point(code: &str) -> FrostResult<ProjectivePoint> {
    let bytes = hex::decode(code).map_err(|e| FrostError::Encoding(e.to_string()))?;
    decompress(&bytes)
}

/// True for any point other than the curve identity.
pub fn is_non_identity(point: &ProjectivePoint) -> bool {
    bool::from(!point.is_identity())
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::Scalar;
    use rand::rngs::OsRng;

    #[test]
    fn sec1_round_trip() {
        let scalar = crate::primitives::scalar::random_nonzero_scalar(&mut OsRng);
        let point = ProjectivePoint::GENERATOR * scalar;
        let encoded = compress(&point);
        let decoded = code_to_point(&hex::encode(encoded)).unwrap();
        assert_eq!(decoded.to_affine(), point.to_affine());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(decompress(&[0u8; 10]).is_err());
    }

    #[test]
    fn rejects_bad_prefix() {
        let mut bytes = compress(&(ProjectivePoint::GENERATOR * Scalar::from(7u64)));
        bytes[0] = 0x04;
        assert!(decompress(&bytes).is_err());
    }
}
