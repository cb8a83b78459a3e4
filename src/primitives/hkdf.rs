//! HKDF-SHA256 key derivation for the peer-to-peer encryption keys used in
//! DKG round 2/3.
//!
//! The reference implementation this crate is wire-compatible with feeds HKDF
//! an unusual byte string: the SEC1-compressed joint DH point, read as a
//! big-endian integer, rendered to its base-10 *decimal* digit string, and
//! then that ASCII string is itself decoded as if it were hex. This is
//! preserved verbatim (see spec §9) rather than "fixed", since fixing it
//! would break interoperability with existing peers on the wire.

use hkdf::Hkdf;
use k256::ProjectivePoint;
use sha2::Sha256;

use crate::error::{FrostError, FrostResult};
use crate::primitives::point::compress;

/// Converts a 33-byte big-endian unsigned integer to its base-10 decimal
/// digit string, without pulling in a bignum dependency.
fn be_bytes_to_decimal(bytes: &[u8]) -> String {
    let mut num = bytes.to_vec();
    let mut digits = Vec::new();

    while num.iter().any(|&b| b != 0) {
        let mut remainder: u32 = 0;
        for byte in num.iter_mut() {
            let acc = (remainder << 8) | (*byte as u32);
            *byte = (acc / 10) as u8;
            remainder = acc % 10;
        }
        digits.push(b'0' + remainder as u8);
    }
    if digits.is_empty() {
        digits.push(b'0');
    }
    digits.reverse();
    // Safety: every pushed byte is an ASCII digit.
    String::from_utf8(digits).expect("decimal digits are valid UTF-8")
}

/// Reproduces the reference's idiosyncratic byte feed for a joint DH point.
fn quirky_ikm_bytes(joint_point: &ProjectivePoint) -> FrostResult<Vec<u8>> {
    let sec1 = compress(joint_point);
    let decimal = be_bytes_to_decimal(&sec1);
    hex::decode(&decimal).map_err(|_| {
        FrostError::Encoding(format!(
            "decimal digit string {decimal:?} has odd length; cannot reproduce reference HKDF feed"
        ))
    })
}

/// Derives the 32-byte symmetric key shared between two DKG participants from
/// their joint Diffie-Hellman point `sk_i * Pk_j == sk_j * Pk_i`.
pub fn derive_pairwise_key(joint_point: &ProjectivePoint) -> FrostResult<[u8; 32]> {
    let ikm = quirky_ikm_bytes(joint_point)?;
    let hk = Hkdf::<Sha256>::new(Some(&[]), &ikm);
    let mut okm = [0u8; 32];
    hk.expand(&[], &mut okm)
        .map_err(|e| FrostError::Encoding(format!("HKDF expand failed: {e}")))?;
    Ok(okm)
}
