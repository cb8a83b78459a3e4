//! Ethereum signing profile primitives: address derivation and the
//! keccak256-based Schnorr challenge used by on-chain verifiers.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::ProjectivePoint;
use sha3::{Digest, Keccak256};

use crate::primitives::scalar::scalar_from_digest;
use k256::Scalar;

/// Derives the 20-byte Ethereum address of a public key: the last 20 bytes of
/// `keccak256(x ∥ y)` over the uncompressed coordinates.
pub fn address_bytes(point: &ProjectivePoint) -> [u8; 20] {
    let affine = point.to_affine();
    let encoded = affine.to_encoded_point(false);
    // Uncompressed SEC1 is `0x04 ∥ x ∥ y`; address derivation hashes only `x ∥ y`.
    let xy = &encoded.as_bytes()[1..];
    let digest = Keccak256::digest(xy);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

/// Renders an address as EIP-55 mixed-case checksummed hex with a `0x` prefix.
pub fn to_checksum_address(address: &[u8; 20]) -> String {
    let lower_hex = hex::encode(address);
    let hash = Keccak256::digest(lower_hex.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower_hex.chars().enumerate() {
        if c.is_ascii_digit() {
            out.push(c);
            continue;
        }
        // Each hex character corresponds to a nibble of the hash; the high
        // nibble of byte i/2 (even i) or low nibble (odd i) selects casing.
        let hash_byte = hash[i / 2];
        let nibble = if i % 2 == 0 {
            hash_byte >> 4
        } else {
            hash_byte & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

pub fn address_to_checksum(point: &ProjectivePoint) -> String {
    to_checksum_address(&address_bytes(point))
}

/// `e = keccak256( addr(R) ∥ message ) mod n`, the ETH-profile Schnorr
/// challenge. The nonce identity hashed is the 20-byte address of `R`, not `R`
/// itself, matching the on-chain verifier's ecrecover-style trick.
pub fn eth_challenge(aggregated_nonce: &ProjectivePoint, message: &[u8]) -> Scalar {
    let addr = address_bytes(aggregated_nonce);
    let mut hasher = Keccak256::new();
    hasher.update(addr);
    hasher.update(message);
    let digest: [u8; 32] = hasher.finalize().into();
    scalar_from_digest(&digest)
}
