//! Scalar/curve primitive layer: modular arithmetic, SEC1 encoding, address
//! derivation, HKDF, and authenticated encryption (spec §4.1).

pub mod aead;
pub mod btc;
pub mod eth;
pub mod hkdf;
pub mod point;
pub mod scalar;
pub mod schnorr;
