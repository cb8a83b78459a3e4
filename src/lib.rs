//! FROST threshold Schnorr signing over secp256k1.
//!
//! This crate implements a full distributed-key-generation and threshold
//! signing flow ([`dkg`], [`sign`]) on top of a SEC1/keccak/BIP340 primitive
//! layer ([`primitives`]), with two concrete signing conventions layered on
//! the same core arithmetic: Ethereum-style address-keyed Schnorr
//! signatures, and Bitcoin Taproot key-path spends ([`sign::profile`]).
//!
//! The crate performs no network I/O; [`transport`] defines the traits a
//! caller implements to move DKG and signing messages between participants.

pub mod dkg;
pub mod error;
pub mod id;
pub mod keys;
pub mod polynomial;
pub mod primitives;
pub mod sign;
pub mod transport;

pub use error::{FrostError, FrostResult};
pub use id::ParticipantId;
pub use keys::{IndividualVerifyingKey, KeyShare, ThresholdParameters};
pub use sign::{BtcProfile, EthProfile, Profile, Signature};
