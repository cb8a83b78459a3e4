//! Error kinds propagated by the FROST core.
//!
//! Every variant here is returned to the caller with `?`; none are recovered
//! internally. `InconsistentShare` is the one exception worth calling out: a
//! Feldman mismatch in DKG round 3 is surfaced as a [`crate::dkg::DkgOutcome::Complaint`],
//! not as an `Err`, so the variant mainly exists to label that condition in logs
//! and in [`crate::dkg::complaint::Complaint`] bookkeeping.

use thiserror::Error;

pub type FrostResult<T> = Result<T, FrostError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrostError {
    #[error("DKG round invoked out of order for session state {state}")]
    InvalidState { state: &'static str },

    #[error("proof of possession failed verification for participant {participant}")]
    InvalidProof { participant: String },

    #[error("Feldman commitment check failed for share from participant {sender}")]
    InconsistentShare { sender: String },

    #[error("authenticated decryption failed (MAC or version mismatch)")]
    DecryptAuth,

    #[error("decoded public key point is not on the curve")]
    PointNotOnCurve,

    #[error("scalar is zero or out of range [0, n)")]
    ScalarOutOfRange,

    #[error("nonce commitment {0} was already taken from the nonce store")]
    NonceAlreadyUsed(String),

    #[error("signing subset has {actual} members, threshold requires {expected}")]
    SubsetSizeMismatch { expected: u32, actual: u32 },

    #[error("signature share from participant {participant} failed verification")]
    SignatureShareInvalid { participant: String },

    #[error("duplicate participant identifier {0} in DKG session")]
    DuplicateParticipant(String),

    #[error("unknown participant identifier {0} referenced")]
    UnknownParticipant(String),

    #[error("{0}")]
    Encoding(String),
}
