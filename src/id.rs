//! Participant identifiers: nonzero scalars derived from caller-supplied
//! decimal strings (spec §3).

use k256::elliptic_curve::{Field, PrimeField};
use k256::Scalar;
use std::fmt;

use crate::error::{FrostError, FrostResult};
use crate::primitives::scalar::scalar_from_decimal;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ParticipantId {
    raw: String,
    scalar: ScalarBits,
}

/// `k256::Scalar` doesn't implement `Hash`/`Ord`, so we key off of its
/// canonical byte representation for those derives while still carrying the
/// scalar for arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
struct ScalarBits([u8; 32]);

impl ParticipantId {
    /// Parses a base-10 decimal identity string into a nonzero scalar.
    pub fn new(decimal: &str) -> FrostResult<Self> {
        let scalar = scalar_from_decimal(decimal)?;
        if bool::from(scalar.is_zero()) {
            return Err(FrostError::Encoding(format!(
                "participant identifier {decimal:?} must be nonzero"
            )));
        }
        Ok(ParticipantId {
            raw: decimal.to_string(),
            scalar: ScalarBits(scalar.to_bytes().into()),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scalar(&self) -> Scalar {
        Option::from(Scalar::from_repr(self.scalar.0.into()))
            .expect("stored bytes are always canonical")
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal() {
        let id = ParticipantId::new("1").unwrap();
        assert_eq!(id.scalar(), Scalar::from(1u64));
    }

    #[test]
    fn rejects_zero() {
        assert!(ParticipantId::new("0").is_err());
    }

    #[test]
    fn rejects_non_decimal() {
        assert!(ParticipantId::new("0x1").is_err());
        assert!(ParticipantId::new("-1").is_err());
    }

    #[test]
    fn distinct_strings_are_distinct_ids() {
        let a = ParticipantId::new("1").unwrap();
        let b = ParticipantId::new("2").unwrap();
        assert_ne!(a, b);
    }
}
