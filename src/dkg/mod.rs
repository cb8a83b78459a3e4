//! Distributed key generation: a three-round state machine in which every
//! participant acts as their own dealer (spec §4.3).
//!
//! Round 1 broadcasts a Feldman commitment and two proofs of possession.
//! Round 2 privately sends each other participant an encrypted Shamir share.
//! Round 3 decrypts, Feldman-checks every received share, and either
//! finalizes a [`crate::keys::KeyShare`] or raises [`complaint::Complaint`]s
//! against whoever sent an inconsistent share.

pub mod complaint;
pub mod participant;

use std::collections::BTreeMap;

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::PrimeField;
use k256::{ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info, warn};

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;
use crate::keys::{KeyShare, ThresholdParameters};
use crate::polynomial::{FeldmanCommitment, Polynomial};
use crate::primitives::aead;
use crate::primitives::hkdf::derive_pairwise_key;
use crate::primitives::scalar::SecretScalar;

pub use complaint::Complaint;
pub use participant::Round1Broadcast;

/// Where a [`DkgSession`] currently sits in the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DkgStatus {
    Started,
    Round1Done,
    Round2Done,
    Completed,
    Complained,
}

/// An encrypted Shamir share, sent privately from `from` to `to` in round 2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedShare {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub token: String,
}

/// The result of round 3: either every received share checked out and the
/// session produced a key, or at least one did not and the caller must
/// broadcast the returned complaints and restart with the accused excluded.
#[derive(Debug)]
pub enum DkgOutcome {
    Completed(KeyShare),
    Complaint(Vec<Complaint>),
}

/// One participant's view of an in-progress DKG session, scoped to a
/// `dkg_id` so proofs of possession from one session can't be replayed into
/// another concurrent or later one.
pub struct DkgSession {
    dkg_id: String,
    params: ThresholdParameters,
    id: ParticipantId,
    status: DkgStatus,
    dh_private_key: Option<SecretScalar>,
    dh_public_key: Option<ProjectivePoint>,
    polynomial: Option<Polynomial>,
    broadcasts: BTreeMap<ParticipantId, Round1Broadcast>,
}

impl DkgSession {
    pub fn new(dkg_id: impl Into<String>, params: ThresholdParameters, id: ParticipantId) -> Self {
        DkgSession {
            dkg_id: dkg_id.into(),
            params,
            id,
            status: DkgStatus::Started,
            dh_private_key: None,
            dh_public_key: None,
            polynomial: None,
            broadcasts: BTreeMap::new(),
        }
    }

    pub fn status(&self) -> DkgStatus {
        self.status
    }

    /// Generates this participant's secret polynomial and DH keypair, and
    /// returns the message to broadcast to every other participant.
    pub fn round1(&mut self, rng: &mut (impl RngCore + CryptoRng)) -> FrostResult<Round1Broadcast> {
        self.round1_with_secret(Scalar::random(&mut *rng), rng)
    }

    /// Like [`Self::round1`], but with the constant term of the secret
    /// polynomial fixed to `secret` rather than drawn at random. Used by
    /// resharing (a dealer reshares their existing secret) and by tests that
    /// need a reproducible joint group key.
    pub fn round1_with_secret(
        &mut self,
        secret: Scalar,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<Round1Broadcast> {
        if self.status != DkgStatus::Started {
            return Err(FrostError::InvalidState { state: "round1" });
        }

        let dh_private_key = Scalar::random(&mut *rng);
        let dh_public_key = ProjectivePoint::GENERATOR * dh_private_key;
        let polynomial = Polynomial::generate(secret, self.params.t, rng);
        let commitment = polynomial.commitments();

        let broadcast = Round1Broadcast::new(
            &self.dkg_id,
            self.id.clone(),
            &dh_private_key,
            dh_public_key,
            commitment,
            &polynomial.constant_term(),
            rng,
        );

        self.dh_private_key = Some(SecretScalar::new(dh_private_key));
        self.dh_public_key = Some(dh_public_key);
        self.polynomial = Some(polynomial);
        self.broadcasts.insert(self.id.clone(), broadcast.clone());
        self.status = DkgStatus::Round1Done;

        info!(participant = %self.id, "DKG round 1 broadcast generated");
        Ok(broadcast)
    }

    /// Consumes every other participant's round-1 broadcast (this
    /// participant's own broadcast must already have been recorded by
    /// `round1`), verifies their proofs of possession, and returns the
    /// encrypted shares to send out along with the identities of any peers
    /// excluded for failing their proof of possession. Every honest
    /// participant that runs `round2` over the same `peer_broadcasts` input
    /// excludes the same malicious peers, so the qualified set stays
    /// consistent across the session without a further round of agreement.
    pub fn round2(
        &mut self,
        peer_broadcasts: Vec<Round1Broadcast>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<(Vec<EncryptedShare>, Vec<ParticipantId>)> {
        if self.status != DkgStatus::Round1Done {
            return Err(FrostError::InvalidState { state: "round2" });
        }

        let mut excluded = Vec::new();
        for broadcast in &peer_broadcasts {
            if broadcast.id == self.id {
                continue;
            }
            if broadcast.verify(&self.dkg_id).is_err() {
                warn!(participant = %broadcast.id, "DKG round 1 proof of possession failed, excluding");
                excluded.push(broadcast.id.clone());
                continue;
            }
            if self.broadcasts.contains_key(&broadcast.id) {
                return Err(FrostError::DuplicateParticipant(broadcast.id.to_string()));
            }
            self.broadcasts.insert(broadcast.id.clone(), broadcast.clone());
        }

        if self.broadcasts.len() as u32 < self.params.t {
            return Err(FrostError::SubsetSizeMismatch {
                expected: self.params.t,
                actual: self.broadcasts.len() as u32,
            });
        }

        let polynomial = self
            .polynomial
            .as_ref()
            .ok_or(FrostError::InvalidState { state: "round2" })?;
        let dh_private_key = *self
            .dh_private_key
            .as_ref()
            .ok_or(FrostError::InvalidState { state: "round2" })?
            .value();

        let mut shares = Vec::with_capacity(self.broadcasts.len() - 1);
        for (peer_id, peer_broadcast) in &self.broadcasts {
            if *peer_id == self.id {
                continue;
            }
            let share_value = polynomial.evaluate_for(peer_id);
            let joint_point = peer_broadcast.dh_public_key * dh_private_key;
            let key = derive_pairwise_key(&joint_point)?;
            let token = aead::encrypt(&share_value.to_bytes(), &key, rng)?;

            shares.push(EncryptedShare {
                from: self.id.clone(),
                to: peer_id.clone(),
                token,
            });
        }

        self.status = DkgStatus::Round2Done;
        debug!(participant = %self.id, shares = shares.len(), "DKG round 2 shares encrypted");
        Ok((shares, excluded))
    }

    /// Decrypts and Feldman-checks the shares addressed to this participant,
    /// and finalizes the session.
    pub fn round3(
        &mut self,
        incoming: Vec<EncryptedShare>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> FrostResult<DkgOutcome> {
        if self.status != DkgStatus::Round2Done {
            return Err(FrostError::InvalidState { state: "round3" });
        }

        let dh_private_key = *self
            .dh_private_key
            .as_ref()
            .ok_or(FrostError::InvalidState { state: "round3" })?
            .value();
        let own_dh_public = self
            .dh_public_key
            .ok_or(FrostError::InvalidState { state: "round3" })?;
        let my_x = self.id.scalar();

        let mut complaints = Vec::new();
        let mut accumulated_secret = self
            .polynomial
            .as_ref()
            .ok_or(FrostError::InvalidState { state: "round3" })?
            .evaluate_for(&self.id);

        for share in &incoming {
            if share.to != self.id {
                return Err(FrostError::UnknownParticipant(share.to.to_string()));
            }
            let sender_broadcast = self
                .broadcasts
                .get(&share.from)
                .ok_or_else(|| FrostError::UnknownParticipant(share.from.to_string()))?;

            let joint_point = sender_broadcast.dh_public_key * dh_private_key;
            let key = derive_pairwise_key(&joint_point)?;

            let value = aead::decrypt(&share.token, &key)
                .ok()
                .and_then(|bytes| {
                    let arr: Option<[u8; 32]> = bytes.try_into().ok();
                    arr
                })
                .and_then(|arr| Option::from(Scalar::from_repr(arr.into())));

            let consistent = match value {
                Some(v) => sender_broadcast.commitment.verify_share(&my_x, &v).is_ok(),
                None => false,
            };

            if consistent {
                accumulated_secret += value.unwrap();
            } else {
                warn!(accuser = %self.id, accused = %share.from, "DKG share failed Feldman check");
                complaints.push(Complaint::new(
                    self.id.clone(),
                    share.from.clone(),
                    &dh_private_key,
                    own_dh_public,
                    sender_broadcast.dh_public_key,
                    rng,
                ));
            }
        }

        if !complaints.is_empty() {
            self.status = DkgStatus::Complained;
            return Ok(DkgOutcome::Complaint(complaints));
        }

        let commitments: Vec<(ParticipantId, FeldmanCommitment)> = self
            .broadcasts
            .iter()
            .map(|(id, b)| (id.clone(), b.commitment.clone()))
            .collect();

        let mut group_public_key = ProjectivePoint::identity();
        for (_, commitment) in &commitments {
            group_public_key += commitment.public_contribution();
        }

        let verifying_share = ProjectivePoint::GENERATOR * accumulated_secret;

        self.status = DkgStatus::Completed;
        info!(participant = %self.id, "DKG completed");

        Ok(DkgOutcome::Completed(KeyShare {
            id: self.id.clone(),
            params: self.params,
            secret_share: SecretScalar::new(accumulated_secret),
            verifying_share,
            group_public_key,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn ids(n: u32) -> Vec<ParticipantId> {
        (1..=n).map(|i| ParticipantId::new(&i.to_string()).unwrap()).collect()
    }

    #[test]
    fn full_dkg_run_produces_consistent_group_key() {
        let params = ThresholdParameters::new(5, 3).unwrap();
        let ids = ids(5);

        let mut sessions: Vec<DkgSession> = ids
            .iter()
            .map(|id| DkgSession::new("session-1", params, id.clone()))
            .collect();

        let broadcasts: Vec<Round1Broadcast> = sessions
            .iter_mut()
            .map(|s| s.round1(&mut OsRng).unwrap())
            .collect();

        let mut all_shares: Vec<Vec<EncryptedShare>> = Vec::new();
        for session in sessions.iter_mut() {
            let (shares, excluded) = session.round2(broadcasts.clone(), &mut OsRng).unwrap();
            assert!(excluded.is_empty());
            all_shares.push(shares);
        }

        let mut outcomes = Vec::new();
        for (i, session) in sessions.iter_mut().enumerate() {
            let my_id = &ids[i];
            let incoming: Vec<EncryptedShare> = all_shares
                .iter()
                .flatten()
                .filter(|s| &s.to == my_id)
                .cloned()
                .collect();
            outcomes.push(session.round3(incoming, &mut OsRng).unwrap());
        }

        let mut group_keys = Vec::new();
        for outcome in outcomes {
            match outcome {
                DkgOutcome::Completed(share) => group_keys.push(share.group_public_key),
                DkgOutcome::Complaint(c) => panic!("unexpected complaint: {c:?}"),
            }
        }

        for pair in group_keys.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn round_called_out_of_order_is_rejected() {
        let params = ThresholdParameters::new(3, 2).unwrap();
        let id = ParticipantId::new("1").unwrap();
        let mut session = DkgSession::new("session-1", params, id);
        assert!(session.round2(vec![], &mut OsRng).is_err());
    }

    #[test]
    fn malicious_pop_is_excluded_and_session_continues() {
        let params = ThresholdParameters::new(4, 3).unwrap();
        let ids = ids(4);

        let mut sessions: Vec<DkgSession> = ids
            .iter()
            .map(|id| DkgSession::new("session-1", params, id.clone()))
            .collect();

        let mut broadcasts: Vec<Round1Broadcast> = sessions
            .iter_mut()
            .map(|s| s.round1(&mut OsRng).unwrap())
            .collect();

        // Corrupt participant "3"'s proof of possession.
        let culprit = ids[2].clone();
        let culprit_broadcast = broadcasts.iter_mut().find(|b| b.id == culprit).unwrap();
        culprit_broadcast.proof_of_secret_key.s += Scalar::from(1u64);

        let mut all_shares: Vec<Vec<EncryptedShare>> = Vec::new();
        for session in sessions.iter_mut() {
            let (shares, excluded) = session.round2(broadcasts.clone(), &mut OsRng).unwrap();
            if session.id != culprit {
                assert_eq!(excluded, vec![culprit.clone()]);
            }
            all_shares.push(shares);
        }

        for (i, session) in sessions.iter_mut().enumerate() {
            if ids[i] == culprit {
                continue;
            }
            let my_id = &ids[i];
            let incoming: Vec<EncryptedShare> = all_shares
                .iter()
                .flatten()
                .filter(|s| &s.to == my_id && s.from != culprit)
                .cloned()
                .collect();
            match session.round3(incoming, &mut OsRng).unwrap() {
                DkgOutcome::Completed(_) => {}
                DkgOutcome::Complaint(c) => panic!("unexpected complaint: {c:?}"),
            }
        }
    }

    #[test]
    fn broadcast_from_a_mismatched_dkg_id_is_excluded() {
        let params = ThresholdParameters::new(3, 2).unwrap();
        let id_a = ParticipantId::new("1").unwrap();
        let id_b = ParticipantId::new("2").unwrap();
        let id_c = ParticipantId::new("3").unwrap();

        let mut session_a = DkgSession::new("session-a", params, id_a.clone());
        let broadcast_a = session_a.round1(&mut OsRng).unwrap();

        let mut session_b = DkgSession::new("session-a", params, id_b);
        let broadcast_b = session_b.round1(&mut OsRng).unwrap();

        // Same participant key material and threshold, but broadcast under a
        // different session id than `session_a` expects its peers to use.
        let mut session_c = DkgSession::new("session-b", params, id_c);
        let foreign_broadcast = session_c.round1(&mut OsRng).unwrap();

        let (_, excluded) = session_a
            .round2(vec![broadcast_a, broadcast_b, foreign_broadcast.clone()], &mut OsRng)
            .unwrap();
        assert_eq!(excluded, vec![foreign_broadcast.id]);
    }
}
