//! End-to-end protocol tests exercising only the public API: a full DKG
//! among honest participants, threshold signing under both profiles, and
//! the malicious-participant paths (bad PoP, bad share, reused nonce,
//! undersized signing subset).

use std::collections::HashMap;

use k256::elliptic_curve::Field;
use k256::{ProjectivePoint, Scalar};
use rand::rngs::OsRng;

use frost_secp256k1_tss::dkg::{DkgOutcome, DkgSession, EncryptedShare, Round1Broadcast};
use frost_secp256k1_tss::error::FrostError;
use frost_secp256k1_tss::sign::{
    aggregate, generate_commitment_share_lists, sign_share, verify_group_signature, verify_share,
    NonceCommitment,
};
use frost_secp256k1_tss::transport::{InMemoryNonceStore, NonceStore};
use frost_secp256k1_tss::{BtcProfile, EthProfile, KeyShare, ParticipantId, ThresholdParameters};

fn participant_ids(n: u32) -> Vec<ParticipantId> {
    (1..=n).map(|i| ParticipantId::new(&i.to_string()).unwrap()).collect()
}

/// Runs a full honest DKG with every participant's polynomial constant term
/// fixed to `1`, so the resulting group key is deterministically `n * G`.
fn run_dkg_coef0_one(n: u32, t: u32) -> (Vec<ParticipantId>, HashMap<String, KeyShare>) {
    let params = ThresholdParameters::new(n, t).unwrap();
    let ids = participant_ids(n);

    let mut sessions: Vec<DkgSession> = ids.iter().map(|id| DkgSession::new("session-1", params, id.clone())).collect();

    let broadcasts: Vec<Round1Broadcast> = sessions
        .iter_mut()
        .map(|s| s.round1_with_secret(Scalar::ONE, &mut OsRng).unwrap())
        .collect();

    let mut all_shares: Vec<Vec<EncryptedShare>> = Vec::new();
    for session in sessions.iter_mut() {
        let (shares, excluded) = session.round2(broadcasts.clone(), &mut OsRng).unwrap();
        assert!(excluded.is_empty());
        all_shares.push(shares);
    }

    let mut keys = HashMap::new();
    for (i, session) in sessions.iter_mut().enumerate() {
        let my_id = &ids[i];
        let incoming: Vec<EncryptedShare> = all_shares
            .iter()
            .flatten()
            .filter(|s| &s.to == my_id)
            .cloned()
            .collect();
        match session.round3(incoming, &mut OsRng).unwrap() {
            DkgOutcome::Completed(share) => {
                keys.insert(my_id.to_string(), share);
            }
            DkgOutcome::Complaint(c) => panic!("unexpected complaint: {c:?}"),
        }
    }
    (ids, keys)
}

fn precompute(ids: &[ParticipantId]) -> (HashMap<String, frost_secp256k1_tss::sign::CommitmentShare>, Vec<NonceCommitment>) {
    let mut nonces = HashMap::new();
    let mut commitments = Vec::new();
    for id in ids {
        let (_public, mut secret_list) = generate_commitment_share_lists(&mut OsRng, id.clone(), 1);
        let share = secret_list.commitments.remove(0);
        let (hiding, binding) = share.publish();
        commitments.push(NonceCommitment {
            id: id.clone(),
            hiding,
            binding,
        });
        nonces.insert(id.to_string(), share);
    }
    (nonces, commitments)
}

#[test]
fn scenario_1_vanilla_dkg_and_eth_signature() {
    let (ids, keys) = run_dkg_coef0_one(5, 3);

    let group_public_key = keys[&ids[0].to_string()].group_public_key;
    assert_eq!(group_public_key, ProjectivePoint::GENERATOR * Scalar::from(5u64));

    let signer_ids = vec![ids[1].clone(), ids[2].clone(), ids[4].clone()]; // {2, 3, 5}
    let (nonces, commitments) = precompute(&signer_ids);
    let profile = EthProfile;
    let message = b"Hello Frost";

    let shares: Vec<Scalar> = signer_ids
        .iter()
        .map(|id| {
            let key_share = &keys[&id.to_string()];
            let nonce = &nonces[&id.to_string()];
            sign_share(&profile, id, message, key_share, nonce, &commitments, &signer_ids).unwrap()
        })
        .collect();

    let signature = aggregate(&profile, message, &commitments, &shares);
    assert!(verify_group_signature(&profile, message, &group_public_key, &signature).is_ok());
}

#[test]
fn scenario_2_threshold_minimality_rejects_undersized_subset() {
    let (ids, keys) = run_dkg_coef0_one(5, 3);
    let signer_ids = vec![ids[0].clone(), ids[1].clone()]; // {1, 2}, size 2 < T=3
    let (nonces, commitments) = precompute(&signer_ids);
    let profile = EthProfile;
    let message = b"too few signers";

    let id = &signer_ids[0];
    let key_share = &keys[&id.to_string()];
    let nonce = &nonces[&id.to_string()];
    let result = sign_share(&profile, id, message, key_share, nonce, &commitments, &signer_ids);

    assert!(matches!(result, Err(FrostError::SubsetSizeMismatch { expected: 3, actual: 2 })));
}

#[test]
fn scenario_3_nonce_reuse_is_rejected_by_the_nonce_store() {
    let id = ParticipantId::new("1").unwrap();
    let (public_list, mut secret_list) = generate_commitment_share_lists(&mut OsRng, id.clone(), 1);
    let share = secret_list.commitments.remove(0);
    let handle = {
        let (hiding, _) = share.publish();
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(&frost_secp256k1_tss::primitives::point::compress(&hiding));
        bytes
    };

    let store = InMemoryNonceStore::new();
    store.store(&id, handle, share).unwrap();
    let _ = public_list;

    assert!(store.take(&id, &handle).is_ok());
    assert!(matches!(store.take(&id, &handle), Err(FrostError::NonceAlreadyUsed(_))));
}

#[test]
fn scenario_4_bad_proof_of_possession_excludes_the_culprit() {
    let params = ThresholdParameters::new(4, 3).unwrap();
    let ids = participant_ids(4);

    let mut sessions: Vec<DkgSession> = ids.iter().map(|id| DkgSession::new("session-1", params, id.clone())).collect();
    let mut broadcasts: Vec<Round1Broadcast> = sessions
        .iter_mut()
        .map(|s| s.round1(&mut OsRng).unwrap())
        .collect();

    let culprit = ids[2].clone(); // "3"
    let culprit_broadcast = broadcasts.iter_mut().find(|b| b.id == culprit).unwrap();
    culprit_broadcast.proof_of_secret_key.s += Scalar::ONE;

    let mut all_shares: Vec<Vec<EncryptedShare>> = Vec::new();
    for (i, session) in sessions.iter_mut().enumerate() {
        let (shares, excluded) = session.round2(broadcasts.clone(), &mut OsRng).unwrap();
        if ids[i] != culprit {
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
fn scenario_5_bad_share_raises_a_verifiable_complaint() {
    let params = ThresholdParameters::new(4, 3).unwrap();
    let ids = participant_ids(4);
    let accuser = ids[0].clone(); // "1"
    let culprit = ids[3].clone(); // "4"

    let mut sessions: Vec<DkgSession> = ids.iter().map(|id| DkgSession::new("session-1", params, id.clone())).collect();
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

    // Tamper with the share the culprit sent to the accuser.
    for shares in all_shares.iter_mut() {
        for share in shares.iter_mut() {
            if share.from == culprit && share.to == accuser {
                // Corrupt the ciphertext so decryption/Feldman-check fails;
                // a failed MAC is itself treated as an inconsistent share.
                share.token.push('A');
            }
        }
    }

    let accuser_index = ids.iter().position(|i| i == &accuser).unwrap();
    let incoming: Vec<EncryptedShare> = all_shares
        .iter()
        .flatten()
        .filter(|s| s.to == accuser)
        .cloned()
        .collect();

    match sessions[accuser_index].round3(incoming, &mut OsRng).unwrap() {
        DkgOutcome::Complaint(complaints) => {
            assert_eq!(complaints.len(), 1);
            let complaint = &complaints[0];
            assert_eq!(complaint.accused, culprit);
            let culprit_dh_public = broadcasts.iter().find(|b| b.id == culprit).unwrap().dh_public_key;
            assert!(complaint.verify(&culprit_dh_public).is_ok());
        }
        DkgOutcome::Completed(_) => panic!("expected a complaint against the tampered share"),
    }
}

#[test]
fn scenario_6_btc_taproot_profile_round_trips() {
    let (ids, keys) = run_dkg_coef0_one(5, 3);
    let group_public_key = keys[&ids[0].to_string()].group_public_key;

    let signer_ids = vec![ids[1].clone(), ids[2].clone(), ids[4].clone()];
    let (nonces, commitments) = precompute(&signer_ids);
    let profile = BtcProfile;
    let message = b"taproot key-path spend";

    let shares: Vec<Scalar> = signer_ids
        .iter()
        .map(|id| {
            let key_share = &keys[&id.to_string()];
            let nonce = &nonces[&id.to_string()];
            let z = sign_share(&profile, id, message, key_share, nonce, &commitments, &signer_ids).unwrap();
            assert!(verify_share(
                &profile,
                id,
                message,
                &z,
                &key_share.verifying_share,
                &group_public_key,
                &commitments,
                &signer_ids,
            )
            .is_ok());
            z
        })
        .collect();

    let signature = aggregate(&profile, message, &commitments, &shares);
    assert!(verify_group_signature(&profile, message, &group_public_key, &signature).is_ok());
}
