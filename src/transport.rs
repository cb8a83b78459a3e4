//! Pluggable external interfaces: this crate performs no I/O itself (no HTTP
//! server, no persistence), but the DKG and signing flows need a place to
//! park key material and precomputed nonces, to look up peer network
//! addresses, and to gate inbound requests before they reach the core.
//! Callers implement these traits over whatever storage and transport they
//! already have; [`InMemoryNonceStore`] is a reference implementation of
//! [`NonceStore`] for tests and single-process use (spec §5/§6, Non-goals:
//! no bundled network layer or HTTP surface).

use std::collections::HashMap;
use std::sync::Mutex;

use k256::ProjectivePoint;

use crate::error::{FrostError, FrostResult};
use crate::id::ParticipantId;
use crate::keys::KeyShare;
use crate::sign::CommitmentShare;

/// Atomic single-use storage for precomputed signing nonces: a nonce handed
/// out by `take` must never be handed out again, even under concurrent
/// access, since nonce reuse across two signatures leaks the secret share
/// (spec §4.4 edge case).
pub trait NonceStore: Send + Sync {
    /// Stores a freshly generated commitment share under `id`, keyed by the
    /// public hiding point so a caller can request it back by that handle.
    fn store(&self, id: &ParticipantId, handle: [u8; 33], share: CommitmentShare) -> FrostResult<()>;

    /// Atomically removes and returns the share for `handle`, failing if it
    /// was never stored or has already been taken.
    fn take(&self, id: &ParticipantId, handle: &[u8; 33]) -> FrostResult<CommitmentShare>;
}

/// A single-process, in-memory [`NonceStore`], backed by a mutex-guarded map.
/// Suitable for tests and for single-binary deployments; a networked
/// deployment should back this trait with shared storage instead.
#[derive(Default)]
pub struct InMemoryNonceStore {
    inner: Mutex<HashMap<(String, [u8; 33]), CommitmentShare>>,
}

impl InMemoryNonceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NonceStore for InMemoryNonceStore {
    fn store(&self, id: &ParticipantId, handle: [u8; 33], share: CommitmentShare) -> FrostResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| FrostError::Encoding("nonce store mutex poisoned".to_string()))?;
        guard.insert((id.to_string(), handle), share);
        Ok(())
    }

    fn take(&self, id: &ParticipantId, handle: &[u8; 33]) -> FrostResult<CommitmentShare> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| FrostError::Encoding("nonce store mutex poisoned".to_string()))?;
        guard
            .remove(&(id.to_string(), *handle))
            .ok_or_else(|| FrostError::NonceAlreadyUsed(hex::encode(handle)))
    }
}

/// The key/value persistence surface the core reads and writes through: one
/// write of a [`KeyShare`] at DKG completion and many reads during signing,
/// plus the raw nonce slots [`NonceStore`] layers its atomic-take guarantee
/// on top of (spec §5 "Shared resources", §6 "Consumed by core").
pub trait DataManager {
    fn set_key(&self, id: &ParticipantId, payload: KeyShare) -> FrostResult<()>;
    fn get_key(&self, id: &ParticipantId) -> FrostResult<KeyShare>;
    fn set_nonce(&self, commitment: [u8; 33], pair: CommitmentShare) -> FrostResult<()>;
    fn get_nonce(&self, commitment: &[u8; 33]) -> FrostResult<CommitmentShare>;
    fn remove_nonce(&self, commitment: &[u8; 33]) -> FrostResult<()>;
}

/// A participant's network address and long-lived public key, as returned by
/// [`NodesInfo`]. Left generic over `Addr` since this crate does not mandate
/// a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRecord<Addr> {
    pub id: ParticipantId,
    pub address: Addr,
    pub public_key: ProjectivePoint,
}

/// Resolves participant identities to network addresses and public keys.
pub trait NodesInfo<Addr> {
    fn lookup(&self, id: &ParticipantId) -> FrostResult<NodeRecord<Addr>>;
    fn all_nodes(&self) -> Box<dyn Iterator<Item = NodeRecord<Addr>> + '_>;
}

/// Gates an inbound request by its remote address and route before it
/// reaches the core, e.g. checking the caller is a known co-signer.
pub type CallerValidator = fn(remote_addr: &str, route: &str) -> bool;

/// Validates an inbound payload and returns the digest the core should treat
/// as its canonical identity (e.g. a content hash a caller attached to
/// detect tampering in transit).
pub type DataValidator = fn(payload: &[u8]) -> FrostResult<[u8; 32]>;
