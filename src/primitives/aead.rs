//! Authenticated peer-to-peer envelope: AES-128-CBC + HMAC-SHA-256, compatible
//! with the Fernet v1 token format (`0x80` version byte, 8-byte big-endian
//! timestamp, 16-byte IV, ciphertext, 32-byte HMAC tag, base64-url encoded).

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{FrostError, FrostResult};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

const FERNET_VERSION: u8 = 0x80;

fn split_key(key: &[u8; 32]) -> ([u8; 16], [u8; 16]) {
    let mut signing_key = [0u8; 16];
    let mut encryption_key = [0u8; 16];
    signing_key.copy_from_slice(&key[0..16]);
    encryption_key.copy_from_slice(&key[16..32]);
    (signing_key, encryption_key)
}

fn mac_input(prefix_and_ct: &[u8]) -> FrostResult<HmacSha256> {
    HmacSha256::new_from_slice(prefix_and_ct)
        .map_err(|e| FrostError::Encoding(format!("invalid HMAC key length: {e}")))
}

/// Encrypts `plaintext` under `key` (the 32-byte HKDF output), returning a
/// base64-url Fernet token string.
pub fn encrypt(
    plaintext: &[u8],
    key: &[u8; 32],
    rng: &mut (impl RngCore + CryptoRng),
) -> FrostResult<String> {
    let (signing_key, encryption_key) = split_key(key);

    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut iv);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let ciphertext = Aes128CbcEnc::new(&encryption_key.into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut payload = Vec::with_capacity(1 + 8 + 16 + ciphertext.len());
    payload.push(FERNET_VERSION);
    payload.extend_from_slice(&timestamp.to_be_bytes());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);

    let mut mac = mac_input(&signing_key)?;
    Mac::update(&mut mac, &payload);
    let tag = mac.finalize().into_bytes();

    payload.extend_from_slice(&tag);
    Ok(URL_SAFE.encode(payload))
}

/// Decrypts and authenticates a Fernet token, returning the plaintext on
/// success or `FrostError::DecryptAuth` on any version/MAC/padding failure.
pub fn decrypt(token: &str, key: &[u8; 32]) -> FrostResult<Vec<u8>> {
    let (signing_key, encryption_key) = split_key(key);

    let raw = URL_SAFE
        .decode(token.as_bytes())
        .map_err(|_| FrostError::DecryptAuth)?;
    if raw.len() < 1 + 8 + 16 + 32 {
        return Err(FrostError::DecryptAuth);
    }

    let (payload, tag) = raw.split_at(raw.len() - 32);
    if payload[0] != FERNET_VERSION {
        return Err(FrostError::DecryptAuth);
    }

    let mut mac = mac_input(&signing_key)?;
    Mac::update(&mut mac, payload);
    mac.verify_slice(tag).map_err(|_| FrostError::DecryptAuth)?;

    let iv = &payload[9..25];
    let ciphertext = &payload[25..];

    Aes128CbcDec::new(&encryption_key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| FrostError::DecryptAuth)
}
