//! AES encryption of a key-import nonce under customer key material.
//!
//! Two modes are supported, selected by [`Algorithm`]:
//!
//! - **GCM** (default): authenticated encryption; the 16-byte tag is
//!   appended to the ciphertext by the seal operation.
//! - **CBC**: unauthenticated block mode with PKCS#7 padding, kept for
//!   import endpoints that only accept CBC ciphertext.
//!
//! Every failure is returned as a [`CipherError`] value; this module never
//! terminates the process and never touches stdout.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::aead::generic_array::typenum::U12;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{Aead, Nonce, OsRng};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockEncryptMut, KeyIvInit};
use thiserror::Error;

/// AES block size in bytes; also the CBC IV length.
pub const BLOCK_SIZE: usize = 16;

/// Byte length of a GCM IV (12 bytes = 96 bits).
pub const GCM_IV_LEN: usize = 12;

/// AES-192-GCM with the standard 96-bit IV. The `aes-gcm` crate only
/// aliases the 128- and 256-bit variants.
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Encryption algorithm accepted by the import endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// AES-GCM, authenticated. The default.
    #[default]
    Gcm,
    /// AES-CBC with PKCS#7 padding, unauthenticated.
    Cbc,
}

impl std::str::FromStr for Algorithm {
    type Err = CipherError;

    /// Parse an algorithm tag, ASCII case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnsupportedAlgorithm`] for anything outside
    /// `GCM` / `CBC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GCM") {
            Ok(Algorithm::Gcm)
        } else if s.eq_ignore_ascii_case("CBC") {
            Ok(Algorithm::Cbc)
        } else {
            Err(CipherError::UnsupportedAlgorithm(s.to_owned()))
        }
    }
}

/// Ciphertext plus the IV it was produced under, both raw bytes.
///
/// For GCM the ciphertext carries the 16-byte authentication tag at the
/// end; for CBC it is the encryption of the PKCS#7-padded nonce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedNonce {
    /// Raw ciphertext bytes.
    pub ciphertext: Vec<u8>,
    /// Raw IV bytes: [`GCM_IV_LEN`] for GCM, [`BLOCK_SIZE`] for CBC.
    pub iv: Vec<u8>,
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// A base64 input could not be decoded. `field` names which one.
    #[error("failed to decode {field} from base64: {cause}")]
    InvalidBase64 {
        /// The offending input: `"key material"` or `"nonce"`.
        field: &'static str,
        /// The underlying decode failure.
        cause: base64::DecodeError,
    },

    /// The decoded key is not a valid AES key size.
    #[error("invalid key length {0}: AES key material must be 16, 24, or 32 bytes")]
    InvalidKeyLength(usize),

    /// The OS CSPRNG could not fill the IV buffer.
    #[error("random source failed to fill the IV: {0}")]
    RandomSource(String),

    /// The algorithm tag is outside the supported set.
    #[error("unsupported algorithm {0:?}: expected GCM or CBC")]
    UnsupportedAlgorithm(String),

    /// AES-GCM seal failed (unreachable with a valid key and IV).
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypt a base64 nonce under base64 key material with `algorithm`.
///
/// Decodes both inputs, then seals the nonce bytes under a fresh random
/// IV. The caller receives raw ciphertext and IV; encoding for output is
/// the caller's concern.
///
/// # Errors
///
/// Returns [`CipherError::InvalidBase64`] if either input is not valid
/// base64, [`CipherError::InvalidKeyLength`] if the decoded key is not
/// 16, 24, or 32 bytes, and [`CipherError::RandomSource`] if the CSPRNG
/// cannot produce an IV.
pub fn encrypt_nonce(
    key_b64: &str,
    nonce_b64: &str,
    algorithm: Algorithm,
) -> Result<SealedNonce, CipherError> {
    let key = decode_field("key material", key_b64)?;
    let nonce = decode_field("nonce", nonce_b64)?;

    match algorithm {
        Algorithm::Gcm => encrypt_gcm(&key, &nonce),
        Algorithm::Cbc => encrypt_cbc(&key, &nonce),
    }
}

/// Seal `nonce` under `key` with AES-GCM and a random 96-bit IV.
///
/// No associated data is supplied; the authentication tag is appended to
/// the returned ciphertext.
pub fn encrypt_gcm(key: &[u8], nonce: &[u8]) -> Result<SealedNonce, CipherError> {
    let iv = random_iv(GCM_IV_LEN)?;
    let ciphertext = match key.len() {
        16 => seal_gcm::<Aes128Gcm>(key, &iv, nonce),
        24 => seal_gcm::<Aes192Gcm>(key, &iv, nonce),
        32 => seal_gcm::<Aes256Gcm>(key, &iv, nonce),
        other => Err(CipherError::InvalidKeyLength(other)),
    }?;

    Ok(SealedNonce { ciphertext, iv })
}

/// Encrypt `nonce` under `key` with AES-CBC and a random 128-bit IV.
///
/// The nonce is PKCS#7-padded to the block size first; a full padding
/// block is added when the input is already block-aligned.
pub fn encrypt_cbc(key: &[u8], nonce: &[u8]) -> Result<SealedNonce, CipherError> {
    let iv = random_iv(BLOCK_SIZE)?;
    let ciphertext = match key.len() {
        16 => seal_cbc::<cbc::Encryptor<Aes128>>(key, &iv, nonce),
        24 => seal_cbc::<cbc::Encryptor<Aes192>>(key, &iv, nonce),
        32 => seal_cbc::<cbc::Encryptor<Aes256>>(key, &iv, nonce),
        other => Err(CipherError::InvalidKeyLength(other)),
    }?;

    Ok(SealedNonce { ciphertext, iv })
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(value)
        .map_err(|cause| CipherError::InvalidBase64 { field, cause })
}

/// Fill an IV buffer from the OS CSPRNG via the fallible fill API.
fn random_iv(len: usize) -> Result<Vec<u8>, CipherError> {
    let mut iv = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CipherError::RandomSource(e.to_string()))?;
    Ok(iv)
}

fn seal_gcm<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: KeyInit + Aead,
{
    let cipher = C::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    cipher
        .encrypt(Nonce::<C>::from_slice(iv), plaintext)
        .map_err(|_| CipherError::AeadFailure)
}

fn seal_cbc<E>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let encryptor =
        E::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}
