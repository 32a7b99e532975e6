//! Multi-key RS256 key store with hot rotation

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey};
use parking_lot::RwLock;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::{debug, info};

use crate::errors::KeyError;

/// Upper bound on the size of a single key file
pub const MAX_KEY_FILE_BYTES: u64 = 64 * 1024;

/// An RSA key pair ready for JWT signing and verification
///
/// The public half is derived from the private key at parse time; key files
/// never carry a separate public key.
#[derive(Clone)]
pub struct SigningKey {
    id: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey").field("id", &self.id).finish()
    }
}

impl SigningKey {
    /// Parses a PEM-encoded RSA private key in PKCS#8 or PKCS#1 form
    pub fn from_pem(id: impl Into<String>, pem: &[u8]) -> Result<Self, KeyError> {
        let id = id.into();
        let parse_error = |message: String| KeyError::Parse {
            id: id.clone(),
            message,
        };

        let text = std::str::from_utf8(pem).map_err(|e| parse_error(e.to_string()))?;
        let private_key = RsaPrivateKey::from_pkcs8_pem(text)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(text))
            .map_err(|e| parse_error(format!("not an RSA private key: {}", e)))?;

        let public_pem = RsaPublicKey::from(&private_key)
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| parse_error(format!("failed to derive public key: {}", e)))?;

        let encoding_key =
            EncodingKey::from_rsa_pem(pem).map_err(|e| parse_error(e.to_string()))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| parse_error(e.to_string()))?;

        Ok(Self {
            id,
            encoding_key,
            decoding_key,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

#[derive(Default)]
struct KeyRing {
    keys: HashMap<String, Arc<SigningKey>>,
    preferred: Option<String>,
}

/// Concurrent map of key id to signing key
///
/// Reads take a shared lock for the duration of one map lookup; rotation
/// takes the exclusive lock only for the structural change.
#[derive(Default)]
pub struct KeyStore {
    ring: RwLock<KeyRing>,
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("key_ids", &self.active_key_ids())
            .finish()
    }
}

impl KeyStore {
    /// Creates an empty key store
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every key file in `dir`
    ///
    /// Hidden files and subdirectories are skipped. Any file that fails to
    /// parse fails the whole load.
    ///
    /// # Errors
    ///
    /// * `KeyError::StoreIo` - the directory or a file could not be read
    /// * `KeyError::Parse` - a file is oversized or not an RSA private key
    /// * `KeyError::AlreadyExists` - two files map to the same key id
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, KeyError> {
        let dir = dir.as_ref();
        let io_error = |path: &Path, e: std::io::Error| KeyError::StoreIo {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let store = Self::new();
        let entries = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| io_error(dir, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| io_error(&path, e))?;
            if !file_type.is_file() {
                continue;
            }

            let Some(id) = key_id_from_path(&path) else {
                debug!(path = %path.display(), "Skipping non-key file");
                continue;
            };

            let pem = read_capped(&path, &id)?;
            store.add(SigningKey::from_pem(id, &pem)?)?;
        }

        info!(
            dir = %dir.display(),
            keys = ?store.active_key_ids(),
            "Signing keys loaded"
        );
        Ok(store)
    }

    /// Inserts a key under a new id
    ///
    /// Key material behind an id never changes, so an id already in the
    /// store is rejected. Rotate by adding a key under a fresh id.
    pub fn add(&self, key: SigningKey) -> Result<(), KeyError> {
        let mut ring = self.ring.write();
        if ring.keys.contains_key(&key.id) {
            return Err(KeyError::AlreadyExists { id: key.id });
        }
        ring.keys.insert(key.id.clone(), Arc::new(key));
        Ok(())
    }

    /// Removes a key; tokens signed with it stop validating
    pub fn remove(&self, id: &str) -> bool {
        let mut ring = self.ring.write();
        ring.keys.remove(id).is_some()
    }

    /// Pins the key used to sign new tokens
    pub fn set_signing_key_id(&self, id: impl Into<String>) {
        self.ring.write().preferred = Some(id.into());
    }

    /// Returns the key with the given id
    pub fn get(&self, id: &str) -> Result<Arc<SigningKey>, KeyError> {
        self.ring
            .read()
            .keys
            .get(id)
            .cloned()
            .ok_or_else(|| KeyError::NotFound { id: id.to_string() })
    }

    pub fn private_key(&self, id: &str) -> Result<EncodingKey, KeyError> {
        self.get(id).map(|key| key.encoding_key.clone())
    }

    pub fn public_key(&self, id: &str) -> Result<DecodingKey, KeyError> {
        self.get(id).map(|key| key.decoding_key.clone())
    }

    /// Ids of every loaded key, sorted
    pub fn active_key_ids(&self) -> BTreeSet<String> {
        self.ring.read().keys.keys().cloned().collect()
    }

    /// Id of the key new tokens are signed with
    ///
    /// The pinned id when one is set, otherwise the lexicographically
    /// greatest loaded id. Date-stamped ids such as `2026-07` therefore
    /// select the newest key.
    pub fn signing_key_id(&self) -> Result<String, KeyError> {
        let ring = self.ring.read();
        match &ring.preferred {
            Some(id) if ring.keys.contains_key(id) => Ok(id.clone()),
            Some(id) => Err(KeyError::NotFound { id: id.clone() }),
            None => ring
                .keys
                .keys()
                .max()
                .cloned()
                .ok_or_else(|| KeyError::NotFound {
                    id: "<none loaded>".to_string(),
                }),
        }
    }

    /// Resolves the issuance key, for startup validation
    pub fn validate_signing_key(&self) -> Result<Arc<SigningKey>, KeyError> {
        let id = self.signing_key_id()?;
        self.get(&id)
    }
}

fn key_id_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(stem.to_string())
}

fn read_capped(path: &Path, id: &str) -> Result<Vec<u8>, KeyError> {
    let file = File::open(path).map_err(|e| KeyError::StoreIo {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut buf = Vec::new();
    file.take(MAX_KEY_FILE_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| KeyError::StoreIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    if buf.len() as u64 > MAX_KEY_FILE_BYTES {
        return Err(KeyError::Parse {
            id: id.to_string(),
            message: format!("key file exceeds {} bytes", MAX_KEY_FILE_BYTES),
        });
    }
    Ok(buf)
}
