//! Persistent storage for session secrets.
//!
//! [`EncryptedFileStore`] keeps every secret in one AES-256-GCM encrypted
//! file. The cipher key is derived with HKDF-SHA256 from a random wrap key
//! that sits next to it with owner-only permissions. Multi-key writes go
//! through a single encrypt-and-rename, so readers see either all of a
//! batch or none of it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use zeroize::Zeroizing;

use super::errors::StorageError;

pub(crate) const SECRETS_FILE: &str = "secrets.enc";
pub(crate) const WRAP_KEY_FILE: &str = "secrets.key";
const NONCE_SIZE: usize = 12;
const WRAP_KEY_SIZE: usize = 32;
const KEY_DERIVATION_INFO: &[u8] = b"marquee-secrets-v1";
const FORMAT_VERSION: u32 = 1;

type Result<T> = std::result::Result<T, StorageError>;

/// Key/value store for session secrets
#[async_trait]
pub trait SecretStore: Send + Sync + fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write several entries; either all of them land or none do.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    async fn delete_many(&self, keys: &[&str]) -> Result<()>;

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)]).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.delete_many(&[key]).await
    }
}

/// Process-local store, used by tests and `--ephemeral` runs
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut map = self.entries.write().await;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let mut map = self.entries.write().await;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}

/// Encrypted secrets with metadata
#[derive(Debug, Serialize, Deserialize)]
struct EncryptedSecrets {
    /// Base64 encoded nonce
    nonce: String,
    /// Base64 encoded encrypted data
    ciphertext: String,
    encrypted_at: DateTime<Utc>,
    version: u32,
}

/// On-disk encrypted store rooted at a data directory
pub struct EncryptedFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl EncryptedFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn secrets_path(&self) -> PathBuf {
        self.dir.join(SECRETS_FILE)
    }

    fn wrap_key_path(&self) -> PathBuf {
        self.dir.join(WRAP_KEY_FILE)
    }

    async fn read_wrap_key(&self) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let path = self.wrap_key_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.len() == WRAP_KEY_SIZE => Ok(Some(Zeroizing::new(bytes))),
            Ok(_) => Err(StorageError::CorruptedData),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(e)),
        }
    }

    async fn load_or_create_wrap_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        if let Some(key) = self.read_wrap_key().await? {
            return Ok(key);
        }

        let key = Zeroizing::new(Aes256Gcm::generate_key(&mut OsRng).to_vec());
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(StorageError::WriteFailed)?;
        let path = self.wrap_key_path();
        tokio::fs::write(&path, key.as_slice())
            .await
            .map_err(StorageError::WriteFailed)?;
        restrict_permissions(&path).await?;
        debug!("[SecretStore] Created wrap key at {:?}", path);
        Ok(key)
    }

    fn cipher(wrap_key: &[u8]) -> Result<Aes256Gcm> {
        let hk = hkdf::Hkdf::<sha2::Sha256>::new(None, wrap_key);
        let mut okm = Zeroizing::new([0u8; 32]);
        hk.expand(KEY_DERIVATION_INFO, &mut *okm)
            .map_err(|_| StorageError::KeyDerivationFailed)?;
        let key = Key::<Aes256Gcm>::from_slice(&*okm);
        Ok(Aes256Gcm::new(key))
    }

    async fn load_map(&self) -> Result<HashMap<String, String>> {
        let data = match tokio::fs::read_to_string(self.secrets_path()).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(StorageError::ReadFailed(e)),
        };

        let encrypted: EncryptedSecrets =
            serde_json::from_str(&data).map_err(|_| StorageError::CorruptedData)?;
        if encrypted.version != FORMAT_VERSION {
            warn!(
                "[SecretStore] Unsupported secrets file version {}",
                encrypted.version
            );
            return Err(StorageError::CorruptedData);
        }

        let Some(wrap_key) = self.read_wrap_key().await? else {
            return Err(StorageError::DecryptionFailed);
        };
        let cipher = Self::cipher(&wrap_key)?;

        let nonce_bytes = BASE64
            .decode(encrypted.nonce)
            .map_err(|_| StorageError::CorruptedData)?;
        if nonce_bytes.len() != NONCE_SIZE {
            return Err(StorageError::CorruptedData);
        }
        let ciphertext = BASE64
            .decode(encrypted.ciphertext)
            .map_err(|_| StorageError::CorruptedData)?;

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_ref())
                .map_err(|_| StorageError::DecryptionFailed)?,
        );
        serde_json::from_slice(&plaintext).map_err(|_| StorageError::CorruptedData)
    }

    async fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        let path = self.secrets_path();
        if map.is_empty() {
            return match tokio::fs::remove_file(&path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StorageError::WriteFailed(e)),
            };
        }

        let wrap_key = self.load_or_create_wrap_key().await?;
        let cipher = Self::cipher(&wrap_key)?;
        let plaintext =
            Zeroizing::new(serde_json::to_vec(map).map_err(|_| StorageError::EncryptionFailed)?);
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|_| StorageError::EncryptionFailed)?;

        let encrypted = EncryptedSecrets {
            nonce: BASE64.encode(nonce),
            ciphertext: BASE64.encode(ciphertext),
            encrypted_at: Utc::now(),
            version: FORMAT_VERSION,
        };
        let json =
            serde_json::to_vec_pretty(&encrypted).map_err(|_| StorageError::EncryptionFailed)?;

        // Write-then-rename so a crash never leaves half a batch behind
        let tmp = path.with_extension("enc.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(StorageError::WriteFailed)?;
        restrict_permissions(&tmp).await?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(StorageError::WriteFailed)?;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for EncryptedFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load_map().await?.remove(key))
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = self.load_map().await?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.save_map(&map).await
    }

    async fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut map = match self.load_map().await {
            Ok(map) => map,
            // Unreadable secrets are dropped rather than kept around
            Err(StorageError::CorruptedData | StorageError::DecryptionFailed) => {
                warn!("[SecretStore] Discarding unreadable secrets file");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        for key in keys {
            map.remove(*key);
        }
        self.save_map(&map).await
    }
}

async fn restrict_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = tokio::fs::metadata(path)
            .await
            .map_err(StorageError::WriteFailed)?
            .permissions();
        perms.set_mode(0o600);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(StorageError::WriteFailed)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
