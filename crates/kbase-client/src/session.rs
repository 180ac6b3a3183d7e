use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

/// Storage key of the bearer credential.
pub const SESSION_KEY: &str = "Authorization";
const KEYRING_SERVICE: &str = "kbase";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to access keyring: {0}")]
    Keyring(String),
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Slot for the single active bearer credential. Presence is the only
/// session-validity signal.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, SessionError>;
    fn set(&self, credential: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;

    fn is_present(&self) -> Result<bool, SessionError> {
        Ok(self.get()?.is_some())
    }
}

fn normalize(credential: &str) -> Option<&str> {
    let credential = credential.trim();
    if credential.is_empty() {
        None
    } else {
        Some(credential)
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    credential: RwLock<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credential(credential: &str) -> Self {
        Self {
            credential: RwLock::new(normalize(credential).map(str::to_string)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let guard = self
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn set(&self, credential: &str) -> Result<(), SessionError> {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = normalize(credential).map(str::to_string);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

/// Credential kept in the OS keychain under a fixed entry.
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service: String,
    key: String,
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new(KEYRING_SERVICE)
    }
}

impl KeyringSessionStore {
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: SESSION_KEY.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, SessionError> {
        keyring::Entry::new(&self.service, &self.key)
            .map_err(|err| SessionError::Keyring(err.to_string()))
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(normalize(&value).map(str::to_string)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(SessionError::Keyring(err.to_string())),
        }
    }

    fn set(&self, credential: &str) -> Result<(), SessionError> {
        let Some(credential) = normalize(credential) else {
            return self.clear();
        };
        self.entry()?
            .set_password(credential)
            .map_err(|err| SessionError::Keyring(err.to_string()))?;
        debug!(service = %self.service, "stored session credential in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(SessionError::Keyring(err.to_string())),
        }
    }
}

/// Credential kept in a small JSON document, `{"Authorization": "<token>"}`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|err| self.io_error(err))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let contents = serde_json::to_string_pretty(entries).map_err(|source| {
            SessionError::Format {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, contents).map_err(|err| self.io_error(err))?;
        restrict_permissions(&self.path);
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!(path = %path.display(), "failed to restrict session file permissions: {err}");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let entries = self.load()?;
        Ok(entries
            .get(SESSION_KEY)
            .and_then(|value| normalize(value))
            .map(str::to_string))
    }

    fn set(&self, credential: &str) -> Result<(), SessionError> {
        let Some(credential) = normalize(credential) else {
            return self.clear();
        };
        let mut entries = self.load()?;
        entries.insert(SESSION_KEY.to_string(), credential.to_string());
        self.save(&entries)
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut entries = self.load()?;
        if entries.remove(SESSION_KEY).is_none() {
            return Ok(());
        }
        self.save(&entries)
    }
}
