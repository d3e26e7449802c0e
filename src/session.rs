//! Сессия вошедшего пользователя.
//!
//! `SessionContext` читается из хранилища один раз при старте, записывается при
//! входе и очищается при выходе или по сигналу `invalidate()` от API-клиента
//! (ответ 401). Хранилище абстрагировано трейтом `SessionStore`: файл на диске
//! для CLI и память для тестов.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::models::Identity;

/// То, что лежит в хранилище: токен и пользователь.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: Identity,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON-файл на диске.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if data.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let data = serde_json::to_vec_pretty(session)?;
        // пишем во временный файл и переименовываем, чтобы не оставить половину JSON
        let tmp = self.path.with_extension("tmp");
        let mut file = private_file(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// В файле лежит токен: на unix доступ только владельцу.
fn private_file(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(path)?;
    #[cfg(unix)]
    {
        // mode() действует только при создании, старый файл мог остаться с другими правами
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

/// Хранилище в памяти.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self { slot: Mutex::new(Some(session)) }
    }

    pub fn snapshot(&self) -> Option<StoredSession> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        (**self).load()
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        (**self).save(session)
    }

    fn clear(&self) -> Result<(), SessionError> {
        (**self).clear()
    }
}

struct Inner {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<StoredSession>>,
}

/// Явный контекст сессии, который передаётся во все представления.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl SessionContext {
    /// Единственная точка инициализации: читает хранилище один раз.
    pub fn init(store: impl SessionStore + 'static) -> Self {
        let current = match store.load() {
            Ok(Some(session)) => {
                info!("Restored session for {}", session.user.name);
                Some(session)
            }
            Ok(None) => None,
            Err(SessionError::Corrupt(e)) => {
                warn!("Discarding corrupt session: {}", e);
                if let Err(e) = store.clear() {
                    warn!("Failed to clear corrupt session: {}", e);
                }
                None
            }
            Err(e) => {
                warn!("Failed to read session, starting signed out: {}", e);
                None
            }
        };

        Self {
            inner: Arc::new(Inner {
                store: Box::new(store),
                current: RwLock::new(current),
            }),
        }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    pub fn sign_in(&self, token: String, user: Identity) -> Result<(), SessionError> {
        let session = StoredSession { token, user };
        self.inner.store.save(&session)?;
        info!("Signed in as {} ({})", session.user.name, session.user.role.label());
        *self.write() = Some(session);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), SessionError> {
        *self.write() = None;
        self.inner.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Вызывается API-клиентом при 401: очищает токен и пользователя.
    pub fn invalidate(&self) {
        let had_session = self.write().take().is_some();
        if let Err(e) = self.inner.store.clear() {
            warn!("Failed to clear session storage: {}", e);
        }
        if had_session {
            warn!("Session invalidated by server (401)");
        } else {
            debug!("Session invalidated while already signed out");
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<StoredSession>> {
        self.inner.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<StoredSession>> {
        self.inner.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("identity", &self.identity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("cinema-session-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn file_store_survives_restart() {
        let path = temp_path();
        let ctx = SessionContext::init(FileSessionStore::new(&path));
        assert!(!ctx.is_signed_in());

        ctx.sign_in("tok".into(), Identity::from_login("trinity", Role::Admin)).unwrap();

        let reopened = SessionContext::init(FileSessionStore::new(&path));
        assert_eq!(reopened.token().as_deref(), Some("tok"));
        assert_eq!(reopened.identity().unwrap().role, Role::Admin);

        reopened.sign_out().unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path();
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::new(&path);
        store
            .save(&StoredSession { token: "secret".into(), user: Identity::from_login("morpheus", Role::User) })
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_starts_signed_out_and_is_removed() {
        let path = temp_path();
        fs::write(&path, "{not json").unwrap();

        let ctx = SessionContext::init(FileSessionStore::new(&path));
        assert!(!ctx.is_signed_in());
        assert!(!path.exists());
    }

    #[test]
    fn invalidate_clears_memory_and_store() {
        let store = Arc::new(MemorySessionStore::with_session(StoredSession {
            token: "t".into(),
            user: Identity::from_login("neo", Role::User),
        }));
        let ctx = SessionContext::init(store.clone());
        assert!(ctx.is_signed_in());

        let clone = ctx.clone();
        clone.invalidate();

        assert!(!ctx.is_signed_in());
        assert_eq!(ctx.token(), None);
        assert_eq!(store.snapshot(), None);
    }
}
