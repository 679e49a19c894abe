use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ClientError, ClientResult},
    models::{GatewayConnection, GatewayId},
};

/// Everything the dashboard keeps between runs: the auth token and the
/// payment gateway connections keyed by gateway name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub gateways: BTreeMap<String, GatewayConnection>,
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> ClientResult<SessionData>;
    fn save(&self, data: &SessionData) -> ClientResult<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: Mutex<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SessionData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<SessionData> {
        Ok(lock(&self.data)?.clone())
    }

    fn save(&self, data: &SessionData) -> ClientResult<()> {
        *lock(&self.data)? = data.clone();
        Ok(())
    }
}

/// JSON file store. A missing file is an empty session.
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
    fn load(&self) -> ClientResult<SessionData> {
        if !self.path.exists() {
            return Ok(SessionData::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| {
            ClientError::Session(format!("{} is corrupt: {e}", self.path.display()))
        })
    }

    fn save(&self, data: &SessionData) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(data)
            .map_err(|e| ClientError::Session(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Injected session handle with an explicit lifecycle: opened at start-up,
/// cleared at logout. Clones share the same state.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    data: Arc<Mutex<SessionData>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn open(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let data = store.load()?;
        Ok(Self {
            store,
            data: Arc::new(Mutex::new(data)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemorySessionStore::new()),
            data: Arc::new(Mutex::new(SessionData::default())),
        }
    }

    /// The bearer token, unless it has expired.
    pub fn token(&self) -> Option<String> {
        let data = self.data.lock().ok()?;
        match data.expires_at {
            Some(expires_at) if expires_at <= Utc::now() => None,
            _ => data.token.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(
        &self,
        token: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> ClientResult<()> {
        let token = token.into();
        let token = token
            .strip_prefix("Bearer ")
            .map(str::to_string)
            .unwrap_or(token);
        self.update(|data| {
            data.token = Some(token);
            data.expires_at = expires_at;
        })
    }

    pub fn gateway(&self, gateway: GatewayId) -> Option<GatewayConnection> {
        let data = self.data.lock().ok()?;
        data.gateways.get(gateway.as_str()).cloned()
    }

    pub fn gateways(&self) -> Vec<GatewayConnection> {
        self.data
            .lock()
            .map(|data| data.gateways.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn connect_gateway(&self, connection: GatewayConnection) -> ClientResult<()> {
        self.update(|data| {
            data.gateways
                .insert(connection.gateway.as_str().to_string(), connection);
        })
    }

    pub fn disconnect_gateway(&self, gateway: GatewayId) -> ClientResult<bool> {
        let mut removed = false;
        self.update(|data| {
            removed = data.gateways.remove(gateway.as_str()).is_some();
        })?;
        Ok(removed)
    }

    /// Logout: drops the token and every stored gateway flag.
    pub fn clear(&self) -> ClientResult<()> {
        self.update(|data| *data = SessionData::default())
    }

    fn update(&self, apply: impl FnOnce(&mut SessionData)) -> ClientResult<()> {
        let mut data = lock(&self.data)?;
        apply(&mut data);
        self.store.save(&data)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> ClientResult<std::sync::MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| ClientError::Session("session lock poisoned".into()))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn connection(gateway: GatewayId) -> GatewayConnection {
        GatewayConnection {
            gateway,
            connected: true,
            phone: "09171234567".into(),
            connected_at: Utc::now(),
        }
    }

    #[test]
    fn expired_token_reads_as_absent() {
        let session = Session::in_memory();
        session
            .set_token("abc", Some(Utc::now() - Duration::minutes(1)))
            .unwrap();
        assert_eq!(session.token(), None);

        session
            .set_token("Bearer def", Some(Utc::now() + Duration::hours(1)))
            .unwrap();
        assert_eq!(session.token().as_deref(), Some("def"));
    }

    #[test]
    fn clear_drops_token_and_gateways() {
        let session = Session::in_memory();
        session.set_token("abc", None).unwrap();
        session.connect_gateway(connection(GatewayId::Gcash)).unwrap();
        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.gateway(GatewayId::Gcash).is_none());
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&path));

        let session = Session::open(store.clone()).unwrap();
        session.set_token("abc", None).unwrap();
        session.connect_gateway(connection(GatewayId::Paymaya)).unwrap();

        let reopened = Session::open(store).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("abc"));
        assert_eq!(
            reopened.gateway(GatewayId::Paymaya).map(|c| c.phone),
            Some("09171234567".to_string())
        );
        assert!(reopened.gateway(GatewayId::Gcash).is_none());
    }

    #[test]
    fn corrupt_file_is_a_session_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let err = FileSessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, ClientError::Session(_)));
    }
}
