// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use prizenation_api::{AuthResponse, LoginRequest, RegisterRequest};
use prizenation_core::resolve_session_path;
use prizenation_model::User;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cart::CartState;
use crate::error::ClientError;
use crate::http::ApiClient;

/// What survives between invocations: the bearer token and the last
/// user record seen with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `session.json` under the resolved config directory.
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(resolve_session_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file is no session.
    pub fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ClientError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        match serde_json::from_slice::<StoredSession>(&raw) {
            Ok(stored) if !stored.token.trim().is_empty() => Ok(Some(stored)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    pub fn save(&self, stored: &StoredSession) -> Result<(), ClientError> {
        let io = |source| ClientError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(stored).map_err(|e| ClientError::Decode {
            endpoint: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, bytes).map_err(io)
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ClientError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Signed-in state. Mirrors the token into the [`ApiClient`] it is given.
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn open(store: SessionStore) -> Result<Self, ClientError> {
        let stored = store.load()?;
        Ok(Self {
            store,
            token: stored.as_ref().map(|s| s.token.clone()),
            user: stored.and_then(|s| s.user),
        })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    /// Hands the token to `api` so every later request carries it.
    pub fn attach(&self, api: &mut ApiClient) {
        api.set_token(self.token.clone());
    }

    fn adopt(&mut self, api: &mut ApiClient, auth: AuthResponse) -> Result<&User, ClientError> {
        let stored = StoredSession {
            token: auth.access_token,
            user: Some(auth.user),
        };
        self.store.save(&stored)?;
        api.set_token(Some(stored.token.clone()));
        self.token = Some(stored.token);
        self.user = stored.user;
        debug!(path = %self.store.path().display(), "session stored");
        self.user.as_ref().ok_or(ClientError::Unauthenticated)
    }

    pub fn login(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> Result<&User, ClientError> {
        let auth = api.login(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        self.adopt(api, auth)
    }

    pub fn register(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<&User, ClientError> {
        let auth = api.register(&RegisterRequest {
            email: email.trim().to_string(),
            name: name.trim().to_string(),
            password: password.to_string(),
        })?;
        self.adopt(api, auth)
    }

    /// Re-reads the user behind the stored token. A rejected token ends
    /// the session.
    pub fn refresh(&mut self, api: &mut ApiClient) -> Result<&User, ClientError> {
        if self.token.is_none() {
            return Err(ClientError::Unauthenticated);
        }
        self.attach(api);
        match api.me() {
            Ok(user) => {
                if let Some(token) = self.token.clone() {
                    self.store.save(&StoredSession {
                        token,
                        user: Some(user.clone()),
                    })?;
                }
                self.user = Some(user);
                self.user.as_ref().ok_or(ClientError::Unauthenticated)
            }
            Err(ClientError::Api(err)) if err.is_unauthorized() => {
                warn!("stored session was rejected; signing out");
                self.forget(api)?;
                Err(ClientError::Unauthenticated)
            }
            Err(err) => Err(err),
        }
    }

    fn forget(&mut self, api: &mut ApiClient) -> Result<(), ClientError> {
        self.token = None;
        self.user = None;
        api.set_token(None);
        self.store.clear()
    }

    /// Drops the token everywhere and empties the local cart.
    pub fn logout(&mut self, api: &mut ApiClient, cart: &mut CartState) -> Result<(), ClientError> {
        cart.reset();
        self.forget(api)
    }

    pub fn require_user(&self) -> Result<&User, ClientError> {
        match (&self.token, &self.user) {
            (Some(_), Some(user)) => Ok(user),
            _ => Err(ClientError::Unauthenticated),
        }
    }

    pub fn require_admin(&self) -> Result<&User, ClientError> {
        let user = self.require_user()?;
        if user.is_admin {
            Ok(user)
        } else {
            Err(ClientError::Forbidden(
                "Admin access required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn store_round_trip_and_clear() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        assert_eq!(store.load().expect("load"), None);
        let stored = StoredSession {
            token: "tok".to_string(),
            user: Some(User {
                email: "a@b.c".to_string(),
                ..User::default()
            }),
        };
        store.save(&stored).expect("save");
        assert_eq!(store.load().expect("load"), Some(stored));
        store.clear().expect("clear");
        store.clear().expect("clear twice");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn corrupt_or_blank_session_is_ignored() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").expect("write");
        assert_eq!(SessionStore::new(path.clone()).load().expect("load"), None);
        fs::write(&path, br#"{"token":"  "}"#).expect("write");
        assert_eq!(SessionStore::new(path).load().expect("load"), None);
    }

    #[test]
    fn admin_gate() {
        let dir = tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&StoredSession {
                token: "t".to_string(),
                user: Some(User {
                    email: "shopper@example.com".to_string(),
                    ..User::default()
                }),
            })
            .expect("save");
        let session = Session::open(store).expect("open");
        assert!(session.require_user().is_ok());
        assert!(matches!(
            session.require_admin(),
            Err(ClientError::Forbidden(_))
        ));
    }
}
