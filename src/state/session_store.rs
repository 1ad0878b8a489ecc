// ============================================================================
// SESSION STORE - Fuente única de verdad para token + usuario
// ============================================================================
// Token y usuario se escriben/borran juntos. Cada set/clear actualiza en el
// mismo paso: localStorage, cache en memoria y header Authorization del API.
// ============================================================================

use std::rc::Rc;

use crate::models::{Role, Session, User};
use crate::services::api_client::AuthHeader;
use crate::state::reactivity::ReactiveState;
use crate::utils::constants::{TOKEN_KEY, USER_KEY};
use crate::utils::storage::{KeyValueStorage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("El token de sesión está vacío")]
    EmptyToken,
    #[error("Error serializando usuario: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
    state: ReactiveState<Option<Session>>,
    auth_header: AuthHeader,
}

impl SessionStore {
    /// Store vacío (no lee storage)
    pub fn new(storage: Rc<dyn KeyValueStorage>, auth_header: AuthHeader) -> Self {
        Self {
            storage,
            state: ReactiveState::new(None),
            auth_header,
        }
    }

    /// Store inicializado con lo que haya persistido
    pub fn restore(storage: Rc<dyn KeyValueStorage>, auth_header: AuthHeader) -> Self {
        let store = Self::new(storage, auth_header);
        store.load_persisted();
        store
    }

    fn load_persisted(&self) {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let user_json = self.storage.get(USER_KEY).filter(|u| u.trim() != "null");

        match (token, user_json) {
            (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) => {
                    log::info!("💾 [SESSION] Sesión restaurada para {} ({})", user.username, user.role);
                    self.auth_header.set(Some(&token));
                    self.state.set(Some(Session { user, token }));
                }
                Err(e) => {
                    log::warn!("⚠️ [SESSION] Usuario persistido corrupto ({}), limpiando sesión", e);
                    self.wipe_storage();
                }
            },
            (None, None) => {}
            _ => {
                log::warn!("⚠️ [SESSION] Sesión persistida a medias, limpiando ambas claves");
                self.wipe_storage();
            }
        }
    }

    /// Persistir token + usuario. Si alguna escritura falla no queda nada a
    /// medias: se limpia la sesión completa y se devuelve el error.
    pub fn set_session(&self, token: impl Into<String>, user: User) -> Result<Session, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let user_json = serde_json::to_string(&user)?;

        let written = self
            .storage
            .set(TOKEN_KEY, &token)
            .and_then(|_| self.storage.set(USER_KEY, &user_json));
        if let Err(e) = written {
            log::error!("❌ [SESSION] Error persistiendo sesión: {}", e);
            self.clear_session();
            return Err(e.into());
        }

        self.auth_header.set(Some(&token));
        let session = Session { user, token };
        self.state.set(Some(session.clone()));
        log::info!("✅ [SESSION] Sesión iniciada: {} ({})", session.user.username, session.user.role);
        Ok(session)
    }

    /// Borrar token + usuario, header y cache
    pub fn clear_session(&self) {
        self.wipe_storage();
        self.auth_header.set(None);
        self.state.set(None);
        log::info!("🗑️ [SESSION] Sesión limpiada");
    }

    pub fn get_session(&self) -> Option<Session> {
        self.state.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.with(Option::is_some)
    }

    pub fn role(&self) -> Option<Role> {
        self.state.with(|s| s.as_ref().map(|s| s.role().clone()))
    }

    pub fn auth_header(&self) -> &AuthHeader {
        &self.auth_header
    }

    /// Se llama tras cada set/clear con la sesión nueva
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(Option<&Session>) + 'static,
    {
        self.state.subscribe(move |session| callback(session.as_ref()));
    }

    fn wipe_storage(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}
