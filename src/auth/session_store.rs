use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};

use crate::{
    api::{self, ApiClient},
    model::{Credentials, Session, User},
    storage::{self, Storage, TOKEN_KEY, USER_KEY},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] api::Error),
    #[error("failed to persist session: {0}")]
    Storage(#[from] storage::Error),
    #[error("failed to serialize user: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Single source of truth for who is signed in.
///
/// Clones share state. The token never leaves the store except through
/// the [`ApiClient`]'s authorization header.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn Storage>,
    api: ApiClient,
    session: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Rebuild the session from storage, without touching the network.
    ///
    /// Both keys have to be present (and the user readable) for the
    /// session to come back; anything less starts signed out.
    pub fn restore(storage: Arc<dyn Storage>, api: ApiClient) -> SessionStore {
        let session = match read_session(storage.as_ref()) {
            Ok(Some(session)) => {
                info!("Restored session for user {}", session.user.id);
                api.set_token(Some(session.token.clone()));
                Some(session)
            }
            Ok(None) => {
                debug!("No stored session");
                None
            }
            Err(err) => {
                warn!("Ignoring stored session: {}", err);
                None
            }
        };

        SessionStore {
            inner: Arc::new(Inner {
                storage,
                api,
                session: Mutex::new(session),
            }),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.session().as_ref().map(|session| session.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), Error> {
        let session = self.inner.api.create_session(credentials).await?;
        debug!("Signed in as user {}", session.user.id);

        self.persist(&session)?;

        self.inner.api.set_token(Some(session.token.clone()));
        *self.session() = Some(session);
        Ok(())
    }

    pub fn sign_out(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.inner.storage.remove_item(key) {
                error!("Failed to remove {} from storage: {}", key, err);
            }
        }

        self.inner.api.set_token(None);
        if let Some(session) = self.session().take() {
            info!("Signed out user {}", session.user.id);
        }
    }

    /// Replace the signed in user. The token stays as it is.
    pub fn update_user(&self, user: User) {
        let mut session = self.session();
        let Some(session) = session.as_mut() else {
            warn!("Ignoring user update while signed out");
            return;
        };

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(err) = self.inner.storage.set_item(USER_KEY, &json) {
                    error!("Failed to persist user {}: {}", user.id, err);
                }
            }
            Err(err) => error!("Failed to serialize user {}: {}", user.id, err),
        }

        debug!("Updated user {}", user.id);
        session.user = user;
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        let user = serde_json::to_string(&session.user)?;
        let storage = &self.inner.storage;

        storage.set_item(TOKEN_KEY, &session.token)?;
        if let Err(err) = storage.set_item(USER_KEY, &user) {
            // Don't leave a token behind without its user
            if let Err(err) = storage.remove_item(TOKEN_KEY) {
                error!("Failed to roll back stored token: {}", err);
            }
            return Err(err.into());
        }

        Ok(())
    }

    fn session(&self) -> MutexGuard<'_, Option<Session>> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn read_session(storage: &dyn Storage) -> Result<Option<Session>, Error> {
    let token = storage.get_item(TOKEN_KEY)?;
    let user = storage.get_item(USER_KEY)?;

    let (Some(token), Some(user)) = (token, user) else {
        return Ok(None);
    };

    let user = serde_json::from_str::<User>(&user)?;
    Ok(Some(Session { token, user }))
}
