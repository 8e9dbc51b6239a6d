//! Auth session store: one operator account, at most one live session.

use std::sync::{Arc, Mutex};

use rand::RngCore;
use tracing::{info, warn};

use crate::errors::AuthError;
use crate::runtime::{lock, Clock};
use crate::types::{Session, User};

/// The single operator account allowed to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            email: "admin@paymentsco.com".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    credentials: Arc<Credentials>,
    clock: Arc<dyn Clock>,
    current: Arc<Mutex<Option<Session>>>,
}

impl SessionStore {
    pub fn new(credentials: Credentials, clock: Arc<dyn Clock>) -> Self {
        Self {
            credentials: Arc::new(credentials),
            clock,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts a session, replacing any existing one.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username != self.credentials.username || password != self.credentials.password {
            warn!("Rejected login attempt for {username:?}");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            user: User {
                id: "1".to_string(),
                username: self.credentials.username.clone(),
                email: self.credentials.email.clone(),
            },
            token: new_token(),
            logged_in_at: self.clock.now(),
        };
        *lock(&self.current) = Some(session.clone());
        info!("{} signed in", session.user.username);
        Ok(session)
    }

    pub fn logout(&self) {
        if let Some(session) = lock(&self.current).take() {
            info!("{} signed out", session.user.username);
        }
    }

    pub fn current(&self) -> Option<Session> {
        lock(&self.current).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.current).is_some()
    }

    /// The live session, if `token` belongs to it.
    pub fn authorize(&self, token: &str) -> Option<Session> {
        lock(&self.current)
            .as_ref()
            .filter(|s| tokens_match(&s.token, token))
            .cloned()
    }
}

/// Byte comparison whose running time does not depend on where the first
/// mismatch is. Only the length can short-circuit.
fn tokens_match(expected: &str, given: &str) -> bool {
    let (expected, given) = (expected.as_bytes(), given.as_bytes());
    expected.len() == given.len()
        && expected
            .iter()
            .zip(given)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

fn new_token() -> String {
    let mut bytes = [0u8; 24];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
