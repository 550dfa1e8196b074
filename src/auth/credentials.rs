//! Username → secret store. Secrets are kept only as Argon2 PHC strings.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{errors::AppError, password::SecretHasher};

pub struct CredentialStore {
    users: RwLock<HashMap<String, String>>,
    hasher: SecretHasher,
}

impl CredentialStore {
    pub fn new(hasher: SecretHasher) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Fails with `AlreadyExists` if the username is taken.
    pub fn add_user(&self, username: &str, secret: &str) -> Result<(), AppError> {
        if self.users.read().contains_key(username) {
            return Err(AppError::AlreadyExists);
        }

        // hashing is slow; keep it outside the write lock
        let hash = self.hasher.hash(secret)?;

        let mut users = self.users.write();
        if users.contains_key(username) {
            return Err(AppError::AlreadyExists);
        }
        users.insert(username.to_string(), hash);
        Ok(())
    }

    pub fn validate_user(&self, username: &str, secret: &str) -> bool {
        let stored = match self.users.read().get(username) {
            Some(hash) => hash.clone(),
            None => return false,
        };

        match self.hasher.verify(secret, &stored) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::error!(error = %e, username, "stored credential is unreadable");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
