//! Credential checking behind a trait so a real store can replace the
//! built-in pair without touching the session.

use thiserror::Error;

use crate::session::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password. Please try again.")]
    InvalidCredentials,
}

pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError>;
}

/// A single plain-text credential pair compared by exact equality.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    email: String,
    password: String,
    name: String,
}

impl StaticCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new("surajb3266@gmail.com", "Suraj@1999", "Suraj")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if email == self.email && password == self.password {
            Ok(Identity::new(email, self.name.clone()))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}
