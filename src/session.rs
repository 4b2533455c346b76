use tracing::info;

/// The signed-in principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// First word of the display name, used for the welcome line.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Who is signed in, if anyone. Owned by the app and handed to views by reference.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<Identity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&Identity> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn sign_in(&mut self, identity: Identity) {
        info!(email = %identity.email, "signed in");
        self.current_user = Some(identity);
    }

    /// Clears the session, returning whoever was signed in.
    pub fn sign_out(&mut self) -> Option<Identity> {
        let previous = self.current_user.take();
        if let Some(identity) = &previous {
            info!(email = %identity.email, "signed out");
        }
        previous
    }
}
