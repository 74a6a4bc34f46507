use std::sync::RwLock;

/// Bearer token of the signed-in staff member, shared by every API collaborator.
///
/// An upstream 401 clears the token. The console then returns to `login_url`.
#[derive(Debug)]
pub struct Session {
    token: RwLock<Option<String>>,
    login_url: String,
}

impl Session {
    pub fn new(token: Option<String>, login_url: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
            login_url: login_url.into(),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }

    pub fn invalidate(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_clears_token() {
        let session = Session::new(Some("abc".to_string()), "/login");
        assert!(session.is_active());
        assert_eq!(session.token().as_deref(), Some("abc"));
        session.invalidate();
        assert!(!session.is_active());
        assert_eq!(session.login_url(), "/login");
    }

    #[test]
    fn empty_token_is_no_session() {
        assert!(!Session::new(Some(String::new()), "/login").is_active());
    }
}
