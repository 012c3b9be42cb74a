/// The logged-in state: an authentication token plus the library-owner
/// identity. The session is empty (logged out) when the token is cleared;
/// every gating decision keys off token non-emptiness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    owner: String,
    token: String,
}

impl Session {
    pub fn new(owner: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            token: token.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn clear(&mut self) {
        self.owner.clear();
        self.token.clear();
    }
}
