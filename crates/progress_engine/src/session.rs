use std::fmt;
use std::sync::{Arc, RwLock};

/// Bearer credentials of the signed-in user.
///
/// Cloned into every fetch closure instead of living in a global; set when a
/// session starts and cleared on logout.
#[derive(Clone, Default)]
pub struct SessionContext {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.begin(token);
        session
    }

    pub fn begin(&self, token: impl Into<String>) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(token.into());
    }

    pub fn end(&self) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }

    pub fn token(&self) -> Option<String> {
        let guard = match self.token.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.clone()
    }

    pub fn is_active(&self) -> bool {
        self.token().is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("active", &self.is_active())
            .finish()
    }
}
