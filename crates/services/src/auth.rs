use std::sync::RwLock;

/// Where the signed-in user's bearer token lives between requests.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}
