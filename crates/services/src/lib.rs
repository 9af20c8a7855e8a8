pub mod api;
pub mod auth;
pub mod config;
pub mod http;
pub mod offline;

pub use api::{ApiError, PracticeApi, StartedSession};
pub use auth::{MemoryTokenStore, TokenStore};
pub use config::ApiConfig;
pub use http::HttpPracticeClient;
pub use offline::OfflinePracticeApi;
