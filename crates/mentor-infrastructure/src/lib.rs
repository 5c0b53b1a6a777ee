pub mod atomic_json;
pub mod config;
pub mod http_chat_service;
pub mod json_repository;
pub mod paths;

pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use config::MentorConfig;
pub use http_chat_service::HttpChatService;
pub use json_repository::{JsonPreferencesRepository, JsonStoreRepository};
pub use paths::{MentorPaths, PathError};
