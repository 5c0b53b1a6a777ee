//! Chat domain module.
//!
//! This module contains the chat/folder tree domain models, the store
//! aggregate with its mutation operations, and the persistence trait.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `ConversationMessage`)
//! - `model`: Chat and folder entities (`Chat`, `Folder`)
//! - `store`: The aggregate root (`ChatStore`) and its mutation operations
//! - `repository`: Repository trait for store persistence

mod message;
mod model;
mod repository;
mod store;

// Re-export public API
pub use message::{ConversationMessage, MessageRole};
pub use model::{Chat, Folder, DEFAULT_CHAT_TITLE};
pub use repository::StoreRepository;
pub use store::{derive_title, ChatStore, TITLE_MAX_CHARS};
