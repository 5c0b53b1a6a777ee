//! Chat and folder entities.
//!
//! These are the "pure" domain models the store operates on, independent of
//! any specific storage format.

use serde::{Deserialize, Serialize};

use super::message::ConversationMessage;
use crate::ids::new_id;
use crate::time::now_rfc3339;

/// Title given to a chat before its first exchange.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// A single chat thread.
///
/// A chat owns its transcript. It is mutated only by appending messages or
/// by editing `title`/`folder_id`; messages are never reordered or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique chat identifier.
    pub id: String,
    /// Display title, derived from the first user message once sent.
    pub title: String,
    /// Transcript in conversation order.
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    /// Timestamp when the chat was created (RFC 3339 format).
    pub created_at: String,
    /// Owning folder, `None` when unfiled.
    #[serde(default)]
    pub folder_id: Option<String>,
}

impl Chat {
    /// Creates an empty chat, optionally filed under a folder.
    pub fn new(folder_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now_rfc3339(),
            folder_id,
        }
    }
}

/// A folder grouping chats in the sidebar.
///
/// Folders own chats by reference (`chat.folder_id == folder.id`). Deleting
/// a folder never deletes its chats; they become unfiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: String,
    /// Display name. Empty names are permitted.
    pub name: String,
    /// Timestamp when the folder was created (RFC 3339 format).
    pub created_at: String,
    /// Whether the folder is expanded in the sidebar. Persisted UI state.
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl Folder {
    /// Creates a folder with the given name, expanded by default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now_rfc3339(),
            is_expanded: true,
        }
    }
}
