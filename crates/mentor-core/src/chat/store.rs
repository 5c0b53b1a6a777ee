//! The chat/folder tree aggregate and its mutation operations.
//!
//! `ChatStore` is the aggregate root for everything the sidebar shows:
//! the ordered chat list, the folder set, and the current selections. All
//! tree mutations funnel through the operations here; callers own a single
//! store instance and persist the full snapshot after every accepted
//! mutation.

use serde::{Deserialize, Serialize};

use super::message::{ConversationMessage, MessageRole};
use super::model::{Chat, Folder};

/// Maximum number of characters kept when deriving a chat title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Derives a chat title from its first user message.
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends `...` when the
/// text was longer; shorter text is returned unchanged.
pub fn derive_title(text: &str) -> String {
    if text.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = text.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

/// The aggregate root of the chat/folder tree.
///
/// Invariants maintained by the operations below:
/// - chat IDs are unique across the store
/// - `current_chat_id`, when set, references an existing chat; deleting the
///   current chat reselects the first remaining chat or clears the selection
/// - deleting a folder reassigns its chats to unfiled instead of deleting them
///
/// A chat whose `folder_id` no longer resolves to an existing folder is
/// treated as unfiled by the read helpers, so it can never disappear from
/// every listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStore {
    /// All chats, newest first (new chats are prepended).
    #[serde(default)]
    pub chats: Vec<Chat>,
    /// All folders, in creation order.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// The currently open chat, if any.
    #[serde(default)]
    pub current_chat_id: Option<String>,
    /// The currently highlighted folder, if any. Tracked for the sidebar
    /// only; it does not filter the chat list.
    #[serde(default)]
    pub current_folder_id: Option<String>,
}

impl ChatStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Mutation operations
    // ------------------------------------------------------------------

    /// Creates a folder with the given name and returns its ID.
    ///
    /// A name that is empty after trimming is rejected and `None` is
    /// returned without touching the store.
    pub fn create_folder(&mut self, name: &str) -> Option<String> {
        if name.trim().is_empty() {
            return None;
        }
        let folder = Folder::new(name);
        let id = folder.id.clone();
        self.folders.push(folder);
        Some(id)
    }

    /// Creates an empty chat, prepends it to the chat list, selects it,
    /// and returns its ID.
    pub fn create_chat(&mut self, folder_id: Option<String>) -> String {
        let chat = Chat::new(folder_id);
        let id = chat.id.clone();
        self.chats.insert(0, chat);
        self.current_chat_id = Some(id.clone());
        id
    }

    /// Sets the current chat. The caller guarantees the chat exists.
    pub fn select_chat(&mut self, chat_id: &str) {
        self.current_chat_id = Some(chat_id.to_string());
    }

    /// Sets or clears the highlighted folder.
    pub fn select_folder(&mut self, folder_id: Option<String>) {
        self.current_folder_id = folder_id;
    }

    /// Renames a folder. No validation: empty names are permitted, and an
    /// unknown folder ID is a silent no-op.
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) {
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == folder_id) {
            folder.name = name.to_string();
        }
    }

    /// Flips a folder's expanded state.
    pub fn toggle_folder_expansion(&mut self, folder_id: &str) {
        if let Some(folder) = self.folders.iter_mut().find(|f| f.id == folder_id) {
            folder.is_expanded = !folder.is_expanded;
        }
    }

    /// Removes a chat from the store.
    ///
    /// If the removed chat was current, the first remaining chat becomes
    /// current, or the selection is cleared when none remain.
    pub fn remove_chat(&mut self, chat_id: &str) {
        self.chats.retain(|c| c.id != chat_id);
        if self.current_chat_id.as_deref() == Some(chat_id) {
            self.current_chat_id = self.chats.first().map(|c| c.id.clone());
        }
    }

    /// Removes a folder and reassigns its chats to unfiled.
    ///
    /// Chat transcripts are untouched; only the `folder_id` references are
    /// cleared. The folder highlight is cleared if it pointed here.
    pub fn remove_folder(&mut self, folder_id: &str) {
        self.folders.retain(|f| f.id != folder_id);
        for chat in &mut self.chats {
            if chat.folder_id.as_deref() == Some(folder_id) {
                chat.folder_id = None;
            }
        }
        if self.current_folder_id.as_deref() == Some(folder_id) {
            self.current_folder_id = None;
        }
    }

    /// Reassigns a chat to a folder (or to unfiled with `None`).
    ///
    /// Unconditional: moving a chat onto the folder it is already in is a
    /// harmless rewrite, and an unknown chat ID is a silent no-op.
    pub fn move_chat(&mut self, chat_id: &str, target_folder_id: Option<String>) {
        if let Some(chat) = self.chat_mut(chat_id) {
            chat.folder_id = target_folder_id;
        }
    }

    /// Appends a user/assistant exchange to a chat in one mutation.
    ///
    /// Exactly two messages are appended, user first. This is the only way
    /// messages enter a transcript, so the user's message is recorded even
    /// when the assistant text is an error reply.
    pub fn append_exchange(&mut self, chat_id: &str, user_text: &str, assistant_text: &str) {
        if let Some(chat) = self.chat_mut(chat_id) {
            chat.messages
                .push(ConversationMessage::new(MessageRole::User, user_text));
            chat.messages.push(ConversationMessage::new(
                MessageRole::Assistant,
                assistant_text,
            ));
        }
    }

    /// Sets a chat's display title.
    pub fn set_chat_title(&mut self, chat_id: &str, title: impl Into<String>) {
        if let Some(chat) = self.chat_mut(chat_id) {
            chat.title = title.into();
        }
    }

    // ------------------------------------------------------------------
    // Read helpers
    // ------------------------------------------------------------------

    /// Looks up a chat by ID.
    pub fn chat(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == chat_id)
    }

    /// Looks up a folder by ID.
    pub fn folder(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    /// Returns the currently selected chat, if any.
    pub fn current_chat(&self) -> Option<&Chat> {
        self.current_chat_id
            .as_deref()
            .and_then(|id| self.chat(id))
    }

    /// Returns the chats filed under a folder, in list order.
    pub fn chats_in_folder(&self, folder_id: &str) -> Vec<&Chat> {
        self.chats
            .iter()
            .filter(|c| c.folder_id.as_deref() == Some(folder_id))
            .collect()
    }

    /// Returns the unfiled chats, in list order.
    ///
    /// A chat whose `folder_id` does not resolve to an existing folder
    /// counts as unfiled here, so orphaned references still render.
    pub fn unfiled_chats(&self) -> Vec<&Chat> {
        self.chats
            .iter()
            .filter(|c| match c.folder_id.as_deref() {
                None => true,
                Some(id) => self.folder(id).is_none(),
            })
            .collect()
    }

    fn chat_mut(&mut self, chat_id: &str) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id == chat_id)
    }
}
