//! Remote chat service contract.
//!
//! The backend owns the language model, the per-folder document indexes,
//! and the server-side chat history (keyed by session ID). The client only
//! consumes these endpoints; this module defines the trait the use cases
//! talk to plus the wire types, so the HTTP implementation stays swappable
//! and the use cases stay mockable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Folder path segment used when a chat is not filed under any folder.
pub const UNFILED_SEGMENT: &str = "default";

/// A retrieval hit the backend grounded its reply on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Excerpt of the matching document chunk.
    pub content: String,
    /// Loader metadata (source file, page, etc.). Shape varies by loader.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The assistant's reply to a sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant response text.
    pub response: String,
    /// Retrieval hits behind the response. Empty when the folder has no
    /// document index.
    #[serde(default)]
    pub sources: Vec<SourceChunk>,
}

/// Receipt returned by a successful document upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Filename as stored on the server.
    pub filename: String,
    /// Number of index chunks the document produced, when reported.
    #[serde(default)]
    pub chunks: Option<u32>,
}

/// The remote chat service consumed by the use cases.
///
/// Errors split into two variants (see [`crate::MentorError`]):
/// `RemoteStatus` for a reachable server answering non-2xx, and
/// `RemoteTransport` for everything below that (connect, timeout, body
/// read). Callers rely on the distinction for error wording.
#[async_trait]
pub trait RemoteChatService: Send + Sync {
    /// Sends a message to a chat session.
    ///
    /// # Arguments
    ///
    /// * `folder_id` - The folder whose document index grounds the reply,
    ///   or `None` for the shared [`UNFILED_SEGMENT`] index
    /// * `session_id` - The chat ID; the server keeps history per session
    /// * `message` - The user's message text
    async fn send_message(
        &self,
        folder_id: Option<&str>,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply>;

    /// Deletes the server-side history of a chat session.
    async fn delete_chat(&self, chat_id: &str) -> Result<()>;

    /// Deletes a folder's uploads and document index on the server.
    async fn delete_folder(&self, folder_id: &str) -> Result<()>;

    /// Lists the filenames uploaded to a folder.
    async fn list_documents(&self, folder_id: &str) -> Result<Vec<String>>;

    /// Uploads one document to a folder's index.
    async fn upload_document(
        &self,
        folder_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt>;

    /// Deletes one uploaded document from a folder.
    async fn delete_document(&self, folder_id: &str, filename: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_tolerates_missing_sources() {
        let reply: ChatReply = serde_json::from_str(r#"{"response":"hi"}"#).unwrap();
        assert_eq!(reply.response, "hi");
        assert!(reply.sources.is_empty());
    }

    #[test]
    fn test_upload_receipt_parses_backend_shape() {
        let receipt: UploadReceipt =
            serde_json::from_str(r#"{"filename":"notes.pdf","chunks":12,"folder_id":"f1"}"#)
                .unwrap();
        assert_eq!(receipt.filename, "notes.pdf");
        assert_eq!(receipt.chunks, Some(12));
    }
}
