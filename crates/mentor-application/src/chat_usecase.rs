//! Chat use case implementation.
//!
//! `ChatUseCase` owns the in-memory chat/folder tree and coordinates it
//! with the remote chat service and the persisted snapshot. Every accepted
//! mutation is written through to the repository before the call returns;
//! the persisted snapshot is the sole source of truth on restart.

use std::sync::Arc;

use tokio::sync::RwLock;

use mentor_core::chat::{derive_title, ChatStore, StoreRepository};
use mentor_core::remote::{RemoteChatService, SourceChunk};
use mentor_core::Result;

/// Assistant reply recorded when the remote call fails. The failure is
/// absorbed into the transcript rather than surfaced to the caller.
pub const SEND_FAILURE_REPLY: &str =
    "I apologize, but I couldn't process your message. Please try again.";

/// Result of a send-message attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing was sent: the input was blank or no chat is selected.
    Ignored,
    /// The backend replied and the exchange was recorded.
    Sent {
        /// Assistant response text.
        reply: String,
        /// Retrieval hits behind the response.
        sources: Vec<SourceChunk>,
    },
    /// The remote call failed; the exchange was recorded with
    /// [`SEND_FAILURE_REPLY`] as the assistant text.
    Failed,
}

/// Use case for the chat/folder tree and the send-message protocol.
///
/// # Responsibilities
///
/// - Hydrating the tree from the repository at startup
/// - Funneling all tree mutations through the store operations
/// - Persisting the full snapshot after every accepted mutation
/// - Driving the send-message protocol against the remote service
/// - Gating destructive remote deletes: local state only changes when the
///   server confirmed the delete
///
/// # Thread Safety
///
/// The store sits behind an `RwLock`, so presentation can snapshot while a
/// mutation is in flight; mutations themselves are serialized by the lock.
pub struct ChatUseCase {
    /// The in-memory tree, mutated in place and persisted as a whole.
    store: Arc<RwLock<ChatStore>>,
    /// Repository for the persisted snapshot.
    repository: Arc<dyn StoreRepository>,
    /// The remote chat service.
    remote: Arc<dyn RemoteChatService>,
}

impl ChatUseCase {
    /// Creates a use case with an empty tree. Call [`Self::hydrate`] to
    /// load the persisted snapshot.
    pub fn new(repository: Arc<dyn StoreRepository>, remote: Arc<dyn RemoteChatService>) -> Self {
        Self {
            store: Arc::new(RwLock::new(ChatStore::new())),
            repository,
            remote,
        }
    }

    /// Loads the persisted snapshot, falling back to an empty tree when
    /// nothing (readable) is persisted yet.
    pub async fn hydrate(&self) -> Result<()> {
        let loaded = self.repository.load().await?.unwrap_or_default();
        *self.store.write().await = loaded;
        Ok(())
    }

    /// Returns a clone of the current tree for presentation.
    pub async fn snapshot(&self) -> ChatStore {
        self.store.read().await.clone()
    }

    /// Creates a chat, selects it, persists, and returns its ID.
    pub async fn create_chat(&self, folder_id: Option<String>) -> Result<String> {
        let (id, snapshot) = {
            let mut store = self.store.write().await;
            let id = store.create_chat(folder_id);
            (id, store.clone())
        };
        self.repository.save(&snapshot).await?;
        Ok(id)
    }

    /// Selects the current chat.
    pub async fn select_chat(&self, chat_id: &str) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            store.select_chat(chat_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Sets or clears the highlighted folder.
    pub async fn select_folder(&self, folder_id: Option<String>) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            store.select_folder(folder_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Creates a folder and returns its ID, or `None` for a blank name.
    /// A rejected name is a no-op and is not persisted.
    pub async fn create_folder(&self, name: &str) -> Result<Option<String>> {
        let (created, snapshot) = {
            let mut store = self.store.write().await;
            let created = store.create_folder(name);
            (created, store.clone())
        };
        if created.is_some() {
            self.repository.save(&snapshot).await?;
        }
        Ok(created)
    }

    /// Renames a folder.
    pub async fn rename_folder(&self, folder_id: &str, name: &str) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            store.rename_folder(folder_id, name);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Flips a folder's expanded state.
    pub async fn toggle_folder_expansion(&self, folder_id: &str) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            store.toggle_folder_expansion(folder_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Moves a chat into a folder (or to unfiled with `None`). Delivered
    /// as one discrete intent, typically from a completed drag-and-drop.
    pub async fn move_chat(&self, chat_id: &str, target_folder_id: Option<String>) -> Result<()> {
        let snapshot = {
            let mut store = self.store.write().await;
            store.move_chat(chat_id, target_folder_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Deletes a chat on the server, then locally.
    ///
    /// When the server refuses, the chat stays visible so the user can
    /// retry the deletion; the failure is only logged.
    pub async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        if let Err(e) = self.remote.delete_chat(chat_id).await {
            tracing::warn!("Failed to delete chat {} on server: {}", chat_id, e);
            return Ok(());
        }

        let snapshot = {
            let mut store = self.store.write().await;
            store.remove_chat(chat_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Deletes a folder on the server, then locally.
    ///
    /// Local removal reassigns the folder's chats to unfiled; their
    /// transcripts are untouched. A server failure leaves everything in
    /// place and is only logged.
    pub async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        if let Err(e) = self.remote.delete_folder(folder_id).await {
            tracing::warn!("Failed to delete folder {} on server: {}", folder_id, e);
            return Ok(());
        }

        let snapshot = {
            let mut store = self.store.write().await;
            store.remove_folder(folder_id);
            store.clone()
        };
        self.repository.save(&snapshot).await
    }

    /// Sends a message to the current chat.
    ///
    /// The user message is recorded together with the response or the
    /// failure reply, never before: there is no optimistic append while
    /// the request is in flight. On the first exchange of a chat the title
    /// is derived from the user text. Both terminal paths persist; remote
    /// failures are absorbed into the transcript and reported through
    /// [`SendOutcome::Failed`], not as an error.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let (chat_id, folder_id, first_exchange) = {
            let store = self.store.read().await;
            match store.current_chat() {
                Some(chat) => (
                    chat.id.clone(),
                    chat.folder_id.clone(),
                    chat.messages.is_empty(),
                ),
                None => return Ok(SendOutcome::Ignored),
            }
        };

        let result = self
            .remote
            .send_message(folder_id.as_deref(), &chat_id, trimmed)
            .await;

        let (outcome, snapshot) = {
            let mut store = self.store.write().await;
            let outcome = match result {
                Ok(reply) => {
                    store.append_exchange(&chat_id, trimmed, &reply.response);
                    if first_exchange {
                        store.set_chat_title(&chat_id, derive_title(trimmed));
                    }
                    SendOutcome::Sent {
                        reply: reply.response,
                        sources: reply.sources,
                    }
                }
                Err(e) => {
                    tracing::warn!("Send failed for chat {}: {}", chat_id, e);
                    store.append_exchange(&chat_id, trimmed, SEND_FAILURE_REPLY);
                    SendOutcome::Failed
                }
            };
            (outcome, store.clone())
        };

        self.repository.save(&snapshot).await?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mentor_core::chat::DEFAULT_CHAT_TITLE;
    use mentor_core::remote::{ChatReply, UploadReceipt};
    use mentor_core::MentorError;
    use std::sync::Mutex;

    // Mock StoreRepository for testing
    struct MockStoreRepository {
        initial: Mutex<Option<ChatStore>>,
        saved: Mutex<Vec<ChatStore>>,
    }

    impl MockStoreRepository {
        fn new() -> Self {
            Self {
                initial: Mutex::new(None),
                saved: Mutex::new(Vec::new()),
            }
        }

        fn with_initial(store: ChatStore) -> Self {
            Self {
                initial: Mutex::new(Some(store)),
                saved: Mutex::new(Vec::new()),
            }
        }

        fn save_count(&self) -> usize {
            self.saved.lock().unwrap().len()
        }

        fn last_saved(&self) -> Option<ChatStore> {
            self.saved.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl StoreRepository for MockStoreRepository {
        async fn load(&self) -> Result<Option<ChatStore>> {
            Ok(self.initial.lock().unwrap().clone())
        }

        async fn save(&self, store: &ChatStore) -> Result<()> {
            self.saved.lock().unwrap().push(store.clone());
            Ok(())
        }
    }

    // Mock RemoteChatService for testing
    struct MockRemote {
        fail_send: bool,
        fail_delete: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockRemote {
        fn new() -> Self {
            Self {
                fail_send: false,
                fail_delete: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_send() -> Self {
            Self {
                fail_send: true,
                ..Self::new()
            }
        }

        fn failing_delete() -> Self {
            Self {
                fail_delete: true,
                ..Self::new()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteChatService for MockRemote {
        async fn send_message(
            &self,
            folder_id: Option<&str>,
            session_id: &str,
            _message: &str,
        ) -> Result<ChatReply> {
            self.calls.lock().unwrap().push(format!(
                "send:{}:{}",
                folder_id.unwrap_or("default"),
                session_id
            ));
            if self.fail_send {
                Err(MentorError::remote_transport("connection refused"))
            } else {
                Ok(ChatReply {
                    response: "the answer".to_string(),
                    sources: Vec::new(),
                })
            }
        }

        async fn delete_chat(&self, chat_id: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("delete_chat:{chat_id}"));
            if self.fail_delete {
                Err(MentorError::remote_status(500, "boom"))
            } else {
                Ok(())
            }
        }

        async fn delete_folder(&self, folder_id: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("delete_folder:{folder_id}"));
            if self.fail_delete {
                Err(MentorError::remote_status(500, "boom"))
            } else {
                Ok(())
            }
        }

        async fn list_documents(&self, _folder_id: &str) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn upload_document(
            &self,
            _folder_id: &str,
            filename: &str,
            _bytes: Vec<u8>,
        ) -> Result<UploadReceipt> {
            Ok(UploadReceipt {
                filename: filename.to_string(),
                chunks: None,
            })
        }

        async fn delete_document(&self, _folder_id: &str, _filename: &str) -> Result<()> {
            Ok(())
        }
    }

    fn usecase_with(
        repository: Arc<MockStoreRepository>,
        remote: Arc<MockRemote>,
    ) -> ChatUseCase {
        ChatUseCase::new(repository, remote)
    }

    #[tokio::test]
    async fn test_hydrate_restores_persisted_snapshot() {
        let mut persisted = ChatStore::new();
        let chat_id = persisted.create_chat(None);
        persisted.append_exchange(&chat_id, "hi", "hello");

        let repository = Arc::new(MockStoreRepository::with_initial(persisted.clone()));
        let usecase = usecase_with(repository, Arc::new(MockRemote::new()));

        usecase.hydrate().await.unwrap();
        assert_eq!(usecase.snapshot().await, persisted);
    }

    #[tokio::test]
    async fn test_send_failure_absorbed_into_transcript() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository.clone(), Arc::new(MockRemote::failing_send()));
        let chat_id = usecase.create_chat(None).await.unwrap();

        let outcome = usecase.send_message("what is entropy?").await.unwrap();

        assert_eq!(outcome, SendOutcome::Failed);
        let snapshot = usecase.snapshot().await;
        let chat = snapshot.chat(&chat_id).unwrap();
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].content, "what is entropy?");
        assert_eq!(chat.messages[1].content, SEND_FAILURE_REPLY);
        // Title derivation only happens on a successful first exchange.
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
        // The failed exchange was still persisted.
        assert_eq!(repository.last_saved().unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_send_success_derives_title_on_first_exchange() {
        let repository = Arc::new(MockStoreRepository::new());
        let remote = Arc::new(MockRemote::new());
        let usecase = usecase_with(repository, remote.clone());
        let chat_id = usecase.create_chat(None).await.unwrap();

        let question = "please explain the second law of thermodynamics";
        let outcome = usecase.send_message(question).await.unwrap();

        assert!(matches!(outcome, SendOutcome::Sent { ref reply, .. } if reply == "the answer"));
        let snapshot = usecase.snapshot().await;
        let chat = snapshot.chat(&chat_id).unwrap();
        assert_eq!(chat.title, derive_title(question));
        assert!(chat.title.ends_with("..."));

        // A second exchange leaves the title alone.
        usecase.send_message("and the third law?").await.unwrap();
        let snapshot = usecase.snapshot().await;
        assert_eq!(snapshot.chat(&chat_id).unwrap().title, derive_title(question));
        assert_eq!(remote.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_send_addresses_folder_of_current_chat() {
        let repository = Arc::new(MockStoreRepository::new());
        let remote = Arc::new(MockRemote::new());
        let usecase = usecase_with(repository, remote.clone());

        let folder_id = usecase.create_folder("Physics").await.unwrap().unwrap();
        let chat_id = usecase.create_chat(Some(folder_id.clone())).await.unwrap();

        usecase.send_message("hi").await.unwrap();
        assert_eq!(remote.calls(), vec![format!("send:{folder_id}:{chat_id}")]);
    }

    #[tokio::test]
    async fn test_send_ignored_without_input_or_chat() {
        let repository = Arc::new(MockStoreRepository::new());
        let remote = Arc::new(MockRemote::new());
        let usecase = usecase_with(repository.clone(), remote.clone());

        // No chat selected yet.
        assert_eq!(usecase.send_message("hi").await.unwrap(), SendOutcome::Ignored);

        usecase.create_chat(None).await.unwrap();
        let saves_before = repository.save_count();
        assert_eq!(
            usecase.send_message("   ").await.unwrap(),
            SendOutcome::Ignored
        );

        assert!(remote.calls().is_empty());
        assert_eq!(repository.save_count(), saves_before);
    }

    #[tokio::test]
    async fn test_delete_current_chat_reselects_first_remaining() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository, Arc::new(MockRemote::new()));

        let older = usecase.create_chat(None).await.unwrap();
        let newer = usecase.create_chat(None).await.unwrap();

        usecase.delete_chat(&newer).await.unwrap();
        let snapshot = usecase.snapshot().await;
        assert!(snapshot.chat(&newer).is_none());
        assert_eq!(snapshot.current_chat_id, Some(older.clone()));

        usecase.delete_chat(&older).await.unwrap();
        assert!(usecase.snapshot().await.current_chat_id.is_none());
    }

    #[tokio::test]
    async fn test_delete_chat_failure_leaves_chat_in_place() {
        let repository = Arc::new(MockStoreRepository::new());
        let remote = Arc::new(MockRemote::failing_delete());
        let usecase = usecase_with(repository.clone(), remote.clone());

        let chat_id = usecase.create_chat(None).await.unwrap();
        let saves_before = repository.save_count();

        usecase.delete_chat(&chat_id).await.unwrap();

        let snapshot = usecase.snapshot().await;
        assert!(snapshot.chat(&chat_id).is_some());
        assert_eq!(snapshot.current_chat_id, Some(chat_id.clone()));
        // Nothing changed locally, so nothing was persisted.
        assert_eq!(repository.save_count(), saves_before);
        assert_eq!(remote.calls(), vec![format!("delete_chat:{chat_id}")]);
    }

    #[tokio::test]
    async fn test_delete_folder_unfiles_chats() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository, Arc::new(MockRemote::new()));

        let folder_id = usecase.create_folder("Physics").await.unwrap().unwrap();
        let chat_id = usecase.create_chat(Some(folder_id.clone())).await.unwrap();
        usecase.send_message("hi").await.unwrap();

        usecase.delete_folder(&folder_id).await.unwrap();

        let snapshot = usecase.snapshot().await;
        assert!(snapshot.folder(&folder_id).is_none());
        let chat = snapshot.chat(&chat_id).unwrap();
        assert!(chat.folder_id.is_none());
        assert_eq!(chat.messages.len(), 2);
    }

    #[tokio::test]
    async fn test_create_folder_blank_name_not_persisted() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository.clone(), Arc::new(MockRemote::new()));

        assert!(usecase.create_folder("   ").await.unwrap().is_none());
        assert_eq!(repository.save_count(), 0);
    }

    #[tokio::test]
    async fn test_select_folder_highlight_persists() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository.clone(), Arc::new(MockRemote::new()));

        let folder_id = usecase.create_folder("Physics").await.unwrap().unwrap();
        usecase.select_folder(Some(folder_id.clone())).await.unwrap();

        let saved = repository.last_saved().unwrap();
        assert_eq!(saved.current_folder_id, Some(folder_id));

        usecase.select_folder(None).await.unwrap();
        assert!(repository.last_saved().unwrap().current_folder_id.is_none());
    }

    #[tokio::test]
    async fn test_move_chat_persists_reassignment() {
        let repository = Arc::new(MockStoreRepository::new());
        let usecase = usecase_with(repository.clone(), Arc::new(MockRemote::new()));

        let folder_id = usecase.create_folder("Physics").await.unwrap().unwrap();
        let chat_id = usecase.create_chat(None).await.unwrap();

        usecase
            .move_chat(&chat_id, Some(folder_id.clone()))
            .await
            .unwrap();

        let saved = repository.last_saved().unwrap();
        assert_eq!(saved.chat(&chat_id).unwrap().folder_id, Some(folder_id));
    }
}
