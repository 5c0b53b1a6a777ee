//! Document use case implementation.
//!
//! `DocumentUseCase` coordinates per-folder document uploads against the
//! remote chat service. Uploads run strictly one at a time so failures
//! attribute cleanly to a single file and the backend is never flooded;
//! a failing file never aborts the rest of the batch. The document listing
//! held here is only a cache of the last server response, never
//! authoritative.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use mentor_core::remote::RemoteChatService;
use mentor_core::{MentorError, Result};

/// Failure message recorded when a file never reached the server
/// (unreadable locally, or transport failure).
pub const UPLOAD_TRANSPORT_FAILURE: &str = "Upload failed";

/// One failed file in an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Name of the file that failed.
    pub filename: String,
    /// Human-readable reason: the backend's detail for a refused upload,
    /// or [`UPLOAD_TRANSPORT_FAILURE`] when the request never completed.
    pub message: String,
}

/// Progress of an in-flight upload batch. `current` counts successful
/// uploads only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub current: usize,
    pub total: usize,
}

/// Result of an upload batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadOutcome {
    /// Number of files the server accepted.
    pub uploaded: usize,
    /// Number of files attempted.
    pub total: usize,
    /// Per-file failures, in batch order.
    pub failures: Vec<UploadFailure>,
    /// The folder's document listing after the batch.
    pub documents: Vec<String>,
}

/// Use case for per-folder document management.
pub struct DocumentUseCase {
    /// The remote chat service.
    remote: Arc<dyn RemoteChatService>,
    /// Cache of the last document listing received from the server.
    documents: RwLock<Vec<String>>,
    /// Progress of the in-flight batch, if any. Cleared when the batch
    /// finishes, whatever the per-file outcomes.
    progress: RwLock<Option<UploadProgress>>,
}

impl DocumentUseCase {
    /// Creates a use case over the given remote service.
    pub fn new(remote: Arc<dyn RemoteChatService>) -> Self {
        Self {
            remote,
            documents: RwLock::new(Vec::new()),
            progress: RwLock::new(None),
        }
    }

    /// Returns the cached document listing.
    pub async fn documents(&self) -> Vec<String> {
        self.documents.read().await.clone()
    }

    /// Returns the in-flight upload progress, if a batch is running.
    pub async fn progress(&self) -> Option<UploadProgress> {
        *self.progress.read().await
    }

    /// Re-queries the folder's document listing and replaces the cache.
    pub async fn refresh_documents(&self, folder_id: &str) -> Result<Vec<String>> {
        let listing = self.remote.list_documents(folder_id).await?;
        *self.documents.write().await = listing.clone();
        Ok(listing)
    }

    /// Uploads a batch of files to a folder, one at a time.
    ///
    /// Requires a target folder; without one the batch is a no-op. Files
    /// are uploaded in order and a failure is recorded per file without
    /// aborting the rest. After the last file, whatever the outcomes, the
    /// document listing is refreshed and the progress indicator cleared.
    pub async fn upload_documents(
        &self,
        folder_id: Option<&str>,
        files: &[PathBuf],
    ) -> Result<UploadOutcome> {
        let Some(folder_id) = folder_id else {
            tracing::warn!("Upload requested without a target folder; ignoring");
            return Ok(UploadOutcome::default());
        };

        let total = files.len();
        *self.progress.write().await = Some(UploadProgress { current: 0, total });

        let mut uploaded = 0;
        let mut failures = Vec::new();

        for path in files {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Could not read {}: {}", path.display(), e);
                    failures.push(UploadFailure {
                        filename,
                        message: UPLOAD_TRANSPORT_FAILURE.to_string(),
                    });
                    continue;
                }
            };

            match self.remote.upload_document(folder_id, &filename, bytes).await {
                Ok(receipt) => {
                    uploaded += 1;
                    *self.progress.write().await =
                        Some(UploadProgress { current: uploaded, total });
                    tracing::debug!(
                        "Uploaded {} ({} chunks indexed)",
                        receipt.filename,
                        receipt.chunks.unwrap_or(0)
                    );
                }
                Err(MentorError::RemoteStatus { detail, .. }) => {
                    failures.push(UploadFailure {
                        filename,
                        message: detail,
                    });
                }
                Err(e) => {
                    tracing::warn!("Upload of {} failed: {}", filename, e);
                    failures.push(UploadFailure {
                        filename,
                        message: UPLOAD_TRANSPORT_FAILURE.to_string(),
                    });
                }
            }
        }

        // The batch is done: refresh the listing and drop the progress
        // indicator regardless of how the files fared.
        let documents = match self.refresh_documents(folder_id).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!("Could not refresh documents for {}: {}", folder_id, e);
                self.documents.read().await.clone()
            }
        };
        *self.progress.write().await = None;

        Ok(UploadOutcome {
            uploaded,
            total,
            failures,
            documents,
        })
    }

    /// Deletes one uploaded document, then refreshes the listing.
    ///
    /// A failed delete is logged and otherwise silent; the listing is left
    /// as it was so the file stays visible for a retry.
    pub async fn delete_document(&self, folder_id: &str, filename: &str) {
        match self.remote.delete_document(folder_id, filename).await {
            Ok(()) => {
                if let Err(e) = self.refresh_documents(folder_id).await {
                    tracing::warn!("Could not refresh documents for {}: {}", folder_id, e);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to delete {} from {}: {}", filename, folder_id, e);
            }
        }
    }
}
