//! HTTP implementation of the remote chat service.
//!
//! Talks to the mentor backend over plain JSON endpoints plus one
//! multipart upload endpoint. Transport failures and non-success statuses
//! map onto the two remote error variants so callers can word failures
//! correctly; backend errors carry a `{detail}` body that is extracted
//! when present.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use mentor_core::remote::{ChatReply, RemoteChatService, UploadReceipt, UNFILED_SEGMENT};
use mentor_core::{MentorError, Result};

/// Remote chat service client over HTTP.
#[derive(Clone)]
pub struct HttpChatService {
    client: Client,
    base_url: String,
}

impl HttpChatService {
    /// Creates a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
    session_id: &'a str,
}

#[derive(Deserialize)]
struct DocumentsResponse {
    #[serde(default)]
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

fn transport_error(err: reqwest::Error) -> MentorError {
    MentorError::remote_transport(err.to_string())
}

/// Turns a non-success response into a `RemoteStatus` error, preferring the
/// backend's `{detail}` body over the raw status line.
async fn error_from_response(response: Response) -> MentorError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body
            }
        });
    MentorError::remote_status(status.as_u16(), detail)
}

async fn expect_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response).await)
    }
}

#[async_trait]
impl RemoteChatService for HttpChatService {
    async fn send_message(
        &self,
        folder_id: Option<&str>,
        session_id: &str,
        message: &str,
    ) -> Result<ChatReply> {
        let segment = folder_id.unwrap_or(UNFILED_SEGMENT);
        let response = self
            .client
            .post(self.url(&format!("/chat/{segment}")))
            .json(&SendMessageRequest {
                message,
                session_id,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let response = expect_success(response).await?;
        response.json::<ChatReply>().await.map_err(transport_error)
    }

    async fn delete_chat(&self, chat_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/chats/{chat_id}")))
            .send()
            .await
            .map_err(transport_error)?;

        expect_success(response).await?;
        Ok(())
    }

    async fn delete_folder(&self, folder_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/folders/{folder_id}")))
            .send()
            .await
            .map_err(transport_error)?;

        expect_success(response).await?;
        Ok(())
    }

    async fn list_documents(&self, folder_id: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url(&format!("/folders/{folder_id}/documents")))
            .send()
            .await
            .map_err(transport_error)?;

        let response = expect_success(response).await?;
        let listing = response
            .json::<DocumentsResponse>()
            .await
            .map_err(transport_error)?;
        Ok(listing.documents)
    }

    async fn upload_document(
        &self,
        folder_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadReceipt> {
        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(&format!("/upload/{folder_id}")))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let response = expect_success(response).await?;
        response
            .json::<UploadReceipt>()
            .await
            .map_err(transport_error)
    }

    async fn delete_document(&self, folder_id: &str, filename: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/folders/{folder_id}/files/{filename}")))
            .send()
            .await
            .map_err(transport_error)?;

        expect_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalized() {
        let service = HttpChatService::new("http://localhost:8000/");
        assert_eq!(
            service.url("/chat/default"),
            "http://localhost:8000/chat/default"
        );
    }

    #[test]
    fn test_error_body_detail_parses() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"File notes.pdf already exists"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("File notes.pdf already exists"));
    }

    #[test]
    fn test_documents_response_tolerates_missing_field() {
        let listing: DocumentsResponse = serde_json::from_str("{}").unwrap();
        assert!(listing.documents.is_empty());
    }
}
