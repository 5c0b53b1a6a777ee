pub mod chat_usecase;
pub mod document_usecase;
pub mod prefs_usecase;

pub use chat_usecase::{ChatUseCase, SendOutcome, SEND_FAILURE_REPLY};
pub use document_usecase::{
    DocumentUseCase, UploadFailure, UploadOutcome, UploadProgress, UPLOAD_TRANSPORT_FAILURE,
};
pub use prefs_usecase::PreferencesUseCase;
