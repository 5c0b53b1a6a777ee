//! Timestamp helpers.

/// Returns the current UTC time as an RFC 3339 string.
///
/// All persisted timestamps use this format.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
