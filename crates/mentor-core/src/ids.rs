//! Identifier generation.

use uuid::Uuid;

/// Generates a fresh unique identifier.
///
/// Uses UUIDv7, which embeds a millisecond timestamp: IDs sort by creation
/// time, which is enough ordering for a single-client store.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}
