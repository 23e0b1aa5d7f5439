//! Generation audit records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only audit record for one AI generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationHistory {
    /// Unique record identifier
    pub id: Uuid,
    /// Project the call generated content for
    pub project_id: Uuid,
    /// Prompt sent to the provider, possibly truncated and round-tagged
    pub prompt: String,
    /// Raw text returned by the provider
    pub generated_content: String,
    /// Model identifier recorded for the call
    pub model: String,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}

/// Values for appending one history record.
///
/// The store assigns identity and timestamp; callers provide the audit
/// payload. Records are write-once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Prompt sent to the provider
    pub prompt: String,
    /// Raw text returned by the provider
    pub generated_content: String,
    /// Model identifier to record
    pub model: String,
}
