//! Characters and organizations attached to a project.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A character or organization sheet used as prompt context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Unique character identifier
    pub id: Uuid,
    /// Owning project
    pub project_id: Uuid,
    /// Display name
    pub name: String,
    /// Narrative role, e.g. protagonist or antagonist
    pub role_type: Option<String>,
    /// Personality sketch; prompt assembly truncates it to 100 characters
    pub personality: Option<String>,
    /// Organizations are labeled differently from characters in prompts
    pub is_organization: bool,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
}
