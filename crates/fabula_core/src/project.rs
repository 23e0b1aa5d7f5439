//! Novel project metadata.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A novel project and its world-building settings.
///
/// Prompt assembly reads the optional fields through fallback chains, so an
/// absent value never blocks generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier
    pub id: Uuid,
    /// Novel title
    pub title: String,
    /// Central theme of the story
    pub theme: Option<String>,
    /// Genre label
    pub genre: Option<String>,
    /// Narrative perspective, e.g. first or third person
    pub narrative_perspective: Option<String>,
    /// Target length of the finished novel in words
    pub target_words: Option<i32>,
    /// Era the story takes place in
    pub world_time_period: Option<String>,
    /// Primary setting
    pub world_location: Option<String>,
    /// Overall mood of the world
    pub world_atmosphere: Option<String>,
    /// Hard rules the world obeys
    pub world_rules: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}
