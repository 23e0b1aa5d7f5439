//! Generation request types.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generation mode requested by the caller.
///
/// The mode is independent of delivery: batch and streaming runs resolve it
/// identically.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GenerationMode {
    /// Continue when the project already has outline entries, start fresh otherwise
    #[default]
    Auto,
    /// Replace any existing outline
    New,
    /// Append after the existing outline
    Continue,
}

/// Coarse position of the story used to steer continuation prompts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlotStage {
    /// The plot is still unfolding
    Development,
    /// The story is heading into its decisive conflict
    Climax,
    /// The story is wrapping up
    Ending,
}

/// One outline generation request.
///
/// Optional creative fields override the project's own settings during
/// prompt assembly; everything left unset falls back to the project and then
/// to a neutral placeholder.
///
/// # Examples
///
/// ```
/// use fabula_outline::{GenerationMode, OutlineRequestBuilder};
/// use uuid::Uuid;
///
/// let request = OutlineRequestBuilder::default()
///     .project_id(Uuid::new_v4())
///     .chapter_count(10)
///     .mode(GenerationMode::New)
///     .theme("revenge at sea".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(*request.chapter_count(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct OutlineRequest {
    /// Project whose outline is generated
    project_id: Uuid,
    /// Chapters to produce (new) or append (continuation)
    chapter_count: i32,
    /// Requested generation mode
    #[builder(default)]
    #[serde(default)]
    mode: GenerationMode,
    /// Theme override
    #[builder(default)]
    #[serde(default)]
    theme: Option<String>,
    /// Genre override
    #[builder(default)]
    #[serde(default)]
    genre: Option<String>,
    /// Narrative perspective override
    #[builder(default)]
    #[serde(default)]
    narrative_perspective: Option<String>,
    /// Target word count override
    #[builder(default)]
    #[serde(default)]
    target_words: Option<i32>,
    /// Free-form generation requirements
    #[builder(default)]
    #[serde(default)]
    requirements: Option<String>,
    /// Where the continuation should take the story
    #[builder(default)]
    #[serde(default)]
    story_direction: Option<String>,
    /// Current stage of the plot, for continuation guidance
    #[builder(default)]
    #[serde(default)]
    plot_stage: Option<PlotStage>,
    /// Provider label the transport layer selects a driver from
    #[builder(default)]
    #[serde(default)]
    provider: Option<String>,
    /// Model override passed through to the driver
    #[builder(default)]
    #[serde(default)]
    model: Option<String>,
}
