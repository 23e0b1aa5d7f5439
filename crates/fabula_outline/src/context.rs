//! Prompt context assembled from project data and request overrides.

use crate::batch::BatchRound;
use crate::request::OutlineRequest;
use fabula_core::{Character, Outline, Project, truncate_chars};

/// Characters of a personality sketch kept in a prompt line.
const PERSONALITY_MAX_CHARS: usize = 100;

/// Full outline entries quoted verbatim in continuation prompts.
const RECENT_PLOT_ENTRIES: usize = 2;

/// Inputs for a complete-outline prompt.
///
/// Request overrides win over project settings, and a neutral placeholder
/// stands in when both are absent, so prompt assembly never fails on sparse
/// projects.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineContext {
    /// Novel title
    pub title: String,
    /// Central theme
    pub theme: String,
    /// Genre label
    pub genre: String,
    /// Chapters the prompt asks for
    pub chapter_count: i32,
    /// Narrative perspective
    pub narrative_perspective: String,
    /// Target length in words
    pub target_words: i32,
    /// Era the story takes place in
    pub time_period: String,
    /// Primary setting
    pub location: String,
    /// Overall mood of the world
    pub atmosphere: String,
    /// Hard rules the world obeys
    pub rules: String,
    /// One line per character or organization
    pub characters_info: String,
    /// Free-form caller requirements, possibly empty
    pub requirements: String,
}

impl OutlineContext {
    /// Assemble prompt inputs for `chapter_count` chapters.
    pub fn assemble(
        project: &Project,
        characters: &[Character],
        request: &OutlineRequest,
        chapter_count: i32,
    ) -> Self {
        Self {
            title: project.title.clone(),
            theme: request
                .theme()
                .clone()
                .or_else(|| project.theme.clone())
                .unwrap_or_else(|| "not set".to_string()),
            genre: request
                .genre()
                .clone()
                .or_else(|| project.genre.clone())
                .unwrap_or_else(|| "general".to_string()),
            chapter_count,
            narrative_perspective: request
                .narrative_perspective()
                .clone()
                .or_else(|| project.narrative_perspective.clone())
                .unwrap_or_else(|| "third person".to_string()),
            target_words: (*request.target_words())
                .or(project.target_words)
                .unwrap_or(100_000),
            time_period: placeholder(&project.world_time_period),
            location: placeholder(&project.world_location),
            atmosphere: placeholder(&project.world_atmosphere),
            rules: placeholder(&project.world_rules),
            characters_info: character_summary(characters),
            requirements: request.requirements().clone().unwrap_or_default(),
        }
    }
}

/// Inputs for a continuation prompt: everything a complete-outline prompt
/// carries plus the story so far.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationContext {
    /// Shared project inputs; `chapter_count` is this round's size
    pub base: OutlineContext,
    /// Chapters already persisted when the round started
    pub current_chapter_count: usize,
    /// One line per existing chapter
    pub all_chapters_brief: String,
    /// Full text of the most recent entries
    pub recent_plot: String,
    /// Stage-specific writing guidance, possibly empty
    pub stage_instruction: &'static str,
    /// 1-based number of the first chapter to write
    pub start_chapter: i32,
    /// 1-based number of the last chapter to write
    pub end_chapter: i32,
    /// Caller's direction for where the story goes next
    pub story_direction: String,
}

impl ContinuationContext {
    /// Assemble prompt inputs for one continuation round.
    ///
    /// `existing` is re-read at round start so the prompt reflects rounds
    /// committed earlier in the same run.
    pub fn assemble(
        project: &Project,
        characters: &[Character],
        request: &OutlineRequest,
        existing: &[Outline],
        round: &BatchRound,
    ) -> Self {
        Self {
            base: OutlineContext::assemble(project, characters, request, round.size),
            current_chapter_count: existing.len(),
            all_chapters_brief: chapters_brief(existing),
            recent_plot: recent_plot(existing),
            stage_instruction: crate::prompt::stage_instruction(*request.plot_stage()),
            start_chapter: round.start_chapter,
            end_chapter: round.end_chapter(),
            story_direction: request
                .story_direction()
                .clone()
                .unwrap_or_else(|| "natural continuation".to_string()),
        }
    }
}

fn placeholder(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| "not set".to_string())
}

/// One line per character: name, kind, role, and a capped personality sketch.
fn character_summary(characters: &[Character]) -> String {
    if characters.is_empty() {
        return "no characters defined yet".to_string();
    }
    characters
        .iter()
        .map(|character| {
            let kind = if character.is_organization {
                "organization"
            } else {
                "character"
            };
            let role = character.role_type.as_deref().unwrap_or("unspecified");
            let personality = character
                .personality
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| truncate_chars(p, PERSONALITY_MAX_CHARS))
                .unwrap_or_else(|| "no description yet".to_string());
            format!("- {} ({kind}, {role}): {personality}", character.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn chapters_brief(outlines: &[Outline]) -> String {
    outlines
        .iter()
        .map(|outline| format!("Chapter {}: {}", outline.order_index, outline.title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full text of the last [`RECENT_PLOT_ENTRIES`] entries.
fn recent_plot(outlines: &[Outline]) -> String {
    let start = outlines.len().saturating_sub(RECENT_PLOT_ENTRIES);
    outlines[start..]
        .iter()
        .map(|outline| {
            format!(
                "Chapter {}: {}\n{}",
                outline.order_index, outline.title, outline.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::OutlineRequestBuilder;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn timestamp() -> NaiveDateTime {
        chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc()
    }

    fn bare_project() -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Untitled".to_string(),
            theme: None,
            genre: None,
            narrative_perspective: None,
            target_words: None,
            world_time_period: None,
            world_location: None,
            world_atmosphere: None,
            world_rules: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn character(name: &str, personality: Option<&str>, is_organization: bool) -> Character {
        Character {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            name: name.to_string(),
            role_type: Some("protagonist".to_string()),
            personality: personality.map(str::to_string),
            is_organization,
            created_at: timestamp(),
        }
    }

    #[test]
    fn request_overrides_win_over_project_settings() {
        let mut project = bare_project();
        project.theme = Some("war".to_string());
        project.target_words = Some(50_000);
        let request = OutlineRequestBuilder::default()
            .project_id(project.id)
            .chapter_count(10)
            .theme("peace".to_string())
            .build()
            .unwrap();

        let context = OutlineContext::assemble(&project, &[], &request, 10);
        assert_eq!(context.theme, "peace");
        assert_eq!(context.target_words, 50_000);
    }

    #[test]
    fn sparse_projects_fall_back_to_placeholders() {
        let project = bare_project();
        let request = OutlineRequestBuilder::default()
            .project_id(project.id)
            .chapter_count(5)
            .build()
            .unwrap();

        let context = OutlineContext::assemble(&project, &[], &request, 5);
        assert_eq!(context.theme, "not set");
        assert_eq!(context.genre, "general");
        assert_eq!(context.narrative_perspective, "third person");
        assert_eq!(context.target_words, 100_000);
        assert_eq!(context.time_period, "not set");
        assert_eq!(context.characters_info, "no characters defined yet");
        assert_eq!(context.requirements, "");
    }

    #[test]
    fn character_lines_cap_personality_and_label_organizations() {
        let long = "a".repeat(150);
        let lines = character_summary(&[
            character("Mara", Some(&long), false),
            character("The Guild", None, true),
        ]);
        let mut lines = lines.lines();
        let first = lines.next().unwrap();
        assert!(first.starts_with("- Mara (character, protagonist): "));
        assert_eq!(first.chars().count(), "- Mara (character, protagonist): ".chars().count() + 100);
        assert_eq!(
            lines.next().unwrap(),
            "- The Guild (organization, protagonist): no description yet"
        );
    }

    #[test]
    fn recent_plot_quotes_only_the_last_two_entries() {
        let outlines: Vec<Outline> = (1..=4)
            .map(|i| Outline {
                id: Uuid::new_v4(),
                project_id: Uuid::new_v4(),
                title: format!("T{i}"),
                content: format!("body {i}"),
                order_index: i,
                structure: None,
                created_at: timestamp(),
                updated_at: timestamp(),
            })
            .collect();

        let recent = recent_plot(&outlines);
        assert!(!recent.contains("body 2"));
        assert!(recent.contains("Chapter 3: T3\nbody 3"));
        assert!(recent.contains("Chapter 4: T4\nbody 4"));

        let brief = chapters_brief(&outlines);
        assert_eq!(brief.lines().count(), 4);
        assert!(brief.contains("Chapter 1: T1"));
    }
}
