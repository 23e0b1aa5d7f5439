//! Prompt templates for outline generation.

use crate::context::{ContinuationContext, OutlineContext};
use crate::request::PlotStage;

/// Writing guidance for a plot stage; `None` yields no guidance.
pub fn stage_instruction(stage: Option<PlotStage>) -> &'static str {
    match stage {
        Some(PlotStage::Development) => {
            "Keep the plot unfolding steadily, deepen character relationships, and push the central conflict forward."
        }
        Some(PlotStage::Climax) => {
            "Drive the story toward its climax: sharpen the tension until the decisive conflict erupts."
        }
        Some(PlotStage::Ending) => {
            "Resolve the main conflicts, tie off the remaining threads, and bring the story to its ending."
        }
        None => "",
    }
}

/// Prompt asking for a complete outline of `chapter_count` chapters.
pub fn complete_outline(ctx: &OutlineContext) -> String {
    format!(
        r#"You are an experienced novelist and story editor. Produce a complete {chapter_count}-chapter outline for the novel described below.

Basic information:
- Title: {title}
- Theme: {theme}
- Genre: {genre}
- Chapter count: {chapter_count}
- Narrative perspective: {perspective}
- Target length: {target_words} words

World setting:
- Time period: {time_period}
- Location: {location}
- Atmosphere: {atmosphere}
- World rules: {rules}

Characters:
{characters_info}

Special requirements: {requirements}

Overall requirements:
- A complete arc with a clear beginning, development, climax, and resolution
- A coherent plot with tight transitions between chapters
- Escalating conflict and meaningful character development
- Consistent use of the {perspective} perspective

Return ONLY a JSON array, with no markdown fences and no commentary, shaped exactly like:
[
  {{
    "chapter_number": 1,
    "title": "Chapter title",
    "summary": "Detailed synopsis covering the chapter's main plot, conflicts, and turning points",
    "key_events": ["event one", "event two"],
    "characters_involved": ["name one", "name two"]
  }}
]

The array must contain exactly {chapter_count} chapter objects."#,
        chapter_count = ctx.chapter_count,
        title = ctx.title,
        theme = ctx.theme,
        genre = ctx.genre,
        perspective = ctx.narrative_perspective,
        target_words = ctx.target_words,
        time_period = ctx.time_period,
        location = ctx.location,
        atmosphere = ctx.atmosphere,
        rules = ctx.rules,
        characters_info = ctx.characters_info,
        requirements = ctx.requirements,
    )
}

/// Prompt asking for a continuation covering one planned round.
pub fn outline_continuation(ctx: &ContinuationContext) -> String {
    let requirements = if ctx.base.requirements.is_empty() {
        "none"
    } else {
        &ctx.base.requirements
    };
    format!(
        r#"You are an experienced novelist and story editor. Continue the outline of the novel described below.

Basic information:
- Title: {title}
- Theme: {theme}
- Genre: {genre}
- Narrative perspective: {perspective}

World setting:
- Time period: {time_period}
- Location: {location}
- Atmosphere: {atmosphere}
- World rules: {rules}

Characters:
{characters_info}

Existing outline ({current_count} chapters so far):
{chapters_brief}

Recent plot in full:
{recent_plot}

Continuation guidance:
- Current plot stage: {stage_instruction}
- Story direction: {story_direction}
- Special requirements: {requirements}

Write the outline for chapters {start_chapter} through {end_chapter}.
Requirements:
- Flow naturally out of the existing chapters and stay consistent with them
- Follow the plot-stage guidance and the story direction
- Match the style and level of detail of the existing outline
- Number the chapters starting at {start_chapter}

Return ONLY a JSON array, with no markdown fences and no commentary, shaped exactly like:
[
  {{
    "chapter_number": {start_chapter},
    "title": "Chapter title",
    "summary": "Detailed synopsis covering the chapter's main plot, conflicts, and turning points",
    "key_events": ["event one", "event two"],
    "characters_involved": ["name one", "name two"]
  }}
]

The array must contain exactly {chapter_count} chapter objects."#,
        title = ctx.base.title,
        theme = ctx.base.theme,
        genre = ctx.base.genre,
        perspective = ctx.base.narrative_perspective,
        time_period = ctx.base.time_period,
        location = ctx.base.location,
        atmosphere = ctx.base.atmosphere,
        rules = ctx.base.rules,
        characters_info = ctx.base.characters_info,
        current_count = ctx.current_chapter_count,
        chapters_brief = ctx.all_chapters_brief,
        recent_plot = ctx.recent_plot,
        stage_instruction = ctx.stage_instruction,
        story_direction = ctx.story_direction,
        requirements = requirements,
        start_chapter = ctx.start_chapter,
        end_chapter = ctx.end_chapter,
        chapter_count = ctx.base.chapter_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> OutlineContext {
        OutlineContext {
            title: "The Hollow Crown".to_string(),
            theme: "betrayal".to_string(),
            genre: "fantasy".to_string(),
            chapter_count: 12,
            narrative_perspective: "third person".to_string(),
            target_words: 90_000,
            time_period: "late medieval".to_string(),
            location: "the border marches".to_string(),
            atmosphere: "grim".to_string(),
            rules: "no resurrection".to_string(),
            characters_info: "- Mara (character, protagonist): stubborn".to_string(),
            requirements: String::new(),
        }
    }

    #[test]
    fn complete_prompt_carries_every_input() {
        let prompt = complete_outline(&sample_context());
        assert!(prompt.contains("The Hollow Crown"));
        assert!(prompt.contains("betrayal"));
        assert!(prompt.contains("12-chapter outline"));
        assert!(prompt.contains("90000 words"));
        assert!(prompt.contains("- Mara (character, protagonist): stubborn"));
        assert!(prompt.contains("exactly 12 chapter objects"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn continuation_prompt_frames_the_round() {
        let context = ContinuationContext {
            base: OutlineContext {
                chapter_count: 5,
                ..sample_context()
            },
            current_chapter_count: 8,
            all_chapters_brief: "Chapter 1: Dawn".to_string(),
            recent_plot: "Chapter 8: Ashes\nThe keep burns.".to_string(),
            stage_instruction: stage_instruction(Some(PlotStage::Climax)),
            start_chapter: 9,
            end_chapter: 13,
            story_direction: "the siege breaks".to_string(),
        };
        let prompt = outline_continuation(&context);
        assert!(prompt.contains("8 chapters so far"));
        assert!(prompt.contains("chapters 9 through 13"));
        assert!(prompt.contains("The keep burns."));
        assert!(prompt.contains("the siege breaks"));
        assert!(prompt.contains("decisive conflict erupts"));
        assert!(prompt.contains("Special requirements: none"));
        assert!(prompt.contains("\"chapter_number\": 9"));
    }

    #[test]
    fn unset_stage_yields_no_guidance() {
        assert_eq!(stage_instruction(None), "");
    }
}
