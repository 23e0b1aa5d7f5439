//! Generation orchestration over a store and a text provider.

use crate::batch::{BATCH_SIZE, BatchPlan};
use crate::context::{ContinuationContext, OutlineContext};
use crate::extraction::parse_outline_response;
use crate::progress::ProgressReporter;
use crate::prompt;
use crate::request::{GenerationMode, OutlineRequest};
use fabula_core::{
    GenerateRequestBuilder, GenerateResponse, HistoryEntry, NewOutlineRecord, Outline, Project,
    truncate_chars,
};
use fabula_error::{BuilderError, FabulaResult, GenerationError, GenerationErrorKind, JsonError};
use fabula_interface::{OutlineStore, ProgressEvent, TextGenerator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Characters of a continuation prompt recorded in its history row.
const HISTORY_PROMPT_CHARS: usize = 500;

/// Buffered progress events before senders wait on the consumer.
const PROGRESS_CHANNEL_CAPACITY: usize = 32;

/// Persisted output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineBatch {
    /// Project the run wrote to
    pub project_id: Uuid,
    /// Outline entries in the project after the run, in order
    pub outlines: Vec<Outline>,
    /// Total entries after the run
    pub total_chapters: usize,
    /// Entries this run added; equals the total for a replacement run
    pub new_chapters: usize,
}

/// Orchestrates outline generation against a store and a provider driver.
///
/// Both delivery styles walk the same state machine: `generate_batch` runs it
/// silently and returns the final batch, `generate_stream` runs it on a task
/// and forwards milestones. Continuation work commits once per round, so a
/// failure in round `n` keeps rounds `1..n` and their history records.
pub struct OutlineGenerator<G: TextGenerator> {
    store: Arc<dyn OutlineStore>,
    driver: G,
}

impl<G: TextGenerator> OutlineGenerator<G> {
    /// Build a generator over a store and a provider driver.
    pub fn new(store: Arc<dyn OutlineStore>, driver: G) -> Self {
        Self { store, driver }
    }

    /// Run one generation request to completion and return the saved batch.
    #[tracing::instrument(
        skip(self, request),
        fields(project_id = %request.project_id(), mode = %request.mode())
    )]
    pub async fn generate_batch(&self, request: &OutlineRequest) -> FabulaResult<OutlineBatch> {
        let mut reporter = ProgressReporter::silent();
        self.run(request, &mut reporter).await
    }

    /// Run one generation request on a background task, streaming progress.
    ///
    /// The stream yields the events described on
    /// [`ProgressEvent`](fabula_interface::ProgressEvent). Dropping the
    /// stream cancels the run at its next milestone; rounds committed before
    /// that point stay persisted.
    pub fn generate_stream(self: Arc<Self>, request: OutlineRequest) -> ReceiverStream<ProgressEvent>
    where
        G: 'static,
    {
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            let mut reporter = ProgressReporter::streaming(tx);
            if let Err(error) = self.run(&request, &mut reporter).await {
                warn!(%error, "streaming generation ended with error");
            }
        });
        ReceiverStream::new(rx)
    }

    /// Walk the full state machine and emit the terminal events.
    async fn run(
        &self,
        request: &OutlineRequest,
        reporter: &mut ProgressReporter,
    ) -> FabulaResult<OutlineBatch> {
        match self.execute(request, reporter).await {
            Ok(batch) => {
                reporter
                    .progress_with_status("Generation complete", 100, Some("success".to_string()))
                    .await?;
                let data = serde_json::to_value(&batch)
                    .map_err(|e| JsonError::new(e.to_string()))?;
                reporter.result(data).await?;
                reporter.done().await;
                Ok(batch)
            }
            Err(error) => {
                reporter.error(error.to_string(), error.status_code()).await;
                Err(error)
            }
        }
    }

    async fn execute(
        &self,
        request: &OutlineRequest,
        reporter: &mut ProgressReporter,
    ) -> FabulaResult<OutlineBatch> {
        reporter.progress("Starting outline generation", 5).await?;
        reporter.progress("Loading project", 10).await?;
        let project = self.store.project(*request.project_id()).await?;
        let existing = self.store.list_outlines(project.id).await?;

        // Auto picks continuation whenever there is anything to continue.
        let continuing = match request.mode() {
            GenerationMode::Auto => !existing.is_empty(),
            GenerationMode::Continue => true,
            GenerationMode::New => false,
        };
        debug!(
            mode = %request.mode(),
            continuing,
            existing = existing.len(),
            "resolved generation mode"
        );

        if continuing {
            self.run_continuation(request, &project, existing, reporter)
                .await
        } else {
            self.run_new(request, &project, reporter).await
        }
    }

    /// Replace the whole outline in one generation call and one commit.
    async fn run_new(
        &self,
        request: &OutlineRequest,
        project: &Project,
        reporter: &mut ProgressReporter,
    ) -> FabulaResult<OutlineBatch> {
        reporter
            .progress(
                format!("Preparing to generate {} chapters", request.chapter_count()),
                15,
            )
            .await?;
        let characters = self.store.characters(project.id).await?;
        let context =
            OutlineContext::assemble(project, &characters, request, *request.chapter_count());
        let prompt = prompt::complete_outline(&context);
        reporter.progress("Prompt ready", 20).await?;

        reporter.progress("Calling the text provider", 30).await?;
        let response = self.call_driver(&prompt, request).await?;

        reporter
            .progress("Response received, parsing chapters", 70)
            .await?;
        let records = parse_outline_response(&response.text);
        let rows: Vec<NewOutlineRecord> = records
            .iter()
            .enumerate()
            .map(|(position, record)| record.to_new_record(position as i32 + 1))
            .collect();

        reporter.progress("Clearing the previous outline", 75).await?;
        reporter.progress("Saving the outline", 80).await?;
        let history = HistoryEntry {
            prompt,
            generated_content: response.text,
            model: requested_model(request),
        };
        let outlines = self
            .store
            .replace_outline(project.id, rows, history)
            .await?;

        reporter.progress("Assembling results", 95).await?;
        info!(project_id = %project.id, chapters = outlines.len(), "outline replaced");
        Ok(OutlineBatch {
            project_id: project.id,
            total_chapters: outlines.len(),
            new_chapters: outlines.len(),
            outlines,
        })
    }

    /// Append chapters round by round, committing after every round.
    async fn run_continuation(
        &self,
        request: &OutlineRequest,
        project: &Project,
        existing: Vec<Outline>,
        reporter: &mut ProgressReporter,
    ) -> FabulaResult<OutlineBatch> {
        reporter.progress("Analyzing the existing outline", 15).await?;
        if existing.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyOutline).into());
        }
        let last_chapter = existing.last().map(|o| o.order_index).unwrap_or(0);
        reporter
            .progress(
                format!(
                    "Project has {} chapters, appending {} more",
                    existing.len(),
                    request.chapter_count()
                ),
                20,
            )
            .await?;

        let characters = self.store.characters(project.id).await?;
        let plan = BatchPlan::new(*request.chapter_count(), last_chapter);
        reporter
            .progress(
                format!(
                    "Planned {} rounds of up to {} chapters",
                    plan.total_rounds(),
                    BATCH_SIZE
                ),
                25,
            )
            .await?;

        let model = requested_model(request);
        let mut appended = 0usize;
        for round in plan.rounds() {
            let base = (25 + round.index * 60 / round.total_rounds) as u8;
            reporter
                .progress(
                    format!(
                        "Round {}/{}: chapters {} to {}",
                        round.index + 1,
                        round.total_rounds,
                        round.start_chapter,
                        round.end_chapter()
                    ),
                    base,
                )
                .await?;

            // Fresh read so the prompt sees rounds committed before this one.
            let latest = self.store.list_outlines(project.id).await?;
            let context =
                ContinuationContext::assemble(project, &characters, request, &latest, round);
            let prompt = prompt::outline_continuation(&context);

            reporter
                .progress(
                    format!("Calling the text provider for round {}", round.index + 1),
                    base + 5,
                )
                .await?;
            let response = self.call_driver(&prompt, request).await?;

            reporter
                .progress(format!("Parsing round {} chapters", round.index + 1), base + 10)
                .await?;
            let records = parse_outline_response(&response.text);
            let rows: Vec<NewOutlineRecord> = records
                .iter()
                .enumerate()
                .map(|(position, record)| {
                    record.to_new_record(round.start_chapter + position as i32)
                })
                .collect();

            let history = HistoryEntry {
                prompt: format!(
                    "[round {}/{}] {}",
                    round.index + 1,
                    round.total_rounds,
                    truncate_chars(&prompt, HISTORY_PROMPT_CHARS)
                ),
                generated_content: response.text,
                model: model.clone(),
            };
            let saved = self
                .store
                .append_outline(project.id, rows, round.start_chapter, history)
                .await?;
            appended += saved.len();
            reporter
                .progress(
                    format!("Round {} saved {} chapters", round.index + 1, saved.len()),
                    base + 15,
                )
                .await?;
        }

        let outlines = self.store.list_outlines(project.id).await?;
        reporter.progress("Assembling results", 95).await?;
        info!(
            project_id = %project.id,
            appended,
            total = outlines.len(),
            "continuation finished"
        );
        Ok(OutlineBatch {
            project_id: project.id,
            total_chapters: outlines.len(),
            new_chapters: appended,
            outlines,
        })
    }

    async fn call_driver(
        &self,
        prompt: &str,
        request: &OutlineRequest,
    ) -> FabulaResult<GenerateResponse> {
        let generate = GenerateRequestBuilder::default()
            .prompt(prompt)
            .model(request.model().clone())
            .build()
            .map_err(|e| BuilderError::from(e.to_string()))?;
        debug!(
            provider = self.driver.provider_name(),
            prompt_chars = prompt.chars().count(),
            "dispatching generation request"
        );
        self.driver.generate(&generate).await
    }
}

/// Model identifier recorded in history rows: the request override, or the
/// literal `default` when the driver's own default was used.
fn requested_model(request: &OutlineRequest) -> String {
    request
        .model()
        .clone()
        .unwrap_or_else(|| "default".to_string())
}
