//! Per-file pipeline controller.
//!
//! Drives one file through move → extract → compose → summarize → write →
//! complete. Every per-file error is caught here and turned into a
//! [`PipelineOutcome::Failure`]; nothing escapes to the watch loop.

use crate::error::{ExtractError, IngestError, IngestResult};
use crate::extractors::ExtractorRegistry;
use crate::lifecycle::FolderLifecycle;
use crate::output::{render_summary, summary_path};
use docsum_config::Config;
use docsum_core::{ExtractionResult, LifecycleStage, PipelineOutcome, PipelineStage, WatchedFile};
use docsum_process::MediaTools;
use docsum_summary::{PromptComposer, SummaryClient, SummaryRequest};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Everything the controller needs, built once at startup.
#[derive(Clone)]
pub struct PipelineContext {
    pub config: Arc<Config>,
    pub lifecycle: FolderLifecycle,
    pub extractors: ExtractorRegistry,
    pub composer: PromptComposer,
    pub client: SummaryClient,
}

impl PipelineContext {
    /// Build the context for `config`, creating the lifecycle folders.
    pub fn from_config(config: Arc<Config>, tools: Arc<dyn MediaTools>) -> IngestResult<Self> {
        let lifecycle = FolderLifecycle::ensure(&config.watch_directory())?;
        let composer = PromptComposer::new(config.prompt_template_path());
        let client = SummaryClient::from_config(&config)?;

        Ok(Self {
            lifecycle,
            extractors: ExtractorRegistry::with_tools(tools),
            composer,
            client,
            config,
        })
    }
}

/// Progress of one file, kept outside the fallible path so failures can
/// report where they stopped and what to clean up.
struct FileRun {
    stage: PipelineStage,
    artifacts: Vec<PathBuf>,
}

/// Handles files one at a time.
#[derive(Clone)]
pub struct PipelineController {
    ctx: Arc<PipelineContext>,
}

impl PipelineController {
    pub fn new(ctx: PipelineContext) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Process a newly detected file. Never fails; the outcome says how far
    /// it got.
    pub async fn handle(&self, path: PathBuf) -> PipelineOutcome {
        let file = WatchedFile::detect(path);
        let span = info_span!("file", id = %file.id, name = %file.file_name());
        self.run(file).instrument(span).await
    }

    async fn run(&self, mut file: WatchedFile) -> PipelineOutcome {
        info!("Detected {:?} ({})", file.path, file.kind);

        let mut run = FileRun {
            stage: PipelineStage::Detected,
            artifacts: Vec::new(),
        };

        match self.process(&mut file, &mut run).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.ctx.lifecycle.discard_artifacts(&run.artifacts);
                error!(
                    "Failed to process {:?} at stage {} after {} ms: {}",
                    file.path,
                    run.stage,
                    file.elapsed().num_milliseconds(),
                    e
                );
                PipelineOutcome::Failure {
                    reason: e.to_string(),
                    stage: run.stage,
                }
            }
        }
    }

    async fn process(
        &self,
        file: &mut WatchedFile,
        run: &mut FileRun,
    ) -> IngestResult<PipelineOutcome> {
        let working_path = self.ctx.lifecycle.move_to_working(&file.path)?;
        file.advance(LifecycleStage::Working, working_path)?;
        run.stage = PipelineStage::MovedToWorking;

        if !file.kind.is_supported() {
            warn!(
                "Unsupported file type {:?}, leaving it in {:?}",
                file.file_name(),
                self.ctx.lifecycle.folders().working
            );
            return Ok(PipelineOutcome::Unsupported {
                path: file.path.clone(),
            });
        }

        let extraction = self.extract(file).await?;
        run.artifacts
            .extend(extraction.intermediate_artifacts().iter().cloned());
        run.stage = PipelineStage::Extracted;
        info!(
            "Extracted {} chars with {} artifact(s)",
            extraction.text().len(),
            run.artifacts.len()
        );

        let prompt = self.ctx.composer.compose(extraction.text())?;
        run.stage = PipelineStage::Composed;

        let request = SummaryRequest::from_config(&self.ctx.config, prompt);
        let response = self.ctx.client.summarize(&request).await?;
        run.stage = PipelineStage::Summarized;

        let format = self.ctx.config.output.format;
        let summary_file = summary_path(&file.path, format);
        write_summary(&summary_file, &render_summary(response.summary(), format), run)?;
        run.stage = PipelineStage::Written;
        info!("Summary written to {:?}", summary_file);

        let completed_path = self
            .ctx
            .lifecycle
            .move_to_completed(&file.path, &run.artifacts)?;
        file.advance(LifecycleStage::Completed, completed_path)?;
        run.stage = PipelineStage::Completed;

        let output_path = self.completed_location(&summary_file);
        info!(
            "Completed {:?} in {} ms",
            file.path,
            file.elapsed().num_milliseconds()
        );

        Ok(PipelineOutcome::Success { output_path })
    }

    /// Run the blocking extraction strategy off the async runtime.
    async fn extract(&self, file: &WatchedFile) -> IngestResult<ExtractionResult> {
        let extractors = self.ctx.extractors.clone();
        let source = file.path.clone();
        let kind = file.kind;

        let result = tokio::task::spawn_blocking(move || extractors.extract(&source, kind))
            .await
            .map_err(|e| ExtractError::Aborted {
                path: file.path.clone(),
                message: e.to_string(),
            })??;

        Ok(result)
    }

    fn completed_location(&self, working_file: &Path) -> PathBuf {
        let completed = &self.ctx.lifecycle.folders().completed;
        match working_file.file_name() {
            Some(name) => completed.join(name),
            None => completed.clone(),
        }
    }
}

/// Create the summary file, tracking it for cleanup only once it is ours.
fn write_summary(path: &Path, contents: &str, run: &mut FileRun) -> IngestResult<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::AlreadyExists => IngestError::OutputExists(path.to_path_buf()),
            _ => IngestError::Output {
                path: path.to_path_buf(),
                source,
            },
        })?;
    run.artifacts.push(path.to_path_buf());

    file.write_all(contents.as_bytes())
        .map_err(|source| IngestError::Output {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::test_tools::FakeTools;
    use tempfile::{tempdir, TempDir};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        root: TempDir,
        controller: PipelineController,
    }

    fn harness(server: &MockServer, tools: FakeTools, format: &str) -> Harness {
        let root = tempdir().unwrap();
        let template = root.path().join("prompt.md");
        std::fs::write(&template, "Summarize:").unwrap();

        let config: Config = toml::from_str(&format!(
            r#"
            api_url = "{}/api/generate"
            bearer_token = "tok"
            model = "llama3"

            [watch]
            directory = "{}"

            [prompt]
            template_path = "{}"

            [output]
            format = "{}"
            "#,
            server.uri(),
            root.path().display(),
            template.display(),
            format
        ))
        .unwrap();

        let ctx = PipelineContext::from_config(Arc::new(config), Arc::new(tools)).unwrap();
        Harness {
            root,
            controller: PipelineController::new(ctx),
        }
    }

    async fn respond(server: &MockServer, status: u16, body: &str) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_text_file_success() {
        let server = MockServer::start().await;
        respond(&server, 200, r#"{"response": "First point.\nSecond point."}"#).await;
        let h = harness(&server, FakeTools::default(), "markdown");

        let incoming = h.root.path().join("notes.txt");
        std::fs::write(&incoming, "meeting notes").unwrap();

        let outcome = h.controller.handle(incoming).await;

        let completed = h.root.path().join("completed");
        assert_eq!(
            outcome,
            PipelineOutcome::Success {
                output_path: completed.join("notes.txt.summary.md")
            }
        );
        assert!(completed.join("notes.txt").exists());
        assert_eq!(
            std::fs::read_to_string(completed.join("notes.txt.summary.md")).unwrap(),
            "First point.\n\nSecond point.\n"
        );
        let working: Vec<_> = std::fs::read_dir(h.root.path().join("working"))
            .unwrap()
            .collect();
        assert!(working.is_empty());
    }

    #[tokio::test]
    async fn test_text_output_format_and_placeholder() {
        let server = MockServer::start().await;
        respond(&server, 200, "{}").await;
        let h = harness(&server, FakeTools::default(), "text");

        let incoming = h.root.path().join("notes.md");
        std::fs::write(&incoming, "body").unwrap();

        let outcome = h.controller.handle(incoming).await;

        assert!(outcome.is_success());
        let summary = h.root.path().join("completed/notes.md.summary.txt");
        assert_eq!(std::fs::read_to_string(summary).unwrap(), "No summary provided");
    }

    #[tokio::test]
    async fn test_unsupported_stays_in_working() {
        let server = MockServer::start().await;
        let h = harness(&server, FakeTools::default(), "markdown");

        let incoming = h.root.path().join("data.csv");
        std::fs::write(&incoming, "a,b").unwrap();

        let outcome = h.controller.handle(incoming).await;

        let parked = h.root.path().join("working/data.csv");
        assert_eq!(outcome, PipelineOutcome::Unsupported { path: parked.clone() });
        assert!(parked.exists());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_http_failure_discards_artifacts() {
        let server = MockServer::start().await;
        respond(&server, 500, "boom").await;
        let tools = FakeTools {
            text_layer: "Quarterly report".to_string(),
            ..Default::default()
        };
        let h = harness(&server, tools, "markdown");

        let incoming = h.root.path().join("report.pdf");
        std::fs::write(&incoming, b"%PDF").unwrap();

        let outcome = h.controller.handle(incoming).await;

        match outcome {
            PipelineOutcome::Failure { stage, reason } => {
                assert_eq!(stage, PipelineStage::Composed);
                assert!(reason.contains("500"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        let working = h.root.path().join("working");
        assert!(working.join("report.pdf").exists());
        assert!(!working.join("report_extracted.txt").exists());
        assert!(!working.join("report.pdf.summary.md").exists());
        assert!(!h.root.path().join("completed/report.pdf").exists());
    }

    #[tokio::test]
    async fn test_vanished_file_fails_before_working() {
        let server = MockServer::start().await;
        let h = harness(&server, FakeTools::default(), "markdown");

        let outcome = h.controller.handle(h.root.path().join("gone.txt")).await;

        assert!(matches!(
            outcome,
            PipelineOutcome::Failure {
                stage: PipelineStage::Detected,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_stranded_audio_in_working_is_not_overwritten() {
        let server = MockServer::start().await;
        respond(&server, 200, r#"{"response": "unused"}"#).await;
        let tools = FakeTools {
            transcript: vec!["hello".to_string()],
            fail_transcribe: true,
            ..Default::default()
        };
        let h = harness(&server, tools, "markdown");

        let working = h.root.path().join("working");
        let stranded = working.join("clip.mp3");
        std::fs::write(&stranded, "earlier recording").unwrap();

        let incoming = h.root.path().join("clip.mp4");
        std::fs::write(&incoming, b"video").unwrap();

        let outcome = h.controller.handle(incoming).await;

        match outcome {
            PipelineOutcome::Failure { stage, reason } => {
                assert_eq!(stage, PipelineStage::MovedToWorking);
                assert!(reason.contains("clip.mp3"), "{}", reason);
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(std::fs::read_to_string(&stranded).unwrap(), "earlier recording");
        assert!(working.join("clip.mp4").exists());
        assert!(!working.join("clip_transcribed.md").exists());
    }

    #[tokio::test]
    async fn test_stranded_summary_in_working_is_not_overwritten() {
        let server = MockServer::start().await;
        respond(&server, 200, r#"{"response": "fresh summary"}"#).await;
        let h = harness(&server, FakeTools::default(), "markdown");

        let working = h.root.path().join("working");
        let stranded = working.join("notes.txt.summary.md");
        std::fs::write(&stranded, "earlier summary").unwrap();

        let incoming = h.root.path().join("notes.txt");
        std::fs::write(&incoming, "notes").unwrap();

        let outcome = h.controller.handle(incoming).await;

        assert!(matches!(
            outcome,
            PipelineOutcome::Failure {
                stage: PipelineStage::Summarized,
                ..
            }
        ));
        assert_eq!(std::fs::read_to_string(&stranded).unwrap(), "earlier summary");
        assert!(working.join("notes.txt").exists());
        assert!(!h.root.path().join("completed/notes.txt").exists());
    }
}
