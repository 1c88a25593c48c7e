//! The live watcher feeding the queue: files dropped into the root end up
//! in completed/ without being picked up twice.

use docsum_config::Config;
use docsum_ingest::{FileWatcher, IngestQueue, PipelineContext, PipelineController, WatcherConfig};
use docsum_process::{MediaTools, OcrResult, ProcessError, ProcessResult, TranscriptSegment};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Only plain-text files are dropped here, so no tool should ever run.
struct NoTools;

impl MediaTools for NoTools {
    fn pdf_text_layer(&self, pdf_path: &Path) -> ProcessResult<String> {
        Err(ProcessError::PdfError(format!("unexpected: {}", pdf_path.display())))
    }

    fn rasterize_pdf(&self, pdf_path: &Path, _output_dir: &Path) -> ProcessResult<Vec<PathBuf>> {
        Err(ProcessError::PdfError(format!("unexpected: {}", pdf_path.display())))
    }

    fn ocr_image(&self, image_path: &Path) -> ProcessResult<OcrResult> {
        Err(ProcessError::OcrError(format!("unexpected: {}", image_path.display())))
    }

    fn extract_audio(&self, video_path: &Path, _audio_path: &Path) -> ProcessResult<()> {
        Err(ProcessError::FfmpegError(format!("unexpected: {}", video_path.display())))
    }

    fn transcribe(
        &self,
        audio_path: &Path,
        _scratch_dir: &Path,
    ) -> ProcessResult<Vec<TranscriptSegment>> {
        Err(ProcessError::TranscriptionError(format!(
            "unexpected: {}",
            audio_path.display()
        )))
    }
}

fn config_for(root: &Path, template: &Path, server: &MockServer) -> Config {
    toml::from_str(&format!(
        r#"
        api_url = "{}/api/generate"
        bearer_token = "secret-token"
        model = "llama3"

        [request]
        timeout_seconds = 5

        [watch]
        directory = "{}"
        debounce_ms = 100

        [prompt]
        template_path = "{}"
        "#,
        server.uri(),
        root.display(),
        template.display()
    ))
    .unwrap()
}

async fn wait_for(paths: &[PathBuf], limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if paths.iter().all(|p| p.exists()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_files_are_summarized_once_each() {
    let root = tempfile::tempdir().unwrap();
    let template = root.path().join("summarize-notes.md");
    std::fs::write(&template, "Summarize the following:").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response": "Short."}"#))
        .mount(&server)
        .await;

    let config = Arc::new(config_for(root.path(), &template, &server));
    let ctx = PipelineContext::from_config(Arc::clone(&config), Arc::new(NoTools)).unwrap();
    let queue = IngestQueue::spawn(PipelineController::new(ctx), 8);

    let mut watcher = FileWatcher::new(WatcherConfig::from_config(&config)).unwrap();
    watcher.start().unwrap();
    let _forwarder = watcher.spawn_forwarder(queue.sender());

    std::fs::write(root.path().join("a.txt"), "alpha").unwrap();
    std::fs::write(root.path().join("b.md"), "# beta").unwrap();
    std::fs::write(root.path().join(".hidden.txt"), "skip me").unwrap();
    std::fs::write(root.path().join("upload.tmp"), "skip me too").unwrap();

    let completed = root.path().join("completed");
    let expected: Vec<PathBuf> = ["a.txt", "a.txt.summary.md", "b.md", "b.md.summary.md"]
        .iter()
        .map(|name| completed.join(name))
        .collect();
    assert!(
        wait_for(&expected, Duration::from_secs(15)).await,
        "files never reached completed/"
    );

    // Give the watcher a few more quiet periods to report the moves.
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert!(root.path().join(".hidden.txt").exists());
    assert!(root.path().join("upload.tmp").exists());
    assert!(!root.path().join("working").join("a.txt").exists());
    assert!(!root.path().join("working").join("b.md").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn file_removed_before_quiet_period_is_not_queued() {
    let root = tempfile::tempdir().unwrap();
    let template = root.path().join("summarize-notes.md");
    std::fs::write(&template, "Summarize the following:").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"response": "Short."}"#))
        .mount(&server)
        .await;

    let config = Arc::new(config_for(root.path(), &template, &server));
    let ctx = PipelineContext::from_config(Arc::clone(&config), Arc::new(NoTools)).unwrap();
    let queue = IngestQueue::spawn(PipelineController::new(ctx), 8);

    let mut watcher = FileWatcher::new(WatcherConfig::from_config(&config)).unwrap();
    watcher.start().unwrap();
    let _forwarder = watcher.spawn_forwarder(queue.sender());

    let gone = root.path().join("gone.txt");
    std::fs::write(&gone, "brief").unwrap();
    std::fs::remove_file(&gone).unwrap();
    std::fs::write(root.path().join("kept.txt"), "stays").unwrap();

    let summary = root.path().join("completed").join("kept.txt.summary.md");
    assert!(
        wait_for(&[summary], Duration::from_secs(15)).await,
        "kept.txt was never summarized"
    );
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(server.received_requests().await.unwrap().len(), 1);
    assert!(!root.path().join("working").join("gone.txt").exists());
    assert!(!root.path().join("completed").join("gone.txt").exists());
}
