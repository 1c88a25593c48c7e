//! Ingestion queue: a channel of detected paths drained by the controller.

use crate::error::{IngestError, IngestResult};
use crate::pipeline::PipelineController;
use docsum_core::PipelineOutcome;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Number of consumers draining the queue. Files are handled one at a time.
pub const WORKER_COUNT: usize = 1;

/// Bounded queue feeding the pipeline controller.
pub struct IngestQueue {
    sender: mpsc::Sender<PathBuf>,
    workers: Vec<JoinHandle<()>>,
}

impl IngestQueue {
    /// Start the workers. Must be called from inside a tokio runtime.
    pub fn spawn(controller: PipelineController, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..WORKER_COUNT)
            .map(|worker| {
                let receiver = Arc::clone(&receiver);
                let controller = controller.clone();
                tokio::spawn(async move {
                    loop {
                        let next = receiver.lock().await.recv().await;
                        let Some(path) = next else {
                            break;
                        };
                        let outcome = controller.handle(path).await;
                        log_outcome(worker, &outcome);
                    }
                    debug!("Ingest worker {} stopped", worker);
                })
            })
            .collect();

        info!("Ingest queue started with {} worker(s)", WORKER_COUNT);
        Self { sender, workers }
    }

    /// A handle producers can use to enqueue paths.
    pub fn sender(&self) -> mpsc::Sender<PathBuf> {
        self.sender.clone()
    }

    /// Enqueue a path, waiting while the queue is full.
    pub async fn submit(&self, path: PathBuf) -> IngestResult<()> {
        self.sender
            .send(path)
            .await
            .map_err(|_| IngestError::QueueClosed)
    }

    /// Close the queue and wait for queued files to finish.
    ///
    /// Returns once every sender handed out by [`Self::sender`] is dropped too.
    pub async fn shutdown(self) {
        drop(self.sender);
        for worker in self.workers {
            let _ = worker.await;
        }
        info!("Ingest queue drained");
    }
}

fn log_outcome(worker: usize, outcome: &PipelineOutcome) {
    match outcome {
        PipelineOutcome::Success { output_path } => {
            debug!("Worker {} finished: {:?}", worker, output_path)
        }
        PipelineOutcome::Failure { stage, .. } => {
            debug!("Worker {} gave up at stage {}", worker, stage)
        }
        PipelineOutcome::Unsupported { path } => {
            debug!("Worker {} parked unsupported {:?}", worker, path)
        }
    }
}
