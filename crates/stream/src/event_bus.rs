//! Background prediction worker.
//!
//! One dedicated task owns the model and drains a bounded inbox in arrival
//! order. Each computation runs on the blocking pool, so a slow model never
//! holds up the async executor. Every posted message is stamped with a sequence number and answered
//! with exactly one [`WorkerReply`] carrying the same number, so a caller that
//! fires several requests can keep the latest and drop the rest. Faults inside
//! the model, panics included, come back as `ERROR` replies and the task keeps
//! serving.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use statsapp_ml::PredictionModel;
use statsapp_models::{BaselinePrediction, PredictionRequest};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::message::{decode, WorkerReply, WorkerRequest, WorkerResponse};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub queue_capacity: usize,
    pub response_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            response_timeout: Duration::from_millis(5000),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("Prediction worker is not running")]
    Closed,

    #[error("No reply from prediction worker within {0:?}")]
    Timeout(Duration),

    #[error("Prediction worker rejected the request: {0}")]
    Rejected(String),
}

enum Inbound {
    Message(WorkerRequest),
    Raw(String),
}

struct Envelope {
    seq: u64,
    body: Inbound,
}

pub struct PredictionWorker {
    inbox: mpsc::Sender<Envelope>,
    replies: mpsc::UnboundedReceiver<WorkerReply>,
    next_seq: u64,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
    config: WorkerConfig,
}

impl PredictionWorker {
    /// Starts the worker task. Must be called from within a tokio runtime.
    pub fn spawn(model: Arc<dyn PredictionModel>, config: WorkerConfig) -> Self {
        let (inbox, queue) = mpsc::channel(config.queue_capacity.max(1));
        let (outbox, replies) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(run(model, queue, outbox, cancel.clone()));

        Self {
            inbox,
            replies,
            next_seq: 0,
            cancel,
            handle: Some(handle),
            config,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && !self.inbox.is_closed()
    }

    /// Queues a message and returns its sequence number. Waits while the
    /// inbox is full.
    pub async fn post(&mut self, request: WorkerRequest) -> Result<u64, WorkerError> {
        self.enqueue(Inbound::Message(request)).await
    }

    /// Queues a raw JSON message. Decoding happens on the worker, so a bad
    /// message is answered with an `ERROR` reply rather than failing here.
    pub async fn post_json(&mut self, raw: impl Into<String>) -> Result<u64, WorkerError> {
        self.enqueue(Inbound::Raw(raw.into())).await
    }

    async fn enqueue(&mut self, body: Inbound) -> Result<u64, WorkerError> {
        if self.cancel.is_cancelled() {
            return Err(WorkerError::Closed);
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        self.inbox
            .send(Envelope { seq, body })
            .await
            .map_err(|_| WorkerError::Closed)?;

        Ok(seq)
    }

    /// Next reply in completion order, or `None` once the worker is gone.
    pub async fn next_reply(&mut self) -> Option<WorkerReply> {
        self.replies.recv().await
    }

    /// Posts one prediction request and waits for its own reply. Replies to
    /// earlier messages still in flight are discarded.
    pub async fn request(
        &mut self,
        request: PredictionRequest,
    ) -> Result<BaselinePrediction, WorkerError> {
        let seq = self.post(WorkerRequest::CalculatePredictions(request)).await?;
        let timeout = self.config.response_timeout;
        let replies = &mut self.replies;

        let response = tokio::time::timeout(timeout, async {
            loop {
                match replies.recv().await {
                    Some(reply) if reply.seq == seq => return Ok(reply.response),
                    Some(reply) => debug!("Discarding stale worker reply #{}", reply.seq),
                    None => return Err(WorkerError::Closed),
                }
            }
        })
        .await
        .map_err(|_| WorkerError::Timeout(timeout))??;

        match response {
            WorkerResponse::PredictionResult(prediction) => Ok(prediction),
            WorkerResponse::Error(payload) => Err(WorkerError::Rejected(payload.message)),
        }
    }

    /// Cancels the worker and waits for its task to finish. Queued messages
    /// are dropped unanswered.
    pub async fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Prediction worker task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PredictionWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    model: Arc<dyn PredictionModel>,
    mut queue: mpsc::Receiver<Envelope>,
    outbox: mpsc::UnboundedSender<WorkerReply>,
    cancel: CancellationToken,
) {
    info!(
        "🧮 Prediction worker started ({} {})",
        model.model_name(),
        model.model_version()
    );

    loop {
        let envelope = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = queue.recv() => match next {
                Some(envelope) => envelope,
                None => break,
            },
        };

        let seq = envelope.seq;
        let task_model = Arc::clone(&model);
        let response = match tokio::task::spawn_blocking(move || {
            handle(task_model.as_ref(), envelope.body)
        })
        .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("❌ Prediction task #{} failed: {}", seq, e);
                WorkerResponse::error(format!("Prediction computation failed: {e}"))
            }
        };

        if outbox
            .send(WorkerReply {
                seq,
                response,
            })
            .is_err()
        {
            break;
        }
    }

    info!("🛑 Prediction worker stopped");
}

fn handle(model: &dyn PredictionModel, body: Inbound) -> WorkerResponse {
    let request = match body {
        Inbound::Message(request) => request,
        Inbound::Raw(raw) => match decode(&raw) {
            Ok(request) => request,
            Err(payload) => {
                warn!("Rejected worker message: {}", payload.message);
                return WorkerResponse::Error(payload);
            }
        },
    };

    match request {
        WorkerRequest::CalculatePredictions(payload) => compute(model, &payload),
    }
}

fn compute(model: &dyn PredictionModel, request: &PredictionRequest) -> WorkerResponse {
    match panic::catch_unwind(AssertUnwindSafe(|| model.predict(request))) {
        Ok(Ok(prediction)) => WorkerResponse::PredictionResult(prediction),
        Ok(Err(e)) => {
            warn!(
                "Prediction failed for {} vs {}: {}",
                request.home_team, request.away_team, e
            );
            WorkerResponse::error(e.to_string())
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            error!("❌ Prediction computation panicked: {}", reason);
            WorkerResponse::error(format!("Prediction computation failed: {reason}"))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
