//! Bounded worker pool for legal-update broadcasts.
//!
//! Jobs are queued on a bounded channel shared by a fixed number of worker
//! tasks. Submitting never waits: a full queue is reported back so the
//! HTTP layer can answer 503 instead of piling up work. Per-recipient send
//! failures are counted and logged; they never abort the batch. Only the
//! most recent finished jobs keep their status; older ones are evicted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::broadcast::{legal_update_email, BroadcastJob, JobStatus, LegalDocuments, LegalLinks};
use crate::domain::foundation::{BroadcastJobId, Timestamp};
use crate::ports::{EmailSender, RecipientDirectory};

/// Configuration for the broadcast pool.
#[derive(Debug, Clone)]
pub struct BroadcastPoolConfig {
    /// Number of worker tasks
    pub workers: usize,
    /// Maximum queued (not yet running) jobs
    pub queue_capacity: usize,
    /// Finished jobs whose status stays queryable
    pub retained_jobs: usize,
    pub links: LegalLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BroadcastError {
    #[error("Broadcast queue is full; try again later")]
    QueueFull,

    #[error("Broadcast queue is shut down")]
    Closed,
}

impl BroadcastError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::QueueFull => "BROADCAST_QUEUE_FULL",
            Self::Closed => "BROADCAST_UNAVAILABLE",
        }
    }
}

type JobTable = Arc<RwLock<HashMap<BroadcastJobId, BroadcastJob>>>;

struct QueuedJob {
    id: BroadcastJobId,
    documents: LegalDocuments,
}

/// Everything a worker needs, shared across tasks.
struct WorkerContext {
    jobs: JobTable,
    recipients: Arc<dyn RecipientDirectory>,
    sender: Arc<dyn EmailSender>,
    links: LegalLinks,
    retained_jobs: usize,
}

/// Handle to the running pool.
pub struct BroadcastQueue {
    job_tx: mpsc::Sender<QueuedJob>,
    /// Held so the channel stays open (and bounded) even with no workers.
    _job_rx: Arc<Mutex<mpsc::Receiver<QueuedJob>>>,
    jobs: JobTable,
    shutdown_tx: watch::Sender<bool>,
    closed: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl BroadcastQueue {
    /// Spawns the workers. Must be called inside a tokio runtime.
    pub fn start(
        config: BroadcastPoolConfig,
        recipients: Arc<dyn RecipientDirectory>,
        sender: Arc<dyn EmailSender>,
    ) -> Self {
        let worker_count = config.workers.max(1);
        let (job_tx, job_rx) = mpsc::channel::<QueuedJob>(config.queue_capacity.max(1));
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let jobs: JobTable = Arc::new(RwLock::new(HashMap::new()));

        let context = Arc::new(WorkerContext {
            jobs: Arc::clone(&jobs),
            recipients,
            sender,
            links: config.links,
            retained_jobs: config.retained_jobs.max(1),
        });

        let handles = (0..worker_count)
            .map(|worker| {
                let job_rx = Arc::clone(&job_rx);
                let context = Arc::clone(&context);
                let shutdown_rx = shutdown_rx.clone();
                tokio::spawn(async move { worker_loop(worker, job_rx, context, shutdown_rx).await })
            })
            .collect();

        info!(
            workers = worker_count,
            queue_capacity = config.queue_capacity,
            "Broadcast worker pool started"
        );

        Self {
            job_tx,
            _job_rx: job_rx,
            jobs,
            shutdown_tx,
            closed: AtomicBool::new(false),
            workers: Mutex::new(handles),
        }
    }

    /// Queues a broadcast without waiting for room.
    pub async fn submit(&self, documents: LegalDocuments) -> Result<BroadcastJobId, BroadcastError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BroadcastError::Closed);
        }
        let job = BroadcastJob::queued(documents);
        let id = job.id;
        // Recorded before sending so a worker never sees an unknown id.
        self.jobs.write().await.insert(id, job);

        match self.job_tx.try_send(QueuedJob { id, documents }) {
            Ok(()) => {
                info!(job_id = %id, "Broadcast job queued");
                Ok(id)
            }
            Err(err) => {
                self.jobs.write().await.remove(&id);
                match err {
                    mpsc::error::TrySendError::Full(_) => {
                        warn!("Broadcast queue full, rejecting job");
                        Err(BroadcastError::QueueFull)
                    }
                    mpsc::error::TrySendError::Closed(_) => Err(BroadcastError::Closed),
                }
            }
        }
    }

    pub async fn status(&self, id: &BroadcastJobId) -> Option<BroadcastJob> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Stops accepting jobs and waits for workers to finish their current job.
    ///
    /// Jobs still waiting in the queue are left as `queued`.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(true);
        let handles: Vec<_> = self.workers.lock().await.drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Broadcast worker panicked");
            }
        }
        info!("Broadcast worker pool stopped");
    }
}

async fn worker_loop(
    worker: usize,
    job_rx: Arc<Mutex<mpsc::Receiver<QueuedJob>>>,
    context: Arc<WorkerContext>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    debug!(worker, "Broadcast worker started");
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        let next = tokio::select! {
            _ = shutdown_rx.changed() => break,
            job = async { job_rx.lock().await.recv().await } => job,
        };
        match next {
            Some(job) => run_job(worker, job, &context).await,
            None => break,
        }
    }
    debug!(worker, "Broadcast worker stopped");
}

/// Updates a job's status. Finishing a job also evicts the oldest finished
/// jobs beyond the retention limit, under the same lock.
async fn set_status(context: &WorkerContext, id: &BroadcastJobId, status: JobStatus) {
    let mut jobs = context.jobs.write().await;
    let finished = status.is_finished();
    if let Some(job) = jobs.get_mut(id) {
        if finished {
            job.finished_at = Some(Timestamp::now());
        }
        job.status = status;
    }
    if finished {
        evict_finished(&mut jobs, context.retained_jobs);
    }
}

/// Drops the oldest finished jobs beyond `retained`. Queued and running
/// jobs are never evicted.
fn evict_finished(jobs: &mut HashMap<BroadcastJobId, BroadcastJob>, retained: usize) {
    let mut finished: Vec<(Timestamp, BroadcastJobId)> = jobs
        .values()
        .filter_map(|job| job.finished_at.map(|at| (at, job.id)))
        .collect();
    if finished.len() <= retained {
        return;
    }
    finished.sort_by_key(|(at, _)| *at);
    let excess = finished.len() - retained;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
    }
    debug!(evicted = excess, "Evicted finished broadcast jobs");
}

async fn run_job(worker: usize, job: QueuedJob, context: &WorkerContext) {
    let QueuedJob { id, documents } = job;
    set_status(context, &id, JobStatus::Running { sent: 0, failed: 0 }).await;

    let recipients = match context.recipients.recipient_emails().await {
        Ok(recipients) => recipients,
        Err(e) => {
            error!(job_id = %id, error = %e, "Broadcast recipient listing failed");
            set_status(context, &id, JobStatus::Failed { reason: e.message }).await;
            return;
        }
    };

    info!(job_id = %id, worker, recipients = recipients.len(), "Broadcast job running");
    let content = legal_update_email(documents, &context.links);
    let (mut sent, mut failed) = (0usize, 0usize);

    for recipient in &recipients {
        match context.sender.send(recipient, &content).await {
            Ok(()) => sent += 1,
            Err(e) => {
                failed += 1;
                warn!(job_id = %id, error = %e, "Broadcast email failed");
            }
        }
        set_status(context, &id, JobStatus::Running { sent, failed }).await;
    }

    set_status(context, &id, JobStatus::Completed { sent, failed }).await;
    info!(job_id = %id, sent, failed, "Broadcast job completed");
}
