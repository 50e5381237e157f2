use crate::models::{Container, JobKind};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The external dispatcher the watcher hands recovery work to.
///
/// The watcher only enqueues; scheduling, dedup and retry policy belong to
/// the queue's owner.
#[async_trait]
pub trait JobQueue: Send + Sync + 'static {
    async fn enqueue(&self, kind: JobKind, container: &Container) -> Result<()>;
}

/// A recovery request captured by [`MemoryQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    pub kind: JobKind,
    pub container: Container,
}

/// In-memory FIFO [`JobQueue`], enough for tests and single-process embedding.
#[derive(Default)]
pub struct MemoryQueue {
    jobs: Mutex<Vec<QueuedJob>>,
}

impl MemoryQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Drain everything enqueued so far, oldest first.
    pub async fn drain(&self) -> Vec<QueuedJob> {
        std::mem::take(&mut *self.jobs.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, kind: JobKind, container: &Container) -> Result<()> {
        self.jobs.lock().await.push(QueuedJob {
            kind,
            container: container.clone(),
        });
        Ok(())
    }
}
