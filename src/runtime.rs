use anyhow::Result;
use async_trait::async_trait;

/// Observed run state of a container inside the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerState {
    pub running: bool,
}

/// An established session against one node's container runtime.
#[async_trait]
pub trait RuntimeSession: Send + Sync {
    /// Inspect a container by its runtime identifier.
    ///
    /// An error means the existence check failed; the watcher does not
    /// distinguish "no such container" from a transport fault here.
    async fn inspect(&self, runtime_id: &str) -> Result<ContainerState>;

    /// Ask the runtime to start a stopped container.
    async fn start(&self, runtime_id: &str) -> Result<()>;
}

/// Factory for runtime sessions, addressed at a node's `host:port` endpoint.
#[async_trait]
pub trait RuntimeClient: Send + Sync + 'static {
    async fn connect(&self, endpoint: &str) -> Result<Box<dyn RuntimeSession>>;
}
