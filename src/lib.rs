//! Reconciliation core of a container-fleet daemon.
//!
//! One [`watcher::HealthChecker`] pass probes every registered node for TCP
//! reachability, verifies that each tracked container is actually running on
//! its node (starting it when stopped), schedules migration for containers
//! stranded on dead nodes, and recomputes per-node capacity counts.
//!
//! The inventory store, container runtime and job queue are collaborator
//! traits ([`store::Inventory`], [`runtime::RuntimeClient`],
//! [`queue::JobQueue`]) injected at construction, so the core can run against
//! in-memory fakes in tests and against real backends in the daemon.

pub mod config;
pub mod models;
pub mod queue;
pub mod runtime;
pub mod store;
pub mod watcher;

pub use config::WatcherConfig;
pub use models::{Container, ContainerStatus, Job, JobKind, Node};
pub use watcher::HealthChecker;
