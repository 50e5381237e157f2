//! Health-check orchestration.
//!
//! One pass is strictly sequential: probe every node, then verify every
//! container against the node snapshot just produced, then recount capacity.
//! A pass never retries internally; corrective side effects (disabled nodes,
//! migration jobs) are picked up by the next scheduled pass.

mod capacity;
mod migrate;
mod probe;
mod verify;

use crate::config::WatcherConfig;
use crate::models::Job;
use crate::queue::JobQueue;
use crate::runtime::RuntimeClient;
use crate::store::Inventory;
use capacity::RecountOutcome;
use log::{error, info, warn};
use std::sync::Arc;

/// Runs reconciliation passes over the registered fleet.
pub struct HealthChecker {
    store: Arc<dyn Inventory>,
    runtime: Arc<dyn RuntimeClient>,
    queue: Arc<dyn JobQueue>,
    config: WatcherConfig,
}

impl HealthChecker {
    pub fn new(
        store: Arc<dyn Inventory>,
        runtime: Arc<dyn RuntimeClient>,
        queue: Arc<dyn JobQueue>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            store,
            runtime,
            queue,
            config,
        }
    }

    /// Run one full health-check pass against the claimed work item.
    ///
    /// The item is marked in use at the start and complete on every exit
    /// path. When the node scan fails or leaves no healthy node the pass
    /// cancels without touching containers.
    pub async fn run_pass(&self, job: &mut Job) {
        job.in_use = true;

        let nodes = match probe::probe_nodes(&self.store, &self.config).await {
            Ok(nodes) if nodes.iter().any(|n| n.healthy) => nodes,
            Ok(_) => {
                warn!(target: "watcher", "cancelling health check: no healthy nodes");
                job.complete = true;
                return;
            }
            Err(e) => {
                error!(target: "watcher", "cancelling health check, node scan failed: {e:#}");
                job.complete = true;
                return;
            }
        };

        match verify::verify_containers(
            self.store.as_ref(),
            self.runtime.as_ref(),
            self.queue.as_ref(),
        )
        .await
        {
            Ok(containers) => {
                match capacity::recount(self.store.as_ref(), &containers, &nodes).await {
                    Ok(RecountOutcome::Tallied | RecountOutcome::NoContainers) => {}
                    Err(e) => error!(target: "watcher", "capacity recount failed: {e:#}"),
                }
            }
            // Inventory unavailable mid-pass: skip the recount rather than
            // zeroing capacity against an empty listing.
            Err(e) => error!(target: "watcher", "container scan failed, skipping recount: {e:#}"),
        }

        job.complete = true;
        info!(target: "watcher", "health check complete");
    }
}
