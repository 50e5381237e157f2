use crate::models::{Container, ContainerStatus, Node};
use crate::store::Inventory;
use anyhow::Result;
use log::info;
use std::collections::HashMap;

/// Outcome of a capacity recount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecountOutcome {
    Tallied,
    /// The fleet tracks no containers; every node's count was reset to zero.
    NoContainers,
}

/// Recompute every node's `container_count` from the just-verified container
/// set and persist each node.
///
/// The recount is authoritative: it overwrites any incremental decrement the
/// verifier made earlier in the same pass, so transient double adjustment is
/// self-correcting by the end of the pass.
pub(crate) async fn recount(
    store: &dyn Inventory,
    containers: &[Container],
    nodes: &[Node],
) -> Result<RecountOutcome> {
    if containers.is_empty() {
        info!(target: "watcher::capacity", "no containers tracked, resetting all node counts");
        for node in nodes {
            let mut node = node.clone();
            node.container_count = 0;
            store.update_node(&node).await?;
        }
        return Ok(RecountOutcome::NoContainers);
    }

    let tally = tally_by_node(containers);
    for node in nodes {
        let mut node = node.clone();
        node.container_count = tally.get(node.id.as_str()).copied().unwrap_or(0);
        store.update_node(&node).await?;
    }
    Ok(RecountOutcome::Tallied)
}

/// Count running containers per assigned node. Detached or down containers
/// occupy no capacity.
fn tally_by_node(containers: &[Container]) -> HashMap<&str, u32> {
    let mut tally = HashMap::new();
    for container in containers {
        if container.status == ContainerStatus::Up
            && let Some(node_id) = container.node_id.as_deref()
        {
            *tally.entry(node_id).or_insert(0) += 1;
        }
    }
    tally
}
