use crate::models::{Container, ContainerStatus, JobKind, Node};
use crate::queue::JobQueue;
use crate::runtime::RuntimeClient;
use crate::store::Inventory;
use crate::watcher::migrate::migrate;
use anyhow::Result;
use log::{debug, info, warn};

/// Verify that every tracked container is running on a healthy node.
///
/// Container checks are independent: one container's failure produces
/// corrective side effects (migration, a launch job) and the loop moves on.
/// Only the inventory listing itself can fail the scan. The returned
/// sequence carries the status/assignment updates made during the scan and
/// feeds the capacity recount.
pub(crate) async fn verify_containers(
    store: &dyn Inventory,
    runtime: &dyn RuntimeClient,
    queue: &dyn JobQueue,
) -> Result<Vec<Container>> {
    let mut containers = store.list_containers().await?;
    for container in containers.iter_mut() {
        check_container(store, runtime, queue, container).await;
    }
    Ok(containers)
}

async fn check_container(
    store: &dyn Inventory,
    runtime: &dyn RuntimeClient,
    queue: &dyn JobQueue,
    container: &mut Container,
) {
    let node = match resolve_node(store, container).await {
        Some(node) if node.healthy => node,
        Some(mut node) => {
            warn!(
                target: "watcher::verify",
                "node {} is not healthy, migrating container {}", node.hostname, container.name
            );
            release_capacity(store, &mut node).await;
            migrate(store, queue, container).await;
            return;
        }
        None => {
            warn!(
                target: "watcher::verify",
                "container {} has no resolvable node, migrating", container.name
            );
            migrate(store, queue, container).await;
            return;
        }
    };

    // A session that cannot be established is a transient client fault, not
    // evidence of a dead container. Skip without mutating anything.
    let session = match runtime.connect(&node.endpoint()).await {
        Ok(session) => session,
        Err(e) => {
            warn!(
                target: "watcher::verify",
                "runtime session to {} failed, skipping container {}: {e:#}",
                node.endpoint(),
                container.name
            );
            return;
        }
    };

    let state = match session.inspect(&container.runtime_id).await {
        Ok(state) => state,
        Err(_) => {
            // The record is salvageable: the node is fine, only the
            // runtime-side instance is missing. Relaunch in place.
            info!(
                target: "watcher::verify",
                "container {} does not exist in the runtime, requesting launch", container.name
            );
            container.status = ContainerStatus::Down;
            if let Err(e) = store.update_container(container).await {
                warn!(
                    target: "watcher::verify",
                    "failed to persist container {}: {e:#}", container.id
                );
            }
            if let Err(e) = queue.enqueue(JobKind::Launch, container).await {
                warn!(
                    target: "watcher::verify",
                    "failed to enqueue launch for container {}: {e:#}", container.id
                );
            }
            return;
        }
    };

    if state.running {
        debug!(
            target: "watcher::verify",
            "container {} is running and healthy", container.name
        );
        return;
    }

    if let Err(e) = session.start(&container.runtime_id).await {
        warn!(
            target: "watcher::verify",
            "container {} won't start, migrating: {e:#}", container.name
        );
        let mut node = node;
        release_capacity(store, &mut node).await;
        migrate(store, queue, container).await;
        return;
    }

    container.status = ContainerStatus::Up;
    if let Err(e) = store.update_container(container).await {
        warn!(
            target: "watcher::verify",
            "failed to persist container {}: {e:#}", container.id
        );
    }
    info!(target: "watcher::verify", "container {} restarted", container.name);
}

/// Look up the container's owning node. `None` covers unassigned containers,
/// unknown node ids and store lookup failures alike.
async fn resolve_node(store: &dyn Inventory, container: &Container) -> Option<Node> {
    let node_id = container.node_id.as_deref()?;
    match store.get_node(node_id).await {
        Ok(found) => found,
        Err(e) => {
            warn!(
                target: "watcher::verify",
                "lookup of node {node_id} failed: {e:#}"
            );
            None
        }
    }
}

/// Drop one slot from the node's recorded capacity ahead of migration, so the
/// end-of-pass recount reconciles an already-adjusted baseline instead of
/// double counting. Clamped at zero.
async fn release_capacity(store: &dyn Inventory, node: &mut Node) {
    node.container_count = node.container_count.saturating_sub(1);
    if let Err(e) = store.update_node(node).await {
        warn!(
            target: "watcher::verify",
            "failed to persist capacity for node {}: {e:#}", node.id
        );
    }
}
