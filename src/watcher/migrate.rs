use crate::models::{Container, ContainerStatus, JobKind};
use crate::queue::JobQueue;
use crate::store::Inventory;
use log::{info, warn};

/// Declare the container failed and request outside help.
///
/// Detaches it from its node, marks it down and disabled, persists the
/// record, then enqueues a recreate job (re-register on a node picked by the
/// external scheduler) and a launch job. Loses node affinity but preserves
/// uptime. Best-effort: a failed write or enqueue is logged and the pass
/// moves on.
pub(crate) async fn migrate(
    store: &dyn Inventory,
    queue: &dyn JobQueue,
    container: &mut Container,
) {
    container.node_id = None;
    container.status = ContainerStatus::Down;
    container.enabled = false;
    if let Err(e) = store.update_container(container).await {
        warn!(
            target: "watcher::migrate",
            "failed to persist detached container {}: {e:#}", container.id
        );
    }

    for kind in [JobKind::Recreate, JobKind::Launch] {
        if let Err(e) = queue.enqueue(kind, container).await {
            warn!(
                target: "watcher::migrate",
                "failed to enqueue {kind:?} for container {}: {e:#}", container.id
            );
        }
    }

    info!(
        target: "watcher::migrate",
        "container {} detached and scheduled for recovery", container.name
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MemoryQueue;
    use crate::store::MemoryInventory;

    #[tokio::test]
    async fn migrate_detaches_persists_and_enqueues_recovery() {
        let store = MemoryInventory::new();
        let queue = MemoryQueue::new();
        let mut container = Container {
            id: "c1".to_string(),
            runtime_id: "rt-c1".to_string(),
            name: "web".to_string(),
            node_id: Some("n1".to_string()),
            status: ContainerStatus::Up,
            enabled: true,
        };
        store.insert_container(container.clone()).await;

        migrate(store.as_ref(), queue.as_ref(), &mut container).await;

        assert_eq!(container.node_id, None);
        assert_eq!(container.status, ContainerStatus::Down);
        assert!(!container.enabled);

        let stored = store.container("c1").await.expect("persisted");
        assert_eq!(stored, container);

        let jobs = queue.drain().await;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].kind, JobKind::Recreate);
        assert_eq!(jobs[1].kind, JobKind::Launch);
        assert_eq!(jobs[0].container.id, "c1");
    }
}
