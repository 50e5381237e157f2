use crate::config::WatcherConfig;
use crate::models::Node;
use crate::store::Inventory;
use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Probe every registered node for TCP reachability and persist the outcome.
///
/// Probes run concurrently under the configured bound; the returned sequence
/// is in inventory order. Each node's record is written exactly once per
/// pass: healthy and enabled on success, both cleared on failure. Only the
/// inventory read itself can fail — an unreachable node is recorded, never
/// propagated.
pub(crate) async fn probe_nodes(
    store: &Arc<dyn Inventory>,
    config: &WatcherConfig,
) -> Result<Vec<Node>> {
    let nodes = store.list_nodes().await?;
    let total = nodes.len();
    let semaphore = Arc::new(Semaphore::new(config.probe_concurrency.max(1)));
    let deadline = config.probe_timeout();

    let mut tasks = JoinSet::new();
    for (slot, mut node) in nodes.into_iter().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let store = store.clone();
        tasks.spawn(async move {
            let reachable = probe_endpoint(&node.endpoint(), deadline).await;
            node.healthy = reachable;
            node.enabled = reachable;
            if reachable {
                info!(target: "watcher::probe", "node {} is healthy", node.hostname);
            } else {
                warn!(
                    target: "watcher::probe",
                    "node {} is not accessible at {}", node.hostname, node.endpoint()
                );
            }
            if let Err(e) = store.update_node(&node).await {
                warn!(target: "watcher::probe", "failed to persist node {}: {e:#}", node.id);
            }
            drop(permit);
            (slot, node)
        });
    }

    let mut probed: Vec<Option<Node>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (slot, node) = joined?;
        probed[slot] = Some(node);
    }
    Ok(probed.into_iter().flatten().collect())
}

async fn probe_endpoint(endpoint: &str, deadline: Duration) -> bool {
    match tokio::time::timeout(deadline, TcpStream::connect(endpoint)).await {
        Ok(Ok(mut stream)) => {
            let _ = stream.shutdown().await;
            true
        }
        Ok(Err(_)) | Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryInventory;
    use tokio::net::TcpListener;

    fn test_config() -> WatcherConfig {
        WatcherConfig {
            probe_timeout_secs: 1,
            probe_concurrency: 4,
        }
    }

    fn make_node(id: &str, port: u16) -> Node {
        Node {
            id: id.to_string(),
            hostname: format!("host-{id}"),
            address: "127.0.0.1".to_string(),
            port,
            healthy: false,
            enabled: false,
            container_count: 0,
        }
    }

    /// Bind and immediately drop a listener so the port is known-closed.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        port
    }

    #[tokio::test]
    async fn probe_endpoint_succeeds_against_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        assert!(probe_endpoint(&addr.to_string(), Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn probe_endpoint_fails_against_closed_port() {
        let port = closed_port().await;
        assert!(!probe_endpoint(&format!("127.0.0.1:{port}"), Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn reachable_node_is_marked_healthy_and_persisted() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let mem = MemoryInventory::new();
        mem.insert_node(make_node("a", port)).await;
        let store: Arc<dyn Inventory> = mem.clone();

        let probed = probe_nodes(&store, &test_config()).await.expect("probe");
        assert!(probed[0].healthy);
        assert!(probed[0].enabled);

        let stored = mem.get_node("a").await.unwrap().expect("node persisted");
        assert!(stored.healthy);
        assert!(stored.enabled);
    }

    #[tokio::test]
    async fn unreachable_node_is_disabled_without_aborting_the_scan() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let open = listener.local_addr().expect("local addr").port();
        let dead = closed_port().await;

        let mem = MemoryInventory::new();
        mem.insert_node(make_node("a", open)).await;
        mem.insert_node(make_node("b", dead)).await;
        let store: Arc<dyn Inventory> = mem.clone();

        let probed = probe_nodes(&store, &test_config()).await.expect("probe");
        assert_eq!(probed.len(), 2);
        // inventory order preserved
        assert_eq!(probed[0].id, "a");
        assert!(probed[0].healthy);
        assert_eq!(probed[1].id, "b");
        assert!(!probed[1].healthy);
        assert!(!probed[1].enabled);

        let stored = mem.get_node("b").await.unwrap().expect("node persisted");
        assert!(!stored.healthy);
        assert!(!stored.enabled);
    }
}
