use crate::models::{Container, Node};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The persistent inventory of nodes and containers.
///
/// The watcher never creates or deletes records through this seam; it lists,
/// resolves and rewrites existing ones. Each `update_*` is its own persisted
/// write, there is no multi-record transaction, so partial progress from an
/// interrupted pass survives.
#[async_trait]
pub trait Inventory: Send + Sync + 'static {
    async fn list_nodes(&self) -> Result<Vec<Node>>;

    /// Resolve a node by id. `Ok(None)` means the id is unknown (the node was
    /// removed out from under its containers).
    async fn get_node(&self, id: &str) -> Result<Option<Node>>;

    async fn update_node(&self, node: &Node) -> Result<()>;

    async fn list_containers(&self) -> Result<Vec<Container>>;

    async fn update_container(&self, container: &Container) -> Result<()>;
}

/// In-memory [`Inventory`] backed by `RwLock`ed maps.
///
/// Listings are id-ordered so passes are deterministic. Used by the test
/// suites and by embedders that keep the fleet state in process.
#[derive(Default)]
pub struct MemoryInventory {
    nodes: RwLock<HashMap<String, Node>>,
    containers: RwLock<HashMap<String, Container>>,
}

impl MemoryInventory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn insert_node(&self, node: Node) {
        self.nodes.write().await.insert(node.id.clone(), node);
    }

    pub async fn insert_container(&self, container: Container) {
        self.containers
            .write()
            .await
            .insert(container.id.clone(), container);
    }

    pub async fn container(&self, id: &str) -> Option<Container> {
        self.containers.read().await.get(id).cloned()
    }
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn list_nodes(&self) -> Result<Vec<Node>> {
        let mut nodes: Vec<Node> = self.nodes.read().await.values().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(nodes)
    }

    async fn get_node(&self, id: &str) -> Result<Option<Node>> {
        Ok(self.nodes.read().await.get(id).cloned())
    }

    async fn update_node(&self, node: &Node) -> Result<()> {
        self.nodes
            .write()
            .await
            .insert(node.id.clone(), node.clone());
        Ok(())
    }

    async fn list_containers(&self) -> Result<Vec<Container>> {
        let mut containers: Vec<Container> =
            self.containers.read().await.values().cloned().collect();
        containers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(containers)
    }

    async fn update_container(&self, container: &Container) -> Result<()> {
        self.containers
            .write()
            .await
            .insert(container.id.clone(), container.clone());
        Ok(())
    }
}
