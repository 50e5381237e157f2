use serde::{Deserialize, Serialize};

/// A registered compute host capable of running containers.
///
/// Owned by the inventory store; the watcher only flips the health flags and
/// rewrites `container_count`, it never creates or deletes node records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub hostname: String,
    /// Reachable host (IP or DNS name) of the node's runtime endpoint.
    pub address: String,
    pub port: u16,
    pub healthy: bool,
    pub enabled: bool,
    #[serde(default)]
    pub container_count: u32,
}

impl Node {
    /// `address:port`, the dial target for both the reachability probe and
    /// the runtime client session.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Run state of a tracked container as of the last completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContainerStatus {
    Up,
    Down,
}

/// A workload record tracked by the daemon, bound to at most one node.
///
/// `node_id` is a weak reference: the node may disappear independently, and
/// `None` means unassigned (a container detached for migration stays valid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    /// Identifier the runtime knows this container by, used to address
    /// inspect/start calls inside a session.
    pub runtime_id: String,
    pub name: String,
    #[serde(default)]
    pub node_id: Option<String>,
    pub status: ContainerStatus,
    pub enabled: bool,
}

/// Kind of recovery work requested from the job queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Start (or restart) the container's runtime instance in place.
    Launch,
    /// Rebuild the container record on a node picked by the scheduler.
    Recreate,
}

/// A unit of scheduled work claimed by one health-check pass.
///
/// The watcher writes exactly two fields: `in_use` when the pass starts and
/// `complete` when it ends, cancellation included. Claiming (handing a job to
/// at most one pass at a time) is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub in_use: bool,
    #[serde(default)]
    pub complete: bool,
}

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            in_use: false,
            complete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_address_and_port() {
        let node = Node {
            id: "n1".to_string(),
            hostname: "worker-1".to_string(),
            address: "10.0.0.7".to_string(),
            port: 2375,
            healthy: true,
            enabled: true,
            container_count: 0,
        };
        assert_eq!(node.endpoint(), "10.0.0.7:2375");
    }

    #[test]
    fn job_kind_serializes_lowercase() {
        assert_eq!(serde_yaml::to_string(&JobKind::Launch).unwrap().trim(), "launch");
        assert_eq!(
            serde_yaml::to_string(&JobKind::Recreate).unwrap().trim(),
            "recreate"
        );
    }

    #[test]
    fn container_status_uses_uppercase_wire_form() {
        let c: Container = serde_yaml::from_str(
            "id: c1\nruntimeId: abc\nname: web\nstatus: UP\nenabled: true\n",
        )
        .unwrap();
        assert_eq!(c.status, ContainerStatus::Up);
        assert_eq!(c.node_id, None);
    }
}
