// ABOUTME: The raw engine operations trait and the records it exchanges.
// ABOUTME: Mirrors the subset of the engine remote API this layer consumes.

use crate::error::Result;
use crate::types::ContainerId;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;

/// The remote operations this layer needs from a container engine.
///
/// Every method is a single blocking round trip to the engine: no retries,
/// no timeouts, no client-side caching. Implementations must be safe to
/// call concurrently from multiple tasks. The higher-level decision logic
/// lives in [`crate::lifecycle::Lifecycle`], which is blanket-implemented
/// for every `EngineOps`.
#[async_trait]
pub trait EngineOps: Send + Sync {
    /// List containers. With `all` set, stopped containers are included.
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerRecord>>;

    /// List the engine's local image inventory.
    async fn list_images(&self) -> Result<Vec<ImageRecord>>;

    /// Pull an image from the registry, consuming the progress stream.
    /// Network-bound and unbounded in duration; cancel the handle's token
    /// for bounded time.
    async fn pull_image(&self, image: &str) -> Result<()>;

    /// Create a container from an assembled configuration, returning the
    /// engine-assigned identifier.
    async fn create_container(&self, config: &CreateConfig) -> Result<ContainerId>;

    /// Start a created container.
    async fn start_container(&self, id: &ContainerId) -> Result<()>;

    /// Force-remove a container and its anonymous volumes, stopping it
    /// first if it is running. Not idempotent: removing an unknown
    /// identifier surfaces [`crate::Error::NotFound`] unchanged.
    async fn remove_container(&self, id: &ContainerId) -> Result<()>;
}

/// A read-only snapshot of one container, as observed by the engine.
///
/// Never cached: the engine is the source of truth, so records are fetched
/// fresh on every query. The `name` field is normalized - the engine's
/// leading path separator is already stripped.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerRecord {
    pub id: ContainerId,
    pub name: String,
    pub state: String,
    pub labels: HashMap<String, String>,
}

/// One entry from the engine's local image inventory.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecord {
    /// Fully tagged `repository:tag` names for this image.
    pub repo_tags: Vec<String>,
}

/// The fully translated create request, assembled by the lifecycle logic
/// from a [`crate::ContainerSpec`] just before the create call.
#[derive(Debug, Clone)]
pub struct CreateConfig {
    /// Normalized `repository:tag` image reference.
    pub image: String,
    /// Requested name; empty means the engine assigns a generated name.
    pub name: String,
    /// Environment as `KEY=VALUE` strings. The engine treats this as a set,
    /// so ordering is not significant.
    pub env: Vec<String>,
    /// Entrypoint override; `None` keeps the image default.
    pub entrypoint: Option<Vec<String>>,
    /// Labels to attach at creation.
    pub labels: HashMap<String, String>,
    /// Whether the engine removes the container once it stops.
    pub auto_remove: bool,
    /// TCP port bindings, container port to host port on all interfaces.
    pub ports: Vec<PortMapping>,
}

/// One validated TCP port binding.
#[derive(Debug, Clone)]
pub struct PortMapping {
    /// Host port, kept as the caller supplied it.
    pub host_port: String,
    /// Container port, parsed and validated before any engine call.
    pub container_port: u16,
}
