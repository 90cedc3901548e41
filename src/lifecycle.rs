// ABOUTME: Lifecycle controller and inventory queries over any EngineOps.
// ABOUTME: Realize a spec (resolve, conflict-check, create, start) and query by name/label/id.

use crate::engine::{ContainerRecord, CreateConfig, EngineOps, PortMapping};
use crate::error::{Error, Result};
use crate::spec::ContainerSpec;
use crate::types::{ContainerId, ImageRef};
use async_trait::async_trait;

/// High-level container lifecycle operations, available on every
/// [`EngineOps`] implementation.
///
/// All queries re-list the full container set on every call. Correctness
/// over efficiency: the engine is the single source of truth and this layer
/// is operational tooling, not a hot path.
#[async_trait]
pub trait Lifecycle: EngineOps {
    /// Realize a [`ContainerSpec`]: resolve the image, check for a name
    /// conflict, create the container and start it.
    ///
    /// The steps run strictly in that order, each short-circuiting on
    /// failure. If the start call fails the container is left in place (not
    /// auto-removed) and the identifier is not returned; rediscover it with
    /// [`Lifecycle::find_by_name`] before tearing it down.
    async fn run(&self, spec: ContainerSpec) -> Result<ContainerId>;

    /// Look up a container by exact name, including stopped ones.
    /// Absence is `Ok(None)`, not an error.
    async fn find_by_name(&self, name: &str) -> Result<Option<ContainerId>>;

    /// List containers whose labels map `key` to exactly `value`.
    /// No matches is an empty vector, not an error.
    async fn find_by_label(&self, key: &str, value: &str) -> Result<Vec<ContainerRecord>>;

    /// Return the lifecycle state of the container with the given
    /// identifier, failing with [`Error::NotFound`] if there is none.
    /// Callers use this to assert a specific container's condition, so
    /// absence is an error here.
    async fn state(&self, id: &ContainerId) -> Result<String>;
}

#[async_trait]
impl<E: EngineOps + ?Sized> Lifecycle for E {
    async fn run(&self, spec: ContainerSpec) -> Result<ContainerId> {
        // Normalizing the reference up front keeps the local-inventory match
        // aligned with the engine's fully tagged RepoTags form.
        let image = ImageRef::parse(spec.image())?.to_string();

        resolve_image(self, &image).await?;

        if !spec.name.is_empty() {
            if let Some(existing_id) = self.find_by_name(&spec.name).await? {
                return Err(Error::Conflict {
                    name: spec.name,
                    existing_id,
                });
            }
        }

        let config = assemble(spec, image)?;

        let id = self.create_container(&config).await?;
        tracing::debug!(%id, image = %config.image, "container created");

        self.start_container(&id).await?;
        tracing::info!(%id, name = %config.name, "container running");

        Ok(id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ContainerId>> {
        let containers = self.list_containers(true).await?;
        Ok(containers
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id))
    }

    async fn find_by_label(&self, key: &str, value: &str) -> Result<Vec<ContainerRecord>> {
        let containers = self.list_containers(true).await?;
        Ok(containers
            .into_iter()
            .filter(|c| c.labels.get(key).is_some_and(|v| v == value))
            .collect())
    }

    async fn state(&self, id: &ContainerId) -> Result<String> {
        let containers = self.list_containers(true).await?;
        containers
            .into_iter()
            .find(|c| c.id == *id)
            .map(|c| c.state)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

/// Make sure the image is present locally, pulling it if it is not.
///
/// The pull is network-bound and unbounded in duration; no timeout is
/// imposed here. Callers wanting bounded time cancel the engine handle's
/// token.
async fn resolve_image<E: EngineOps + ?Sized>(engine: &E, image: &str) -> Result<()> {
    let images = engine.list_images().await?;
    if images
        .iter()
        .any(|img| img.repo_tags.iter().any(|tag| tag == image))
    {
        return Ok(());
    }

    tracing::info!(image, "image not present locally, pulling");
    engine.pull_image(image).await
}

/// Translate a spec into the engine's create request.
///
/// Environment becomes `KEY=VALUE` strings (set semantics, order
/// insignificant); each port pair binds `container/tcp` on all host
/// interfaces. A malformed container port fails here, before the create
/// call reaches the engine.
fn assemble(spec: ContainerSpec, image: String) -> Result<CreateConfig> {
    let env = spec
        .vars
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect();

    let mut ports = Vec::with_capacity(spec.ports.len());
    for (host_port, container_port) in &spec.ports {
        let parsed: u16 = container_port
            .parse()
            .map_err(|_| Error::InvalidPort(container_port.clone()))?;
        ports.push(PortMapping {
            host_port: host_port.clone(),
            container_port: parsed,
        });
    }

    Ok(CreateConfig {
        image,
        name: spec.name,
        env,
        entrypoint: if spec.entry_point.is_empty() {
            None
        } else {
            Some(spec.entry_point)
        },
        labels: spec.labels,
        auto_remove: spec.auto_remove,
        ports,
    })
}
