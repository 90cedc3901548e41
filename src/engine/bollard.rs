// ABOUTME: Bollard-based Engine handle implementing EngineOps.
// ABOUTME: One shared daemon connection plus a cancellation token for every call.

use crate::engine::api::{ContainerRecord, CreateConfig, EngineOps, ImageRecord};
use crate::error::{Error, Result};
use crate::types::ContainerId;
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{ContainerCreateBody, HostConfig, PortBinding};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, ListImagesOptions,
    RemoveContainerOptions, StartContainerOptions,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_engine_error(e: bollard::errors::Error) -> Error {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => Error::Runtime(format!("engine returned {}: {}", status_code, message)),
        e => Error::Connection(e.to_string()),
    }
}

fn map_pull_error(e: bollard::errors::Error, image: &str) -> Error {
    Error::ImagePull {
        image: image.to_string(),
        reason: e.to_string(),
    }
}

fn map_create_error(e: bollard::errors::Error) -> Error {
    match e {
        // 409 covers the narrow race where a conflicting name appeared after
        // the conflict check; the engine is the source of truth and reports it.
        bollard::errors::Error::DockerResponseServerError { message, .. } => Error::Create(message),
        e => Error::Connection(e.to_string()),
    }
}

fn map_start_error(e: bollard::errors::Error) -> Error {
    match e {
        bollard::errors::Error::DockerResponseServerError { message, .. } => Error::Start(message),
        e => Error::Connection(e.to_string()),
    }
}

fn map_remove_error(e: bollard::errors::Error, id: &ContainerId) -> Error {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => Error::NotFound(id.to_string()),
        e => map_engine_error(e),
    }
}

/// Race a call against the handle's cancellation token.
///
/// Canceling aborts the in-flight call and leaves engine-side state exactly
/// as it was at cancellation; no rollback is attempted.
async fn cancellable<T, E>(
    cancel: &CancellationToken,
    fut: impl Future<Output = std::result::Result<T, E>>,
    map_err: impl FnOnce(E) -> Error,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Error::Canceled),
        res = fut => res.map_err(map_err),
    }
}

// =============================================================================
// Engine
// =============================================================================

/// An authenticated handle to a container engine daemon.
///
/// Created once at startup and shared by all operations; the underlying
/// connection is safe for concurrent use and the handle is cheap to clone.
/// This layer keeps no mutable state of its own, so every query reflects the
/// engine's live state at call time.
#[derive(Clone)]
pub struct Engine {
    client: Docker,
    cancel: CancellationToken,
}

impl Engine {
    /// Wrap an existing bollard client.
    pub fn new(client: Docker) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
        }
    }

    /// Connect using the platform defaults (`DOCKER_HOST` or the local socket).
    pub fn connect() -> Result<Self> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Connect to an explicit Unix socket path.
    pub fn connect_with_unix(socket: &str) -> Result<Self> {
        let client = Docker::connect_with_unix(socket, 120, bollard::API_DEFAULT_VERSION)
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// The token guarding every call made through this handle. Canceling it
    /// aborts in-flight operations with [`Error::Canceled`].
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Probe daemon connectivity.
    pub async fn ping(&self) -> Result<()> {
        cancellable(&self.cancel, self.client.ping(), map_engine_error).await?;
        Ok(())
    }
}

#[async_trait]
impl EngineOps for Engine {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        let opts = ListContainersOptions {
            all,
            ..Default::default()
        };

        let summaries = cancellable(
            &self.cancel,
            self.client.list_containers(Some(opts)),
            map_engine_error,
        )
        .await?;

        Ok(summaries
            .into_iter()
            .map(|c| {
                // The engine prefixes stored names with a path separator.
                let names = c.names.unwrap_or_default();
                let name = names
                    .first()
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_default();

                ContainerRecord {
                    id: ContainerId::new(c.id.unwrap_or_default()),
                    name,
                    state: c
                        .state
                        .map(|s| format!("{:?}", s).to_lowercase())
                        .unwrap_or_default(),
                    labels: c.labels.unwrap_or_default(),
                }
            })
            .collect())
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let opts = ListImagesOptions {
            all: true,
            ..Default::default()
        };

        let images = cancellable(
            &self.cancel,
            self.client.list_images(Some(opts)),
            map_engine_error,
        )
        .await?;

        Ok(images
            .into_iter()
            .map(|img| ImageRecord {
                repo_tags: img.repo_tags,
            })
            .collect())
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        let opts = CreateImageOptions {
            from_image: Some(image.to_string()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates; forward them to the
        // log sink and fail on the first error.
        let drain = async {
            let mut stream = self.client.create_image(Some(opts), None, None);
            while let Some(progress) = stream.next().await {
                let info = progress?;
                if let Some(status) = info.status {
                    tracing::debug!(image, %status, "pull progress");
                }
            }
            Ok::<(), bollard::errors::Error>(())
        };

        cancellable(&self.cancel, drain, |e| map_pull_error(e, image)).await
    }

    async fn create_container(&self, config: &CreateConfig) -> Result<ContainerId> {
        let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
        let mut exposed_ports: Vec<String> = Vec::new();
        for mapping in &config.ports {
            let port_key = format!("{}/tcp", mapping.container_port);
            exposed_ports.push(port_key.clone());
            port_bindings.insert(
                port_key,
                Some(vec![PortBinding {
                    host_ip: Some("0.0.0.0".to_string()),
                    host_port: Some(mapping.host_port.clone()),
                }]),
            );
        }

        let host_config = HostConfig {
            auto_remove: Some(config.auto_remove),
            port_bindings: if port_bindings.is_empty() {
                None
            } else {
                Some(port_bindings)
            },
            ..Default::default()
        };

        let body = ContainerCreateBody {
            image: Some(config.image.clone()),
            env: if config.env.is_empty() {
                None
            } else {
                Some(config.env.clone())
            },
            entrypoint: config.entrypoint.clone(),
            labels: if config.labels.is_empty() {
                None
            } else {
                Some(config.labels.clone())
            },
            exposed_ports: if exposed_ports.is_empty() {
                None
            } else {
                Some(exposed_ports)
            },
            host_config: Some(host_config),
            ..Default::default()
        };

        let opts = CreateContainerOptions {
            name: if config.name.is_empty() {
                None
            } else {
                Some(config.name.clone())
            },
            ..Default::default()
        };

        let response = cancellable(
            &self.cancel,
            self.client.create_container(Some(opts), body),
            map_create_error,
        )
        .await?;

        for warning in &response.warnings {
            tracing::warn!(%warning, "engine reported a create warning");
        }

        Ok(ContainerId::new(response.id))
    }

    async fn start_container(&self, id: &ContainerId) -> Result<()> {
        cancellable(
            &self.cancel,
            self.client
                .start_container(id.as_str(), None::<StartContainerOptions>),
            map_start_error,
        )
        .await
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<()> {
        let opts = RemoveContainerOptions {
            force: true,
            v: true,
            link: false,
        };

        cancellable(
            &self.cancel,
            self.client.remove_container(id.as_str(), Some(opts)),
            |e| map_remove_error(e, id),
        )
        .await
    }
}
