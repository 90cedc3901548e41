// ABOUTME: In-memory EngineOps implementation for lifecycle tests.
// ABOUTME: Tracks images, containers, and pulls behind a mutex; no daemon needed.

use async_trait::async_trait;
use dockhand::{ContainerId, ContainerRecord, CreateConfig, EngineOps, Error, ImageRecord, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// A container engine that lives entirely in process memory.
///
/// Behaves like the daemon at the `EngineOps` boundary: names are unique,
/// identifiers are opaque and never reused, created containers need an
/// explicit start, and removal of an unknown identifier is a 404.
pub struct FakeEngine {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    local_images: HashSet<String>,
    registry_images: HashSet<String>,
    containers: Vec<FakeContainer>,
    pulls: Vec<String>,
    next_id: u64,
    fail_start: bool,
}

#[derive(Clone)]
struct FakeContainer {
    id: ContainerId,
    name: String,
    state: String,
    labels: HashMap<String, String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Seed the local image inventory.
    pub fn with_local_image(self, image: &str) -> Self {
        self.state.lock().local_images.insert(image.to_string());
        self
    }

    /// Make an image pullable from the fake registry.
    pub fn with_registry_image(self, image: &str) -> Self {
        self.state.lock().registry_images.insert(image.to_string());
        self
    }

    /// Seed a pre-existing container, returning its identifier.
    pub fn add_container(&self, name: &str, state: &str) -> ContainerId {
        let mut st = self.state.lock();
        st.next_id += 1;
        let id = ContainerId::new(format!("{:016x}", st.next_id.wrapping_mul(0x9e3779b1)));
        st.containers.push(FakeContainer {
            id: id.clone(),
            name: name.to_string(),
            state: state.to_string(),
            labels: HashMap::new(),
        });
        id
    }

    /// Make every start call fail, leaving containers in "created" state.
    pub fn fail_start(self) -> Self {
        self.state.lock().fail_start = true;
        self
    }

    /// Images pulled so far, in call order.
    pub fn pulls(&self) -> Vec<String> {
        self.state.lock().pulls.clone()
    }

    pub fn container_count(&self) -> usize {
        self.state.lock().containers.len()
    }

    pub fn containers_named(&self, name: &str) -> usize {
        self.state
            .lock()
            .containers
            .iter()
            .filter(|c| c.name == name)
            .count()
    }
}

fn record(c: &FakeContainer) -> ContainerRecord {
    ContainerRecord {
        id: c.id.clone(),
        name: c.name.clone(),
        state: c.state.clone(),
        labels: c.labels.clone(),
    }
}

#[async_trait]
impl EngineOps for FakeEngine {
    async fn list_containers(&self, all: bool) -> Result<Vec<ContainerRecord>> {
        let st = self.state.lock();
        Ok(st
            .containers
            .iter()
            .filter(|c| all || c.state == "running")
            .map(record)
            .collect())
    }

    async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let st = self.state.lock();
        Ok(st
            .local_images
            .iter()
            .map(|tag| ImageRecord {
                repo_tags: vec![tag.clone()],
            })
            .collect())
    }

    async fn pull_image(&self, image: &str) -> Result<()> {
        let mut st = self.state.lock();
        st.pulls.push(image.to_string());
        if st.registry_images.contains(image) {
            st.local_images.insert(image.to_string());
            Ok(())
        } else {
            Err(Error::ImagePull {
                image: image.to_string(),
                reason: "manifest unknown".to_string(),
            })
        }
    }

    async fn create_container(&self, config: &CreateConfig) -> Result<ContainerId> {
        let mut st = self.state.lock();
        if !config.name.is_empty() && st.containers.iter().any(|c| c.name == config.name) {
            return Err(Error::Create(format!(
                "Conflict. The container name \"/{}\" is already in use",
                config.name
            )));
        }

        st.next_id += 1;
        let id = ContainerId::new(format!("{:016x}", st.next_id.wrapping_mul(0x9e3779b1)));
        let name = if config.name.is_empty() {
            format!("generated-{}", st.next_id)
        } else {
            config.name.clone()
        };

        st.containers.push(FakeContainer {
            id: id.clone(),
            name,
            state: "created".to_string(),
            labels: config.labels.clone(),
        });

        Ok(id)
    }

    async fn start_container(&self, id: &ContainerId) -> Result<()> {
        let mut st = self.state.lock();
        if st.fail_start {
            return Err(Error::Start("oci runtime error".to_string()));
        }
        match st.containers.iter_mut().find(|c| c.id == *id) {
            Some(c) => {
                c.state = "running".to_string();
                Ok(())
            }
            None => Err(Error::Start(format!("no such container: {}", id))),
        }
    }

    async fn remove_container(&self, id: &ContainerId) -> Result<()> {
        let mut st = self.state.lock();
        let before = st.containers.len();
        st.containers.retain(|c| c.id != *id);
        if st.containers.len() == before {
            Err(Error::NotFound(id.to_string()))
        } else {
            Ok(())
        }
    }
}
