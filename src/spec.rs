// ABOUTME: ContainerSpec - the fluent, owned-value declaration of a desired container.
// ABOUTME: Setters mutate and return the builder; run() realizes it exactly once.

use crate::error::Result;
use crate::lifecycle::Lifecycle;
use crate::types::ContainerId;
use std::collections::HashMap;

/// An in-memory declaration of a desired container.
///
/// Built incrementally through chained setters, none of which perform I/O or
/// validation; everything is checked when the spec is realized. The builder
/// carries no engine-side identity until [`ContainerSpec::run`] consumes it.
///
/// ```no_run
/// # async fn demo(engine: dockhand::Engine) -> dockhand::Result<()> {
/// use dockhand::ContainerSpec;
///
/// let id = ContainerSpec::new("busybox:latest")
///     .name("busybox")
///     .port("8080", "80")
///     .var("MODE", "test")
///     .entry_point(["tail", "-f", "/dev/null"])
///     .label("group", "core")
///     .run(&engine)
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    pub(crate) image: String,
    pub(crate) name: String,
    pub(crate) ports: HashMap<String, String>,
    pub(crate) vars: HashMap<String, String>,
    pub(crate) entry_point: Vec<String>,
    pub(crate) labels: HashMap<String, String>,
    pub(crate) auto_remove: bool,
}

impl ContainerSpec {
    /// Begin declaring a container from the given image reference.
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: String::new(),
            ports: HashMap::new(),
            vars: HashMap::new(),
            entry_point: Vec::new(),
            labels: HashMap::new(),
            auto_remove: true,
        }
    }

    /// Set the container name. Empty means the engine assigns a generated one.
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = value.into();
        self
    }

    /// Add a host-to-container port mapping. A repeated host port overwrites
    /// the earlier mapping.
    pub fn port(mut self, host: impl Into<String>, container: impl Into<String>) -> Self {
        self.ports.insert(host.into(), container.into());
        self
    }

    /// Merge multiple port mappings; the last value for a host port wins.
    pub fn ports<I, K, V>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (host, container) in mappings {
            self.ports.insert(host.into(), container.into());
        }
        self
    }

    /// Add an environment variable.
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Merge multiple environment variables; the last value for a key wins.
    pub fn vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            self.vars.insert(key.into(), value.into());
        }
        self
    }

    /// Append entrypoint arguments.
    ///
    /// Unlike the map setters this ACCUMULATES: repeated calls extend the
    /// argument list in call order rather than replacing it. An empty final
    /// list keeps the image's default entrypoint.
    pub fn entry_point<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_point.extend(args.into_iter().map(Into::into));
        self
    }

    /// Attach a label.
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Merge multiple labels; the last value for a key wins.
    pub fn labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in labels {
            self.labels.insert(key.into(), value.into());
        }
        self
    }

    /// Whether the engine removes the container automatically once it stops.
    /// Defaults to true.
    pub fn auto_remove(mut self, value: bool) -> Self {
        self.auto_remove = value;
        self
    }

    /// Realize the spec: resolve the image, check for name conflicts, create
    /// the container and start it, returning the engine-assigned identifier.
    ///
    /// This is the only call that performs I/O, and consuming `self` makes it
    /// callable exactly once per spec - there are no update semantics for a
    /// container that already exists.
    pub async fn run<E>(self, engine: &E) -> Result<ContainerId>
    where
        E: Lifecycle + ?Sized,
    {
        engine.run(self).await
    }

    // Read accessors, used by the lifecycle logic and by callers that want
    // to inspect a declaration before realizing it.

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn container_name(&self) -> &str {
        &self.name
    }

    pub fn port_mappings(&self) -> &HashMap<String, String> {
        &self.ports
    }

    pub fn env_vars(&self) -> &HashMap<String, String> {
        &self.vars
    }

    pub fn entry_point_args(&self) -> &[String] {
        &self.entry_point
    }

    pub fn label_set(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub fn auto_remove_enabled(&self) -> bool {
        self.auto_remove
    }
}
