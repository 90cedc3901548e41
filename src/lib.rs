// ABOUTME: Library root for dockhand - single-container lifecycle control.
// ABOUTME: Build a ContainerSpec, realize it against an Engine, query and tear down.

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod spec;
pub mod types;

pub use engine::{ContainerRecord, CreateConfig, Engine, EngineOps, ImageRecord, PortMapping};
pub use error::{Error, Result};
pub use lifecycle::Lifecycle;
pub use spec::ContainerSpec;
pub use types::{ContainerId, ImageRef};
