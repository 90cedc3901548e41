// ABOUTME: Engine handle and the raw operations it offers.
// ABOUTME: EngineOps is the seam; the bollard module is the live implementation.

mod api;
mod bollard;

pub use self::api::{ContainerRecord, CreateConfig, EngineOps, ImageRecord, PortMapping};
pub use self::bollard::Engine;
