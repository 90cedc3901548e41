// ABOUTME: Validated value types used across the crate.
// ABOUTME: Phantom-typed identifiers and image reference parsing.

mod id;
mod image_ref;

pub use id::{ContainerId, ContainerMarker, Id};
pub use image_ref::{ImageRef, ParseImageRefError};
