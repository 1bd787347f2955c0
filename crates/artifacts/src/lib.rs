//! Artifact discovery and upload
//!
//! Files produced by the test run (screenshots, videos, reports) are
//! collected from a root directory and handed to an [`ArtifactUploader`]
//! as one named bundle.

mod discover;
mod publish;
mod upload;

pub use discover::discover;
pub use publish::publish;
pub use upload::{ArtifactUploader, LocalArtifactUploader, UploadReport};
