use crate::discover::discover;
use crate::upload::{ArtifactUploader, UploadReport};
use runway_core::Result;
use std::path::Path;
use tracing::{info, warn};

/// Discover files under `root` and upload them as the bundle `name`.
///
/// Finding nothing is logged and returns an empty report.
pub async fn publish(
    root: &Path,
    name: &str,
    uploader: &dyn ArtifactUploader,
) -> Result<UploadReport> {
    let manifest = discover(root)?;
    if manifest.is_empty() {
        warn!(root = %root.display(), "no artifact files found, nothing uploaded");
        return Ok(UploadReport::default());
    }

    let report = uploader.upload(name, &manifest).await?;
    info!(
        artifact = name,
        uploaded = report.uploaded.len(),
        failed = report.failed.len(),
        "published artifacts"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::LocalArtifactUploader;
    use async_trait::async_trait;
    use runway_core::ArtifactManifest;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingUploader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ArtifactUploader for CountingUploader {
        async fn upload(&self, _name: &str, manifest: &ArtifactManifest) -> Result<UploadReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(UploadReport {
                uploaded: manifest.files_to_upload.clone(),
                failed: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_empty_directory_uploads_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let uploader = CountingUploader::default();

        let report = publish(temp_dir.path(), "bundle", &uploader).await.unwrap();

        assert!(report.uploaded.is_empty());
        assert_eq!(uploader.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_publishes_all_files_as_one_bundle() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("one.png"), b"1").unwrap();
        fs::write(source.path().join("two.png"), b"2").unwrap();

        let uploader = LocalArtifactUploader::new(dest.path());
        let report = publish(source.path(), "cypress-artifacts", &uploader)
            .await
            .unwrap();

        assert_eq!(report.uploaded.len(), 2);
        assert!(dest.path().join("cypress-artifacts/one.png").exists());
        assert!(dest.path().join("cypress-artifacts/two.png").exists());
    }
}
