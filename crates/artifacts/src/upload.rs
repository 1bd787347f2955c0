use async_trait::async_trait;
use runway_core::{ArtifactManifest, Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of one bundle upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Destination for artifact bundles.
///
/// Implementations keep going when a single file fails and record it in
/// the report; an `Err` means the bundle itself could not be created.
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    async fn upload(&self, name: &str, manifest: &ArtifactManifest) -> Result<UploadReport>;
}

/// Copies bundles into `<destination>/<name>/`
#[derive(Debug, Clone)]
pub struct LocalArtifactUploader {
    destination: PathBuf,
}

impl LocalArtifactUploader {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    async fn copy_one(&self, bundle: &Path, root: &Path, file: &Path) -> std::io::Result<()> {
        let relative = file.strip_prefix(root).unwrap_or(file);
        let target = bundle.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &target).await?;
        Ok(())
    }
}

#[async_trait]
impl ArtifactUploader for LocalArtifactUploader {
    async fn upload(&self, name: &str, manifest: &ArtifactManifest) -> Result<UploadReport> {
        let bundle = self.destination.join(name);
        tokio::fs::create_dir_all(&bundle)
            .await
            .map_err(|e| Error::file_system(&bundle, "create artifact bundle", e))?;

        let mut report = UploadReport::default();
        for file in &manifest.files_to_upload {
            match self.copy_one(&bundle, &manifest.root_directory, file).await {
                Ok(()) => {
                    debug!(file = %file.display(), "uploaded artifact");
                    report.uploaded.push(file.clone());
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "failed to upload artifact");
                    report.failed.push((file.clone(), e.to_string()));
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copies_files_under_bundle_name() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::create_dir(source.path().join("spec")).unwrap();
        fs::write(source.path().join("spec/shot.png"), b"png").unwrap();

        let manifest = ArtifactManifest {
            root_directory: source.path().to_path_buf(),
            files_to_upload: vec![source.path().join("spec/shot.png")],
        };
        let report = LocalArtifactUploader::new(dest.path())
            .upload("screens", &manifest)
            .await
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.uploaded.len(), 1);
        assert_eq!(
            fs::read(dest.path().join("screens/spec/shot.png")).unwrap(),
            b"png"
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_recorded_and_rest_continue() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        fs::write(source.path().join("kept.png"), b"ok").unwrap();

        let manifest = ArtifactManifest {
            root_directory: source.path().to_path_buf(),
            files_to_upload: vec![
                source.path().join("vanished.png"),
                source.path().join("kept.png"),
            ],
        };
        let report = LocalArtifactUploader::new(dest.path())
            .upload("bundle", &manifest)
            .await
            .unwrap();

        assert_eq!(report.uploaded, vec![source.path().join("kept.png")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, source.path().join("vanished.png"));
        assert!(dest.path().join("bundle/kept.png").exists());
    }
}
