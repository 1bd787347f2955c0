use runway_core::{ArtifactManifest, Error, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Every regular file under `root`, in a stable order.
///
/// A root that does not exist yields an empty manifest.
pub fn discover(root: &Path) -> Result<ArtifactManifest> {
    let mut manifest = ArtifactManifest {
        root_directory: root.to_path_buf(),
        files_to_upload: Vec::new(),
    };

    if !root.exists() {
        tracing::debug!(root = %root.display(), "artifact root does not exist");
        return Ok(manifest);
    }

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::file_system(path, "walk artifact directory", source)
        })?;

        if entry.file_type().is_file() {
            manifest.files_to_upload.push(entry.into_path());
        }
    }

    Ok(manifest)
}
