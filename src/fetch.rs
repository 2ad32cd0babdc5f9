//! Input resolution: local mzTab paths pass through, HTTP(S) URLs are
//! downloaded once with no retry. Google Drive share links are rewritten to
//! their direct-download form first.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

/// Errors that can occur resolving a pipeline input
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Local filesystem error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The input path does not exist
    #[error("Input file does not exist: {0}")]
    NotFound(String),

    /// A URL could not be interpreted
    #[error("Unsupported or malformed URL: {0}")]
    InvalidUrl(String),

    /// The remote fetch failed; transport errors are fatal, no retry
    #[error("Download failed: {0}")]
    Transport(String),
}

const GOOGLE_DOWNLOAD_PREFIX: &str = "https://drive.google.com/uc?export=download&id=";

/// A usable local copy of a pipeline input.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    /// Local path of the mzTab document
    pub path: PathBuf,

    /// Base name used for derived output files
    pub stem: String,
}

/// Resolve `input` (local path or URL) into a local mzTab file, downloading
/// into `download_dir` when needed.
pub fn resolve_input(input: &str, download_dir: &Path) -> Result<ResolvedInput, FetchError> {
    if !input.starts_with("http") {
        let path = PathBuf::from(input);
        if !path.exists() {
            return Err(FetchError::NotFound(input.to_string()));
        }
        return Ok(ResolvedInput {
            stem: stem_of(input),
            path,
        });
    }

    let (url, stem) = if input.contains("google") {
        // Share links look like .../file/d/<id>/view; the id is the fifth
        // slash-separated segment.
        let id = input
            .split('/')
            .nth(5)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FetchError::InvalidUrl(input.to_string()))?;
        info!("Rewriting Google Drive link for direct download (id: {})", id);
        (
            format!("{}{}", GOOGLE_DOWNLOAD_PREFIX, id),
            "Exclusion_sample".to_string(),
        )
    } else {
        (input.to_string(), stem_of(input))
    };

    let dest = download_dir.join(format!("{}.mzTab", stem));
    info!("Downloading {} -> {}", url, dest.display());
    download_file(&url, &dest)?;

    Ok(ResolvedInput { path: dest, stem })
}

/// Last path segment with its extension stripped.
fn stem_of(location: &str) -> String {
    let base = location.rsplit('/').next().unwrap_or(location);
    match base.rfind('.') {
        Some(dot) if dot > 0 => base[..dot].to_string(),
        _ => base.to_string(),
    }
}

/// Single blocking download attempt via curl; any failure is fatal.
fn download_file(url: &str, dest: &Path) -> Result<(), FetchError> {
    let dest_str = dest
        .to_str()
        .ok_or_else(|| FetchError::Transport(format!("non-UTF8 path: {}", dest.display())))?;

    let output = Command::new("curl")
        .args(["-sL", "-o", dest_str, url])
        .output()
        .map_err(|e| FetchError::Transport(format!("failed to run curl: {}", e)))?;

    if !output.status.success() {
        return Err(FetchError::Transport(
            String::from_utf8_lossy(&output.stderr).into_owned(),
        ));
    }

    let metadata = fs::metadata(dest)?;
    if metadata.len() == 0 {
        return Err(FetchError::Transport("downloaded file is empty".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_local_path_passes_through() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Blank.mzTab");
        fs::write(&path, "mzTab-version\t1.0.0\n").unwrap();

        let resolved = resolve_input(path.to_str().unwrap(), dir.path()).unwrap();
        assert_eq!(resolved.path, path);
        assert_eq!(resolved.stem, "Blank");
    }

    #[test]
    fn test_missing_local_path_is_fatal() {
        let dir = tempdir().unwrap();
        let result = resolve_input("no_such_file.mzTab", dir.path());
        assert!(matches!(result, Err(FetchError::NotFound(_))));
    }

    #[test]
    fn test_google_drive_id_extraction() {
        let dir = tempdir().unwrap();
        // A malformed share link without an id segment must be rejected
        // before any network activity.
        let result = resolve_input("https://drive.google.com/file/d", dir.path());
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_stem_of_strips_extension() {
        assert_eq!(stem_of("/data/runs/Blank.mzTab"), "Blank");
        assert_eq!(stem_of("https://example.org/files/QC_Blank01.mzTab"), "QC_Blank01");
        assert_eq!(stem_of("no_extension"), "no_extension");
    }
}
