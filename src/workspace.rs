//! Scoped per-run output directory.
//!
//! Each pipeline run owns a clean `results/` tree and a download directory
//! for the final archive. The directories are cleared and recreated up front
//! rather than reconciled against stale state from a previous run, and every
//! parameter and derived fact is appended to an audit log inside the results
//! tree so the archive is self-describing.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Errors that can occur managing the run workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Filesystem error creating, clearing or moving files
    #[error("Workspace I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error writing the result archive
    #[error("Archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),
}

/// Name of the audit log inside the results directory
const AUDIT_LOG: &str = "logfile.txt";

/// Subdirectory for tables that are inputs to later stages rather than
/// deliverables
const INTERMEDIATE_DIR: &str = "intermediate_files";

/// A freshly reset output directory for one pipeline run.
pub struct Workspace {
    results_dir: PathBuf,
    download_dir: PathBuf,
    audit: BufWriter<File>,
}

impl Workspace {
    /// Clear and recreate the `results/` and `download_results/` directories
    /// under `root`, and open a new audit log.
    pub fn reset<P: AsRef<Path>>(root: P) -> Result<Self, WorkspaceError> {
        let root = root.as_ref();
        let results_dir = root.join("results");
        let download_dir = root.join("download_results");

        if results_dir.exists() {
            fs::remove_dir_all(&results_dir)?;
        }
        fs::create_dir_all(&results_dir)?;
        fs::create_dir_all(&download_dir)?;

        let audit = BufWriter::new(File::create(results_dir.join(AUDIT_LOG))?);

        let mut workspace = Self {
            results_dir,
            download_dir,
            audit,
        };
        workspace.audit(&format!("Run started at {}", chrono::Local::now().to_rfc3339()))?;

        Ok(workspace)
    }

    /// Path of a file inside the results directory
    pub fn results_path(&self, name: &str) -> PathBuf {
        self.results_dir.join(name)
    }

    /// Path of a file inside the download directory
    pub fn download_path(&self, name: &str) -> PathBuf {
        self.download_dir.join(name)
    }

    /// The results directory itself
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Append a timestamped line to the audit log
    pub fn audit(&mut self, message: &str) -> Result<(), WorkspaceError> {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(self.audit, "[{}] {}", stamp, message)?;
        Ok(())
    }

    /// Move the named results files into `results/intermediate_files/`.
    /// Files that were never produced are skipped silently.
    pub fn move_to_intermediates(&mut self, names: &[String]) -> Result<(), WorkspaceError> {
        let intermediates = self.results_dir.join(INTERMEDIATE_DIR);
        fs::create_dir_all(&intermediates)?;

        for name in names {
            let source = self.results_dir.join(name);
            if source.exists() {
                fs::rename(&source, intermediates.join(name))?;
            }
        }
        Ok(())
    }

    /// Bundle the whole results tree into a zip in the download directory
    /// and return the archive path. Flushes the audit log first so it is
    /// included in the bundle.
    pub fn archive(&mut self, zip_name: &str) -> Result<PathBuf, WorkspaceError> {
        self.audit
            .flush()?;

        let zip_path = self.download_dir.join(zip_name);
        if zip_path.exists() {
            fs::remove_file(&zip_path)?;
        }

        let mut zip = ZipWriter::new(File::create(&zip_path)?);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        let mut files = Vec::new();
        collect_files(&self.results_dir, &mut files)?;

        let mut buffer = Vec::new();
        for file_path in files {
            let relative = file_path
                .strip_prefix(&self.results_dir)
                .unwrap_or(&file_path);
            zip.start_file(format!("results/{}", relative.display()), options)?;

            buffer.clear();
            File::open(&file_path)?.read_to_end(&mut buffer)?;
            zip.write_all(&buffer)?;
        }
        zip.finish()?;

        info!("Result bundle written to {}", zip_path.display());
        Ok(zip_path)
    }
}

/// Recursively collect regular files under `dir`, sorted for deterministic
/// archive layout.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reset_clears_previous_run() {
        let dir = tempdir().unwrap();

        let workspace = Workspace::reset(dir.path()).unwrap();
        fs::write(workspace.results_path("stale.csv"), "old").unwrap();
        drop(workspace);

        let workspace = Workspace::reset(dir.path()).unwrap();
        assert!(!workspace.results_path("stale.csv").exists());
        assert!(workspace.results_path(AUDIT_LOG).exists());
    }

    #[test]
    fn test_move_to_intermediates() {
        let dir = tempdir().unwrap();
        let mut workspace = Workspace::reset(dir.path()).unwrap();

        fs::write(workspace.results_path("table_narrow.csv"), "a,b\n").unwrap();
        workspace
            .move_to_intermediates(&["table_narrow.csv".to_string(), "missing.csv".to_string()])
            .unwrap();

        assert!(!workspace.results_path("table_narrow.csv").exists());
        assert!(workspace
            .results_dir()
            .join(INTERMEDIATE_DIR)
            .join("table_narrow.csv")
            .exists());
    }

    #[test]
    fn test_archive_contains_results_tree() {
        let dir = tempdir().unwrap();
        let mut workspace = Workspace::reset(dir.path()).unwrap();

        fs::write(workspace.results_path("list.csv"), "Mass [m/z]\n").unwrap();
        workspace.audit("sample fact").unwrap();

        let zip_path = workspace.archive("bundle.zip").unwrap();
        assert!(zip_path.exists());

        let mut archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"results/list.csv".to_string()));
        assert!(names.contains(&format!("results/{}", AUDIT_LOG)));
    }
}
