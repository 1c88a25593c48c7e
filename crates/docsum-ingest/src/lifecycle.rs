//! Working/completed folder lifecycle.
//!
//! A file enters `working/` before any extraction starts and leaves it only
//! when it and all of its artifacts move to `completed/` together. Artifacts
//! go first and the original goes last, so an original still in `working/`
//! always means processing did not finish.

use crate::error::{IngestResult, MoveError};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Name of the in-progress folder under the watch root.
pub const WORKING_DIR: &str = "working";
/// Name of the finished folder under the watch root.
pub const COMPLETED_DIR: &str = "completed";

/// The two lifecycle folders of a watch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folders {
    pub working: PathBuf,
    pub completed: PathBuf,
}

/// Create `working/` and `completed/` under `root` if absent.
pub fn ensure_folders(root: &Path) -> std::io::Result<Folders> {
    let folders = Folders {
        working: root.join(WORKING_DIR),
        completed: root.join(COMPLETED_DIR),
    };
    std::fs::create_dir_all(&folders.working)?;
    std::fs::create_dir_all(&folders.completed)?;
    debug!("Lifecycle folders ready under {:?}", root);
    Ok(folders)
}

/// Rename `path` into `working_folder`, returning the new location.
pub fn move_to_working(path: &Path, working_folder: &Path) -> Result<PathBuf, MoveError> {
    let dest = move_into(path, working_folder)?;
    info!("Moved {:?} to {:?}", path, dest);
    Ok(dest)
}

/// Move every artifact, then `original`, into `completed_folder`.
///
/// Artifacts that no longer exist are skipped with a warning. If any move
/// fails, artifacts already moved are put back where they were so nothing
/// is split between the two folders.
pub fn move_to_completed(
    original: &Path,
    artifacts: &[PathBuf],
    completed_folder: &Path,
) -> Result<PathBuf, MoveError> {
    if !original.exists() {
        return Err(MoveError::SourceMissing(original.to_path_buf()));
    }

    let mut moved: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(artifacts.len());

    for artifact in artifacts {
        if !artifact.exists() {
            warn!("Artifact {:?} does not exist, skipping", artifact);
            continue;
        }
        match move_into(artifact, completed_folder) {
            Ok(dest) => {
                debug!("Moved artifact {:?} to {:?}", artifact, dest);
                moved.push((artifact.clone(), dest));
            }
            Err(e) => {
                roll_back(&moved);
                return Err(e);
            }
        }
    }

    match move_into(original, completed_folder) {
        Ok(dest) => {
            info!("Moved {:?} and {} artifact(s) to {:?}", original, moved.len(), completed_folder);
            Ok(dest)
        }
        Err(e) => {
            roll_back(&moved);
            Err(e)
        }
    }
}

/// Delete intermediate artifacts left behind by a failed file.
pub fn discard_artifacts(artifacts: &[PathBuf]) {
    for artifact in artifacts {
        if !artifact.exists() {
            continue;
        }
        match std::fs::remove_file(artifact) {
            Ok(()) => debug!("Discarded artifact {:?}", artifact),
            Err(e) => warn!("Failed to discard artifact {:?}: {}", artifact, e),
        }
    }
}

fn move_into(path: &Path, folder: &Path) -> Result<PathBuf, MoveError> {
    let name = path
        .file_name()
        .ok_or_else(|| MoveError::SourceMissing(path.to_path_buf()))?;
    if !path.exists() {
        return Err(MoveError::SourceMissing(path.to_path_buf()));
    }

    let dest = folder.join(name);
    if dest.exists() {
        return Err(MoveError::DestinationExists(dest));
    }

    std::fs::rename(path, &dest).map_err(|source| MoveError::Rename {
        from: path.to_path_buf(),
        to: dest.clone(),
        source,
    })?;
    Ok(dest)
}

fn roll_back(moved: &[(PathBuf, PathBuf)]) {
    for (from, to) in moved.iter().rev() {
        match std::fs::rename(to, from) {
            Ok(()) => debug!("Rolled back {:?} to {:?}", to, from),
            Err(e) => error!("Failed to roll back {:?} to {:?}: {}", to, from, e),
        }
    }
}

/// Owns the lifecycle folders of one watch root.
#[derive(Debug, Clone)]
pub struct FolderLifecycle {
    folders: Folders,
}

impl FolderLifecycle {
    /// Ensure the folders exist under `root`.
    pub fn ensure(root: &Path) -> IngestResult<Self> {
        Ok(Self {
            folders: ensure_folders(root)?,
        })
    }

    pub fn folders(&self) -> &Folders {
        &self.folders
    }

    pub fn move_to_working(&self, path: &Path) -> Result<PathBuf, MoveError> {
        move_to_working(path, &self.folders.working)
    }

    pub fn move_to_completed(
        &self,
        original: &Path,
        artifacts: &[PathBuf],
    ) -> Result<PathBuf, MoveError> {
        move_to_completed(original, artifacts, &self.folders.completed)
    }

    pub fn discard_artifacts(&self, artifacts: &[PathBuf]) {
        discard_artifacts(artifacts)
    }

    /// Files left in `working/`, e.g. by a crash or an earlier failure.
    pub fn stranded_files(&self) -> IngestResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.folders.working)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}
