//! File operations requested by filesystem windows.
//!
//! A window describes the work as a [`FileJob`]; the desktop decides whether
//! it runs inline or on the background worker, based on the size of the
//! selected entry.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::actions::ActionResult;
use crate::desktop::Desktop;
use crate::window::WindowId;

/// Self-contained unit of filesystem work. Must own everything it touches.
pub type FileJob = Box<dyn FnOnce() -> ActionResult + Send + 'static>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// `None` when the size could not be read.
    pub size: Option<u64>,
}

impl EntryInfo {
    pub fn is_parent_link(&self) -> bool {
        self.name == ".."
    }

    pub fn kind(&self) -> &'static str {
        if self.is_dir { "directory" } else { "file" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOperation {
    Copy { destination: PathBuf },
    Move { destination: PathBuf },
    Delete,
}

impl FileOperation {
    /// Progress dialog title.
    pub fn title(&self) -> &'static str {
        match self {
            FileOperation::Copy { .. } => "Copying",
            FileOperation::Move { .. } => "Moving",
            FileOperation::Delete => "Deleting",
        }
    }
}

/// Directories always count as long; `..` and unknown sizes never do.
pub fn is_long_operation(entry: Option<&EntryInfo>, threshold: u64) -> bool {
    match entry {
        None => false,
        Some(entry) if entry.is_parent_link() => false,
        Some(entry) if entry.is_dir => true,
        Some(entry) => entry.size.is_some_and(|size| size >= threshold),
    }
}

/// Where `entry` lands when copied or moved to `destination`. An existing
/// directory receives the entry under its own name.
pub fn resolve_destination(entry: &EntryInfo, destination: &Path) -> Result<PathBuf, String> {
    if destination.as_os_str().is_empty() {
        return Err("Destination path cannot be empty.".to_string());
    }
    let target = if destination.is_dir() {
        destination.join(&entry.name)
    } else {
        destination.to_path_buf()
    };
    let source = fs::canonicalize(&entry.path).unwrap_or_else(|_| entry.path.clone());
    let resolved = canonical_target(&target);
    if entry.is_dir && resolved.starts_with(&source) {
        return Err("Cannot copy/move a directory into itself or its children.".to_string());
    }
    if resolved == source {
        return Err("Source and destination are the same.".to_string());
    }
    if target.exists() {
        return Err("Destination already exists.".to_string());
    }
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        return Err("Destination directory does not exist.".to_string());
    }
    Ok(target)
}

/// Canonicalize through the parent, since the target itself does not exist.
fn canonical_target(target: &Path) -> PathBuf {
    match (target.parent(), target.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| target.to_path_buf()),
        _ => target.to_path_buf(),
    }
}

pub fn copy_path(source: &Path, target: &Path) -> io::Result<()> {
    if source.is_dir() {
        fs::create_dir(target)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_path(&entry.path(), &target.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, target).map(|_| ())
    }
}

/// Rename, falling back to copy-and-delete across filesystems.
pub fn move_path(source: &Path, target: &Path) -> io::Result<()> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }
    copy_path(source, target)?;
    delete_path(source)
}

pub fn delete_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Describe an arbitrary path the way a folder listing would.
pub fn entry_for_path(path: &Path) -> io::Result<EntryInfo> {
    let meta = fs::metadata(path)?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(EntryInfo {
        name,
        path: path.to_path_buf(),
        is_dir: meta.is_dir(),
        size: (!meta.is_dir()).then_some(meta.len()),
    })
}

/// Build the job for `operation` on `entry`, already resolved to a target.
pub fn job_for(entry: &EntryInfo, operation: &FileOperation) -> Result<FileJob, String> {
    let source = entry.path.clone();
    let name = entry.name.clone();
    let job: FileJob = match operation {
        FileOperation::Copy { destination } => {
            let target = resolve_destination(entry, destination)?;
            Box::new(move || finish(copy_path(&source, &target), "copy", &name))
        }
        FileOperation::Move { destination } => {
            let target = resolve_destination(entry, destination)?;
            Box::new(move || finish(move_path(&source, &target), "move", &name))
        }
        FileOperation::Delete => Box::new(move || finish(delete_path(&source), "delete", &name)),
    };
    Ok(job)
}

fn finish(outcome: io::Result<()>, verb: &str, name: &str) -> ActionResult {
    match outcome {
        Ok(()) => {
            tracing::info!(operation = verb, entry = name, "file operation finished");
            ActionResult::Refresh
        }
        Err(err) => {
            tracing::warn!(operation = verb, entry = name, error = %err, "file operation failed");
            ActionResult::Error(format!("Failed to {verb} {name}: {err}"))
        }
    }
}

impl Desktop {
    /// Run `operation` for the selection of `window`: inline for small
    /// files, on the background worker behind a progress dialog otherwise.
    /// Returns the result to dispatch, or `None` once a worker started.
    pub fn run_file_operation(
        &mut self,
        window: WindowId,
        operation: FileOperation,
    ) -> Option<ActionResult> {
        let Some(win) = self.windows.get_mut(window) else {
            return Some(ActionResult::error("The source window is no longer open."));
        };
        let Some(ops) = win.app_mut().file_operations() else {
            return Some(ActionResult::error(
                "This window does not support file operations.",
            ));
        };
        let entry = ops.selected_entry();
        let job = match ops.prepare(&operation) {
            Ok(job) => job,
            Err(message) => return Some(ActionResult::Error(message)),
        };
        self.schedule_file_job(window, entry.as_ref(), &operation, job)
    }

    /// Copy a dropped `path` into `destination` for `window`, split between
    /// inline and background work the same way as [`Self::run_file_operation`].
    pub fn copy_dropped_path(
        &mut self,
        window: WindowId,
        path: &Path,
        destination: PathBuf,
    ) -> Option<ActionResult> {
        let entry = match entry_for_path(path) {
            Ok(entry) => entry,
            Err(err) => {
                return Some(ActionResult::error(format!(
                    "Cannot drop {}:\n{err}",
                    path.display()
                )));
            }
        };
        let operation = FileOperation::Copy { destination };
        let job = match job_for(&entry, &operation) {
            Ok(job) => job,
            Err(message) => return Some(ActionResult::Error(message)),
        };
        self.schedule_file_job(window, Some(&entry), &operation, job)
    }

    fn schedule_file_job(
        &mut self,
        window: WindowId,
        entry: Option<&EntryInfo>,
        operation: &FileOperation,
        job: FileJob,
    ) -> Option<ActionResult> {
        if !is_long_operation(entry, self.config.long_operation_bytes) {
            return Some(job());
        }
        let name = entry.map_or("item", |e| e.name.as_str());
        let message = format!("{}:\n{}\n\nPlease wait...", operation.title(), name);
        self.start_background_operation(operation.title(), &message, job, Some(window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool, size: Option<u64>) -> EntryInfo {
        EntryInfo {
            name: name.to_string(),
            path: PathBuf::from(name),
            is_dir,
            size,
        }
    }

    #[test]
    fn long_operation_rules() {
        let t = 8 * 1024 * 1024;
        assert!(!is_long_operation(None, t));
        assert!(!is_long_operation(Some(&entry("..", true, None)), t));
        assert!(is_long_operation(Some(&entry("dir", true, None)), t));
        assert!(is_long_operation(Some(&entry("big", false, Some(t))), t));
        assert!(!is_long_operation(Some(&entry("small", false, Some(t - 1))), t));
        assert!(!is_long_operation(Some(&entry("unknown", false, None)), t));
    }

    #[test]
    fn destination_directory_receives_entry_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"x").unwrap();
        let dest = dir.path().join("out");
        fs::create_dir(&dest).unwrap();
        let e = EntryInfo {
            name: "a.txt".into(),
            path: src,
            is_dir: false,
            size: Some(1),
        };
        assert_eq!(resolve_destination(&e, &dest).unwrap(), dest.join("a.txt"));
        assert!(resolve_destination(&e, Path::new("")).is_err());
    }

    #[test]
    fn directory_cannot_move_into_itself() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("d");
        fs::create_dir(&src).unwrap();
        let e = EntryInfo {
            name: "d".into(),
            path: src.clone(),
            is_dir: true,
            size: None,
        };
        let err = resolve_destination(&e, &src).unwrap_err();
        assert!(err.contains("into itself"));
    }

    #[test]
    fn copy_job_copies_trees() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("tree");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("inner/file"), b"data").unwrap();
        let e = EntryInfo {
            name: "tree".into(),
            path: src,
            is_dir: true,
            size: None,
        };
        let dest = dir.path().join("copy");
        let job = job_for(
            &e,
            &FileOperation::Copy {
                destination: dest.clone(),
            },
        )
        .unwrap();
        assert_eq!(job(), ActionResult::Refresh);
        assert_eq!(fs::read(dest.join("inner/file")).unwrap(), b"data");
    }

    #[test]
    fn failed_job_reports_error() {
        let e = entry("missing-file-for-test", false, Some(1));
        let job = job_for(&e, &FileOperation::Delete).unwrap();
        assert!(matches!(job(), ActionResult::Error(_)));
    }
}
