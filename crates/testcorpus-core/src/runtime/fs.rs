// crates/testcorpus-core/src/runtime/fs.rs
// ============================================================================
// Module: Corpus Filesystem Access
// Description: Capability-scoped reads, staged writes, and removals.
// Purpose: Keep every corpus access inside the root without following links.
// Dependencies: cap-std, cap-primitives
// ============================================================================

//! ## Overview
//! [`CorpusRoot`] wraps a capability handle to the corpus directory. All
//! paths are relative to it, every component is opened without following
//! symlinks, and writes go to a temporary sibling that is synced before it
//! is renamed into place. Staging and applying are separate steps so callers
//! can build a two-phase commit on top.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsString;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;

use crate::CorpusError;
use crate::interfaces::CorpusEvent;
use crate::interfaces::EVENT_SYMLINK_SKIPPED;
use crate::interfaces::EventLevel;
use crate::interfaces::EventSink;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum attempts to allocate a unique temporary file name.
const MAX_TEMP_ATTEMPTS: u32 = 64;

// ============================================================================
// SECTION: Corpus Root
// ============================================================================

/// Capability handle to a corpus directory.
#[derive(Debug)]
pub struct CorpusRoot {
    /// Open directory handle.
    dir: Dir,
    /// Path the root was opened from (for messages).
    path: PathBuf,
}

impl CorpusRoot {
    /// Opens an existing directory as a corpus root.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::UnsafePath`] when the path is missing, not a
    /// directory, contains `..`, or traverses a symlink.
    pub fn open(path: &Path) -> Result<Self, CorpusError> {
        if path.as_os_str().is_empty() {
            return Err(CorpusError::UnsafePath(path.to_path_buf()));
        }
        let normalized = normalize_dir(path)?;
        let (anchor, components) = split_anchor_and_components(&normalized)?;
        let mut current = Dir::open_ambient_dir(&anchor, ambient_authority())
            .map_err(|err| io_error(&anchor, &err))?;
        for component in components {
            let (next, _) = open_or_create_child_dir_nofollow(
                &current,
                Path::new(component.as_os_str()),
                false,
            )
            .map_err(|err| map_open_error(&err, path))?;
            current = next;
        }
        Ok(Self {
            dir: current,
            path: path.to_path_buf(),
        })
    }

    /// Lists regular files under `subdir`, relative to the root, sorted.
    ///
    /// A missing `subdir` yields an empty list. Symlinked entries are skipped
    /// and reported to the sink.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when a directory cannot be listed.
    pub fn discover(&self, subdir: &Path, sink: &dyn EventSink) -> Result<Vec<PathBuf>, CorpusError> {
        let (start, prefix) = if subdir.as_os_str().is_empty() {
            (self.dir.try_clone().map_err(|err| io_error(&self.path, &err))?, PathBuf::new())
        } else {
            let relative = validate_relative_path(subdir)?;
            match self.open_dir(&relative, false) {
                Ok((dir, _)) => (dir, relative),
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(err) => return Err(map_open_error(&err, &relative)),
            }
        };
        let mut files = Vec::new();
        collect_files_recursive(&start, &prefix, &mut files, sink)?;
        files.sort();
        Ok(files)
    }

    /// Reads a file, failing when it exceeds `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::TooLarge`] when the file exceeds the limit,
    /// [`CorpusError::UnsafePath`] for unsafe or non-file paths, and
    /// [`CorpusError::Io`] for read failures.
    pub fn read_bounded(&self, relative: &Path, limit: usize) -> Result<Vec<u8>, CorpusError> {
        let relative = validate_relative_path(relative)?;
        let (parent, file_name, _) = self.open_parent_dir(&relative, false)?;
        let mut options = OpenOptions::new();
        options.read(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        let file = parent
            .open_with(Path::new(file_name.as_os_str()), &options)
            .map_err(|err| map_open_error(&err, &relative))?;
        let metadata = file.metadata().map_err(|err| io_error(&relative, &err))?;
        if !metadata.is_file() {
            return Err(CorpusError::UnsafePath(relative));
        }
        let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
        if metadata.len() > limit_u64 {
            return Err(CorpusError::TooLarge {
                container: relative.display().to_string(),
                size: metadata.len(),
                limit,
            });
        }
        let mut bytes = Vec::new();
        file.take(limit_u64.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| io_error(&relative, &err))?;
        if bytes.len() > limit {
            return Err(CorpusError::TooLarge {
                container: relative.display().to_string(),
                size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
                limit,
            });
        }
        Ok(bytes)
    }

    /// Writes bytes to a temporary sibling of `relative` and syncs them.
    ///
    /// Missing parent directories are created and recorded on the returned
    /// [`StagedFile`] so they can be rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the path is unsafe or the write fails.
    pub fn stage_write(&self, relative: &Path, bytes: &[u8]) -> Result<StagedFile, CorpusError> {
        let relative = validate_relative_path(relative)?;
        let (parent, file_name, created_dirs) = self.open_parent_dir(&relative, true)?;
        for attempt in 0 .. MAX_TEMP_ATTEMPTS {
            let temp_name = temp_file_name(Path::new(file_name.as_os_str()), attempt)?;
            let mut options = OpenOptions::new();
            options.write(true).create_new(true);
            options._cap_fs_ext_follow(FollowSymlinks::No);
            match parent.open_with(&temp_name, &options) {
                Ok(mut temp_file) => {
                    let written = temp_file.write_all(bytes).and_then(|()| temp_file.sync_all());
                    if let Err(err) = written {
                        let _ = parent.remove_file(&temp_name);
                        return Err(io_error(&relative, &err));
                    }
                    return Ok(StagedFile {
                        parent,
                        temp_name,
                        file_name: PathBuf::from(file_name),
                        relative,
                        created_dirs,
                    });
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => return Err(map_open_error(&err, &relative)),
            }
        }
        Err(CorpusError::Io {
            container: relative.display().to_string(),
            message: String::from("unable to allocate temporary output file"),
        })
    }

    /// Atomically replaces `relative` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when staging or the final rename fails.
    pub fn write_atomic(&self, relative: &Path, bytes: &[u8]) -> Result<(), CorpusError> {
        let staged = self.stage_write(relative, bytes)?;
        if let Err(err) = staged.apply() {
            staged.discard();
            return Err(err);
        }
        Ok(())
    }

    /// Returns true when `relative` names an existing regular file.
    #[must_use]
    pub fn is_file(&self, relative: &Path) -> bool {
        self.dir.symlink_metadata(relative).is_ok_and(|metadata| metadata.is_file())
    }

    /// Removes a regular file.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the path is unsafe or removal fails.
    pub fn remove_file(&self, relative: &Path) -> Result<(), CorpusError> {
        let relative = validate_relative_path(relative)?;
        let (parent, file_name, _) = self.open_parent_dir(&relative, false)?;
        parent.remove_file(Path::new(file_name.as_os_str())).map_err(|err| io_error(&relative, &err))
    }

    /// Removes a directory when it has no entries.
    ///
    /// Returns `Ok(false)` when the directory still holds entries and was
    /// kept, and `Ok(true)` when it was removed or is already gone.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the path is unsafe or removal fails.
    pub fn remove_dir_if_empty(&self, relative: &Path) -> Result<bool, CorpusError> {
        let relative = validate_relative_path(relative)?;
        let dir = match self.open_dir(&relative, false) {
            Ok((dir, _)) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(true),
            Err(err) => return Err(map_open_error(&err, &relative)),
        };
        let mut entries = dir.entries().map_err(|err| io_error(&relative, &err))?;
        if entries.next().is_some() {
            return Ok(false);
        }
        let (parent, name, _) = self.open_parent_dir(&relative, false)?;
        parent.remove_dir(Path::new(name.as_os_str())).map_err(|err| io_error(&relative, &err))?;
        Ok(true)
    }

    /// Opens a directory below the root without following symlinks.
    fn open_dir(&self, relative: &Path, create_missing: bool) -> std::io::Result<(Dir, Vec<PathBuf>)> {
        let mut current = self.dir.try_clone()?;
        let mut walked = PathBuf::new();
        let mut created = Vec::new();
        for component in relative.components() {
            let Component::Normal(name) = component else {
                return Err(std::io::Error::new(ErrorKind::InvalidInput, "invalid path component"));
            };
            walked.push(name);
            let (next, was_created) =
                open_or_create_child_dir_nofollow(&current, Path::new(name), create_missing)?;
            if was_created {
                created.push(walked.clone());
            }
            current = next;
        }
        Ok((current, created))
    }

    /// Opens the parent directory of a relative file path.
    fn open_parent_dir(
        &self,
        relative: &Path,
        create_missing: bool,
    ) -> Result<(Dir, OsString, Vec<PathBuf>), CorpusError> {
        let Some(file_name) = relative.file_name() else {
            return Err(CorpusError::UnsafePath(relative.to_path_buf()));
        };
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let (dir, created) =
            self.open_dir(parent, create_missing).map_err(|err| map_open_error(&err, relative))?;
        Ok((dir, file_name.to_os_string(), created))
    }
}

// ============================================================================
// SECTION: Staged Files
// ============================================================================

/// A fully written temporary file waiting to be renamed into place.
#[derive(Debug)]
pub struct StagedFile {
    /// Directory holding the temporary and the target.
    parent: Dir,
    /// Temporary file name inside `parent`.
    temp_name: PathBuf,
    /// Target file name inside `parent`.
    file_name: PathBuf,
    /// Target path relative to the corpus root.
    relative: PathBuf,
    /// Directories created while staging, outermost first.
    created_dirs: Vec<PathBuf>,
}

impl StagedFile {
    /// Returns directories created while staging, outermost first.
    #[must_use]
    pub fn created_dirs(&self) -> &[PathBuf] {
        &self.created_dirs
    }

    /// Renames the temporary over the target.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Io`] when the rename fails.
    pub fn apply(&self) -> Result<(), CorpusError> {
        self.parent
            .rename(&self.temp_name, &self.parent, &self.file_name)
            .map_err(|err| io_error(&self.relative, &err))
    }

    /// Removes the temporary file, ignoring failures.
    pub fn discard(&self) {
        let _ = self.parent.remove_file(&self.temp_name);
    }
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Validates that a path is relative, non-empty, and free of traversal.
///
/// # Errors
///
/// Returns [`CorpusError::UnsafePath`] for empty, absolute, or `..` paths.
pub fn validate_relative_path(path: &Path) -> Result<PathBuf, CorpusError> {
    if path.as_os_str().is_empty() || path.is_absolute() {
        return Err(CorpusError::UnsafePath(path.to_path_buf()));
    }
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => cleaned.push(name),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CorpusError::UnsafePath(path.to_path_buf()));
            }
        }
    }
    if cleaned.as_os_str().is_empty() {
        return Err(CorpusError::UnsafePath(path.to_path_buf()));
    }
    Ok(cleaned)
}

/// Normalizes a directory into an absolute path.
fn normalize_dir(path: &Path) -> Result<PathBuf, CorpusError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir().map(|cwd| cwd.join(path)).map_err(|err| io_error(path, &err))
}

/// Splits an absolute path into an anchor root and normal child components.
fn split_anchor_and_components(path: &Path) -> Result<(PathBuf, Vec<OsString>), CorpusError> {
    let mut anchor = PathBuf::new();
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
            Component::CurDir => {}
            Component::Normal(value) => components.push(value.to_os_string()),
            Component::ParentDir => return Err(CorpusError::UnsafePath(path.to_path_buf())),
        }
    }
    if anchor.as_os_str().is_empty() {
        return Err(CorpusError::UnsafePath(path.to_path_buf()));
    }
    Ok((anchor, components))
}

/// Opens a child directory without following symlinks.
fn open_child_dir_nofollow(parent: &Dir, child: &Path) -> std::io::Result<Dir> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(child, &options)?;
    let metadata = file.metadata()?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "path component is not a directory",
        ));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Opens or creates a child directory; reports whether it was created.
fn open_or_create_child_dir_nofollow(
    parent: &Dir,
    child: &Path,
    create_missing: bool,
) -> std::io::Result<(Dir, bool)> {
    match open_child_dir_nofollow(parent, child) {
        Ok(dir) => Ok((dir, false)),
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            Ok((open_child_dir_nofollow(parent, child)?, true))
        }
        Err(err) => Err(err),
    }
}

/// Maps low-level open errors into corpus path errors.
fn map_open_error(err: &std::io::Error, path: &Path) -> CorpusError {
    if matches!(
        err.kind(),
        ErrorKind::NotFound
            | ErrorKind::InvalidInput
            | ErrorKind::PermissionDenied
            | ErrorKind::NotADirectory
            | ErrorKind::Unsupported
    ) {
        return CorpusError::UnsafePath(path.to_path_buf());
    }
    #[cfg(unix)]
    if err.raw_os_error() == Some(40) {
        return CorpusError::UnsafePath(path.to_path_buf());
    }
    #[cfg(windows)]
    if matches!(err.raw_os_error(), Some(681) | Some(1920)) {
        return CorpusError::UnsafePath(path.to_path_buf());
    }
    io_error(path, err)
}

/// Wraps an I/O error with the path it concerns.
fn io_error(path: &Path, err: &std::io::Error) -> CorpusError {
    CorpusError::Io {
        container: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Builds a deterministic temporary file name for atomic writes.
fn temp_file_name(file_name: &Path, attempt: u32) -> Result<PathBuf, CorpusError> {
    let Some(base_name) = file_name.file_name() else {
        return Err(CorpusError::UnsafePath(file_name.to_path_buf()));
    };
    let mut temp = OsString::from(".tmp-");
    temp.push(base_name);
    temp.push(format!(".{}.{}", std::process::id(), attempt));
    Ok(PathBuf::from(temp))
}

/// Recursively collects regular files relative to the root directory.
fn collect_files_recursive(
    current: &Dir,
    prefix: &Path,
    files: &mut Vec<PathBuf>,
    sink: &dyn EventSink,
) -> Result<(), CorpusError> {
    let entries = current.entries().map_err(|err| io_error(prefix, &err))?;
    for entry in entries {
        let entry = entry.map_err(|err| io_error(prefix, &err))?;
        let file_name = entry.file_name();
        let relative = if prefix.as_os_str().is_empty() {
            PathBuf::from(&file_name)
        } else {
            prefix.join(&file_name)
        };
        let file_type = entry.file_type().map_err(|err| io_error(&relative, &err))?;
        if file_type.is_symlink() {
            sink.record(
                &CorpusEvent::new(EVENT_SYMLINK_SKIPPED, EventLevel::Warn)
                    .with_container(relative.display().to_string()),
            );
            continue;
        }
        if file_type.is_dir() {
            let directory = entry.open_dir().map_err(|err| io_error(&relative, &err))?;
            collect_files_recursive(&directory, &relative, files, sink)?;
        } else if file_type.is_file() {
            files.push(relative);
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
