// crates/testcorpus-core/src/runtime/reader.rs
// ============================================================================
// Module: Record Store Reader
// Description: Discovers and parses corpus containers under a root.
// Purpose: Load containers with an explicit skip-or-abort policy.
// Dependencies: crate::runtime::fs, crate::core
// ============================================================================

//! ## Overview
//! The reader walks the corpus root, keeps files with the recognized
//! extension that do not end in an excluded suffix, and parses each into a
//! [`Container`]. Aggregation callers load with [`LoadPolicy::SkipInvalid`]
//! and treat failures as zero-record containers; write-oriented callers load
//! with [`LoadPolicy::FailFast`] so a single malformed file aborts the run
//! before anything is staged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use crate::CorpusError;
use crate::core::Container;
use crate::interfaces::CorpusEvent;
use crate::interfaces::EVENT_CONTAINER_SKIPPED;
use crate::interfaces::EventLevel;
use crate::interfaces::EventSink;
use crate::runtime::fs::CorpusRoot;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default container file extension.
pub const DEFAULT_EXTENSION: &str = "json";

/// Default file name excluded from discovery.
pub const DEFAULT_EXCLUDE_SUFFIX: &str = "schema.json";

/// Default per-container read limit (8 MiB).
pub const DEFAULT_MAX_CONTAINER_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Discovery and read options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Recognized file extension, without the dot.
    pub extension: String,
    /// Excluded file names. An entry matches a file named exactly like it or
    /// ending in `.` followed by it (`schema.json` matches `api.schema.json`
    /// but not `api-schema.json`).
    pub exclude_suffixes: Vec<String>,
    /// Maximum bytes read per container.
    pub max_container_bytes: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            extension: String::from(DEFAULT_EXTENSION),
            exclude_suffixes: vec![String::from(DEFAULT_EXCLUDE_SUFFIX)],
            max_container_bytes: DEFAULT_MAX_CONTAINER_BYTES,
        }
    }
}

impl ReaderOptions {
    /// Returns true when the file name is a container candidate.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            return false;
        };
        let dotted = format!(".{}", self.extension);
        name.len() > dotted.len()
            && name.ends_with(&dotted)
            && !self.exclude_suffixes.iter().any(|suffix| is_excluded(name, suffix))
    }
}

/// Returns true when `name` is `suffix` or ends in `.` followed by `suffix`.
fn is_excluded(name: &str, suffix: &str) -> bool {
    let suffix = suffix.trim_start_matches('.');
    name == suffix
        || name
            .strip_suffix(suffix)
            .is_some_and(|stem| stem.ends_with('.'))
}

// ============================================================================
// SECTION: Load Results
// ============================================================================

/// Failure policy for multi-container loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log recoverable failures, record them, and continue.
    SkipInvalid,
    /// Return the first failure.
    FailFast,
}

/// A container that failed to load under [`LoadPolicy::SkipInvalid`].
#[derive(Debug)]
pub struct SkippedContainer {
    /// Location relative to the root.
    pub location: PathBuf,
    /// Load failure.
    pub error: CorpusError,
}

/// Result of loading many containers.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    /// Loaded containers in lexicographic location order.
    pub containers: Vec<Container>,
    /// Containers skipped under the skip policy.
    pub skipped: Vec<SkippedContainer>,
}

// ============================================================================
// SECTION: Reader
// ============================================================================

/// Reads containers from a corpus root.
#[derive(Debug)]
pub struct RecordStoreReader {
    /// Capability handle to the corpus root.
    root: CorpusRoot,
    /// Discovery and read options.
    options: ReaderOptions,
}

impl RecordStoreReader {
    /// Opens a reader over an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::UnsafePath`] when the root cannot be opened.
    pub fn open(root: &Path, options: ReaderOptions) -> Result<Self, CorpusError> {
        Ok(Self::new(CorpusRoot::open(root)?, options))
    }

    /// Creates a reader over an already opened root.
    #[must_use]
    pub const fn new(root: CorpusRoot, options: ReaderOptions) -> Self {
        Self {
            root,
            options,
        }
    }

    /// Returns the corpus root handle.
    #[must_use]
    pub const fn root(&self) -> &CorpusRoot {
        &self.root
    }

    /// Returns the reader options.
    #[must_use]
    pub const fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Lists container candidates under `subdir` in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when a directory cannot be listed.
    pub fn discover(&self, subdir: &Path, sink: &dyn EventSink) -> Result<Vec<PathBuf>, CorpusError> {
        let files = self.root.discover(subdir, sink)?;
        Ok(files.into_iter().filter(|path| self.options.accepts(path)).collect())
    }

    /// Reads and parses one container.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError::Parse`], [`CorpusError::Io`], or
    /// [`CorpusError::TooLarge`] naming the container.
    pub fn load(&self, relative: &Path) -> Result<Container, CorpusError> {
        let bytes = self.root.read_bounded(relative, self.options.max_container_bytes)?;
        Container::from_json_bytes(relative, &bytes)
    }

    /// Loads every container under the root.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when discovery fails, or the first load
    /// failure under [`LoadPolicy::FailFast`].
    pub fn load_all(
        &self,
        policy: LoadPolicy,
        sink: &dyn EventSink,
    ) -> Result<LoadedCorpus, CorpusError> {
        self.load_dir(Path::new(""), policy, sink)
    }

    /// Loads every container under `subdir`.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when discovery fails, or the first load
    /// failure under [`LoadPolicy::FailFast`].
    pub fn load_dir(
        &self,
        subdir: &Path,
        policy: LoadPolicy,
        sink: &dyn EventSink,
    ) -> Result<LoadedCorpus, CorpusError> {
        let mut loaded = LoadedCorpus::default();
        for location in self.discover(subdir, sink)? {
            match self.load(&location) {
                Ok(container) => loaded.containers.push(container),
                Err(error) if policy == LoadPolicy::SkipInvalid && error.is_recoverable() => {
                    sink.record(
                        &CorpusEvent::new(EVENT_CONTAINER_SKIPPED, EventLevel::Warn)
                            .with_container(location.display().to_string())
                            .with_detail(error.to_string()),
                    );
                    loaded.skipped.push(SkippedContainer {
                        location,
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }
        Ok(loaded)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
