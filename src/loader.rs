/// Wildcard lookup trait and implementations
///
/// A lookup answers "which sources match this wildcard name", each source
/// carrying a set of phrases. Implementations are provided for in-memory
/// tables, folders of text files, and chains of other lookups.
use globset::{GlobBuilder, GlobMatcher};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use walkdir::WalkDir;

/// File extension of wildcard files in a [`FolderWildcards`] tree
pub const WILDCARD_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid wildcard pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// One named set of phrases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardSource {
    name: String,
    phrases: BTreeSet<String>,
}

impl WildcardSource {
    pub fn new<I, S>(name: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        WildcardSource {
            name: name.into(),
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phrases(&self) -> &BTreeSet<String> {
        &self.phrases
    }
}

/// Trait for looking up wildcard sources
///
/// How a name matches (exact, glob, hierarchical path) is up to the
/// implementation. Lookups are synchronous; implementations backed by
/// files do their reading inside `matching`.
pub trait WildcardLookup: Send + Sync {
    /// All sources whose name matches `name`. No match is an empty vector,
    /// not an error.
    fn matching(&self, name: &str) -> Result<Vec<WildcardSource>, LoadError>;
}

/// Build a matcher for a wildcard name. Plain names are valid globs that
/// only match themselves; `*` stops at `/`, `**` does not.
fn name_matcher(pattern: &str) -> Result<GlobMatcher, LoadError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| LoadError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        })
}

/// Parse the contents of a wildcard file: one phrase per line, blank lines
/// and `#` comments skipped
pub fn parse_phrases(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// In-memory wildcard table
///
/// Useful for tests and for embedding wildcards in an application. Clones
/// share the same table.
#[derive(Clone, Default)]
pub struct InMemoryWildcards {
    wildcards: Arc<RwLock<BTreeMap<String, Vec<String>>>>,
}

impl InMemoryWildcards {
    /// Create a new empty table
    ///
    /// # Example
    /// ```
    /// use dynprompt::loader::InMemoryWildcards;
    ///
    /// let wildcards = InMemoryWildcards::new();
    /// wildcards.add("color", ["red", "blue"]);
    /// assert!(wildcards.contains("color"));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Add phrases to a wildcard, creating it if needed
    pub fn add<I, S>(&self, name: impl Into<String>, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut wildcards = self.wildcards.write().unwrap_or_else(PoisonError::into_inner);
        wildcards
            .entry(name.into())
            .or_default()
            .extend(phrases.into_iter().map(Into::into));
    }

    /// Remove a wildcard, returning whether it existed
    pub fn remove(&self, name: &str) -> bool {
        let mut wildcards = self.wildcards.write().unwrap_or_else(PoisonError::into_inner);
        wildcards.remove(name).is_some()
    }

    pub fn clear(&self) {
        let mut wildcards = self.wildcards.write().unwrap_or_else(PoisonError::into_inner);
        wildcards.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        let wildcards = self.wildcards.read().unwrap_or_else(PoisonError::into_inner);
        wildcards.contains_key(name)
    }

    /// Names of all wildcards in the table, sorted
    pub fn list_available(&self) -> Vec<String> {
        let wildcards = self.wildcards.read().unwrap_or_else(PoisonError::into_inner);
        wildcards.keys().cloned().collect()
    }
}

impl WildcardLookup for InMemoryWildcards {
    fn matching(&self, name: &str) -> Result<Vec<WildcardSource>, LoadError> {
        let matcher = name_matcher(name)?;
        let wildcards = self.wildcards.read().unwrap_or_else(PoisonError::into_inner);
        Ok(wildcards
            .iter()
            .filter(|(key, _)| matcher.is_match(key.as_str()))
            .map(|(key, phrases)| WildcardSource::new(key.as_str(), phrases.iter().map(String::as_str)))
            .collect())
    }
}

/// Folder-backed wildcards
///
/// Every `*.txt` file below the base directory is a wildcard named by its
/// path relative to the base, without extension and with `/` separators:
/// `base/animals/cats.txt` is `animals/cats`.
#[derive(Debug, Clone)]
pub struct FolderWildcards {
    base_path: PathBuf,
}

impl FolderWildcards {
    /// Create a lookup over the given directory
    ///
    /// # Example
    /// ```no_run
    /// use dynprompt::loader::FolderWildcards;
    /// use std::path::PathBuf;
    ///
    /// let wildcards = FolderWildcards::new(PathBuf::from("./wildcards"));
    /// ```
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        FolderWildcards {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Names of all wildcard files in the tree, sorted
    pub fn list_available(&self) -> Result<Vec<String>, LoadError> {
        Ok(self.wildcard_files()?.into_iter().map(|(name, _)| name).collect())
    }

    fn wildcard_files(&self) -> Result<Vec<(String, PathBuf)>, LoadError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.base_path).sort_by_file_name() {
            let entry = entry.map_err(|e| LoadError::IoError(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(WILDCARD_EXTENSION)
            {
                continue;
            }

            let relative = path
                .strip_prefix(&self.base_path)
                .map_err(|_| LoadError::InvalidPath(path.display().to_string()))?
                .with_extension("");
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            files.push((name, path.to_path_buf()));
        }

        Ok(files)
    }
}

impl WildcardLookup for FolderWildcards {
    fn matching(&self, name: &str) -> Result<Vec<WildcardSource>, LoadError> {
        // Names must stay inside the base directory
        if name.split(['/', '\\']).any(|part| part == "..") {
            return Err(LoadError::InvalidPath(name.to_string()));
        }

        let matcher = name_matcher(name)?;
        let mut sources = Vec::new();

        for (wildcard, path) in self.wildcard_files()? {
            if !matcher.is_match(&wildcard) {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| LoadError::IoError(format!("{}: {}", path.display(), e)))?;
            sources.push(WildcardSource::new(wildcard, parse_phrases(&content)));
        }

        Ok(sources)
    }
}

/// Lookup that unions the matches of several lookups
///
/// Lookups are queried in the order they were added. The first error
/// aborts the query.
#[derive(Clone, Default)]
pub struct ChainWildcards {
    lookups: Vec<Arc<dyn WildcardLookup>>,
}

impl ChainWildcards {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lookup to the chain
    ///
    /// # Example
    /// ```
    /// use dynprompt::loader::{ChainWildcards, InMemoryWildcards};
    /// use std::sync::Arc;
    ///
    /// let chain = ChainWildcards::new().with_lookup(Arc::new(InMemoryWildcards::new()));
    /// assert_eq!(chain.len(), 1);
    /// ```
    pub fn with_lookup(mut self, lookup: Arc<dyn WildcardLookup>) -> Self {
        self.lookups.push(lookup);
        self
    }

    pub fn from_lookups(lookups: Vec<Arc<dyn WildcardLookup>>) -> Self {
        ChainWildcards { lookups }
    }

    pub fn len(&self) -> usize {
        self.lookups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }
}

impl WildcardLookup for ChainWildcards {
    fn matching(&self, name: &str) -> Result<Vec<WildcardSource>, LoadError> {
        let mut sources = Vec::new();
        for lookup in &self.lookups {
            sources.extend(lookup.matching(name)?);
        }
        Ok(sources)
    }
}
