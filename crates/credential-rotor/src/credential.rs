//! Credential set identity and derived cache location

use std::path::{Path, PathBuf};

/// One configured authorization source.
///
/// `source` points at a client-secret file. `cache_dir` is where tokens
/// obtained with it are persisted: `<profile-dir>/<file name>`. Identity
/// within a run is the position in the rotor's list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    source: PathBuf,
    name: String,
    cache_dir: PathBuf,
}

impl CredentialSet {
    pub fn new(source: impl Into<PathBuf>, profile_dir: &Path) -> Self {
        let source = source.into();
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let cache_dir = profile_dir.join(&name);
        Self {
            source,
            name,
            cache_dir,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name of the source, used in logs and as the cache key.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }
}
