use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// The URL alias under which stored media is served back to clients. Every
/// reference returned by a MediaStore starts with this prefix.
pub const UPLOAD_ALIAS: &str = "/uploads";

/// MediaStore
///
/// Defines the abstract contract for persisting uploaded binary content. This trait
/// allows us to swap the concrete implementation, the real filesystem store
/// (LocalMediaStore) in production and the in-memory Mock (MockMediaStore) during
/// testing, without affecting the calling handlers.
///
/// The caller always supplies the subdirectory explicitly (e.g. "portfolios",
/// "reviews", "columns"); the store never infers it from the content.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists `content` under `<upload_root>/<subdir>` with a freshly generated
    /// name (random unique token plus the original extension, never the
    /// user-supplied filename) and returns the stable reference
    /// `/uploads/<subdir>/<generated><ext>`.
    async fn store(
        &self,
        content: &[u8],
        original_filename: &str,
        subdir: &str,
    ) -> std::io::Result<String>;

    /// Best-effort removal of a previously returned reference. Failures are
    /// swallowed: asset loss must never fail a request.
    ///
    /// Note: no lifecycle operation currently calls this; replaced or orphaned
    /// files are left on disk pending a product decision on cleanup semantics.
    async fn delete(&self, reference: &str);
}

/// StorageState
///
/// The concrete type used to share the media store across the application state.
pub type StorageState = Arc<dyn MediaStore>;

/// extension_of
///
/// Derives the extension (with leading dot) from an original filename, or an empty
/// string when there is none. Only the extension survives into the stored name.
fn extension_of(original_filename: &str) -> String {
    Path::new(original_filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// sanitize_reference
///
/// Utility to prevent path traversal when resolving a stored reference back to a
/// filesystem path: strips the alias and drops directory navigation components.
fn sanitize_reference(reference: &str) -> PathBuf {
    reference
        .strip_prefix(UPLOAD_ALIAS)
        .unwrap_or(reference)
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect()
}

/// LocalMediaStore
///
/// The concrete implementation backed by a local filesystem tree rooted at the
/// configured upload directory. File writes are not part of any database
/// transaction: a file may be written even if the subsequent commit fails, leaving
/// an orphaned file (harmless, merely wasted space).
#[derive(Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(
        &self,
        content: &[u8],
        original_filename: &str,
        subdir: &str,
    ) -> std::io::Result<String> {
        let filename = format!("{}{}", Uuid::new_v4(), extension_of(original_filename));

        let dir = self.root.join(subdir);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), content).await?;

        Ok(format!("{UPLOAD_ALIAS}/{subdir}/{filename}"))
    }

    async fn delete(&self, reference: &str) {
        let path = self.root.join(sanitize_reference(reference));
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::debug!("media delete skipped for {}: {}", reference, e);
        }
    }
}

/// MockMediaStore
///
/// A mock implementation used for unit and integration testing. Produces
/// references of the real shape without touching the filesystem, isolating the
/// handler test boundary.
#[derive(Clone)]
pub struct MockMediaStore {
    /// When true, all store operations return a simulated failure.
    pub should_fail: bool,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaStore for MockMediaStore {
    async fn store(
        &self,
        _content: &[u8],
        original_filename: &str,
        subdir: &str,
    ) -> std::io::Result<String> {
        if self.should_fail {
            return Err(std::io::Error::other("mock media store failure"));
        }
        Ok(format!(
            "{UPLOAD_ALIAS}/{subdir}/{}{}",
            Uuid::new_v4(),
            extension_of(original_filename)
        ))
    }

    async fn delete(&self, _reference: &str) {}
}
