use crate::error::Result;
use std::path::Path;

/// The version-control operations the changelog pipeline needs.
///
/// Methods without a `dir` argument act on the project repository; the others
/// act on a dependency checkout living in a scratch directory.
pub trait VersionControl {
    fn fetch_all(&self) -> Result<()>;

    /// Tag names, oldest first.
    fn tags_by_creation(&self) -> Result<Vec<String>>;

    fn revision_exists(&self, revision: &str) -> Result<bool>;

    /// Content of `path` as recorded at `revision`, `None` if the file is absent there.
    fn show_file(&self, revision: &str, path: &str) -> Result<Option<String>>;

    fn clone_into(&self, url: &str, dir: &Path) -> Result<()>;

    fn fetch_tags(&self, dir: &Path) -> Result<()>;

    /// One line per commit reachable from `to` but not from `from`.
    fn log_range(&self, dir: &Path, from: &str, to: &str) -> Result<Vec<String>>;

    fn stage(&self, path: &Path) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    fn push(&self) -> Result<()>;
}
