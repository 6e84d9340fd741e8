pub mod changelog;
pub mod config;
pub mod confluence;
pub mod error;
pub mod utils;
pub mod vcs;

pub use changelog::*;
pub use confluence::{ConfluenceClient, DocumentStore, RemoteDocument};
pub use error::{ChangelogError, Result};
pub use vcs::{GitCli, VersionControl};

use chrono::Local;
use std::path::PathBuf;
use tracing::info;

pub struct ChangelogRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub manifest_path: String,
    pub section: String,
    pub filter: DependencyFilter,
    pub scratch_dir: PathBuf,
}

/// Resolves the revisions, diffs the manifest between them and gathers the
/// history of every changed dependency.
pub fn build_changelog<V: VersionControl>(
    vcs: &V,
    request: &ChangelogRequest,
) -> Result<ChangelogReport> {
    let range = resolve_revisions(vcs, request.from.clone(), request.to.clone())?;
    let manifest = ManifestLocation {
        path: &request.manifest_path,
        section: &request.section,
    };
    let old = load_snapshot(vcs, &range.from, &manifest)?;
    let new = load_snapshot(vcs, &range.to, &manifest)?;

    let entries: Vec<DiffEntry> = diff_snapshots(&old, &new, &request.filter)
        .into_iter()
        .filter(DiffEntry::is_reportable)
        .collect();
    let histories = HistoryAggregator::new(&request.scratch_dir).aggregate(vcs, &entries);

    let count = |c: Classification| entries.iter().filter(|e| e.classification == c).count();
    info!(
        rows = entries.len(),
        new = count(Classification::New),
        changed = count(Classification::Changed),
        history_failures = histories.iter().filter(|h| h.error.is_some()).count(),
        "changelog built"
    );

    Ok(ChangelogReport::build(range, Local::now(), &entries, &histories))
}
