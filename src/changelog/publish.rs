use super::{ChangelogReport, RevisionRange};
use crate::confluence::{DocumentStore, RemoteDocument};
use crate::error::{ChangelogError, Result};
use crate::utils::compute_hash;
use crate::vcs::VersionControl;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const COMMIT_MESSAGE: &str = "Add changelog file";
const PAGE_SEPARATOR: &str = "<br/><br/>";

pub fn changelog_file_name(range: &RevisionRange) -> String {
    format!("changelog-{}-{}.html", range.from, range.to).replace('/', "_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Unchanged(PathBuf),
    Written { path: PathBuf, pushed: bool },
}

/// Replaces the changelog file in `repo_dir` and commits it. Commit or push
/// failures are logged, only failing to write the file is an error.
pub fn publish_file<V: VersionControl>(
    vcs: &V,
    repo_dir: &Path,
    report: &ChangelogReport,
) -> Result<FileOutcome> {
    let path = repo_dir.join(changelog_file_name(report.range()));
    let markup = report.to_markup();
    let publish_error =
        |err: std::io::Error| ChangelogError::Publish(format!("{}: {}", path.display(), err));

    if path.is_file() {
        let existing = fs::read_to_string(&path).map_err(publish_error)?;
        // the title carries the generation time, only the table is compared
        let existing_table = existing.find("<table").map(|idx| &existing[idx..]);
        if let Some(existing_table) = existing_table {
            if compute_hash(&mut existing_table.as_bytes()).map_err(publish_error)?
                == compute_hash(&mut report.table_markup().as_bytes()).map_err(publish_error)?
            {
                info!(path = %path.display(), "changelog file already up to date");
                return Ok(FileOutcome::Unchanged(path));
            }
        }
        fs::remove_file(&path).map_err(publish_error)?;
    }
    fs::write(&path, &markup).map_err(publish_error)?;
    info!(path = %path.display(), "changelog file created");

    let relative = pathdiff::diff_paths(&path, repo_dir).unwrap_or_else(|| path.clone());
    let pushed = match commit_and_push(vcs, &relative) {
        Ok(()) => {
            info!("changelog file pushed");
            true
        }
        Err(err) => {
            warn!("no changes to push: {}", err);
            false
        }
    };
    Ok(FileOutcome::Written { path, pushed })
}

fn commit_and_push<V: VersionControl>(vcs: &V, path: &Path) -> Result<()> {
    vcs.stage(path)?;
    vcs.commit(COMMIT_MESSAGE)?;
    vcs.push()
}

/// Prepends the report to the page and writes it back with the next version
/// number. Nothing guards against a concurrent writer between fetch and update.
pub fn publish_remote<S: DocumentStore + ?Sized>(
    store: &S,
    page_id: &str,
    report: &ChangelogReport,
) -> Result<RemoteDocument> {
    let current = store.fetch(page_id)?;
    let next = RemoteDocument {
        version: current.version + 1,
        body: format!("{}{}{}", report.to_markup(), PAGE_SEPARATOR, current.body),
        ..current
    };
    store.update(&next)
}

pub struct PublishOptions {
    pub file: bool,
    pub remote: bool,
    pub page_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct PublishOutcome {
    pub file: Option<Result<FileOutcome>>,
    pub remote: Option<Result<RemoteDocument>>,
}

/// Runs both sinks independently; a failing sink is logged and never stops the other.
pub fn publish<V: VersionControl>(
    vcs: &V,
    repo_dir: &Path,
    store: Option<&dyn DocumentStore>,
    options: &PublishOptions,
    report: &ChangelogReport,
) -> PublishOutcome {
    let mut outcome = PublishOutcome::default();

    if options.file {
        let result = publish_file(vcs, repo_dir, report);
        if let Err(err) = &result {
            warn!("{}", err);
        }
        outcome.file = Some(result);
    }

    if options.remote {
        match (&options.page_id, store) {
            (None, _) => {
                info!("no Confluence page id configured, skipping remote publish");
            }
            (Some(_), None) => {
                let err = ChangelogError::Config(
                    "Confluence credentials are not configured".to_owned(),
                );
                warn!("{}", err);
                outcome.remote = Some(Err(err));
            }
            (Some(page_id), Some(store)) => {
                let result = publish_remote(store, page_id, report);
                match &result {
                    Ok(doc) => info!(
                        "content published on page {} - {}{}",
                        doc.id,
                        doc.title,
                        doc.web_link
                            .as_ref()
                            .map(|link| format!(" - {}", link))
                            .unwrap_or_default()
                    ),
                    Err(err) => warn!("remote publish failed: {}", err),
                }
                outcome.remote = Some(result);
            }
        }
    }

    outcome
}
