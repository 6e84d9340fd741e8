use super::{Classification, DiffEntry};
use crate::error::{ChangelogError, Result};
use crate::utils::strip_ansi;
use crate::vcs::VersionControl;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct HistoryResult {
    pub name: String,
    pub lines: Vec<String>,
    pub error: Option<ChangelogError>,
}

/// Collects dependency commit logs, each from a fresh checkout below `scratch_root`.
pub struct HistoryAggregator {
    scratch_root: PathBuf,
}

impl HistoryAggregator {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        HistoryAggregator {
            scratch_root: scratch_root.into(),
        }
    }

    pub fn aggregate<V: VersionControl>(
        &self,
        vcs: &V,
        entries: &[DiffEntry],
    ) -> Vec<HistoryResult> {
        entries
            .iter()
            .filter(|entry| entry.classification == Classification::Changed)
            .map(|entry| self.retrieve(vcs, entry))
            .collect()
    }

    pub fn retrieve<V: VersionControl>(&self, vcs: &V, entry: &DiffEntry) -> HistoryResult {
        let outcome = match (&entry.repository, &entry.old_version) {
            (Some(repository), Some(old)) => {
                self.with_workspace(&entry.name, |dir| {
                    read_log(vcs, dir, &entry.name, repository, old, &entry.new_version)
                })
            }
            _ => Err(ChangelogError::HistoryRetrieval {
                name: entry.name.clone(),
                reason: "the old version spec names no repository".to_owned(),
            }),
        };

        match outcome {
            Ok(lines) => HistoryResult {
                name: entry.name.clone(),
                lines,
                error: None,
            },
            Err(err) => {
                warn!(dependency = %entry.name, "{}", err);
                HistoryResult {
                    name: entry.name.clone(),
                    lines: Vec::new(),
                    error: Some(err),
                }
            }
        }
    }

    fn with_workspace<T>(&self, name: &str, f: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
        let workspace = self.acquire(name)?;
        let result = f(workspace.path()).map_err(|err| match err {
            ChangelogError::HistoryRetrieval { .. } => err,
            other => ChangelogError::HistoryRetrieval {
                name: name.to_owned(),
                reason: other.to_string(),
            },
        });

        let path = workspace.path().to_path_buf();
        if let Err(err) = workspace.close() {
            warn!(workspace = %path.display(), "could not remove workspace: {}", err);
        } else {
            debug!(workspace = %path.display(), "workspace removed");
        }
        result
    }

    fn acquire(&self, name: &str) -> Result<TempDir> {
        let prefix = format!("{}-", workspace_prefix(name));
        tempfile::Builder::new()
            .prefix(&prefix)
            .tempdir_in(&self.scratch_root)
            .map_err(|source| ChangelogError::WorkspaceAcquisition {
                name: name.to_owned(),
                source,
            })
    }
}

fn read_log<V: VersionControl>(
    vcs: &V,
    dir: &Path,
    name: &str,
    repository: &str,
    from: &str,
    to: &str,
) -> Result<Vec<String>> {
    // manifest values end up as git arguments and must never read as options
    for value in &[repository, from, to] {
        if value.starts_with('-') {
            return Err(ChangelogError::HistoryRetrieval {
                name: name.to_owned(),
                reason: format!("refusing option-like git argument {:?}", value),
            });
        }
    }
    info!("git clone {}", repository);
    vcs.clone_into(repository, dir)?;
    vcs.fetch_tags(dir)?;
    let lines = vcs.log_range(dir, from, to)?;
    Ok(lines.iter().map(|line| strip_ansi(line)).collect())
}

fn workspace_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
