use crate::error::{ChangelogError, Result};
use crate::vcs::VersionControl;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRange {
    pub from: String,
    pub to: String,
}

/// Fills in missing revisions: `to` defaults to the newest tag, `from` to the
/// tag created right before `to`. Remote refs are fetched first.
pub fn resolve_revisions<V: VersionControl>(
    vcs: &V,
    from: Option<String>,
    to: Option<String>,
) -> Result<RevisionRange> {
    info!("fetching remote tags and branches");
    vcs.fetch_all()?;

    if let (Some(from), Some(to)) = (&from, &to) {
        return Ok(RevisionRange {
            from: from.clone(),
            to: to.clone(),
        });
    }

    let tags = vcs.tags_by_creation()?;
    let to = match to {
        Some(to) => to,
        None => tags
            .last()
            .cloned()
            .ok_or(ChangelogError::InsufficientHistory { found: 0 })?,
    };
    let from = match from {
        Some(from) => from,
        None => previous_tag(&tags, &to)?,
    };

    info!(from = %from, to = %to, "comparing revisions");
    Ok(RevisionRange { from, to })
}

fn previous_tag(tags: &[String], to: &str) -> Result<String> {
    let insufficient = || ChangelogError::InsufficientHistory { found: tags.len() };
    // a `to` that is not a tag (branch, commit) is compared against the tag before the newest
    let idx = tags
        .iter()
        .position(|t| t == to)
        .unwrap_or_else(|| tags.len().saturating_sub(1));
    if idx == 0 {
        return Err(insufficient());
    }
    tags.get(idx - 1).cloned().ok_or_else(insufficient)
}
