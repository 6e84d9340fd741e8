use crate::error::{ChangelogError, Result};
use crate::vcs::VersionControl;
use serde_json::Value;
use tracing::debug;

/// Dependency name to raw version spec, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSnapshot {
    entries: Vec<(String, String)>,
}

impl ManifestSnapshot {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, S: Into<String>> std::iter::FromIterator<(N, S)> for ManifestSnapshot {
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        ManifestSnapshot {
            entries: iter
                .into_iter()
                .map(|(n, s)| (n.into(), s.into()))
                .collect(),
        }
    }
}

pub struct ManifestLocation<'a> {
    pub path: &'a str,
    pub section: &'a str,
}

pub fn load_snapshot<V: VersionControl>(
    vcs: &V,
    revision: &str,
    manifest: &ManifestLocation,
) -> Result<ManifestSnapshot> {
    if !vcs.revision_exists(revision)? {
        return Err(ChangelogError::RevisionNotFound(revision.to_owned()));
    }
    let content = vcs.show_file(revision, manifest.path)?.ok_or_else(|| {
        ChangelogError::ManifestNotFound {
            revision: revision.to_owned(),
            path: manifest.path.to_owned(),
        }
    })?;

    let snapshot = parse_manifest(&content, revision, manifest)?;
    debug!(revision, dependencies = snapshot.len(), "manifest loaded");
    Ok(snapshot)
}

fn parse_manifest(
    content: &str,
    revision: &str,
    manifest: &ManifestLocation,
) -> Result<ManifestSnapshot> {
    let doc: Value =
        serde_json::from_str(content).map_err(|source| ChangelogError::ManifestParse {
            revision: revision.to_owned(),
            path: manifest.path.to_owned(),
            source,
        })?;
    let schema_error = || ChangelogError::ManifestSchema {
        revision: revision.to_owned(),
        path: manifest.path.to_owned(),
        section: manifest.section.to_owned(),
    };

    let section = doc
        .get(manifest.section)
        .and_then(Value::as_object)
        .ok_or_else(schema_error)?;

    section
        .iter()
        .map(|(name, spec)| match spec {
            Value::String(spec) => Ok((name.clone(), spec.clone())),
            _ => Err(schema_error()),
        })
        .collect()
}
