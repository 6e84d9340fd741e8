use super::{ManifestSnapshot, VersionSpec};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    New,
    Changed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    pub name: String,
    pub classification: Classification,
    pub old_version: Option<String>,
    pub new_version: String,
    /// Where the dependency's own history can be cloned from, taken from the old spec.
    pub repository: Option<String>,
}

impl DiffEntry {
    pub fn is_reportable(&self) -> bool {
        self.classification != Classification::Unchanged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyFilter {
    All,
    Prefixes(Vec<String>),
}

impl DependencyFilter {
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            DependencyFilter::All => true,
            DependencyFilter::Prefixes(prefixes) => {
                prefixes.iter().any(|prefix| name.starts_with(prefix.as_str()))
            }
        }
    }
}

/// Compares every accepted dependency of `new` against `old`, in `new`'s order.
pub fn diff_snapshots(
    old: &ManifestSnapshot,
    new: &ManifestSnapshot,
    filter: &DependencyFilter,
) -> Vec<DiffEntry> {
    new.iter()
        .filter(|(name, _)| filter.accepts(name))
        .map(|(name, new_raw)| {
            let new_spec = parse_lenient(name, new_raw);
            match old.get(name) {
                None => DiffEntry {
                    name: name.to_owned(),
                    classification: Classification::New,
                    old_version: None,
                    new_version: new_spec.token().to_owned(),
                    repository: None,
                },
                Some(old_raw) => {
                    let old_spec = parse_lenient(name, old_raw);
                    let classification = if old_spec.token() == new_spec.token() {
                        Classification::Unchanged
                    } else {
                        Classification::Changed
                    };
                    DiffEntry {
                        name: name.to_owned(),
                        classification,
                        old_version: Some(old_spec.token().to_owned()),
                        new_version: new_spec.token().to_owned(),
                        repository: old_spec.path().map(str::to_owned),
                    }
                }
            }
        })
        .collect()
}

fn parse_lenient(name: &str, raw: &str) -> VersionSpec {
    VersionSpec::parse(raw).unwrap_or_else(|err| {
        warn!(dependency = name, "{}, comparing it as a plain version", err);
        VersionSpec::Plain(raw.to_owned())
    })
}
