use crate::error::{ChangelogError, Result};
use std::fmt;
use std::str::FromStr;

/// A dependency value from the manifest, e.g. `1.2.3` or `git@host/repo.git#v1.2.3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Plain(String),
    PathRef { path: String, reference: String },
}

impl VersionSpec {
    pub fn parse(raw: &str) -> Result<VersionSpec> {
        match raw.find('#') {
            None => Ok(VersionSpec::Plain(raw.to_owned())),
            Some(idx) => {
                let (path, reference) = (&raw[..idx], &raw[idx + 1..]);
                if path.is_empty() || reference.is_empty() {
                    return Err(ChangelogError::MalformedVersionSpec(raw.to_owned()));
                }
                Ok(VersionSpec::PathRef {
                    path: path.to_owned(),
                    reference: reference.to_owned(),
                })
            }
        }
    }

    /// The part compared between two revisions: the ref, or the whole plain version.
    pub fn token(&self) -> &str {
        match self {
            VersionSpec::Plain(version) => version,
            VersionSpec::PathRef { reference, .. } => reference,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            VersionSpec::Plain(_) => None,
            VersionSpec::PathRef { path, .. } => Some(path),
        }
    }
}

impl FromStr for VersionSpec {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self> {
        VersionSpec::parse(s)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VersionSpec::Plain(version) => write!(f, "{}", version),
            VersionSpec::PathRef { path, reference } => write!(f, "{}#{}", path, reference),
        }
    }
}
