use crate::changelog::DependencyFilter;

pub const PAGE_ID_VAR: &str = "CHANGELOG_CONFLUENCE_PAGE_ID";
pub const PREFIXES_VAR: &str = "CHANGELOG_MODULE_PREFIXES";
pub const DEFAULT_PREFIXES: &str = "dwx-,conectus-,ofsui";
const DEFAULT_API_PATH: &str = "/rest/api";

#[derive(Clone, PartialEq, Eq)]
pub struct ConfluenceSettings {
    pub base_url: String,
    pub api_path: String,
    pub username: String,
    pub password: String,
}

impl ConfluenceSettings {
    /// `None` unless base url, username and password are all set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        Some(ConfluenceSettings {
            base_url: lookup("CONFLUENCE_BASE_URL")?,
            api_path: lookup("CONFLUENCE_API_PATH").unwrap_or_else(|| DEFAULT_API_PATH.to_owned()),
            username: lookup("CONFLUENCE_USERNAME")?,
            password: lookup("CONFLUENCE_PASSWORD")?,
        })
    }
}

/// Environment-provided defaults; CLI arguments take precedence over these.
pub struct EnvSettings {
    pub page_id: Option<String>,
    pub prefixes: Vec<String>,
    pub confluence: Option<ConfluenceSettings>,
}

impl EnvSettings {
    pub fn from_env() -> Self {
        EnvSettings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let prefixes = non_empty(PREFIXES_VAR).unwrap_or_else(|| DEFAULT_PREFIXES.to_owned());
        EnvSettings {
            page_id: non_empty(PAGE_ID_VAR),
            prefixes: prefixes
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect(),
            confluence: ConfluenceSettings::from_lookup(non_empty),
        }
    }

    pub fn dependency_filter(&self, all: bool) -> DependencyFilter {
        if all {
            DependencyFilter::All
        } else {
            DependencyFilter::Prefixes(self.prefixes.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> EnvSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]);
        assert_eq!(s.page_id, None);
        assert_eq!(s.prefixes, vec!["dwx-", "conectus-", "ofsui"]);
        assert!(s.confluence.is_none());
        assert_eq!(s.dependency_filter(true), DependencyFilter::All);
    }

    #[test]
    fn reads_confluence_credentials_and_prefixes() {
        let s = settings(&[
            (PAGE_ID_VAR, "4242"),
            (PREFIXES_VAR, " acme- , , ui-"),
            ("CONFLUENCE_BASE_URL", "https://wiki.example"),
            ("CONFLUENCE_USERNAME", "ci"),
            ("CONFLUENCE_PASSWORD", "secret"),
        ]);
        assert_eq!(s.page_id.as_deref(), Some("4242"));
        assert_eq!(
            s.dependency_filter(false),
            DependencyFilter::Prefixes(vec!["acme-".to_owned(), "ui-".to_owned()])
        );
        let confluence = s.confluence.unwrap();
        assert_eq!(confluence.api_path, "/rest/api");
        assert_eq!(confluence.username, "ci");
    }

    #[test]
    fn partial_credentials_disable_the_store() {
        let s = settings(&[("CONFLUENCE_BASE_URL", "https://wiki.example"), (PAGE_ID_VAR, " ")]);
        assert!(s.confluence.is_none());
        assert_eq!(s.page_id, None);
    }
}
