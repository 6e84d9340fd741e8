use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangelogError {
    #[error("revision not found: {0}")]
    RevisionNotFound(String),

    #[error("at least two tags are needed to pick default revisions, found {found}")]
    InsufficientHistory { found: usize },

    #[error("{path} does not exist at revision {revision}")]
    ManifestNotFound { revision: String, path: String },

    #[error("{path} at revision {revision} is not valid JSON: {source}")]
    ManifestParse {
        revision: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} at revision {revision} has no \"{section}\" object")]
    ManifestSchema {
        revision: String,
        path: String,
        section: String,
    },

    #[error("malformed version spec: {0:?}")]
    MalformedVersionSpec(String),

    #[error("could not create a scratch workspace for {name}: {source}")]
    WorkspaceAcquisition {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("history of {name} unavailable: {reason}")]
    HistoryRetrieval { name: String, reason: String },

    #[error("publishing failed: {0}")]
    Publish(String),

    #[error("`{command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
