use crate::config::ConfluenceSettings;
use crate::error::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A remote page as seen by the publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub id: String,
    pub title: String,
    pub version: u64,
    pub body: String,
    pub web_link: Option<String>,
}

pub trait DocumentStore {
    fn fetch(&self, id: &str) -> Result<RemoteDocument>;

    /// Writes `doc` as-is; the caller is responsible for bumping `version`.
    fn update(&self, doc: &RemoteDocument) -> Result<RemoteDocument>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Version {
    number: u64,
    #[serde(rename = "minorEdit", default)]
    minor_edit: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Storage {
    value: String,
    #[serde(default)]
    representation: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Body {
    storage: Storage,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    base: Option<String>,
    webui: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    id: String,
    title: String,
    version: Version,
    body: Body,
    #[serde(rename = "_links", default)]
    links: Links,
}

#[derive(Debug, Serialize)]
struct ContentUpdate<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    title: &'a str,
    version: Version,
    body: Body,
}

impl From<Content> for RemoteDocument {
    fn from(content: Content) -> Self {
        let web_link = match (content.links.base, content.links.webui) {
            (Some(base), Some(webui)) => Some(base + &webui),
            _ => None,
        };
        RemoteDocument {
            id: content.id,
            title: content.title,
            version: content.version.number,
            body: content.body.storage.value,
            web_link,
        }
    }
}

pub struct ConfluenceClient {
    client: Client,
    settings: ConfluenceSettings,
}

impl ConfluenceClient {
    pub fn new(settings: ConfluenceSettings) -> Self {
        ConfluenceClient {
            client: Client::new(),
            settings,
        }
    }

    fn content_url(&self, id: &str) -> String {
        format!(
            "{}{}/content/{}?expand=body.storage,version",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.api_path,
            id
        )
    }
}

impl DocumentStore for ConfluenceClient {
    fn fetch(&self, id: &str) -> Result<RemoteDocument> {
        let url = self.content_url(id);
        debug!("GET {}", url);
        let content: Content = self
            .client
            .get(url.as_str())
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .send()?
            .error_for_status()?
            .json()?;
        Ok(content.into())
    }

    fn update(&self, doc: &RemoteDocument) -> Result<RemoteDocument> {
        let url = self.content_url(&doc.id);
        debug!(version = doc.version, "PUT {}", url);
        let payload = ContentUpdate {
            id: &doc.id,
            kind: "page",
            title: &doc.title,
            version: Version {
                number: doc.version,
                minor_edit: false,
            },
            body: Body {
                storage: Storage {
                    value: doc.body.clone(),
                    representation: "storage".to_owned(),
                },
            },
        };
        let content: Content = self
            .client
            .put(url.as_str())
            .basic_auth(&self.settings.username, Some(&self.settings.password))
            .json(&payload)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(content.into())
    }
}
