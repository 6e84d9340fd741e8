use super::VersionControl;
use crate::error::{ChangelogError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct FakeVcs {
    tags: Vec<String>,
    files: HashMap<(String, String), String>,
    histories: HashMap<String, Vec<String>>,
    failing_log: Vec<String>,
    fail_push: bool,
    pub calls: RefCell<Vec<String>>,
    pub checkouts: RefCell<Vec<PathBuf>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        FakeVcs::default()
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_file(mut self, revision: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((revision.to_owned(), path.to_owned()), content.to_owned());
        self
    }

    pub fn with_history(mut self, url: &str, lines: &[&str]) -> Self {
        self.histories
            .insert(url.to_owned(), lines.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn with_failing_log(mut self, url: &str) -> Self {
        self.histories.insert(url.to_owned(), Vec::new());
        self.failing_log.push(url.to_owned());
        self
    }

    pub fn with_failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn cloned_url(&self, dir: &Path) -> Result<String> {
        std::fs::read_to_string(dir.join("ORIGIN")).map_err(ChangelogError::from)
    }
}

impl VersionControl for FakeVcs {
    fn fetch_all(&self) -> Result<()> {
        self.record("fetch_all".to_owned());
        Ok(())
    }

    fn tags_by_creation(&self) -> Result<Vec<String>> {
        Ok(self.tags.clone())
    }

    fn revision_exists(&self, revision: &str) -> Result<bool> {
        Ok(self.tags.iter().any(|t| t == revision)
            || self.files.keys().any(|(rev, _)| rev == revision))
    }

    fn show_file(&self, revision: &str, path: &str) -> Result<Option<String>> {
        Ok(self
            .files
            .get(&(revision.to_owned(), path.to_owned()))
            .cloned())
    }

    fn clone_into(&self, url: &str, dir: &Path) -> Result<()> {
        self.record(format!("clone {}", url));
        self.checkouts.borrow_mut().push(dir.to_path_buf());
        if !self.histories.contains_key(url) {
            return Err(ChangelogError::Command {
                command: format!("git clone {}", url),
                stderr: "repository not found".to_owned(),
            });
        }
        std::fs::write(dir.join("ORIGIN"), url)?;
        Ok(())
    }

    fn fetch_tags(&self, dir: &Path) -> Result<()> {
        self.cloned_url(dir)?;
        Ok(())
    }

    fn log_range(&self, dir: &Path, from: &str, to: &str) -> Result<Vec<String>> {
        let url = self.cloned_url(dir)?;
        self.record(format!("log {} {}..{}", url, from, to));
        if self.failing_log.contains(&url) {
            return Err(ChangelogError::Command {
                command: format!("git log {}..{}", from, to),
                stderr: format!("unknown revision {}", from),
            });
        }
        Ok(self.histories[&url].clone())
    }

    fn stage(&self, path: &Path) -> Result<()> {
        self.record(format!("stage {}", path.display()));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.record("push".to_owned());
        if self.fail_push {
            return Err(ChangelogError::Command {
                command: "git push".to_owned(),
                stderr: "rejected".to_owned(),
            });
        }
        Ok(())
    }
}
