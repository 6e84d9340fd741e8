use super::VersionControl;
use crate::error::{ChangelogError, Result};
use crate::utils::quote_command;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

const LOG_FORMAT: &str = "--pretty=tformat:%h | %ad | %s%d [%an]";

/// Runs the `git` executable, by default inside the project repository.
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        GitCli {
            repo_dir: repo_dir.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn output_in(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        debug!(dir = %dir.display(), "{}", quote_command("git", args));
        let output = Command::new("git").args(args).current_dir(dir).output()?;
        Ok(output)
    }

    fn run_in(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.output_in(dir, args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(ChangelogError::Command {
                command: quote_command("git", args),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            })
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        self.run_in(&self.repo_dir, args)
    }

    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        Ok(self.output_in(&self.repo_dir, args)?.status.success())
    }
}

impl VersionControl for GitCli {
    fn fetch_all(&self) -> Result<()> {
        self.run(&["fetch", "--all", "--tags"])?;
        Ok(())
    }

    fn tags_by_creation(&self) -> Result<Vec<String>> {
        let out = self.run(&[
            "for-each-ref",
            "--sort=creatordate",
            "--format=%(refname:short)",
            "refs/tags",
        ])?;
        Ok(non_empty_lines(&out))
    }

    fn revision_exists(&self, revision: &str) -> Result<bool> {
        let spec = format!("{}^{{commit}}", revision);
        self.succeeds(&["rev-parse", "--verify", "--quiet", &spec])
    }

    fn show_file(&self, revision: &str, path: &str) -> Result<Option<String>> {
        let object = format!("{}:{}", revision, path);
        if !self.succeeds(&["cat-file", "-e", &object])? {
            return Ok(None);
        }
        self.run(&["show", &object]).map(Some)
    }

    fn clone_into(&self, url: &str, dir: &Path) -> Result<()> {
        let target = dir.to_string_lossy();
        self.run(&["clone", "--", url, &target])?;
        Ok(())
    }

    fn fetch_tags(&self, dir: &Path) -> Result<()> {
        self.run_in(dir, &["fetch", "--all", "--tags"])?;
        Ok(())
    }

    fn log_range(&self, dir: &Path, from: &str, to: &str) -> Result<Vec<String>> {
        let range = format!("{}..{}", from, to);
        let out = self.run_in(
            dir,
            &[
                "log",
                "--no-color",
                LOG_FORMAT,
                "--date=short",
                "--end-of-options",
                &range,
            ],
        )?;
        Ok(non_empty_lines(&out))
    }

    fn stage(&self, path: &Path) -> Result<()> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &path])?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.run(&["commit", "-m", message])?;
        Ok(())
    }

    fn push(&self) -> Result<()> {
        self.run(&["push"])?;
        Ok(())
    }
}

fn non_empty_lines(out: &str) -> Vec<String> {
    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
