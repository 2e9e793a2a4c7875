/// Report publishing via git
///
/// Copies the rendered HTML into a local checkout of the publishing
/// repository, commits with a generation-timestamped message and pushes.
/// Publish failure is fatal for the run; the rendered artifact stays on disk.
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::PublishConfig;

/// Errors from the publish step (fatal for the run)
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish repository not found at {0}")]
    MissingRepo(PathBuf),

    #[error("git {command} failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Pushes the rendered report into a git repository checkout
pub struct GitPublisher {
    repo_dir: PathBuf,
    target_path: String,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn new(config: &PublishConfig) -> Self {
        Self {
            repo_dir: config.repo_dir.clone(),
            target_path: config.target_path.clone(),
            remote: config.remote.clone(),
            branch: config.branch.clone(),
        }
    }

    /// Copy the report into the checkout, commit and push.
    ///
    /// Overwrites prior report content at the target path. A checkout with no
    /// changes (identical report) skips the commit and push.
    pub async fn publish(
        &self,
        html_path: &Path,
        generated_at: DateTime<Utc>,
    ) -> Result<(), PublishError> {
        if !self.repo_dir.is_dir() {
            return Err(PublishError::MissingRepo(self.repo_dir.clone()));
        }

        let target = self.repo_dir.join(&self.target_path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(html_path, &target).await?;

        self.run_git(&["add", &self.target_path]).await?;

        let status = self.run_git(&["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            warn!("Report unchanged since last publish, skipping commit");
            return Ok(());
        }

        let message = format!(
            "Update poker recap report - {}",
            generated_at.format("%Y-%m-%dT%H:%M:%SZ")
        );
        self.run_git(&["commit", "-m", &message]).await?;
        self.run_git(&["push", &self.remote, &self.branch]).await?;

        info!("🚀 Report published to {}/{}", self.remote, self.branch);
        Ok(())
    }

    async fn run_git(&self, args: &[&str]) -> Result<String, PublishError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .await?;

        if !output.status.success() {
            return Err(PublishError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
