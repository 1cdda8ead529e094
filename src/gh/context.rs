use crate::gh::api::{ActionsApi, RestApi};
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::process::Command;

/// Message prefix the explorer matches to classify missing-token failures.
pub const TOKEN_ERROR_PREFIX: &str = "Could not get token from the GitHub provider.";

/// Resolved repository identity plus authenticated API access. Read-only
/// once constructed; shared across nodes by `Arc`.
#[derive(Clone)]
pub struct GitHubContext {
    pub owner: String,
    pub name: String,
    /// Working-tree root, present when the repository is checked out locally.
    pub repo_root: Option<PathBuf>,
    pub api: Arc<dyn ActionsApi>,
}

#[async_trait]
pub trait ContextResolver: Send + Sync {
    /// `Ok(None)` means no github.com repository is available. Token
    /// acquisition failures surface as errors starting with
    /// [`TOKEN_ERROR_PREFIX`].
    async fn resolve(&self) -> Result<Option<GitHubContext>>;
}

/// Resolves the repository from the `origin` remote of the current working
/// directory and a token from the environment or the `gh` CLI.
pub struct GitResolver {
    repo: Option<String>,
    token: Option<String>,
}

impl GitResolver {
    pub fn new(repo: Option<String>, token: Option<String>) -> Self {
        Self { repo, token }
    }

    async fn detect_repository(&self) -> Option<(String, String)> {
        if let Some(spec) = &self.repo {
            return parse_repo_spec(spec);
        }
        let output = Command::new("git")
            .args(["remote", "get-url", "origin"])
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        parse_github_remote(String::from_utf8_lossy(&output.stdout).trim())
    }

    async fn detect_repo_root(&self) -> Option<PathBuf> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .output()
            .await
            .ok()?;
        if !output.status.success() {
            return None;
        }
        Some(PathBuf::from(
            String::from_utf8_lossy(&output.stdout).trim(),
        ))
    }

    async fn acquire_token(&self) -> Result<String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
            if let Ok(token) = std::env::var(var) {
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }
        if let Ok(output) = Command::new("gh").args(["auth", "token"]).output().await {
            if output.status.success() {
                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }
        Err(eyre!(
            "{} Sign in with the gh CLI or set GITHUB_TOKEN.",
            TOKEN_ERROR_PREFIX
        ))
    }
}

#[async_trait]
impl ContextResolver for GitResolver {
    async fn resolve(&self) -> Result<Option<GitHubContext>> {
        let Some((owner, name)) = self.detect_repository().await else {
            return Ok(None);
        };
        let repo_root = self.detect_repo_root().await;
        let token = self.acquire_token().await?;
        Ok(Some(GitHubContext {
            owner,
            name,
            repo_root,
            api: Arc::new(RestApi::new(token)),
        }))
    }
}

fn parse_repo_spec(spec: &str) -> Option<(String, String)> {
    let (owner, name) = spec.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}

/// Extracts `(owner, repo)` from a github.com remote URL. Both the scp-like
/// `git@github.com:owner/repo.git` and `https://github.com/owner/repo`
/// forms are accepted; anything else is not a github.com repository.
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))?;

    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix(".git").unwrap_or(rest);

    let (owner, name) = rest.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner.to_string(), name.to_string()))
}
