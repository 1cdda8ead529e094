use crate::model::{JobsPage, RunsPage, Workflow, WorkflowJob, WorkflowRun, WorkflowsPage};
use async_trait::async_trait;
use color_eyre::eyre::{eyre, Result};

pub const API_ROOT: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("ghax/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";
const PER_PAGE: u32 = 100;

/// Read operations the explorer needs from the Actions API.
#[async_trait]
pub trait ActionsApi: Send + Sync {
    async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Vec<Workflow>>;

    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> Result<Vec<WorkflowRun>>;

    /// Steps arrive embedded in each job; there is no separate call for them.
    async fn list_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Vec<WorkflowJob>>;
}

/// Token-authenticated client against the GitHub REST API.
pub struct RestApi {
    http: reqwest::Client,
    token: String,
    base: String,
}

impl RestApi {
    pub fn new(token: String) -> Self {
        Self::with_base(token, API_ROOT)
    }

    /// Points the client at a different API root (GitHub Enterprise).
    pub fn with_base(token: String, base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base: base.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        let response = self
            .http
            .get(&url)
            .query(&[("per_page", PER_PAGE)])
            .bearer_auth(&self.token)
            .header("User-Agent", USER_AGENT)
            .header("Accept", ACCEPT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(eyre!("GitHub API error ({}): {}", status, body.trim()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| eyre!("unexpected GitHub API payload: {}", e))
    }
}

#[async_trait]
impl ActionsApi for RestApi {
    async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Vec<Workflow>> {
        let page: WorkflowsPage = self
            .get_json(&format!("/repos/{}/{}/actions/workflows", owner, repo))
            .await?;
        Ok(page.workflows)
    }

    async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: u64,
    ) -> Result<Vec<WorkflowRun>> {
        let page: RunsPage = self
            .get_json(&format!(
                "/repos/{}/{}/actions/workflows/{}/runs",
                owner, repo, workflow_id
            ))
            .await?;
        Ok(page.workflow_runs)
    }

    async fn list_jobs(&self, owner: &str, repo: &str, run_id: u64) -> Result<Vec<WorkflowJob>> {
        let page: JobsPage = self
            .get_json(&format!(
                "/repos/{}/{}/actions/runs/{}/jobs",
                owner, repo, run_id
            ))
            .await?;
        Ok(page.jobs)
    }
}
