use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    InProgress,
    Queued,
    Requested,
    Waiting,
    Pending,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::InProgress => "in_progress",
            RunStatus::Queued => "queued",
            RunStatus::Requested => "requested",
            RunStatus::Waiting => "waiting",
            RunStatus::Pending => "pending",
            RunStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    StartupFailure,
    Stale,
    Neutral,
    #[serde(other)]
    Unknown,
}

impl Conclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            Conclusion::Success => "success",
            Conclusion::Failure => "failure",
            Conclusion::Cancelled => "cancelled",
            Conclusion::Skipped => "skipped",
            Conclusion::TimedOut => "timed_out",
            Conclusion::ActionRequired => "action_required",
            Conclusion::StartupFailure => "startup_failure",
            Conclusion::Stale => "stale",
            Conclusion::Neutral => "neutral",
            Conclusion::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Conclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow definition registered in the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    /// Path of the definition file, e.g. `.github/workflows/ci.yml`.
    pub path: String,
}

/// One execution of a workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    pub run_number: u64,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    pub event: String,
    #[serde(default)]
    pub head_sha: String,
    #[serde(default)]
    pub head_branch: Option<String>,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowRun {
    /// Abbreviated commit sha shown next to the trigger event.
    pub fn short_sha(&self) -> &str {
        self.head_sha.get(..7).unwrap_or(&self.head_sha)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowJob {
    pub id: u64,
    pub name: String,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    pub number: u64,
    pub status: RunStatus,
    pub conclusion: Option<Conclusion>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

// List-response envelopes as the REST API returns them.

#[derive(Debug, Deserialize)]
pub struct WorkflowsPage {
    pub total_count: u64,
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
pub struct RunsPage {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Deserialize)]
pub struct JobsPage {
    pub total_count: u64,
    pub jobs: Vec<WorkflowJob>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKFLOWS_JSON: &str = r#"{
        "total_count": 2,
        "workflows": [
            {
                "id": 161335,
                "name": "CI",
                "path": ".github/workflows/ci.yml",
                "state": "active"
            },
            {
                "id": 269289,
                "name": "Release",
                "path": ".github/workflows/release.yml",
                "state": "active"
            }
        ]
    }"#;

    #[test]
    fn parse_workflows_page() {
        let page: WorkflowsPage = serde_json::from_str(WORKFLOWS_JSON).unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.workflows[0].id, 161335);
        assert_eq!(page.workflows[0].name, "CI");
        assert_eq!(page.workflows[1].path, ".github/workflows/release.yml");
    }

    #[test]
    fn parse_completed_run() {
        let json = r#"{
            "total_count": 1,
            "workflow_runs": [{
                "id": 30433642,
                "run_number": 562,
                "status": "completed",
                "conclusion": "success",
                "event": "push",
                "head_sha": "acb5820ced9479c074f688cc328bf03f341a511d",
                "head_branch": "main",
                "html_url": "https://github.com/octo/demo/actions/runs/30433642",
                "created_at": "2024-01-22T19:33:08Z",
                "updated_at": "2024-01-22T19:38:08Z"
            }]
        }"#;
        let page: RunsPage = serde_json::from_str(json).unwrap();
        let run = &page.workflow_runs[0];
        assert_eq!(run.id, 30433642);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.conclusion, Some(Conclusion::Success));
        assert_eq!(run.event, "push");
        assert_eq!(run.short_sha(), "acb5820");
    }

    #[test]
    fn parse_in_progress_run_with_null_conclusion() {
        let json = r#"{
            "total_count": 1,
            "workflow_runs": [{
                "id": 1, "run_number": 1,
                "status": "in_progress", "conclusion": null,
                "event": "push", "head_sha": "deadbeef00", "head_branch": null,
                "html_url": "https://example.com",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let page: RunsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.workflow_runs[0].status, RunStatus::InProgress);
        assert_eq!(page.workflow_runs[0].conclusion, None);
        assert_eq!(page.workflow_runs[0].head_branch, None);
    }

    #[test]
    fn parse_all_status_strings() {
        let cases = [
            ("completed", RunStatus::Completed),
            ("in_progress", RunStatus::InProgress),
            ("queued", RunStatus::Queued),
            ("requested", RunStatus::Requested),
            ("waiting", RunStatus::Waiting),
            ("pending", RunStatus::Pending),
            ("something_new", RunStatus::Unknown),
        ];
        for (s, expected) in cases {
            let status: RunStatus = serde_json::from_str(&format!("\"{}\"", s)).unwrap();
            assert_eq!(status, expected, "status string: {}", s);
        }
    }

    #[test]
    fn parse_all_conclusion_strings() {
        let cases = [
            ("success", Conclusion::Success),
            ("failure", Conclusion::Failure),
            ("cancelled", Conclusion::Cancelled),
            ("skipped", Conclusion::Skipped),
            ("timed_out", Conclusion::TimedOut),
            ("action_required", Conclusion::ActionRequired),
            ("startup_failure", Conclusion::StartupFailure),
            ("stale", Conclusion::Stale),
            ("neutral", Conclusion::Neutral),
            ("brand_new_thing", Conclusion::Unknown),
        ];
        for (s, expected) in cases {
            let conclusion: Conclusion = serde_json::from_str(&format!("\"{}\"", s)).unwrap();
            assert_eq!(conclusion, expected, "conclusion string: {}", s);
        }
    }

    #[test]
    fn parse_jobs_page_with_steps() {
        let json = r#"{
            "total_count": 1,
            "jobs": [{
                "id": 399444496,
                "name": "build",
                "status": "completed",
                "conclusion": "success",
                "html_url": "https://github.com/octo/demo/runs/399444496",
                "started_at": "2024-01-20T17:42:40Z",
                "completed_at": "2024-01-20T17:44:39Z",
                "steps": [
                    {"name": "Set up job", "number": 1, "status": "completed", "conclusion": "success"},
                    {"name": "Run tests", "number": 2, "status": "completed", "conclusion": "failure"}
                ]
            }]
        }"#;
        let page: JobsPage = serde_json::from_str(json).unwrap();
        let job = &page.jobs[0];
        assert_eq!(job.name, "build");
        assert_eq!(job.steps.len(), 2);
        assert_eq!(job.steps[0].name, "Set up job");
        assert_eq!(job.steps[1].conclusion, Some(Conclusion::Failure));
    }

    #[test]
    fn parse_queued_job_without_steps_or_timestamps() {
        let json = r#"{
            "total_count": 1,
            "jobs": [{
                "id": 1, "name": "deploy",
                "status": "queued", "conclusion": null
            }]
        }"#;
        let page: JobsPage = serde_json::from_str(json).unwrap();
        assert!(page.jobs[0].steps.is_empty());
        assert!(page.jobs[0].started_at.is_none());
        assert!(page.jobs[0].completed_at.is_none());
    }

    #[test]
    fn short_sha_of_short_value() {
        let json = r#"{
            "total_count": 1,
            "workflow_runs": [{
                "id": 1, "run_number": 1,
                "status": "queued", "conclusion": null,
                "event": "push", "head_sha": "abc",
                "html_url": "u",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        let page: RunsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.workflow_runs[0].short_sha(), "abc");
    }

    #[test]
    fn parse_invalid_envelope_error() {
        assert!(serde_json::from_str::<JobsPage>(r#"{"not_jobs": []}"#).is_err());
    }
}
