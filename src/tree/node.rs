use crate::gh::context::GitHubContext;
use crate::model::{Conclusion, RunStatus, Workflow, WorkflowJob, WorkflowRun, WorkflowStep};
use crate::tree::icons::{icon_for, Icon};
use crate::workflow::ParsedWorkflow;
use std::sync::Arc;

/// Host-side expandability of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapsibleState {
    None,
    Collapsed,
    Expanded,
}

/// Classification tags driving conditional host actions (context menus,
/// inline buttons). Computed once when a node is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Workflow,
    Run,
    Job,
    Step,
    Cancelable,
    Rerunnable,
    Completed,
    RepositoryDispatch,
    WorkflowDispatch,
}

impl NodeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeTag::Workflow => "workflow",
            NodeTag::Run => "run",
            NodeTag::Job => "job",
            NodeTag::Step => "step",
            NodeTag::Cancelable => "cancelable",
            NodeTag::Rerunnable => "rerunnable",
            NodeTag::Completed => "completed",
            NodeTag::RepositoryDispatch => "rdispatch",
            NodeTag::WorkflowDispatch => "wdispatch",
        }
    }
}

impl std::fmt::Display for NodeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque host command attached to a node; the node itself is the implied
/// argument when the host invokes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub title: &'static str,
    pub id: &'static str,
}

pub const OPEN_RUN: Command = Command {
    title: "Open run",
    id: "github-actions.workflow.run.open",
};

pub const OPEN_LOGS: Command = Command {
    title: "Open logs",
    id: "github-actions.workflow.logs",
};

/// Display shape consumed by the host. A pure projection of a node; the
/// host never reaches back into the entities.
#[derive(Debug, Clone)]
pub struct TreeItem {
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub state: CollapsibleState,
    pub tags: Vec<NodeTag>,
    pub icon: Option<Icon>,
    pub command: Option<Command>,
}

impl TreeItem {
    fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            tooltip: None,
            state: CollapsibleState::None,
            tags: Vec::new(),
            icon: None,
            command: None,
        }
    }
}

/// One node of the explorer tree. Entity variants carry read-only snapshots
/// of remote state plus the shared session context; nothing is mutated after
/// construction, and every expansion rebuilds its children from a fresh
/// fetch.
pub enum ExplorerNode {
    NoRepository,
    AuthenticationRequired,
    Error(String),
    Workflow(WorkflowNode),
    Run(RunNode),
    Job(JobNode),
    Step(StepNode),
}

impl ExplorerNode {
    pub fn tree_item(&self) -> TreeItem {
        match self {
            ExplorerNode::NoRepository => TreeItem::leaf("Did not find a github.com repository"),
            ExplorerNode::AuthenticationRequired => {
                TreeItem::leaf("Please sign-in in the Accounts menu.")
            }
            ExplorerNode::Error(message) => TreeItem::leaf(message.clone()),
            ExplorerNode::Workflow(node) => node.tree_item(),
            ExplorerNode::Run(node) => node.tree_item(),
            ExplorerNode::Job(node) => node.tree_item(),
            ExplorerNode::Step(node) => node.tree_item(),
        }
    }
}

pub struct WorkflowNode {
    pub context: Arc<GitHubContext>,
    pub workflow: Workflow,
    pub parsed: Option<ParsedWorkflow>,
    tags: Vec<NodeTag>,
}

impl WorkflowNode {
    pub fn new(
        context: Arc<GitHubContext>,
        workflow: Workflow,
        parsed: Option<ParsedWorkflow>,
    ) -> Self {
        let mut tags = vec![NodeTag::Workflow];
        if let Some(parsed) = parsed {
            if parsed.repository_dispatch() {
                tags.push(NodeTag::RepositoryDispatch);
            }
            if parsed.workflow_dispatch() {
                tags.push(NodeTag::WorkflowDispatch);
            }
        }
        Self {
            context,
            workflow,
            parsed,
            tags,
        }
    }

    pub fn tags(&self) -> &[NodeTag] {
        &self.tags
    }

    fn tree_item(&self) -> TreeItem {
        TreeItem {
            label: self.workflow.name.clone(),
            description: None,
            tooltip: None,
            state: CollapsibleState::Collapsed,
            tags: self.tags.clone(),
            icon: None,
            command: None,
        }
    }
}

pub struct RunNode {
    pub context: Arc<GitHubContext>,
    pub workflow: Workflow,
    pub run: WorkflowRun,
    tags: Vec<NodeTag>,
}

impl RunNode {
    pub fn new(context: Arc<GitHubContext>, workflow: Workflow, run: WorkflowRun) -> Self {
        let mut tags = vec![NodeTag::Run];
        if run.status != RunStatus::Completed {
            tags.push(NodeTag::Cancelable);
        }
        if run.status == RunStatus::Completed && run.conclusion != Some(Conclusion::Success) {
            tags.push(NodeTag::Rerunnable);
        }
        if run.status == RunStatus::Completed {
            tags.push(NodeTag::Completed);
        }
        Self {
            context,
            workflow,
            run,
            tags,
        }
    }

    /// Jobs can only be listed once the run has finished.
    pub fn has_jobs(&self) -> bool {
        self.run.status == RunStatus::Completed
    }

    pub fn tags(&self) -> &[NodeTag] {
        &self.tags
    }

    fn tree_item(&self) -> TreeItem {
        let state = if self.has_jobs() {
            CollapsibleState::Collapsed
        } else {
            CollapsibleState::None
        };
        let conclusion = self.run.conclusion.map_or("", Conclusion::as_str);
        TreeItem {
            label: format!("#{}", self.run.id),
            description: Some(format!("{} ({})", self.run.event, self.run.short_sha())),
            tooltip: Some(format!("{} {}", self.run.status, conclusion)),
            state,
            tags: self.tags.clone(),
            icon: Some(icon_for(self.run.status, self.run.conclusion)),
            command: Some(OPEN_RUN),
        }
    }
}

pub struct JobNode {
    pub context: Arc<GitHubContext>,
    pub job: WorkflowJob,
    tags: Vec<NodeTag>,
}

impl JobNode {
    pub fn new(context: Arc<GitHubContext>, job: WorkflowJob) -> Self {
        let mut tags = vec![NodeTag::Job];
        if job.status == RunStatus::Completed {
            tags.push(NodeTag::Completed);
        }
        Self { context, job, tags }
    }

    pub fn has_steps(&self) -> bool {
        !self.job.steps.is_empty()
    }

    pub fn tags(&self) -> &[NodeTag] {
        &self.tags
    }

    fn tree_item(&self) -> TreeItem {
        let state = if self.has_steps() {
            CollapsibleState::Collapsed
        } else {
            CollapsibleState::None
        };
        TreeItem {
            label: self.job.name.clone(),
            description: None,
            tooltip: None,
            state,
            tags: self.tags.clone(),
            icon: Some(icon_for(self.job.status, self.job.conclusion)),
            command: None,
        }
    }
}

pub struct StepNode {
    pub context: Arc<GitHubContext>,
    pub job: WorkflowJob,
    pub step: WorkflowStep,
    tags: Vec<NodeTag>,
}

impl StepNode {
    pub fn new(context: Arc<GitHubContext>, job: WorkflowJob, step: WorkflowStep) -> Self {
        let mut tags = vec![NodeTag::Step];
        if step.status == RunStatus::Completed {
            tags.push(NodeTag::Completed);
        }
        Self {
            context,
            job,
            step,
            tags,
        }
    }

    pub fn tags(&self) -> &[NodeTag] {
        &self.tags
    }

    fn tree_item(&self) -> TreeItem {
        TreeItem {
            label: self.step.name.clone(),
            description: None,
            tooltip: None,
            state: CollapsibleState::None,
            tags: self.tags.clone(),
            icon: Some(icon_for(self.step.status, self.step.conclusion)),
            command: Some(OPEN_LOGS),
        }
    }
}
