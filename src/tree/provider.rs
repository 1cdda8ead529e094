use crate::gh::context::{ContextResolver, GitHubContext, TOKEN_ERROR_PREFIX};
use crate::model::Workflow;
use crate::tree::node::{ExplorerNode, JobNode, RunNode, StepNode, TreeItem, WorkflowNode};
use crate::workflow::{locate_workflow_file, parse_workflow, ParsedWorkflow};
use async_trait::async_trait;
use color_eyre::eyre::Result;
use color_eyre::Report;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Invalidation event delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalidation {
    /// Subtree to discard, by run id. Always `None` today: the whole tree is
    /// invalidated and the host re-queries from the root.
    pub target: Option<u64>,
}

/// Contract the host renders against.
#[async_trait]
pub trait TreeDataProvider: Send + Sync {
    type Node;

    /// Children of `node`; `None` requests the root listing.
    async fn children(&self, node: Option<&Self::Node>) -> Vec<Self::Node>;

    /// Pure projection of a node into its display shape.
    fn tree_item(&self, node: &Self::Node) -> TreeItem;
}

/// Lazily populates the workflow → run → job → step tree, one fetch per
/// depth. Fetch failures never propagate to the host: each failed expansion
/// degrades to a single informative leaf under the requesting parent.
pub struct ActionsExplorer {
    resolver: Arc<dyn ContextResolver>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Invalidation>>>,
}

impl ActionsExplorer {
    pub fn new(resolver: Arc<dyn ContextResolver>) -> Self {
        Self {
            resolver,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Registers an invalidation listener. Dropped receivers are pruned on
    /// the next `refresh`.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<Invalidation> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Signals the host to discard its cached tree and re-query the root.
    /// Each call delivers exactly one event per live subscriber.
    pub fn refresh(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.send(Invalidation { target: None }).is_ok());
    }

    async fn root_nodes(&self) -> Vec<ExplorerNode> {
        match self.fetch_workflows().await {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("root listing failed: {}", e);
                vec![classify_root_failure(&e)]
            }
        }
    }

    async fn fetch_workflows(&self) -> Result<Vec<ExplorerNode>> {
        let Some(context) = self.resolver.resolve().await? else {
            return Ok(Vec::new());
        };
        let context = Arc::new(context);

        let mut workflows = context
            .api
            .list_workflows(&context.owner, &context.name)
            .await?;
        sort_by_name(&mut workflows);

        let mut nodes = Vec::with_capacity(workflows.len());
        for wf in workflows {
            let parsed = resolve_triggers(&context, &wf).await;
            nodes.push(ExplorerNode::Workflow(WorkflowNode::new(
                Arc::clone(&context),
                wf,
                parsed,
            )));
        }
        Ok(nodes)
    }
}

#[async_trait]
impl TreeDataProvider for ActionsExplorer {
    type Node = ExplorerNode;

    async fn children(&self, node: Option<&ExplorerNode>) -> Vec<ExplorerNode> {
        match node {
            None => self.root_nodes().await,
            Some(ExplorerNode::Workflow(wf)) => expand_workflow(wf).await,
            Some(ExplorerNode::Run(run)) if run.has_jobs() => expand_run(run).await,
            Some(ExplorerNode::Job(job)) if job.has_steps() => expand_job(job),
            Some(_) => Vec::new(),
        }
    }

    fn tree_item(&self, node: &ExplorerNode) -> TreeItem {
        node.tree_item()
    }
}

async fn expand_workflow(node: &WorkflowNode) -> Vec<ExplorerNode> {
    let context = &node.context;
    match context
        .api
        .list_runs(&context.owner, &context.name, node.workflow.id)
        .await
    {
        // API response order is preserved; the API already returns newest first.
        Ok(runs) => runs
            .into_iter()
            .map(|run| {
                ExplorerNode::Run(RunNode::new(
                    Arc::clone(context),
                    node.workflow.clone(),
                    run,
                ))
            })
            .collect(),
        Err(e) => vec![fetch_failure(&e)],
    }
}

async fn expand_run(node: &RunNode) -> Vec<ExplorerNode> {
    let context = &node.context;
    match context
        .api
        .list_jobs(&context.owner, &context.name, node.run.id)
        .await
    {
        Ok(jobs) => jobs
            .into_iter()
            .map(|job| ExplorerNode::Job(JobNode::new(Arc::clone(context), job)))
            .collect(),
        Err(e) => vec![fetch_failure(&e)],
    }
}

fn expand_job(node: &JobNode) -> Vec<ExplorerNode> {
    node.job
        .steps
        .iter()
        .map(|step| {
            ExplorerNode::Step(StepNode::new(
                Arc::clone(&node.context),
                node.job.clone(),
                step.clone(),
            ))
        })
        .collect()
}

/// Locates and parses the workflow's definition file. Every failure is
/// swallowed here so one unreadable definition never affects its siblings;
/// the workflow simply lists without dispatch tags.
async fn resolve_triggers(context: &GitHubContext, wf: &Workflow) -> Option<ParsedWorkflow> {
    let root = context.repo_root.as_deref()?;
    let file = locate_workflow_file(root, &wf.path)?;
    match parse_workflow(&file).await {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(workflow = %wf.path, "skipping unparseable workflow definition: {}", e);
            None
        }
    }
}

/// Token acquisition failures get a dedicated sign-in leaf; anything else
/// surfaces its message.
fn classify_root_failure(err: &Report) -> ExplorerNode {
    let message = err.to_string();
    if message.starts_with(TOKEN_ERROR_PREFIX) {
        ExplorerNode::AuthenticationRequired
    } else {
        fetch_failure(err)
    }
}

fn fetch_failure(err: &Report) -> ExplorerNode {
    ExplorerNode::Error(format!("An error has occurred: {}", err))
}

fn sort_by_name(workflows: &mut [Workflow]) {
    workflows.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_case_insensitive_ascending() {
        let mut workflows: Vec<Workflow> = ["Zeta", "alpha", "Beta"]
            .iter()
            .enumerate()
            .map(|(i, name)| Workflow {
                id: i as u64,
                name: (*name).to_string(),
                path: format!(".github/workflows/{}.yml", name),
            })
            .collect();
        sort_by_name(&mut workflows);
        let names: Vec<&str> = workflows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Beta", "Zeta"]);
    }

    #[test]
    fn sort_breaks_case_ties_deterministically() {
        let mut workflows: Vec<Workflow> = ["ci", "CI"]
            .iter()
            .map(|name| Workflow {
                id: 0,
                name: (*name).to_string(),
                path: String::new(),
            })
            .collect();
        sort_by_name(&mut workflows);
        let names: Vec<&str> = workflows.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["CI", "ci"]);
    }
}
