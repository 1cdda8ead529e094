use color_eyre::eyre::{eyre, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Trigger configuration extracted from a workflow definition file. Only the
/// dispatch triggers matter to the explorer; everything else is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedWorkflow {
    repository_dispatch: bool,
    workflow_dispatch: bool,
}

impl ParsedWorkflow {
    pub fn new(repository_dispatch: bool, workflow_dispatch: bool) -> Self {
        Self {
            repository_dispatch,
            workflow_dispatch,
        }
    }

    pub fn repository_dispatch(self) -> bool {
        self.repository_dispatch
    }

    pub fn workflow_dispatch(self) -> bool {
        self.workflow_dispatch
    }
}

/// Resolves a workflow `path` as reported by the API (relative to the
/// repository root, e.g. `.github/workflows/ci.yml`) to a file on disk.
pub fn locate_workflow_file(repo_root: &Path, path: &str) -> Option<PathBuf> {
    let candidate = repo_root.join(path);
    candidate.is_file().then_some(candidate)
}

pub async fn parse_workflow(path: &Path) -> Result<ParsedWorkflow> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_triggers(&text)
}

/// Interprets the `on:` section of a workflow definition. All three YAML
/// shapes are valid: a scalar event name, a sequence of event names, or a
/// mapping from event name to its configuration.
pub fn parse_triggers(text: &str) -> Result<ParsedWorkflow> {
    let doc: Value = serde_yaml::from_str(text)?;
    let on = on_value(&doc).ok_or_else(|| eyre!("workflow definition has no `on` section"))?;

    let mut parsed = ParsedWorkflow::default();
    match on {
        Value::String(event) => note_event(&mut parsed, event),
        Value::Sequence(events) => {
            for event in events {
                if let Value::String(event) = event {
                    note_event(&mut parsed, event);
                }
            }
        }
        Value::Mapping(events) => {
            for event in events.keys() {
                if let Value::String(event) = event {
                    note_event(&mut parsed, event);
                }
            }
        }
        _ => return Err(eyre!("unsupported `on` value in workflow definition")),
    }
    Ok(parsed)
}

// YAML 1.1 loaders read a bare `on` key as boolean true; accept both spellings.
fn on_value(doc: &Value) -> Option<&Value> {
    let mapping = doc.as_mapping()?;
    mapping
        .get(&Value::String("on".to_string()))
        .or_else(|| mapping.get(&Value::Bool(true)))
}

fn note_event(parsed: &mut ParsedWorkflow, event: &str) {
    match event {
        "repository_dispatch" => parsed.repository_dispatch = true,
        "workflow_dispatch" => parsed.workflow_dispatch = true,
        _ => {}
    }
}
