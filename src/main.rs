use clap::Parser;
use color_eyre::eyre::Result;
use ghax::cli::Cli;
use ghax::gh::context::GitResolver;
use ghax::tree::node::{CollapsibleState, ExplorerNode};
use ghax::tree::provider::{ActionsExplorer, TreeDataProvider};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let resolver = GitResolver::new(args.repo, args.token);
    let explorer = ActionsExplorer::new(Arc::new(resolver));

    let roots = explorer.children(None).await;
    if roots.is_empty() {
        println!("No workflows found. Run inside a github.com checkout or pass --repo.");
        return Ok(());
    }
    for node in &roots {
        print_subtree(&explorer, node, 0, args.limit).await;
    }
    Ok(())
}

fn print_subtree<'a>(
    explorer: &'a ActionsExplorer,
    node: &'a ExplorerNode,
    depth: usize,
    limit: usize,
) -> Pin<Box<dyn Future<Output = ()> + 'a>> {
    Box::pin(async move {
        let item = explorer.tree_item(node);
        let glyph = item.icon.map_or(" ", |icon| icon.glyph);
        let mut line = format!("{}{} {}", "  ".repeat(depth), glyph, item.label);
        if let Some(description) = &item.description {
            line.push_str("  ");
            line.push_str(description);
        }
        println!("{}", line);

        if item.state == CollapsibleState::None {
            return;
        }

        let mut children = explorer.children(Some(node)).await;
        if matches!(node, ExplorerNode::Workflow(_)) && children.len() > limit {
            children.truncate(limit);
        }
        for child in &children {
            print_subtree(explorer, child, depth + 1, limit).await;
        }
    })
}
