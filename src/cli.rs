use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ghax", version, about = "GitHub Actions workflow explorer")]
pub struct Cli {
    /// Repository in owner/repo format (auto-detected from the origin remote)
    #[arg(short, long)]
    pub repo: Option<String>,

    /// GitHub token (defaults to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Maximum number of runs printed per workflow
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}
