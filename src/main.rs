use anyhow::Result;
use clap::Parser;
use graph::diagnostics::{format_topology, save_positions};
use graph::{layout, GitWalker, GridRenderer, RenderConfig};
use std::io::{self, IsTerminal, Write};

mod logging;
mod settings;
mod viewer;

use settings::{Settings, POSITIONS_FILE};

#[derive(Parser, Debug)]
#[command(name = "git-graph")]
#[command(author, version, about = "Draw the commit graph of a git repository", long_about = None)]
struct Cli {
    /// Revisions or ranges to show (default: all refs)
    revisions: Vec<String>,

    /// Path to the repository
    #[arg(short = 'C', long = "repo", default_value = ".")]
    repo: String,

    /// Limit the number of commits loaded
    #[arg(short = 'n', long)]
    max_count: Option<usize>,

    /// Print the graph instead of opening the viewer
    #[arg(long)]
    no_pager: bool,

    /// Disable lane colours
    #[arg(long)]
    no_color: bool,

    /// Truncate commit messages to this many characters
    #[arg(long)]
    message_width: Option<usize>,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        let config = RenderConfig::default().with_color(!self.no_color);
        match self.message_width {
            Some(width) => config.with_message_width(width),
            None => config,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::from_env();
    logging::init(settings.log_level);

    let config = cli.render_config();
    config.validate()?;

    let walker = GitWalker::new(Some(&cli.repo))?;
    let commits = walker.load(&cli.revisions, cli.max_count)?;

    let layout = layout(commits)?;
    if settings.debug_enabled() {
        tracing::debug!("layout:\n{}", format_topology(&layout.graph, &layout.topology.children));
    }
    if settings.save_json {
        save_positions(&layout.graph, POSITIONS_FILE)?;
    }

    let rendered = GridRenderer::new(&config).render(&layout)?;

    if cli.no_pager || !io::stdout().is_terminal() {
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    viewer::run(&rendered, &cli.repo, |hash| walker.commit_details(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["git-graph"]);
        assert!(cli.revisions.is_empty());
        assert_eq!(cli.repo, ".");
        assert_eq!(cli.max_count, None);
        assert_eq!(cli.render_config(), RenderConfig::default());
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::parse_from([
            "git-graph", "-C", "/tmp/repo", "-n", "50", "--no-color", "--message-width", "40", "main", "v1..v2",
        ]);
        assert_eq!(cli.revisions, vec!["main".to_string(), "v1..v2".to_string()]);
        assert_eq!(cli.repo, "/tmp/repo");
        assert_eq!(cli.max_count, Some(50));

        let config = cli.render_config();
        assert!(!config.color);
        assert_eq!(config.message_width, 40);
    }
}
