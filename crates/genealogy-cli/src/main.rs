//! Genealogy — academic supervision trees from theses.fr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use genealogy_core::config::DEFAULT_MAX_DEPTH;
use genealogy_core::GenealogyConfig;
use genealogy_fetch::HttpThesisSource;
use genealogy_graph::{GraphSnapshot, Traversal};
use genealogy_tree::render::render_file;
use genealogy_tree::{project, project_snapshot, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "genealogy", version, about = "Academic supervision trees from theses.fr")]
struct Cli {
    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover the supervision graph below a person and write a snapshot.
    Run {
        /// theses.fr person identifier (PPN) to start from.
        root_person_id: String,
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: u32,
        /// Snapshot path [default: genealogy_<root_person_id>.json]
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Turn a snapshot into a nested tree JSON.
    Project {
        snapshot_file: PathBuf,
        tree_file: PathBuf,
        /// Root to project from instead of the snapshot's own root.
        #[arg(long)]
        root: Option<String>,
    },
    /// Inject a tree JSON into the HTML visualization template.
    Render {
        tree_file: PathBuf,
        html_file: PathBuf,
        /// Display name for the root node.
        #[arg(long)]
        name: Option<String>,
        /// Template to use instead of the bundled one.
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Run {
            root_person_id,
            max_depth,
            output,
        } => run(root_person_id, max_depth, output).await,
        Command::Project {
            snapshot_file,
            tree_file,
            root,
        } => project_file(snapshot_file, tree_file, root),
        Command::Render {
            tree_file,
            html_file,
            name,
            template,
        } => {
            let options = RenderOptions { central_name: name };
            render_file(&tree_file, &html_file, template.as_deref(), &options)
                .with_context(|| format!("Failed to render {}", html_file.display()))
        }
    }
}

async fn run(root_person_id: String, max_depth: u32, output: Option<PathBuf>) -> anyhow::Result<()> {
    let config = GenealogyConfig::from_env().with_max_depth(max_depth);
    info!("Search endpoint: {}", config.search_url);

    let source = HttpThesisSource::new(&config)?;
    let store = Traversal::new(source, &config).run(&root_person_id).await;

    println!("{}", store.summary());

    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("genealogy_{}.json", root_person_id)));
    store
        .export()
        .write_to(&output)
        .with_context(|| format!("Failed to write snapshot {}", output.display()))?;
    println!("Data written to {}", output.display());
    Ok(())
}

fn project_file(snapshot_file: PathBuf, tree_file: PathBuf, root: Option<String>) -> anyhow::Result<()> {
    let snapshot = GraphSnapshot::read_from(&snapshot_file)
        .with_context(|| format!("Failed to read snapshot {}", snapshot_file.display()))?;

    let tree = match root.as_deref() {
        Some(root) => project(&snapshot, root),
        None => project_snapshot(&snapshot)?,
    };

    std::fs::write(&tree_file, serde_json::to_string_pretty(&tree)?)
        .with_context(|| format!("Failed to write tree {}", tree_file.display()))?;
    info!("Tree of {} nodes written to {}", tree.size(), tree_file.display());
    Ok(())
}
