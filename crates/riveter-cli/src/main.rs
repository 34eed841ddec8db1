//! CLI binary for exporting and validating Riveter pipeline documents.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use riveter_store::PipelineStore;
use riveter_types::PipelineDocument;

#[derive(Parser)]
#[command(name = "riveter", version, about = "Graph-based CI workflow authoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a pipeline document to workflow YAML
    Export {
        /// Path to the pipeline .json document
        document: PathBuf,

        /// Output file path (default: workflow.yml, or pipeline.yml with --positional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the simplified position-ordered export
        #[arg(long)]
        positional: bool,
    },

    /// Check a pipeline document and its rendered output
    Validate {
        /// Path to the pipeline .json document
        document: PathBuf,
    },

    /// Show information about a pipeline document
    Info {
        /// Path to the pipeline .json document
        document: PathBuf,
    },

    /// List the built-in action templates
    Catalog {
        /// Only show one category
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Export {
            document,
            output,
            positional,
        } => cmd_export(&document, output.as_deref(), positional),
        Commands::Validate { document } => cmd_validate(&document),
        Commands::Info { document } => cmd_info(&document),
        Commands::Catalog { category } => cmd_catalog(category.as_deref()),
    }
}

/// Load a document and replay it through the store, so imports are normalized
/// the same way the editor normalizes them.
fn load_store(path: &Path) -> anyhow::Result<PipelineStore> {
    let doc = PipelineDocument::load(path)?;
    let mut store = PipelineStore::new();
    store.import_document(doc);
    Ok(store)
}

fn cmd_export(path: &Path, output: Option<&Path>, positional: bool) -> anyhow::Result<()> {
    let store = load_store(path)?;

    let (yaml, default_name) = if positional {
        (riveter_yaml::render_positional(store.nodes()), "pipeline.yml")
    } else {
        (
            riveter_yaml::render_workflow(store.nodes(), store.connections(), store.triggers()),
            "workflow.yml",
        )
    };

    riveter_yaml::debug_check(&yaml);

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_name));
    std::fs::write(&output, &yaml)?;

    println!("Exported {} step(s) to {}", store.nodes().len(), output.display());
    Ok(())
}

fn cmd_validate(path: &Path) -> anyhow::Result<()> {
    let store = load_store(path)?;
    let yaml = riveter_yaml::render_workflow(store.nodes(), store.connections(), store.triggers());

    let mut findings =
        riveter_yaml::lint_graph(store.nodes(), store.connections(), store.triggers());
    findings.extend(riveter_yaml::check_document(&yaml));

    if findings.is_empty() {
        println!("Pipeline is valid");
        return Ok(());
    }

    let mut has_error = false;
    for finding in &findings {
        let severity = match finding.severity {
            riveter_yaml::Severity::Error => {
                has_error = true;
                "ERROR"
            }
            riveter_yaml::Severity::Warning => "WARN",
        };
        println!("[{}] {}: {}", severity, finding.rule, finding.message);
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_info(path: &Path) -> anyhow::Result<()> {
    let store = load_store(path)?;

    println!("Nodes: {}", store.nodes().len());
    println!("Connections: {}", store.connections().len());

    let enabled: Vec<&str> = riveter_types::TriggerKind::ALL
        .iter()
        .filter(|k| store.triggers().is_enabled(**k))
        .map(|k| k.as_key())
        .collect();
    println!("Triggers: {}", enabled.join(", "));

    if !store.nodes().is_empty() {
        println!("\nExecution order:");
        for index in riveter_yaml::topological_order(store.nodes(), store.connections()) {
            let node = &store.nodes()[index];
            println!("  {} [{}] type={}", node.id, node.name, node.kind);
        }
    }

    Ok(())
}

fn cmd_catalog(category: Option<&str>) -> anyhow::Result<()> {
    let catalog = riveter_catalog::Catalog::builtin();

    for cat in &catalog.categories {
        if let Some(filter) = category {
            if !cat.title.eq_ignore_ascii_case(filter) {
                continue;
            }
        }
        println!("{}", cat.title);
        for template in &cat.nodes {
            let badge = if template.is_official() { " (official)" } else { "" };
            println!(
                "  {:<20} {} -- {}{}",
                template.kind, template.marketplace, template.description, badge
            );
        }
        println!();
    }

    Ok(())
}
