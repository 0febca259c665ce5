use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evaluation_graph::config::EvaluationConfig;
use evaluation_graph::layout::{BucketLayout, PosterLayout};
use evaluation_graph::parser::Source;
use evaluation_graph::{graph, models, report};

#[derive(Parser)]
#[command(name = "evaluation-graph")]
#[command(about = "Similarity graphs and poster layouts for student evaluation statements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("source")
        .args(["csv", "padlet_json"])
        .required(true)
        .multiple(false)
))]
struct SourceArgs {
    /// CSV file with Category,Statement,Comment columns
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Padlet board document saved with posts and sections included
    #[arg(long)]
    padlet_json: Option<PathBuf>,
}

impl SourceArgs {
    fn source(&self) -> anyhow::Result<Source> {
        match (&self.csv, &self.padlet_json) {
            (Some(path), _) => Ok(Source::Csv(path.clone())),
            (_, Some(path)) => Ok(Source::PadletExport(path.clone())),
            _ => anyhow::bail!("either --csv or --padlet-json is required"),
        }
    }
}

#[derive(Args)]
struct GraphArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Evaluation type, e.g. delphi, dsc, retro
    #[arg(long = "type", default_value = "delphi")]
    evaluation_type: String,
    /// Minimum similarity for an edge
    #[arg(long, env = "EVAL_GRAPH_THRESHOLD", default_value_t = graph::DEFAULT_THRESHOLD)]
    threshold: f64,
    /// JSON bucket table replacing the evaluation type's poster layout
    #[arg(long)]
    layout: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List statements per category
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the flattened statement list, ignoring categories
    Statements {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Build the similarity graph and write it as JSON
    Graph {
        #[command(flatten)]
        args: GraphArgs,
        /// Output file, defaults to graph-<type>-<date>.json
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        args: GraphArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Find which category a statement belongs to
    Locate {
        #[command(flatten)]
        source: SourceArgs,
        /// Statement text, or a fragment of it
        text: String,
    },
    /// List known evaluation types
    Types,
}

struct Prepared {
    config: EvaluationConfig,
    categorized: models::Categorized,
    graph: models::GraphData,
    threshold: f64,
}

fn load_layout(args: &GraphArgs, config: &EvaluationConfig) -> anyhow::Result<PosterLayout> {
    if let Some(path) = &args.layout {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read layout {}", path.display()))?;
        let buckets: Vec<BucketLayout> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid layout table in {}", path.display()))?;
        return Ok(PosterLayout::new(buckets)?);
    }

    Ok(config.poster_layout().unwrap_or_else(|| {
        warn!(
            evaluation_type = config.kind,
            categories = config.category_count(),
            "no poster layout for this evaluation type; nodes stay unpositioned"
        );
        PosterLayout::default()
    }))
}

fn prepare(args: &GraphArgs) -> anyhow::Result<Prepared> {
    let config = EvaluationConfig::from_name(&args.evaluation_type)?;
    let layout = load_layout(args, &config)?;

    info!(evaluation_type = config.kind, "parsing statements");
    let categorized = args.source.source()?.load()?;
    if categorized.is_empty() {
        anyhow::bail!("no statements found in input");
    }

    info!(threshold = args.threshold, "calculating similarities");
    let graph = graph::build_graph(&categorized, args.threshold, &layout)?;
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph built"
    );

    let unpositioned = graph.nodes.iter().filter(|n| !n.is_positioned()).count();
    if unpositioned > 0 {
        warn!(unpositioned, "some statements fall outside the poster regions");
    }

    Ok(Prepared {
        config,
        categorized,
        graph,
        threshold: args.threshold,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evaluation_graph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { source } => {
            let categorized = source.source()?.load()?;
            print!("{}", report::statement_summary(&categorized));
        }
        Commands::Statements { source } => {
            let categorized = source.source()?.load()?;
            for statement in models::flatten_statements(&categorized) {
                println!("{statement}");
            }
        }
        Commands::Graph { args, out } => {
            let prepared = prepare(&args)?;
            let out = out.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "graph-{}-{}.json",
                    prepared.config.kind,
                    chrono::Local::now().date_naive()
                ))
            });
            let json = serde_json::to_string_pretty(&prepared.graph)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!(
                "Graph with {} nodes and {} edges written to {}.",
                prepared.graph.nodes.len(),
                prepared.graph.edges.len(),
                out.display()
            );
        }
        Commands::Report { args, out } => {
            let prepared = prepare(&args)?;
            let report = report::build_report(
                &prepared.config,
                chrono::Local::now().date_naive(),
                prepared.threshold,
                &prepared.categorized,
                &prepared.graph,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Locate { source, text } => {
            let categorized = source.source()?.load()?;
            match graph::find_statement_category(&text, &categorized) {
                Some(category) => println!("{category}"),
                None => println!("No category contains this statement."),
            }
        }
        Commands::Types => {
            for config in EvaluationConfig::all() {
                let categories: Vec<String> =
                    config.categories.iter().map(|c| c.display_name()).collect();
                let layout = if config.poster_layout().is_some() {
                    "poster layout"
                } else {
                    "no poster layout"
                };
                println!(
                    "- {} \"{}\": {} ({})",
                    config.kind,
                    config.title,
                    categories.join(", "),
                    layout
                );
            }
        }
    }

    Ok(())
}
