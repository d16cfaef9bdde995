// crates/tickcli/src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tickcore::PipelineConfig;
use tickruntime::{NodeRegistry, Pipeline};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tick")]
#[command(about = "Tick pipeline CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a range -> scale -> log pipeline
    Run {
        /// First value emitted by the source
        #[arg(long, default_value_t = 0)]
        start: i64,

        /// Value at which the source closes (exclusive)
        #[arg(long, default_value_t = 10)]
        end: i64,

        /// Multiplier applied to every value
        #[arg(long, default_value_t = 1)]
        factor: i64,

        /// Path to a pipeline config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the assembled graph in DOT format
        #[arg(long)]
        dot: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List available node types
    Nodes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            start,
            end,
            factor,
            config,
            dot,
            verbose,
        } => {
            init_logging(verbose);
            run_pipeline(start, end, factor, config, dot)?;
        }

        Commands::Nodes => {
            list_nodes();
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    ticknodes::register_all(&mut registry);
    registry
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Ok(PipelineConfig::from_json_str(&json)?)
}

fn run_pipeline(
    start: i64,
    end: i64,
    factor: i64,
    config: Option<PathBuf>,
    dot: bool,
) -> Result<()> {
    let config = load_config(config)?;
    let registry = registry();
    let mut pipeline = Pipeline::with_config(config);

    let source = registry.create_in(
        &mut pipeline,
        "source.range",
        &serde_json::json!({ "start": start, "end": end }),
    )?;
    let scale = registry.create_in(
        &mut pipeline,
        "transform.scale",
        &serde_json::json!({ "factor": factor }),
    )?;
    let sink = registry.create_in(&mut pipeline, "sink.log", &serde_json::json!({ "label": "output" }))?;

    pipeline.connect(source, scale, 0)?;
    pipeline.connect(scale, sink, 0)?;
    pipeline.validate()?;

    if dot {
        print!("{}", pipeline);
    }

    let completed = pipeline.run_configured();

    println!();
    println!("Execution Summary:");
    println!("   Nodes: {}", pipeline.len());
    println!("   Connections: {}", pipeline.connections().len());
    println!("   Ticks: {}", pipeline.ticks());
    if completed {
        println!("   Status: completed");
    } else {
        println!("   Status: stopped at tick limit");
    }

    Ok(())
}

fn list_nodes() {
    println!("Available Node Types:");
    println!();

    let registry = registry();
    for node_type in registry.list_node_types() {
        if let Some(metadata) = registry.get_metadata(&node_type) {
            println!("  • {} ({})", node_type, metadata.category);
            println!("    {}", metadata.description);
        } else {
            println!("  • {}", node_type);
        }
    }
}
