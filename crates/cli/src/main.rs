use anyhow::{Context, Result};
use clap::Parser;
use incull_engine::{KeepPolicy, Optimizer};
use incull_graph::UnitGraph;
use incull_oracle::{CommandOracle, DEFAULT_COMPILE_TEMPLATE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "incull")]
#[command(about = "Cull unnecessary #include directives, using the real build as the oracle", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory to optimize (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Compile command template; {file} and {root} are substituted
    #[arg(long, default_value = DEFAULT_COMPILE_TEMPLATE)]
    compile: String,

    /// Directive identifier glob to keep verbatim (repeatable)
    #[arg(long = "keep", value_name = "GLOB")]
    keep: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,

    /// Output run statistics as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let root = cli.path.canonicalize().context("Invalid project path")?;
    let keep = KeepPolicy::new(&cli.keep).context("Invalid --keep pattern")?;

    let graph = UnitGraph::load(&root)
        .with_context(|| format!("Failed to load project at {}", root.display()))?;
    if graph.unit_count() == 0 {
        anyhow::bail!("No source units found under {}", root.display());
    }

    let oracle = CommandOracle::new(root.clone(), cli.compile.clone());
    let optimizer = Optimizer::new(graph, oracle, root, keep);
    let (_, stats) = optimizer.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        eprintln!(
            "Optimized {} units in {}ms: {} removed, {} spliced, {} kept ({} compile trials)",
            stats.units, stats.time_ms, stats.removed, stats.spliced, stats.kept, stats.trials
        );
    }
    Ok(())
}
