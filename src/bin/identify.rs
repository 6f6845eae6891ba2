use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use subgraph_feature_index::{
    identify::{discover_fragments, IdentifyConfig},
    parser::{read_graphs, write_graphs_file},
    Error, Result, EXPECTED_FRAGMENTS,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Mine and select 50 discriminative subgraphs of a graph database
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graph database to mine
    database: PathBuf,

    /// Output path of the selected fragments
    output: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    info!(path = %args.database.display(), "loading database graphs");
    let graphs = read_graphs(&args.database)?;
    info!(count = graphs.len(), "loaded graphs");

    let start = Instant::now();
    let selection = discover_fragments(&graphs, &IdentifyConfig::default())?;

    info!(
        count = selection.fragments.len(),
        path = %args.output.display(),
        "writing fragments"
    );
    write_graphs_file(&args.output, &selection.fragments)?;

    let written = read_graphs(&args.output)?;
    if written.len() != EXPECTED_FRAGMENTS {
        return Err(Error::FragmentCount {
            expected: EXPECTED_FRAGMENTS,
            found: written.len(),
        });
    }
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "identified {} discriminative subgraphs",
        written.len()
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
