use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use subgraph_feature_index::{
    features::FeatureMatrix, npy, parser::read_graphs, Error, Result, EXPECTED_FRAGMENTS,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Encode every graph as a 0/1 vector over a set of discriminative fragments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Graph collection to encode
    graphs: PathBuf,

    /// Discriminative fragments, exactly 50 graphs
    fragments: PathBuf,

    /// Output path of the feature matrix (.npy)
    features: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    info!(path = %args.graphs.display(), "loading graphs");
    let graphs = read_graphs(&args.graphs)?;
    info!(count = graphs.len(), "loaded graphs");

    info!(path = %args.fragments.display(), "loading discriminative subgraphs");
    let fragments = read_graphs(&args.fragments)?;
    info!(count = fragments.len(), "loaded fragments");
    if fragments.len() != EXPECTED_FRAGMENTS {
        return Err(Error::FragmentCount {
            expected: EXPECTED_FRAGMENTS,
            found: fragments.len(),
        });
    }

    let start = Instant::now();
    let matrix = FeatureMatrix::build(&graphs, &fragments);
    npy::write_file(&args.features, &matrix)?;

    info!(
        rows = matrix.rows(),
        cols = matrix.cols(),
        ones = matrix.count_ones(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        path = %args.features.display(),
        "wrote feature matrix"
    );
    if matrix.rows() > 0 && matrix.count_ones() == 0 {
        warn!("all features are 0; every query will return the entire database");
    }
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
