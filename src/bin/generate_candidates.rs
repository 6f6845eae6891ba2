use clap::Parser;
use itertools::{Itertools, MinMaxResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use subgraph_feature_index::{
    features::{filter_candidates, write_candidates},
    npy, Error, Result, EXPECTED_FRAGMENTS,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Narrow each query down to the database graphs whose features contain the query's
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Feature matrix of the database graphs (.npy)
    database: PathBuf,

    /// Feature matrix of the query graphs (.npy)
    queries: PathBuf,

    /// Output path of the candidate lists
    output: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let database = npy::read_file(&args.database)?;
    info!(rows = database.rows(), cols = database.cols(), "loaded database features");
    let queries = npy::read_file(&args.queries)?;
    info!(rows = queries.rows(), cols = queries.cols(), "loaded query features");

    if database.cols() != EXPECTED_FRAGMENTS {
        return Err(Error::FragmentCount {
            expected: EXPECTED_FRAGMENTS,
            found: database.cols(),
        });
    }

    let candidates = filter_candidates(&database, &queries)?;

    let file = File::create(&args.output).map_err(|e| Error::Io {
        path: args.output.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write_candidates(&mut writer, &candidates)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::Io {
            path: args.output.clone(),
            source: e,
        })?;

    let total: usize = candidates.iter().map(Vec::len).sum();
    let (min, max) = match candidates.iter().map(Vec::len).minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(n) => (n, n),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    info!(
        queries = candidates.len(),
        average = total as f64 / candidates.len().max(1) as f64,
        min,
        max,
        database = database.rows(),
        path = %args.output.display(),
        "wrote candidates"
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
