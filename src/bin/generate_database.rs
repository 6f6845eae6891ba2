use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;
use subgraph_feature_index::{
    generator::{random_database, GeneratorConfig},
    parser::write_graphs_file,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Generate a random labeled graph database in the line-oriented graph format.
///
/// Every graph is connected: a random spanning tree is laid down first and
/// extra edges are then added between non-adjacent vertices with probability
/// `density`.
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate random labeled graph databases")]
struct Args {
    /// Number of graphs to generate
    #[arg(long, default_value_t = 100)]
    graphs: usize,

    /// Smallest vertex count of a graph
    #[arg(long, default_value_t = 4)]
    min_vertices: usize,

    /// Largest vertex count of a graph
    #[arg(long, default_value_t = 12)]
    max_vertices: usize,

    /// Probability of an extra edge between two non-adjacent vertices
    #[arg(long, default_value_t = 0.15)]
    density: f64,

    /// Number of distinct vertex labels
    #[arg(long, default_value_t = 6)]
    vertex_labels: usize,

    /// Number of distinct edge labels
    #[arg(long, default_value_t = 3)]
    edge_labels: usize,

    /// Random seed (if omitted, uses entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file path
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.min_vertices > args.max_vertices {
        error!("min-vertices must not exceed max-vertices");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&args.density) {
        error!("density must be in [0,1]");
        std::process::exit(1);
    }
    if args.vertex_labels == 0 || args.edge_labels == 0 {
        error!("label counts must be positive");
        std::process::exit(1);
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);

    let config = GeneratorConfig {
        graphs: args.graphs,
        min_vertices: args.min_vertices,
        max_vertices: args.max_vertices,
        density: args.density,
        vertex_labels: args.vertex_labels,
        edge_labels: args.edge_labels,
    };
    let database = random_database(&config, &mut rng);

    let edges: usize = database.iter().map(|g| g.num_edges()).sum();
    info!(graphs = database.len(), edges, seed, path = %args.output.display(), "generated database");

    if let Err(e) = write_graphs_file(&args.output, &database) {
        error!("{e}");
        std::process::exit(1);
    }
}
