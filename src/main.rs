use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use louds::{
    duplicated_values, mismatches, write_report, BitVector, Navigate, ReferenceTree, SuccinctTree,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "louds", about = "Compare LOUDS succinct trees with pointer trees")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a random tree and print every node of its LOUDS encoding.
    Print {
        /// Number of nodes to generate.
        #[arg(long, default_value_t = 30)]
        nodes: usize,
        /// Seed for the tree generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Rank/select backend for the shape.
        #[arg(long, value_enum, default_value_t = Backend::Naive)]
        backend: Backend,
    },
    /// Build both representations for each size, check they agree and print sizes.
    Compare {
        /// Comma-separated node counts.
        #[arg(long, value_delimiter = ',', default_values_t = [10, 50, 100, 500, 1000, 5000, 10000])]
        nodes: Vec<usize>,
        /// Seed for the tree generator.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Linear-scan rank/select, no index.
    Naive,
    /// Rank9 index.
    Rank9,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Print {
            nodes,
            seed,
            backend,
        } => run_print(nodes, seed, backend),
        Commands::Compare { nodes, seed } => run_compare(&nodes, seed),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_print(nodes: usize, seed: u64, backend: Backend) -> Result<ExitCode> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tree = ReferenceTree::generate(nodes, &mut rng)
        .with_context(|| format!("failed to generate a tree with {nodes} nodes"))?;
    let louds = SuccinctTree::from_tree(&tree).context("failed to encode tree")?;
    let shape = louds.shape().to_string();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match backend {
        Backend::Naive => write_report(&mut out, &louds, louds.values())?,
        Backend::Rank9 => {
            let indexed = louds.into_backend::<BitVector>();
            write_report(&mut out, &indexed, indexed.values())?;
        }
    }
    writeln!(out, "{shape}")?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}

fn run_compare(sizes: &[usize], seed: u64) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "nodes\tpointer_bits\tlouds_bits\taux_index_bits\trank9_index_bits"
    )?;

    let mut failed = false;
    for &nodes in sizes {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tree = ReferenceTree::generate(nodes, &mut rng)
            .with_context(|| format!("failed to generate a tree with {nodes} nodes"))?;
        let naive = SuccinctTree::from_tree(&tree).context("failed to encode tree")?;
        let indexed = naive.clone().into_backend::<BitVector>();

        let dups = duplicated_values(tree.values());
        for value in &dups {
            debug!(nodes, value, "skipping duplicated value");
        }
        let unique = || tree.values().filter(|value| !dups.contains(value));

        let checks: [(&str, &dyn Navigate); 2] = [("naive", &naive), ("rank9", &indexed)];
        for (backend, louds) in checks {
            let diverged = mismatches(&tree, louds, unique());
            for mismatch in &diverged {
                error!(
                    nodes,
                    backend,
                    value = mismatch.left.value,
                    pointer = ?mismatch.left,
                    louds = ?mismatch.right,
                    "representations disagree"
                );
            }
            failed |= !diverged.is_empty();
            info!(
                nodes,
                backend,
                skipped = dups.len(),
                mismatches = diverged.len(),
                "compared representations"
            );
        }

        // Rank9 storage beyond the raw shape bits.
        let rank9_index_bits =
            (indexed.shape().heap_bytes() * 8).saturating_sub(naive.size_in_bits());
        writeln!(
            out,
            "{nodes}\t{}\t{}\t{}\t{rank9_index_bits}",
            tree.size_in_bits(),
            naive.size_in_bits(),
            naive.aux_index_bits()
        )?;
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
