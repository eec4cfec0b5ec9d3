use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::fs;

use labrador::allocator::{self, AssignedPairs};
use labrador::catalog::{self, Catalog, Problem};
use labrador::roster::SeatedParticipant;

/// Bulk-allocates one initial problem per seated participant, avoiding
/// clashes between grid-adjacent seats.
#[derive(Parser)]
struct Cli {
    /// Path to the roster JSON (participants with room and seat labels).
    #[clap(long, short = 'p')]
    roster: String,
    /// Path to a catalog JSON. If not provided, uses the built-in catalog.
    #[clap(long, default_value = "")]
    catalog: String,
    /// Path to output file. If not provided, outputs to stdout.
    #[clap(long, short = 'o', default_value = "")]
    output: String,
    #[clap(long, short = 'c', default_value_t = false)]
    compact: bool,
    /// RNG seed for reproducible runs.
    #[clap(long, short = 's')]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let roster: Vec<SeatedParticipant> =
        serde_json::from_slice(&fs::read(&args.roster).context("Failed to read roster file")?)
            .context("Failed to parse roster JSON")?;
    let catalog: Catalog = if args.catalog.is_empty() {
        catalog::builtin().clone()
    } else {
        serde_json::from_slice(&fs::read(&args.catalog).context("Failed to read catalog file")?)
            .context("Failed to parse catalog JSON")?
    };

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut assigned = AssignedPairs::default();
    let allocated = allocator::allocate_all(&roster, &mut assigned, &catalog, &mut rng);
    eprintln!(
        "[allocate] seeded {} of {} participants from a catalog of {} problems",
        allocated.len(),
        roster.len(),
        catalog.len()
    );

    // Sorted keys keep the output diffable across runs.
    let ordered: BTreeMap<String, Vec<Problem>> = allocated.into_iter().collect();

    use std::io::Write;
    let mut w: Box<dyn Write> = if args.output.is_empty() {
        Box::new(std::io::stdout())
    } else {
        Box::new(fs::File::create(&args.output)?)
    };
    if args.compact {
        serde_json::to_writer(&mut w, &ordered)?;
    } else {
        serde_json::to_writer_pretty(&mut w, &ordered)?;
    }
    Ok(())
}
