use anyhow::Context;
use clap::Parser;
use std::fs;

use labrador::packer;
use labrador::roster::{self, SeatedParticipant};

/// Packs the event roster into lab rooms and prints the seat allocation.
#[derive(Parser)]
struct Cli {
    /// Path to the room configuration JSON (list of rooms with quotas).
    #[clap(long, short = 'r')]
    rooms: String,
    /// Path to the roster JSON (participants with team ids).
    #[clap(long, short = 'p')]
    roster: String,
    /// Path to output file. If not provided, outputs to stdout.
    #[clap(long, short = 'o', default_value = "")]
    output: String,
    #[clap(long, short = 'c', default_value_t = false)]
    compact: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let rooms: Vec<packer::RoomConfig> =
        serde_json::from_slice(&fs::read(&args.rooms).context("Failed to read rooms file")?)
            .context("Failed to parse rooms JSON")?;
    let participants: Vec<SeatedParticipant> =
        serde_json::from_slice(&fs::read(&args.roster).context("Failed to read roster file")?)
            .context("Failed to parse roster JSON")?;

    let teams = roster::group_teams(&participants);
    eprintln!(
        "[pack] {} participants in {} teams across {} rooms",
        participants.len(),
        teams.len(),
        rooms.len()
    );

    let outcome = packer::pack(&rooms, &teams);
    if !outcome.is_feasible() {
        for unplaced in &outcome.unplaced {
            eprintln!(
                "[pack] unplaced: team {} (size {}): {}",
                unplaced.team_id, unplaced.size, unplaced.reason
            );
        }
        anyhow::bail!(
            "packing infeasible: {} team(s) unplaced, nothing committed",
            outcome.unplaced.len()
        );
    }
    eprintln!("[pack] all teams placed, {} seats", outcome.allocations.len());

    use std::io::Write;
    let mut w: Box<dyn Write> = if args.output.is_empty() {
        Box::new(std::io::stdout())
    } else {
        Box::new(fs::File::create(&args.output)?)
    };
    if args.compact {
        serde_json::to_writer(&mut w, &outcome.allocations)?;
    } else {
        serde_json::to_writer_pretty(&mut w, &outcome.allocations)?;
    }
    Ok(())
}
