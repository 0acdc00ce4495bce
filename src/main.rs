//! Terminal duel: pick an ability by number each round.

use anyhow::{Context, Result};
use clap::Parser;
use pokemon_duel::display::TextDisplay;
use pokemon_duel::roster::{Roster, DEFAULT_OPPONENT, DEFAULT_PLAYER};
use pokemon_duel::{Encounter, PolicyKind};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pokemon-duel")]
#[command(about = "A turn-based Pokemon duel in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Species controlled by you
    #[arg(short, long, default_value = DEFAULT_PLAYER)]
    player: String,

    /// Species controlled by the computer
    #[arg(short, long, default_value = DEFAULT_OPPONENT)]
    opponent: String,

    /// RON file replacing the built-in species roster
    #[arg(short, long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Opponent policy: first, first-usable, greedy or random
    #[arg(long, default_value = "first")]
    policy: PolicyKind,

    /// Seed for reproducible damage rolls and opponent choices
    #[arg(long)]
    seed: Option<u64>,

    /// Print the available species and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let roster = match &cli.roster {
        Some(path) => Roster::load(path)
            .with_context(|| format!("failed to load roster from {}", path.display()))?,
        None => Roster::builtin().context("built-in roster is unreadable")?,
    };

    if cli.list {
        print!("{}", pokemon_duel::interface::available_species_display(&roster));
        return Ok(());
    }

    let mut encounter = new_encounter(&roster, &cli)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "q" | "quit" => break,
            "r" | "restart" => encounter = new_encounter(&roster, &cli)?,
            "" => continue,
            input => {
                let Ok(choice) = input.parse::<usize>() else {
                    println!("Enter an ability number, 'r' to restart or 'q' to quit.");
                    continue;
                };
                play(&mut encounter, choice);
            }
        }
    }

    Ok(())
}

/// Fresh combatants from the roster, so nothing carries over between battles.
fn new_encounter(roster: &Roster, cli: &Cli) -> Result<Encounter> {
    let mut encounter = Encounter::new(
        roster.create_combatant(&cli.player)?,
        roster.create_combatant(&cli.opponent)?,
    )
    .with_behavior(cli.policy.into_behavior());
    if let Some(seed) = cli.seed {
        encounter = encounter.with_seed(seed);
    }
    encounter.subscribe(Box::new(TextDisplay::new(io::stdout())));
    Ok(encounter)
}

fn play(encounter: &mut Encounter, choice: usize) {
    if choice == 0 {
        println!("Abilities are numbered from 1.");
        return;
    }

    // The subscribed display prints the round's events and the new board.
    if let Err(e) = encounter.play_round(choice - 1) {
        println!("{}", e);
    }
}
