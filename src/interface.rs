//! Text-oriented helpers shared by the terminal game and the stdio server.

use crate::battle::ai::PolicyKind;
use crate::battle::encounter::Encounter;
use crate::display;
use crate::errors::BattleResult;
use crate::roster::Roster;

/// Returns formatted text listing the species the roster can build
pub fn available_species_display(roster: &Roster) -> String {
    let mut output = String::from("Available Pok\u{e9}mon:\n");
    for species in roster.all_species() {
        let abilities: Vec<&str> = species.abilities.iter().map(|a| a.name.as_str()).collect();
        output.push_str(&format!(
            "  #{:03} {} ({} HP) - {}\n",
            species.pokedex_number,
            species.name,
            species.max_hp,
            abilities.join(", ")
        ));
    }
    output
}

/// Creates a new encounter between two roster species and returns the intro text
pub fn create_encounter(
    roster: &Roster,
    player: &str,
    opponent: &str,
    policy: PolicyKind,
    seed: Option<u64>,
) -> BattleResult<(Encounter, String)> {
    let mut encounter = Encounter::new(
        roster.create_combatant(player)?,
        roster.create_combatant(opponent)?,
    )
    .with_behavior(policy.into_behavior());
    if let Some(seed) = seed {
        encounter = encounter.with_seed(seed);
    }

    let intro = format!(
        "A wild {} appeared!\nGo, {}!\n\n{}",
        encounter.opponent.name,
        encounter.player.name,
        display::render_encounter(&encounter.info())
    );
    tracing::debug!(player, opponent, ?policy, ?seed, "encounter created");
    Ok((encounter, intro))
}

/// Plays one round with the player's ability at `index` and returns the round's text
pub fn execute_ability_action(encounter: &mut Encounter, index: usize) -> BattleResult<String> {
    let mark = encounter.all_events().len();
    let outcome = encounter.play_round(index)?;
    let encounter: &Encounter = encounter;

    let mut lines: Vec<String> = encounter
        .events_since(mark)
        .iter()
        .filter_map(|event| event.format(encounter))
        .collect();

    if outcome.finished {
        lines.push(display::RESTART_PROMPT.to_string());
    } else {
        lines.push(String::new());
        lines.push(display::render_encounter(&encounter.info()));
    }
    Ok(lines.join("\n"))
}

/// Displays the current encounter without advancing it
pub fn battle_status_summary(encounter: &Encounter) -> String {
    let info = encounter.info();
    if encounter.game_state().is_terminal() {
        let verdict = encounter.battle_result();
        let result = match verdict.winner {
            Some(side) => format!("{} Wins!", encounter.combatant(side).name),
            None => "Draw!".to_string(),
        };
        format!(
            "{}\n{}\n\n{}",
            display::render_combatant(&info.opponent),
            display::render_combatant(&info.player),
            result
        )
    } else {
        display::render_encounter(&info)
    }
}
