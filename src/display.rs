//! Plain-text rendering of encounter snapshots.
//!
//! `TextDisplay` is an `EncounterObserver`; the battle logic never calls into this
//! module directly.

use crate::battle::encounter::{EncounterObserver, RoundOutcome};
use crate::battle::info::{CombatantInfo, EncounterInfo};
use crate::battle::state::Side;
use std::io::Write;

const HEALTH_BAR_WIDTH: usize = 20;

pub const RESTART_PROMPT: &str = "Press 'r' to start a new battle, or 'q' to quit.";

pub fn render_health_bar(info: &CombatantInfo) -> String {
    let filled = (info.health_percent as usize * HEALTH_BAR_WIDTH + 50) / 100;
    let filled = filled.min(HEALTH_BAR_WIDTH);
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(HEALTH_BAR_WIDTH - filled),
        info.health_percent
    )
}

/// Level, name, sprite and health for one side.
pub fn render_combatant(info: &CombatantInfo) -> String {
    format!(
        "{} {}\n  sprite: {}\n  HP {} {}",
        info.level_summary,
        info.name,
        info.image_url,
        info.health_summary,
        render_health_bar(info)
    )
}

/// Numbered action buttons. Unusable abilities are marked rather than hidden.
pub fn render_actions(info: &CombatantInfo) -> String {
    info.abilities
        .iter()
        .map(|ability| {
            let marker = if ability.enabled { "" } else { "  (unavailable)" };
            format!("  {}. {}{}", ability.index + 1, ability.description, marker)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_result(info: &EncounterInfo, outcome: &RoundOutcome) -> String {
    match outcome.winner {
        Some(Side::Player) => format!("{} Wins!", info.player.name),
        Some(Side::Opponent) => format!("{} Wins!", info.opponent.name),
        None => "Draw!".to_string(),
    }
}

pub fn render_encounter(info: &EncounterInfo) -> String {
    format!(
        "--- Round {} ---\n{}\n\n{}\n\nYour moves:\n{}",
        info.round,
        render_combatant(&info.opponent),
        render_combatant(&info.player),
        render_actions(&info.player)
    )
}

/// Writes every snapshot it receives to `out`.
pub struct TextDisplay<W: Write> {
    out: W,
}

impl<W: Write> TextDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write battle display");
        }
    }
}

impl<W: Write> EncounterObserver for TextDisplay<W> {
    fn on_init(&mut self, info: &EncounterInfo) {
        let text = format!(
            "A wild {} appeared!\nGo, {}!\n\n{}",
            info.opponent.name,
            info.player.name,
            render_encounter(info)
        );
        self.emit(&text);
    }

    fn on_update(&mut self, info: &EncounterInfo) {
        let mut text = info.messages.join("\n");
        text.push_str("\n\n");
        text.push_str(&render_combatant(&info.opponent));
        text.push('\n');
        text.push_str(&render_combatant(&info.player));
        if !info.player.is_fainted && !info.opponent.is_fainted {
            text.push_str("\n\nYour moves:\n");
            text.push_str(&render_actions(&info.player));
        }
        self.emit(&text);
    }

    fn on_finished(&mut self, info: &EncounterInfo, outcome: &RoundOutcome) {
        let text = format!("\n{}\n{}", render_result(info, outcome), RESTART_PROMPT);
        self.emit(&text);
    }
}
