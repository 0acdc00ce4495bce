//! MCP tool surface for the duel: one shared encounter driven through tool calls.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;

use crate::battle::ai::PolicyKind;
use crate::battle::encounter::Encounter;
use crate::interface::*;
use crate::roster::{Roster, DEFAULT_OPPONENT, DEFAULT_PLAYER};

pub const NO_BATTLE: &str = "No battle is currently active. Use 'start_battle' to begin.";
pub const ROUND_IN_FLIGHT: &str = "A round is still being resolved; try again.";

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct StartBattleRequest {
    #[schemars(description = "Your species (default Pikachu)")]
    pub player: Option<String>,
    #[schemars(description = "Opponent species (default Charmander)")]
    pub opponent: Option<String>,
    #[schemars(description = "Opponent policy: first, first-usable, greedy or random")]
    pub policy: Option<String>,
    #[schemars(description = "Seed for reproducible damage rolls and opponent choices")]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UseAbilityRequest {
    #[schemars(description = "Ability number as shown on the board, starting at 1")]
    pub ability_number: u32,
}

#[derive(Debug, Clone)]
pub struct DuelService {
    tool_router: ToolRouter<DuelService>,
    roster: Roster,
    encounter: Arc<Mutex<Option<Encounter>>>,
}

fn invalid_params(message: impl Into<String>) -> McpError {
    McpError {
        code: ErrorCode(-32602),
        message: Cow::from(message.into()),
        data: None,
    }
}

fn text(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn failure(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(text.into())]))
}

#[tool_router]
impl DuelService {
    pub fn new(roster: Roster) -> Self {
        Self {
            tool_router: Self::tool_router(),
            roster,
            encounter: Arc::new(Mutex::new(None)),
        }
    }

    /// Requests are rejected rather than queued while another one holds the encounter.
    fn lock_encounter(&self) -> Option<MutexGuard<'_, Option<Encounter>>> {
        match self.encounter.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => {
                tracing::warn!("encounter lock was poisoned; recovering");
                Some(poisoned.into_inner())
            }
            Err(TryLockError::WouldBlock) => None,
        }
    }

    #[tool(description = "List the Pokemon that can be sent into battle")]
    async fn list_species(&self) -> Result<CallToolResult, McpError> {
        text(available_species_display(&self.roster))
    }

    #[tool(description = "Start a new duel, replacing any active one")]
    async fn start_battle(
        &self,
        Parameters(request): Parameters<StartBattleRequest>,
    ) -> Result<CallToolResult, McpError> {
        let policy = match request.policy.as_deref() {
            None => PolicyKind::default(),
            Some(name) => name.parse::<PolicyKind>().map_err(invalid_params)?,
        };
        let player = request.player.as_deref().unwrap_or(DEFAULT_PLAYER);
        let opponent = request.opponent.as_deref().unwrap_or(DEFAULT_OPPONENT);

        let (encounter, intro) =
            create_encounter(&self.roster, player, opponent, policy, request.seed)
                .map_err(|e| invalid_params(e.to_string()))?;

        let Some(mut slot) = self.lock_encounter() else {
            return failure(ROUND_IN_FLIGHT);
        };
        *slot = Some(encounter);
        text(intro)
    }

    #[tool(description = "Get the current battle board and a structured snapshot")]
    async fn get_battle_state(&self) -> Result<CallToolResult, McpError> {
        let Some(slot) = self.lock_encounter() else {
            return failure(ROUND_IN_FLIGHT);
        };
        match slot.as_ref() {
            Some(encounter) => Ok(CallToolResult::success(vec![
                Content::text(battle_status_summary(encounter)),
                Content::json(encounter.info())?,
            ])),
            None => failure(NO_BATTLE),
        }
    }

    #[tool(description = "Use one of your abilities and resolve the round")]
    async fn use_ability(
        &self,
        Parameters(request): Parameters<UseAbilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        if request.ability_number == 0 {
            return Err(invalid_params("abilities are numbered from 1"));
        }
        let Some(mut slot) = self.lock_encounter() else {
            return failure(ROUND_IN_FLIGHT);
        };
        let Some(encounter) = slot.as_mut() else {
            return failure(NO_BATTLE);
        };
        match execute_ability_action(encounter, request.ability_number as usize - 1) {
            Ok(result) => text(result),
            Err(e) => failure(format!("Error: {}", e)),
        }
    }

    #[tool(description = "Restore both Pokemon and start the current duel over")]
    async fn restart_battle(&self) -> Result<CallToolResult, McpError> {
        let Some(mut slot) = self.lock_encounter() else {
            return failure(ROUND_IN_FLIGHT);
        };
        match slot.as_mut() {
            Some(encounter) => {
                encounter.restart();
                text(battle_status_summary(encounter))
            }
            None => failure(NO_BATTLE),
        }
    }
}

#[tool_handler]
impl ServerHandler for DuelService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Start a duel with start_battle, then pick abilities by number with use_ability."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
