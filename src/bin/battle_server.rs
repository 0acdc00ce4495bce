//! Pokemon Duel MCP server over stdio.

use anyhow::Result;
use pokemon_duel::mcp_service::DuelService;
use pokemon_duel::roster::Roster;
use rmcp::ServiceExt;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let roster = match std::env::var_os("POKEMON_DUEL_ROSTER") {
        Some(path) => Roster::load(path)?,
        None => Roster::builtin()?,
    };

    let service = DuelService::new(roster);
    let transport = (tokio::io::stdin(), tokio::io::stdout());

    tracing::info!("pokemon duel server listening on stdio");
    let server = service.serve(transport).await?;
    server.waiting().await?;
    Ok(())
}
