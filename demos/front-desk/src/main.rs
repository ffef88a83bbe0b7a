//! Scripted walkthrough of the operator console and the lobby: register
//! a few players, watch the live roster, admit a player by code, restart
//! the lobby and resume the cached session, then revoke the code.
//!
//! Run with `RUST_LOG=debug` for the full trace.

use vestibule::{
    FileSessionCache, Lobby, MemoryStore, OperatorConsole, Registry,
    RosterEvent, SubmitOutcome,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let store = MemoryStore::new();
    let session_path = std::env::temp_dir().join("front-desk-session.json");

    // -----------------------------------------------------------------
    // Operator side: registrations plus a live roster feed
    // -----------------------------------------------------------------

    let mut console = OperatorConsole::new(store.clone());

    let mut roster = console.watch(Registry::Players).await?;
    tokio::spawn(async move {
        while let Some(event) = roster.recv().await {
            match event {
                RosterEvent::Snapshot(snapshot) => {
                    let codes: Vec<_> = snapshot
                        .entries()
                        .iter()
                        .map(|e| {
                            let flag = if e.active { "" } else { " (revoked)" };
                            format!("{} {}{}", e.code, e.name, flag)
                        })
                        .collect();
                    tracing::info!(?codes, "player roster");
                }
                RosterEvent::Lost(reason) => {
                    tracing::error!(%reason, "roster feed lost");
                    break;
                }
            }
        }
    });

    console.add(Registry::Players, "Ada", "AB1").await?;
    console.add(Registry::Players, "Brian", "XY7").await?;
    console.add(Registry::Arenas, "Main Hall", "HALL1").await?;

    let suggested = console.suggest_code(6);
    tracing::info!(code = %suggested, "suggested code for the next entry");
    console.add(Registry::Players, "Grace", &suggested).await?;

    // -----------------------------------------------------------------
    // Player side: admission, restart, resume
    // -----------------------------------------------------------------

    let lobby =
        Lobby::new(store.clone(), FileSessionCache::new(&session_path));
    match lobby.enter("ab1").await? {
        SubmitOutcome::Admitted(record) => {
            tracing::info!(code = %record.code, name = %record.name, "admitted");
        }
        SubmitOutcome::Superseded => unreachable!("single submission"),
    }
    drop(lobby);

    // A fresh lobby over the same cache file picks the session back up.
    let lobby =
        Lobby::new(store.clone(), FileSessionCache::new(&session_path));
    match lobby.resume().await? {
        Some(record) => {
            tracing::info!(name = %record.name, "resumed cached session")
        }
        None => tracing::info!("no session to resume"),
    }

    // -----------------------------------------------------------------
    // Revocation: listed in the roster, refused at the gate
    // -----------------------------------------------------------------

    console.revoke(Registry::Players, "AB1").await?;
    let second = Lobby::new(store, FileSessionCache::new(&session_path));
    match second.enter("AB1").await {
        Err(error) => tracing::warn!(%error, "revoked code refused"),
        Ok(outcome) => tracing::info!(?outcome, "unexpected admission"),
    }

    // Let the roster task print the final snapshot before exiting.
    tokio::task::yield_now().await;
    lobby.change_player().await;
    Ok(())
}
