//! Live change monitor
//!
//! Connects to the server given on the command line, discovers its
//! players and prints every state change as it happens.
//!
//! ```text
//! cargo run --example monitor -- 192.168.1.50
//! ```

use lyrion_sdk::{Config, LyrionSystem, SdkError, StateChange};

#[tokio::main]
async fn main() -> Result<(), SdkError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyrion_sdk=info,lyrion_poll=info".into()),
        )
        .init();

    let host = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: monitor <server-host> [port]");
        std::process::exit(2);
    });
    let port = std::env::args()
        .nth(2)
        .and_then(|p| p.parse().ok())
        .unwrap_or(9000);

    let system = LyrionSystem::new(Config::for_server(host, port))?;
    let mut changes = system.changes().expect("first take");

    system.connect().await?;
    println!("server version: {}", system.server_version().await?);

    for player in system.discover().await? {
        println!("tracking {} ({})", player.name, player.id);
    }
    for favorite in system.favorites() {
        println!("favorite [{}] {}", favorite.id, favorite.name);
    }

    while let Some(change) = changes.recv().await {
        match change {
            StateChange::TrackChanged {
                player_id,
                new_track,
                ..
            } => match new_track {
                Some(track) => println!(
                    "{player_id}: now playing {} - {}",
                    track.artist.as_deref().unwrap_or("?"),
                    track.title.as_deref().unwrap_or("?"),
                ),
                None => println!("{player_id}: playlist empty"),
            },
            StateChange::GroupChanged { player_id, view } => {
                println!("{player_id}: group leader {}", view.leader_id);
            }
            other => println!("{:?}", other),
        }
    }
    Ok(())
}
