//! Assembly of a complete [`LoadedGame`] from the server or from a dump
//!
//! Both sources yield the same shape. An offline dump is a directory with an
//! `intel.json` file and one `tick_{N}.json` snapshot per tick; it carries no
//! event log.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::client::{ClientError, SolarisClient, Transport};
use crate::codec::{self, DecodeError};
use crate::log::Logger;
use crate::models::{
    GameEventsResponse, GameInfoResponse, GameIntelTick, GameSyncResponse, Player, Tick,
};

const INTEL_FILE: &str = "intel.json";
const TICK_PREFIX: &str = "tick_";
const DUMP_EXT: &str = "json";

/// Load errors
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode { path: PathBuf, source: DecodeError },

    #[error("failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is not named tick_<number>.json", .0.display())]
    BadTickFile(PathBuf),

    #[error("no tick snapshots found in {}", .0.display())]
    NoSnapshots(PathBuf),

    #[error("expected exactly one player with perspective, found {count}")]
    Perspective { count: usize },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> LoadError + '_ {
    move |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A game with its full history, ready for presentation
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGame {
    /// The player the snapshots are viewed as
    pub me_player_id: String,
    /// Snapshot at the latest tick
    pub game_sync: GameSyncResponse,
    pub game_intel: Vec<GameIntelTick>,
    pub game_events: GameEventsResponse,
    pub sync_history: BTreeMap<Tick, GameSyncResponse>,
}

impl LoadedGame {
    pub fn current_tick(&self) -> Tick {
        self.game_sync.current_tick()
    }

    pub fn me(&self) -> Option<&Player> {
        self.game_sync.player(&self.me_player_id)
    }
}

/// Id of the single player the snapshot is viewed as
pub fn me_player_id(snapshot: &GameSyncResponse) -> Result<String, LoadError> {
    match snapshot.perspective_players().as_slice() {
        [me] => Ok(me.id.clone()),
        others => Err(LoadError::Perspective {
            count: others.len(),
        }),
    }
}

fn read_decoded<T: serde::de::DeserializeOwned>(
    what: &'static str,
    path: &Path,
) -> Result<T, LoadError> {
    let text = fs::read_to_string(path).map_err(io_err(path))?;
    codec::decode(what, &text).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Tick number of a `tick_{N}.json` file name. `None` for unrelated files.
fn dump_tick(path: &Path) -> Option<Result<Tick, LoadError>> {
    if path.extension().and_then(|e| e.to_str()) != Some(DUMP_EXT) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let number = stem.strip_prefix(TICK_PREFIX)?;
    Some(
        number
            .parse::<Tick>()
            .map_err(|_| LoadError::BadTickFile(path.to_path_buf())),
    )
}

/// Load a game from an offline dump directory
pub fn load_offline(log: &dyn Logger, dir: &Path) -> Result<LoadedGame, LoadError> {
    log.info(&format!("loading game data from {}", dir.display()));

    let intel_path = dir.join(INTEL_FILE);
    log.info(&format!("  loading intel data from {}", intel_path.display()));
    let game_intel: Vec<GameIntelTick> = read_decoded("intel dump", &intel_path)?;

    log.info(&format!("  loading sync history from {}", dir.display()));
    let mut tick_files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let path = entry.map_err(io_err(dir))?.path();
        if let Some(tick) = dump_tick(&path) {
            tick_files.push((tick?, path));
        }
    }
    tick_files.sort_by_key(|(tick, _)| *tick);

    let mut sync_history = BTreeMap::new();
    for (tick, path) in tick_files {
        log.trace(&format!(
            "    loading sync data for tick#{} from {}",
            tick,
            path.display()
        ));
        let snapshot: GameSyncResponse = read_decoded("tick dump", &path)?;
        sync_history.insert(tick, snapshot);
    }

    let game_sync = sync_history
        .values()
        .max_by_key(|s| s.current_tick())
        .cloned()
        .ok_or_else(|| LoadError::NoSnapshots(dir.to_path_buf()))?;

    let me_player_id = me_player_id(&game_sync)?;

    Ok(LoadedGame {
        me_player_id,
        game_sync,
        game_intel,
        game_events: GameEventsResponse::empty(),
        sync_history,
    })
}

/// Load a game from the server, reusing whatever the client has cached.
///
/// Steps run in order: current snapshot, intel, events, snapshot history.
pub async fn load_online<T: Transport>(
    log: &dyn Logger,
    client: &mut SolarisClient<T>,
    game: &GameInfoResponse,
) -> Result<LoadedGame, LoadError> {
    let game_id = game.id.as_str();
    let tick = game.state.tick;

    log.info(&format!("syncing game {} ({})", game.name(), game_id));
    let game_sync = client.get_snapshot(game_id, Some(tick)).await?;
    log.info(&format!("  successfully synced game {} ({})", game.name(), game_id));

    log.info(&format!("getting intel data for game {}", game_id));
    let game_intel = client.get_intel_history(game_id, Some(1), Some(tick)).await?;
    log.info(&format!("  successfully got intel data for game {}", game_id));

    log.info(&format!("getting events for game {}", game_id));
    let game_events = client.get_events(game_id).await?;
    log.info(&format!("  successfully got events for game {}", game_id));

    log.info(&format!("getting game sync history for game {}", game_id));
    let sync_history = client
        .get_snapshot_history(game_id, Some(1), Some(tick))
        .await?;
    log.info(&format!(
        "  successfully got game sync history for game {}",
        game_id
    ));

    let me_player_id = me_player_id(&game_sync)?;

    Ok(LoadedGame {
        me_player_id,
        game_sync,
        game_intel,
        game_events,
        sync_history,
    })
}

fn write_encoded<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let bytes = codec::encode(value).map_err(|source| LoadError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, bytes).map_err(io_err(path))
}

/// Write a loaded game in the offline dump layout
pub fn dump_game(log: &dyn Logger, dir: &Path, game: &LoadedGame) -> Result<(), LoadError> {
    log.info(&format!("dumping game data to {}", dir.display()));
    fs::create_dir_all(dir).map_err(io_err(dir))?;

    write_encoded(&dir.join(INTEL_FILE), &game.game_intel)?;
    for (tick, snapshot) in &game.sync_history {
        let path = dir.join(format!("{}{}.{}", TICK_PREFIX, tick, DUMP_EXT));
        log.trace(&format!("    writing tick#{} to {}", tick, path.display()));
        write_encoded(&path, snapshot)?;
    }
    Ok(())
}
