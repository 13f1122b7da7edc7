//! Per-game tick cache with one JSON file per game
//!
//! Snapshots are stored sparsely by tick and never overwritten once present.
//! The intel run and event list are replaced wholesale whenever the client
//! refetches them.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::log::Logger;
use crate::models::{GameEventsResponse, GameIntelTick, GameSyncResponse, Tick};

const CACHE_EXT: &str = "json";

/// Everything cached for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCache {
    #[serde(default)]
    pub sync_history: BTreeMap<Tick, GameSyncResponse>,
    #[serde(default)]
    pub intel_tick_history: Option<Vec<GameIntelTick>>,
    #[serde(default)]
    pub events_history: Option<GameEventsResponse>,
}

impl GameCache {
    pub fn snapshot(&self, tick: Tick) -> Option<&GameSyncResponse> {
        self.sync_history.get(&tick)
    }

    /// Store a snapshot under the tick it reports. An existing snapshot for
    /// that tick is kept; returns whether the new one was inserted.
    pub fn insert_snapshot(&mut self, snapshot: GameSyncResponse) -> bool {
        let tick = snapshot.current_tick();
        if self.sync_history.contains_key(&tick) {
            return false;
        }
        self.sync_history.insert(tick, snapshot);
        true
    }

    /// Last tick of the cached intel run, if there is one
    pub fn intel_last_tick(&self) -> Option<Tick> {
        self.intel_tick_history
            .as_ref()
            .and_then(|run| run.last())
            .map(|t| t.tick)
    }

    /// Cached intel for `[start_tick, end_tick]`, provided the cached run
    /// reaches `end_tick`. The run is assumed to start at tick 1.
    pub fn intel_range(&self, start_tick: Tick, end_tick: Tick) -> Option<Vec<GameIntelTick>> {
        if self.intel_last_tick()? < end_tick {
            return None;
        }
        let run = self.intel_tick_history.as_ref()?;
        Some(
            run.iter()
                .filter(|t| t.tick >= start_tick && t.tick <= end_tick)
                .cloned()
                .collect(),
        )
    }

    pub fn replace_intel(&mut self, run: Vec<GameIntelTick>) {
        self.intel_tick_history = Some(run);
    }

    pub fn replace_events(&mut self, events: GameEventsResponse) {
        self.events_history = Some(events);
    }
}

/// Cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O failed at {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to encode cache for game {game_id}: {source}")]
    Encode {
        game_id: String,
        source: serde_json::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> CacheError + '_ {
    move |source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// In-memory cache of every game seen by a client, optionally backed by a
/// directory of `{gameId}.json` files
#[derive(Debug, Clone, Default)]
pub struct TickCache {
    root: Option<PathBuf>,
    games: BTreeMap<String, GameCache>,
}

impl TickCache {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self {
            root,
            games: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Mutable entry for a game, created empty if absent
    pub fn for_game(&mut self, game_id: &str) -> &mut GameCache {
        self.games.entry(game_id.to_string()).or_default()
    }

    pub fn game(&self, game_id: &str) -> Option<&GameCache> {
        self.games.get(game_id)
    }

    pub fn game_ids(&self) -> impl Iterator<Item = &str> {
        self.games.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn game_path(root: &Path, game_id: &str) -> PathBuf {
        root.join(format!("{}.{}", game_id, CACHE_EXT))
    }

    /// Write every game to its own file. Returns `false` when no cache root
    /// is configured.
    pub fn save(&self, log: &dyn Logger) -> Result<bool, CacheError> {
        let Some(root) = self.root.as_deref() else {
            log.trace("no cache directory configured, not saving");
            return Ok(false);
        };

        fs::create_dir_all(root).map_err(io_err(root))?;
        log.trace(&format!("saving cache to {}", root.display()));
        for (game_id, game) in &self.games {
            Self::write_game(root, game_id, game, log)?;
        }
        Ok(true)
    }

    /// Write a single game's file. Returns `false` when no cache root is
    /// configured or the game has no entry.
    pub fn save_game(&self, game_id: &str, log: &dyn Logger) -> Result<bool, CacheError> {
        let (Some(root), Some(game)) = (self.root.as_deref(), self.games.get(game_id)) else {
            return Ok(false);
        };

        fs::create_dir_all(root).map_err(io_err(root))?;
        Self::write_game(root, game_id, game, log)?;
        Ok(true)
    }

    fn write_game(
        root: &Path,
        game_id: &str,
        game: &GameCache,
        log: &dyn Logger,
    ) -> Result<(), CacheError> {
        let path = Self::game_path(root, game_id);
        log.trace(&format!("  saving cache for game {}", game_id));
        let bytes = codec::encode(game).map_err(|source| CacheError::Encode {
            game_id: game_id.to_string(),
            source,
        })?;
        fs::write(&path, bytes).map_err(io_err(&path))
    }

    /// Replace the in-memory state with the files under the cache root.
    ///
    /// Returns `false`, leaving the state untouched, when no root is
    /// configured or the directory does not exist yet. A game file that
    /// cannot be read or decoded is skipped.
    pub fn load(&mut self, log: &dyn Logger) -> Result<bool, CacheError> {
        let Some(root) = self.root.as_deref() else {
            log.trace("no cache directory configured, not loading");
            return Ok(false);
        };
        if !root.is_dir() {
            log.trace(&format!("no client cache found at {}", root.display()));
            return Ok(false);
        }

        log.trace(&format!("loading cache from {}", root.display()));
        let mut loaded = BTreeMap::new();
        for entry in fs::read_dir(root).map_err(io_err(root))? {
            let path = entry.map_err(io_err(root))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CACHE_EXT) {
                continue;
            }
            let Some(game_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    log.warn(&format!("  skipping unreadable cache for game {}: {}", game_id, e));
                    continue;
                }
            };
            log.trace(&format!("  loading cache for game {} ({} bytes)", game_id, text.len()));

            match codec::decode::<GameCache>("game cache", &text) {
                Ok(game) => {
                    loaded.insert(game_id.to_string(), game);
                }
                Err(e) => {
                    log.warn(&format!("  skipping corrupt cache for game {}: {}", game_id, e));
                }
            }
        }

        self.games = loaded;
        Ok(true)
    }
}
