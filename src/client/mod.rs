//! Session client for the game API
//!
//! One [`SolarisClient`] owns one authenticated session and one
//! [`TickCache`]. Every read path checks the cache before touching the
//! network and writes the game's cache file after each fetch that changed it.
//! Calls run one at a time; the client takes `&mut self` for anything that
//! mutates the cache.

pub mod transport;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::cache::{CacheError, TickCache};
use crate::codec::{self, DecodeError};
use crate::log::{Logger, Prefixed};
use crate::models::{
    GameEventsResponse, GameInfoResponse, GameIntelTick, GameOverviewResponse, GameSyncResponse,
    Tick, UserInfo,
};

pub use transport::{HttpTransport, Transport, TransportError};

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("{0} was empty")]
    EmptyResponse(&'static str),
}

/// Decode a body that must hold a value. `null` or a blank body is an error.
fn decode_required<R: DeserializeOwned>(what: &'static str, body: &str) -> Result<R, ClientError> {
    if body.trim().is_empty() {
        return Err(ClientError::EmptyResponse(what));
    }
    let value = codec::parse(what, body)?;
    if value.is_null() {
        return Err(ClientError::EmptyResponse(what));
    }
    Ok(codec::decode_value(what, value)?)
}

/// Authenticated client for one game server
pub struct SolarisClient<T = HttpTransport> {
    transport: T,
    cache: TickCache,
    log: Prefixed<Arc<dyn Logger>>,
    user: Option<UserInfo>,
}

impl SolarisClient<HttpTransport> {
    /// Client with a cookie session against `base_url`
    pub fn connect(
        log: Arc<dyn Logger>,
        base_url: Url,
        timeout: Duration,
        cache_dir: Option<PathBuf>,
    ) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::with_transport(log, transport, TickCache::new(cache_dir)))
    }
}

impl<T: Transport> SolarisClient<T> {
    pub fn with_transport(log: Arc<dyn Logger>, transport: T, cache: TickCache) -> Self {
        Self {
            transport,
            cache,
            log: Prefixed::new("SolarisClient", log),
            user: None,
        }
    }

    /// The account logged in with [`Self::login`]
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn cache(&self) -> &TickCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut TickCache {
        &mut self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn save_cache(&self) -> Result<bool, ClientError> {
        Ok(self.cache.save(&self.log)?)
    }

    /// Load the cache from disk. `false` means there was nothing to load.
    pub fn load_cache(&mut self) -> Result<bool, ClientError> {
        Ok(self.cache.load(&self.log)?)
    }

    fn persist(&self, game_id: &str) -> Result<(), ClientError> {
        self.cache.save_game(game_id, &self.log)?;
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&UserInfo, ClientError> {
        self.log.info(&format!("logging in as {}", email));

        let body = self
            .transport
            .post_json(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await?;
        let user: UserInfo = decode_required("login response", &body)?;

        self.save_cache()?;
        self.log
            .info(&format!("logged in as {} ({})", user.username, user.id));

        Ok(self.user.insert(user))
    }

    pub async fn get_active_games(&self) -> Result<Vec<GameOverviewResponse>, ClientError> {
        self.log.trace("getting active games");

        let body = self.transport.get("/api/game/list/active", &[]).await?;
        let games: Vec<GameOverviewResponse> = decode_required("active games list", &body)?;

        self.log.trace(&format!("  got {} active games", games.len()));
        Ok(games)
    }

    pub async fn get_completed_games(&self) -> Result<Vec<GameOverviewResponse>, ClientError> {
        self.log.trace("getting completed games");

        let body = self
            .transport
            .get("/api/game/list/completed/user", &[])
            .await?;
        let games: Vec<GameOverviewResponse> = decode_required("completed games list", &body)?;

        self.log.trace(&format!("  got {} completed games", games.len()));
        Ok(games)
    }

    /// Game info by id or slug. A 404 or a `null` body is `Ok(None)`.
    pub async fn get_game_info(&self, game_id: &str) -> Result<Option<GameInfoResponse>, ClientError> {
        self.log.trace(&format!("getting info for game {}", game_id));

        let path = format!("/api/game/{}/info", game_id);
        let body = match self.transport.get(&path, &[]).await {
            Ok(body) => body,
            Err(e) if e.status() == Some(404) => {
                self.log.trace(&format!("  game {} not found", game_id));
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if body.trim().is_empty() {
            return Ok(None);
        }
        let value = codec::parse("game info", &body)?;
        if value.is_null() {
            return Ok(None);
        }
        let info: GameInfoResponse = codec::decode_value("game info", value)?;

        self.log
            .trace(&format!("  successfully parsed info for game {}", game_id));
        Ok(Some(info))
    }

    /// Resolve a game by id or display name: active games first, then
    /// completed games, then a direct info lookup. A 404 from the lookup is
    /// `None`; any other failure is returned.
    pub async fn find_game(&self, query: &str) -> Result<Option<GameInfoResponse>, ClientError> {
        self.log.trace(&format!("looking for game {}", query));

        let active = self.get_active_games().await?;
        if let Some(game) = active.into_iter().find(|g| g.matches(query)) {
            self.log.trace(&format!("  found active game {}", game.id()));
            return Ok(Some(game.into_info()));
        }

        let completed = self.get_completed_games().await?;
        if let Some(game) = completed.into_iter().find(|g| g.matches(query)) {
            self.log.trace(&format!("  found completed game {}", game.id()));
            return Ok(Some(game.into_info()));
        }

        self.get_game_info(query).await
    }

    /// Snapshot at `tick`, or at the current tick when `tick` is `None`.
    ///
    /// A cached tick is returned without a network call. Fetched snapshots
    /// are cached under the tick the server reports.
    pub async fn get_snapshot(
        &mut self,
        game_id: &str,
        tick: Option<Tick>,
    ) -> Result<GameSyncResponse, ClientError> {
        match tick {
            Some(t) => self
                .log
                .trace(&format!("getting sync data for game {}@{}", game_id, t)),
            None => self
                .log
                .trace(&format!("getting sync data for game {}@current", game_id)),
        }

        let mut query = Vec::new();
        if let Some(tick) = tick {
            if let Some(cached) = self.cache.game(game_id).and_then(|g| g.snapshot(tick)) {
                self.log
                    .trace(&format!("  found cached sync data for game {}@{}", game_id, tick));
                return Ok(cached.clone());
            }
            query.push(("tick", tick.to_string()));
        }

        let path = format!("/api/game/{}/galaxy", game_id);
        let body = self.transport.get(&path, &query).await?;
        let snapshot: GameSyncResponse = decode_required("galaxy response", &body)?;

        let reported = snapshot.current_tick();
        if let Some(requested) = tick.filter(|t| *t != reported) {
            self.log.warn(&format!(
                "  requested tick {} of game {} but server returned tick {}",
                requested, game_id, reported
            ));
        }

        self.cache.for_game(game_id).insert_snapshot(snapshot.clone());
        self.persist(game_id)?;

        self.log
            .trace(&format!("  successfully parsed sync data for game {}@{}", game_id, reported));
        Ok(snapshot)
    }

    /// Every snapshot in `[start_tick, end_tick]`, fetched one tick at a
    /// time. Missing bounds default to `1` and the current tick.
    pub async fn get_snapshot_history(
        &mut self,
        game_id: &str,
        start_tick: Option<Tick>,
        end_tick: Option<Tick>,
    ) -> Result<BTreeMap<Tick, GameSyncResponse>, ClientError> {
        self.log.trace(&format!(
            "getting sync history for game {}@[{:?},{:?}]",
            game_id, start_tick, end_tick
        ));

        let (start, end) = match (start_tick, end_tick) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                let current = self.get_snapshot(game_id, None).await?;
                (
                    start_tick.unwrap_or(1),
                    end_tick.unwrap_or_else(|| current.current_tick()),
                )
            }
        };

        let mut history = BTreeMap::new();
        for tick in start..=end {
            let snapshot = self.get_snapshot(game_id, Some(tick)).await?;
            history.insert(tick, snapshot);
        }
        Ok(history)
    }

    /// Intel for `[start_tick, end_tick]`.
    ///
    /// When both bounds are given and the cached run reaches `end_tick`, the
    /// cached run is filtered and returned. Otherwise the range is fetched in
    /// one call and replaces the cached run.
    pub async fn get_intel_history(
        &mut self,
        game_id: &str,
        start_tick: Option<Tick>,
        end_tick: Option<Tick>,
    ) -> Result<Vec<GameIntelTick>, ClientError> {
        self.log.trace(&format!(
            "getting intel data for game {}@[{:?},{:?}]",
            game_id, start_tick, end_tick
        ));

        if let (Some(start), Some(end)) = (start_tick, end_tick) {
            if let Some(cached) = self.cache.game(game_id).and_then(|g| g.intel_range(start, end)) {
                self.log.trace(&format!(
                    "  found cached intel data for game {}@[{},{}]",
                    game_id, start, end
                ));
                return Ok(cached);
            }
        }

        let mut query = Vec::new();
        if let Some(start) = start_tick {
            query.push(("startTick", start.to_string()));
        }
        if let Some(end) = end_tick {
            query.push(("endTick", end.to_string()));
        }

        let path = format!("/api/game/{}/intel", game_id);
        let body = self.transport.get(&path, &query).await?;
        let run: Vec<GameIntelTick> = decode_required("intel response", &body)?;

        self.cache.for_game(game_id).replace_intel(run.clone());
        self.persist(game_id)?;

        self.log.trace(&format!(
            "  successfully parsed {} intel ticks for game {}",
            run.len(),
            game_id
        ));
        Ok(run)
    }

    /// The full event log. Always fetched; replaces the cached list.
    pub async fn get_events(&mut self, game_id: &str) -> Result<GameEventsResponse, ClientError> {
        self.log.trace(&format!("getting events for game {}", game_id));

        let path = format!("/api/game/{}/events", game_id);
        let body = self.transport.get(&path, &[]).await?;
        if body.trim().is_empty() {
            return Err(ClientError::EmptyResponse("events response"));
        }
        let value = codec::parse("events response", &body)?;
        if value.is_null() {
            return Err(ClientError::EmptyResponse("events response"));
        }
        let events = codec::decode_events_response(value)?;

        self.cache.for_game(game_id).replace_events(events.clone());
        self.persist(game_id)?;

        self.log.trace(&format!(
            "  successfully parsed {} events for game {}",
            events.events.len(),
            game_id
        ));
        Ok(events)
    }
}
