//! Account and game listing wire types

use serde::{Deserialize, Serialize};

use super::Tick;

/// Identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateOverview {
    pub locked: bool,
    pub tick: Tick,
    pub paused: bool,
    pub production_tick: i32,
    pub players: i32,
    pub cleaned: bool,
    pub stars: i32,
    pub stars_for_victory: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAfkOverview {
    pub last_seen_timeout: i32,
    pub cycle_timeout: i32,
    pub turn_timeout: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTime {
    pub afk: GameAfkOverview,
    pub game_type: String,
    pub speed: i32,
    pub start_delay: i32,
    pub turn_jumps: i32,
    pub max_turn_wait: i32,
    pub is_tick_limited: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserNotifications {
    pub unread_conversations: Option<i32>,
    pub unread_events: Option<i32>,
    pub unread: Option<i32>,
    pub turn_waiting: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsOverviewGeneral {
    #[serde(rename = "type")]
    pub game_type: String,
    pub player_limit: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsOverviewGalaxy {
    pub production_ticks: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsOverview {
    pub general: GameSettingsOverviewGeneral,
    pub galaxy: GameSettingsOverviewGalaxy,
    pub game_time: GameTime,
}

/// Summary of a single game as returned by `/api/game/{id}/info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfoResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub settings: GameSettingsOverview,
    pub state: GameStateOverview,
}

impl GameInfoResponse {
    pub fn name(&self) -> &str {
        &self.settings.general.name
    }
}

/// Entry of the active or completed game lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOverviewResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub settings: GameSettingsOverview,
    pub state: GameStateOverview,
    pub user_notifications: UserNotifications,
}

impl GameOverviewResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.settings.general.name
    }

    /// Drop the notification counters, keeping the game summary
    pub fn into_info(self) -> GameInfoResponse {
        GameInfoResponse {
            id: self.id,
            settings: self.settings,
            state: self.state,
        }
    }

    /// Matches the query against the game id or display name
    pub fn matches(&self, query: &str) -> bool {
        self.id() == query || self.name() == query
    }
}
