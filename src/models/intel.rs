//! Per-tick intel (`/api/game/{id}/intel`) wire types

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Tick;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIntelTickStatistics {
    pub total_stars: i32,
    pub total_home_stars: i32,
    pub total_economy: i32,
    pub total_industry: i32,
    pub total_science: i32,
    pub total_ships: i32,
    pub total_carriers: i32,
    pub total_specialists: i32,
    pub total_star_specialists: i32,
    pub total_carrier_specialists: i32,
    pub new_ships: f64,
    pub warpgates: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntelTickResearchItem {
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerIntelTickResearch {
    pub scanning: PlayerIntelTickResearchItem,
    pub hyperspace: PlayerIntelTickResearchItem,
    pub terraforming: PlayerIntelTickResearchItem,
    pub experimentation: PlayerIntelTickResearchItem,
    pub weapons: PlayerIntelTickResearchItem,
    pub banking: PlayerIntelTickResearchItem,
    pub manufacturing: PlayerIntelTickResearchItem,
    pub specialists: PlayerIntelTickResearchItem,
}

impl fmt::Display for PlayerIntelTickResearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} S / {} H / {} T / {} E / {} W / {} B / {} M / {} P",
            self.scanning.level,
            self.hyperspace.level,
            self.terraforming.level,
            self.experimentation.level,
            self.weapons.level,
            self.banking.level,
            self.manufacturing.level,
            self.specialists.level,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerIntelTick {
    pub statistics: PlayerIntelTickStatistics,
    pub research: PlayerIntelTickResearch,
    pub player_id: String,
}

/// Compact summary of every player at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameIntelTick {
    #[serde(rename = "_id")]
    pub id: String,
    pub game_id: String,
    pub tick: Tick,
    pub players: Vec<PlayerIntelTick>,
}

impl GameIntelTick {
    pub fn player_intel(&self, player_id: &str) -> Option<&PlayerIntelTick> {
        self.players.iter().find(|p| p.player_id == player_id)
    }
}
