//! Full galaxy snapshot (`/api/game/{id}/galaxy`) wire types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tick;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub alias: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerCredit {
    pub debt: i32,
    #[serde(rename = "_id")]
    pub id: String,
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reputation {
    pub score: i32,
    pub player_id: String,
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

/// Galaxy coordinates of a star or carrier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierToStarCombatModifier {
    pub weapons_per_ally: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierToStarCombat {
    pub attacker: Option<CarrierToStarCombatModifier>,
    pub defender: Option<CarrierToStarCombatModifier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistLocalModifiers {
    pub scanning: Option<i32>,
    pub manufacturing: Option<i32>,
    pub terraforming: Option<i32>,
    pub weapons: Option<i32>,
    pub hyperspace: Option<i32>,
    pub speed: Option<f64>,
    pub carrier_to_star_combat: Option<CarrierToStarCombat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistSpecialModifiers {
    pub hide_ships: Option<bool>,
    pub lock_warp_gates: Option<bool>,
    pub auto_carrier_specialist_assign: Option<i32>,
    pub add_natural_resources_on_tick: Option<i32>,
    pub deduct_enemy_weapons: Option<i32>,
    pub avoid_combat_carrier_to_carrier: Option<bool>,
    pub unlock_warp_gates: Option<bool>,
    pub star_capture_reward_multiplier: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    pub credits: Vec<LedgerCredit>,
    pub credits_specialists: Vec<LedgerCredit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDiplomaticStatus {
    #[serde(rename = "_id")]
    pub id: String,
    pub player_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarUpgradeCost {
    pub economy: Option<i32>,
    pub industry: Option<i32>,
    pub science: Option<i32>,
    pub warp_gate: Option<i32>,
    pub carriers: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarIgnoreBulkUpgrade {
    pub economy: Option<bool>,
    pub industry: Option<bool>,
    pub science: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(rename = "_id")]
    pub id: String,
    pub source: String,
    pub destination: String,
    pub action: Option<String>,
    pub action_ships: Option<i32>,
    pub delay_ticks: Option<i32>,
    pub ticks: Option<i32>,
    pub ticks_eta: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveTechnologyLevels {
    pub scanning: i32,
    pub hyperspace: i32,
    pub terraforming: i32,
    pub experimentation: i32,
    pub weapons: i32,
    pub banking: i32,
    pub manufacturing: i32,
    pub specialists: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchCostTiers {
    pub scanning: String,
    pub hyperspace: String,
    pub terraforming: String,
    pub experimentation: String,
    pub weapons: String,
    pub banking: String,
    pub manufacturing: String,
    pub specialists: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchItemState {
    pub level: i32,
    pub progress: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyLevels {
    pub scanning: ResearchItemState,
    pub hyperspace: ResearchItemState,
    pub terraforming: ResearchItemState,
    pub experimentation: ResearchItemState,
    pub weapons: ResearchItemState,
    pub banking: ResearchItemState,
    pub manufacturing: ResearchItemState,
    pub specialists: ResearchItemState,
}

impl TechnologyLevels {
    /// Drop research progress and keep only the levels
    pub fn effective_levels(&self) -> EffectiveTechnologyLevels {
        EffectiveTechnologyLevels {
            scanning: self.scanning.level,
            hyperspace: self.hyperspace.level,
            terraforming: self.terraforming.level,
            experimentation: self.experimentation.level,
            weapons: self.weapons.level,
            banking: self.banking.level,
            manufacturing: self.manufacturing.level,
            specialists: self.specialists.level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseMultipliers {
    pub standard: i32,
    pub expensive: i32,
    pub very_expensive: i32,
    pub crazy_expensive: i32,
    pub cheap: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub locked: bool,
    pub tick: Tick,
    pub paused: bool,
    pub production_tick: i32,
    pub start_date: String,
    pub end_date: Option<String>,
    pub last_tick_date: String,
    pub ticks_to_end: Option<i32>,
    pub players: i32,
    pub winner: Option<String>,
    pub cleaned: bool,
    pub leaderboard: Vec<String>,
    pub stars: i32,
    pub stars_for_victory: i32,
}

impl GameState {
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_date)
    }

    pub fn last_tick_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_tick_date)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseModifiers {
    pub none: Option<f64>,
    pub cheap: Option<f64>,
    pub standard: Option<f64>,
    pub expensive: Option<f64>,
    pub crazy_expensive: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettingsFlux {
    pub id: i32,
    pub name: String,
    pub month: String,
    pub description: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsGeneral {
    pub flux_id: i32,
    pub description: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub mode: String,
    pub featured: bool,
    pub password_required: bool,
    pub player_limit: i32,
    pub player_type: String,
    pub anonymity: String,
    pub player_online_status: String,
    pub time_machine: String,
    pub award_rank_to: String,
    pub flux_enabled: String,
    #[serde(rename = "advancedAI")]
    pub advanced_ai: String,
    pub spectators: String,
    pub ready_to_quit: String,
    pub name: String,
    pub flux: GameSettingsFlux,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsGalaxy {
    pub galaxy_type: String,
    pub stars_per_player: i32,
    pub production_ticks: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistBan {
    pub star: Vec<i32>,
    pub carrier: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsSpecialGalaxy {
    pub specialist_bans: SpecialistBan,
    pub carrier_cost: String,
    pub carrier_upkeep_cost: String,
    pub warpgate_cost: String,
    pub specialist_cost: String,
    pub specialists_currency: String,
    pub random_warp_gates: i32,
    pub random_worm_holes: i32,
    pub random_nebulas: i32,
    pub random_asteroid_fields: i32,
    pub random_binary_stars: i32,
    pub random_black_holes: i32,
    pub random_pulsars: i32,
    pub dark_galaxy: String,
    pub gift_carriers: String,
    pub defender_bonus: String,
    pub carrier_to_carrier_combat: String,
    pub split_resources: String,
    pub resource_distribution: String,
    pub player_distribution: String,
    pub carrier_speed: i32,
    pub star_capture_reward: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsConquest {
    pub victory_condition: String,
    pub victory_percentage: i32,
    pub capital_star_elimination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsKingOfTheHill {
    pub production_cycles: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsOrbitalMechanics {
    pub enabled: String,
    pub orbit_speed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarInfrastructure {
    pub economy: i32,
    pub industry: i32,
    pub science: i32,
}

impl fmt::Display for StarInfrastructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} E / {} I / {} S", self.economy, self.industry, self.science)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarResources {
    pub economy: i32,
    pub industry: i32,
    pub science: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsPlayerPopulationCap {
    pub enabled: String,
    pub ships_per_star: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConstantsDevelopmentCosts {
    pub economy: String,
    pub industry: String,
    pub science: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsDiplomacy {
    pub enabled: String,
    pub trade_restricted: String,
    pub max_alliances: i32,
    pub upkeep_cost: String,
    pub global_events: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsTechnology {
    pub starting_technology_level: EffectiveTechnologyLevels,
    pub research_costs: ResearchCostTiers,
    pub banking_reward: String,
    pub experimentation_reward: String,
    pub specialist_token_reward: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsAfk {
    pub last_seen_timeout: i32,
    pub cycle_timeout: i32,
    pub turn_timeout: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsGameTime {
    pub afk: GameSettingsAfk,
    pub game_type: String,
    pub speed: i32,
    pub start_delay: i32,
    pub turn_jumps: i32,
    pub max_turn_wait: i32,
    pub is_tick_limited: String,
    pub tick_limit: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettingsPlayer {
    pub starting_infrastructure: StarInfrastructure,
    pub development_cost: PlayerConstantsDevelopmentCosts,
    pub population_cap: GameSettingsPlayerPopulationCap,
    pub starting_stars: i32,
    pub starting_credits: i32,
    pub starting_credits_specialists: i32,
    pub starting_ships: i32,
    pub trade_credits: bool,
    pub trade_credits_specialists: bool,
    pub trade_cost: i32,
    pub trade_scanning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub general: GameSettingsGeneral,
    pub galaxy: GameSettingsGalaxy,
    pub special_galaxy: GameSettingsSpecialGalaxy,
    pub conquest: GameSettingsConquest,
    pub king_of_the_hill: GameSettingsKingOfTheHill,
    pub orbital_mechanics: GameSettingsOrbitalMechanics,
    pub player: GameSettingsPlayer,
    pub diplomacy: GameSettingsDiplomacy,
    pub technology: GameSettingsTechnology,
    pub game_time: GameSettingsGameTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceConstants {
    pub galaxy_center_location: Location,
    pub light_year: i32,
    pub min_distance_between_stars: i32,
    pub max_distance_between_stars: i32,
    pub warp_speed_multiplier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchConstants {
    pub progress_multiplier: i32,
    pub science_point_multiplier: i32,
    pub experimentation_multiplier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarConstantsResources {
    pub min_natural_resources: i32,
    pub max_natural_resources: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarConstantsInfrastructureCostMultipliers {
    pub warp_gate: i32,
    pub economy: f64,
    pub industry: i32,
    pub science: i32,
    pub carrier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarConstants {
    pub resources: StarConstantsResources,
    pub infrastructure_cost_multipliers: StarConstantsInfrastructureCostMultipliers,
    pub infrastructure_expense_multipliers: ExpenseModifiers,
    pub specialists_expense_multipliers: ExpenseModifiers,
    pub capture_reward_multiplier: i32,
    pub home_star_defender_bonus_multiplier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiplomacyConstants {
    pub upkeep_expense_multipliers: ExpenseModifiers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConstants {
    pub rank_reward_multiplier: i32,
    pub banking_cycle_reward_multiplier: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistConstants {
    pub monthly_ban_amount: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConstants {
    pub distances: DistanceConstants,
    pub research: ResearchConstants,
    pub star: StarConstants,
    pub diplomacy: DiplomacyConstants,
    pub player: PlayerConstants,
    pub specialists: SpecialistConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistModifier {
    pub local: Option<SpecialistLocalModifiers>,
    pub special: Option<SpecialistSpecialModifiers>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistActiveInfo {
    pub official: bool,
    pub custom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specialist {
    pub id: i32,
    pub key: String,
    pub name: String,
    pub description: String,
    pub active: SpecialistActiveInfo,
    pub base_cost_credits: i32,
    pub base_cost_credits_specialists: i32,
    pub one_shot: bool,
    pub expire_ticks: Option<i32>,
    pub modifiers: SpecialistModifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGuild {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_stars: i32,
    pub total_home_stars: i32,
    pub total_carriers: i32,
    pub total_ships: i32,
    pub total_ships_max: Option<i32>,
    pub total_economy: i32,
    pub total_industry: i32,
    pub total_science: i32,
    pub new_ships: f64,
    pub warpgates: i32,
    pub total_star_specialists: i32,
    pub total_carrier_specialists: i32,
    pub total_specialists: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub research: TechnologyLevels,
    pub avatar: String,
    pub shape: String,
    pub is_open_slot: bool,
    pub defeated: bool,
    pub afk: bool,
    pub ready: bool,
    pub ready_to_quit: bool,
    pub missed_turns: i32,
    pub has_filled_afk_slot: bool,
    #[serde(rename = "_id")]
    pub id: String,
    pub home_star_id: String,
    pub alias: String,
    pub colour: PlayerColor,
    pub diplomacy: Vec<PlayerDiplomaticStatus>,
    pub stats: PlayerStats,
    #[serde(rename = "hasDuplicateIP")]
    pub has_duplicate_ip: bool,
    /// Set on exactly one player: the account viewing this snapshot
    pub has_perspective: bool,
    #[serde(rename = "isAIControlled")]
    pub is_ai_controlled: bool,
    pub is_in_scanning_range: bool,
    pub is_real_user: bool,
    pub user_id: Option<String>,
    pub last_seen: Option<String>,
    pub researching_now: Option<String>,
    pub researching_next: Option<String>,
    pub defeated_date: Option<String>,
    pub renown_to_give: Option<i32>,
    pub ready_to_cycle: Option<bool>,
    pub has_sent_turn_reminder: Option<bool>,
    pub spectators: Option<Vec<String>>,
    pub credits: Option<i32>,
    pub credits_specialists: Option<i32>,
    pub ledger: Option<Ledger>,
    pub reputations: Option<Vec<Reputation>>,
    pub current_research_ticks_eta: Option<i32>,
    pub next_research_ticks_eta: Option<i32>,
    pub reputation: Option<Reputation>,
    pub is_online: Option<bool>,
    pub guild: Option<PlayerGuild>,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.alias, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub location: Location,
    pub specialist_expire_tick: Option<i32>,
    pub is_gift: bool,
    #[serde(rename = "_id")]
    pub id: String,
    pub owned_by_player_id: String,
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub effective_techs: EffectiveTechnologyLevels,
    pub orbiting: Option<String>,
    pub waypoints_looped: Option<bool>,
    pub specialist_id: Option<i32>,
    pub ships: Option<i32>,
    pub ticks_eta: Option<i32>,
    pub ticks_eta_total: Option<i32>,
    pub specialist: Option<Specialist>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Star {
    pub location: Location,
    pub owned_by_player_id: Option<String>,
    pub warp_gate: bool,
    pub is_nebula: bool,
    pub is_asteroid_field: bool,
    pub is_binary_star: bool,
    pub is_black_hole: bool,
    pub is_pulsar: bool,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub effective_techs: EffectiveTechnologyLevels,
    pub is_in_scanning_range: bool,
    pub infrastructure: Option<StarInfrastructure>,
    pub ships: Option<i32>,
    pub specialist_id: Option<i32>,
    pub specialist_expire_tick: Option<i32>,
    pub home_star: Option<bool>,
    pub worm_hole_to_star_id: Option<String>,
    pub natural_resources: Option<StarResources>,
    pub terraformed_resources: Option<StarResources>,
    pub manufacturing: Option<f64>,
    pub ignore_bulk_upgrade: Option<StarIgnoreBulkUpgrade>,
    pub upgrade_costs: Option<StarUpgradeCost>,
    pub specialist: Option<Specialist>,
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameGalaxy {
    pub players: Vec<Player>,
    pub stars: Vec<Star>,
    pub carriers: Vec<Carrier>,
}

/// The full galaxy state of one game at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSyncResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub settings: GameSettings,
    pub galaxy: GameGalaxy,
    pub state: GameState,
    pub constants: GameConstants,
    pub spectators: Vec<String>,
}

impl GameSyncResponse {
    pub fn name(&self) -> &str {
        &self.settings.general.name
    }

    /// The tick the server reported for this snapshot
    pub fn current_tick(&self) -> Tick {
        self.state.tick
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.galaxy.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_by_user_id(&self, user_id: &str) -> Option<&Player> {
        self.galaxy
            .players
            .iter()
            .find(|p| p.user_id.as_deref() == Some(user_id))
    }

    pub fn star(&self, star_id: &str) -> Option<&Star> {
        self.galaxy.stars.iter().find(|s| s.id == star_id)
    }

    pub fn carrier(&self, carrier_id: &str) -> Option<&Carrier> {
        self.galaxy.carriers.iter().find(|c| c.id == carrier_id)
    }

    pub fn player_stars<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a Star> {
        self.galaxy
            .stars
            .iter()
            .filter(move |s| s.owned_by_player_id.as_deref() == Some(player_id))
    }

    pub fn player_carriers<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a Carrier> {
        self.galaxy
            .carriers
            .iter()
            .filter(move |c| c.owned_by_player_id == player_id)
    }

    /// Players flagged as the viewing perspective. A well-formed player view
    /// has exactly one; spectator views have none.
    pub fn perspective_players(&self) -> Vec<&Player> {
        self.galaxy
            .players
            .iter()
            .filter(|p| p.has_perspective)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    fn item(level: i32, progress: Option<i32>) -> ResearchItemState {
        ResearchItemState { level, progress }
    }

    fn state(start_date: &str, last_tick_date: &str) -> GameState {
        GameState {
            locked: false,
            tick: 48,
            paused: false,
            production_tick: 2,
            start_date: start_date.to_string(),
            end_date: None,
            last_tick_date: last_tick_date.to_string(),
            ticks_to_end: None,
            players: 4,
            winner: None,
            cleaned: false,
            leaderboard: Vec::new(),
            stars: 80,
            stars_for_victory: 40,
        }
    }

    #[test]
    fn test_effective_levels_drop_progress() {
        let research = TechnologyLevels {
            scanning: item(1, Some(10)),
            hyperspace: item(2, None),
            terraforming: item(3, Some(0)),
            experimentation: item(4, None),
            weapons: item(5, Some(99)),
            banking: item(6, None),
            manufacturing: item(7, None),
            specialists: item(8, Some(1)),
        };

        assert_eq!(
            research.effective_levels(),
            EffectiveTechnologyLevels {
                scanning: 1,
                hyperspace: 2,
                terraforming: 3,
                experimentation: 4,
                weapons: 5,
                banking: 6,
                manufacturing: 7,
                specialists: 8,
            }
        );
    }

    #[test]
    fn test_state_timestamps_parse_rfc3339() {
        let state = state("2024-03-01T12:30:00.000Z", "2024-03-02T08:00:00+02:00");

        assert_eq!(
            state.started_at(),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(state.last_tick_at().map(|t| t.hour()), Some(6));
    }

    #[test]
    fn test_invalid_timestamps_are_none() {
        let state = state("not a date", "2024-13-40");
        assert!(state.started_at().is_none());
        assert!(state.last_tick_at().is_none());
    }
}
