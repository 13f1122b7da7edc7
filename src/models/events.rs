//! Game event log (`/api/game/{id}/events`) wire types
//!
//! Every event carries a `type` tag that selects the shape of its `data`
//! payload. The payload records live here; the tag table that picks between
//! them lives in [`crate::codec::events`].

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use super::sync::StarResources;
use super::Tick;

/// A ship count as reported in combat results.
///
/// The server sends a number for visible counts and a string (usually `"?"`)
/// for counts hidden from the viewer. The representation is kept so that an
/// encoded value decodes back to the same variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShipCount {
    Number(i64),
    Text(String),
}

impl ShipCount {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            ShipCount::Number(n) => Some(*n),
            ShipCount::Text(_) => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, ShipCount::Text(_))
    }
}

impl From<i64> for ShipCount {
    fn from(value: i64) -> Self {
        ShipCount::Number(value)
    }
}

impl From<&str> for ShipCount {
    fn from(value: &str) -> Self {
        ShipCount::Text(value.to_string())
    }
}

impl fmt::Display for ShipCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipCount::Number(n) => write!(f, "{}", n),
            ShipCount::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for ShipCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShipCount::Number(n) => serializer.serialize_i64(*n),
            ShipCount::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for ShipCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ShipCountVisitor;

        impl<'de> Visitor<'de> for ShipCountVisitor {
            type Value = ShipCount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a string ship count")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ShipCount, E> {
                Ok(ShipCount::Number(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ShipCount, E> {
                i64::try_from(v)
                    .map(ShipCount::Number)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ShipCount, E> {
                Ok(ShipCount::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ShipCount, E> {
                Ok(ShipCount::Text(v))
            }
        }

        deserializer.deserialize_any(ShipCountVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatResultWeapons {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defender_base: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker_base: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCombatShipCounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defender: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attacker: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCombatSpecialist {
    pub id: i32,
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatStar {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub owned_by_player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist: Option<PlayerCombatSpecialist>,
    pub before: ShipCount,
    pub after: ShipCount,
    pub lost: ShipCount,
    pub scrambled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatCarrier {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub owned_by_player_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialist: Option<PlayerCombatSpecialist>,
    pub before: ShipCount,
    pub lost: ShipCount,
    pub after: ShipCount,
    pub scrambled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCombatResult {
    pub weapons: PlayerCombatResultWeapons,
    pub before: PlayerCombatShipCounts,
    pub after: PlayerCombatShipCounts,
    pub lost: PlayerCombatShipCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Option<PlayerCombatStar>,
    pub carriers: Vec<PlayerCombatCarrier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatStarCaptureResult {
    pub captured_by_id: String,
    pub captured_by_alias: String,
    pub capture_reward: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloRatingChange {
    #[serde(rename = "_id")]
    pub id: String,
    pub new_rating: i32,
    pub old_rating: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloRatingChangeResult {
    pub winner: EloRatingChange,
    pub loser: EloRatingChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRanking {
    pub player_id: String,
    pub current: i32,
    #[serde(rename = "new")]
    pub new_rank: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRankingResult {
    pub ranks: Vec<GameRanking>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elo_rating: Option<EloRatingChangeResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpgradeReportStar {
    pub star_id: String,
    pub star_name: String,
    pub natural_resources: StarResources,
    pub infrastructure_current: i32,
    pub infrastructure_cost_total: i32,
    pub infrastructure: i32,
    pub infrastructure_cost: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpgradeReport {
    pub budget: i32,
    pub stars: Vec<BulkUpgradeReportStar>,
    pub cost: i32,
    pub upgraded: i32,
    pub infrastructure_type: String,
    pub ignored_count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyTransfer {
    pub name: String,
    pub level: i32,
    pub difference: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatCarrierEventData {
    pub player_id_defenders: Vec<String>,
    pub player_id_attackers: Vec<String>,
    pub combat_result: PlayerCombatResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGalacticCycleCompleteEventData {
    pub game_id: String,
    pub game_tick: Tick,
    pub player_id: String,
    pub credits_economy: i32,
    pub credits_banking: i32,
    pub credits_specialists: i32,
    pub experiment_technology: String,
    pub experiment_technology_level: i32,
    pub experiment_amount: i32,
    pub experiment_level_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_researching_next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_upkeep: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alliance_upkeep: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatStarEventData {
    pub player_id_owner: String,
    pub player_id_defenders: Vec<String>,
    pub player_id_attackers: Vec<String>,
    pub star_id: String,
    pub star_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_result: Option<PlayerCombatStarCaptureResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combat_result: Option<PlayerCombatResult>,
}

/// Shared shape of the joined, quit and afk events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAliasEventData {
    pub player_id: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDefeatedEventData {
    pub player_id: String,
    pub alias: String,
    pub open_slot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEndedEventData {
    pub ranking_result: GameRankingResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResearchCompleteEventData {
    pub technology_key: String,
    pub technology_level: i32,
    pub technology_key_next: String,
    pub technology_level_next: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTechnologyReceivedEventData {
    pub from_player_id: String,
    pub technology: TechnologyTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerTechnologySentEventData {
    pub to_player_id: String,
    pub technology: TechnologyTransfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCreditsReceivedEventData {
    pub from_player_id: String,
    pub credits: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCreditsSentEventData {
    pub to_player_id: String,
    pub credits: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCreditsSpecialistsReceivedEventData {
    pub from_player_id: String,
    pub credits_specialists: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCreditsSpecialistsSentEventData {
    pub to_player_id: String,
    pub credits_specialists: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRenownReceivedEventData {
    pub from_player_id: String,
    pub renown: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRenownSentEventData {
    pub to_player_id: String,
    pub renown: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGiftReceivedEventData {
    pub from_player_id: String,
    pub carrier_id: String,
    pub carrier_name: String,
    pub carrier_ships: i32,
    pub star_id: String,
    pub star_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGiftSentEventData {
    pub to_player_id: String,
    pub carrier_id: String,
    pub carrier_name: String,
    pub carrier_ships: i32,
    pub star_id: String,
    pub star_name: String,
}

/// Shared shape of the abandoned, died and reignited star events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStarEventData {
    pub star_id: String,
    pub star_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerBulkInfrastructureUpgradedEventData {
    pub upgrade_report: BulkUpgradeReport,
}

/// Shared shape of the debt settled and forgiven events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDebtEventData {
    pub debtor_player_id: String,
    pub creditor_player_id: String,
    pub amount: i32,
    pub ledger_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStarSpecialistHiredEventData {
    pub star_id: String,
    pub star_name: String,
    pub specialist_id: i32,
    pub specialist_name: String,
    pub specialist_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCarrierSpecialistHiredEventData {
    pub carrier_id: String,
    pub carrier_name: String,
    pub specialist_id: i32,
    pub specialist_name: String,
    pub specialist_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConversationCreatedEventData {
    pub conversation_id: String,
    pub created_by: String,
    pub name: String,
    pub participants: Vec<String>,
}

/// Shared shape of the conversation invited and left events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConversationMemberEventData {
    pub conversation_id: String,
    pub name: String,
    pub player_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayerBadgePurchasedEventData {
    pub purchased_by_player_id: String,
    pub purchased_by_player_alias: String,
    pub purchased_for_player_id: String,
    pub purchased_for_player_alias: String,
    pub badge_key: String,
    pub badge_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDiplomacyStatusChangedEventData {
    pub player_id_from: String,
    pub player_id_to: String,
    pub player_from_alias: String,
    pub player_to_alias: String,
    pub status_from: String,
    pub status_to: String,
    pub actual_status: String,
}

macro_rules! event_payloads {
    ($($variant:ident($data:ty)),+ $(,)?) => {
        /// Decoded `data` of an event, one variant per payload shape.
        ///
        /// `None` covers both tags that never carry data and tags this client
        /// does not know about.
        #[derive(Debug, Clone, PartialEq)]
        pub enum EventPayload {
            None,
            $($variant($data),)+
        }

        impl Serialize for EventPayload {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    EventPayload::None => serializer.serialize_none(),
                    $(EventPayload::$variant(data) => data.serialize(serializer),)+
                }
            }
        }
    };
}

event_payloads! {
    PlayerJoined(PlayerAliasEventData),
    PlayerQuit(PlayerAliasEventData),
    PlayerDefeated(PlayerDefeatedEventData),
    PlayerAfk(PlayerAliasEventData),
    GameEnded(GameEndedEventData),
    BadgePurchased(GamePlayerBadgePurchasedEventData),
    DiplomacyStatusChanged(PlayerDiplomacyStatusChangedEventData),
    GalacticCycleComplete(PlayerGalacticCycleCompleteEventData),
    CombatStar(PlayerCombatStarEventData),
    CombatCarrier(PlayerCombatCarrierEventData),
    ResearchComplete(PlayerResearchCompleteEventData),
    TechnologyReceived(PlayerTechnologyReceivedEventData),
    TechnologySent(PlayerTechnologySentEventData),
    CreditsReceived(PlayerCreditsReceivedEventData),
    CreditsSent(PlayerCreditsSentEventData),
    CreditsSpecialistsReceived(PlayerCreditsSpecialistsReceivedEventData),
    CreditsSpecialistsSent(PlayerCreditsSpecialistsSentEventData),
    RenownReceived(PlayerRenownReceivedEventData),
    RenownSent(PlayerRenownSentEventData),
    GiftReceived(PlayerGiftReceivedEventData),
    GiftSent(PlayerGiftSentEventData),
    StarAbandoned(PlayerStarEventData),
    StarDied(PlayerStarEventData),
    StarReignited(PlayerStarEventData),
    BulkInfrastructureUpgraded(PlayerBulkInfrastructureUpgradedEventData),
    DebtSettled(PlayerDebtEventData),
    DebtForgiven(PlayerDebtEventData),
    StarSpecialistHired(PlayerStarSpecialistHiredEventData),
    CarrierSpecialistHired(PlayerCarrierSpecialistHiredEventData),
    ConversationCreated(PlayerConversationCreatedEventData),
    ConversationInvited(PlayerConversationMemberEventData),
    ConversationLeft(PlayerConversationMemberEventData),
}

impl EventPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, EventPayload::None)
    }
}

/// One entry of a game's event log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    pub game_id: String,
    pub tick: Tick,
    /// Raw tag, kept verbatim even when it is not a known event kind
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "EventPayload::is_none")]
    pub data: EventPayload,
}

impl<'de> Deserialize<'de> for GameEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::codec::events::decode_event(raw).map_err(de::Error::custom)
    }
}

/// Body of `/api/game/{id}/events`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameEventsResponse {
    pub count: i64,
    pub events: Vec<GameEvent>,
}

impl GameEventsResponse {
    pub fn empty() -> Self {
        Self {
            count: 0,
            events: Vec::new(),
        }
    }
}

impl<'de> Deserialize<'de> for GameEventsResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::codec::events::decode_events_response(raw).map_err(de::Error::custom)
    }
}
