//! Tag-dispatch decoding of the event log
//!
//! Each event's `type` tag is looked up in a closed table that says whether
//! the event carries a `data` payload and how to decode it. Tags missing from
//! the table are kept as payload-less events so new server-side event kinds
//! do not break older clients.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{from_value, DecodeError};
use crate::models::events::{EventPayload, GameEvent, GameEventsResponse};

type DecodeFn = fn(Value) -> Result<EventPayload, serde_json::Error>;

/// What an event tag says about its `data` field
#[derive(Clone, Copy)]
pub enum PayloadShape {
    /// The event never carries data
    Bare,
    /// The event must carry data of this shape
    Data(DecodeFn),
}

impl std::fmt::Debug for PayloadShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadShape::Bare => f.write_str("Bare"),
            PayloadShape::Data(_) => f.write_str("Data"),
        }
    }
}

fn data<T: DeserializeOwned>(raw: Value, wrap: fn(T) -> EventPayload) -> Result<EventPayload, serde_json::Error> {
    from_value(raw).map(wrap)
}

/// Look up the payload shape for an event tag. `None` means the tag is unknown.
pub fn shape_for(tag: &str) -> Option<PayloadShape> {
    use EventPayload as P;
    use PayloadShape::{Bare, Data};

    let shape = match tag {
        "gameStarted" => Bare,
        "gamePlayerJoined" => Data(|raw| data(raw, P::PlayerJoined)),
        "gamePlayerQuit" => Data(|raw| data(raw, P::PlayerQuit)),
        "gamePlayerDefeated" => Data(|raw| data(raw, P::PlayerDefeated)),
        "gamePlayerAFK" => Data(|raw| data(raw, P::PlayerAfk)),
        "gameEnded" => Data(|raw| data(raw, P::GameEnded)),
        "gamePlayerBadgePurchased" => Data(|raw| data(raw, P::BadgePurchased)),
        "gameDiplomacyPeaceDeclared"
        | "gameDiplomacyWarDeclared"
        | "playerDiplomacyStatusChanged" => Data(|raw| data(raw, P::DiplomacyStatusChanged)),
        "playerGalacticCycleComplete" => Data(|raw| data(raw, P::GalacticCycleComplete)),
        "playerCombatStar" => Data(|raw| data(raw, P::CombatStar)),
        "playerCombatCarrier" => Data(|raw| data(raw, P::CombatCarrier)),
        "playerResearchComplete" => Data(|raw| data(raw, P::ResearchComplete)),
        "playerTechnologyReceived" => Data(|raw| data(raw, P::TechnologyReceived)),
        "playerTechnologySent" => Data(|raw| data(raw, P::TechnologySent)),
        "playerCreditsReceived" => Data(|raw| data(raw, P::CreditsReceived)),
        "playerCreditsSent" => Data(|raw| data(raw, P::CreditsSent)),
        "playerCreditsSpecialistsReceived" => Data(|raw| data(raw, P::CreditsSpecialistsReceived)),
        "playerCreditsSpecialistsSent" => Data(|raw| data(raw, P::CreditsSpecialistsSent)),
        "playerRenownReceived" => Data(|raw| data(raw, P::RenownReceived)),
        "playerRenownSent" => Data(|raw| data(raw, P::RenownSent)),
        "playerGiftReceived" => Data(|raw| data(raw, P::GiftReceived)),
        "playerGiftSent" => Data(|raw| data(raw, P::GiftSent)),
        "playerStarAbandoned" => Data(|raw| data(raw, P::StarAbandoned)),
        "playerStarDied" => Data(|raw| data(raw, P::StarDied)),
        "playerStarReignited" => Data(|raw| data(raw, P::StarReignited)),
        "playerBulkInfrastructureUpgraded" => Data(|raw| data(raw, P::BulkInfrastructureUpgraded)),
        "playerDebtSettled" => Data(|raw| data(raw, P::DebtSettled)),
        "playerDebtForgiven" => Data(|raw| data(raw, P::DebtForgiven)),
        "playerStarSpecialistHired" => Data(|raw| data(raw, P::StarSpecialistHired)),
        "playerCarrierSpecialistHired" => Data(|raw| data(raw, P::CarrierSpecialistHired)),
        "playerConversationCreated" => Data(|raw| data(raw, P::ConversationCreated)),
        "playerConversationInvited" => Data(|raw| data(raw, P::ConversationInvited)),
        "playerConversationLeft" => Data(|raw| data(raw, P::ConversationLeft)),
        _ => return None,
    };
    Some(shape)
}

/// Every tag with an entry in [`shape_for`]
pub const KNOWN_TAGS: &[&str] = &[
    "gameStarted",
    "gamePlayerJoined",
    "gamePlayerQuit",
    "gamePlayerDefeated",
    "gamePlayerAFK",
    "gameEnded",
    "gamePlayerBadgePurchased",
    "gameDiplomacyPeaceDeclared",
    "gameDiplomacyWarDeclared",
    "playerDiplomacyStatusChanged",
    "playerGalacticCycleComplete",
    "playerCombatStar",
    "playerCombatCarrier",
    "playerResearchComplete",
    "playerTechnologyReceived",
    "playerTechnologySent",
    "playerCreditsReceived",
    "playerCreditsSent",
    "playerCreditsSpecialistsReceived",
    "playerCreditsSpecialistsSent",
    "playerRenownReceived",
    "playerRenownSent",
    "playerGiftReceived",
    "playerGiftSent",
    "playerStarAbandoned",
    "playerStarDied",
    "playerStarReignited",
    "playerBulkInfrastructureUpgraded",
    "playerDebtSettled",
    "playerDebtForgiven",
    "playerStarSpecialistHired",
    "playerCarrierSpecialistHired",
    "playerConversationCreated",
    "playerConversationInvited",
    "playerConversationLeft",
];

const EVENT: &str = "event";

/// Value stored under `field`, matching the key without regard to case
fn lookup<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).or_else(|| {
        obj.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(field))
            .map(|(_, value)| value)
    })
}

fn take(obj: &mut Map<String, Value>, field: &str) -> Option<Value> {
    if let Some(value) = obj.remove(field) {
        return Some(value);
    }
    let key = obj.keys().find(|key| key.eq_ignore_ascii_case(field))?.clone();
    obj.remove(&key)
}

fn required_str(obj: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    match lookup(obj, field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { what: EVENT, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(DecodeError::InvalidField { what: EVENT, field }),
    }
}

fn optional_str(obj: &Map<String, Value>, field: &'static str) -> Result<Option<String>, DecodeError> {
    match lookup(obj, field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::InvalidField { what: EVENT, field }),
    }
}

fn optional_bool(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, DecodeError> {
    match lookup(obj, field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DecodeError::InvalidField { what: EVENT, field }),
    }
}

fn required_i64(obj: &Map<String, Value>, field: &'static str) -> Result<i64, DecodeError> {
    match lookup(obj, field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField { what: EVENT, field }),
        Some(v) => v.as_i64().ok_or(DecodeError::InvalidField { what: EVENT, field }),
    }
}

/// Decode one raw event element
pub fn decode_event(raw: Value) -> Result<GameEvent, DecodeError> {
    let Value::Object(mut obj) = raw else {
        return Err(DecodeError::NotAnObject(EVENT));
    };

    let id = required_str(&obj, "_id")?;
    let player_id = optional_str(&obj, "playerId")?;
    let read = optional_bool(&obj, "read")?;
    let game_id = required_str(&obj, "gameId")?;
    let tick = required_i64(&obj, "tick")?;
    let event_type = required_str(&obj, "type")?;

    let data = match shape_for(&event_type) {
        None | Some(PayloadShape::Bare) => EventPayload::None,
        Some(PayloadShape::Data(decode)) => {
            let raw = match take(&mut obj, "data") {
                None | Some(Value::Null) => {
                    return Err(DecodeError::MissingPayload { tag: event_type })
                }
                Some(raw) => raw,
            };
            let raw_text = raw.to_string();
            decode(raw).map_err(|source| DecodeError::Payload {
                tag: event_type.clone(),
                raw: raw_text,
                source,
            })?
        }
    };

    Ok(GameEvent {
        id,
        player_id,
        read,
        game_id,
        tick,
        event_type,
        data,
    })
}

/// Decode a full `{count, events}` body. Any bad event fails the whole batch.
pub fn decode_events_response(raw: Value) -> Result<GameEventsResponse, DecodeError> {
    const WHAT: &str = "events response";

    let Value::Object(mut obj) = raw else {
        return Err(DecodeError::NotAnObject(WHAT));
    };

    let count = match lookup(&obj, "count") {
        None | Some(Value::Null) => {
            return Err(DecodeError::MissingField { what: WHAT, field: "count" })
        }
        Some(v) => v
            .as_i64()
            .ok_or(DecodeError::InvalidField { what: WHAT, field: "count" })?,
    };

    let items = match take(&mut obj, "events") {
        None | Some(Value::Null) => {
            return Err(DecodeError::MissingField { what: WHAT, field: "events" })
        }
        Some(Value::Array(items)) => items,
        Some(_) => return Err(DecodeError::NotAnArray("events")),
    };

    let events = items
        .into_iter()
        .map(decode_event)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GameEventsResponse { count, events })
}
