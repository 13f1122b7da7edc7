//! Shared fixtures: an in-memory game server and minimal wire documents

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use solaris_sync::cache::TickCache;
use solaris_sync::client::{SolarisClient, Transport, TransportError};
use solaris_sync::log::{Level, Logger};

pub const GAME_ID: &str = "g1";

enum Reply {
    Body(String),
    Status(u16),
}

/// Transport that answers from a fixed route table and records every call.
///
/// Routes are keyed by `path` or `path?k=v&k=v` with parameters in the
/// order the client sends them.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, key: &str, body: Value) -> Self {
        self.routes
            .lock()
            .insert(key.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn route_raw(self, key: &str, body: &str) -> Self {
        self.routes
            .lock()
            .insert(key.to_string(), Reply::Body(body.to_string()));
        self
    }

    pub fn fail(self, key: &str, status: u16) -> Self {
        self.routes
            .lock()
            .insert(key.to_string(), Reply::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.requests.lock().iter().filter(|r| *r == key).count()
    }

    fn reply(&self, key: String) -> Result<String, TransportError> {
        self.requests.lock().push(key.clone());
        match self.routes.lock().get(&key) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(TransportError::Status {
                status: *status,
                body: String::new(),
            }),
            None => Err(TransportError::Status {
                status: 404,
                body: format!("no route for {}", key),
            }),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, TransportError> {
        let key = if query.is_empty() {
            path.to_string()
        } else {
            let params: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", path, params.join("&"))
        };
        self.reply(key)
    }

    async fn post_json(&self, path: &str, _body: &Value) -> Result<String, TransportError> {
        self.reply(path.to_string())
    }
}

/// Logger that keeps every line for assertions
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}

pub fn client(transport: MockTransport, cache: TickCache) -> SolarisClient<MockTransport> {
    SolarisClient::with_transport(Arc::new(RecordingLogger::default()), transport, cache)
}

pub fn galaxy_key(tick: Option<i64>) -> String {
    match tick {
        Some(t) => format!("/api/game/{}/galaxy?tick={}", GAME_ID, t),
        None => format!("/api/game/{}/galaxy", GAME_ID),
    }
}

pub fn intel_key(start: i64, end: i64) -> String {
    format!(
        "/api/game/{}/intel?startTick={}&endTick={}",
        GAME_ID, start, end
    )
}

pub fn events_key() -> String {
    format!("/api/game/{}/events", GAME_ID)
}

fn techs() -> Value {
    json!({
        "scanning": 1, "hyperspace": 1, "terraforming": 1, "experimentation": 1,
        "weapons": 1, "banking": 1, "manufacturing": 1, "specialists": 1
    })
}

fn player(id: &str, alias: &str, has_perspective: bool) -> Value {
    let item = json!({ "level": 1, "progress": 0 });
    json!({
        "research": {
            "scanning": item, "hyperspace": item, "terraforming": item,
            "experimentation": item, "weapons": item, "banking": item,
            "manufacturing": item, "specialists": item
        },
        "avatar": "avatar.png",
        "shape": "circle",
        "isOpenSlot": false,
        "defeated": false,
        "afk": false,
        "ready": false,
        "readyToQuit": false,
        "missedTurns": 0,
        "hasFilledAfkSlot": false,
        "_id": id,
        "homeStarId": format!("home-{}", id),
        "alias": alias,
        "colour": { "alias": "blue", "value": "0x0000ff" },
        "diplomacy": [],
        "stats": {
            "totalStars": 6, "totalHomeStars": 1, "totalCarriers": 2, "totalShips": 30,
            "totalEconomy": 5, "totalIndustry": 5, "totalScience": 1, "newShips": 1.5,
            "warpgates": 0, "totalStarSpecialists": 0, "totalCarrierSpecialists": 0,
            "totalSpecialists": 0
        },
        "hasDuplicateIP": false,
        "hasPerspective": has_perspective,
        "isAIControlled": false,
        "isInScanningRange": true,
        "isRealUser": true,
        "userId": format!("user-{}", id)
    })
}

fn settings(name: &str) -> Value {
    json!({
        "general": {
            "fluxId": 1, "description": "", "type": "custom", "mode": "conquest",
            "featured": false, "passwordRequired": false, "playerLimit": 2,
            "playerType": "all", "anonymity": "normal", "playerOnlineStatus": "visible",
            "timeMachine": "disabled", "awardRankTo": "all", "fluxEnabled": "disabled",
            "advancedAI": "disabled", "spectators": "disabled", "readyToQuit": "enabled",
            "name": name,
            "flux": { "id": 1, "name": "Flux", "month": "January", "description": "", "tooltip": "" }
        },
        "galaxy": { "galaxyType": "circular", "starsPerPlayer": 20, "productionTicks": 24 },
        "specialGalaxy": {
            "specialistBans": { "star": [], "carrier": [] },
            "carrierCost": "standard", "carrierUpkeepCost": "standard",
            "warpgateCost": "standard", "specialistCost": "standard",
            "specialistsCurrency": "creditsSpecialists",
            "randomWarpGates": 0, "randomWormHoles": 0, "randomNebulas": 0,
            "randomAsteroidFields": 0, "randomBinaryStars": 0, "randomBlackHoles": 0,
            "randomPulsars": 0, "darkGalaxy": "disabled", "giftCarriers": "enabled",
            "defenderBonus": "enabled", "carrierToCarrierCombat": "enabled",
            "splitResources": "disabled", "resourceDistribution": "random",
            "playerDistribution": "circular", "carrierSpeed": 5, "starCaptureReward": "enabled"
        },
        "conquest": { "victoryCondition": "starPercentage", "victoryPercentage": 50, "capitalStarElimination": "disabled" },
        "kingOfTheHill": { "productionCycles": 2 },
        "orbitalMechanics": { "enabled": "disabled", "orbitSpeed": 3 },
        "player": {
            "startingInfrastructure": { "economy": 5, "industry": 5, "science": 1 },
            "developmentCost": { "economy": "standard", "industry": "standard", "science": "standard" },
            "populationCap": { "enabled": "disabled", "shipsPerStar": 100 },
            "startingStars": 6, "startingCredits": 500, "startingCreditsSpecialists": 5,
            "startingShips": 10, "tradeCredits": true, "tradeCreditsSpecialists": true,
            "tradeCost": 15, "tradeScanning": "all"
        },
        "diplomacy": {
            "enabled": "disabled", "tradeRestricted": "disabled", "maxAlliances": 2,
            "upkeepCost": "none", "globalEvents": "disabled"
        },
        "technology": {
            "startingTechnologyLevel": techs(),
            "researchCosts": {
                "scanning": "standard", "hyperspace": "standard", "terraforming": "standard",
                "experimentation": "standard", "weapons": "standard", "banking": "standard",
                "manufacturing": "standard", "specialists": "standard"
            },
            "bankingReward": "standard", "experimentationReward": "standard",
            "specialistTokenReward": "standard"
        },
        "gameTime": {
            "afk": { "lastSeenTimeout": 2, "cycleTimeout": 3, "turnTimeout": 30 },
            "gameType": "turnBased", "speed": 1800, "startDelay": 30, "turnJumps": 8,
            "maxTurnWait": 1440, "isTickLimited": "disabled"
        }
    })
}

fn constants() -> Value {
    json!({
        "distances": {
            "galaxyCenterLocation": { "x": 0.0, "y": 0.0 },
            "lightYear": 50, "minDistanceBetweenStars": 50,
            "maxDistanceBetweenStars": 500, "warpSpeedMultiplier": 3
        },
        "research": { "progressMultiplier": 50, "sciencePointMultiplier": 1, "experimentationMultiplier": 1 },
        "star": {
            "resources": { "minNaturalResources": 10, "maxNaturalResources": 50 },
            "infrastructureCostMultipliers": { "warpGate": 100, "economy": 2.5, "industry": 5, "science": 20, "carrier": 10 },
            "infrastructureExpenseMultipliers": { "cheap": 1.0, "standard": 2.0 },
            "specialistsExpenseMultipliers": {},
            "captureRewardMultiplier": 10,
            "homeStarDefenderBonusMultiplier": 1
        },
        "diplomacy": { "upkeepExpenseMultipliers": { "none": 0.0 } },
        "player": { "rankRewardMultiplier": 100, "bankingCycleRewardMultiplier": 75 },
        "specialists": { "monthlyBanAmount": 3 }
    })
}

/// Snapshot at `tick` with one player per entry of `perspective`
pub fn snapshot_with_perspective(tick: i64, perspective: &[bool]) -> Value {
    let players: Vec<Value> = perspective
        .iter()
        .enumerate()
        .map(|(i, flag)| player(&format!("p{}", i + 1), &format!("Player {}", i + 1), *flag))
        .collect();

    json!({
        "_id": GAME_ID,
        "settings": settings("Test Galaxy"),
        "galaxy": {
            "players": players,
            "stars": [{
                "location": { "x": 1.25, "y": -3.5 },
                "ownedByPlayerId": "p1",
                "warpGate": false, "isNebula": false, "isAsteroidField": false,
                "isBinaryStar": false, "isBlackHole": false, "isPulsar": false,
                "_id": "s1", "name": "Vega",
                "effectiveTechs": techs(),
                "isInScanningRange": true,
                "infrastructure": { "economy": 5, "industry": 5, "science": 1 },
                "ships": 12
            }],
            "carriers": [{
                "location": { "x": 1.25, "y": -3.5 },
                "isGift": false,
                "_id": "c1",
                "ownedByPlayerId": "p1",
                "name": "Vega 1",
                "waypoints": [],
                "effectiveTechs": techs(),
                "orbiting": "s1",
                "ships": 10
            }]
        },
        "state": {
            "locked": false, "tick": tick, "paused": false, "productionTick": 0,
            "startDate": "2024-01-01T00:00:00.000Z",
            "lastTickDate": "2024-01-02T00:00:00.000Z",
            "players": perspective.len(), "cleaned": false,
            "leaderboard": ["p1"], "stars": 40, "starsForVictory": 20
        },
        "constants": constants(),
        "spectators": []
    })
}

/// Snapshot at `tick` viewed as `p1`, with an opponent `p2`
pub fn snapshot(tick: i64) -> Value {
    snapshot_with_perspective(tick, &[true, false])
}

pub fn intel_tick(tick: i64) -> Value {
    let level = json!({ "level": 1 });
    json!({
        "_id": format!("intel-{}", tick),
        "gameId": GAME_ID,
        "tick": tick,
        "players": [{
            "statistics": {
                "totalStars": 6, "totalHomeStars": 1, "totalEconomy": 5 + tick,
                "totalIndustry": 5, "totalScience": 1, "totalShips": 30,
                "totalCarriers": 2, "totalSpecialists": 0, "totalStarSpecialists": 0,
                "totalCarrierSpecialists": 0, "newShips": 1.5, "warpgates": 0
            },
            "research": {
                "scanning": level, "hyperspace": level, "terraforming": level,
                "experimentation": level, "weapons": level, "banking": level,
                "manufacturing": level, "specialists": level
            },
            "playerId": "p1"
        }]
    })
}

pub fn intel_run(start: i64, end: i64) -> Value {
    Value::Array((start..=end).map(intel_tick).collect())
}

pub fn events(count: usize) -> Value {
    let events: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "_id": format!("ev{}", i),
                "gameId": GAME_ID,
                "tick": i,
                "type": "playerCreditsSent",
                "playerId": "p1",
                "read": true,
                "data": { "toPlayerId": "p2", "credits": 25 }
            })
        })
        .collect();
    json!({ "count": count, "events": events })
}

pub fn overview(id: &str, name: &str, tick: i64) -> Value {
    json!({
        "_id": id,
        "settings": {
            "general": { "type": "custom", "playerLimit": 2, "name": name },
            "galaxy": { "productionTicks": 24 },
            "gameTime": {
                "afk": { "lastSeenTimeout": 2, "cycleTimeout": 3, "turnTimeout": 30 },
                "gameType": "turnBased", "speed": 1800, "startDelay": 30, "turnJumps": 8,
                "maxTurnWait": 1440, "isTickLimited": "disabled"
            }
        },
        "state": {
            "locked": false, "tick": tick, "paused": false, "productionTick": 0,
            "players": 2, "cleaned": false, "stars": 40, "starsForVictory": 20
        },
        "userNotifications": { "unreadEvents": 1 }
    })
}

/// Game info document (same as an overview minus notifications)
pub fn info(id: &str, name: &str, tick: i64) -> Value {
    let mut doc = overview(id, name, tick);
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("userNotifications");
    }
    doc
}
