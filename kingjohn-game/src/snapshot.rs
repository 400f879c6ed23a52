//! Snapshot codec: `GameState` to and from its plain structured form.
//!
//! The snapshot is a JSON map. Required keys must be present; optional keys
//! fall back to their new-game defaults so older saves keep loading.
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

use crate::calendar::{Date, DateRecord};
use crate::constants::{PAPAL_MAX, PAPAL_MIN, SCORE_MAX, SCORE_MIN, SNAPSHOT_VERSION};
use crate::error::EngineError;
use crate::flags::FlagValue;
use crate::numbers::clamped_add;
use crate::state::{Difficulty, GameState};

/// Encode a state as a versioned snapshot.
#[must_use]
pub fn encode(state: &GameState) -> Value {
    json!({
        "version": SNAPSHOT_VERSION,
        "date": state.current_date.to_record(),
        "location": state.location,
        "traveling_to": state.traveling_to,
        "travel_days_remaining": state.travel_days_remaining,
        "treasury": state.treasury,
        "royal_authority": state.royal_authority,
        "military_readiness": state.military_readiness,
        "papal_relations": state.papal_relations,
        "barons": state.barons,
        "regions": state.regions,
        "flags": state.flags,
        "event_history": state.event_history,
        "active_chains": state.active_chains,
        "days_played": state.days_played,
        "days_since_negative_treasury": state.days_since_negative_treasury,
        "difficulty": state.difficulty.as_str(),
    })
}

/// Decode a snapshot into a complete state.
///
/// # Errors
///
/// - [`EngineError::MissingField`] when a required key is absent
/// - [`EngineError::InvalidField`] when a key holds the wrong shape
/// - [`EngineError::InvalidDate`] when the stored date is out of range
pub fn decode(value: &Value) -> Result<GameState, EngineError> {
    let Some(map) = value.as_object() else {
        return Err(EngineError::InvalidField {
            field: "snapshot",
            reason: "expected a map".to_string(),
        });
    };

    match map.get("version").and_then(Value::as_str) {
        Some(SNAPSHOT_VERSION) => {}
        Some(other) => log::warn!(
            "snapshot version {other} differs from {SNAPSHOT_VERSION}; loading anyway"
        ),
        None => log::warn!("snapshot carries no version tag; loading as {SNAPSHOT_VERSION}"),
    }

    let record: DateRecord = required(map, "date")?;
    let current_date = Date::try_from(record)?;

    let treasury: i64 = required(map, "treasury")?;
    let royal_authority = score(map, "royal_authority", SCORE_MIN, SCORE_MAX)?;
    let military_readiness = score(map, "military_readiness", SCORE_MIN, SCORE_MAX)?;
    let papal_relations = score(map, "papal_relations", PAPAL_MIN, PAPAL_MAX)?;

    let barons = score_map(map, "barons")?;
    let regions = score_map(map, "regions")?;
    let flags: BTreeMap<String, FlagValue> = required(map, "flags")?;

    let difficulty = match optional::<String>(map, "difficulty")? {
        None => Difficulty::Normal,
        Some(raw) => raw.parse().unwrap_or_else(|()| {
            log::warn!("unknown difficulty `{raw}`; falling back to normal");
            Difficulty::Normal
        }),
    };

    Ok(GameState {
        current_date,
        location: required(map, "location")?,
        traveling_to: optional(map, "traveling_to")?,
        travel_days_remaining: optional(map, "travel_days_remaining")?.unwrap_or(0),
        treasury,
        royal_authority,
        military_readiness,
        papal_relations,
        barons,
        regions,
        flags,
        event_history: optional(map, "event_history")?.unwrap_or_default(),
        active_chains: optional(map, "active_chains")?.unwrap_or_default(),
        days_played: optional(map, "days_played")?.unwrap_or(0),
        days_since_negative_treasury: optional(map, "days_since_negative_treasury")?
            .unwrap_or(0),
        difficulty,
    })
}

/// Decode snapshot text.
///
/// # Errors
///
/// Returns [`EngineError::InvalidField`] when the text is not JSON, otherwise
/// whatever [`decode`] reports.
pub fn decode_str(text: &str) -> Result<GameState, EngineError> {
    let value: Value = serde_json::from_str(text).map_err(|err| EngineError::InvalidField {
        field: "snapshot",
        reason: err.to_string(),
    })?;
    decode(&value)
}

fn required<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<T, EngineError> {
    let value = map.get(field).ok_or(EngineError::MissingField(field))?;
    parse(value, field)
}

/// Absent and `null` both mean "use the default".
fn optional<T: DeserializeOwned>(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>, EngineError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => parse(value, field).map(Some),
    }
}

fn parse<T: DeserializeOwned>(value: &Value, field: &'static str) -> Result<T, EngineError> {
    serde_json::from_value(value.clone()).map_err(|err| EngineError::InvalidField {
        field,
        reason: err.to_string(),
    })
}

fn score(
    map: &Map<String, Value>,
    field: &'static str,
    min: i32,
    max: i32,
) -> Result<i32, EngineError> {
    let raw: i64 = required(map, field)?;
    let clamped = clamped_add(0, raw, min, max);
    if i64::from(clamped) != raw {
        log::warn!("{field} {raw} outside {min}..={max}; clamped to {clamped}");
    }
    Ok(clamped)
}

fn score_map(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<BTreeMap<String, i32>, EngineError> {
    let raw: BTreeMap<String, i64> = required(map, field)?;
    Ok(raw
        .into_iter()
        .map(|(id, value)| {
            let clamped = clamped_add(0, value, SCORE_MIN, SCORE_MAX);
            if i64::from(clamped) != value {
                log::warn!("{field}.{id} {value} outside 0..=100; clamped to {clamped}");
            }
            (id, clamped)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_snapshot() -> Value {
        json!({
            "version": "1.0",
            "date": {"year": 1205, "month": 3, "day": 14},
            "location": "york",
            "treasury": 5_000,
            "royal_authority": 60,
            "military_readiness": 55,
            "papal_relations": 30,
            "barons": {"william_marshal": 70},
            "regions": {"northern_england": 60},
            "flags": {}
        })
    }

    #[test]
    fn round_trips_a_played_state() {
        let mut state = GameState::new(Difficulty::Hard);
        state.start_travel("york", 4);
        for _ in 0..40 {
            state.advance_day();
        }
        state.treasury = -250;
        state.record_event("normandy_levy");
        state.begin_chain(FlagValue::from(vec!["canterbury", "stage_two"]));
        state
            .flags
            .insert("ratio".to_string(), FlagValue::Float(0.25));

        let decoded = decode(&encode(&state)).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn round_trips_empty_collections() {
        let mut state = GameState::default();
        state.flags.clear();
        state.barons.clear();
        state.regions.clear();
        assert_eq!(decode(&encode(&state)).unwrap(), state);
    }

    #[test]
    fn optional_fields_take_defaults() {
        let state = decode(&minimal_snapshot()).unwrap();
        assert_eq!(state.current_date, Date::new(1205, 3, 14).unwrap());
        assert_eq!(state.traveling_to, None);
        assert_eq!(state.travel_days_remaining, 0);
        assert!(state.event_history.is_empty());
        assert!(state.active_chains.is_empty());
        assert_eq!(state.days_played, 0);
        assert_eq!(state.difficulty, Difficulty::Normal);
    }

    #[test]
    fn missing_required_field_is_named() {
        for field in [
            "date",
            "location",
            "treasury",
            "royal_authority",
            "military_readiness",
            "papal_relations",
            "barons",
            "regions",
            "flags",
        ] {
            let mut snapshot = minimal_snapshot();
            snapshot.as_object_mut().unwrap().remove(field);
            assert_eq!(decode(&snapshot), Err(EngineError::MissingField(field)));
        }
    }

    #[test]
    fn wrong_shapes_are_invalid_fields() {
        let mut snapshot = minimal_snapshot();
        snapshot["treasury"] = json!("plenty");
        assert!(matches!(
            decode(&snapshot),
            Err(EngineError::InvalidField {
                field: "treasury",
                ..
            })
        ));

        let mut snapshot = minimal_snapshot();
        snapshot["days_played"] = json!(-3);
        assert!(matches!(
            decode(&snapshot),
            Err(EngineError::InvalidField {
                field: "days_played",
                ..
            })
        ));

        assert!(matches!(
            decode(&json!([1, 2, 3])),
            Err(EngineError::InvalidField { .. })
        ));
    }

    #[test]
    fn impossible_stored_date_is_rejected() {
        let mut snapshot = minimal_snapshot();
        snapshot["date"] = json!({"year": 1205, "month": 2, "day": 30});
        assert_eq!(
            decode(&snapshot),
            Err(EngineError::InvalidDate { month: 2, day: 30 })
        );
    }

    #[test]
    fn version_mismatch_still_loads() {
        let mut snapshot = minimal_snapshot();
        snapshot["version"] = json!("0.9");
        assert!(decode(&snapshot).is_ok());
        snapshot.as_object_mut().unwrap().remove("version");
        assert!(decode(&snapshot).is_ok());
    }

    #[test]
    fn unknown_difficulty_falls_back_to_normal() {
        let mut snapshot = minimal_snapshot();
        snapshot["difficulty"] = json!("legendary");
        assert_eq!(decode(&snapshot).unwrap().difficulty, Difficulty::Normal);
        snapshot["difficulty"] = json!("easy");
        assert_eq!(decode(&snapshot).unwrap().difficulty, Difficulty::Easy);
    }

    #[test]
    fn out_of_range_scores_are_clamped_on_load() {
        let mut snapshot = minimal_snapshot();
        snapshot["royal_authority"] = json!(140);
        snapshot["papal_relations"] = json!(-180);
        snapshot["regions"] = json!({"ireland": -5});
        let state = decode(&snapshot).unwrap();
        assert_eq!(state.royal_authority, 100);
        assert_eq!(state.papal_relations, -100);
        assert_eq!(state.regions["ireland"], 0);
    }

    #[test]
    fn encoded_keys_match_wire_format() {
        let value = encode(&GameState::default());
        assert_eq!(value["version"], "1.0");
        assert_eq!(value["date"], json!({"year": 1205, "month": 1, "day": 1}));
        assert_eq!(value["traveling_to"], Value::Null);
        assert_eq!(value["difficulty"], "normal");
        assert_eq!(value["flags"]["hostages_taken"], json!([]));
    }

    #[test]
    fn text_decoding_reports_bad_json() {
        assert!(decode_str("{not json").is_err());
        let text = serde_json::to_string(&minimal_snapshot()).unwrap();
        assert_eq!(decode_str(&text).unwrap().location, "york");
    }
}
