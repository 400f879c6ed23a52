//! Consequences: the structured outcome of a decision or event.
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    PAPAL_MAX, PAPAL_MIN, SCORE_MAX, SCORE_MIN, STARTING_BARONS, STARTING_REGIONS,
};
use crate::error::EngineError;
use crate::flags::FlagValue;

/// Scalar resources a consequence may adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Treasury,
    Authority,
    Military,
    Papal,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [Self::Treasury, Self::Authority, Self::Military, Self::Papal];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Treasury => "treasury",
            Self::Authority => "authority",
            Self::Military => "military",
            Self::Papal => "papal",
        }
    }

    /// Clamp range applied after a delta. The treasury is never clamped: a
    /// negative balance is what drives the bankruptcy countdown.
    #[must_use]
    pub const fn bounds(self) -> Option<(i32, i32)> {
        match self {
            Self::Treasury => None,
            Self::Authority | Self::Military => Some((SCORE_MIN, SCORE_MAX)),
            Self::Papal => Some((PAPAL_MIN, PAPAL_MAX)),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "treasury" => Ok(Self::Treasury),
            "authority" => Ok(Self::Authority),
            "military" => Ok(Self::Military),
            "papal" => Ok(Self::Papal),
            _ => Err(()),
        }
    }
}

/// Deltas and replacements to apply to the kingdom.
///
/// Every sub-map is optional. Resource, relationship and region entries are
/// deltas; flag entries replace the stored value outright. Keys the engine
/// does not know are carried but skipped on application, so newer event
/// content keeps loading in older engines. Only known keys must carry an
/// integer delta; unknown keys with any other value are dropped while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Consequence {
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "resource_deltas"
    )]
    pub resources: BTreeMap<String, i64>,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "baron_deltas"
    )]
    pub relationships: BTreeMap<String, i64>,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "region_deltas"
    )]
    pub regions: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, FlagValue>,
}

impl Consequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn resource(mut self, kind: ResourceKind, delta: i64) -> Self {
        let total = self.resources.entry(kind.key().to_string()).or_default();
        *total = total.saturating_add(delta);
        self
    }

    #[must_use]
    pub fn relationship(mut self, baron: &str, delta: i64) -> Self {
        let total = self.relationships.entry(baron.to_string()).or_default();
        *total = total.saturating_add(delta);
        self
    }

    #[must_use]
    pub fn region(mut self, region: &str, delta: i64) -> Self {
        let total = self.regions.entry(region.to_string()).or_default();
        *total = total.saturating_add(delta);
        self
    }

    #[must_use]
    pub fn flag(mut self, name: &str, value: impl Into<FlagValue>) -> Self {
        self.flags.insert(name.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.relationships.is_empty()
            && self.regions.is_empty()
            && self.flags.is_empty()
    }

    /// Known resource deltas in application order; unknown keys are dropped.
    pub fn resource_deltas(&self) -> impl Iterator<Item = (ResourceKind, i64)> + '_ {
        self.resources.iter().filter_map(|(key, delta)| match key.parse() {
            Ok(kind) => Some((kind, *delta)),
            Err(()) => {
                log::debug!("ignoring unknown resource `{key}` in consequence");
                None
            }
        })
    }

    /// Parse a consequence from its plain structured form.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedConsequence`] when the value is not a map,
    /// or when a sub-map or delta has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, EngineError> {
        if !value.is_object() {
            return Err(EngineError::MalformedConsequence(format!(
                "expected a map, found {}",
                value_kind(value)
            )));
        }
        serde_json::from_value(value.clone())
            .map_err(|err| EngineError::MalformedConsequence(err.to_string()))
    }

    /// Parse a consequence from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedConsequence`] when the text is not valid
    /// JSON or does not describe a consequence map.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|err| EngineError::MalformedConsequence(err.to_string()))?;
        Self::from_value(&value)
    }
}

fn resource_deltas<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    known_deltas(deserializer, |key| key.parse::<ResourceKind>().is_ok())
}

fn baron_deltas<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    known_deltas(deserializer, |key| STARTING_BARONS.iter().any(|(id, _)| *id == key))
}

fn region_deltas<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    known_deltas(deserializer, |key| STARTING_REGIONS.iter().any(|(id, _)| *id == key))
}

/// Integer deltas keyed by id. A known id with a non-integer value is an
/// error; an unknown id with one is dropped.
fn known_deltas<'de, D>(
    deserializer: D,
    is_known: impl Fn(&str) -> bool,
) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let mut deltas = BTreeMap::new();
    for (key, value) in raw {
        match value.as_i64() {
            Some(delta) => {
                deltas.insert(key, delta);
            }
            None if is_known(&key) => {
                return Err(D::Error::custom(format!(
                    "delta for `{key}` must be an integer, found {}",
                    value_kind(&value)
                )));
            }
            None => log::debug!("ignoring non-integer delta for unknown key `{key}`"),
        }
    }
    Ok(deltas)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
