//! Open-ended story flag values.
//!
//! Flags carry progression state written by the event layer. The engine never
//! interprets them; it only stores, replaces and round-trips them. The same
//! value type carries the opaque event-history and chain records.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tagged value stored under a flag name.
///
/// Serialized untagged so the plain structure matches what the event layer
/// writes: `null`, booleans, integers, floats, strings, lists and maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FlagValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FlagValue>),
    Map(BTreeMap<String, FlagValue>),
}

impl FlagValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[FlagValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Truthiness as the event layer reads it: null, false, zero, and empty
    /// text/list/map are false.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::Text(value) => !value.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Map(entries) => !entries.is_empty(),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FlagValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FlagValue>> From<Vec<T>> for FlagValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FlagValue>> From<Option<T>> for FlagValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("none"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, item)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Flag set a new reign starts with.
#[must_use]
pub fn starting_flags() -> BTreeMap<String, FlagValue> {
    BTreeMap::from([
        ("invasion_launched".to_string(), FlagValue::Bool(false)),
        ("invasion_success".to_string(), FlagValue::Null),
        ("archbishop_elected".to_string(), FlagValue::Null),
        ("de_braose_fallen".to_string(), FlagValue::Bool(false)),
        ("hostages_taken".to_string(), FlagValue::List(Vec::new())),
        ("historical_path".to_string(), FlagValue::Bool(true)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn untagged_values_map_to_plain_json() {
        let value = FlagValue::List(vec![
            FlagValue::Null,
            FlagValue::Bool(true),
            FlagValue::Int(3),
            FlagValue::from("matilda"),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!([null, true, 3, "matilda"])
        );
    }

    #[test]
    fn integers_stay_integers_when_parsed() {
        let parsed: FlagValue = serde_json::from_value(json!({"count": 2, "ratio": 0.5})).unwrap();
        let FlagValue::Map(entries) = parsed else {
            panic!("expected a map");
        };
        assert_eq!(entries["count"], FlagValue::Int(2));
        assert_eq!(entries["ratio"], FlagValue::Float(0.5));
    }

    #[test]
    fn truthiness_follows_event_layer_rules() {
        assert!(!FlagValue::Null.is_truthy());
        assert!(!FlagValue::List(Vec::new()).is_truthy());
        assert!(FlagValue::from(vec!["hostage"]).is_truthy());
        assert!(!FlagValue::from(None::<bool>).is_truthy());
        assert!(FlagValue::Int(-1).is_truthy());
    }

    #[test]
    fn starting_flags_follow_history() {
        let flags = starting_flags();
        assert_eq!(flags.len(), 6);
        assert_eq!(flags["historical_path"].as_bool(), Some(true));
        assert!(flags["invasion_success"].is_null());
        assert_eq!(flags["hostages_taken"].as_list(), Some(&[][..]));
    }
}
