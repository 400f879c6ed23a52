//! Read-only views of the kingdom used for dashboards and before/after diffs.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::consequence::ResourceKind;
use crate::flags::FlagValue;

/// Dashboard figures for the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub treasury: i64,
    pub royal_authority: i32,
    pub military_readiness: i32,
    pub papal_relations: i32,
    pub average_baronial_loyalty: f64,
    pub kingdom_stability: f64,
}

impl ResourceSummary {
    #[must_use]
    pub fn resource(&self, kind: ResourceKind) -> i64 {
        match kind {
            ResourceKind::Treasury => self.treasury,
            ResourceKind::Authority => i64::from(self.royal_authority),
            ResourceKind::Military => i64::from(self.military_readiness),
            ResourceKind::Papal => i64::from(self.papal_relations),
        }
    }
}

/// Copy of every field a consequence can touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    pub resources: ResourceSummary,
    pub barons: BTreeMap<String, i32>,
    pub regions: BTreeMap<String, i32>,
    pub flags: BTreeMap<String, FlagValue>,
}

/// One field that differs between two summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Resource {
        resource: ResourceKind,
        before: i64,
        after: i64,
    },
    Relationship {
        baron: String,
        before: i32,
        after: i32,
    },
    Region {
        region: String,
        before: i32,
        after: i32,
    },
    Flag {
        name: String,
        before: Option<FlagValue>,
        after: FlagValue,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource {
                resource,
                before,
                after,
            } => write!(f, "{resource}: {before} -> {after} ({:+})", after - before),
            Self::Relationship {
                baron,
                before,
                after,
            } => write!(f, "{baron}: {before} -> {after} ({:+})", after - before),
            Self::Region {
                region,
                before,
                after,
            } => write!(f, "{region}: {before} -> {after} ({:+})", after - before),
            Self::Flag {
                name,
                before: Some(before),
                after,
            } => write!(f, "{name}: {before} -> {after}"),
            Self::Flag {
                name,
                before: None,
                after,
            } => write!(f, "{name}: set to {after}"),
        }
    }
}

/// Summaries taken either side of a consequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectReport {
    pub before: StateSummary,
    pub after: StateSummary,
}

impl EffectReport {
    #[must_use]
    pub const fn new(before: StateSummary, after: StateSummary) -> Self {
        Self { before, after }
    }

    /// Field-by-field differences, resources first, then barons, regions
    /// and flags in key order.
    #[must_use]
    pub fn changes(&self) -> Vec<Change> {
        let mut changes = Vec::new();

        for kind in ResourceKind::ALL {
            let before = self.before.resources.resource(kind);
            let after = self.after.resources.resource(kind);
            if before != after {
                changes.push(Change::Resource {
                    resource: kind,
                    before,
                    after,
                });
            }
        }

        for (baron, after) in &self.after.barons {
            let before = self.before.barons.get(baron).copied().unwrap_or(*after);
            if before != *after {
                changes.push(Change::Relationship {
                    baron: baron.clone(),
                    before,
                    after: *after,
                });
            }
        }

        for (region, after) in &self.after.regions {
            let before = self.before.regions.get(region).copied().unwrap_or(*after);
            if before != *after {
                changes.push(Change::Region {
                    region: region.clone(),
                    before,
                    after: *after,
                });
            }
        }

        for (name, after) in &self.after.flags {
            let before = self.before.flags.get(name);
            if before != Some(after) {
                changes.push(Change::Flag {
                    name: name.clone(),
                    before: before.cloned(),
                    after: after.clone(),
                });
            }
        }

        changes
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> StateSummary {
        StateSummary {
            resources: ResourceSummary {
                treasury: 8_000,
                royal_authority: 65,
                military_readiness: 60,
                papal_relations: 40,
                average_baronial_loyalty: 65.0,
                kingdom_stability: 60.0,
            },
            barons: BTreeMap::from([("william_marshal".to_string(), 70)]),
            regions: BTreeMap::from([("ireland".to_string(), 55)]),
            flags: BTreeMap::from([("invasion_launched".to_string(), FlagValue::Bool(false))]),
        }
    }

    #[test]
    fn identical_summaries_have_no_changes() {
        let report = EffectReport::new(summary(), summary());
        assert!(report.is_noop());
        assert!(report.changes().is_empty());
    }

    #[test]
    fn changes_list_every_touched_field() {
        let mut after = summary();
        after.resources.treasury = 7_500;
        after.resources.papal_relations = 35;
        after.barons.insert("william_marshal".to_string(), 60);
        after.regions.insert("ireland".to_string(), 58);
        after
            .flags
            .insert("invasion_launched".to_string(), FlagValue::Bool(true));
        after
            .flags
            .insert("new_flag".to_string(), FlagValue::Int(1));

        let changes = EffectReport::new(summary(), after).changes();
        assert_eq!(changes.len(), 6);
        assert_eq!(
            changes[0],
            Change::Resource {
                resource: ResourceKind::Treasury,
                before: 8_000,
                after: 7_500
            }
        );
        assert_eq!(changes[0].to_string(), "treasury: 8000 -> 7500 (-500)");
        assert_eq!(changes[3].to_string(), "ireland: 55 -> 58 (+3)");
        assert_eq!(changes[5].to_string(), "new_flag: set to 1");
    }
}
