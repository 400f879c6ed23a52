//! The kingdom's mutable state: resources, loyalties, travel and the daily tick.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::calendar::Date;
use crate::consequence::{Consequence, ResourceKind};
use crate::constants::{
    GAME_YEAR, REGION_WEIGHTS, SCORE_MAX, SCORE_MIN, STARTING_AUTHORITY, STARTING_BARONS,
    STARTING_LOCATION, STARTING_MILITARY, STARTING_PAPAL, STARTING_REGIONS, STARTING_TREASURY,
};
use crate::error::EngineError;
use crate::flags::{FlagValue, starting_flags};
use crate::numbers::{clamped_add, usize_to_f64};
use crate::summary::{EffectReport, ResourceSummary, StateSummary};
use crate::termination::{self, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(()),
        }
    }
}

/// Complete state of one reign, from New Game until game over or year end.
///
/// Scores are kept in range by the mutation methods: authority, military
/// readiness, baron loyalty and region stability within `0..=100`, papal
/// relations within `-100..=100`. The treasury is unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub current_date: Date,
    pub location: String,
    pub traveling_to: Option<String>,
    pub travel_days_remaining: u32,

    pub treasury: i64,
    pub royal_authority: i32,
    pub military_readiness: i32,
    pub papal_relations: i32,

    pub barons: BTreeMap<String, i32>,
    pub regions: BTreeMap<String, i32>,
    pub flags: BTreeMap<String, FlagValue>,

    pub event_history: Vec<FlagValue>,
    pub active_chains: Vec<FlagValue>,

    pub days_played: u32,
    pub days_since_negative_treasury: u32,
    pub difficulty: Difficulty,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_date: Date::campaign_start(),
            location: STARTING_LOCATION.to_string(),
            traveling_to: None,
            travel_days_remaining: 0,
            treasury: STARTING_TREASURY,
            royal_authority: STARTING_AUTHORITY,
            military_readiness: STARTING_MILITARY,
            papal_relations: STARTING_PAPAL,
            barons: STARTING_BARONS
                .iter()
                .map(|(id, score)| ((*id).to_string(), *score))
                .collect(),
            regions: STARTING_REGIONS
                .iter()
                .map(|(id, score)| ((*id).to_string(), *score))
                .collect(),
            flags: starting_flags(),
            event_history: Vec::new(),
            active_chains: Vec::new(),
            days_played: 0,
            days_since_negative_treasury: 0,
            difficulty: Difficulty::Normal,
        }
    }
}

impl GameState {
    /// Fresh reign on 1 January 1205 at Winchester.
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Advance the calendar one day and progress any journey.
    pub fn advance_day(&mut self) {
        self.current_date.increment();
        self.days_played = self.days_played.saturating_add(1);

        if self.treasury < 0 {
            self.days_since_negative_treasury = self.days_since_negative_treasury.saturating_add(1);
        } else {
            self.days_since_negative_treasury = 0;
        }

        if let Some(destination) = self.traveling_to.take() {
            self.travel_days_remaining = self.travel_days_remaining.saturating_sub(1);
            if self.travel_days_remaining == 0 {
                log::info!("court arrives at {destination} on {}", self.current_date);
                self.location = destination;
            } else {
                self.traveling_to = Some(destination);
            }
        }
    }

    /// Set out for `destination`; arrival happens after `days` calls to
    /// [`advance_day`](Self::advance_day) (a 0-day journey arrives on the next).
    pub fn start_travel(&mut self, destination: impl Into<String>, days: u32) {
        let destination = destination.into();
        log::debug!(
            "court leaves {} for {destination} ({days} days)",
            self.location
        );
        self.traveling_to = Some(destination);
        self.travel_days_remaining = days;
    }

    #[must_use]
    pub const fn is_traveling(&self) -> bool {
        self.traveling_to.is_some()
    }

    /// Mean baron loyalty, 0 when there are no barons.
    #[must_use]
    pub fn average_baronial_loyalty(&self) -> f64 {
        if self.barons.is_empty() {
            return 0.0;
        }
        let total: f64 = self.barons.values().map(|score| f64::from(*score)).sum();
        total / usize_to_f64(self.barons.len())
    }

    /// Weighted regional stability. An absent region counts as zero while its
    /// weight stays in the divisor.
    #[must_use]
    pub fn kingdom_stability(&self) -> f64 {
        let (total, total_weight) = REGION_WEIGHTS.iter().fold(
            (0.0, 0.0),
            |(total, weight_sum), (region, weight)| {
                let score = self.regions.get(*region).copied().unwrap_or(0);
                (total + f64::from(score) * weight, weight_sum + weight)
            },
        );
        if total_weight > 0.0 {
            total / total_weight
        } else {
            0.0
        }
    }

    /// Game-over verdict for the current state.
    #[must_use]
    pub fn check_game_over(&self) -> Verdict {
        termination::evaluate(self)
    }

    /// Whether the campaign year has been played out. The driver checks this
    /// after the termination verdict.
    #[must_use]
    pub fn is_year_complete(&self) -> bool {
        self.current_date.year() > GAME_YEAR
    }

    /// Apply a consequence and report what changed.
    ///
    /// Resource deltas follow [`ResourceKind::bounds`]; relationship and
    /// region deltas clamp to `0..=100` and skip unknown ids; flags are
    /// replaced.
    pub fn apply_consequences(&mut self, consequence: &Consequence) -> EffectReport {
        let before = self.summary();

        for (kind, delta) in consequence.resource_deltas() {
            self.apply_resource_change(kind, delta);
        }

        for (baron, delta) in &consequence.relationships {
            if let Some(score) = self.barons.get_mut(baron) {
                *score = clamped_add(*score, *delta, SCORE_MIN, SCORE_MAX);
            } else {
                log::debug!("ignoring relationship change for unknown baron `{baron}`");
            }
        }

        for (region, delta) in &consequence.regions {
            if let Some(score) = self.regions.get_mut(region) {
                *score = clamped_add(*score, *delta, SCORE_MIN, SCORE_MAX);
            } else {
                log::debug!("ignoring stability change for unknown region `{region}`");
            }
        }

        for (name, value) in &consequence.flags {
            self.flags.insert(name.clone(), value.clone());
        }

        let report = EffectReport::new(before, self.summary());
        log::debug!("consequence applied: {} change(s)", report.changes().len());
        report
    }

    /// Validate a plain structured consequence, then apply it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedConsequence`] before touching the state
    /// when `value` is not a consequence map.
    pub fn apply_consequence_value(
        &mut self,
        value: &serde_json::Value,
    ) -> Result<EffectReport, EngineError> {
        let consequence = Consequence::from_value(value)?;
        Ok(self.apply_consequences(&consequence))
    }

    fn apply_resource_change(&mut self, kind: ResourceKind, delta: i64) {
        match (kind, kind.bounds()) {
            (ResourceKind::Treasury, _) => {
                self.treasury = self.treasury.saturating_add(delta);
            }
            (ResourceKind::Authority, Some((min, max))) => {
                self.royal_authority = clamped_add(self.royal_authority, delta, min, max);
            }
            (ResourceKind::Military, Some((min, max))) => {
                self.military_readiness = clamped_add(self.military_readiness, delta, min, max);
            }
            (ResourceKind::Papal, Some((min, max))) => {
                self.papal_relations = clamped_add(self.papal_relations, delta, min, max);
            }
            (_, None) => {}
        }
    }

    /// Append a record to the event history.
    pub fn record_event(&mut self, record: impl Into<FlagValue>) {
        self.event_history.push(record.into());
    }

    /// Register a multi-day event chain.
    pub fn begin_chain(&mut self, chain: impl Into<FlagValue>) {
        self.active_chains.push(chain.into());
    }

    /// Dashboard values for the UI.
    #[must_use]
    pub fn resource_summary(&self) -> ResourceSummary {
        ResourceSummary {
            treasury: self.treasury,
            royal_authority: self.royal_authority,
            military_readiness: self.military_readiness,
            papal_relations: self.papal_relations,
            average_baronial_loyalty: self.average_baronial_loyalty(),
            kingdom_stability: self.kingdom_stability(),
        }
    }

    /// Immutable copy of every comparable field, used for before/after diffs.
    #[must_use]
    pub fn summary(&self) -> StateSummary {
        StateSummary {
            resources: self.resource_summary(),
            barons: self.barons.clone(),
            regions: self.regions.clone(),
            flags: self.flags.clone(),
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GameState({}, {}, Treasury: {})",
            self.current_date.format_short(),
            crate::locations::format_location_name(&self.location),
            self.treasury
        )
    }
}
