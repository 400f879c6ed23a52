//! Consequences scheduled against days of the year.
use anyhow::{Context, Result, bail};
use kingjohn_game::Consequence;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ScheduleEntry {
    day: u32,
    #[serde(alias = "consequence")]
    consequences: Value,
}

/// Consequences keyed by day of year (1..=365), applied in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Schedule {
    by_day: BTreeMap<u32, Vec<Consequence>>,
}

impl Schedule {
    /// Parse a schedule document.
    ///
    /// Accepts a list of `{"day": n, "consequences": {...}}` entries, or a
    /// single bare consequence map which is applied on the first simulated day
    /// (`first_day`).
    pub fn from_json(text: &str, first_day: u32) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("parsing schedule JSON")?;
        let mut schedule = Self::default();
        match value {
            Value::Array(entries) => {
                for (idx, raw) in entries.into_iter().enumerate() {
                    let entry: ScheduleEntry = serde_json::from_value(raw)
                        .with_context(|| format!("schedule entry {idx}"))?;
                    if !(1..=365).contains(&entry.day) {
                        bail!("schedule entry {idx}: day {} is outside 1..=365", entry.day);
                    }
                    let consequence = Consequence::from_value(&entry.consequences)
                        .with_context(|| format!("schedule entry {idx} (day {})", entry.day))?;
                    schedule.push(entry.day, consequence);
                }
            }
            other => {
                let consequence =
                    Consequence::from_value(&other).context("single consequence document")?;
                schedule.push(first_day, consequence);
            }
        }
        Ok(schedule)
    }

    pub fn load(path: &Path, first_day: u32) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text, first_day).with_context(|| format!("in {}", path.display()))
    }

    pub fn push(&mut self, day: u32, consequence: Consequence) {
        self.by_day.entry(day).or_default().push(consequence);
    }

    pub fn merge(&mut self, other: Self) {
        for (day, consequences) in other.by_day {
            self.by_day.entry(day).or_default().extend(consequences);
        }
    }

    pub fn for_day(&self, day: u32) -> &[Consequence] {
        self.by_day.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_day.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}
