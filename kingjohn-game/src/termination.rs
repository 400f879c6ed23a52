//! Game-over evaluation.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    BANKRUPTCY_GRACE_DAYS, CIVIL_WAR_AUTHORITY, COLLAPSE_STABILITY, MASS_REBELLION_LOYALTY,
};
use crate::numbers::f64_to_i64;
use crate::state::GameState;

/// Why a reign ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// Treasury negative for longer than the grace period
    Bankruptcy,
    /// Royal authority collapsed below the civil war threshold
    CivilWar,
    /// Average baron loyalty fell below the rebellion threshold
    MassRebellion,
    /// Every region fell below the collapse threshold at once
    KingdomCollapse,
}

impl GameOverReason {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Bankruptcy => "bankruptcy",
            Self::CivilWar => "civil_war",
            Self::MassRebellion => "mass_rebellion",
            Self::KingdomCollapse => "kingdom_collapse",
        }
    }

    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Bankruptcy => "The royal treasury is exhausted and the king's credit is gone.",
            Self::CivilWar => "Royal authority has collapsed; the barons take up arms.",
            Self::MassRebellion => "The barons renounce their fealty in open rebellion.",
            Self::KingdomCollapse => "Every province slips from royal control.",
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `(is_over, reason)` pair; `reason` is present exactly when the reign is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub reason: Option<GameOverReason>,
}

impl Verdict {
    #[must_use]
    pub const fn continuing() -> Self {
        Self { reason: None }
    }

    #[must_use]
    pub const fn over(reason: GameOverReason) -> Self {
        Self {
            reason: Some(reason),
        }
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.reason.is_some()
    }

    #[must_use]
    pub const fn into_tuple(self) -> (bool, Option<GameOverReason>) {
        (self.is_over(), self.reason)
    }
}

/// Evaluate the termination conditions in priority order.
#[must_use]
pub fn evaluate(state: &GameState) -> Verdict {
    let reason = if state.treasury < 0 && state.days_since_negative_treasury > BANKRUPTCY_GRACE_DAYS
    {
        Some(GameOverReason::Bankruptcy)
    } else if state.royal_authority < CIVIL_WAR_AUTHORITY {
        Some(GameOverReason::CivilWar)
    } else if state.average_baronial_loyalty() < MASS_REBELLION_LOYALTY {
        Some(GameOverReason::MassRebellion)
    } else if state
        .regions
        .values()
        .all(|stability| *stability < COLLAPSE_STABILITY)
    {
        Some(GameOverReason::KingdomCollapse)
    } else {
        None
    };

    if let Some(reason) = reason {
        log::info!(
            "reign ends on {} ({reason}): {}",
            state.current_date,
            reason.headline()
        );
    }
    Verdict { reason }
}

/// Score for a reign that reached the end of the year.
///
/// A tenth of the treasury (rounded down), five points per point of
/// authority, and three per point of average loyalty and of stability.
#[must_use]
pub fn final_score(state: &GameState) -> i64 {
    state.treasury.div_euclid(10)
        + i64::from(state.royal_authority) * 5
        + f64_to_i64(state.average_baronial_loyalty() * 3.0)
        + f64_to_i64(state.kingdom_stability() * 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_kingdom_continues() {
        let state = GameState::default();
        assert_eq!(evaluate(&state), Verdict::continuing());
        assert_eq!(state.check_game_over().into_tuple(), (false, None));
    }

    #[test]
    fn bankruptcy_boundary_is_strict() {
        let mut state = GameState::default();
        state.treasury = -1;
        state.days_since_negative_treasury = 30;
        assert!(!evaluate(&state).is_over());
        state.days_since_negative_treasury = 31;
        assert_eq!(
            evaluate(&state).into_tuple(),
            (true, Some(GameOverReason::Bankruptcy))
        );
    }

    #[test]
    fn counter_without_debt_is_not_bankruptcy() {
        let mut state = GameState::default();
        state.treasury = 0;
        state.days_since_negative_treasury = 90;
        assert!(!evaluate(&state).is_over());
    }

    #[test]
    fn civil_war_below_ten_authority() {
        let mut state = GameState::default();
        state.royal_authority = 10;
        assert!(!evaluate(&state).is_over());
        state.royal_authority = 9;
        assert_eq!(evaluate(&state).reason, Some(GameOverReason::CivilWar));
    }

    #[test]
    fn mass_rebellion_on_low_average_loyalty() {
        let mut state = GameState::default();
        for loyalty in state.barons.values_mut() {
            *loyalty = 14;
        }
        assert_eq!(evaluate(&state).reason, Some(GameOverReason::MassRebellion));
    }

    #[test]
    fn collapse_requires_every_region() {
        let mut state = GameState::default();
        for stability in state.regions.values_mut() {
            *stability = 10;
        }
        state.regions.insert("continental".to_string(), 26);
        assert!(!evaluate(&state).is_over());

        state.regions.insert("continental".to_string(), 24);
        assert_eq!(
            evaluate(&state).reason,
            Some(GameOverReason::KingdomCollapse)
        );
    }

    #[test]
    fn empty_region_map_counts_as_collapse() {
        let mut state = GameState::default();
        state.regions.clear();
        assert_eq!(
            evaluate(&state).reason,
            Some(GameOverReason::KingdomCollapse)
        );
    }

    #[test]
    fn earlier_conditions_take_priority() {
        let mut state = GameState::default();
        state.treasury = -50;
        state.days_since_negative_treasury = 40;
        state.royal_authority = 0;
        for loyalty in state.barons.values_mut() {
            *loyalty = 0;
        }
        assert_eq!(evaluate(&state).reason, Some(GameOverReason::Bankruptcy));

        state.treasury = 10;
        assert_eq!(evaluate(&state).reason, Some(GameOverReason::CivilWar));

        state.royal_authority = 50;
        assert_eq!(evaluate(&state).reason, Some(GameOverReason::MassRebellion));
    }

    #[test]
    fn final_score_weights_each_resource() {
        let state = GameState::default();
        // 800 + 325 + floor(193.125) + floor(186.25)
        assert_eq!(final_score(&state), 800 + 325 + 193 + 186);

        let mut broke = GameState::default();
        broke.treasury = -15;
        broke.royal_authority = 0;
        broke.barons.clear();
        broke.regions.clear();
        assert_eq!(final_score(&broke), -2);
    }

    #[test]
    fn reasons_use_snake_case_keys() {
        assert_eq!(GameOverReason::KingdomCollapse.to_string(), "kingdom_collapse");
        assert_eq!(
            serde_json::to_value(GameOverReason::CivilWar).unwrap(),
            serde_json::json!("civil_war")
        );
    }
}
