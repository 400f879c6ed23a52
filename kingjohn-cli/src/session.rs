//! The daily loop: check for game over, check for year end, apply the day's
//! consequences, autosave, advance.
use anyhow::{Context, Result};
use kingjohn_game::{
    Change, GameEngine, GameOverReason, GameState, GameStorage, SaveSlot, TravelAtlas,
};
use serde::Serialize;

use crate::schedule::Schedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ending {
    GameOver { reason: GameOverReason },
    YearComplete,
    DayLimit,
}

impl Ending {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver { .. })
    }
}

/// Changes a scheduled consequence made on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEffect {
    pub date: String,
    pub day_of_year: u32,
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeastRecord {
    pub date: String,
    pub feast: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub ending: Ending,
    pub days_simulated: u32,
    pub effects: Vec<DayEffect>,
    pub feasts: Vec<FeastRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    pub max_days: u32,
    pub autosave: bool,
}

pub fn play<A, S>(
    engine: &GameEngine<A, S>,
    state: &mut GameState,
    schedule: &Schedule,
    options: LoopOptions,
) -> Result<RunOutcome>
where
    A: TravelAtlas,
    S: GameStorage,
    S::Error: Into<anyhow::Error>,
{
    let mut effects = Vec::new();
    let mut feasts = Vec::new();
    let mut days_simulated = 0;

    let ending = loop {
        if let Some(reason) = state.check_game_over().reason {
            break Ending::GameOver { reason };
        }
        if state.is_year_complete() {
            log::info!("the year {} is complete", state.current_date.year() - 1);
            break Ending::YearComplete;
        }
        if days_simulated >= options.max_days {
            break Ending::DayLimit;
        }

        let today = state.current_date;
        if let Some(feast) = today.is_feast_day() {
            log::debug!("{today}: {feast}");
            feasts.push(FeastRecord {
                date: today.format_long(),
                feast,
            });
        }

        for consequence in schedule.for_day(today.day_of_year()) {
            let report = state.apply_consequences(consequence);
            let changes = report.changes();
            if !changes.is_empty() {
                effects.push(DayEffect {
                    date: today.format_long(),
                    day_of_year: today.day_of_year(),
                    changes,
                });
            }
        }

        if options.autosave {
            engine
                .save_game(SaveSlot::Autosave, state)
                .map_err(Into::<anyhow::Error>::into)
                .with_context(|| format!("autosave on {today}"))?;
        }

        state.advance_day();
        days_simulated += 1;
    };

    Ok(RunOutcome {
        ending,
        days_simulated,
        effects,
        feasts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingjohn_game::{Consequence, Difficulty, Gazetteer, ResourceKind};
    use std::cell::RefCell;
    use std::convert::Infallible;

    #[derive(Default)]
    struct CountingStorage {
        saves: RefCell<Vec<u32>>,
    }

    impl GameStorage for CountingStorage {
        type Error = Infallible;

        fn save_game(&self, _slot: SaveSlot, game_state: &GameState) -> Result<(), Self::Error> {
            self.saves.borrow_mut().push(game_state.days_played);
            Ok(())
        }

        fn load_game(&self, _slot: SaveSlot) -> Result<Option<GameState>, Self::Error> {
            Ok(None)
        }

        fn delete_save(&self, _slot: SaveSlot) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }

    fn options(max_days: u32) -> LoopOptions {
        LoopOptions {
            max_days,
            autosave: true,
        }
    }

    #[test]
    fn stops_at_day_limit_after_autosaving_each_day() {
        let engine = GameEngine::new(Gazetteer, CountingStorage::default());
        let mut state = engine.new_game(Difficulty::Normal);
        let outcome = play(&engine, &mut state, &Schedule::default(), options(5)).unwrap();
        assert_eq!(outcome.ending, Ending::DayLimit);
        assert_eq!(outcome.days_simulated, 5);
        assert_eq!(state.days_played, 5);
        assert_eq!(*engine.storage().saves.borrow(), vec![0, 1, 2, 3, 4]);
        assert_eq!(outcome.feasts.len(), 1);
    }

    #[test]
    fn full_year_ends_in_year_complete() {
        let engine = GameEngine::new(Gazetteer, CountingStorage::default());
        let mut state = engine.new_game(Difficulty::Normal);
        let outcome = play(&engine, &mut state, &Schedule::default(), options(1_000)).unwrap();
        assert_eq!(outcome.ending, Ending::YearComplete);
        assert_eq!(outcome.days_simulated, 365);
        assert_eq!(outcome.feasts.len(), 18);
    }

    #[test]
    fn scheduled_debt_ends_in_bankruptcy() {
        let engine = GameEngine::new(Gazetteer, CountingStorage::default());
        let mut state = engine.new_game(Difficulty::Normal);
        let mut schedule = Schedule::default();
        schedule.push(1, Consequence::new().resource(ResourceKind::Treasury, -9_000));

        let outcome = play(&engine, &mut state, &schedule, options(100)).unwrap();
        assert_eq!(
            outcome.ending,
            Ending::GameOver {
                reason: GameOverReason::Bankruptcy
            }
        );
        assert!(outcome.ending.is_game_over());
        assert_eq!(outcome.days_simulated, 31);
        assert_eq!(outcome.effects.len(), 1);
        assert_eq!(outcome.effects[0].day_of_year, 1);
    }

    #[test]
    fn game_over_is_checked_before_anything_else() {
        let engine = GameEngine::new(Gazetteer, CountingStorage::default());
        let mut state = engine.new_game(Difficulty::Normal);
        state.royal_authority = 3;
        let outcome = play(&engine, &mut state, &Schedule::default(), options(10)).unwrap();
        assert_eq!(outcome.days_simulated, 0);
        assert!(engine.storage().saves.borrow().is_empty());
    }

    #[test]
    fn autosave_can_be_disabled() {
        let engine = GameEngine::new(Gazetteer, CountingStorage::default());
        let mut state = engine.new_game(Difficulty::Normal);
        let opts = LoopOptions {
            max_days: 3,
            autosave: false,
        };
        play(&engine, &mut state, &Schedule::default(), opts).unwrap();
        assert!(engine.storage().saves.borrow().is_empty());
    }
}
