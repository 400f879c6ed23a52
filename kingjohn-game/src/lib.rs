//! King John 1205 Game Engine
//!
//! Platform-agnostic simulation core for a year in the reign of King John:
//! the medieval calendar, kingdom state, consequence application, game-over
//! evaluation and snapshot persistence. No UI or event content lives here.

pub mod calendar;
pub mod consequence;
pub mod constants;
pub mod error;
pub mod flags;
pub mod locations;
pub mod numbers;
pub mod snapshot;
pub mod state;
pub mod storage;
pub mod summary;
pub mod termination;

// Re-export commonly used types
pub use calendar::{Date, DateRecord, Season, Weekday, days_in_month, get_season, weather_flavor};
pub use consequence::{Consequence, ResourceKind};
pub use error::EngineError;
pub use flags::{FlagValue, starting_flags};
pub use locations::{Gazetteer, Location, LocationKind, format_location_name, locations_in_region};
pub use state::{Difficulty, GameState};
pub use storage::{FileStorage, SaveMetadata, SaveSlot, StorageConfig, StorageError};
pub use summary::{Change, EffectReport, ResourceSummary, StateSummary};
pub use termination::{GameOverReason, Verdict, final_score};

/// Source of travel times and place names.
/// The built-in [`Gazetteer`] covers the 1205 itinerary; tests and mods may
/// supply their own.
pub trait TravelAtlas {
    /// Days needed to ride from `from` to `to`.
    fn travel_time(&self, from: &str, to: &str) -> u32;

    /// Human-readable name for a location id.
    fn display_name(&self, location: &str) -> String {
        location.to_string()
    }

    /// Whether the atlas knows this location.
    fn is_known(&self, _location: &str) -> bool {
        true
    }
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, slot: SaveSlot, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state; `Ok(None)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, slot: SaveSlot) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game, reporting whether a save was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, slot: SaveSlot) -> Result<bool, Self::Error>;
}

/// Main game engine tying a travel atlas to a storage backend
pub struct GameEngine<A, S>
where
    A: TravelAtlas,
    S: GameStorage,
{
    atlas: A,
    storage: S,
}

impl<A, S> GameEngine<A, S>
where
    A: TravelAtlas,
    S: GameStorage,
{
    /// Create a new game engine with the provided atlas and storage
    pub const fn new(atlas: A, storage: S) -> Self {
        Self { atlas, storage }
    }

    #[must_use]
    pub const fn atlas(&self) -> &A {
        &self.atlas
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Start a new reign on 1 January 1205.
    #[must_use]
    pub fn new_game(&self, difficulty: Difficulty) -> GameState {
        log::info!("new reign begins ({difficulty})");
        GameState::new(difficulty)
    }

    /// Set the court moving towards `destination`, returning the journey
    /// length in days. Travelling to the current location is a no-op.
    pub fn begin_journey(&self, state: &mut GameState, destination: &str) -> u32 {
        if destination == state.location && !state.is_traveling() {
            return 0;
        }
        if !self.atlas.is_known(destination) {
            log::warn!("destination `{destination}` is not in the atlas; estimating the route");
        }
        let days = self.atlas.travel_time(&state.location, destination);
        log::info!(
            "court sets out from {} for {} ({days} days)",
            self.atlas.display_name(&state.location),
            self.atlas.display_name(destination)
        );
        state.start_travel(destination, days);
        days
    }

    /// Save a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_game(&self, slot: SaveSlot, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(slot, game_state)
    }

    /// Load a game state
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be read or decoded.
    pub fn load_game(&self, slot: SaveSlot) -> Result<Option<GameState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let loaded = self.storage.load_game(slot).map_err(Into::<anyhow::Error>::into)?;
        if let Some(state) = &loaded
            && !self.atlas.is_known(&state.location)
        {
            log::warn!("saved location `{}` is not in the atlas", state.location);
        }
        Ok(loaded)
    }

    /// Delete a save
    ///
    /// # Errors
    ///
    /// Returns an error if the save exists but cannot be removed.
    pub fn delete_save(&self, slot: SaveSlot) -> Result<bool, S::Error> {
        self.storage.delete_save(slot)
    }
}
